//! Spreadsheet import
//!
//! Reads workbook bytes into [`Tab`]s: one tab per worksheet, the first row of
//! each sheet used as the header row and every later row turned into a
//! [`Row`] keyed by header.

mod relationships;
mod worksheet;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::Cursor;
use zip::ZipArchive;

use crate::csv::{parse_delimited, sniff_delimiter};
use crate::error::Result;
use crate::types::{CellValue, Column, Row, Tab};

use relationships::{get_sheet_info, parse_shared_strings, parse_workbook_relationships};
use worksheet::parse_sheet;

/// Local file header signature every ZIP package starts with.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Header used for columns whose header cell is empty.
const EMPTY_HEADER: &str = "__EMPTY";

/// Which row keys become grid columns.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnPolicy {
    /// Keys of the first data row, in order. Keys that only appear on later
    /// rows stay in the row data but get no column.
    #[default]
    FirstRow,
    /// Every key of every row, in first-seen order.
    Union,
}

/// Import settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportOptions {
    pub column_policy: ColumnPolicy,
}

impl ImportOptions {
    /// Options that expose every key as a column.
    pub fn union() -> Self {
        Self {
            column_policy: ColumnPolicy::Union,
        }
    }

    /// Union columns when `union_columns` is set, first-row columns otherwise.
    pub fn with_union(union_columns: bool) -> Self {
        if union_columns {
            Self::union()
        } else {
            Self::default()
        }
    }
}

/// A non-empty cell at a 0-indexed position.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GridCell {
    pub row: u32,
    pub col: u32,
    pub value: CellValue,
}

/// Raw cells of one sheet before header mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct SheetGrid {
    pub name: String,
    pub cells: Vec<GridCell>,
}

/// Import a workbook into tabs, one per worksheet in workbook order.
///
/// ZIP packages are read as XLSX. Other input that is valid UTF-8 is read
/// as CSV (or TSV) into a single tab named `Sheet1`.
///
/// # Errors
/// Returns an error if the package is not a readable ZIP, or if the
/// workbook or a worksheet part is missing or malformed.
pub fn import_workbook(data: &[u8], options: &ImportOptions) -> Result<Vec<Tab>> {
    let grids = if data.starts_with(ZIP_MAGIC) {
        read_xlsx(data)?
    } else if let Ok(text) = std::str::from_utf8(data) {
        let delimiter = sniff_delimiter(text);
        tracing::debug!(?delimiter, "input is not a zip package, reading as delimited text");
        vec![parse_delimited(text, delimiter)]
    } else {
        // Not text either: let the zip reader report why it is unreadable
        read_xlsx(data)?
    };

    let tabs: Vec<Tab> = grids
        .into_iter()
        .map(|grid| grid_to_tab(grid, options.column_policy))
        .collect();

    tracing::info!(
        tabs = tabs.len(),
        rows = tabs.iter().map(|t| t.rows.len()).sum::<usize>(),
        "imported workbook"
    );
    Ok(tabs)
}

fn read_xlsx(data: &[u8]) -> Result<Vec<SheetGrid>> {
    let cursor = Cursor::new(data);
    let mut archive = ZipArchive::new(cursor)?;

    // Relationships first so the other parts are found by their real paths
    let relationships = parse_workbook_relationships(&mut archive);
    let shared_strings =
        parse_shared_strings(&mut archive, relationships.shared_strings.as_deref());
    let sheet_info = get_sheet_info(&mut archive, &relationships.worksheets)?;

    sheet_info
        .iter()
        .map(|info| parse_sheet(&mut archive, info, &shared_strings))
        .collect()
}

/// Map a sheet's cells to a tab using its first non-empty row as headers.
pub(crate) fn grid_to_tab(grid: SheetGrid, policy: ColumnPolicy) -> Tab {
    let mut by_row: BTreeMap<u32, BTreeMap<u32, CellValue>> = BTreeMap::new();
    for cell in grid.cells {
        by_row.entry(cell.row).or_default().insert(cell.col, cell.value);
    }

    let mut rows_iter = by_row.into_iter();
    let Some((_, header_cells)) = rows_iter.next() else {
        return Tab::new(grid.name, Vec::new(), Vec::new());
    };
    let data_rows: Vec<BTreeMap<u32, CellValue>> = rows_iter.map(|(_, cells)| cells).collect();

    let first_col = header_cells
        .keys()
        .chain(data_rows.iter().flat_map(BTreeMap::keys))
        .min()
        .copied()
        .unwrap_or(0);
    let last_col = header_cells
        .keys()
        .chain(data_rows.iter().flat_map(BTreeMap::keys))
        .max()
        .copied()
        .unwrap_or(0);

    let headers = build_headers(&header_cells, first_col, last_col);

    let rows: Vec<Row> = data_rows
        .into_iter()
        .filter_map(|cells| {
            let mut row = Row::new();
            for (col, value) in cells {
                if matches!(&value, CellValue::String(s) if s.is_empty()) {
                    continue;
                }
                // Headers are unique per column, so no key lookup is needed
                if let Some(header) = headers.get(&col) {
                    row.push_unique(header.as_str(), value);
                }
            }
            (!row.is_empty()).then_some(row)
        })
        .collect();

    let mut tab = Tab::new(grid.name, Vec::new(), rows);
    tab.columns = match policy {
        ColumnPolicy::FirstRow => tab
            .rows
            .first()
            .map(|row| row.keys().map(Column::for_field).collect())
            .unwrap_or_default(),
        ColumnPolicy::Union => tab
            .field_union()
            .iter()
            .map(|f| Column::for_field(f))
            .collect(),
    };

    tracing::debug!(
        sheet = %tab.title,
        rows = tab.rows.len(),
        columns = tab.columns.len(),
        "mapped sheet to tab"
    );
    tab
}

/// Header text per column. Blank headers become `__EMPTY`, `__EMPTY_1`, ...
/// and repeated headers get `_1`, `_2`, ... suffixes.
fn build_headers(
    header_cells: &BTreeMap<u32, CellValue>,
    first_col: u32,
    last_col: u32,
) -> BTreeMap<u32, String> {
    // Next suffix to try per name; generated names are entered too so a
    // literal `a_1` header is never reused.
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    let mut headers = BTreeMap::new();

    for col in first_col..=last_col {
        let base = header_cells
            .get(&col)
            .map(CellValue::display)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| EMPTY_HEADER.to_string());

        let name = match next_suffix.get(&base).copied() {
            None => {
                next_suffix.insert(base.clone(), 1);
                base
            }
            Some(mut counter) => {
                let mut name = format!("{base}_{counter}");
                while next_suffix.contains_key(&name) {
                    counter += 1;
                    name = format!("{base}_{counter}");
                }
                next_suffix.insert(base, counter + 1);
                next_suffix.insert(name.clone(), 1);
                name
            }
        };
        headers.insert(col, name);
    }

    headers
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    fn cell(row: u32, col: u32, value: impl Into<CellValue>) -> GridCell {
        GridCell {
            row,
            col,
            value: value.into(),
        }
    }

    fn grid(cells: Vec<GridCell>) -> SheetGrid {
        SheetGrid {
            name: "Sheet1".to_string(),
            cells,
        }
    }

    fn fields(tab: &Tab) -> Vec<&str> {
        tab.columns.iter().map(|c| c.field.as_str()).collect()
    }

    #[test]
    fn test_header_row_keys_data_rows() {
        let tab = grid_to_tab(
            grid(vec![
                cell(0, 0, "name"),
                cell(0, 1, "qty"),
                cell(1, 0, "bolt"),
                cell(1, 1, 4.0),
                cell(2, 0, "nut"),
            ]),
            ColumnPolicy::FirstRow,
        );
        assert_eq!(fields(&tab), vec!["name", "qty"]);
        assert_eq!(tab.rows.len(), 2);
        assert_eq!(tab.rows[0].get("qty"), Some(&CellValue::Number(4.0)));
        // Empty cells are left out of the row
        assert_eq!(tab.rows[1].get("qty"), None);
    }

    #[test]
    fn test_blank_and_duplicate_headers() {
        let tab = grid_to_tab(
            grid(vec![
                cell(0, 0, "a"),
                cell(0, 2, "a"),
                cell(0, 4, "a"),
                cell(1, 0, 1.0),
                cell(1, 1, 2.0),
                cell(1, 2, 3.0),
                cell(1, 3, 4.0),
                cell(1, 4, 5.0),
            ]),
            ColumnPolicy::FirstRow,
        );
        assert_eq!(fields(&tab), vec!["a", "__EMPTY", "a_1", "__EMPTY_1", "a_2"]);
    }

    #[test]
    fn test_suffixes_skip_literal_headers() {
        let tab = grid_to_tab(
            grid(vec![
                cell(0, 0, "a"),
                cell(0, 1, "a_1"),
                cell(0, 2, "a"),
                cell(0, 3, "a_1"),
                cell(1, 0, 1.0),
                cell(1, 1, 2.0),
                cell(1, 2, 3.0),
                cell(1, 3, 4.0),
            ]),
            ColumnPolicy::FirstRow,
        );
        assert_eq!(fields(&tab), vec!["a", "a_1", "a_2", "a_1_1"]);
    }

    #[test]
    fn test_sparse_header_row_across_every_column() {
        let last_col = 16_383; // XFD
        let tab = grid_to_tab(
            grid(vec![cell(0, 0, "h"), cell(1, last_col, 1.0)]),
            ColumnPolicy::FirstRow,
        );
        assert_eq!(fields(&tab), vec!["__EMPTY_16382"]);
        assert_eq!(
            tab.rows[0].get("__EMPTY_16382"),
            Some(&CellValue::Number(1.0))
        );
    }

    #[test]
    fn test_wide_rows_keep_column_order() {
        let cols = 8_000u32;
        let mut cells: Vec<GridCell> = (0..cols).map(|c| cell(0, c, format!("c{c}"))).collect();
        for r in 1..=3 {
            cells.extend((0..cols).map(|c| cell(r, c, f64::from(c))));
        }
        let tab = grid_to_tab(grid(cells), ColumnPolicy::Union);
        assert_eq!(tab.columns.len(), 8_000);
        assert_eq!(tab.rows.len(), 3);
        assert_eq!(tab.rows[2].len(), 8_000);
        assert_eq!(tab.rows[2].keys().nth(7_999), Some("c7999"));
        assert_eq!(tab.rows[2].get("c42"), Some(&CellValue::Number(42.0)));
    }

    #[test]
    fn test_blank_rows_skipped() {
        let tab = grid_to_tab(
            grid(vec![
                cell(0, 0, "k"),
                cell(1, 0, "x"),
                cell(2, 0, ""),
                cell(5, 0, "y"),
            ]),
            ColumnPolicy::FirstRow,
        );
        assert_eq!(tab.rows.len(), 2);
        assert_eq!(tab.rows[1].get("k"), Some(&CellValue::from("y")));
    }

    #[test]
    fn test_column_policy_union_vs_first_row() {
        let cells = vec![
            cell(0, 0, "a"),
            cell(0, 1, "b"),
            cell(1, 0, 1.0),
            cell(2, 1, 2.0),
        ];
        let first = grid_to_tab(grid(cells.clone()), ColumnPolicy::FirstRow);
        assert_eq!(fields(&first), vec!["a"]);
        // The later key stays in the row data
        assert_eq!(first.rows[1].get("b"), Some(&CellValue::Number(2.0)));

        let union = grid_to_tab(grid(cells), ColumnPolicy::Union);
        assert_eq!(fields(&union), vec!["a", "b"]);
    }

    #[test]
    fn test_header_only_sheet_yields_empty_tab() {
        let tab = grid_to_tab(grid(vec![cell(0, 0, "a")]), ColumnPolicy::FirstRow);
        assert_eq!(tab.title, "Sheet1");
        assert!(tab.columns.is_empty());
        assert!(tab.rows.is_empty());

        let empty = grid_to_tab(grid(Vec::new()), ColumnPolicy::Union);
        assert!(empty.columns.is_empty());
        assert!(empty.rows.is_empty());
    }

    #[test]
    fn test_numeric_and_bool_headers_use_display_text() {
        let tab = grid_to_tab(
            grid(vec![
                cell(0, 0, 2024.0),
                cell(0, 1, true),
                cell(1, 0, "x"),
                cell(1, 1, "y"),
            ]),
            ColumnPolicy::FirstRow,
        );
        assert_eq!(fields(&tab), vec!["2024", "TRUE"]);
    }

    #[test]
    fn test_text_input_reads_as_csv() {
        let tabs = import_workbook(b"a,b\n1,2\n", &ImportOptions::default()).unwrap();
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs[0].title, "Sheet1");
        assert_eq!(tabs[0].rows[0].get("b"), Some(&CellValue::Number(2.0)));
    }

    #[test]
    fn test_binary_garbage_is_zip_error() {
        let err = import_workbook(&[0xff, 0xfe, 0x00, 0x9f], &ImportOptions::default());
        assert!(matches!(err, Err(crate::error::OrderdeskError::Zip(_))));
    }

    #[test]
    fn test_import_options_json() {
        let opts: ImportOptions = serde_json::from_str(r#"{"columnPolicy":"union"}"#).unwrap();
        assert_eq!(opts, ImportOptions::union());
        let default: ImportOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(default.column_policy, ColumnPolicy::FirstRow);
        assert_eq!(ImportOptions::with_union(true), ImportOptions::union());
        assert_eq!(ImportOptions::with_union(false), ImportOptions::default());
    }
}
