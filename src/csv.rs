//! Minimal CSV/TSV reader that produces a single sheet grid.

use crate::parser::{GridCell, SheetGrid};
use crate::types::CellValue;

/// Sheet name given to delimited text imports.
pub(crate) const DELIMITED_SHEET_NAME: &str = "Sheet1";

/// Delimiter for parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
        }
    }
}

/// Tab-separated when the first line has a tab and no comma, else comma.
pub(crate) fn sniff_delimiter(text: &str) -> Delimiter {
    let first = text.lines().next().unwrap_or_default();
    if first.contains('\t') && !first.contains(',') {
        Delimiter::Tab
    } else {
        Delimiter::Comma
    }
}

/// Parse CSV/TSV text into one sheet grid named `Sheet1`.
pub(crate) fn parse_delimited(text: &str, delim: Delimiter) -> SheetGrid {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let sep = delim.as_char();

    let mut cells: Vec<GridCell> = Vec::new();

    for (row_idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let Ok(row) = u32::try_from(row_idx) else {
            break;
        };
        for (col_idx, field) in split_csv_line(line, sep).into_iter().enumerate() {
            let Ok(col) = u32::try_from(col_idx) else {
                break;
            };
            let value = field.trim();
            if value.is_empty() {
                continue;
            }

            cells.push(GridCell {
                row,
                col,
                value: detect_value(value),
            });
        }
    }

    SheetGrid {
        name: DELIMITED_SHEET_NAME.to_string(),
        cells,
    }
}

/// Finite numbers and TRUE/FALSE get typed values; everything else is text.
fn detect_value(value: &str) -> CellValue {
    if let Ok(n) = value.parse::<f64>() {
        if n.is_finite() {
            return CellValue::Number(n);
        }
    }
    if value.eq_ignore_ascii_case("true") {
        return CellValue::Bool(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return CellValue::Bool(false);
    }
    CellValue::String(value.to_string())
}

/// Split a CSV line respecting quoted fields.
fn split_csv_line(line: &str, sep: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    // Escaped quote
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == sep {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);
    fields
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

    fn at(grid: &SheetGrid, row: u32, col: u32) -> Option<&CellValue> {
        grid.cells
            .iter()
            .find(|c| c.row == row && c.col == col)
            .map(|c| &c.value)
    }

    #[test]
    fn test_parse_csv_basic() {
        let grid = parse_delimited("Name,Age,City\nAlice,30,NYC\nBob,25,LA", Delimiter::Comma);
        assert_eq!(grid.name, "Sheet1");
        assert_eq!(grid.cells.len(), 9);
        assert_eq!(at(&grid, 1, 0), Some(&CellValue::from("Alice")));
        assert_eq!(at(&grid, 1, 1), Some(&CellValue::Number(30.0)));
    }

    #[test]
    fn test_parse_tsv() {
        let text = "A\tB\n1\t2";
        assert_eq!(sniff_delimiter(text), Delimiter::Tab);
        let grid = parse_delimited(text, Delimiter::Tab);
        assert_eq!(grid.cells.len(), 4);
    }

    #[test]
    fn test_sniff_prefers_comma_when_both_present() {
        assert_eq!(sniff_delimiter("a,b\tc\n"), Delimiter::Comma);
        assert_eq!(sniff_delimiter(""), Delimiter::Comma);
    }

    #[test]
    fn test_quoted_csv() {
        let grid = parse_delimited(
            "\"Hello, World\",42\n\"She said \"\"hi\"\"\",0",
            Delimiter::Comma,
        );
        assert_eq!(at(&grid, 0, 0), Some(&CellValue::from("Hello, World")));
        assert_eq!(at(&grid, 1, 0), Some(&CellValue::from("She said \"hi\"")));
    }

    #[test]
    fn test_bom_and_special_tokens() {
        let grid = parse_delimited("\u{feff}flag,n\nTRUE,NaN", Delimiter::Comma);
        assert_eq!(at(&grid, 0, 0), Some(&CellValue::from("flag")));
        assert_eq!(at(&grid, 1, 0), Some(&CellValue::Bool(true)));
        assert_eq!(at(&grid, 1, 1), Some(&CellValue::from("NaN")));
    }

    #[test]
    fn test_empty_csv() {
        let grid = parse_delimited("", Delimiter::Comma);
        assert!(grid.cells.is_empty());
    }
}
