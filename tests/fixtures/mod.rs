//! Test fixtures for generating valid XLSX files in memory.
//!
//! Builders for creating workbooks with known cell contents, used to drive
//! the importer with inputs shaped like real spreadsheet exports.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixtures::XlsxBuilder;
//!
//! let xlsx = XlsxBuilder::new()
//!     .add_sheet("Parts")
//!     .add_cell("A1", "part")
//!     .add_cell("A2", "bolt")
//!     .build();
//!
//! let tabs = orderdesk::import_workbook(&xlsx, &Default::default()).unwrap();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation
)]

use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

// ============================================================================
// Cell Value
// ============================================================================

/// Represents a cell value that can be added to a sheet.
#[derive(Debug, Clone)]
pub enum CellValue {
    /// A string stored in the shared string table.
    String(String),
    /// A numeric value.
    Number(f64),
    /// A boolean value.
    Boolean(bool),
    /// An error value (e.g., "#DIV/0!").
    Error(String),
    /// An inline string (not shared).
    InlineString(String),
    /// A formula with a cached string result (`t="str"`).
    FormulaString { formula: String, cached: String },
    /// An empty cell (style only).
    Empty,
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

// ============================================================================
// Sheet Builder
// ============================================================================

/// A cell entry in a sheet.
#[derive(Debug, Clone)]
pub struct CellEntry {
    pub cell_ref: String,
    pub value: CellValue,
}

/// Builder for a single worksheet.
#[derive(Debug, Clone, Default)]
pub struct SheetBuilder {
    pub name: String,
    pub cells: Vec<CellEntry>,
    /// Leave out `r` on rows and cells, as some writers do.
    pub omit_refs: bool,
}

impl SheetBuilder {
    /// Create a new sheet builder with the given name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Add a cell with a value.
    #[must_use]
    pub fn cell<V: Into<CellValue>>(mut self, cell_ref: &str, value: V) -> Self {
        self.cells.push(CellEntry {
            cell_ref: cell_ref.to_string(),
            value: value.into(),
        });
        self
    }

    /// Add a whole row of values starting at column A.
    #[must_use]
    pub fn row<V: Into<CellValue> + Clone>(mut self, row: u32, values: &[V]) -> Self {
        for (i, v) in values.iter().enumerate() {
            let cell_ref = format!("{}{}", col_num_to_letter(i as u32 + 1), row);
            self = self.cell(&cell_ref, v.clone());
        }
        self
    }

    /// Write rows and cells without `r` attributes.
    #[must_use]
    pub fn without_refs(mut self) -> Self {
        self.omit_refs = true;
        self
    }
}

// ============================================================================
// XLSX Builder
// ============================================================================

/// Builder for creating complete XLSX files.
#[derive(Debug, Default)]
pub struct XlsxBuilder {
    sheets: Vec<SheetBuilder>,
    /// Store worksheets under `xl/worksheets/data{N}.xml` so they can only be
    /// found through the workbook relationships.
    custom_sheet_paths: bool,
}

impl XlsxBuilder {
    /// Create a new XLSX builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new sheet.
    #[must_use]
    pub fn sheet(mut self, sheet: SheetBuilder) -> Self {
        self.sheets.push(sheet);
        self
    }

    /// Add a simple sheet by name (returns a builder for chaining).
    #[must_use]
    pub fn add_sheet(self, name: &str) -> XlsxSheetAdder {
        XlsxSheetAdder {
            builder: self,
            sheet: SheetBuilder::new(name),
        }
    }

    /// Use non-conventional worksheet part names.
    #[must_use]
    pub fn custom_sheet_paths(mut self) -> Self {
        self.custom_sheet_paths = true;
        self
    }

    fn sheet_target(&self, index: usize) -> String {
        if self.custom_sheet_paths {
            format!("worksheets/data{}.xml", index + 1)
        } else {
            format!("worksheets/sheet{}.xml", index + 1)
        }
    }

    /// Build the XLSX file as bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let cursor = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(cursor);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        // Collect shared strings
        let mut shared_strings: Vec<String> = Vec::new();
        for sheet in &self.sheets {
            for cell in &sheet.cells {
                if let CellValue::String(ref s) = cell.value {
                    if !shared_strings.contains(s) {
                        shared_strings.push(s.clone());
                    }
                }
            }
        }

        let targets: Vec<String> = (0..self.sheets.len())
            .map(|i| self.sheet_target(i))
            .collect();

        let _ = zip.start_file("[Content_Types].xml", options);
        let _ = zip.write_all(generate_content_types(&targets).as_bytes());

        let _ = zip.start_file("_rels/.rels", options);
        let _ = zip.write_all(generate_rels().as_bytes());

        let _ = zip.start_file("xl/_rels/workbook.xml.rels", options);
        let _ = zip.write_all(generate_workbook_rels(&targets).as_bytes());

        let _ = zip.start_file("xl/workbook.xml", options);
        let _ = zip.write_all(generate_workbook(&self.sheets).as_bytes());

        if !shared_strings.is_empty() {
            let _ = zip.start_file("xl/sharedStrings.xml", options);
            let _ = zip.write_all(generate_shared_strings(&shared_strings).as_bytes());
        }

        for (sheet, target) in self.sheets.iter().zip(&targets) {
            let _ = zip.start_file(format!("xl/{target}"), options);
            let _ = zip.write_all(generate_sheet_xml(sheet, &shared_strings).as_bytes());
        }

        let cursor = zip.finish().expect("Failed to finish ZIP");
        cursor.into_inner()
    }
}

/// Helper for fluent sheet building within `XlsxBuilder`.
pub struct XlsxSheetAdder {
    builder: XlsxBuilder,
    sheet: SheetBuilder,
}

impl XlsxSheetAdder {
    /// Add a cell to the current sheet.
    #[must_use]
    pub fn add_cell<V: Into<CellValue>>(mut self, cell_ref: &str, value: V) -> Self {
        self.sheet = self.sheet.cell(cell_ref, value);
        self
    }

    /// Add a row to the current sheet.
    #[must_use]
    pub fn add_row<V: Into<CellValue> + Clone>(mut self, row: u32, values: &[V]) -> Self {
        self.sheet = self.sheet.row(row, values);
        self
    }

    /// Finish the current sheet and return the builder.
    #[must_use]
    pub fn done(mut self) -> XlsxBuilder {
        self.builder.sheets.push(self.sheet);
        self.builder
    }

    /// Build the XLSX directly (finishes the current sheet automatically).
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.done().build()
    }
}

// ============================================================================
// XML Generation
// ============================================================================

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Generate [Content_Types].xml
fn generate_content_types(targets: &[String]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#);

    for target in targets {
        xml.push_str(&format!(
            r#"<Override PartName="/xl/{target}" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
    }

    xml.push_str("</Types>");
    xml
}

/// Generate _rels/.rels
fn generate_rels() -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    xml.push_str(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#);
    xml.push_str("</Relationships>");
    xml
}

/// Generate xl/_rels/workbook.xml.rels
///
/// Shared strings get rId1 so sheet ids do not line up with sheet order.
fn generate_workbook_rels(targets: &[String]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    xml.push_str(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#);

    for (i, target) in targets.iter().enumerate() {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="{}"/>"#,
            i + 2,
            target
        ));
    }

    xml.push_str("</Relationships>");
    xml
}

/// Generate xl/workbook.xml
fn generate_workbook(sheets: &[SheetBuilder]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);
    xml.push_str("<sheets>");

    for (i, sheet) in sheets.iter().enumerate() {
        xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape_xml(&sheet.name),
            i + 1,
            i + 2
        ));
    }

    xml.push_str("</sheets>");
    xml.push_str("</workbook>");
    xml
}

/// Generate xl/sharedStrings.xml
fn generate_shared_strings(strings: &[String]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(&format!(
        r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{}" uniqueCount="{}">"#,
        strings.len(),
        strings.len()
    ));

    for s in strings {
        xml.push_str(&format!(
            r#"<si><t xml:space="preserve">{}</t></si>"#,
            escape_xml(s)
        ));
    }

    xml.push_str("</sst>");
    xml
}

/// Convert column number (1-indexed) to letter(s).
fn col_num_to_letter(col: u32) -> String {
    let mut result = String::new();
    let mut n = col;
    while n > 0 {
        n -= 1;
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    if result.is_empty() {
        result.push('A');
    }
    result
}

/// Parse a cell reference like "A1" into (col, row) as 1-indexed.
fn parse_cell_ref(cell_ref: &str) -> (u32, u32) {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut in_letters = true;

    for c in cell_ref.chars() {
        if in_letters && c.is_ascii_alphabetic() {
            col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        } else {
            in_letters = false;
            if let Some(d) = c.to_digit(10) {
                row = row * 10 + d;
            }
        }
    }

    (col, row)
}

/// Generate a sheet XML file
fn generate_sheet_xml(sheet: &SheetBuilder, shared_strings: &[String]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );
    xml.push_str("<sheetData>");

    // Group cells by row, ordered by column
    let mut rows: BTreeMap<u32, BTreeMap<u32, &CellEntry>> = BTreeMap::new();
    for cell in &sheet.cells {
        let (col, row) = parse_cell_ref(&cell.cell_ref);
        rows.entry(row).or_default().insert(col, cell);
    }

    for (row_num, cells) in rows {
        if sheet.omit_refs {
            xml.push_str("<row>");
        } else {
            xml.push_str(&format!(r#"<row r="{row_num}">"#));
        }

        for cell in cells.values() {
            let mut cell_attrs = if sheet.omit_refs {
                String::new()
            } else {
                format!(r#" r="{}""#, cell.cell_ref)
            };

            match &cell.value {
                CellValue::String(s) => {
                    let idx = shared_strings.iter().position(|x| x == s).unwrap_or(0);
                    cell_attrs.push_str(r#" t="s""#);
                    xml.push_str(&format!(r#"<c{cell_attrs}><v>{idx}</v></c>"#));
                }
                CellValue::Number(n) => {
                    xml.push_str(&format!(r#"<c{cell_attrs}><v>{n}</v></c>"#));
                }
                CellValue::Boolean(b) => {
                    cell_attrs.push_str(r#" t="b""#);
                    let v = if *b { "1" } else { "0" };
                    xml.push_str(&format!(r#"<c{cell_attrs}><v>{v}</v></c>"#));
                }
                CellValue::Error(e) => {
                    cell_attrs.push_str(r#" t="e""#);
                    xml.push_str(&format!(r#"<c{cell_attrs}><v>{}</v></c>"#, escape_xml(e)));
                }
                CellValue::InlineString(s) => {
                    cell_attrs.push_str(r#" t="inlineStr""#);
                    xml.push_str(&format!(
                        r#"<c{cell_attrs}><is><t>{}</t></is></c>"#,
                        escape_xml(s)
                    ));
                }
                CellValue::FormulaString { formula, cached } => {
                    cell_attrs.push_str(r#" t="str""#);
                    xml.push_str(&format!(
                        r#"<c{cell_attrs}><f>{}</f><v>{}</v></c>"#,
                        escape_xml(formula),
                        escape_xml(cached)
                    ));
                }
                CellValue::Empty => {
                    xml.push_str(&format!(r#"<c{cell_attrs} s="1"/>"#));
                }
            }
        }

        xml.push_str("</row>");
    }

    xml.push_str("</sheetData>");
    xml.push_str("</worksheet>");
    xml
}

// ============================================================================
// Convenience Functions
// ============================================================================

/// A workbook with one empty sheet.
#[must_use]
pub fn minimal_xlsx() -> Vec<u8> {
    XlsxBuilder::new().add_sheet("Sheet1").build()
}

/// A package list like the one an order detail upload carries.
#[must_use]
pub fn packages_xlsx() -> Vec<u8> {
    XlsxBuilder::new()
        .add_sheet("Packages")
        .add_row(1, &["package", "weight", "fragile"])
        .add_cell("A2", "crate-1")
        .add_cell("B2", 12.5)
        .add_cell("C2", true)
        .add_cell("A3", "crate-2")
        .add_cell("B3", 3)
        .done()
        .add_sheet("Notes")
        .add_row(1, &["note"])
        .add_cell("A2", CellValue::InlineString("handle with care".into()))
        .build()
}
