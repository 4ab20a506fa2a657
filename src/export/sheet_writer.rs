//! Generates worksheet XML from a [`Tab`].
//!
//! Strings are written as inline strings (`t="inlineStr"`) so the package
//! needs no shared string table.

use std::collections::HashMap;

use crate::cell_ref::{cell_ref, col_to_letter};
use crate::types::{CellValue, Tab};
use crate::xml_helpers::xml_escape;

/// Write a complete worksheet XML string for `tab`.
///
/// Row 1 holds the union of the rows' keys in first-seen order; each row
/// follows with its values under the matching header.
pub(crate) fn write_sheet_xml(tab: &Tab) -> String {
    let headers = tab.field_union();
    let column_of: HashMap<&str, u32> = headers
        .iter()
        .enumerate()
        .filter_map(|(col, header)| Some((header.as_str(), u32::try_from(col).ok()?)))
        .collect();

    let mut out = String::with_capacity(4096);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
    );
    out.push_str(
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );
    out.push('\n');

    // <dimension>
    if !headers.is_empty() {
        let last_col = u32::try_from(headers.len() - 1).unwrap_or(u32::MAX);
        let last_row = tab.rows.len() + 1;
        out.push_str(&format!(
            "<dimension ref=\"A1:{}{}\"/>\n",
            col_to_letter(last_col),
            last_row
        ));
    }

    out.push_str("<sheetData>\n");
    if !headers.is_empty() {
        write_header_row(&mut out, &headers);
        for (idx, row) in tab.rows.iter().enumerate() {
            let Ok(r) = u32::try_from(idx + 1) else {
                break;
            };
            out.push_str(&format!("<row r=\"{}\">", u64::from(r) + 1));
            let mut cells: Vec<(u32, &CellValue)> = row
                .iter()
                .filter_map(|(key, value)| column_of.get(key).map(|&c| (c, value)))
                .collect();
            cells.sort_unstable_by_key(|&(c, _)| c);
            for (c, value) in cells {
                write_cell(&mut out, r, c, value);
            }
            out.push_str("</row>\n");
        }
    }
    out.push_str("</sheetData>\n");

    out.push_str("</worksheet>");
    out
}

fn write_header_row(out: &mut String, headers: &[String]) {
    out.push_str("<row r=\"1\">");
    for (col, header) in headers.iter().enumerate() {
        let Ok(c) = u32::try_from(col) else {
            break;
        };
        write_inline_string(out, &cell_ref(0, c), header);
    }
    out.push_str("</row>\n");
}

/// Write a single `<c>` element.
fn write_cell(out: &mut String, row: u32, col: u32, value: &CellValue) {
    let r = cell_ref(row, col);
    match value {
        CellValue::String(s) => write_inline_string(out, &r, s),
        CellValue::Number(n) if n.is_finite() => {
            out.push_str(&format!("<c r=\"{r}\"><v>{n}</v></c>"));
        }
        // NaN and infinities have no numeric cell form
        CellValue::Number(n) => write_inline_string(out, &r, &n.to_string()),
        CellValue::Bool(b) => {
            let v = if *b { "1" } else { "0" };
            out.push_str(&format!("<c r=\"{r}\" t=\"b\"><v>{v}</v></c>"));
        }
    }
}

fn write_inline_string(out: &mut String, r: &str, text: &str) {
    out.push_str(&format!("<c r=\"{r}\" t=\"inlineStr\"><is><t"));
    if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
        out.push_str(" xml:space=\"preserve\"");
    }
    out.push('>');
    out.push_str(&xml_escape(text));
    out.push_str("</t></is></c>");
}
