//! Worksheet parsing - reads the cell values of one sheet part.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{BufReader, Read, Seek};
use zip::ZipArchive;

use crate::cell_ref::parse_cell_ref_bytes;
use crate::error::Result;
use crate::types::CellValue;

use super::relationships::SheetInfo;
use super::{GridCell, SheetGrid};

/// Cell type tag from the `t` attribute of a `<c>` element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum CellTypeTag {
    Shared,
    Inline,
    Str,
    Bool,
    Error,
    Date,
    Number,
}

pub(super) fn parse_cell_type_tag(value: &[u8]) -> CellTypeTag {
    match value {
        b"s" => CellTypeTag::Shared,
        b"b" => CellTypeTag::Bool,
        b"e" => CellTypeTag::Error,
        b"str" => CellTypeTag::Str,
        b"inlineStr" => CellTypeTag::Inline,
        b"d" => CellTypeTag::Date,
        _ => CellTypeTag::Number,
    }
}

pub(super) fn parse_u32_bytes(value: &[u8]) -> Option<u32> {
    let mut num: u32 = 0;
    let mut seen = false;
    for &b in value {
        if !b.is_ascii_digit() {
            return None;
        }
        seen = true;
        num = num.saturating_mul(10).saturating_add(u32::from(b - b'0'));
    }
    if seen {
        Some(num)
    } else {
        None
    }
}

/// Turn the raw text of a cell into a value according to its type tag.
///
/// Returns `None` for cells that hold nothing usable (e.g. a shared string
/// index past the end of the table, or an empty numeric cell).
pub(super) fn resolve_cell_value(
    tag: CellTypeTag,
    raw: &str,
    shared_strings: &[String],
) -> Option<CellValue> {
    match tag {
        CellTypeTag::Shared => {
            let idx: usize = raw.trim().parse().ok()?;
            shared_strings.get(idx).cloned().map(CellValue::String)
        }
        CellTypeTag::Inline | CellTypeTag::Str | CellTypeTag::Error | CellTypeTag::Date => {
            Some(CellValue::String(raw.to_string()))
        }
        CellTypeTag::Bool => {
            let v = raw.trim();
            Some(CellValue::Bool(v == "1" || v.eq_ignore_ascii_case("true")))
        }
        CellTypeTag::Number => {
            let v = raw.trim();
            if v.is_empty() {
                return None;
            }
            Some(
                v.parse::<f64>()
                    .map(CellValue::Number)
                    .unwrap_or_else(|_| CellValue::String(v.to_string())),
            )
        }
    }
}

/// A `<c>` element whose value is still being read.
struct PendingCell {
    row: u32,
    col: u32,
    tag: CellTypeTag,
    has_value: bool,
}

/// Parse a single worksheet into its non-empty cells, in document order.
pub(super) fn parse_sheet<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    info: &SheetInfo,
    shared_strings: &[String],
) -> Result<SheetGrid> {
    let file = archive.by_name(&info.path)?;

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut grid = SheetGrid {
        name: info.name.clone(),
        cells: Vec::new(),
    };

    let mut buf = Vec::new();
    let mut text = String::new();
    let mut pending: Option<PendingCell> = None;
    let mut next_row: u32 = 0;
    let mut current_row: u32 = 0;
    let mut next_col: u32 = 0;
    let mut in_is = false;
    let mut in_text = false;

    loop {
        match xml.read_event_into(&mut buf)? {
            ref event @ (Event::Start(_) | Event::Empty(_)) => {
                let (Event::Start(ref e) | Event::Empty(ref e)) = event else {
                    continue;
                };
                let is_start_event = matches!(event, Event::Start(_));

                match e.local_name().as_ref() {
                    b"row" => {
                        // `r` is 1-based; rows without it follow the previous one
                        current_row = e
                            .attributes()
                            .flatten()
                            .find(|a| a.key.as_ref() == b"r")
                            .and_then(|a| parse_u32_bytes(&a.value))
                            .and_then(|r| r.checked_sub(1))
                            .unwrap_or(next_row);
                        next_row = current_row.saturating_add(1);
                        next_col = 0;
                    }
                    b"c" => {
                        let mut position: Option<(u32, u32)> = None;
                        let mut tag = CellTypeTag::Number;

                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"r" => position = parse_cell_ref_bytes(&attr.value),
                                b"t" => tag = parse_cell_type_tag(&attr.value),
                                _ => {}
                            }
                        }

                        let (col, row) = position.unwrap_or((next_col, current_row));
                        next_col = col.saturating_add(1);

                        // Self-closing cells like <c r="A1" s="2"/> carry no value
                        if is_start_event {
                            text.clear();
                            pending = Some(PendingCell {
                                row,
                                col,
                                tag,
                                has_value: false,
                            });
                        }
                    }
                    b"v" if is_start_event => {
                        if let Some(cell) = pending.as_mut() {
                            cell.has_value = true;
                            in_text = true;
                        }
                    }
                    b"v" => {
                        if let Some(cell) = pending.as_mut() {
                            cell.has_value = true;
                        }
                    }
                    b"is" => {
                        if let Some(cell) = pending.as_mut() {
                            cell.has_value = true;
                        }
                        in_is = is_start_event;
                    }
                    b"t" if in_is && is_start_event => in_text = true,
                    _ => {}
                }
            }
            Event::Text(ref e) if in_text => {
                text.push_str(&e.unescape()?);
            }
            Event::CData(ref e) if in_text => {
                text.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"v" | b"t" => in_text = false,
                b"is" => in_is = false,
                b"c" => {
                    if let Some(cell) = pending.take() {
                        if cell.has_value {
                            if let Some(value) =
                                resolve_cell_value(cell.tag, &text, shared_strings)
                            {
                                grid.cells.push(GridCell {
                                    row: cell.row,
                                    col: cell.col,
                                    value,
                                });
                            }
                        }
                    }
                    in_text = false;
                    in_is = false;
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    tracing::debug!(sheet = %grid.name, cells = grid.cells.len(), "parsed worksheet");
    Ok(grid)
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
    use test_case::test_case;

    #[test_case(CellTypeTag::Number, "42.5", Some(CellValue::Number(42.5)))]
    #[test_case(CellTypeTag::Number, "  ", None)]
    #[test_case(CellTypeTag::Number, "n/a", Some(CellValue::String("n/a".into())))]
    #[test_case(CellTypeTag::Bool, "1", Some(CellValue::Bool(true)))]
    #[test_case(CellTypeTag::Bool, "0", Some(CellValue::Bool(false)))]
    #[test_case(CellTypeTag::Error, "#DIV/0!", Some(CellValue::String("#DIV/0!".into())))]
    #[test_case(CellTypeTag::Inline, "", Some(CellValue::String(String::new())))]
    #[test_case(CellTypeTag::Shared, "1", Some(CellValue::String("second".into())))]
    #[test_case(CellTypeTag::Shared, "9", None)]
    fn test_resolve_cell_value(tag: CellTypeTag, raw: &str, expected: Option<CellValue>) {
        let shared = vec!["first".to_string(), "second".to_string()];
        assert_eq!(resolve_cell_value(tag, raw, &shared), expected);
    }

    #[test]
    fn test_parse_cell_type_tag() {
        assert_eq!(parse_cell_type_tag(b"s"), CellTypeTag::Shared);
        assert_eq!(parse_cell_type_tag(b"inlineStr"), CellTypeTag::Inline);
        assert_eq!(parse_cell_type_tag(b"n"), CellTypeTag::Number);
    }

    #[test]
    fn test_parse_u32_bytes() {
        assert_eq!(parse_u32_bytes(b"17"), Some(17));
        assert_eq!(parse_u32_bytes(b""), None);
        assert_eq!(parse_u32_bytes(b"1a"), None);
    }
}
