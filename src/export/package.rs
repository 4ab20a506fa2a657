//! Write a fresh XLSX package around generated worksheets.

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

use crate::error::Result;
use crate::types::Tab;
use crate::xml_helpers::xml_escape;

use super::sheet_writer::write_sheet_xml;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const STYLES_XML: &str = concat!(
    r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    r#"<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>"#,
    r#"<fills count="2"><fill><patternFill patternType="none"/></fill>"#,
    r#"<fill><patternFill patternType="gray125"/></fill></fills>"#,
    r#"<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#,
    r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#,
    r#"<cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>"#,
    r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#,
    r#"</styleSheet>"#,
);

/// Zip path of the worksheet for the 0-indexed tab `idx`.
pub(crate) fn worksheet_path(idx: usize) -> String {
    format!("xl/worksheets/sheet{}.xml", idx + 1)
}

/// Build the complete package for `tabs`, one worksheet per tab.
pub(crate) fn write_package(tabs: &[Tab]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut put = |name: &str, body: &str| -> Result<()> {
        writer.start_file(name, options)?;
        writer.write_all(XML_DECL.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.write_all(body.as_bytes())?;
        Ok(())
    };

    put("[Content_Types].xml", &content_types_xml(tabs.len()))?;
    put("_rels/.rels", &root_rels_xml())?;
    put("xl/workbook.xml", &workbook_xml(tabs))?;
    put("xl/_rels/workbook.xml.rels", &workbook_rels_xml(tabs.len()))?;
    put("xl/styles.xml", STYLES_XML)?;

    for (idx, tab) in tabs.iter().enumerate() {
        let xml = write_sheet_xml(tab);
        // The sheet writer emits its own declaration
        writer.start_file(worksheet_path(idx), options)?;
        writer.write_all(xml.as_bytes())?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

fn content_types_xml(sheet_count: usize) -> String {
    let mut out = String::from(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    out.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    out.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    out.push_str(r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
    for idx in 0..sheet_count {
        out.push_str(&format!(
            r#"<Override PartName="/{}" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            worksheet_path(idx)
        ));
    }
    out.push_str(r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#);
    out.push_str("</Types>");
    out
}

fn root_rels_xml() -> String {
    format!(
        r#"<Relationships xmlns="{PKG_REL_NS}"><Relationship Id="rId1" Type="{REL_NS}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
    )
}

fn workbook_xml(tabs: &[Tab]) -> String {
    let mut out = format!(r#"<workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}"><sheets>"#);
    for (idx, tab) in tabs.iter().enumerate() {
        let n = idx + 1;
        out.push_str(&format!(
            r#"<sheet name="{}" sheetId="{n}" r:id="rId{n}"/>"#,
            xml_escape(&tab.title)
        ));
    }
    out.push_str("</sheets></workbook>");
    out
}

/// Worksheets take rId1..=rIdN; styles come after them.
fn workbook_rels_xml(sheet_count: usize) -> String {
    let mut out = format!(r#"<Relationships xmlns="{PKG_REL_NS}">"#);
    for idx in 0..sheet_count {
        let n = idx + 1;
        out.push_str(&format!(
            r#"<Relationship Id="rId{n}" Type="{REL_NS}/worksheet" Target="worksheets/sheet{n}.xml"/>"#
        ));
    }
    out.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="{REL_NS}/styles" Target="styles.xml"/>"#,
        sheet_count + 1
    ));
    out.push_str("</Relationships>");
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_package_has_all_parts() {
        let tabs = vec![
            Tab::new("One", Vec::new(), Vec::new()),
            Tab::new("Two", Vec::new(), Vec::new()),
        ];
        let bytes = write_package(&tabs).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "xl/workbook.xml",
            "xl/_rels/workbook.xml.rels",
            "xl/styles.xml",
            "xl/worksheets/sheet1.xml",
            "xl/worksheets/sheet2.xml",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing {name}");
        }

        let mut workbook = String::new();
        archive
            .by_name("xl/workbook.xml")
            .unwrap()
            .read_to_string(&mut workbook)
            .unwrap();
        assert!(workbook.contains(r#"<sheet name="Two" sheetId="2" r:id="rId2"/>"#));
    }

    #[test]
    fn test_workbook_rels_put_styles_last() {
        let rels = workbook_rels_xml(2);
        assert!(rels.contains(r#"Id="rId2""#));
        assert!(rels.contains(r#"Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles""#));
    }
}
