//! XLSX export pipeline.
//!
//! Builds a new workbook package from tabs: one worksheet per tab, named
//! after the tab title.

mod package;
pub(crate) mod sheet_writer;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::collections::HashSet;

use crate::error::{OrderdeskError, Result};
use crate::types::Tab;

/// File name offered for downloads of exported tabs.
pub const DOWNLOAD_FILE_NAME: &str = "download.xlsx";

/// MIME type of XLSX packages.
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Longest worksheet name a workbook accepts.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const FORBIDDEN_SHEET_CHARS: [char; 7] = ['\\', '/', '?', '*', '[', ']', ':'];

/// Serialize `tabs` into XLSX bytes.
///
/// # Errors
/// Returns [`OrderdeskError::NothingToExport`] for an empty tab list and
/// [`OrderdeskError::InvalidSheetName`] if any title cannot name a worksheet.
pub fn export_workbook(tabs: &[Tab]) -> Result<Vec<u8>> {
    if tabs.is_empty() {
        tracing::warn!("export requested with no tabs");
        return Err(OrderdeskError::NothingToExport);
    }
    validate_sheet_names(tabs)?;

    let bytes = package::write_package(tabs)?;
    tracing::info!(tabs = tabs.len(), bytes = bytes.len(), "exported workbook");
    Ok(bytes)
}

/// Check one worksheet name: 1..=31 characters, none of `\ / ? * [ ] :`.
pub fn validate_sheet_name(name: &str) -> Result<()> {
    let invalid = |reason| OrderdeskError::InvalidSheetName {
        name: name.to_string(),
        reason,
    };

    let len = name.chars().count();
    if len == 0 {
        return Err(invalid("name is empty"));
    }
    if len > MAX_SHEET_NAME_LEN {
        return Err(invalid("name is longer than 31 characters"));
    }
    if name.contains(FORBIDDEN_SHEET_CHARS) {
        return Err(invalid("name contains one of \\ / ? * [ ] :"));
    }
    Ok(())
}

/// Check every tab title, and that no two titles differ only by case.
pub fn validate_sheet_names(tabs: &[Tab]) -> Result<()> {
    let mut seen: HashSet<String> = HashSet::with_capacity(tabs.len());
    for tab in tabs {
        validate_sheet_name(&tab.title)?;
        if !seen.insert(tab.title.to_lowercase()) {
            return Err(OrderdeskError::InvalidSheetName {
                name: tab.title.clone(),
                reason: "name is used by another sheet",
            });
        }
    }
    Ok(())
}

/// `data:` URL carrying XLSX bytes, for handing a download to the browser.
pub fn data_url(bytes: &[u8]) -> String {
    format!("data:{XLSX_MIME_TYPE};base64,{}", BASE64.encode(bytes))
}
