//! State of the order detail screen: imported tabs and the upload modal.
//!
//! A file is first imported into the staged tabs shown inside the upload
//! modal. Confirming moves them to the page. Cell edits made in the grid are
//! written back into the page tabs and exported on download.

use serde::Serialize;

use crate::error::{OrderdeskError, Result};
use crate::export::export_workbook;
use crate::parser::{import_workbook, ImportOptions};
use crate::types::{CellValue, Tab};

/// The order detail screen for one order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsPage {
    order_id: String,
    staged_tabs: Vec<Tab>,
    staged_file_name: Option<String>,
    tabs: Vec<Tab>,
    file_name: Option<String>,
    active_tab: usize,
    active_staged_tab: usize,
    upload_open: bool,
    #[serde(skip)]
    options: ImportOptions,
}

impl DetailsPage {
    pub fn new(order_id: impl Into<String>) -> Self {
        Self::with_options(order_id, ImportOptions::default())
    }

    pub fn with_options(order_id: impl Into<String>, options: ImportOptions) -> Self {
        Self {
            order_id: order_id.into(),
            options,
            ..Self::default()
        }
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn staged_tabs(&self) -> &[Tab] {
        &self.staged_tabs
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn staged_file_name(&self) -> Option<&str> {
        self.staged_file_name.as_deref()
    }

    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    pub fn active_staged_tab(&self) -> usize {
        self.active_staged_tab
    }

    pub fn is_upload_open(&self) -> bool {
        self.upload_open
    }

    /// Open the upload modal with nothing staged.
    pub fn open_upload(&mut self) {
        tracing::debug!(order = %self.order_id, "open upload");
        self.clear_upload();
        self.upload_open = true;
    }

    /// Import `bytes` into the staged tabs. A later call replaces the result
    /// of an earlier one.
    ///
    /// # Errors
    /// Returns the import error; the staged tabs are left empty.
    pub fn load_file(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.upload_open = true;
        self.staged_file_name = Some(name.to_string());
        self.active_tab = 0;
        self.active_staged_tab = 0;

        match import_workbook(bytes, &self.options) {
            Ok(tabs) => {
                tracing::info!(file = name, tabs = tabs.len(), "staged upload");
                self.staged_tabs = tabs;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(file = name, error = %e, "upload could not be imported");
                self.staged_tabs.clear();
                Err(e)
            }
        }
    }

    /// Drop the staged file.
    pub fn clear_upload(&mut self) {
        self.staged_file_name = None;
        self.staged_tabs.clear();
        self.active_staged_tab = 0;
    }

    /// Make the staged tabs the page tabs and close the modal.
    pub fn confirm_upload(&mut self) {
        tracing::info!(
            order = %self.order_id,
            tabs = self.staged_tabs.len(),
            "confirmed upload"
        );
        self.tabs = self.staged_tabs.clone();
        self.file_name = self.staged_file_name.clone();
        self.active_tab = 0;
        self.upload_open = false;
    }

    /// Close the modal, keeping whatever is staged.
    pub fn cancel_upload(&mut self) {
        self.upload_open = false;
    }

    pub fn select_tab(&mut self, index: usize) -> Result<()> {
        check_tab(index, self.tabs.len())?;
        self.active_tab = index;
        Ok(())
    }

    pub fn select_staged_tab(&mut self, index: usize) -> Result<()> {
        check_tab(index, self.staged_tabs.len())?;
        self.active_staged_tab = index;
        Ok(())
    }

    /// Write a grid edit back into a page tab. An empty value removes the
    /// field from the row.
    pub fn set_cell(&mut self, tab: usize, row: usize, field: &str, value: &str) -> Result<()> {
        let len = self.tabs.len();
        let target = self.tabs.get_mut(tab).ok_or_else(|| {
            tracing::warn!(index = tab, len, "cell edit on missing tab");
            OrderdeskError::TabIndexOutOfRange { index: tab, len }
        })?;

        let rows = target.rows.len();
        let record = target.rows.get_mut(row).ok_or_else(|| {
            tracing::warn!(index = row, len = rows, "cell edit on missing row");
            OrderdeskError::RowIndexOutOfRange {
                index: row,
                len: rows,
            }
        })?;

        if value.is_empty() {
            record.remove(field);
        } else {
            record.insert(field, CellValue::from(value));
        }
        Ok(())
    }

    /// XLSX bytes of the page tabs.
    ///
    /// # Errors
    /// [`OrderdeskError::NothingToExport`] when no tabs are loaded.
    pub fn download(&self) -> Result<Vec<u8>> {
        export_workbook(&self.tabs)
    }
}

fn check_tab(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        tracing::warn!(index, len, "tab index out of range");
        Err(OrderdeskError::TabIndexOutOfRange { index, len })
    }
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

    const CSV: &[u8] = b"part,qty\nbolt,4\nnut,10\n";

    #[test]
    fn test_upload_confirm_flow() {
        let mut page = DetailsPage::new("order1");
        page.open_upload();
        assert!(page.is_upload_open());
        page.load_file("parts.csv", CSV).unwrap();
        assert_eq!(page.staged_tabs().len(), 1);
        assert!(page.tabs().is_empty());

        page.confirm_upload();
        assert!(!page.is_upload_open());
        assert_eq!(page.file_name(), Some("parts.csv"));
        assert_eq!(page.tabs()[0].rows.len(), 2);
        assert_eq!(page.active_tab(), 0);
    }

    #[test]
    fn test_last_load_wins() {
        let mut page = DetailsPage::new("order1");
        page.load_file("a.csv", b"x\n1\n").unwrap();
        page.load_file("b.csv", CSV).unwrap();
        assert_eq!(page.staged_file_name(), Some("b.csv"));
        assert_eq!(page.staged_tabs()[0].columns[0].field, "part");
    }

    #[test]
    fn test_failed_load_clears_staged() {
        let mut page = DetailsPage::new("order1");
        page.load_file("a.csv", CSV).unwrap();
        assert!(page.load_file("bad.xlsx", &[0x50, 0x4b, 0x03, 0x04, 0xff]).is_err());
        assert!(page.staged_tabs().is_empty());
    }

    #[test]
    fn test_cancel_keeps_staged_and_clear_drops_it() {
        let mut page = DetailsPage::new("order1");
        page.load_file("a.csv", CSV).unwrap();
        page.cancel_upload();
        assert!(!page.is_upload_open());
        assert_eq!(page.staged_tabs().len(), 1);
        page.clear_upload();
        assert!(page.staged_tabs().is_empty());
        assert_eq!(page.staged_file_name(), None);
    }

    #[test]
    fn test_select_tab_bounds() {
        let mut page = DetailsPage::new("order1");
        assert!(matches!(
            page.select_tab(0),
            Err(OrderdeskError::TabIndexOutOfRange { index: 0, len: 0 })
        ));
        page.load_file("a.csv", CSV).unwrap();
        page.select_staged_tab(0).unwrap();
        assert!(page.select_staged_tab(1).is_err());
    }

    #[test]
    fn test_set_cell_writes_and_removes() {
        let mut page = DetailsPage::new("order1");
        page.load_file("a.csv", CSV).unwrap();
        page.confirm_upload();

        page.set_cell(0, 1, "qty", "12").unwrap();
        assert_eq!(page.tabs()[0].rows[1].get("qty"), Some(&CellValue::from("12")));
        page.set_cell(0, 0, "part", "").unwrap();
        assert_eq!(page.tabs()[0].rows[0].get("part"), None);

        assert!(matches!(
            page.set_cell(0, 5, "qty", "1"),
            Err(OrderdeskError::RowIndexOutOfRange { index: 5, len: 2 })
        ));
        assert!(matches!(
            page.set_cell(3, 0, "qty", "1"),
            Err(OrderdeskError::TabIndexOutOfRange { index: 3, len: 1 })
        ));
    }

    #[test]
    fn test_download_needs_tabs() {
        let mut page = DetailsPage::new("order1");
        assert!(matches!(
            page.download(),
            Err(OrderdeskError::NothingToExport)
        ));
        page.load_file("a.csv", CSV).unwrap();
        page.confirm_upload();
        let bytes = page.download().unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
