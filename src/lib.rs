//! orderdesk - order management screens for the web
//!
//! The state model behind two screens, compiled to WebAssembly and driven by
//! a JavaScript grid/modal UI:
//! - An order list with create and edit forms. Orders carry a list of
//!   user-defined key/value/type properties.
//! - An order detail view that imports spreadsheet tabs from XLSX or CSV,
//!   lets cells be edited, and exports them back to XLSX.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { OrderDeskApp, DetailsApp } from 'orderdesk';
//! await init();
//! const app = new OrderDeskApp();
//! app.open_create();
//! app.form_event("create", { kind: "fieldChange", field: "owner", value: "ESA" });
//! app.submit_create();
//!
//! const details = new DetailsApp("order1", false);
//! details.load_file(file.name, new Uint8Array(await file.arrayBuffer()));
//! details.confirm_upload();
//! ```

// Order list
pub mod editor;
pub mod error;
pub mod navigation;
pub mod page;
pub mod store;
pub mod summary;
pub mod types;

// Spreadsheet import/export
pub mod cell_ref;
mod csv;
pub mod details;
pub mod export;
pub mod parser;
pub mod xml_helpers;

// JavaScript bindings
pub mod app;

use wasm_bindgen::prelude::*;

pub use app::{DetailsApp, OrderDeskApp};
pub use details::DetailsPage;
pub use editor::{CreateDraft, DraftController, EditDraft, FormEvent, FormKind};
pub use error::{OrderdeskError, Result};
pub use export::{export_workbook, DOWNLOAD_FILE_NAME, XLSX_MIME_TYPE};
pub use navigation::Route;
pub use page::OrderPage;
pub use parser::{import_workbook, ColumnPolicy, ImportOptions};
pub use store::RecordStore;
pub use types::*;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
