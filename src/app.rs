//! JavaScript bindings for the two screens.
//!
//! The grid widget, modal chrome and router live in JavaScript; they call
//! into these wrappers for every user action and read state back as plain
//! objects. Every mutating call fires the change callback, if one is set.

use js_sys::Function;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::details::DetailsPage;
use crate::editor::{FormEvent, FormKind};
use crate::export::{data_url, DOWNLOAD_FILE_NAME};
use crate::page::OrderPage;
use crate::parser::ImportOptions;
use crate::store::RecordStore;
use crate::summary::{order_grid_columns, PropertySummary};
use crate::types::Order;

/// Plain JS objects (not `Map`s) so row data can go straight to the grid.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Deserialization error: {e}")))
}

fn notify(callback: Option<&Function>) {
    if let Some(callback) = callback {
        let _ = callback.call0(&JsValue::NULL);
    }
}

/// The order list screen.
#[wasm_bindgen]
pub struct OrderDeskApp {
    page: OrderPage,
    change_callback: Option<Function>,
}

#[wasm_bindgen]
impl OrderDeskApp {
    /// A screen seeded with the demo orders.
    #[wasm_bindgen(constructor)]
    pub fn new() -> OrderDeskApp {
        console_error_panic_hook::set_once();
        Self::with_store(RecordStore::demo())
    }

    /// A screen over the given orders.
    #[wasm_bindgen(js_name = "withOrders")]
    pub fn with_orders(orders: JsValue) -> Result<OrderDeskApp, JsValue> {
        console_error_panic_hook::set_once();
        let orders: Vec<Order> = from_js(orders)?;
        Ok(Self::with_store(RecordStore::with_orders(orders)))
    }

    fn with_store(store: RecordStore) -> OrderDeskApp {
        OrderDeskApp {
            page: OrderPage::new(store),
            change_callback: None,
        }
    }

    /// Called with no arguments after every state change.
    pub fn set_change_callback(&mut self, callback: Option<Function>) {
        self.change_callback = callback;
    }

    fn changed(&self) {
        notify(self.change_callback.as_ref());
    }

    pub fn orders(&self) -> Result<JsValue, JsValue> {
        to_js(self.page.orders())
    }

    /// Column definitions for the order grid.
    pub fn columns(&self) -> Result<JsValue, JsValue> {
        to_js(&order_grid_columns())
    }

    /// The selected order, or `null`.
    pub fn selection(&self) -> Result<JsValue, JsValue> {
        to_js(&self.page.selection().get())
    }

    /// The create draft, or `null` while the form is closed.
    pub fn create_draft(&self) -> Result<JsValue, JsValue> {
        to_js(&self.page.create_draft().map(|d| d.draft()))
    }

    /// The edit draft, or `null` while the form is closed.
    pub fn edit_draft(&self) -> Result<JsValue, JsValue> {
        to_js(&self.page.edit_draft().map(|d| d.draft()))
    }

    pub fn is_create_open(&self) -> bool {
        self.page.is_create_open()
    }

    pub fn is_edit_open(&self) -> bool {
        self.page.is_edit_open()
    }

    /// Required fields left blank in the given form's draft.
    pub fn missing_required(&self, form: &str) -> Result<Vec<String>, JsValue> {
        let form: FormKind = form.parse()?;
        Ok(self
            .page
            .missing_required(form)
            .into_iter()
            .map(|f| f.as_str().to_string())
            .collect())
    }

    pub fn open_create(&mut self) {
        self.page.open_create();
        self.changed();
    }

    pub fn cancel_create(&mut self) {
        self.page.cancel_create();
        self.changed();
    }

    /// Returns the index of the new order.
    pub fn submit_create(&mut self) -> Result<usize, JsValue> {
        let result = self.page.submit_create();
        self.changed();
        Ok(result?.index)
    }

    pub fn open_edit(&mut self) -> Result<(), JsValue> {
        self.page.open_edit()?;
        self.changed();
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.page.cancel_edit();
        self.changed();
    }

    /// Returns the index of the replaced order. The form is closed even on
    /// error.
    pub fn submit_edit(&mut self) -> Result<usize, JsValue> {
        let result = self.page.submit_edit();
        self.changed();
        Ok(result?.index)
    }

    /// Apply a form event object such as
    /// `{ kind: "fieldChange", field: "owner", value: "ESA" }`.
    pub fn form_event(&mut self, form: &str, event: JsValue) -> Result<(), JsValue> {
        let form: FormKind = form.parse()?;
        let event: FormEvent = from_js(event)?;
        self.page.apply_form_event(form, &event)?;
        self.changed();
        Ok(())
    }

    /// Grid selection changed; `row` is an order object or `null`.
    pub fn select(&mut self, row: JsValue) -> Result<(), JsValue> {
        let row: Option<Order> = if row.is_null() || row.is_undefined() {
            None
        } else {
            Some(from_js(row)?)
        };
        self.page.select(row);
        self.changed();
        Ok(())
    }

    pub fn select_by_key(&mut self, key: &str) -> Result<(), JsValue> {
        self.page.select_by_key(key)?;
        self.changed();
        Ok(())
    }

    /// Path to navigate to for a double-clicked row.
    pub fn row_double_clicked(&self, row: JsValue) -> Result<String, JsValue> {
        let row: Order = from_js(row)?;
        Ok(self.page.row_double_clicked(&row).path())
    }

    /// Path of the selected order's detail view.
    pub fn selected_detail_path(&self) -> Result<String, JsValue> {
        Ok(self.page.selected_detail_route()?.path())
    }

    /// Label and tooltip lines for an order's properties cell.
    pub fn property_summary(&self, row: JsValue) -> Result<JsValue, JsValue> {
        let row: Order = from_js(row)?;
        to_js(&PropertySummary::of(&row))
    }
}

impl Default for OrderDeskApp {
    fn default() -> Self {
        Self::new()
    }
}

/// The order detail screen.
#[wasm_bindgen]
pub struct DetailsApp {
    page: DetailsPage,
    change_callback: Option<Function>,
}

#[wasm_bindgen]
impl DetailsApp {
    #[wasm_bindgen(constructor)]
    pub fn new(order_id: &str, union_columns: bool) -> DetailsApp {
        console_error_panic_hook::set_once();
        DetailsApp {
            page: DetailsPage::with_options(order_id, ImportOptions::with_union(union_columns)),
            change_callback: None,
        }
    }

    pub fn set_change_callback(&mut self, callback: Option<Function>) {
        self.change_callback = callback;
    }

    fn changed(&self) {
        notify(self.change_callback.as_ref());
    }

    /// Whole screen state as one object.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.page)
    }

    pub fn tabs(&self) -> Result<JsValue, JsValue> {
        to_js(self.page.tabs())
    }

    pub fn staged_tabs(&self) -> Result<JsValue, JsValue> {
        to_js(self.page.staged_tabs())
    }

    pub fn open_upload(&mut self) {
        self.page.open_upload();
        self.changed();
    }

    /// Import the bytes of a picked file into the upload modal.
    pub fn load_file(&mut self, name: &str, data: &[u8]) -> Result<(), JsValue> {
        let result = self.page.load_file(name, data);
        self.changed();
        Ok(result?)
    }

    pub fn clear_upload(&mut self) {
        self.page.clear_upload();
        self.changed();
    }

    pub fn confirm_upload(&mut self) {
        self.page.confirm_upload();
        self.changed();
    }

    pub fn cancel_upload(&mut self) {
        self.page.cancel_upload();
        self.changed();
    }

    pub fn select_tab(&mut self, index: usize) -> Result<(), JsValue> {
        self.page.select_tab(index)?;
        self.changed();
        Ok(())
    }

    pub fn select_staged_tab(&mut self, index: usize) -> Result<(), JsValue> {
        self.page.select_staged_tab(index)?;
        self.changed();
        Ok(())
    }

    /// Grid cell edit. An empty value clears the cell.
    pub fn set_cell(
        &mut self,
        tab: usize,
        row: usize,
        field: &str,
        value: &str,
    ) -> Result<(), JsValue> {
        self.page.set_cell(tab, row, field, value)?;
        self.changed();
        Ok(())
    }

    /// XLSX bytes of the loaded tabs.
    pub fn download(&self) -> Result<Vec<u8>, JsValue> {
        Ok(self.page.download()?)
    }

    /// The loaded tabs as a `data:` URL, for an `<a download>` link.
    pub fn download_url(&self) -> Result<String, JsValue> {
        Ok(data_url(&self.page.download()?))
    }

    pub fn download_file_name(&self) -> String {
        DOWNLOAD_FILE_NAME.to_string()
    }
}

/// Import workbook bytes and return the tabs.
#[wasm_bindgen]
pub fn import_tabs(data: &[u8], union_columns: bool) -> Result<JsValue, JsValue> {
    let options = ImportOptions::with_union(union_columns);
    let tabs = crate::parser::import_workbook(data, &options)?;
    to_js(&tabs)
}

/// Export tab objects to XLSX bytes.
#[wasm_bindgen]
pub fn export_tabs(tabs: JsValue) -> Result<Vec<u8>, JsValue> {
    let tabs: Vec<crate::types::Tab> = from_js(tabs)?;
    Ok(crate::export::export_workbook(&tabs)?)
}

/// Install the panic hook that forwards Rust panics to `console.error`.
#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}
