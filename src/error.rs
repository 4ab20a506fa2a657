//! Structured error types for orderdesk.
//!
//! Every fallible operation in the crate returns [`Result`]. None of these
//! errors are fatal: callers report them and keep the page state as it was.

/// All errors that can occur while editing orders or moving tabs in and out
/// of spreadsheets.
#[derive(Debug, thiserror::Error)]
pub enum OrderdeskError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// General parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A property list index outside `0..len`.
    #[error("property index {index} out of range (len {len})")]
    PropertyIndexOutOfRange { index: usize, len: usize },

    /// Attempt to change a field the draft does not allow to change.
    #[error("field `{0}` is read-only in this form")]
    ReadOnlyField(&'static str),

    /// A field name that is neither an order field nor a property field.
    #[error("unknown field `{0}`")]
    UnknownField(String),

    /// A property type tag other than `string` or `number`.
    #[error("unknown property type `{0}`")]
    UnknownPropertyType(String),

    /// Replace-by-key found no order with this key.
    #[error("order `{0}` not found")]
    OrderNotFound(String),

    /// An operation that needs a selected order ran with nothing selected.
    #[error("no order selected")]
    NoSelection,

    /// A draft operation on a form that is not open.
    #[error("{0} form is not open")]
    FormClosed(&'static str),

    /// A tab index outside the current tab set.
    #[error("tab index {index} out of range (len {len})")]
    TabIndexOutOfRange { index: usize, len: usize },

    /// A row index outside a tab's rows.
    #[error("row index {index} out of range (len {len})")]
    RowIndexOutOfRange { index: usize, len: usize },

    /// Export was requested with no tabs loaded.
    #[error("nothing to export")]
    NothingToExport,

    /// A tab title that cannot be used as a worksheet name.
    #[error("invalid sheet name `{name}`: {reason}")]
    InvalidSheetName { name: String, reason: &'static str },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, OrderdeskError>;

impl From<OrderdeskError> for wasm_bindgen::JsValue {
    fn from(e: OrderdeskError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
