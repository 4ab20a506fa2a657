//! Data types shared by the order screen and the spreadsheet adapter.

mod order;
mod selection;
mod tab;

pub use order::*;
pub use selection::*;
pub use tab::*;
