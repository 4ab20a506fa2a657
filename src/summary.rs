//! Grid-facing presentation data for the order list.

use serde::Serialize;

use crate::types::{Column, Order};

/// Label shown when an order has user properties.
pub const WITH_PROPERTIES_LABEL: &str = "Custom properties";
/// Label shown when an order has none.
pub const WITHOUT_PROPERTIES_LABEL: &str = "No custom properties";

/// What the user-properties cell of the order grid shows: a label and,
/// on hover, one line per property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertySummary {
    pub label: &'static str,
    pub lines: Vec<String>,
}

impl PropertySummary {
    pub fn of(order: &Order) -> Self {
        let lines: Vec<String> = order
            .user_properties
            .iter()
            .map(|p| format!("{}: {} (Type: {})", p.key, p.value, p.kind))
            .collect();
        let label = if lines.is_empty() {
            WITHOUT_PROPERTIES_LABEL
        } else {
            WITH_PROPERTIES_LABEL
        };
        Self { label, lines }
    }
}

/// Columns of the order grid.
pub fn order_grid_columns() -> Vec<Column> {
    ["order", "owner", "count", "userProperties"]
        .into_iter()
        .map(Column::for_field)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::store::RecordStore;

    #[test]
    fn test_summary_lines() {
        let store = RecordStore::demo();
        let summary = PropertySummary::of(store.get("order1").unwrap());
        assert_eq!(summary.label, WITH_PROPERTIES_LABEL);
        assert_eq!(summary.lines[1], "price: 100 (Type: number)");
    }

    #[test]
    fn test_summary_empty() {
        let store = RecordStore::demo();
        let summary = PropertySummary::of(store.get("order3").unwrap());
        assert_eq!(summary.label, WITHOUT_PROPERTIES_LABEL);
        assert!(summary.lines.is_empty());
    }

    #[test]
    fn test_grid_columns() {
        let fields: Vec<_> = order_grid_columns().into_iter().map(|c| c.field).collect();
        assert_eq!(fields, vec!["order", "owner", "count", "userProperties"]);
    }
}
