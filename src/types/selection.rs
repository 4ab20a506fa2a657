use super::Order;

/// The order grid's current single-row selection.
///
/// Holds a snapshot of the selected row as delivered by the grid, or nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<Order>,
}

impl Selection {
    /// Replace the selection with the grid's latest event.
    pub fn set(&mut self, row: Option<Order>) {
        self.selected = row;
    }

    pub fn get(&self) -> Option<&Order> {
        self.selected.as_ref()
    }

    /// Key of the selected order.
    pub fn key(&self) -> Option<&str> {
        self.selected.as_ref().map(|o| o.order.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }
}
