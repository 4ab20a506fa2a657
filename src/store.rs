//! The record store: the committed, ordered sequence of orders.

use crate::error::{OrderdeskError, Result};
use crate::types::{Order, Property, PropertyType};

/// In-memory ordered sequence of orders.
///
/// Orders are appended on create and replaced in place on edit; there is no
/// deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    orders: Vec<Order>,
}

impl RecordStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with `orders`, in order.
    pub fn with_orders(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    /// The three sample orders the order screen starts with.
    pub fn demo() -> Self {
        Self::with_orders(vec![
            Order::new("order1", "Tim", "10").with_properties(vec![
                Property::new("address", "dalian", PropertyType::String),
                Property::new("price", "100", PropertyType::Number),
            ]),
            Order::new("order2", "NASA", "12").with_properties(vec![
                Property::new("address1", "dalian", PropertyType::String),
                Property::new("price", "100", PropertyType::Number),
                Property::new("address2", "dalian", PropertyType::String),
                Property::new("address3", "dalian", PropertyType::String),
            ]),
            Order::new("order3", "SpaceX", "100"),
        ])
    }

    /// Add `order` to the end. Returns its index.
    pub fn append(&mut self, order: Order) -> usize {
        tracing::debug!(order = %order.order, "append order");
        self.orders.push(order);
        self.orders.len() - 1
    }

    /// Replace the first order whose key equals `order.order`.
    ///
    /// Returns the replaced index. The store is untouched when no order
    /// matches.
    pub fn replace_by_key(&mut self, order: Order) -> Result<usize> {
        let Some(idx) = self.position(&order.order) else {
            tracing::warn!(order = %order.order, "replace by key: no matching order");
            return Err(OrderdeskError::OrderNotFound(order.order));
        };
        tracing::debug!(order = %order.order, idx, "replace order");
        if let Some(slot) = self.orders.get_mut(idx) {
            *slot = order;
        }
        Ok(idx)
    }

    /// Index of the first order with `key`.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.orders.iter().position(|o| o.order == key)
    }

    /// First order with `key`.
    pub fn get(&self, key: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.order == key)
    }

    /// The full sequence, as shown by the grid.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
