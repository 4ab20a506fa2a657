//! Routes between the order list and the order-detail view.

use std::fmt;

/// Path prefix of the order-detail view.
pub const ORDER_DETAILS_PREFIX: &str = "/OrderDetails/";

/// A view the order screen can navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The order grid.
    Orders,
    /// Detail view of one order, keyed by its `order` value.
    OrderDetails(String),
}

impl Route {
    /// Route to the detail view of `order`.
    pub fn details(order: impl Into<String>) -> Self {
        Route::OrderDetails(order.into())
    }

    /// Target path for the router, e.g. `/OrderDetails/order1`.
    pub fn path(&self) -> String {
        match self {
            Route::Orders => "/".to_string(),
            Route::OrderDetails(order) => format!("{ORDER_DETAILS_PREFIX}{order}"),
        }
    }

    /// Parse a router path back into a route.
    ///
    /// Returns `None` for paths the order screen does not own, including a
    /// detail path with an empty key.
    pub fn parse(path: &str) -> Option<Self> {
        if path.is_empty() || path == "/" {
            return Some(Route::Orders);
        }
        let order = path.strip_prefix(ORDER_DETAILS_PREFIX)?;
        if order.is_empty() {
            return None;
        }
        Some(Route::OrderDetails(order.to_string()))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
