use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::OrderdeskError;

/// An order row as stored in the record store and shown in the order grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique key of the order. Read-only once the order exists.
    pub order: String,
    pub owner: String,
    /// Numeric-looking text; never coerced.
    pub count: String,
    /// User-defined properties, in insertion order.
    #[serde(default, alias = "userInputs")]
    pub user_properties: Vec<Property>,
}

impl Order {
    /// Create an order without user properties.
    pub fn new(order: impl Into<String>, owner: impl Into<String>, count: impl Into<String>) -> Self {
        Self {
            order: order.into(),
            owner: owner.into(),
            count: count.into(),
            user_properties: Vec::new(),
        }
    }

    /// Builder-style helper to attach properties.
    #[must_use]
    pub fn with_properties(mut self, properties: Vec<Property>) -> Self {
        self.user_properties = properties;
        self
    }

    /// The value of a top-level field.
    pub fn field(&self, field: OrderField) -> &str {
        match field {
            OrderField::Order => &self.order,
            OrderField::Owner => &self.owner,
            OrderField::Count => &self.count,
        }
    }
}

/// A user-defined key/value/type triple attached to an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: String,
    /// Classification tag only; `value` is never converted to match it.
    #[serde(rename = "type", default)]
    pub kind: PropertyType,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>, kind: PropertyType) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            kind,
        }
    }

    /// The entry appended by "Add User Defined Property".
    pub fn blank() -> Self {
        Self::default()
    }
}

/// Type tag of a user property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[default]
    String,
    Number,
}

impl PropertyType {
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Number => "number",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = OrderdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(PropertyType::String),
            "number" => Ok(PropertyType::Number),
            other => Err(OrderdeskError::UnknownPropertyType(other.to_string())),
        }
    }
}

/// Top-level order fields a form can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderField {
    Order,
    Owner,
    Count,
}

impl OrderField {
    /// Fields the form marks as required, in display order.
    pub const REQUIRED: [OrderField; 3] = [OrderField::Order, OrderField::Owner, OrderField::Count];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderField::Order => "order",
            OrderField::Owner => "owner",
            OrderField::Count => "count",
        }
    }
}

impl FromStr for OrderField {
    type Err = OrderdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "order" => Ok(OrderField::Order),
            "owner" => Ok(OrderField::Owner),
            "count" => Ok(OrderField::Count),
            other => Err(OrderdeskError::UnknownField(other.to_string())),
        }
    }
}

/// Fields of a single user property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyField {
    Key,
    Value,
    Type,
}

impl FromStr for PropertyField {
    type Err = OrderdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "key" => Ok(PropertyField::Key),
            "value" => Ok(PropertyField::Value),
            "type" => Ok(PropertyField::Type),
            other => Err(OrderdeskError::UnknownField(other.to_string())),
        }
    }
}
