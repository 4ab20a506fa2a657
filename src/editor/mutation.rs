//! Draft mutations.
//!
//! Each function takes the current draft by reference and returns the next
//! draft as a new value, so every intermediate state is its own snapshot.

use crate::error::{OrderdeskError, Result};
use crate::types::{Order, OrderField, Property, PropertyField};

/// Return `order` with one top-level field set to `value`.
///
/// No validation: empty strings are accepted.
pub(crate) fn with_field(order: &Order, field: OrderField, value: &str) -> Order {
    let mut next = order.clone();
    match field {
        OrderField::Order => next.order = value.to_string(),
        OrderField::Owner => next.owner = value.to_string(),
        OrderField::Count => next.count = value.to_string(),
    }
    next
}

/// Return `order` with a blank property appended.
pub(crate) fn with_property_added(order: &Order) -> Order {
    Order {
        user_properties: appended(&order.user_properties),
        ..order.clone()
    }
}

/// Return `order` without the property at `index`.
pub(crate) fn with_property_removed(order: &Order, index: usize) -> Result<Order> {
    Ok(Order {
        user_properties: removed(&order.user_properties, index)?,
        ..order.clone()
    })
}

/// Return `order` with one field of the property at `index` set to `value`.
pub(crate) fn with_property_updated(
    order: &Order,
    index: usize,
    field: PropertyField,
    value: &str,
) -> Result<Order> {
    Ok(Order {
        user_properties: updated(&order.user_properties, index, field, value)?,
        ..order.clone()
    })
}

/// Required fields that are blank (whitespace only counts as blank).
pub(crate) fn blank_required_fields(order: &Order) -> Vec<OrderField> {
    OrderField::REQUIRED
        .into_iter()
        .filter(|f| order.field(*f).trim().is_empty())
        .collect()
}

fn appended(properties: &[Property]) -> Vec<Property> {
    let mut next = Vec::with_capacity(properties.len() + 1);
    next.extend_from_slice(properties);
    next.push(Property::blank());
    next
}

fn removed(properties: &[Property], index: usize) -> Result<Vec<Property>> {
    check_index(properties, index)?;
    let mut next = properties.to_vec();
    next.remove(index);
    Ok(next)
}

fn updated(
    properties: &[Property],
    index: usize,
    field: PropertyField,
    value: &str,
) -> Result<Vec<Property>> {
    check_index(properties, index)?;
    let mut next = properties.to_vec();
    let Some(prop) = next.get_mut(index) else {
        return Err(out_of_range(properties, index));
    };
    match field {
        PropertyField::Key => prop.key = value.to_string(),
        PropertyField::Value => prop.value = value.to_string(),
        PropertyField::Type => prop.kind = value.parse()?,
    }
    Ok(next)
}

fn check_index(properties: &[Property], index: usize) -> Result<()> {
    if index < properties.len() {
        Ok(())
    } else {
        tracing::warn!(index, len = properties.len(), "property index out of range");
        Err(out_of_range(properties, index))
    }
}

fn out_of_range(properties: &[Property], index: usize) -> OrderdeskError {
    OrderdeskError::PropertyIndexOutOfRange {
        index,
        len: properties.len(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::PropertyType;

    fn keyed(keys: &[&str]) -> Order {
        Order::new("o", "w", "1").with_properties(
            keys.iter()
                .map(|k| Property::new(*k, "", PropertyType::String))
                .collect(),
        )
    }

    #[test]
    fn test_with_field_leaves_input_untouched() {
        let before = Order::default();
        let after = with_field(&before, OrderField::Owner, "Tim");
        assert_eq!(before.owner, "");
        assert_eq!(after.owner, "Tim");
    }

    #[test]
    fn test_remove_is_stable() {
        let order = keyed(&["a", "b", "c", "d"]);
        let next = with_property_removed(&order, 1).unwrap();
        let keys: Vec<_> = next.user_properties.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_remove_out_of_range() {
        let order = keyed(&["a"]);
        let err = with_property_removed(&order, 1).unwrap_err();
        assert!(matches!(
            err,
            OrderdeskError::PropertyIndexOutOfRange { index: 1, len: 1 }
        ));
    }

    #[test]
    fn test_update_type_parses_tag() {
        let order = keyed(&["a"]);
        let next = with_property_updated(&order, 0, PropertyField::Type, "number").unwrap();
        assert_eq!(next.user_properties[0].kind, PropertyType::Number);
        assert!(with_property_updated(&order, 0, PropertyField::Type, "date").is_err());
    }

    #[test]
    fn test_blank_required_fields() {
        let order = Order::new("", "  ", "3");
        assert_eq!(
            blank_required_fields(&order),
            vec![OrderField::Order, OrderField::Owner]
        );
    }
}
