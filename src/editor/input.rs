//! Form input events.
//!
//! The form chrome reports each user action as one [`FormEvent`]; the
//! owning page applies it to the open draft.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{OrderdeskError, Result};
use crate::types::{OrderField, PropertyField};

use super::{CommitStrategy, DraftController};

/// Which of the two order forms an event targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Create,
    Edit,
}

impl FromStr for FormKind {
    type Err = OrderdeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "create" => Ok(FormKind::Create),
            "edit" => Ok(FormKind::Edit),
            other => Err(OrderdeskError::UnknownField(other.to_string())),
        }
    }
}

/// One edit made in an order form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FormEvent {
    FieldChange {
        field: OrderField,
        value: String,
    },
    PropertyAdd,
    PropertyRemove {
        index: usize,
    },
    PropertyChange {
        index: usize,
        field: PropertyField,
        value: String,
    },
    Reset,
}

impl<C: CommitStrategy> DraftController<C> {
    /// Apply one form event to the draft.
    pub fn apply(&mut self, event: &FormEvent) -> Result<()> {
        match event {
            FormEvent::FieldChange { field, value } => self.set_field(*field, value),
            FormEvent::PropertyAdd => {
                self.add_property();
                Ok(())
            }
            FormEvent::PropertyRemove { index } => self.remove_property(*index),
            FormEvent::PropertyChange {
                index,
                field,
                value,
            } => self.update_property(*index, *field, value),
            FormEvent::Reset => {
                self.reset();
                Ok(())
            }
        }
    }
}
