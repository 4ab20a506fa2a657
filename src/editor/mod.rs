//! Draft buffers for the create and edit order forms.
//!
//! `DraftController` is one type for both forms, parameterized by how the
//! finished draft lands in the store:
//! - [`Append`]: the create form, which adds a new order
//! - [`ReplaceByKey`]: the edit form, which overwrites the order it was opened on
//!
//! The draft is independent of the store until [`DraftController::commit`].

mod input;
pub(crate) mod mutation;

use std::marker::PhantomData;

pub use input::{FormEvent, FormKind};

use crate::error::{OrderdeskError, Result};
use crate::store::RecordStore;
use crate::types::{Order, OrderField, PropertyField};

/// How a finished draft is merged into the record store.
pub trait CommitStrategy {
    /// Form name used in logs and errors.
    const FORM: &'static str;
    /// Whether the draft may change the `order` key.
    const KEY_EDITABLE: bool;

    /// Merge `order` into `store`, returning the index it now occupies.
    fn commit(store: &mut RecordStore, order: Order) -> Result<usize>;
}

/// Create form: append the draft as a new order.
#[derive(Debug, Clone, Copy)]
pub struct Append;

impl CommitStrategy for Append {
    const FORM: &'static str = "create";
    const KEY_EDITABLE: bool = true;

    fn commit(store: &mut RecordStore, order: Order) -> Result<usize> {
        Ok(store.append(order))
    }
}

/// Edit form: replace the stored order with the same key.
#[derive(Debug, Clone, Copy)]
pub struct ReplaceByKey;

impl CommitStrategy for ReplaceByKey {
    const FORM: &'static str = "edit";
    const KEY_EDITABLE: bool = false;

    fn commit(store: &mut RecordStore, order: Order) -> Result<usize> {
        store.replace_by_key(order)
    }
}

/// Result of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed {
    /// Index of the order in the store.
    pub index: usize,
    /// The order as stored.
    pub order: Order,
}

/// A staging copy of an order being composed in a form.
#[derive(Debug, Clone)]
pub struct DraftController<C: CommitStrategy> {
    draft: Order,
    /// What `reset` returns to.
    baseline: Order,
    _strategy: PhantomData<C>,
}

/// Draft buffer of the create form.
pub type CreateDraft = DraftController<Append>;

/// Draft buffer of the edit form.
pub type EditDraft = DraftController<ReplaceByKey>;

impl DraftController<Append> {
    /// A draft holding the empty order template.
    pub fn create() -> Self {
        Self::from_baseline(Order::default())
    }
}

impl DraftController<ReplaceByKey> {
    /// A draft holding an independent copy of `selected`.
    ///
    /// `reset` goes back to this copy.
    pub fn edit(selected: &Order) -> Self {
        Self::from_baseline(selected.clone())
    }
}

impl<C: CommitStrategy> DraftController<C> {
    fn from_baseline(baseline: Order) -> Self {
        Self {
            draft: baseline.clone(),
            baseline,
            _strategy: PhantomData,
        }
    }

    /// The current draft.
    pub fn draft(&self) -> &Order {
        &self.draft
    }

    /// Set a top-level field. The `order` key is read-only on the edit form.
    pub fn set_field(&mut self, field: OrderField, value: &str) -> Result<()> {
        if field == OrderField::Order && !C::KEY_EDITABLE {
            tracing::warn!(form = C::FORM, "attempt to change order key");
            return Err(OrderdeskError::ReadOnlyField(field.as_str()));
        }
        self.draft = mutation::with_field(&self.draft, field, value);
        Ok(())
    }

    /// Append a blank `string` property.
    pub fn add_property(&mut self) {
        self.draft = mutation::with_property_added(&self.draft);
    }

    /// Remove the property at `index`, keeping the rest in order.
    pub fn remove_property(&mut self, index: usize) -> Result<()> {
        self.draft = mutation::with_property_removed(&self.draft, index)?;
        Ok(())
    }

    /// Set `key`, `value` or `type` of the property at `index`.
    pub fn update_property(&mut self, index: usize, field: PropertyField, value: &str) -> Result<()> {
        self.draft = mutation::with_property_updated(&self.draft, index, field, value)?;
        Ok(())
    }

    /// Throw away all changes made since the form opened.
    pub fn reset(&mut self) {
        tracing::debug!(form = C::FORM, "reset draft");
        self.draft = self.baseline.clone();
    }

    /// Required fields left blank. Never blocks a commit.
    pub fn missing_required(&self) -> Vec<OrderField> {
        mutation::blank_required_fields(&self.draft)
    }

    /// Merge the draft into `store`. The controller is consumed either way.
    pub fn commit(self, store: &mut RecordStore) -> Result<Committed> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            tracing::warn!(form = C::FORM, ?missing, "submitting with blank required fields");
        }
        let order = self.draft;
        let index = C::commit(store, order.clone())?;
        tracing::info!(form = C::FORM, order = %order.order, index, "draft committed");
        Ok(Committed { index, order })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::{Property, PropertyType};
    use test_case::test_case;

    #[test]
    fn test_add_twice_remove_first() {
        let mut draft = DraftController::create();
        draft.add_property();
        draft.add_property();
        draft.remove_property(0).unwrap();
        assert_eq!(draft.draft().user_properties, vec![Property::blank()]);
        assert_eq!(draft.draft().user_properties[0].kind, PropertyType::String);
    }

    #[test_case(&[true, true, true, false], 2 ; "three adds one remove")]
    #[test_case(&[true, false, true, false], 0 ; "alternating")]
    #[test_case(&[true, true, false, true, false, false], 0 ; "drain")]
    #[test_case(&[true, true, true, true, true], 5 ; "adds only")]
    fn test_length_is_adds_minus_removes(ops: &[bool], expected: usize) {
        let mut draft = DraftController::create();
        for (step, add) in ops.iter().enumerate() {
            if *add {
                draft.add_property();
                let last = draft.draft().user_properties.len() - 1;
                draft
                    .update_property(last, PropertyField::Key, &format!("k{step}"))
                    .unwrap();
            } else {
                let before: Vec<String> = draft
                    .draft()
                    .user_properties
                    .iter()
                    .map(|p| p.key.clone())
                    .collect();
                draft.remove_property(0).unwrap();
                let after: Vec<String> = draft
                    .draft()
                    .user_properties
                    .iter()
                    .map(|p| p.key.clone())
                    .collect();
                assert_eq!(&before[1..], &after[..]);
            }
        }
        assert_eq!(draft.draft().user_properties.len(), expected);
    }

    #[test]
    fn test_create_reset_restores_template() {
        let mut draft = DraftController::create();
        draft.set_field(OrderField::Order, "o9").unwrap();
        draft.set_field(OrderField::Owner, "Ann").unwrap();
        draft.set_field(OrderField::Count, "4").unwrap();
        draft.add_property();
        draft.reset();
        assert_eq!(draft.draft(), &Order::default());
    }

    #[test]
    fn test_edit_key_is_read_only() {
        let selected = Order::new("A", "old", "1");
        let mut draft = DraftController::edit(&selected);
        let err = draft.set_field(OrderField::Order, "B").unwrap_err();
        assert!(matches!(err, OrderdeskError::ReadOnlyField("order")));
        assert_eq!(draft.draft().order, "A");
    }

    #[test]
    fn test_edit_reset_returns_to_selected_record() {
        let selected = Order::new("order2", "NASA", "12");
        let mut draft = DraftController::edit(&selected);
        draft.set_field(OrderField::Owner, "ESA").unwrap();
        draft.reset();
        assert_eq!(draft.draft(), &selected);
    }

    #[test]
    fn test_edit_draft_is_independent_copy() {
        let mut store = RecordStore::demo();
        let selected = store.get("order1").cloned().unwrap();
        let mut draft = DraftController::edit(&selected);
        draft.remove_property(0).unwrap();
        assert_eq!(store.get("order1").unwrap().user_properties.len(), 2);

        let committed = draft.commit(&mut store).unwrap();
        assert_eq!(committed.index, 0);
        assert_eq!(store.get("order1").unwrap().user_properties.len(), 1);
    }

    #[test]
    fn test_commit_blank_create_draft_succeeds() {
        let mut store = RecordStore::new();
        let draft = DraftController::create();
        assert_eq!(draft.missing_required().len(), 3);
        let committed = draft.commit(&mut store).unwrap();
        assert_eq!(committed.index, 0);
        assert_eq!(store.orders(), &[Order::default()]);
    }

    #[test]
    fn test_edit_commit_miss_leaves_store() {
        let mut store = RecordStore::demo();
        let before = store.clone();
        let draft = DraftController::edit(&Order::new("ghost", "x", "1"));
        assert!(matches!(
            draft.commit(&mut store),
            Err(OrderdeskError::OrderNotFound(_))
        ));
        assert_eq!(store, before);
    }
}
