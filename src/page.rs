//! State of the order list screen.
//!
//! All screen state lives in [`OrderPage`] and changes only through its named
//! transitions. An open form is represented by its draft being present.

use crate::editor::{Committed, CreateDraft, EditDraft, FormEvent, FormKind};
use crate::error::{OrderdeskError, Result};
use crate::navigation::Route;
use crate::store::RecordStore;
use crate::types::{Order, OrderField, Selection};

const CREATE_FORM: &str = "create";
const EDIT_FORM: &str = "edit";

/// The order list screen: committed orders, both form drafts and the grid
/// selection.
#[derive(Debug, Clone, Default)]
pub struct OrderPage {
    store: RecordStore,
    create: Option<CreateDraft>,
    edit: Option<EditDraft>,
    selection: Selection,
}

impl OrderPage {
    /// A page over `store` with both forms closed and nothing selected.
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Rows for the grid.
    pub fn orders(&self) -> &[Order] {
        self.store.orders()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_create_open(&self) -> bool {
        self.create.is_some()
    }

    pub fn is_edit_open(&self) -> bool {
        self.edit.is_some()
    }

    /// The create form's draft, if the form is open.
    pub fn create_draft(&self) -> Option<&CreateDraft> {
        self.create.as_ref()
    }

    /// The edit form's draft, if the form is open.
    pub fn edit_draft(&self) -> Option<&EditDraft> {
        self.edit.as_ref()
    }

    pub fn create_draft_mut(&mut self) -> Result<&mut CreateDraft> {
        self.create
            .as_mut()
            .ok_or(OrderdeskError::FormClosed(CREATE_FORM))
    }

    pub fn edit_draft_mut(&mut self) -> Result<&mut EditDraft> {
        self.edit.as_mut().ok_or(OrderdeskError::FormClosed(EDIT_FORM))
    }

    /// Apply a form event to the open create or edit draft.
    pub fn apply_form_event(&mut self, form: FormKind, event: &FormEvent) -> Result<()> {
        match form {
            FormKind::Create => self.create_draft_mut()?.apply(event),
            FormKind::Edit => self.edit_draft_mut()?.apply(event),
        }
    }

    /// Required fields left blank in `form`'s draft; empty while the form is
    /// closed.
    pub fn missing_required(&self, form: FormKind) -> Vec<OrderField> {
        match form {
            FormKind::Create => self.create.as_ref().map(CreateDraft::missing_required),
            FormKind::Edit => self.edit.as_ref().map(EditDraft::missing_required),
        }
        .unwrap_or_default()
    }

    // ---- Create flow ----

    /// Open the create form on the empty template.
    pub fn open_create(&mut self) {
        tracing::debug!("open create form");
        self.create = Some(CreateDraft::create());
    }

    /// Close the create form without touching the store.
    pub fn cancel_create(&mut self) {
        tracing::debug!("cancel create form");
        self.create = None;
    }

    /// Append the create draft to the store and close the form.
    pub fn submit_create(&mut self) -> Result<Committed> {
        let draft = self
            .create
            .take()
            .ok_or(OrderdeskError::FormClosed(CREATE_FORM))?;
        draft.commit(&mut self.store)
    }

    // ---- Edit flow ----

    /// Open the edit form on a copy of the selected order.
    pub fn open_edit(&mut self) -> Result<()> {
        let selected = self.selection.get().ok_or(OrderdeskError::NoSelection)?;
        tracing::debug!(order = %selected.order, "open edit form");
        self.edit = Some(EditDraft::edit(selected));
        Ok(())
    }

    /// Close the edit form without touching the store.
    pub fn cancel_edit(&mut self) {
        tracing::debug!("cancel edit form");
        self.edit = None;
    }

    /// Replace the stored order with the edit draft and close the form.
    ///
    /// The form closes even when the key no longer matches any order.
    pub fn submit_edit(&mut self) -> Result<Committed> {
        let draft = self
            .edit
            .take()
            .ok_or(OrderdeskError::FormClosed(EDIT_FORM))?;
        let committed = draft.commit(&mut self.store)?;
        self.selection.set(Some(committed.order.clone()));
        Ok(committed)
    }

    // ---- Grid events ----

    /// The grid's single-row selection changed.
    pub fn select(&mut self, row: Option<Order>) {
        tracing::debug!(order = row.as_ref().map(|o| o.order.as_str()), "selection changed");
        self.selection.set(row);
    }

    /// Select the stored order with `key`.
    pub fn select_by_key(&mut self, key: &str) -> Result<()> {
        let order = self
            .store
            .get(key)
            .cloned()
            .ok_or_else(|| OrderdeskError::OrderNotFound(key.to_string()))?;
        self.select(Some(order));
        Ok(())
    }

    /// A row was double-clicked: navigate to its detail view.
    pub fn row_double_clicked(&self, row: &Order) -> Route {
        Route::details(row.order.as_str())
    }

    /// Detail view of the selected order, for the "view packages" link.
    pub fn selected_detail_route(&self) -> Result<Route> {
        self.selection
            .key()
            .map(Route::details)
            .ok_or(OrderdeskError::NoSelection)
    }
}
