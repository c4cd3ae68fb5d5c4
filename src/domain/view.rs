// src/domain/view.rs
/*
   View collaborator
   The controller never inspects a view tree. It hands the view fully resolved
   element ids and labels, and the view's event layer hands back composite ids
   when the user acts. Event dispatch must be delegated at a stable ancestor,
   tag items are created and destroyed on every render.
*/
use serde::Serialize;

/// One tag item in a rendered list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedTag {
    pub element_id: String,
    pub label: String,
    pub deletable: bool,
}

/// Complete replacement content for one set's list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSet {
    pub set_id: String,
    pub element_id: String,
    /// Label of the leading add affordance, absent when the set is read-only
    pub add_label: Option<String>,
    pub items: Vec<RenderedTag>,
}

impl RenderedSet {
    pub fn labels(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.label.as_str()).collect()
    }

    pub fn has_affordances(&self) -> bool {
        self.add_label.is_some() || self.items.iter().any(|item| item.deletable)
    }
}

/// An input shown for composing a new tag or editing an existing one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagInput {
    pub set_element_id: String,
    pub element_id: String,
    /// Initial content, selected on focus
    pub seed: String,
    pub submit_label: String,
    /// Provisional items carry a delete affordance so the user can cancel
    pub deletable: bool,
}

/// Rendering primitives the controller drives
pub trait TagView {
    /// Replace the set's visible list with `set`
    fn render(&mut self, set: &RenderedSet);

    /// Add a provisional item with a focused, fully selected input
    fn present_provisional(&mut self, input: &TagInput);

    /// Switch one existing item into edit mode, focus and select its input
    fn enter_edit_mode(&mut self, input: &TagInput);
}

impl<V: TagView + ?Sized> TagView for Box<V> {
    fn render(&mut self, set: &RenderedSet) {
        (**self).render(set)
    }

    fn present_provisional(&mut self, input: &TagInput) {
        (**self).present_provisional(input)
    }

    fn enter_edit_mode(&mut self, input: &TagInput) {
        (**self).enter_edit_mode(input)
    }
}
