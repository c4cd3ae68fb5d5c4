// src/application/controller.rs
use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, instrument, trace};

use crate::application::error::ApplicationResult;
use crate::config::Settings;
use crate::domain::events::{Listeners, SubscriptionId, TagEvent, TagListener};
use crate::domain::identifier::{
    clean_set_id, owning_set_id, parse_tag_ref, set_element_id, tag_element_id, TagRef,
};
use crate::domain::store::TagSetStore;
use crate::domain::tag_set::{EditSession, EditableFlag, SetState};
use crate::domain::view::{RenderedSet, RenderedTag, TagInput, TagView};

/// Why a transition was a silent no-op
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    NotEditable,
    Locked,
    LimitReached,
    /// Tag reference malformed or not pointing at a current tag
    UnknownTag,
    /// Save or provisional delete for an input that has no open session
    NoSession,
    BlurDisabled,
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skip::NotEditable => write!(f, "set is not editable"),
            Skip::Locked => write!(f, "set is locked"),
            Skip::LimitReached => write!(f, "tag limit reached"),
            Skip::UnknownTag => write!(f, "unknown tag"),
            Skip::NoSession => write!(f, "no open add/edit session"),
            Skip::BlurDisabled => write!(f, "submit on blur disabled"),
        }
    }
}

/// Outcome of a controller operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Bulk replacement of a set's tags
    Reset,
    Composing { key: usize },
    Editing { key: usize },
    Committed { key: usize },
    Reverted { key: usize },
    /// Provisional tag discarded
    Cancelled { key: usize },
    Deleted { key: usize },
    EditableChanged { editable: bool },
    Ignored(Skip),
}

impl Transition {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Transition::Ignored(_))
    }
}

/// Owns any number of tag sets and runs the add/edit/save/delete state
/// machine for each of them.
///
/// Set references may be raw element ids (`tag-set-foo`) or clean ids (`foo`).
/// Locking is per set: two sets can be mid-edit at the same time, one set
/// never has more than one open input.
pub struct TagSetController<V: TagView> {
    settings: Settings,
    store: TagSetStore,
    view: V,
    listeners: Listeners,
}

impl<V: TagView> fmt::Debug for TagSetController<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagSetController")
            .field("settings", &self.settings)
            .field("store", &self.store)
            .field("listeners", &self.listeners)
            .finish()
    }
}

impl<V: TagView> TagSetController<V> {
    pub fn new(settings: Settings, view: V) -> Self {
        debug!("Creating new TagSetController");
        Self {
            settings,
            store: TagSetStore::new(),
            view,
            listeners: Listeners::default(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn subscribe<L: TagListener + 'static>(&mut self, listener: L) -> SubscriptionId {
        self.listeners.subscribe(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // --- configuration / query surface ---

    /// Replace all tags of a set and return it to idle
    #[instrument(skip(self, labels), level = "debug")]
    pub fn set_tags<I, S>(&mut self, set_ref: &str, labels: I) -> Transition
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set_id = clean_set_id(set_ref);
        self.store.replace_tags(set_id, labels);
        self.render(set_id);
        Transition::Reset
    }

    pub fn get_tags_by_tag_set_id(&self, set_ref: &str) -> Vec<String> {
        self.store.get_tags(clean_set_id(set_ref))
    }

    pub fn get_all_tags(&self) -> BTreeMap<String, Vec<String>> {
        self.store.get_all_tags()
    }

    pub fn set_ids(&self) -> Vec<String> {
        self.store.set_ids()
    }

    pub fn state(&self, set_ref: &str) -> Option<SetState> {
        let set_id = clean_set_id(set_ref);
        self.store.get(set_id).map(|set| SetState {
            set_id: set_id.to_string(),
            tags: set.tags().to_vec(),
            editable: set.is_editable(),
            state: set.session().state(),
        })
    }

    /// Toggle affordances. Re-rendering drops any open input, so the set
    /// also returns to idle.
    #[instrument(skip(self, value), level = "debug")]
    pub fn set_tags_editable(
        &mut self,
        set_ref: &str,
        value: impl Into<EditableFlag>,
    ) -> Transition {
        let set_id = clean_set_id(set_ref);
        let editable = self.store.set_editable(set_id, value);
        self.render(set_id);
        Transition::EditableChanged { editable }
    }

    // --- interaction transitions ---

    #[instrument(skip(self), level = "debug")]
    pub fn begin_add(&mut self, set_ref: &str) -> Transition {
        let set_id = clean_set_id(set_ref);
        let limit = self.settings.max_tag_limit;
        let set = self.store.ensure_set(set_id);

        if !set.is_editable() {
            return ignore(set_id, Skip::NotEditable);
        }
        if set.is_locked() {
            return ignore(set_id, Skip::Locked);
        }
        // inclusive: a set at the limit may still start one more add
        let count = set.len();
        if limit != 0 && count > limit {
            return ignore(set_id, Skip::LimitReached);
        }

        let key = count;
        self.store.set_session(set_id, EditSession::Composing { key });
        let input = TagInput {
            set_element_id: set_element_id(set_id),
            element_id: tag_element_id(set_id, TagRef::provisional(key)),
            seed: self.settings.add_tag_input_text.clone(),
            submit_label: self.settings.edit_tag_btn_label.clone(),
            deletable: true,
        };
        self.view.present_provisional(&input);
        debug!(set_id, key, "composing");
        Transition::Composing { key }
    }

    #[instrument(skip(self), level = "debug")]
    pub fn begin_edit(&mut self, set_ref: &str, tag_ref: &str) -> Transition {
        let set_id = clean_set_id(set_ref);
        let set = self.store.ensure_set(set_id);

        if !set.is_editable() {
            return ignore(set_id, Skip::NotEditable);
        }
        if set.is_locked() {
            return ignore(set_id, Skip::Locked);
        }
        let key = match parse_tag_ref(tag_ref) {
            Some(tag) if !tag.is_provisional() && belongs_to(set_id, tag_ref) => tag.key,
            _ => return ignore(set_id, Skip::UnknownTag),
        };
        let Some(original) = set.get(key).map(str::to_string) else {
            return ignore(set_id, Skip::UnknownTag);
        };

        let input = TagInput {
            set_element_id: set_element_id(set_id),
            element_id: tag_element_id(set_id, TagRef::existing(key)),
            seed: original.clone(),
            submit_label: self.settings.edit_tag_btn_label.clone(),
            deletable: false,
        };
        self.store.set_session(set_id, EditSession::Editing { key, original });
        self.view.enter_edit_mode(&input);
        debug!(set_id, key, "editing");
        Transition::Editing { key }
    }

    /// Submit the input of the open session.
    ///
    /// Real content is committed. Empty or placeholder input reverts an edit
    /// and discards a provisional tag. The set is idle afterwards whichever
    /// branch ran.
    #[instrument(skip(self), level = "debug")]
    pub fn save(
        &mut self,
        set_ref: &str,
        tag_ref: &str,
        value: &str,
    ) -> ApplicationResult<Transition> {
        let set_id = clean_set_id(set_ref);
        let Some(tag) = parse_tag_ref(tag_ref).filter(|_| belongs_to(set_id, tag_ref)) else {
            return Ok(ignore(set_id, Skip::UnknownTag));
        };
        let session = self
            .store
            .get(set_id)
            .map(|set| set.session().clone())
            .unwrap_or_default();

        let matches_session = match &session {
            EditSession::Composing { key } => tag.is_provisional() && *key == tag.key,
            EditSession::Editing { key, .. } => !tag.is_provisional() && *key == tag.key,
            EditSession::Idle => false,
        };
        if !matches_session {
            return Ok(ignore(set_id, Skip::NoSession));
        }

        let result = self.apply_save(set_id, tag, &session, value);
        self.release(set_id);
        result
    }

    /// Defocus path, identical to `save` when submit-on-blur is enabled
    #[instrument(skip(self), level = "debug")]
    pub fn blur(
        &mut self,
        set_ref: &str,
        tag_ref: &str,
        value: &str,
    ) -> ApplicationResult<Transition> {
        if !self.settings.submit_on_blur {
            return Ok(ignore(clean_set_id(set_ref), Skip::BlurDisabled));
        }
        self.save(set_ref, tag_ref, value)
    }

    /// Delete a tag. Allowed while the set is locked; a provisional tag is
    /// only discarded and never reported to listeners.
    ///
    /// A provisional tag can only be deleted while it is the one being
    /// composed. A failed delete leaves the model untouched, unknown sets
    /// included.
    #[instrument(skip(self), level = "debug")]
    pub fn delete(&mut self, set_ref: &str, tag_ref: &str) -> ApplicationResult<Transition> {
        let set_id = clean_set_id(set_ref);
        let Some(tag) = parse_tag_ref(tag_ref).filter(|_| belongs_to(set_id, tag_ref)) else {
            return Ok(ignore(set_id, Skip::UnknownTag));
        };
        let (editable, composing) = match self.store.get(set_id) {
            Some(set) => (
                set.is_editable(),
                matches!(set.session(), EditSession::Composing { key } if *key == tag.key),
            ),
            None => (true, false),
        };
        if !editable {
            return Ok(ignore(set_id, Skip::NotEditable));
        }
        if tag.is_provisional() && !composing {
            return Ok(ignore(set_id, Skip::NoSession));
        }
        self.remove(set_id, tag.key, tag.is_provisional())
    }

    // --- internals ---

    fn apply_save(
        &mut self,
        set_id: &str,
        tag: TagRef,
        session: &EditSession,
        value: &str,
    ) -> ApplicationResult<Transition> {
        if !value.is_empty() && value != self.settings.add_tag_input_text {
            let target = if tag.is_provisional() {
                None
            } else {
                Some(tag.key)
            };
            let key = self.store.upsert_tag(set_id, value, target)?;
            self.listeners.notify(&TagEvent::Added {
                set_id: set_id.to_string(),
                key,
                label: value.to_string(),
            });
            self.render(set_id);
            debug!(set_id, key, "committed");
            return Ok(Transition::Committed { key });
        }

        match session {
            EditSession::Editing { key, original } => {
                trace!(set_id, key, original = %original, "reverting");
                self.render(set_id);
                Ok(Transition::Reverted { key: *key })
            }
            _ => self.remove(set_id, tag.key, true),
        }
    }

    fn remove(
        &mut self,
        set_id: &str,
        key: usize,
        provisional: bool,
    ) -> ApplicationResult<Transition> {
        if provisional {
            self.render(set_id);
            debug!(set_id, key, "cancelled provisional tag");
            return Ok(Transition::Cancelled { key });
        }

        let label = self.store.remove_tag(set_id, key)?;
        self.listeners.notify(&TagEvent::Removed {
            set_id: set_id.to_string(),
            key,
            label,
        });
        self.render(set_id);
        debug!(set_id, key, "deleted");
        Ok(Transition::Deleted { key })
    }

    fn release(&mut self, set_id: &str) {
        self.store.set_session(set_id, EditSession::Idle);
    }

    /// Regenerate the whole list; any open input disappears with it
    fn render(&mut self, set_id: &str) {
        self.release(set_id);
        let rendered = self.rendered_set(set_id);
        trace!(set_id, items = rendered.items.len(), "render");
        self.view.render(&rendered);
    }

    fn rendered_set(&mut self, set_id: &str) -> RenderedSet {
        let add_label = self.settings.add_tag_btn_label.clone();
        let set = self.store.ensure_set(set_id);
        let editable = set.is_editable();
        let items = set
            .tags()
            .iter()
            .enumerate()
            .map(|(key, label)| RenderedTag {
                element_id: tag_element_id(set_id, TagRef::existing(key)),
                label: label.clone(),
                deletable: editable,
            })
            .collect();
        RenderedSet {
            set_id: set_id.to_string(),
            element_id: set_element_id(set_id),
            add_label: editable.then_some(add_label),
            items,
        }
    }
}

/// A bare tag id belongs to any set, a composite one only to the set it names
fn belongs_to(set_id: &str, tag_ref: &str) -> bool {
    owning_set_id(tag_ref).map_or(true, |owner| owner == set_id)
}

fn ignore(set_id: &str, reason: Skip) -> Transition {
    debug!(set_id, %reason, "ignored");
    Transition::Ignored(reason)
}
