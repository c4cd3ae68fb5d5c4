// src/domain/store.rs
use std::collections::{BTreeMap, HashMap};

use tracing::trace;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tag_set::{EditSession, EditableFlag, TagSet};

/// Registry of tag sets keyed by clean set id.
///
/// Mutations here are unconditional. Locking and editability policy is the
/// controller's job, the store only keeps the data consistent.
#[derive(Debug, Default)]
pub struct TagSetStore {
    sets: HashMap<String, TagSet>,
}

impl TagSetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty, editable, idle set unless one exists
    pub fn ensure_set(&mut self, set_id: &str) -> &mut TagSet {
        self.sets.entry(set_id.to_string()).or_insert_with(|| {
            trace!(set_id, "creating tag set");
            TagSet::default()
        })
    }

    /// Replace the tag sequence, keeping the editable flag
    pub fn replace_tags<I, S>(&mut self, set_id: &str, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = self.ensure_set(set_id);
        set.tags.clear();
        set.tags.extend(labels.into_iter().map(Into::into));
        trace!(set_id, count = set.tags.len(), "replaced tags");
    }

    /// Append `label` when `key` is `None`, otherwise overwrite in place.
    ///
    /// Returns the key the label ended up at.
    pub fn upsert_tag(
        &mut self,
        set_id: &str,
        label: impl Into<String>,
        key: Option<usize>,
    ) -> DomainResult<usize> {
        let set = self.ensure_set(set_id);
        let label = label.into();
        match key {
            None => {
                set.tags.push(label);
                let key = set.tags.len() - 1;
                trace!(set_id, key, "appended tag");
                Ok(key)
            }
            Some(key) => {
                let len = set.tags.len();
                let slot = set.tags.get_mut(key).ok_or_else(|| DomainError::OutOfRange {
                    set_id: set_id.to_string(),
                    key,
                    len,
                })?;
                *slot = label;
                trace!(set_id, key, "overwrote tag");
                Ok(key)
            }
        }
    }

    /// Remove the tag at `key`; later keys shift down by one
    pub fn remove_tag(&mut self, set_id: &str, key: usize) -> DomainResult<String> {
        let len = self.sets.get(set_id).map_or(0, TagSet::len);
        if key >= len {
            return Err(DomainError::OutOfRange {
                set_id: set_id.to_string(),
                key,
                len,
            });
        }
        let set = self.ensure_set(set_id);
        let removed = set.tags.remove(key);
        trace!(set_id, key, "removed tag");
        Ok(removed)
    }

    pub fn set_editable(&mut self, set_id: &str, value: impl Into<EditableFlag>) -> bool {
        let value = value.into().value();
        self.ensure_set(set_id).editable = value;
        trace!(set_id, value, "set editable");
        value
    }

    pub fn set_session(&mut self, set_id: &str, session: EditSession) {
        trace!(set_id, ?session, "set session");
        self.ensure_set(set_id).session = session;
    }

    pub fn get(&self, set_id: &str) -> Option<&TagSet> {
        self.sets.get(set_id)
    }

    pub fn get_tags(&self, set_id: &str) -> Vec<String> {
        self.sets
            .get(set_id)
            .map(|set| set.tags.clone())
            .unwrap_or_default()
    }

    pub fn get_all_tags(&self) -> BTreeMap<String, Vec<String>> {
        self.sets
            .iter()
            .map(|(id, set)| (id.clone(), set.tags.clone()))
            .collect()
    }

    pub fn set_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sets.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(set_id: &str, labels: &[&str]) -> TagSetStore {
        let mut store = TagSetStore::new();
        store.replace_tags(set_id, labels.iter().copied());
        store
    }

    #[test]
    fn given_unknown_set_when_ensure_then_creates_empty_editable_set() {
        let mut store = TagSetStore::new();
        store.ensure_set("a");
        let set = store.get("a").unwrap();
        assert!(set.is_empty());
        assert!(set.is_editable());
        assert!(!set.is_locked());
    }

    #[test]
    fn given_existing_set_when_ensure_then_keeps_content() {
        let mut store = store_with("a", &["x"]);
        store.ensure_set("a");
        assert_eq!(store.get_tags("a"), vec!["x"]);
    }

    #[test]
    fn given_labels_when_replace_then_get_returns_same_order() {
        let store = store_with("a", &["z", "a", "m", "a"]);
        assert_eq!(store.get_tags("a"), vec!["z", "a", "m", "a"]);
    }

    #[test]
    fn given_non_editable_set_when_replace_then_keeps_flag() {
        let mut store = store_with("a", &["x"]);
        store.set_editable("a", false);
        store.replace_tags("a", ["y", "z"]);
        assert!(!store.get("a").unwrap().is_editable());
        assert_eq!(store.get_tags("a"), vec!["y", "z"]);
    }

    #[test]
    fn given_empty_labels_when_replace_then_empty_editable_set() {
        let mut store = store_with("a", &["x", "y"]);
        store.replace_tags("a", Vec::<String>::new());
        assert!(store.get_tags("a").is_empty());
        assert!(store.get("a").unwrap().is_editable());
    }

    #[test]
    fn given_no_key_when_upsert_then_appends() {
        let mut store = store_with("a", &["x"]);
        let key = store.upsert_tag("a", "y", None).unwrap();
        assert_eq!(key, 1);
        assert_eq!(store.get_tags("a"), vec!["x", "y"]);
    }

    #[test]
    fn given_key_when_upsert_then_overwrites_in_place() {
        let mut store = store_with("a", &["x", "y", "z"]);
        store.upsert_tag("a", "Y", Some(1)).unwrap();
        assert_eq!(store.get_tags("a"), vec!["x", "Y", "z"]);
    }

    #[test]
    fn given_key_out_of_bounds_when_upsert_then_out_of_range() {
        let mut store = store_with("a", &["x"]);
        let err = store.upsert_tag("a", "y", Some(1)).unwrap_err();
        assert!(matches!(err, DomainError::OutOfRange { key: 1, len: 1, .. }));
        assert_eq!(store.get_tags("a"), vec!["x"]);
    }

    #[test]
    fn given_key_when_remove_then_later_keys_shift_down() {
        let mut store = store_with("a", &["t0", "t1", "t2", "t3"]);
        let removed = store.remove_tag("a", 1).unwrap();
        assert_eq!(removed, "t1");
        let tags = store.get_tags("a");
        assert_eq!(tags, vec!["t0", "t2", "t3"]);
        assert_eq!(tags[1], "t2");
    }

    #[test]
    fn given_invalid_key_when_remove_then_out_of_range() {
        let mut store = store_with("a", &["x"]);
        assert!(matches!(
            store.remove_tag("a", 1),
            Err(DomainError::OutOfRange { key: 1, len: 1, .. })
        ));
        assert!(matches!(
            store.remove_tag("missing", 0),
            Err(DomainError::OutOfRange { len: 0, .. })
        ));
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn given_raw_values_when_set_editable_then_coerced() {
        let mut store = TagSetStore::new();
        assert!(!store.set_editable("a", "nope"));
        assert!(!store.get("a").unwrap().is_editable());
        assert!(store.set_editable("a", "true"));
        assert!(store.get("a").unwrap().is_editable());
    }

    #[test]
    fn given_several_sets_when_get_all_then_returns_every_set() {
        let mut store = store_with("b", &["1"]);
        store.replace_tags("a", ["2", "3"]);
        store.ensure_set("c");
        let all = store.get_all_tags();
        assert_eq!(all.len(), 3);
        assert_eq!(all["a"], vec!["2", "3"]);
        assert_eq!(all["b"], vec!["1"]);
        assert!(all["c"].is_empty());
        assert_eq!(store.set_ids(), vec!["a", "b", "c"]);
    }
}
