// src/domain/identifier.rs
//! Mapping between the element identifiers a view exposes and the clean keys
//! of the data model.
//!
//! Element ids look like:
//!
//! ```text
//! tag-set-products                 set element
//! tag-set-products__tag-2          existing tag at key 2
//! tag-set-products__new-tag-3      provisional tag that will take key 3
//! ```
//!
//! The set wrapping is optional on tag identifiers; `tag-2` resolves to the
//! same key as `tag-set-products__tag-2`.

use std::fmt;

pub const SET_PREFIX: &str = "tag-set-";
pub const TAG_SEPARATOR: &str = "__";
pub const TAG_PREFIX: &str = "tag-";
pub const NEW_TAG_PREFIX: &str = "new-tag-";

/// Whether a tag identifier points into the tag sequence or at an uncommitted item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Existing,
    Provisional,
}

/// A resolved tag reference: the bare key plus whether it is provisional
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagRef {
    pub key: usize,
    pub kind: TagKind,
}

impl TagRef {
    pub fn existing(key: usize) -> Self {
        Self {
            key,
            kind: TagKind::Existing,
        }
    }

    pub fn provisional(key: usize) -> Self {
        Self {
            key,
            kind: TagKind::Provisional,
        }
    }

    pub fn is_provisional(&self) -> bool {
        self.kind == TagKind::Provisional
    }
}

impl fmt::Display for TagRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TagKind::Existing => write!(f, "{}{}", TAG_PREFIX, self.key),
            TagKind::Provisional => write!(f, "{}{}", NEW_TAG_PREFIX, self.key),
        }
    }
}

/// Strip the set wrapping from a raw set identifier. Idempotent.
pub fn clean_set_id(raw: &str) -> &str {
    raw.trim_start_matches(SET_PREFIX)
}

/// Tag segment of a composite identifier, i.e. everything after the last separator
fn tag_segment(raw: &str) -> &str {
    match raw.rfind(TAG_SEPARATOR) {
        Some(pos) => &raw[pos + TAG_SEPARATOR.len()..],
        None => raw,
    }
}

/// Strip set and tag wrapping from a raw tag identifier and return the bare key.
///
/// Identifiers matching neither convention come back unchanged.
pub fn clean_tag_id(raw: &str) -> &str {
    let segment = tag_segment(raw);
    segment
        .strip_prefix(NEW_TAG_PREFIX)
        .or_else(|| segment.strip_prefix(TAG_PREFIX))
        .unwrap_or(segment)
}

/// True if the raw identifier carries the provisional-tag marker.
///
/// Must be asked before cleaning, cleaning erases the marker.
pub fn is_provisional(raw: &str) -> bool {
    tag_segment(raw).starts_with(NEW_TAG_PREFIX)
}

/// Clean id of the set a composite tag identifier belongs to, `None` for bare tag ids
pub fn owning_set_id(raw: &str) -> Option<&str> {
    raw.rfind(TAG_SEPARATOR).map(|pos| clean_set_id(&raw[..pos]))
}

/// Resolve a raw tag identifier, `None` if the key is not a valid index
pub fn parse_tag_ref(raw: &str) -> Option<TagRef> {
    let provisional = is_provisional(raw);
    let key = clean_tag_id(raw).parse::<usize>().ok()?;
    Some(if provisional {
        TagRef::provisional(key)
    } else {
        TagRef::existing(key)
    })
}

/// Element id of a set
pub fn set_element_id(set_id: &str) -> String {
    format!("{}{}", SET_PREFIX, clean_set_id(set_id))
}

/// Element id of a tag inside a set
pub fn tag_element_id(set_id: &str, tag: TagRef) -> String {
    format!("{}{}{}", set_element_id(set_id), TAG_SEPARATOR, tag)
}
