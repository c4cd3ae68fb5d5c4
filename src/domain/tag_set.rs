// src/domain/tag_set.rs
use serde::Serialize;
use std::fmt;

/// Uncommitted add/edit in progress on a tag set.
///
/// A set holds at most one session; any variant other than `Idle` locks it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditSession {
    #[default]
    Idle,
    /// A provisional tag that will be appended at `key` on commit
    Composing { key: usize },
    /// An existing tag being relabelled, `original` is restored on revert
    Editing { key: usize, original: String },
}

impl EditSession {
    pub fn is_locked(&self) -> bool {
        !matches!(self, EditSession::Idle)
    }

    pub fn state(&self) -> LockState {
        match self {
            EditSession::Idle => LockState::Idle,
            EditSession::Composing { .. } => LockState::Composing,
            EditSession::Editing { .. } => LockState::Editing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    Idle,
    Composing,
    Editing,
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockState::Idle => write!(f, "idle"),
            LockState::Composing => write!(f, "composing"),
            LockState::Editing => write!(f, "editing"),
        }
    }
}

/// Ordered labels of one set plus its editability and edit session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSet {
    pub(crate) tags: Vec<String>,
    pub(crate) editable: bool,
    pub(crate) session: EditSession,
}

impl Default for TagSet {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            editable: true,
            session: EditSession::Idle,
        }
    }
}

impl TagSet {
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn get(&self, key: usize) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn is_locked(&self) -> bool {
        self.session.is_locked()
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }
}

/// Read-only snapshot of a set for integrators
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetState {
    pub set_id: String,
    pub tags: Vec<String>,
    pub editable: bool,
    pub state: LockState,
}

/// Editability value coerced from loosely typed input.
///
/// Only `true`-like values turn editing on; anything unrecognised is `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditableFlag(pub bool);

impl EditableFlag {
    pub fn value(self) -> bool {
        self.0
    }
}

/// `true`, `1`, `yes` or `on`, ignoring case and surrounding whitespace
pub fn is_truthy(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

impl From<bool> for EditableFlag {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl From<&str> for EditableFlag {
    fn from(value: &str) -> Self {
        Self(is_truthy(value))
    }
}

impl From<String> for EditableFlag {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<i64> for EditableFlag {
    fn from(value: i64) -> Self {
        Self(value != 0)
    }
}

impl From<&serde_json::Value> for EditableFlag {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Bool(b) => Self(*b),
            Value::String(s) => Self::from(s.as_str()),
            Value::Number(n) => Self(n.as_f64().is_some_and(|f| f != 0.0)),
            _ => Self(false),
        }
    }
}

impl From<serde_json::Value> for EditableFlag {
    fn from(value: serde_json::Value) -> Self {
        Self::from(&value)
    }
}
