// src/domain/events.rs
use serde::Serialize;
use std::fmt;
use tracing::trace;

/// Notification emitted after a commit or the removal of an existing tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TagEvent {
    Added {
        set_id: String,
        key: usize,
        label: String,
    },
    Removed {
        set_id: String,
        key: usize,
        label: String,
    },
}

impl TagEvent {
    pub fn label(&self) -> &str {
        match self {
            TagEvent::Added { label, .. } | TagEvent::Removed { label, .. } => label,
        }
    }
}

impl fmt::Display for TagEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagEvent::Added { set_id, key, label } => {
                write!(f, "tag added: {}[{}] = '{}'", set_id, key, label)
            }
            TagEvent::Removed { set_id, key, label } => {
                write!(f, "tag removed: {}[{}] = '{}'", set_id, key, label)
            }
        }
    }
}

/// Subscriber for tag notifications, typically a persistence or analytics hook
pub trait TagListener {
    fn on_tag_added(&self, event: &TagEvent);
    fn on_tag_removed(&self, event: &TagEvent);
}

impl<F> TagListener for F
where
    F: Fn(&TagEvent),
{
    fn on_tag_added(&self, event: &TagEvent) {
        self(event)
    }

    fn on_tag_removed(&self, event: &TagEvent) {
        self(event)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Listeners owned by one controller; nothing is shared between instances
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Box<dyn TagListener>)>,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

impl Listeners {
    pub fn subscribe(&mut self, listener: Box<dyn TagListener>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deliver in subscription order
    pub fn notify(&self, event: &TagEvent) {
        trace!(%event, listeners = self.entries.len(), "notify");
        for (_, listener) in &self.entries {
            match event {
                TagEvent::Added { .. } => listener.on_tag_added(event),
                TagEvent::Removed { .. } => listener.on_tag_removed(event),
            }
        }
    }
}
