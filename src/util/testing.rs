// src/util/testing.rs
use std::cell::RefCell;
use std::env;
use std::rc::Rc;
use std::sync::OnceLock;
use tracing::{debug, info, instrument};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::config::{ENV_ADD_TAG_INPUT_TEXT, ENV_MAX_TAG_LIMIT, ENV_SUBMIT_ON_BLUR};
use crate::domain::events::{TagEvent, TagListener};
use crate::domain::view::{RenderedSet, TagInput, TagView};

/// Global test configuration, initialized exactly once via OnceLock.
#[derive(Debug)]
pub struct TestEnv {
    pub log_filter: String,
}

static TEST_ENV: OnceLock<TestEnv> = OnceLock::new();

/// Initializes the global test environment (logging) exactly once.
pub fn init_test_env() -> &'static TestEnv {
    TEST_ENV.get_or_init(|| {
        let data = TestEnv {
            log_filter: env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()),
        };
        setup_test_logging(&data.log_filter);
        info!("Test environment initialized");
        data
    })
}

fn setup_test_logging(filter: &str) {
    debug!("Attempting logger init from testing.rs");
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
        return;
    }

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(EnvFilter::new(filter)),
    );

    subscriber.try_init().unwrap_or_else(|e| {
        eprintln!("Error: Failed to set up logging: {}", e);
    });
}

/// Restores the `TAGEDIT_*` environment on drop
#[derive(Debug, Clone)]
pub struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
}

impl Default for EnvGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvGuard {
    pub fn new() -> Self {
        Self {
            saved: [ENV_ADD_TAG_INPUT_TEXT, ENV_SUBMIT_ON_BLUR, ENV_MAX_TAG_LIMIT]
                .into_iter()
                .map(|key| (key, env::var(key).ok()))
                .collect(),
        }
    }
}

impl Drop for EnvGuard {
    #[instrument(level = "trace")]
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCall {
    Render(RenderedSet),
    Provisional(TagInput),
    Edit(TagInput),
}

/// View that records every call instead of drawing
#[derive(Debug, Default)]
pub struct RecordingView {
    pub calls: Vec<ViewCall>,
}

impl RecordingView {
    /// Most recent full render of a set (clean id)
    pub fn last_render(&self, set_id: &str) -> Option<&RenderedSet> {
        self.calls.iter().rev().find_map(|call| match call {
            ViewCall::Render(set) if set.set_id == set_id => Some(set),
            _ => None,
        })
    }

    pub fn render_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, ViewCall::Render(_)))
            .count()
    }
}

impl TagView for RecordingView {
    fn render(&mut self, set: &RenderedSet) {
        self.calls.push(ViewCall::Render(set.clone()));
    }

    fn present_provisional(&mut self, input: &TagInput) {
        self.calls.push(ViewCall::Provisional(input.clone()));
    }

    fn enter_edit_mode(&mut self, input: &TagInput) {
        self.calls.push(ViewCall::Edit(input.clone()));
    }
}

/// Listener collecting notifications; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    events: Rc<RefCell<Vec<TagEvent>>>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<TagEvent> {
        self.events.borrow().clone()
    }

    pub fn added(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, TagEvent::Added { .. }))
            .count()
    }

    pub fn removed(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, TagEvent::Removed { .. }))
            .count()
    }
}

impl TagListener for RecordingListener {
    fn on_tag_added(&self, event: &TagEvent) {
        self.events.borrow_mut().push(event.clone());
    }

    fn on_tag_removed(&self, event: &TagEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn given_repeated_init_when_called_then_same_env() {
        let first = init_test_env() as *const TestEnv;
        let second = init_test_env() as *const TestEnv;
        assert_eq!(first, second);
    }

    #[test]
    #[serial]
    fn given_guard_when_dropped_then_env_restored() {
        env::remove_var(ENV_MAX_TAG_LIMIT);
        {
            let _guard = EnvGuard::new();
            env::set_var(ENV_MAX_TAG_LIMIT, "9");
        }
        assert!(env::var(ENV_MAX_TAG_LIMIT).is_err());
    }
}
