// src/cli/commands.rs
use std::io::{self, Write};
use std::path::Path;

use crossterm::style::Stylize;
use tracing::{debug, instrument};

use crate::application::error::ApplicationResult;
use crate::application::{TagSetController, Transition};
use crate::cli::error::{CliError, CliResult};
use crate::config::Settings;
use crate::domain::events::TagEvent;
use crate::domain::view::TagView;
use crate::infrastructure::json::{read_script, write_tags_as_json, ScriptEvent};
use crate::infrastructure::TerminalView;

/// Dispatch one scripted interaction to the controller
pub fn apply_event<V: TagView>(
    controller: &mut TagSetController<V>,
    event: &ScriptEvent,
) -> ApplicationResult<Transition> {
    match event {
        ScriptEvent::SetTags { set, labels } => Ok(controller.set_tags(set, labels.iter().cloned())),
        ScriptEvent::Add { set } => Ok(controller.begin_add(set)),
        ScriptEvent::Edit { set, tag } => Ok(controller.begin_edit(set, tag)),
        ScriptEvent::Save { set, tag, value } => controller.save(set, tag, value),
        ScriptEvent::Blur { set, tag, value } => controller.blur(set, tag, value),
        ScriptEvent::Delete { set, tag } => controller.delete(set, tag),
        ScriptEvent::Editable { set, value } => Ok(controller.set_tags_editable(set, value)),
    }
}

#[instrument(level = "debug", skip(settings))]
pub fn replay(
    settings: &Settings,
    script: &Path,
    is_json: bool,
    quiet: bool,
    color: bool,
) -> CliResult<()> {
    let events = read_script(script)?;

    let out: Box<dyn Write> = if quiet {
        Box::new(io::sink())
    } else {
        Box::new(io::stderr())
    };
    let mut controller = TagSetController::new(settings.clone(), TerminalView::new(out, color));
    controller.subscribe(move |event: &TagEvent| {
        if color {
            eprintln!("{}", event.to_string().yellow());
        } else {
            eprintln!("{}", event);
        }
    });

    for (i, event) in events.iter().enumerate() {
        let transition = apply_event(&mut controller, event)
            .map_err(|e| CliError::from(e).context(format!("Event {}", i + 1)))?;
        debug!(index = i + 1, ?transition, "applied");
    }

    let tags = controller.get_all_tags();
    if is_json {
        write_tags_as_json(&tags)?;
    } else {
        let mut stdout = io::stdout().lock();
        for (set_id, labels) in &tags {
            writeln!(stdout, "{}: {}", set_id, labels.join(", "))?;
        }
        stdout.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::json::parse_script;
    use crate::util::testing::{init_test_env, RecordingView};

    fn run(settings: Settings, script: &str) -> TagSetController<RecordingView> {
        let _ = init_test_env();
        let mut controller = TagSetController::new(settings, RecordingView::default());
        for event in parse_script(script).unwrap() {
            apply_event(&mut controller, &event).unwrap();
        }
        controller
    }

    #[test]
    fn given_add_and_save_events_when_applied_then_tag_committed() {
        let c = run(
            Settings::default(),
            r#"[
                {"op": "set_tags", "set": "tag-set-p", "labels": ["a"]},
                {"op": "add", "set": "tag-set-p"},
                {"op": "save", "set": "tag-set-p", "tag": "tag-set-p__new-tag-1", "value": "b"}
            ]"#,
        );
        assert_eq!(c.get_tags_by_tag_set_id("p"), vec!["a", "b"]);
    }

    #[test]
    fn given_editable_string_event_when_applied_then_coerced() {
        let c = run(
            Settings::default(),
            r#"[
                {"op": "set_tags", "set": "p", "labels": ["a"]},
                {"op": "editable", "set": "p", "value": "nope"}
            ]"#,
        );
        assert!(!c.state("p").unwrap().editable);
    }

    #[test]
    fn given_delete_of_missing_tag_when_applied_then_error() {
        let _ = init_test_env();
        let mut controller = TagSetController::new(Settings::default(), RecordingView::default());
        let event = ScriptEvent::Delete {
            set: "p".to_string(),
            tag: "tag-0".to_string(),
        };
        assert!(apply_event(&mut controller, &event).is_err());
    }
}
