// src/infrastructure/json.rs
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};

/// One recorded user interaction, as the view's event layer would dispatch it.
///
/// Script format (JSON array):
///
/// ```json
/// [
///   {"op": "set_tags", "set": "tag-set-p", "labels": ["a", "b"]},
///   {"op": "add", "set": "tag-set-p"},
///   {"op": "save", "set": "tag-set-p", "tag": "tag-set-p__new-tag-2", "value": "c"},
///   {"op": "editable", "set": "tag-set-p", "value": "false"}
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptEvent {
    SetTags {
        set: String,
        #[serde(default)]
        labels: Vec<String>,
    },
    Add {
        set: String,
    },
    Edit {
        set: String,
        tag: String,
    },
    Save {
        set: String,
        tag: String,
        #[serde(default)]
        value: String,
    },
    Blur {
        set: String,
        tag: String,
        #[serde(default)]
        value: String,
    },
    Delete {
        set: String,
        tag: String,
    },
    Editable {
        set: String,
        value: serde_json::Value,
    },
}

pub fn parse_script(text: &str) -> DomainResult<Vec<ScriptEvent>> {
    serde_json::from_str(text).map_err(|e| DomainError::InvalidScript(e.to_string()))
}

#[instrument(level = "debug")]
pub fn read_script(path: &Path) -> DomainResult<Vec<ScriptEvent>> {
    let text = fs::read_to_string(path)
        .map_err(|e| DomainError::InvalidScript(format!("Cannot read {}: {}", path.display(), e)))?;
    let events = parse_script(&text).map_err(|e| e.context(path.display().to_string()))?;
    debug!(count = events.len(), "script loaded");
    Ok(events)
}

/// Writes the set mapping as pretty JSON to standard output
pub fn write_tags_as_json(tags: &BTreeMap<String, Vec<String>>) -> DomainResult<()> {
    let json = serde_json::to_string_pretty(tags)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    #[test]
    fn given_script_with_all_ops_when_parsed_then_events_in_order() {
        let text = r#"[
            {"op": "set_tags", "set": "tag-set-p", "labels": ["a"]},
            {"op": "add", "set": "tag-set-p"},
            {"op": "edit", "set": "p", "tag": "tag-0"},
            {"op": "save", "set": "p", "tag": "tag-0"},
            {"op": "blur", "set": "p", "tag": "tag-0", "value": "x"},
            {"op": "delete", "set": "p", "tag": "tag-0"},
            {"op": "editable", "set": "p", "value": 0}
        ]"#;

        let events = parse_script(text).unwrap();

        assert_eq!(events.len(), 7);
        assert_eq!(
            events[0],
            ScriptEvent::SetTags {
                set: "tag-set-p".to_string(),
                labels: vec!["a".to_string()]
            }
        );
        assert_eq!(
            events[3],
            ScriptEvent::Save {
                set: "p".to_string(),
                tag: "tag-0".to_string(),
                value: String::new()
            }
        );
        assert_eq!(
            events[6],
            ScriptEvent::Editable {
                set: "p".to_string(),
                value: json!(0)
            }
        );
    }

    #[test]
    fn given_unknown_op_when_parsed_then_invalid_script() {
        let err = parse_script(r#"[{"op": "explode", "set": "p"}]"#).unwrap_err();
        assert!(matches!(err, DomainError::InvalidScript(_)));
    }

    #[test]
    fn given_script_file_when_read_then_parsed() -> DomainResult<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, r#"[{{"op": "add", "set": "p"}}]"#)?;

        let events = read_script(file.path())?;

        assert_eq!(events, vec![ScriptEvent::Add { set: "p".to_string() }]);
        Ok(())
    }

    #[test]
    fn given_missing_file_when_read_then_error_names_path() {
        let err = read_script(Path::new("/nonexistent/script.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/script.json"));
    }
}
