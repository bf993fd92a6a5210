//! Wire protocol: command normalization and response shapes.
//!
//! Commands arrive as free-form JSON objects. [`parse_frame`] applies one
//! total, fixed resolution order so the duck-typed shape (`command` or
//! `action` key, dedicated payload or whole-object fallback) is pinned down
//! in a single place and testable independently of the dispatcher.

use serde::Serialize;
use serde_json::{Map, Value};

/// Primary key naming a command's action.
pub const KEY_COMMAND: &str = "command";
/// Secondary key naming a command's action.
pub const KEY_ACTION: &str = "action";
/// Key holding the dedicated payload object.
pub const KEY_DATA: &str = "data";

pub const ACTION_LOAD: &str = "load";
pub const ACTION_EMBED: &str = "embed";
pub const ACTION_INFO: &str = "info";
pub const ACTION_HEALTH: &str = "health";
pub const ACTION_EXIT: &str = "exit";

/// A normalized inbound command.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Resolved action name; empty when the frame named none.
    pub action: String,
    /// Payload mapping: the `data` object when present, else the whole frame.
    pub data: Map<String, Value>,
}

/// Outcome of normalizing one inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedFrame {
    /// A `null` frame; dropped without a response.
    Ignored,
    /// Valid JSON but not an object; answered with an error response.
    Invalid(String),
    /// A command to dispatch.
    Command(Command),
}

/// Normalize one decoded frame.
///
/// Resolution order:
/// 1. `null` frames are ignored.
/// 2. Non-object frames are invalid.
/// 3. The action is the first non-empty string under `"command"` then
///    `"action"`; otherwise the empty string (answered as an unknown action).
/// 4. The payload is the `"data"` object when one is present, otherwise the
///    whole frame. Any other keys are ignored.
pub fn parse_frame(frame: Value) -> ParsedFrame {
    let obj = match frame {
        Value::Null => return ParsedFrame::Ignored,
        Value::Object(obj) => obj,
        other => {
            return ParsedFrame::Invalid(format!(
                "command must be a JSON object, got {}",
                json_type_name(&other)
            ));
        }
    };

    let action = [KEY_COMMAND, KEY_ACTION]
        .iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .unwrap_or("")
        .to_string();

    let data = if let Some(Value::Object(data)) = obj.get(KEY_DATA) {
        data.clone()
    } else {
        obj
    };

    ParsedFrame::Command(Command { action, data })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One outbound response.
///
/// Serialized untagged, so the action-specific fields sit at the top level
/// of the JSON object and failures are exactly `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    /// Startup announcement.
    Ready { status: String, model: String },
    /// Successful load.
    Loaded {
        status: String,
        model: String,
        dimension: usize,
    },
    /// Successful embed.
    Embeddings {
        embeddings: Vec<Vec<f32>>,
        model: String,
        dimension: usize,
    },
    /// Cache state report.
    Info {
        model: Option<String>,
        dimension: Option<usize>,
        ready: bool,
    },
    /// Health probe outcome.
    Health {
        status: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// Exit acknowledgement.
    Exiting { status: String },
    /// Structured failure.
    Error { error: String },
}

impl Response {
    pub fn ready(model: impl Into<String>) -> Self {
        Response::Ready {
            status: "ready".into(),
            model: model.into(),
        }
    }

    pub fn loaded(model: impl Into<String>, dimension: usize) -> Self {
        Response::Loaded {
            status: "ok".into(),
            model: model.into(),
            dimension,
        }
    }

    pub fn health_ok() -> Self {
        Response::Health {
            status: "ok".into(),
            error: None,
        }
    }

    pub fn health_error(error: impl Into<String>) -> Self {
        Response::Health {
            status: "error".into(),
            error: Some(error.into()),
        }
    }

    pub fn exiting() -> Self {
        Response::Exiting {
            status: "exiting".into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            error: message.into(),
        }
    }

    pub fn unknown_action(action: &str) -> Self {
        Response::error(format!("Unknown action: {action}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn expect_command(frame: Value) -> Command {
        match parse_frame(frame) {
            ParsedFrame::Command(cmd) => cmd,
            other => panic!("expected command, got {other:?}"),
        }
    }

    #[test]
    fn test_command_key_wins_over_action_key() {
        let cmd = expect_command(json!({"command": "info", "action": "embed"}));
        assert_eq!(cmd.action, "info");
    }

    #[test]
    fn test_action_key_used_when_command_absent_or_empty() {
        let cmd = expect_command(json!({"action": "embed"}));
        assert_eq!(cmd.action, "embed");

        let cmd = expect_command(json!({"command": "", "action": "load"}));
        assert_eq!(cmd.action, "load");
    }

    #[test]
    fn test_non_string_action_value_skipped() {
        let cmd = expect_command(json!({"command": 5, "action": "info"}));
        assert_eq!(cmd.action, "info");
    }

    #[test]
    fn test_missing_action_resolves_to_empty() {
        let cmd = expect_command(json!({"texts": ["x"]}));
        assert_eq!(cmd.action, "");
    }

    #[test]
    fn test_dedicated_payload_preferred() {
        let cmd = expect_command(json!({
            "command": "embed",
            "data": {"texts": ["a"]},
            "texts": ["ignored"]
        }));
        assert_eq!(cmd.data.get("texts"), Some(&json!(["a"])));
    }

    #[test]
    fn test_whole_frame_is_payload_fallback() {
        let cmd = expect_command(json!({"action": "load", "model": "bge-small-en-v1.5"}));
        assert_eq!(
            cmd.data.get("model").and_then(Value::as_str),
            Some("bge-small-en-v1.5")
        );
    }

    #[test]
    fn test_non_object_data_falls_back_to_whole_frame() {
        let cmd = expect_command(json!({"action": "embed", "data": "nope", "texts": "x"}));
        assert_eq!(cmd.data.get("texts"), Some(&json!("x")));
    }

    #[test]
    fn test_null_frame_ignored() {
        assert_eq!(parse_frame(Value::Null), ParsedFrame::Ignored);
    }

    #[test]
    fn test_non_object_frame_invalid() {
        match parse_frame(json!([1, 2, 3])) {
            ParsedFrame::Invalid(msg) => assert!(msg.contains("an array")),
            other => panic!("expected invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_ready_shape() {
        let value = serde_json::to_value(Response::ready("all-MiniLM-L6-v2")).unwrap();
        assert_eq!(
            value,
            json!({"status": "ready", "model": "all-MiniLM-L6-v2"})
        );
    }

    #[test]
    fn test_loaded_shape() {
        let value = serde_json::to_value(Response::loaded("all-MiniLM-L6-v2", 384)).unwrap();
        assert_eq!(
            value,
            json!({"status": "ok", "model": "all-MiniLM-L6-v2", "dimension": 384})
        );
    }

    #[test]
    fn test_info_shape_when_not_ready() {
        let value = serde_json::to_value(Response::Info {
            model: None,
            dimension: None,
            ready: false,
        })
        .unwrap();
        assert_eq!(
            value,
            json!({"model": null, "dimension": null, "ready": false})
        );
    }

    #[test]
    fn test_health_shapes() {
        let ok = serde_json::to_value(Response::health_ok()).unwrap();
        assert_eq!(ok, json!({"status": "ok"}));

        let err = serde_json::to_value(Response::health_error("boom")).unwrap();
        assert_eq!(err, json!({"status": "error", "error": "boom"}));
    }

    #[test]
    fn test_error_and_exit_shapes() {
        let err = serde_json::to_value(Response::unknown_action("frobnicate")).unwrap();
        assert_eq!(err, json!({"error": "Unknown action: frobnicate"}));

        let exiting = serde_json::to_value(Response::exiting()).unwrap();
        assert_eq!(exiting, json!({"status": "exiting"}));
    }
}
