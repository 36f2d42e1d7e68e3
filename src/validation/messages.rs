//! Structured checker messages parsed from `--format json` output.
//!
//! Field meanings follow the checker's JSON output documentation:
//! <https://github.com/validator/validator/wiki/Output-%C2%BB-JSON>

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::Result;

/// One finding reported by the checker. Every field is optional because the
/// checker only emits the ones that apply.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticMessage {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(rename = "subType", alias = "subtype")]
    pub subtype: Option<String>,
    pub message: Option<String>,
    pub extract: Option<String>,
    pub offset: Option<u64>,
    pub url: Option<String>,
    pub first_line: Option<u64>,
    pub first_column: Option<u64>,
    pub last_line: Option<u64>,
    pub last_column: Option<u64>,
    /// Fields this crate does not model, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DiagnosticMessage {
    pub fn is_error(&self) -> bool {
        self.kind.as_deref() == Some("error")
    }

    pub fn is_info(&self) -> bool {
        self.kind.as_deref() == Some("info")
    }
}

#[derive(Deserialize)]
struct MessageDocument {
    messages: Vec<DiagnosticMessage>,
}

/// Parse a JSON diagnostic document and return its `messages`, in order.
pub fn parse_messages(text: &str) -> Result<Vec<DiagnosticMessage>> {
    let document: MessageDocument = serde_json::from_str(text)?;
    Ok(document.messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidatorError;

    #[test]
    fn test_empty_message_list() {
        assert!(parse_messages(r#"{"messages":[]}"#).unwrap().is_empty());
    }

    #[test]
    fn test_fields_and_order_preserved() {
        let text = r#"{"messages":[
            {"type":"error","url":"file:/tmp/a.html","lastLine":1,"lastColumn":6,
             "firstColumn":1,"message":"Start tag seen without seeing a doctype first. Expected “<!DOCTYPE html>”.",
             "extract":"<html><head>","hiliteStart":0,"hiliteLength":6},
            {"type":"info","subType":"warning","firstLine":1,"lastLine":2,
             "message":"Consider adding a “lang” attribute to the “html” start tag to declare the language of this document."}
        ]}"#;

        let messages = parse_messages(text).unwrap();
        assert_eq!(messages.len(), 2);

        let first = &messages[0];
        assert!(first.is_error());
        assert_eq!(first.last_line, Some(1));
        assert_eq!(first.first_line, None);
        assert!(
            first
                .message
                .as_deref()
                .unwrap()
                .starts_with("Start tag seen without seeing a doctype first")
        );
        assert_eq!(first.extra.get("hiliteLength"), Some(&Value::from(6)));

        let second = &messages[1];
        assert!(second.is_info());
        assert_eq!(second.subtype.as_deref(), Some("warning"));
        assert_eq!(second.first_line, Some(1));
        assert_eq!(second.last_line, Some(2));
        assert!(
            second
                .message
                .as_deref()
                .unwrap()
                .starts_with("Consider adding a \u{201C}lang\u{201D} attribute")
        );
    }

    #[test]
    fn test_lowercase_subtype_accepted() {
        let messages = parse_messages(r#"{"messages":[{"type":"error","subtype":"fatal"}]}"#).unwrap();
        assert_eq!(messages[0].subtype.as_deref(), Some("fatal"));
        assert!(messages[0].extra.is_empty());
    }

    #[test]
    fn test_malformed_json_is_data_format_error() {
        let err = parse_messages("{\"messages\": [").unwrap_err();
        assert!(matches!(err, ValidatorError::DataFormat(_)));
    }

    #[test]
    fn test_missing_messages_key_is_data_format_error() {
        let err = parse_messages(r#"{"other": 1}"#).unwrap_err();
        assert!(matches!(err, ValidatorError::DataFormat(_)));
    }
}
