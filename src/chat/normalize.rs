//! Normalizes assistant message payloads into plain text.
//!
//! The assistant service returns message content in more than one
//! shape: a list of typed content blocks, a bare scalar, or nothing at
//! all. `extract_message_text` reduces any of them to a single string
//! and never fails, so a malformed payload shows up as placeholder text
//! in the transcript instead of aborting the turn.
use anyhow::{Result, anyhow};
use serde_json::Value;

pub const EMPTY_MESSAGE: &str = "[Empty message]";

/// Message content reduced to the closed set of shapes the service is
/// known to produce.
#[derive(Clone, Debug, PartialEq)]
pub enum RawContent {
    Blocks(Vec<Block>),
    Scalar(String),
    Empty,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Text(String),
    Unsupported,
}

/// Extract the displayable text of a message payload. Total over any
/// JSON value: worst case the result is a placeholder.
pub fn extract_message_text(message: &Value) -> String {
    match parse_content(message) {
        Ok(content) => render(&content),
        Err(e) => format!("[Error reading message: {}]", e),
    }
}

/// Reduce the `content` field of a message payload to `RawContent`.
/// A block tagged `type == "text"` must carry a string `text.value`;
/// any other tag is carried as `Block::Unsupported`.
pub fn parse_content(message: &Value) -> Result<RawContent> {
    let content = match message.get("content") {
        None | Some(Value::Null) => return Ok(RawContent::Empty),
        Some(content) => content,
    };

    match content {
        Value::Array(items) => {
            let mut blocks = Vec::with_capacity(items.len());
            for item in items {
                if item.get("type").and_then(Value::as_str) == Some("text") {
                    let text = item["text"]["value"]
                        .as_str()
                        .ok_or_else(|| anyhow!("text block missing text.value: {}", item))?;
                    blocks.push(Block::Text(text.to_string()));
                } else {
                    blocks.push(Block::Unsupported);
                }
            }
            Ok(RawContent::Blocks(blocks))
        }
        Value::String(s) => Ok(RawContent::Scalar(s.clone())),
        other if other.is_number() || other.is_boolean() => {
            Ok(RawContent::Scalar(other.to_string()))
        }
        _ => Ok(RawContent::Empty),
    }
}

fn render(content: &RawContent) -> String {
    match content {
        RawContent::Blocks(blocks) => {
            let texts: Vec<&str> = blocks
                .iter()
                .filter_map(|block| match block {
                    Block::Text(text) => Some(text.as_str()),
                    Block::Unsupported => None,
                })
                .collect();
            if texts.is_empty() {
                EMPTY_MESSAGE.to_string()
            } else {
                texts.join("\n\n")
            }
        }
        RawContent::Scalar(s) => s.clone(),
        RawContent::Empty => EMPTY_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_extract_joins_text_blocks_in_order() {
        let message = json!({
            "id": "msg_1",
            "role": "assistant",
            "content": [
                {"type": "text", "text": {"value": "First paragraph", "annotations": []}},
                {"type": "text", "text": {"value": "Second paragraph", "annotations": []}}
            ]
        });
        assert_eq!(
            extract_message_text(&message),
            "First paragraph\n\nSecond paragraph"
        );
    }

    #[test]
    fn test_extract_skips_non_text_blocks() {
        let message = json!({
            "content": [
                {"type": "image_file", "image_file": {"file_id": "file_1"}},
                {"type": "text", "text": {"value": "Caption"}}
            ]
        });
        assert_eq!(extract_message_text(&message), "Caption");
    }

    #[test]
    fn test_extract_blocks_without_text_is_placeholder() {
        let message = json!({
            "content": [{"type": "image_file", "image_file": {"file_id": "file_1"}}]
        });
        assert_eq!(extract_message_text(&message), EMPTY_MESSAGE);
    }

    #[test]
    fn test_extract_empty_block_list_is_placeholder() {
        let message = json!({"content": []});
        assert_eq!(extract_message_text(&message), EMPTY_MESSAGE);
    }

    #[test]
    fn test_extract_scalar_string_passes_through() {
        let message = json!({"content": "hello"});
        assert_eq!(extract_message_text(&message), "hello");

        let message = json!({"content": "ya estoy aquí"});
        assert_eq!(extract_message_text(&message), "ya estoy aquí");
    }

    #[test]
    fn test_extract_scalar_number_is_stringified() {
        let message = json!({"content": 42});
        assert_eq!(extract_message_text(&message), "42");
    }

    #[test]
    fn test_extract_missing_content_is_placeholder() {
        let message = json!({"id": "msg_1", "role": "assistant"});
        assert_eq!(extract_message_text(&message), EMPTY_MESSAGE);
    }

    #[test]
    fn test_extract_null_content_is_placeholder() {
        let message = json!({"content": null});
        assert_eq!(extract_message_text(&message), EMPTY_MESSAGE);
    }

    #[test]
    fn test_extract_object_content_is_placeholder() {
        let message = json!({"content": {"unexpected": "shape"}});
        assert_eq!(extract_message_text(&message), EMPTY_MESSAGE);
    }

    #[test]
    fn test_extract_text_block_without_value_reports_error() {
        let message = json!({"content": [{"type": "text"}]});
        let out = extract_message_text(&message);
        assert!(out.starts_with("[Error reading message:"), "got: {}", out);
    }

    #[test]
    fn test_extract_text_block_with_non_string_value_reports_error() {
        let message = json!({"content": [{"type": "text", "text": {"value": 7}}]});
        let out = extract_message_text(&message);
        assert!(out.starts_with("[Error reading message:"), "got: {}", out);
    }

    #[test]
    fn test_parse_content_keeps_unsupported_blocks() {
        let message = json!({
            "content": [
                {"type": "text", "text": {"value": "Hi"}},
                {"type": "image_file", "image_file": {"file_id": "file_1"}}
            ]
        });
        let parsed = parse_content(&message).unwrap();
        assert_eq!(
            parsed,
            RawContent::Blocks(vec![Block::Text("Hi".to_string()), Block::Unsupported])
        );
    }
}
