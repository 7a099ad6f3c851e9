//! Response normalization
//!
//! Reduces any agent response shape to the plain text stored in history.
//! There is no failure mode: unknown shapes degrade to their string form.

use crate::models::RawResponse;

/// Marker agents emit before their tool-invocation preamble
const TOOL_PREAMBLE_MARKER: &str = "Running:";

/// Extract and clean the text of an agent response
pub fn normalize(raw: &RawResponse) -> String {
    strip_tool_preamble(extract_text(raw).trim())
}

/// Pick the text out of a response, most specific shape first
fn extract_text(raw: &RawResponse) -> String {
    match raw {
        RawResponse::StructuredContent { content } => content.clone(),
        RawResponse::PlainText { text } => text.clone(),
        RawResponse::MessageList { messages } => match messages.last() {
            Some(last) => last.content.clone().unwrap_or_else(|| last.to_string()),
            None => raw.to_string(),
        },
        RawResponse::Opaque { .. } => raw.to_string(),
    }
}

/// Drop a leading "Running:" block.
///
/// Everything through the first blank line goes. Without a blank line only
/// the marker line goes and the rest is kept verbatim.
fn strip_tool_preamble(text: &str) -> String {
    if !text.starts_with(TOOL_PREAMBLE_MARKER) {
        return text.to_string();
    }

    let mut offset = 0;
    for (i, line) in text.split_inclusive('\n').enumerate() {
        offset += line.len();
        if i > 0 && line.trim().is_empty() {
            return text[offset..].trim_start().to_string();
        }
    }

    match text.find('\n') {
        Some(pos) => text[pos + 1..].to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AgentMessage;
    use serde_json::json;

    #[test]
    fn test_plain_text_is_trimmed() {
        let raw = RawResponse::plain("  Paris is the capital of France.\n\n");
        assert_eq!(normalize(&raw), "Paris is the capital of France.");
    }

    #[test]
    fn test_shapes_are_equivalent() {
        let text = " GOOG: $175.32 ... \n";
        let expected = "GOOG: $175.32 ...";

        let structured = RawResponse::structured(text);
        let plain = RawResponse::plain(text);
        let list = RawResponse::messages(vec![
            AgentMessage::new("user", "What is the stock price of Google?"),
            AgentMessage::new("assistant", text),
        ]);

        assert_eq!(normalize(&structured), expected);
        assert_eq!(normalize(&plain), expected);
        assert_eq!(normalize(&list), expected);
    }

    #[test]
    fn test_message_list_uses_last_turn() {
        let raw = RawResponse::messages(vec![
            AgentMessage::new("assistant", "first draft"),
            AgentMessage::new("assistant", "final answer"),
        ]);
        assert_eq!(normalize(&raw), "final answer");
    }

    #[test]
    fn test_message_without_content_falls_back_to_repr() {
        let raw = RawResponse::messages(vec![AgentMessage {
            role: Some("tool".to_string()),
            content: None,
        }]);
        assert_eq!(normalize(&raw), r#"{"role":"tool"}"#);
    }

    #[test]
    fn test_empty_message_list_falls_back_to_repr() {
        let raw = RawResponse::messages(vec![]);
        assert_eq!(normalize(&raw), "[]");
    }

    #[test]
    fn test_opaque_values() {
        let raw = RawResponse::opaque(json!({"tool_calls": [{"name": "get_stock_price"}]}));
        assert_eq!(
            normalize(&raw),
            r#"{"tool_calls":[{"name":"get_stock_price"}]}"#
        );

        let raw = RawResponse::opaque(json!("  just text  "));
        assert_eq!(normalize(&raw), "just text");

        let raw = RawResponse::opaque(json!(42));
        assert_eq!(normalize(&raw), "42");
    }

    #[test]
    fn test_strips_running_preamble() {
        let raw = RawResponse::plain("Running:\n\nHere is the earnings summary...");
        assert_eq!(normalize(&raw), "Here is the earnings summary...");

        let raw = RawResponse::structured(
            "Running:\n - get_current_stock_price(symbol=NVDA)\n - get_company_news(symbol=NVDA)\n\nNVDA trades at $120.",
        );
        assert_eq!(normalize(&raw), "NVDA trades at $120.");
    }

    #[test]
    fn test_preamble_with_whitespace_only_separator() {
        let raw = RawResponse::plain("Running:\n - search(query=weather)\n   \n\nSunny today.");
        assert_eq!(normalize(&raw), "Sunny today.");
    }

    #[test]
    fn test_preamble_with_crlf_separator() {
        let raw = RawResponse::plain("Running:\r\n\r\nBody");
        assert_eq!(normalize(&raw), "Body");
    }

    #[test]
    fn test_preamble_without_blank_line_drops_marker_line_only() {
        let raw = RawResponse::plain("Running: get_stock_price(AAPL)\nAAPL: $190\n  indented note");
        assert_eq!(normalize(&raw), "AAPL: $190\n  indented note");

        let raw = RawResponse::plain("Running: search()");
        assert_eq!(normalize(&raw), "");
    }

    #[test]
    fn test_marker_must_lead() {
        let raw = RawResponse::plain("Status: Running:\n\nstill here");
        assert_eq!(normalize(&raw), "Status: Running:\n\nstill here");
    }
}
