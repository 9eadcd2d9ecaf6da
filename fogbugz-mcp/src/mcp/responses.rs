//! Response creation utilities for MCP operations

use rmcp::model::*;
use rmcp::Error as McpError;
use serde::Serialize;

/// Create a success response for MCP tool calls
pub fn create_success_response(message: String) -> CallToolResult {
    CallToolResult {
        content: vec![Annotated::new(
            RawContent::Text(RawTextContent { text: message }),
            None,
        )],
        is_error: Some(false),
    }
}

/// Create a success response holding `value` as pretty-printed JSON
pub fn create_json_response<T: Serialize + ?Sized>(
    value: &T,
) -> std::result::Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(format!("Failed to serialize tool output: {e}"), None)
    })?;
    Ok(create_success_response(text))
}

/// Concatenate the text parts of a tool result
pub fn response_text(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|content| match &content.raw {
            RawContent::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}
