//! Prompt construction for the execution backend.

use serde_json::Value;

/// Build the message handed to the backend agent.
///
/// - `research`: the `query` field, else `topic`, else empty
/// - `write`: `"Write about: "` followed by `topic`, else `content`
/// - anything else: the action and the compact JSON input on two lines
pub fn build_prompt(action: &str, input: &Value) -> String {
    match action {
        "research" => field_text(input, &["query", "topic"]),
        "write" => format!("Write about: {}", field_text(input, &["topic", "content"])),
        _ => format!("Action: {action}\nInput: {input}"),
    }
}

/// First present, non-null field among `keys`, as text.
fn field_text(input: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| input.get(*key))
        .find(|value| !value.is_null())
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_research_prefers_query() {
        let input = json!({ "query": "rust async", "topic": "ignored" });
        assert_eq!(build_prompt("research", &input), "rust async");
        assert_eq!(build_prompt("research", &json!({ "topic": "llms" })), "llms");
        assert_eq!(build_prompt("research", &json!({})), "");
    }

    #[test]
    fn test_write_template() {
        assert_eq!(
            build_prompt("write", &json!({ "content": "release notes" })),
            "Write about: release notes"
        );
        assert_eq!(build_prompt("write", &json!({})), "Write about: ");
    }

    #[test]
    fn test_generic_template_uses_compact_json() {
        let prompt = build_prompt("implement a function", &json!({ "lang": "rust" }));
        assert_eq!(prompt, "Action: implement a function\nInput: {\"lang\":\"rust\"}");
    }

    #[test]
    fn test_non_string_fields_are_stringified() {
        assert_eq!(build_prompt("research", &json!({ "query": 42 })), "42");
    }
}
