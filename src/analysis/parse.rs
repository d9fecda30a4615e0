//! Turning the model's reply text into an [`AnalysisResult`].
//!
//! Three steps, each of which may reject the reply:
//!
//! 1. [`strip_code_fence`] removes a markdown fence (```` ```json ... ``` ````)
//!    wrapped around the payload.
//! 2. The remainder must parse as a JSON **object**.
//! 3. [`merge_defaults`] lays the parsed object over a fully populated default
//!    object, so absent fields keep their zero / empty value, and the merged
//!    object is deserialized into the typed result.

use serde_json::{Map, Value};
use thiserror::Error;

use super::result::AnalysisResult;

/// Why a reply could not be turned into an [`AnalysisResult`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// The text is not JSON at all.
    #[error("reply is not valid JSON: {0}")]
    NotJson(#[source] serde_json::Error),

    /// The text is JSON but not an object (e.g. an array or a string).
    #[error("reply is JSON but not an object")]
    NotAnObject,

    /// A field has a value that cannot be coerced to its type.
    #[error("reply has an unexpected shape: {0}")]
    Shape(#[source] serde_json::Error),
}

/// Remove a leading ```` ``` ```` fence (with optional language tag) and a
/// trailing ```` ``` ```` fence, then trim surrounding whitespace.
///
/// Text without fences is only trimmed.
///
/// ```
/// use chat_vibes::analysis::strip_code_fence;
///
/// assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
/// assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
/// ```
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("```") {
        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+')))
            .unwrap_or(rest.len());
        body = &rest[tag_len..];
    }

    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }

    body.trim()
}

/// Deep-merge `patch` into `base`.
///
/// Objects are merged key by key; `null` in `patch` keeps the base value;
/// any other value (including arrays) replaces the base value wholesale.
/// Keys only present in `patch` are carried over.
pub fn merge_defaults(base: &mut Value, patch: Value) {
    match (base, patch) {
        (_, Value::Null) => {}
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge_defaults(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Parse a raw model reply into a fully defaulted [`AnalysisResult`].
pub fn parse_reply(reply: &str) -> Result<AnalysisResult, ParseError> {
    let body = strip_code_fence(reply);

    let parsed: Value = serde_json::from_str(body).map_err(ParseError::NotJson)?;
    let patch: Map<String, Value> = match parsed {
        Value::Object(map) => map,
        _ => return Err(ParseError::NotAnObject),
    };

    let mut merged = serde_json::to_value(AnalysisResult::default()).map_err(ParseError::Shape)?;
    merge_defaults(&mut merged, Value::Object(patch));

    serde_json::from_value(merged).map_err(ParseError::Shape)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ---- strip_code_fence ---

    #[test]
    fn strips_json_fence() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
    }

    #[test]
    fn strips_fence_without_newlines() {
        assert_eq!(strip_code_fence("```json{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn leaves_unfenced_text_alone() {
        assert_eq!(strip_code_fence("not json at all"), "not json at all");
    }

    #[test]
    fn strips_surrounding_whitespace_outside_fence() {
        assert_eq!(strip_code_fence("\n  ```JSON\r\n{}\r\n```  \n"), "{}");
    }

    // ---- merge_defaults ---

    #[test]
    fn merge_keeps_base_for_missing_and_null() {
        let mut base = json!({ "a": { "x": 0, "y": 0 }, "b": [] });
        merge_defaults(&mut base, json!({ "a": { "x": 5, "y": null } }));
        assert_eq!(base, json!({ "a": { "x": 5, "y": 0 }, "b": [] }));
    }

    #[test]
    fn merge_replaces_arrays_wholesale() {
        let mut base = json!({ "b": [1, 2, 3] });
        merge_defaults(&mut base, json!({ "b": [9] }));
        assert_eq!(base, json!({ "b": [9] }));
    }

    #[test]
    fn merge_carries_unknown_keys() {
        let mut base = json!({ "a": 1 });
        merge_defaults(&mut base, json!({ "extra": true }));
        assert_eq!(base, json!({ "a": 1, "extra": true }));
    }

    // ---- parse_reply ---

    #[test]
    fn fenced_partial_reply_is_defaulted() {
        let result = parse_reply("```json\n{\"moodMetrics\":{\"happy\":80}}\n```").unwrap();

        assert_eq!(result.mood_metrics.happy, 80.0);
        assert_eq!(result.mood_metrics.neutral, 0.0);
        assert_eq!(result.mood_metrics.sad, 0.0);
        assert_eq!(result.relationship_metrics.red_flags, 0);
        assert!(result.texting_styles.person1.emoji_stats.is_empty());
        assert!(result.fun_stats.who_texted_first.is_empty());
        assert_eq!(result.conversation_flow, Default::default());
    }

    #[test]
    fn full_reply_is_parsed() {
        let reply = json!({
            "participants": { "person1": "Alice", "person2": "Bob" },
            "textingStyles": {
                "person1": {
                    "enthusiasm": 90,
                    "responseTime": 3,
                    "emojiUsage": 70,
                    "emojiStats": [{ "emoji": "😂", "count": 12 }],
                    "textLength": "short",
                    "ghostingScore": 5
                }
            },
            "moodMetrics": { "happy": 60, "neutral": 30, "sad": 10 },
            "relationshipMetrics": { "compatibilityScore": 88, "greenFlags": 7 },
            "conversationFlow": { "topicVariety": 40 },
            "funStats": { "whoIsMoreClingy": "person2" }
        })
        .to_string();

        let result = parse_reply(&reply).unwrap();

        assert_eq!(result.participants.person1, "Alice");
        assert_eq!(result.texting_styles.person1.enthusiasm, 90.0);
        assert_eq!(result.texting_styles.person1.emoji_stats[0].emoji, "😂");
        assert_eq!(result.texting_styles.person2, Default::default());
        assert_eq!(result.mood_metrics.sad, 10.0);
        assert_eq!(result.relationship_metrics.compatibility_score, 88.0);
        assert_eq!(result.relationship_metrics.green_flags, 7);
        assert_eq!(result.conversation_flow.topic_variety, 40.0);
        assert_eq!(result.fun_stats.who_is_more_clingy, "person2");
    }

    #[test]
    fn plain_text_is_not_json() {
        assert!(matches!(
            parse_reply("not json at all"),
            Err(ParseError::NotJson(_))
        ));
    }

    #[test]
    fn json_array_is_not_an_object() {
        assert!(matches!(parse_reply("[1, 2]"), Err(ParseError::NotAnObject)));
    }

    #[test]
    fn wrong_field_type_is_a_shape_error() {
        assert!(matches!(
            parse_reply("{\"moodMetrics\": {\"happy\": [1]}}"),
            Err(ParseError::Shape(_))
        ));
    }

    #[test]
    fn null_group_keeps_defaults() {
        let result = parse_reply("{\"moodMetrics\": null}").unwrap();
        assert_eq!(result.mood_metrics, Default::default());
    }

    #[test]
    fn null_inside_array_entry_is_defaulted() {
        let result = parse_reply(
            r#"{"moodMetrics":{"happy":80},"textingStyles":{"person1":{"emojiStats":[{"emoji":null,"count":3}]}}}"#,
        )
        .unwrap();

        let stats = &result.texting_styles.person1.emoji_stats;
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].emoji, "");
        assert_eq!(stats[0].count, 3);
        assert_eq!(result.mood_metrics.happy, 80.0);
    }

    #[test]
    fn highlight_lists_are_parsed() {
        let reply = json!({
            "petNames": ["babe"],
            "insideJokes": ["the llama incident"],
            "compliments": [{ "from": "Alice", "to": "Bob", "text": "you're hilarious" }],
            "memoryLane": [{ "date": "26/01/24", "event": "first call" }],
            "wordCloud": [{ "word": "lol", "frequency": 42 }],
            "apologies": [{ "from": "Bob", "to": "Alice", "reason": "late reply" }],
            "media": { "images": 3 }
        })
        .to_string();

        let result = parse_reply(&reply).unwrap();

        assert_eq!(result.pet_names, vec!["babe"]);
        assert_eq!(result.inside_jokes.len(), 1);
        assert_eq!(result.compliments[0].to, "Bob");
        assert_eq!(result.memory_lane[0].event, "first call");
        assert_eq!(result.word_cloud[0].frequency, 42);
        assert_eq!(result.apologies[0].reason, "late reply");
        assert_eq!(result.media.images, 3);
        assert!(result.debates.is_empty());
        assert!(result.reply_speed.average.is_empty());
    }
}
