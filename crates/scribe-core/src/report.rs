//! The structured analysis report.

use serde::{Deserialize, Serialize};

/// Structured output of one analysis call.
///
/// Deserialized from the model's JSON text. Field names match the wire
/// schema declared in the request (`keyPoints`, `actionItems`), so the model
/// output parses directly. All fields are required; a payload missing any of
/// them fails to parse, which the client surfaces as a parse error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Verbatim transcript with filler words cleaned up.
    pub transcript: String,
    /// Executive summary.
    pub summary: String,
    /// Key bullet points, in the order the model produced them.
    pub key_points: Vec<String>,
    /// Actionable items or next steps. May be empty.
    pub action_items: Vec<String>,
    /// Overall speaker sentiment (e.g. `"Positive"`, `"Neutral"`, with a
    /// brief reason).
    pub sentiment: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_wire_format() {
        let json = r#"{
            "transcript": "Hello world",
            "summary": "A short greeting.",
            "keyPoints": ["Greeting exchanged"],
            "actionItems": [],
            "sentiment": "Neutral"
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.transcript, "Hello world");
        assert_eq!(result.summary, "A short greeting.");
        assert_eq!(result.key_points, vec!["Greeting exchanged"]);
        assert!(result.action_items.is_empty());
        assert_eq!(result.sentiment, "Neutral");
    }

    #[test]
    fn missing_field_fails_to_parse() {
        let json = r#"{"transcript": "t", "summary": "s", "keyPoints": []}"#;
        let result = serde_json::from_str::<AnalysisResult>(json);
        assert!(result.is_err());
    }

    #[test]
    fn wrong_type_fails_to_parse() {
        let json = r#"{
            "transcript": "t",
            "summary": "s",
            "keyPoints": "not an array",
            "actionItems": [],
            "sentiment": "Neutral"
        }"#;
        assert!(serde_json::from_str::<AnalysisResult>(json).is_err());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let result = AnalysisResult {
            transcript: "t".into(),
            summary: "s".into(),
            key_points: vec!["p1".into()],
            action_items: vec![],
            sentiment: "Mixed".into(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("keyPoints").is_some());
        assert!(value.get("actionItems").is_some());
        assert!(value.get("key_points").is_none());
    }

    #[test]
    fn key_point_order_is_preserved() {
        let json = r#"{
            "transcript": "t",
            "summary": "s",
            "keyPoints": ["first", "second", "third"],
            "actionItems": ["do it"],
            "sentiment": "Positive"
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.key_points, vec!["first", "second", "third"]);
    }
}
