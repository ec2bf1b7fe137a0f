//! The fixed instruction prompt and the declared response schema.

use serde_json::{Value, json};

/// Instruction sent alongside the media on every call. Fixed text; the
/// response schema below enforces the output shape.
pub const ANALYSIS_PROMPT: &str = "\
Analyze this media file.
1. Provide a verbatim transcript (clean up filler words like 'um', 'uh').
2. Create a comprehensive executive summary.
3. Extract 5 key bullet points.
4. Identify any actionable items or next steps mentioned.
5. Determine the overall sentiment of the speaker(s).

Return the result in JSON format following this structure:
{
  \"transcript\": \"full text...\",
  \"summary\": \"executive summary...\",
  \"keyPoints\": [\"point 1\", \"point 2\", ...],
  \"actionItems\": [\"action 1\", \"action 2\", ...],
  \"sentiment\": \"Positive/Neutral/Negative/Mixed with brief reason\"
}";

/// JSON schema declared in `generationConfig.responseSchema`. Every report
/// field is required, so a conforming response always parses into
/// [`AnalysisResult`](scribe_core::AnalysisResult).
#[must_use]
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "transcript": { "type": "STRING" },
            "summary": { "type": "STRING" },
            "keyPoints": { "type": "ARRAY", "items": { "type": "STRING" } },
            "actionItems": { "type": "ARRAY", "items": { "type": "STRING" } },
            "sentiment": { "type": "STRING" }
        },
        "required": ["transcript", "summary", "keyPoints", "actionItems", "sentiment"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_all_five_tasks() {
        assert!(ANALYSIS_PROMPT.contains("verbatim transcript"));
        assert!(ANALYSIS_PROMPT.contains("executive summary"));
        assert!(ANALYSIS_PROMPT.contains("5 key bullet points"));
        assert!(ANALYSIS_PROMPT.contains("actionable items"));
        assert!(ANALYSIS_PROMPT.contains("sentiment"));
    }

    #[test]
    fn schema_requires_every_field() {
        let schema = response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            required,
            vec!["transcript", "summary", "keyPoints", "actionItems", "sentiment"]
        );
        for field in required {
            assert!(schema["properties"].get(field).is_some());
        }
    }

    #[test]
    fn schema_array_fields_hold_strings() {
        let schema = response_schema();
        assert_eq!(schema["properties"]["keyPoints"]["type"], "ARRAY");
        assert_eq!(
            schema["properties"]["keyPoints"]["items"]["type"],
            "STRING"
        );
        assert_eq!(schema["properties"]["actionItems"]["type"], "ARRAY");
    }
}
