//! Structured-output extraction for Concept Mirror replies.
//!
//! Providers are instructed to answer with a single JSON object, but models
//! routinely wrap it in prose or markdown fences. The extractor locates the
//! first balanced `{...}` span (string- and escape-aware, so braces inside
//! string values cannot truncate or extend the span) and parses it into a
//! typed [`ConceptAnalysis`]. Parse failure never escapes: callers get the
//! fixed recovery value instead.

use crate::error::AssistantError;
use crate::types::ConceptAnalysis;

/// Locate the first balanced JSON object embedded in free-form text.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    // Opening brace never closed.
    None
}

/// Parse a provider reply into a typed analysis.
pub fn extract_analysis(text: &str) -> Result<ConceptAnalysis, AssistantError> {
    let span = extract_json_object(text)
        .ok_or_else(|| AssistantError::output_parse("no JSON object found in reply"))?;
    serde_json::from_str(span)
        .map_err(|e| AssistantError::output_parse(format!("invalid analysis payload: {e}")))
}

/// Fixed recovery value for a reply that answered but could not be parsed.
///
/// Distinct from the heuristic fallback: the provider responded, it just
/// responded unusably.
pub fn recovery_analysis() -> ConceptAnalysis {
    ConceptAnalysis {
        understood: vec!["Unable to parse the analysis response properly".to_string()],
        missing: Vec::new(),
        incorrect: Vec::new(),
        assumptions: Vec::new(),
        summary: "The analysis could not be completed. Please try again.".to_string(),
    }
}

/// Parse a reply, substituting the recovery value on any parse failure.
pub fn analysis_or_recovery(text: &str) -> ConceptAnalysis {
    match extract_analysis(text) {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::warn!(error = %e, "concept analysis reply was not parseable");
            recovery_analysis()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_object_surrounded_by_prose() {
        let text = r#"Here is my analysis:
{"understood": ["a"], "missing": [], "incorrect": [], "assumptions": [], "summary": "ok"}
Hope that helps!"#;
        let analysis = analysis_or_recovery(text);
        assert_eq!(analysis.understood, vec!["a"]);
        assert_eq!(analysis.summary, "ok");
    }

    #[test]
    fn nested_objects_stay_balanced() {
        let text = r#"{"outer": {"inner": 1}, "summary": "nested"} trailing }"#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"outer": {"inner": 1}, "summary": "nested"}"#)
        );
    }

    #[test]
    fn braces_inside_strings_are_ignored() {
        let text = r#"{"summary": "use {braces} and \"quotes\" freely"}"#;
        assert_eq!(extract_json_object(text), Some(text));
    }

    #[test]
    fn no_brace_yields_recovery_value() {
        let analysis = analysis_or_recovery("I cannot answer that in JSON, sorry.");
        assert_eq!(
            analysis.understood,
            vec!["Unable to parse the analysis response properly"]
        );
        assert!(analysis.missing.is_empty());
        assert_eq!(
            analysis.summary,
            "The analysis could not be completed. Please try again."
        );
    }

    #[test]
    fn malformed_json_yields_recovery_value() {
        let err = extract_analysis(r#"{"understood": [unquoted]}"#).unwrap_err();
        assert!(err.is_output_parse());
        let analysis = analysis_or_recovery(r#"{"understood": [unquoted]}"#);
        assert_eq!(analysis, recovery_analysis());
    }

    #[test]
    fn unclosed_object_yields_recovery_value() {
        assert_eq!(extract_json_object(r#"{"summary": "never ends"#), None);
    }

    #[test]
    fn partial_payload_fills_defaults() {
        let analysis = analysis_or_recovery(r#"{"summary": "just a summary"}"#);
        assert_eq!(analysis.summary, "just a summary");
        assert!(analysis.understood.is_empty());
        assert!(analysis.assumptions.is_empty());
    }
}
