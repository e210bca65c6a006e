//! Annotation Response Parsing
//!
//! The service is instructed to reply with bare JSON, but local models
//! routinely wrap it in prose. Parsing slices from the first `{` to the
//! last `}` before handing the substring to serde; anything that still
//! fails is a format failure for that attempt.

use serde::Deserialize;

use crate::types::{Annotation, ChunkError, Result};

#[derive(Deserialize)]
struct RawAnnotation {
    summary: String,
    #[serde(default)]
    docstrings: Vec<String>,
}

/// Slice the JSON object out of a possibly chatty reply.
fn json_object(content: &str) -> Result<&str> {
    match (content.find('{'), content.rfind('}')) {
        (Some(start), Some(end)) if start <= end => Ok(&content[start..=end]),
        _ => Err(ChunkError::format("no JSON object in response")),
    }
}

/// Parse the structured `{summary, docstrings}` annotation from a raw reply.
///
/// Docstring entries are trimmed and empty ones dropped. A reply without a
/// `summary` key is malformed.
pub fn parse_annotation(content: &str) -> Result<Annotation> {
    let raw: RawAnnotation = serde_json::from_str(json_object(content)?)
        .map_err(|e| ChunkError::format(format!("malformed annotation JSON: {}", e)))?;

    let docstrings = raw
        .docstrings
        .iter()
        .map(|d| d.trim())
        .filter(|d| !d.is_empty())
        .map(String::from)
        .collect();

    Ok(Annotation {
        summary: raw.summary.trim().to_string(),
        docstrings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_bare_json() {
        let annotation = parse_annotation(
            r#"{"summary": "A command pattern demo.", "docstrings": ["Execute the command."]}"#,
        )
        .expect("parse");
        assert_eq!(annotation.summary, "A command pattern demo.");
        assert_eq!(annotation.docstrings, vec!["Execute the command."]);
    }

    #[test]
    fn test_tolerates_surrounding_prose() {
        let reply = "Sure! Here is the JSON you asked for:\n\
            {\"summary\": \"An observer demo.\", \"docstrings\": []}\n\
            Let me know if you need anything else.";
        let annotation = parse_annotation(reply).expect("parse");
        assert_eq!(annotation.summary, "An observer demo.");
        assert!(annotation.docstrings.is_empty());
    }

    #[test]
    fn test_trims_and_drops_empty_docstrings() {
        let annotation = parse_annotation(
            r#"{"summary": " s ", "docstrings": ["  first  ", "", "   ", "second"]}"#,
        )
        .expect("parse");
        assert_eq!(annotation.summary, "s");
        assert_eq!(annotation.docstrings, vec!["first", "second"]);
    }

    #[test]
    fn test_missing_docstrings_defaults_to_empty() {
        let annotation = parse_annotation(r#"{"summary": "short"}"#).expect("parse");
        assert!(annotation.docstrings.is_empty());
    }

    #[test]
    fn test_no_braces_is_a_format_failure() {
        let err = parse_annotation("I could not produce JSON, sorry.").unwrap_err();
        assert!(matches!(err, ChunkError::Format(_)));
        assert!(err.is_attempt_failure());
    }

    #[test]
    fn test_missing_summary_is_a_format_failure() {
        let err = parse_annotation(r#"{"docstrings": ["only these"]}"#).unwrap_err();
        assert!(matches!(err, ChunkError::Format(_)));
    }

    #[test]
    fn test_unbalanced_braces_is_a_format_failure() {
        // a lone `}` before the first `{` must not slice backwards
        let err = parse_annotation("} nothing here {").unwrap_err();
        assert!(matches!(err, ChunkError::Format(_)));
    }
}
