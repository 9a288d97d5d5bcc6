//! Parsing of structured edit suggestions returned by the model.
//!
//! Parsing is two-staged: a strict `serde_json` parse first, then a lenient
//! repair pass for the usual ways model output breaks JSON (markdown fences,
//! prose around the object, smart quotes, unescaped quotes, trailing commas,
//! truncation). Whatever parses is checked against the expected counts.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::coach::prompts::{BODY_COUNT, CLOSING_COUNT, SALUTATION_COUNT, SUBJECT_COUNT};

/// Reasons a structured completion could not be used.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompletionError {
    /// Neither the raw text nor its repaired form is a suggestion object.
    #[error("malformed structured output: {0}")]
    Malformed(String),

    /// A field parsed but holds the wrong number of entries.
    #[error("expected {expected} {field}, found {found}")]
    CardinalityMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    /// The model called some other function.
    #[error("expected a call to '{expected}', model called '{found}'")]
    UnexpectedFunction { expected: String, found: String },
}

/// Alternatives proposed for one email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSuggestionSet {
    #[serde(rename = "Subjects", alias = "subjects")]
    pub subjects: Vec<String>,
    #[serde(rename = "Salutations", alias = "salutations")]
    pub salutations: Vec<String>,
    #[serde(rename = "Closings", alias = "closings")]
    pub closings: Vec<String>,
    #[serde(rename = "Bodies", alias = "bodies")]
    pub bodies: Vec<String>,
}

impl EditSuggestionSet {
    /// Check every field holds exactly the expected number of entries.
    pub fn validate_counts(&self) -> Result<(), CompletionError> {
        let fields = [
            ("subjects", SUBJECT_COUNT, self.subjects.len()),
            ("salutations", SALUTATION_COUNT, self.salutations.len()),
            ("closings", CLOSING_COUNT, self.closings.len()),
            ("bodies", BODY_COUNT, self.bodies.len()),
        ];

        for (field, expected, found) in fields {
            if expected != found {
                return Err(CompletionError::CardinalityMismatch { field, expected, found });
            }
        }
        Ok(())
    }
}

/// Result of [`parse_edit_suggestions`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Valid as received.
    Parsed(EditSuggestionSet),
    /// Valid only after repair.
    Repaired(EditSuggestionSet),
    /// Unusable; the request has failed.
    Failed(CompletionError),
}

impl ParseOutcome {
    pub fn into_result(self) -> Result<EditSuggestionSet, CompletionError> {
        match self {
            ParseOutcome::Parsed(set) | ParseOutcome::Repaired(set) => Ok(set),
            ParseOutcome::Failed(err) => Err(err),
        }
    }

    pub fn was_repaired(&self) -> bool {
        matches!(self, ParseOutcome::Repaired(_))
    }
}

/// Parse the raw arguments (or text) of an edit completion.
pub fn parse_edit_suggestions(raw: &str) -> ParseOutcome {
    let strict_err = match serde_json::from_str::<EditSuggestionSet>(raw.trim()) {
        Ok(set) => {
            return match set.validate_counts() {
                Ok(()) => ParseOutcome::Parsed(set),
                Err(err) => ParseOutcome::Failed(err),
            }
        }
        Err(err) => err,
    };

    debug!(error = %strict_err, "Strict parse failed, attempting repair");
    let repaired = repair_json(raw);

    match serde_json::from_str::<EditSuggestionSet>(&repaired) {
        Ok(set) => match set.validate_counts() {
            Ok(()) => ParseOutcome::Repaired(set),
            Err(err) => ParseOutcome::Failed(err),
        },
        Err(err) => {
            warn!(error = %err, "Structured output could not be repaired");
            ParseOutcome::Failed(CompletionError::Malformed(format!(
                "{} (after repair: {})",
                strict_err, err
            )))
        }
    }
}

/// Best-effort conversion of model output into valid JSON.
pub fn repair_json(raw: &str) -> String {
    let unfenced = strip_code_fences(raw);
    let object = outermost_object(unfenced);
    let normalized = normalize_quotes(object);
    rebalance(&normalized)
}

fn strip_code_fences(raw: &str) -> &str {
    let Some(start) = raw.find("```") else {
        return raw;
    };
    let after_fence = &raw[start + 3..];
    // Skip the language tag.
    let content = match after_fence.find('\n') {
        Some(newline) => &after_fence[newline + 1..],
        None => after_fence,
    };
    match content.find("```") {
        Some(end) => &content[..end],
        None => content,
    }
}

fn outermost_object(text: &str) -> &str {
    let Some(start) = text.find('{') else {
        return text.trim();
    };
    match text.rfind('}') {
        Some(end) if end > start => &text[start..=end],
        _ => &text[start..],
    }
}

fn normalize_quotes(text: &str) -> String {
    text.replace(['\u{201C}', '\u{201D}', '\u{201E}', '\u{201F}'], "\"")
}

/// Single pass over the text that escapes stray quotes and raw newlines in
/// strings, drops trailing commas and closes whatever is left open.
fn rebalance(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut open: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                out.push(c);
                escaped = false;
                continue;
            }
            match c {
                '\\' => {
                    out.push(c);
                    escaped = true;
                }
                '"' if closes_string(&chars[i + 1..]) => {
                    out.push(c);
                    in_string = false;
                }
                '"' => out.push_str("\\\""),
                '\n' => out.push_str("\\n"),
                '\r' => {}
                '\t' => out.push_str("\\t"),
                _ => out.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                out.push(c);
                in_string = true;
            }
            '{' => {
                out.push(c);
                open.push('}');
            }
            '[' => {
                out.push(c);
                open.push(']');
            }
            '}' | ']' => {
                strip_trailing_comma(&mut out);
                if open.last() == Some(&c) {
                    open.pop();
                }
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    if in_string {
        if escaped {
            out.pop();
        }
        out.push('"');
    }
    while let Some(closer) = open.pop() {
        strip_trailing_comma(&mut out);
        out.push(closer);
    }
    out
}

/// A quote ends a string only when followed by a structural character.
fn closes_string(rest: &[char]) -> bool {
    match rest.iter().find(|c| !c.is_whitespace()) {
        None => true,
        Some(next) => matches!(next, ',' | '}' | ']' | ':'),
    }
}

fn strip_trailing_comma(out: &mut String) {
    let trimmed = out.trim_end().len();
    if out[..trimmed].ends_with(',') {
        out.truncate(trimmed - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{"Subjects": ["S1", "S2", "S3", "S4"], "Salutations": ["Hi Sam,", "Hello Sam,", "Dear Sam,"], "Closings": ["Best,", "Thanks,", "Regards,"], "Bodies": ["B1", "B2", "B3"]}"#;

    #[test]
    fn test_strict_parse() {
        let outcome = parse_edit_suggestions(VALID);
        assert!(!outcome.was_repaired());
        let set = outcome.into_result().unwrap();
        assert_eq!(set.subjects.len(), 4);
        assert_eq!(set.salutations[2], "Dear Sam,");
    }

    #[test]
    fn test_lowercase_keys_accepted() {
        let raw = r#"{"subjects": ["a","b","c","d"], "salutations": ["x","y","z"], "closings": ["p","q","r"], "bodies": ["1","2","3"]}"#;
        assert!(matches!(parse_edit_suggestions(raw), ParseOutcome::Parsed(_)));
    }

    #[test]
    fn test_fenced_with_trailing_commas() {
        let raw = "Here are my suggestions:\n```json\n{\"Subjects\": [\"a\",\"b\",\"c\",\"d\",], \"Salutations\": [\"x\",\"y\",\"z\"], \"Closings\": [\"p\",\"q\",\"r\"], \"Bodies\": [\"1\",\"2\",\"3\",],}\n```\nLet me know!";
        let outcome = parse_edit_suggestions(raw);
        assert!(outcome.was_repaired());
        assert_eq!(outcome.into_result().unwrap().bodies, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_smart_quotes() {
        let raw = VALID.replacen('"', "\u{201C}", 1);
        let outcome = parse_edit_suggestions(&raw);
        assert!(matches!(outcome, ParseOutcome::Repaired(_)));
    }

    #[test]
    fn test_interior_quotes_are_escaped() {
        let raw = r#"{"Subjects": ["a","b","c","d"], "Salutations": ["x","y","z"], "Closings": ["p","q","r"], "Bodies": ["He said "thanks" twice", "b2", "b3"]}"#;
        let set = parse_edit_suggestions(raw).into_result().unwrap();
        assert_eq!(set.bodies[0], "He said \"thanks\" twice");
    }

    #[test]
    fn test_truncated_output_is_closed() {
        let raw = r#"{"Subjects": ["A", "B", "C", "D"], "Salutations": ["Hi", "Hello", "Dear"], "Closings": ["Best", "Thanks", "Cheers"], "Bodies": ["One", "Two", "Three is cut"#;
        let outcome = parse_edit_suggestions(raw);
        assert!(outcome.was_repaired());
        assert_eq!(outcome.into_result().unwrap().bodies[2], "Three is cut");
    }

    #[test]
    fn test_raw_newlines_in_bodies() {
        let raw = "{\"Subjects\": [\"a\",\"b\",\"c\",\"d\"], \"Salutations\": [\"x\",\"y\",\"z\"], \"Closings\": [\"p\",\"q\",\"r\"], \"Bodies\": [\"line one\nline two\", \"2\", \"3\"]}";
        let set = parse_edit_suggestions(raw).into_result().unwrap();
        assert_eq!(set.bodies[0], "line one\nline two");
    }

    #[test]
    fn test_wrong_counts_fail() {
        let raw = r#"{"Subjects": ["a","b","c"], "Salutations": ["x","y","z"], "Closings": ["p","q","r"], "Bodies": ["1","2","3"]}"#;
        assert_eq!(
            parse_edit_suggestions(raw),
            ParseOutcome::Failed(CompletionError::CardinalityMismatch {
                field: "subjects",
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn test_prose_fails() {
        let outcome = parse_edit_suggestions("Sorry, I cannot help with that.");
        assert!(matches!(outcome, ParseOutcome::Failed(CompletionError::Malformed(_))));
    }

    #[test]
    fn test_repair_is_identity_on_valid_json() {
        let value: serde_json::Value = serde_json::from_str(&repair_json(VALID)).unwrap();
        let original: serde_json::Value = serde_json::from_str(VALID).unwrap();
        assert_eq!(value, original);
    }
}
