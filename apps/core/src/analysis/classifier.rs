//! The classifier capability shared by every categorical signal.
//!
//! The aggregator never depends on a concrete model: regex cue classifiers,
//! embedding classifiers and test stubs are interchangeable behind
//! [`TextClassifier`].

use crate::analysis::labels::{Classification, Label};
use crate::error::ClassifierError;

/// Default classifier input limit, in whitespace tokens.
pub const DEFAULT_MAX_INPUT_TOKENS: usize = 512;

/// Maps free text to one label of a fixed set with a confidence.
pub trait TextClassifier<L: Label>: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    /// Classify `text`. The confidence is the maximum posterior over `L::ALL`.
    fn classify(&self, text: &str) -> Result<Classification<L>, ClassifierError>;
}

/// Truncate `text` after `max_tokens` whitespace-separated tokens.
///
/// Returns a slice of the original text, so offsets inside the kept prefix
/// are unchanged.
pub fn truncate_tokens(text: &str, max_tokens: usize) -> &str {
    let mut seen = 0;
    let mut in_token = false;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            in_token = false;
        } else if !in_token {
            if seen == max_tokens {
                return text[..idx].trim_end();
            }
            seen += 1;
            in_token = true;
        }
    }

    text
}

/// Softmax over raw per-label scores aligned with `L::ALL`.
pub fn softmax(scores: &[f32]) -> Vec<f32> {
    if scores.is_empty() {
        return Vec::new();
    }

    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();

    exps.into_iter().map(|e| e / sum).collect()
}

/// Pick the label with the highest posterior.
///
/// `scores` must be aligned with `L::ALL`. Ties resolve to `fallback`, then
/// to the earliest label, so an input with no evidence lands on a stable
/// default instead of on whichever label happens to come first.
pub fn select_label<L: Label>(scores: &[f32], fallback: L) -> Classification<L> {
    debug_assert_eq!(scores.len(), L::ALL.len());

    let posteriors = softmax(scores);
    let mut best = fallback;
    let mut best_p = posteriors.get(fallback.index()).copied().unwrap_or(0.0);

    for (label, p) in L::ALL.iter().zip(posteriors.iter()) {
        if *p > best_p {
            best = *label;
            best_p = *p;
        }
    }

    Classification {
        label: best,
        confidence: best_p.clamp(0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::labels::Formality;

    #[test]
    fn test_truncate_tokens_keeps_prefix() {
        assert_eq!(truncate_tokens("one two three four", 2), "one two");
        assert_eq!(truncate_tokens("  one   two  ", 5), "  one   two  ");
        assert_eq!(truncate_tokens("", 3), "");
        assert_eq!(truncate_tokens("one\ntwo\nthree", 1), "one");
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let p = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = p.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(p[2] > p[1] && p[1] > p[0]);
    }

    #[test]
    fn test_select_label_prefers_fallback_on_tie() {
        let result = select_label(&[0.0, 0.0, 0.0], Formality::Neutral);
        assert_eq!(result.label, Formality::Neutral);
        assert!((result.confidence - 1.0 / 3.0).abs() < 1e-5);

        let result = select_label(&[2.0, 0.0, 0.0], Formality::Neutral);
        assert_eq!(result.label, Formality::Informal);
        assert!(result.confidence > 0.5);
    }
}
