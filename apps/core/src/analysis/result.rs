//! The canonical analysis record shared by every consumer.

use serde::{Deserialize, Serialize};

use crate::analysis::labels::{Audience, Formality, Intent, SentimentCategory};
use crate::analysis::sentiment::SentimentScores;

/// Tone, purpose, register and audience of one email.
///
/// A classifier that failed on this input leaves its label `None` (serialised
/// as `null`) and its confidence omitted. Confidences are never filled in by
/// anything but the classifier itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sentiment_scores: SentimentScores,
    pub sentiment_category: SentimentCategory,
    pub intent: Option<Intent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent_confidence: Option<f32>,
    pub formality: Formality,
    pub audience: Option<Audience>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience_confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl AnalysisResult {
    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }

    /// One-line description used in prompts and logs.
    pub fn summary(&self) -> String {
        format!(
            "sentiment={} ({:.2}), intent={}, formality={}, audience={}",
            self.sentiment_category,
            self.sentiment_scores.compound,
            label_or_unknown(self.intent),
            self.formality,
            label_or_unknown(self.audience),
        )
    }
}

/// Display a possibly missing label.
pub fn label_or_unknown<L: std::fmt::Display>(label: Option<L>) -> String {
    label.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string())
}

/// Display a possibly missing confidence with two decimals.
pub fn confidence_or_unknown(confidence: Option<f32>) -> String {
    confidence
        .map(|c| format!("{:.2}", c))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnalysisResult {
        AnalysisResult {
            sentiment_scores: SentimentScores {
                pos: 0.2,
                neg: 0.0,
                neu: 0.8,
                compound: 0.5106,
            },
            sentiment_category: SentimentCategory::Positive,
            intent: Some(Intent::Request),
            intent_confidence: Some(0.8),
            formality: Formality::Neutral,
            audience: None,
            audience_confidence: None,
            feedback: None,
        }
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj["sentiment_category"], "positive");
        assert_eq!(obj["intent"], "request");
        assert_eq!(obj["formality"], "neutral");
        assert!(obj["audience"].is_null());
        assert!(!obj.contains_key("audience_confidence"));
        assert!(!obj.contains_key("feedback"));
        assert_eq!(obj["sentiment_scores"]["compound"], 0.5106);
    }

    #[test]
    fn test_summary_and_feedback() {
        let result = sample().with_feedback("Be more direct.");
        assert_eq!(result.feedback.as_deref(), Some("Be more direct."));
        assert_eq!(
            result.summary(),
            "sentiment=positive (0.51), intent=request, formality=neutral, audience=unknown"
        );
    }

    #[test]
    fn test_confidence_display() {
        let result = sample();
        assert_eq!(confidence_or_unknown(result.intent_confidence), "0.80");
        assert_eq!(confidence_or_unknown(result.audience_confidence), "unknown");
    }
}
