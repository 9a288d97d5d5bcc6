//! Sentence-level formality estimation and alignment checking.
//!
//! A document's formality is the character-length weighted average of its
//! sentences' scores (informal 0.0, neutral 0.5, formal 1.0), so a long formal
//! paragraph outweighs a breezy one-word sign-off.

use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analysis::classifier::TextClassifier;
use crate::analysis::labels::{Formality, Label};
use crate::analysis::pattern::{Cue, CueGroup, PatternClassifier};
use crate::analysis::segment::split_sentences;
use crate::analysis::round_to;
use crate::error::AppError;

/// Marker-based per-sentence formality classifier.
pub type FormalityClassifier = PatternClassifier<Formality>;

static INFORMAL_CUES: LazyLock<Vec<Cue>> = LazyLock::new(|| {
    vec![
        // Greetings and fillers
        Cue::new(r"(?i)^\s*(hey|hiya|yo|sup)\b", 1.5),
        Cue::new(r"(?i)\b(gonna|wanna|gotta|kinda|sorta|dunno|lemme|ya|yep|yeah|nope|ok|okay|cool|awesome|btw|lol|omg|thx|pls|np|asap)\b", 1.0),
        Cue::new(r"(?i)\b(shoot (me |over|across)|hit me up|ping me|grab a|swing by|no worries|sounds good|catch up)\b", 1.5),
        Cue::new(r"(?i)\bthanks (so|a) (much|ton|bunch|lot)\b", 1.0),
        Cue::new(r"(?i)^\s*(thanks|cheers|thx)!?\s*$", 0.75),
        // Contractions
        Cue::new(r"(?i)\b\w+('|’)(ll|re|ve|d|s|t|m)\b", 0.5),
        // Expressive punctuation and emoticons
        Cue::new(r"!", 0.5),
        Cue::new(r"(\.\.\.|…)", 0.5),
        Cue::new(r"[:;]-?[)(DPp]|<3", 1.0),
        // Lower-case first person
        Cue::new(r"(^|\s)i(\s|')", 1.0),
    ]
});

static FORMAL_CUES: LazyLock<Vec<Cue>> = LazyLock::new(|| {
    vec![
        // Salutations and closings
        Cue::new(r"(?i)^\s*(dear|to whom it may concern)\b", 1.5),
        Cue::new(r"(?i)\b(sincerely|respectfully|kind regards|best regards|warm regards|yours truly|yours faithfully)\b", 1.5),
        // Formal phrasing
        Cue::new(r"(?i)\b(i am writing|please find|i would like to|we would like to|i wish to|we wish to)\b", 1.5),
        Cue::new(r"(?i)\b(at your earliest convenience|do not hesitate|please be advised|should you have|i look forward to|we look forward to)\b", 1.5),
        Cue::new(r"(?i)\b(kindly|furthermore|moreover|therefore|however|consequently|nevertheless|accordingly|hereby|pursuant|regarding|with respect to)\b", 1.0),
        Cue::new(r"(?i)\b(could you please|would you please|i would appreciate|we would appreciate|would be grateful)\b", 1.0),
        Cue::new(r"(?i)\b(attached herewith|enclosed|aforementioned|in accordance with)\b", 1.0),
    ]
});

impl FormalityClassifier {
    /// Default classifier: informal and formal markers against a neutral
    /// baseline of 1.0. A sentence with no markers is neutral.
    pub fn markers() -> Self {
        PatternClassifier::from_groups(
            "formality-markers",
            vec![
                CueGroup {
                    label: Formality::Informal,
                    cues: INFORMAL_CUES.clone(),
                },
                CueGroup {
                    label: Formality::Formal,
                    cues: FORMAL_CUES.clone(),
                },
            ],
            Formality::Neutral,
        )
        .with_baseline(Formality::Neutral, 1.0)
    }
}

impl Default for FormalityClassifier {
    fn default() -> Self {
        Self::markers()
    }
}

/// One scored sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceFormality {
    pub sentence: String,
    pub label: Formality,
    /// Numeric score of `label`, rounded to two decimals
    pub score: f64,
}

/// Per-sentence breakdown plus the weighted document score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceFormalityRecord {
    pub sentences: Vec<SentenceFormality>,
    /// Weighted average in [0, 1], rounded to three decimals
    pub weighted_formality_score: f64,
    pub classification: Formality,
}

/// A sentence whose formality differs from the requested one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormalityFlag {
    pub sentence: String,
    pub detected_formality: Formality,
    pub issue: String,
}

/// Aggregates per-sentence labels into a document formality.
#[derive(Clone)]
pub struct FormalityEstimator {
    classifier: Arc<dyn TextClassifier<Formality>>,
}

impl Default for FormalityEstimator {
    fn default() -> Self {
        Self::new(Arc::new(FormalityClassifier::markers()))
    }
}

impl FormalityEstimator {
    pub fn new(classifier: Arc<dyn TextClassifier<Formality>>) -> Self {
        Self { classifier }
    }

    /// Label every sentence and compute the length-weighted score.
    ///
    /// A sentence the classifier fails on counts as neutral and keeps its
    /// weight.
    pub fn sentence_formality(&self, text: &str) -> SentenceFormalityRecord {
        let sentences = split_sentences(text);
        let total_len: u64 = sentences.iter().map(|s| s.chars().count() as u64).sum();

        // Summed in integers so a score exactly on a bound stays on it.
        let mut half_points: u64 = 0;
        let mut scored = Vec::with_capacity(sentences.len());

        for sentence in sentences {
            let label = match self.classifier.classify(&sentence) {
                Ok(classification) => classification.label,
                Err(e) => {
                    warn!(
                        classifier = self.classifier.name(),
                        "Sentence formality failed, scoring as neutral: {}", e
                    );
                    Formality::Neutral
                }
            };

            half_points += label.half_points() * sentence.chars().count() as u64;

            scored.push(SentenceFormality {
                sentence,
                label,
                score: round_to(label.score(), 2),
            });
        }

        let weighted = if total_len > 0 {
            half_points as f64 / (2 * total_len) as f64
        } else {
            0.0
        };
        let classification = Formality::from_weighted_half_points(half_points, total_len);
        debug!(
            sentences = scored.len(),
            weighted_score = weighted,
            classification = %classification,
            "Sentence formality computed"
        );

        SentenceFormalityRecord {
            sentences: scored,
            weighted_formality_score: round_to(weighted, 3),
            classification,
        }
    }

    /// Document-level label only.
    pub fn classify_document(&self, text: &str) -> Formality {
        self.sentence_formality(text).classification
    }

    /// Sentences whose label differs from `desired`, in text order.
    pub fn flag_mismatches(&self, text: &str, desired: Formality) -> Vec<FormalityFlag> {
        self.sentence_formality(text)
            .sentences
            .into_iter()
            .filter(|s| s.label != desired)
            .map(|s| FormalityFlag {
                issue: mismatch_issue(s.label, desired),
                sentence: s.sentence,
                detected_formality: s.label,
            })
            .collect()
    }

    /// Same as [`flag_mismatches`](Self::flag_mismatches) with the desired
    /// label given as text. Matching is case-insensitive.
    pub fn flag_mismatches_str(
        &self,
        text: &str,
        desired: &str,
    ) -> Result<Vec<FormalityFlag>, AppError> {
        let desired = Formality::parse_label(desired).ok_or_else(|| {
            AppError::Validation(format!("unknown formality '{}'", desired.trim()))
        })?;
        Ok(self.flag_mismatches(text, desired))
    }
}

fn mismatch_issue(detected: Formality, desired: Formality) -> String {
    format!(
        "Sentence formality '{}' does not match desired formality '{}'.",
        detected, desired
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(text: &str) -> Formality {
        FormalityClassifier::markers().classify(text).unwrap().label
    }

    #[test]
    fn test_marker_labels() {
        assert_eq!(label("Hey!"), Formality::Informal);
        assert_eq!(label("Just checking, can you shoot over the deck?"), Formality::Informal);
        assert_eq!(label("Thanks so much!"), Formality::Informal);
        assert_eq!(label("Appreciate it."), Formality::Neutral);
        assert_eq!(label("The report is ready."), Formality::Neutral);
        assert_eq!(label("Dear Mr. Smith,"), Formality::Formal);
        assert_eq!(
            label("I am writing to request the revised contract at your earliest convenience."),
            Formality::Formal
        );
    }

    #[test]
    fn test_casual_email_is_informal() {
        let estimator = FormalityEstimator::default();
        let record = estimator.sentence_formality(
            "Hey! Just checking, can you shoot over the deck? Appreciate it. Thanks so much!",
        );

        assert_eq!(record.sentences.len(), 4);
        assert_eq!(record.classification, Formality::Informal);
        assert!(record.weighted_formality_score <= 0.4);
    }

    /// Formal when the sentence starts with 'F', neutral otherwise.
    struct InitialClassifier;

    impl TextClassifier<Formality> for InitialClassifier {
        fn name(&self) -> &str {
            "initial"
        }

        fn classify(
            &self,
            text: &str,
        ) -> Result<crate::analysis::labels::Classification<Formality>, crate::error::ClassifierError>
        {
            let label = if text.starts_with('F') {
                Formality::Formal
            } else {
                Formality::Neutral
            };
            Ok(crate::analysis::labels::Classification {
                label,
                confidence: 1.0,
            })
        }
    }

    #[test]
    fn test_score_exactly_on_formal_bound_is_neutral() {
        let estimator = FormalityEstimator::new(Arc::new(InitialClassifier));
        let record = estimator.sentence_formality("Fabc.\n\nNabcd.\n\nF");

        let lens: Vec<usize> = record.sentences.iter().map(|s| s.sentence.chars().count()).collect();
        assert_eq!(lens, vec![5, 6, 1]);
        assert_eq!(record.weighted_formality_score, 0.75);
        assert_eq!(record.classification, Formality::Neutral);
    }

    #[test]
    fn test_half_point_bounds_are_strict() {
        assert_eq!(Formality::from_weighted_half_points(3, 2), Formality::Neutral);
        assert_eq!(Formality::from_weighted_half_points(4, 2), Formality::Formal);
        assert_eq!(Formality::from_weighted_half_points(4, 5), Formality::Informal);
        assert_eq!(Formality::from_weighted_half_points(5, 5), Formality::Neutral);
        assert_eq!(Formality::from_weighted_half_points(0, 0), Formality::Informal);
    }

    #[test]
    fn test_empty_text() {
        let record = FormalityEstimator::default().sentence_formality("");
        assert!(record.sentences.is_empty());
        assert_eq!(record.weighted_formality_score, 0.0);
        assert_eq!(record.classification, Formality::Informal);
    }

    #[test]
    fn test_flag_message_format() {
        assert_eq!(
            mismatch_issue(Formality::Informal, Formality::Formal),
            "Sentence formality 'informal' does not match desired formality 'formal'."
        );
    }

    #[test]
    fn test_flag_mismatches_str_rejects_unknown_label() {
        let estimator = FormalityEstimator::default();
        assert!(estimator.flag_mismatches_str("Hello there.", "casual").is_err());
        let flags = estimator.flag_mismatches_str("Hey! Dear Sir,", "FORMAL").unwrap();
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].sentence, "Hey!");
    }
}
