//! Closed label sets for every categorical signal.
//!
//! Downstream prompt construction and rendering branch on these values, so a
//! classifier can only ever report one of the variants below, never free text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A member of a fixed, ordered label set.
pub trait Label: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Every label in canonical order.
    const ALL: &'static [Self];

    /// Wire/display name of the label.
    fn as_str(&self) -> &'static str;

    /// Case-insensitive lookup by name.
    fn parse_label(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|label| label.as_str().eq_ignore_ascii_case(value))
    }

    /// Position of the label inside [`Label::ALL`].
    fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|label| label == self)
            .unwrap_or_default()
    }
}

macro_rules! label_text_impls {
    ($ty:ty, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as Label>::parse_label(s).ok_or_else(|| {
                    let allowed: Vec<&str> = <$ty as Label>::ALL.iter().map(|l| l.as_str()).collect();
                    format!("unknown {} '{}' (expected one of: {})", $kind, s, allowed.join(", "))
                })
            }
        }
    };
}

/// Purpose of an email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Chasing an earlier message or pending item.
    #[serde(rename = "follow-up")]
    FollowUp,
    /// Asking the recipient to do or provide something.
    #[serde(rename = "request")]
    Request,
    /// Sharing information without an ask.
    #[serde(rename = "inform")]
    Inform,
}

impl Label for Intent {
    const ALL: &'static [Self] = &[Intent::FollowUp, Intent::Request, Intent::Inform];

    fn as_str(&self) -> &'static str {
        match self {
            Intent::FollowUp => "follow-up",
            Intent::Request => "request",
            Intent::Inform => "inform",
        }
    }
}

label_text_impls!(Intent, "intent");

/// Register of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Formality {
    Informal,
    Neutral,
    Formal,
}

impl Formality {
    /// Lower bound (exclusive) of the weighted score for a formal document.
    pub const FORMAL_THRESHOLD: f64 = 0.75;
    /// Lower bound (exclusive) of the weighted score for a neutral document.
    pub const NEUTRAL_THRESHOLD: f64 = 0.4;

    /// Numeric score used for length weighting.
    pub fn score(&self) -> f64 {
        match self {
            Formality::Informal => 0.0,
            Formality::Neutral => 0.5,
            Formality::Formal => 1.0,
        }
    }

    /// Score in half-points (informal 0, neutral 1, formal 2), for exact
    /// weighted sums.
    pub fn half_points(&self) -> u64 {
        match self {
            Formality::Informal => 0,
            Formality::Neutral => 1,
            Formality::Formal => 2,
        }
    }

    /// Document classification from an exact weighted sum of half-points over
    /// `total_len` characters. Equivalent to
    /// [`from_weighted_score`](Self::from_weighted_score) without rounding
    /// error at the bounds.
    pub fn from_weighted_half_points(half_points: u64, total_len: u64) -> Self {
        // score = half_points / (2 * total_len)
        if 4 * half_points > 3 * 2 * total_len {
            Formality::Formal
        } else if 10 * half_points > 4 * 2 * total_len {
            Formality::Neutral
        } else {
            Formality::Informal
        }
    }

    /// Document classification from a weighted score. Both bounds are strict.
    pub fn from_weighted_score(score: f64) -> Self {
        if score > Self::FORMAL_THRESHOLD {
            Formality::Formal
        } else if score > Self::NEUTRAL_THRESHOLD {
            Formality::Neutral
        } else {
            Formality::Informal
        }
    }
}

impl Label for Formality {
    const ALL: &'static [Self] = &[Formality::Informal, Formality::Neutral, Formality::Formal];

    fn as_str(&self) -> &'static str {
        match self {
            Formality::Informal => "informal",
            Formality::Neutral => "neutral",
            Formality::Formal => "formal",
        }
    }
}

label_text_impls!(Formality, "formality");

/// Who the email is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Professional,
    Personal,
    General,
}

impl Label for Audience {
    const ALL: &'static [Self] = &[Audience::Professional, Audience::Personal, Audience::General];

    fn as_str(&self) -> &'static str {
        match self {
            Audience::Professional => "professional",
            Audience::Personal => "personal",
            Audience::General => "general",
        }
    }
}

label_text_impls!(Audience, "audience");

/// Overall polarity bucket derived from the compound score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentCategory {
    Positive,
    Neutral,
    Negative,
}

impl SentimentCategory {
    pub const POSITIVE_THRESHOLD: f64 = 0.05;
    pub const NEGATIVE_THRESHOLD: f64 = -0.05;

    /// `>= 0.05` positive, `<= -0.05` negative, neutral in between.
    pub fn from_compound(compound: f64) -> Self {
        if compound >= Self::POSITIVE_THRESHOLD {
            SentimentCategory::Positive
        } else if compound <= Self::NEGATIVE_THRESHOLD {
            SentimentCategory::Negative
        } else {
            SentimentCategory::Neutral
        }
    }
}

impl Label for SentimentCategory {
    const ALL: &'static [Self] = &[
        SentimentCategory::Positive,
        SentimentCategory::Neutral,
        SentimentCategory::Negative,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            SentimentCategory::Positive => "positive",
            SentimentCategory::Neutral => "neutral",
            SentimentCategory::Negative => "negative",
        }
    }
}

label_text_impls!(SentimentCategory, "polarity");

/// A label with the classifier's posterior probability for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification<L> {
    pub label: L,
    /// Maximum posterior probability over the label set (0.0 - 1.0)
    pub confidence: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_thresholds_are_inclusive() {
        assert_eq!(SentimentCategory::from_compound(0.05), SentimentCategory::Positive);
        assert_eq!(SentimentCategory::from_compound(-0.05), SentimentCategory::Negative);
        assert_eq!(SentimentCategory::from_compound(0.0499), SentimentCategory::Neutral);
        assert_eq!(SentimentCategory::from_compound(-0.0499), SentimentCategory::Neutral);
        assert_eq!(SentimentCategory::from_compound(0.0), SentimentCategory::Neutral);
    }

    #[test]
    fn test_weighted_score_thresholds_are_strict() {
        assert_eq!(Formality::from_weighted_score(0.75), Formality::Neutral);
        assert_eq!(Formality::from_weighted_score(0.7501), Formality::Formal);
        assert_eq!(Formality::from_weighted_score(0.4), Formality::Informal);
        assert_eq!(Formality::from_weighted_score(0.4001), Formality::Neutral);
        assert_eq!(Formality::from_weighted_score(0.0), Formality::Informal);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("FORMAL".parse::<Formality>(), Ok(Formality::Formal));
        assert_eq!(" Follow-Up ".parse::<Intent>(), Ok(Intent::FollowUp));
        assert_eq!("personal".parse::<Audience>(), Ok(Audience::Personal));
        assert!("casual".parse::<Formality>().is_err());
    }

    #[test]
    fn test_serde_names_match_labels() {
        for intent in Intent::ALL {
            let json = serde_json::to_string(intent).unwrap();
            assert_eq!(json, format!("\"{}\"", intent.as_str()));
        }
        for audience in Audience::ALL {
            let json = serde_json::to_string(audience).unwrap();
            assert_eq!(json, format!("\"{}\"", audience));
        }
    }
}
