//! Lexicon and rule-based sentiment scoring (VADER).
//!
//! Fully deterministic and offline. Each token is looked up in the valence
//! lexicon and adjusted for intensifiers, capitalisation, negation, "but"
//! contrast and trailing punctuation before the sum is normalised into a
//! compound score in [-1, 1].

use serde::{Deserialize, Serialize};

use crate::analysis::labels::SentimentCategory;
use crate::analysis::lexicon::{self, CAPS_INCREMENT, NEGATION_SCALAR};
use crate::analysis::round_to;

/// Normalisation constant approximating the maximum expected sum.
const NORMALIZATION_ALPHA: f64 = 15.0;
const EXCLAMATION_BOOST: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_BOOST: f64 = 0.18;
const QUESTION_BOOST_MAX: f64 = 0.96;

/// Polarity proportions plus the normalised compound score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub pos: f64,
    pub neg: f64,
    pub neu: f64,
    pub compound: f64,
}

impl SentimentScores {
    /// Scores for text that carries no sentiment at all.
    pub const NEUTRAL: SentimentScores = SentimentScores {
        pos: 0.0,
        neg: 0.0,
        neu: 1.0,
        compound: 0.0,
    };

    pub fn category(&self) -> SentimentCategory {
        SentimentCategory::from_compound(self.compound)
    }
}

/// Stateless VADER scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentScorer;

impl SentimentScorer {
    pub fn new() -> Self {
        Self
    }

    /// Polarity scores for `text`.
    pub fn score(&self, text: &str) -> SentimentScores {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return SentimentScores::NEUTRAL;
        }

        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let cap_diff = caps_differential(&tokens);

        let mut sentiments = Vec::with_capacity(tokens.len());
        for i in 0..tokens.len() {
            let word = lowered[i].as_str();

            if lexicon::booster(word).is_some() {
                sentiments.push(0.0);
                continue;
            }
            if word == "kind" && lowered.get(i + 1).map(String::as_str) == Some("of") {
                sentiments.push(0.0);
                continue;
            }

            sentiments.push(token_valence(&tokens, &lowered, i, cap_diff));
        }

        apply_but_contrast(&lowered, &mut sentiments);
        score_valence(&sentiments, text)
    }

    /// Category for a compound score.
    pub fn category(&self, compound: f64) -> SentimentCategory {
        SentimentCategory::from_compound(compound)
    }
}

/// Whitespace tokens with surrounding punctuation removed. Short tokens that
/// are emoticons in the lexicon are kept verbatim.
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter_map(|raw| {
            let stripped = raw.trim_matches(|c: char| c.is_ascii_punctuation());
            if stripped.chars().count() <= 2 && lexicon::valence(&raw.to_lowercase()).is_some() {
                return Some(raw.to_string());
            }
            if stripped.is_empty() {
                None
            } else {
                Some(stripped.to_string())
            }
        })
        .collect()
}

fn is_all_caps(word: &str) -> bool {
    word.chars().any(char::is_alphabetic)
        && word
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(char::is_uppercase)
}

/// True when some, but not all, tokens are ALL CAPS.
fn caps_differential(tokens: &[String]) -> bool {
    let caps = tokens.iter().filter(|t| is_all_caps(t)).count();
    caps > 0 && caps < tokens.len()
}

fn token_valence(tokens: &[String], lowered: &[String], i: usize, cap_diff: bool) -> f64 {
    let word = lowered[i].as_str();
    let Some(base) = lexicon::valence(word) else {
        return 0.0;
    };

    // "no" used as a determiner ("no problem") is not itself negative.
    let next_is_sentiment = lowered
        .get(i + 1)
        .is_some_and(|next| lexicon::valence(next).is_some());
    if word == "no" && next_is_sentiment {
        return 0.0;
    }

    let mut valence = base;
    let preceded_by_no = (i > 0 && lowered[i - 1] == "no")
        || (i > 1 && lowered[i - 2] == "no")
        || (i > 2 && lowered[i - 3] == "no" && matches!(lowered[i - 1].as_str(), "or" | "nor"));
    if preceded_by_no {
        valence = base * NEGATION_SCALAR;
    }

    if cap_diff && is_all_caps(&tokens[i]) {
        valence += if valence > 0.0 { CAPS_INCREMENT } else { -CAPS_INCREMENT };
    }

    for distance in 0..3 {
        if i <= distance {
            break;
        }
        let prev = i - (distance + 1);
        if lexicon::valence(&lowered[prev]).is_none() {
            let mut scalar = booster_scalar(&tokens[prev], &lowered[prev], valence, cap_diff);
            if distance == 1 {
                scalar *= 0.95;
            } else if distance == 2 {
                scalar *= 0.9;
            }
            valence += scalar;
            valence = negation_check(valence, lowered, distance, i);
        }
    }

    least_check(valence, lowered, i)
}

fn booster_scalar(token: &str, lowered: &str, valence: f64, cap_diff: bool) -> f64 {
    let Some(mut scalar) = lexicon::booster(lowered) else {
        return 0.0;
    };
    if valence < 0.0 {
        scalar = -scalar;
    }
    if cap_diff && is_all_caps(token) {
        scalar += if valence > 0.0 { CAPS_INCREMENT } else { -CAPS_INCREMENT };
    }
    scalar
}

fn negation_check(valence: f64, lowered: &[String], distance: usize, i: usize) -> f64 {
    let at = |back: usize| lowered[i - back].as_str();
    let so_or_this = |w: &str| matches!(w, "so" | "this");

    match distance {
        0 => {
            if lexicon::is_negator(at(1)) {
                return valence * NEGATION_SCALAR;
            }
        }
        1 => {
            if at(2) == "never" && so_or_this(at(1)) {
                return valence * 1.25;
            }
            if at(2) == "without" && at(1) == "doubt" {
                return valence;
            }
            if lexicon::is_negator(at(2)) {
                return valence * NEGATION_SCALAR;
            }
        }
        _ => {
            if at(3) == "never" && (so_or_this(at(2)) || so_or_this(at(1))) {
                return valence * 1.25;
            }
            if at(3) == "without" && (at(2) == "doubt" || at(1) == "doubt") {
                return valence;
            }
            if lexicon::is_negator(at(3)) {
                return valence * NEGATION_SCALAR;
            }
        }
    }

    valence
}

/// "least" flips polarity unless it is part of "at least" / "very least".
fn least_check(valence: f64, lowered: &[String], i: usize) -> f64 {
    if i > 0 && lowered[i - 1] == "least" {
        let idiomatic = i > 1 && matches!(lowered[i - 2].as_str(), "at" | "very");
        if !idiomatic {
            return valence * NEGATION_SCALAR;
        }
    }
    valence
}

/// Sentiment after "but" dominates: earlier tokens are halved, later ones
/// weighted 1.5x.
fn apply_but_contrast(lowered: &[String], sentiments: &mut [f64]) {
    let Some(pivot) = lowered.iter().position(|w| w == "but") else {
        return;
    };

    for (idx, s) in sentiments.iter_mut().enumerate() {
        if idx < pivot {
            *s *= 0.5;
        } else if idx > pivot {
            *s *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let questions = text.matches('?').count();

    let question_boost = if questions > 1 {
        if questions <= 3 {
            questions as f64 * QUESTION_BOOST
        } else {
            QUESTION_BOOST_MAX
        }
    } else {
        0.0
    };

    exclamations as f64 * EXCLAMATION_BOOST + question_boost
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn score_valence(sentiments: &[f64], text: &str) -> SentimentScores {
    let emphasis = punctuation_emphasis(text);

    let mut sum: f64 = sentiments.iter().sum();
    if sum > 0.0 {
        sum += emphasis;
    } else if sum < 0.0 {
        sum -= emphasis;
    }
    let compound = normalize(sum);

    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neu_count = 0.0;
    for s in sentiments {
        if *s > 0.0 {
            pos_sum += s + 1.0;
        } else if *s < 0.0 {
            neg_sum += s - 1.0;
        } else {
            neu_count += 1.0;
        }
    }

    if pos_sum > neg_sum.abs() {
        pos_sum += emphasis;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= emphasis;
    }

    let total = pos_sum + neg_sum.abs() + neu_count;
    if total == 0.0 {
        return SentimentScores::NEUTRAL;
    }

    SentimentScores {
        pos: round_to((pos_sum / total).abs(), 3),
        neg: round_to((neg_sum / total).abs(), 3),
        neu: round_to((neu_count / total).abs(), 3),
        compound: round_to(compound, 4),
    }
}
