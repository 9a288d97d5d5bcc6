//! Weighted regex cue classification.
//!
//! Every label owns a group of cues; each cue adds its weight once per match
//! (capped) to the label's raw score. Raw scores go through softmax so the
//! reported confidence is a real posterior over the whole label set.

use regex::Regex;
use tracing::trace;

use crate::analysis::classifier::{select_label, TextClassifier};
use crate::analysis::labels::{Classification, Label};
use crate::error::ClassifierError;

/// Repeated hits of the same cue stop counting after this many matches.
const MAX_HITS_PER_CUE: usize = 3;

/// A single weighted pattern.
#[derive(Debug, Clone)]
pub struct Cue {
    pub pattern: Regex,
    pub weight: f32,
}

impl Cue {
    /// Compile a cue. Cue tables are static, so a bad pattern is a programming
    /// error and panics on first use.
    pub fn new(pattern: &str, weight: f32) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("Invalid regex: cue pattern"),
            weight,
        }
    }
}

/// Cues that count toward one label.
#[derive(Debug, Clone)]
pub struct CueGroup<L> {
    pub label: L,
    pub cues: Vec<Cue>,
}

/// Classifier over a fixed set of cue groups.
#[derive(Debug, Clone)]
pub struct PatternClassifier<L: Label> {
    name: &'static str,
    groups: Vec<CueGroup<L>>,
    baseline: Vec<f32>,
    fallback: L,
}

impl<L: Label> PatternClassifier<L> {
    /// Build a classifier. Labels with no evidence score 0, which ties and
    /// resolves to `fallback`.
    pub fn from_groups(name: &'static str, groups: Vec<CueGroup<L>>, fallback: L) -> Self {
        Self {
            name,
            groups,
            baseline: vec![0.0; L::ALL.len()],
            fallback,
        }
    }

    /// Give `label` a constant head start over the others.
    pub fn with_baseline(mut self, label: L, score: f32) -> Self {
        self.baseline[label.index()] = score;
        self
    }

    /// Raw (pre-softmax) scores aligned with `L::ALL`.
    pub fn raw_scores(&self, text: &str) -> Vec<f32> {
        let mut scores = self.baseline.clone();

        for group in &self.groups {
            for cue in &group.cues {
                let hits = cue.pattern.find_iter(text).take(MAX_HITS_PER_CUE).count();
                if hits > 0 {
                    scores[group.label.index()] += cue.weight * hits as f32;
                }
            }
        }

        scores
    }
}

impl<L: Label> TextClassifier<L> for PatternClassifier<L> {
    fn name(&self) -> &str {
        self.name
    }

    fn classify(&self, text: &str) -> Result<Classification<L>, ClassifierError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(select_label(&self.baseline, self.fallback));
        }

        let scores = self.raw_scores(text);
        let result = select_label(&scores, self.fallback);
        trace!(
            classifier = self.name,
            label = %result.label,
            confidence = result.confidence,
            "Pattern classification"
        );

        Ok(result)
    }
}
