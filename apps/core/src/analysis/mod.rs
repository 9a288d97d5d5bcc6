//! # Analysis Module
//!
//! Offline signal extraction for a single email.
//!
//! ## Components
//! - `sentiment`: VADER lexicon/rule scorer
//! - `formality`: sentence-weighted formality and alignment checking
//! - `intent`, `audience`: pattern classifiers over email cues
//! - `semantic`: embedding classifiers (`semantic` feature)
//! - `analyzer`: main orchestrator producing an [`AnalysisResult`]

pub mod analyzer;
pub mod audience;
pub mod classifier;
pub mod formality;
pub mod intent;
pub mod labels;
pub mod lexicon;
pub mod pattern;
pub mod result;
pub mod segment;
#[cfg(feature = "semantic")]
pub mod semantic;
pub mod sentiment;

pub use analyzer::Analyzer;
pub use classifier::TextClassifier;
pub use formality::{FormalityEstimator, FormalityFlag, SentenceFormality, SentenceFormalityRecord};
pub use labels::{Audience, Classification, Formality, Intent, Label, SentimentCategory};
pub use result::AnalysisResult;
pub use sentiment::{SentimentScorer, SentimentScores};

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
