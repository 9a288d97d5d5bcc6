//! Email Analyzer - Main orchestrator for the analysis module.
//!
//! Runs the four signal producers (sentiment, intent, formality, audience)
//! over one email and assembles an [`AnalysisResult`]. The producers share no
//! mutable state, so [`Analyzer::analyze_parallel`] can fan them out onto
//! blocking tasks and join.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::analysis::audience::AudienceClassifier;
use crate::analysis::classifier::{truncate_tokens, TextClassifier, DEFAULT_MAX_INPUT_TOKENS};
use crate::analysis::formality::{
    FormalityClassifier, FormalityEstimator, FormalityFlag, SentenceFormalityRecord,
};
use crate::analysis::intent::IntentClassifier;
use crate::analysis::labels::{Audience, Classification, Formality, Intent, Label};
use crate::analysis::result::AnalysisResult;
use crate::analysis::sentiment::{SentimentScorer, SentimentScores};
use crate::config::{AnalyzerSettings, ClassifierBackend};
use crate::error::AppError;

/// Keep a loaded component, or log the failure and signal a fallback to the
/// pattern classifier.
#[cfg_attr(not(feature = "semantic"), allow(dead_code))]
fn loaded_or_fallback<C, E: std::fmt::Display>(signal: &str, loaded: Result<C, E>) -> Option<C> {
    match loaded {
        Ok(component) => Some(component),
        Err(e) => {
            warn!(signal, "Semantic classifier unavailable, using patterns: {}", e);
            None
        }
    }
}

/// Aggregates all signals for an email. Cheap to clone.
#[derive(Clone)]
pub struct Analyzer {
    sentiment: SentimentScorer,
    intent: Arc<dyn TextClassifier<Intent>>,
    audience: Arc<dyn TextClassifier<Audience>>,
    formality: FormalityEstimator,
    max_input_tokens: usize,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// Analyzer with the built-in pattern classifiers.
    pub fn new() -> Self {
        Self {
            sentiment: SentimentScorer::new(),
            intent: Arc::new(IntentClassifier::email()),
            audience: Arc::new(AudienceClassifier::email()),
            formality: FormalityEstimator::new(Arc::new(FormalityClassifier::markers())),
            max_input_tokens: DEFAULT_MAX_INPUT_TOKENS,
        }
    }

    /// Build the analyzer selected by configuration.
    pub fn from_settings(settings: &AnalyzerSettings) -> Result<Self, AppError> {
        let analyzer = match settings.backend {
            ClassifierBackend::Pattern => Self::new(),
            ClassifierBackend::Semantic => Self::semantic()?,
        };

        info!(
            backend = %settings.backend,
            max_input_tokens = settings.max_input_tokens,
            "Analyzer initialized"
        );

        Ok(analyzer.with_max_input_tokens(settings.max_input_tokens))
    }

    /// Embedding classifiers for every signal that loads. A signal whose
    /// model fails to load keeps its pattern classifier.
    #[cfg(feature = "semantic")]
    fn semantic() -> Result<Self, AppError> {
        use crate::analysis::semantic::{load_model, EmbeddingClassifier};

        let mut analyzer = Self::new();
        let Some(model) = loaded_or_fallback("embedding-model", load_model()) else {
            return Ok(analyzer);
        };

        if let Some(intent) = loaded_or_fallback(
            "intent",
            EmbeddingClassifier::new("intent-embeddings", model.clone(), Intent::Inform),
        ) {
            analyzer = analyzer.with_intent_classifier(Arc::new(intent));
        }
        if let Some(audience) = loaded_or_fallback(
            "audience",
            EmbeddingClassifier::new("audience-embeddings", model.clone(), Audience::General),
        ) {
            analyzer = analyzer.with_audience_classifier(Arc::new(audience));
        }
        if let Some(formality) = loaded_or_fallback(
            "formality",
            EmbeddingClassifier::new("formality-embeddings", model, Formality::Neutral),
        ) {
            analyzer = analyzer.with_formality_classifier(Arc::new(formality));
        }

        Ok(analyzer)
    }

    #[cfg(not(feature = "semantic"))]
    fn semantic() -> Result<Self, AppError> {
        Err(AppError::Config(
            "classifier backend 'semantic' requires building with the `semantic` feature".to_string(),
        ))
    }

    pub fn with_intent_classifier(mut self, classifier: Arc<dyn TextClassifier<Intent>>) -> Self {
        self.intent = classifier;
        self
    }

    pub fn with_audience_classifier(
        mut self,
        classifier: Arc<dyn TextClassifier<Audience>>,
    ) -> Self {
        self.audience = classifier;
        self
    }

    /// Replace the per-sentence formality classifier.
    pub fn with_formality_classifier(
        mut self,
        classifier: Arc<dyn TextClassifier<Formality>>,
    ) -> Self {
        self.formality = FormalityEstimator::new(classifier);
        self
    }

    pub fn with_max_input_tokens(mut self, max_input_tokens: usize) -> Self {
        self.max_input_tokens = max_input_tokens.max(1);
        self
    }

    /// Analyze an email synchronously.
    #[instrument(skip_all, fields(chars = text.len()))]
    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let start = Instant::now();

        let scores = self.sentiment.score(text);
        let intent = self.classify_intent(text);
        let formality = self.formality.classify_document(text);
        let audience = self.classify_audience(text);

        let result = assemble(scores, intent, formality, audience);
        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            summary = %result.summary(),
            "Email analyzed"
        );

        result
    }

    /// Analyze an email with the four producers running concurrently.
    #[instrument(skip_all, fields(chars = text.len()))]
    pub async fn analyze_parallel(&self, text: &str) -> Result<AnalysisResult, AppError> {
        let start = Instant::now();
        let text: Arc<str> = Arc::from(text);

        let sentiment = {
            let (this, text) = (self.clone(), text.clone());
            tokio::task::spawn_blocking(move || this.sentiment.score(&text))
        };
        let intent = {
            let (this, text) = (self.clone(), text.clone());
            tokio::task::spawn_blocking(move || this.classify_intent(&text))
        };
        let formality = {
            let (this, text) = (self.clone(), text.clone());
            tokio::task::spawn_blocking(move || this.formality.classify_document(&text))
        };
        let audience = {
            let (this, text) = (self.clone(), text.clone());
            tokio::task::spawn_blocking(move || this.classify_audience(&text))
        };

        let (scores, intent, formality, audience) =
            tokio::join!(sentiment, intent, formality, audience);
        let result = assemble(scores?, intent?, formality?, audience?);

        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            summary = %result.summary(),
            "Email analyzed in parallel"
        );

        Ok(result)
    }

    /// Per-sentence formality breakdown.
    pub fn sentence_formality(&self, text: &str) -> SentenceFormalityRecord {
        self.formality.sentence_formality(text)
    }

    /// Sentences whose formality differs from `desired`.
    pub fn flag_mismatches(&self, text: &str, desired: Formality) -> Vec<FormalityFlag> {
        self.formality.flag_mismatches(text, desired)
    }

    fn classify_intent(&self, text: &str) -> Option<Classification<Intent>> {
        classify_isolated(self.intent.as_ref(), truncate_tokens(text, self.max_input_tokens))
    }

    fn classify_audience(&self, text: &str) -> Option<Classification<Audience>> {
        classify_isolated(self.audience.as_ref(), truncate_tokens(text, self.max_input_tokens))
    }
}

/// Run one classifier, turning a failure into a missing signal.
fn classify_isolated<L: Label>(
    classifier: &dyn TextClassifier<L>,
    text: &str,
) -> Option<Classification<L>> {
    match classifier.classify(text) {
        Ok(classification) => {
            debug!(
                classifier = classifier.name(),
                label = %classification.label,
                confidence = classification.confidence,
                "Classified"
            );
            Some(classification)
        }
        Err(e) => {
            warn!(classifier = classifier.name(), "Classifier failed, signal omitted: {}", e);
            None
        }
    }
}

fn assemble(
    scores: SentimentScores,
    intent: Option<Classification<Intent>>,
    formality: Formality,
    audience: Option<Classification<Audience>>,
) -> AnalysisResult {
    AnalysisResult {
        sentiment_category: scores.category(),
        sentiment_scores: scores,
        intent: intent.map(|c| c.label),
        intent_confidence: intent.map(|c| c.confidence),
        formality,
        audience: audience.map(|c| c.label),
        audience_confidence: audience.map(|c| c.confidence),
        feedback: None,
    }
}
