//! Coaching flows that combine local analysis with a generative model.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::actors::messages::Completion;
use crate::actors::traits::LlmActor;
use crate::analysis::labels::{Formality, SentimentCategory};
use crate::analysis::{AnalysisResult, Analyzer, FormalityFlag};
use crate::coach::completion::{parse_edit_suggestions, CompletionError, EditSuggestionSet, ParseOutcome};
use crate::coach::conversation::Conversation;
use crate::coach::prompts::{self, TargetMetrics, EDIT_FUNCTION_NAME};
use crate::error::AppError;

/// An email written by the model together with its own analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedEmail {
    pub email: String,
    pub analysis: AnalysisResult,
    /// Whether the requested polarity was met; `None` when none was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polarity_matched: Option<bool>,
}

/// Analyzer plus completion backend.
///
/// Conversations are passed in by the caller. A failed completion leaves the
/// conversation exactly as it was.
pub struct EmailCoach<L: LlmActor> {
    analyzer: Analyzer,
    llm: Arc<L>,
}

impl<L: LlmActor> Clone for EmailCoach<L> {
    fn clone(&self) -> Self {
        Self {
            analyzer: self.analyzer.clone(),
            llm: Arc::clone(&self.llm),
        }
    }
}

impl<L: LlmActor> EmailCoach<L> {
    pub fn new(analyzer: Analyzer, llm: L) -> Self {
        Self::with_shared(analyzer, Arc::new(llm))
    }

    pub fn with_shared(analyzer: Analyzer, llm: Arc<L>) -> Self {
        Self { analyzer, llm }
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Analyze `text` and attach model feedback to the result.
    #[instrument(skip_all, fields(conversation = %conversation.id()))]
    pub async fn analyze_with_feedback(
        &self,
        conversation: &mut Conversation,
        text: &str,
    ) -> Result<AnalysisResult, AppError> {
        ensure_text(text)?;
        let analysis = self.analyzer.analyze_parallel(text).await?;
        let feedback = self.feedback(conversation, text, &analysis).await?;
        Ok(analysis.with_feedback(feedback))
    }

    /// Ask the model for improvements to `text` given its analysis.
    #[instrument(skip_all, fields(conversation = %conversation.id()))]
    pub async fn feedback(
        &self,
        conversation: &mut Conversation,
        text: &str,
        analysis: &AnalysisResult,
    ) -> Result<String, AppError> {
        ensure_text(text)?;
        let prompt = prompts::feedback_prompt(text, analysis);
        let reply = self
            .llm
            .complete_text(conversation.messages_with(prompt.as_str()))
            .await?;

        conversation.push_user(prompt);
        conversation.push_assistant(reply.as_str());
        info!(entries = conversation.len(), "Feedback received");
        Ok(reply)
    }

    /// Write an email from `request`, then analyze what came back.
    #[instrument(skip_all, fields(conversation = %conversation.id()))]
    pub async fn generate(
        &self,
        conversation: &mut Conversation,
        request: &str,
        targets: Option<&TargetMetrics>,
        feedback: Option<&str>,
    ) -> Result<GeneratedEmail, AppError> {
        ensure_text(request)?;
        let prompt = prompts::generation_prompt(request, targets, feedback);
        let email = self
            .llm
            .complete_text(conversation.messages_with(prompt.as_str()))
            .await?;

        conversation.push_user(prompt);
        conversation.push_assistant(email.as_str());

        let analysis = self.analyzer.analyze_parallel(&email).await?;
        let polarity_matched = targets
            .and_then(|t| t.polarity)
            .map(|wanted| polarity_met(wanted, analysis.sentiment_scores.compound));

        if polarity_matched == Some(false) {
            warn!(
                compound = analysis.sentiment_scores.compound,
                "Generated email missed the requested polarity"
            );
        }

        Ok(GeneratedEmail {
            email,
            analysis,
            polarity_matched,
        })
    }

    /// Record a generation request in the conversation without calling the
    /// model, and return the analysis of `request`.
    pub async fn append_context(
        &self,
        conversation: &mut Conversation,
        request: &str,
        targets: Option<&TargetMetrics>,
        feedback: Option<&str>,
    ) -> Result<AnalysisResult, AppError> {
        ensure_text(request)?;
        let analysis = self.analyzer.analyze_parallel(request).await?;
        conversation.push_user(prompts::generation_prompt(request, targets, feedback));
        Ok(analysis)
    }

    /// Structured edit suggestions. Each call uses a fresh message list.
    #[instrument(skip_all)]
    pub async fn edit(
        &self,
        text: &str,
        detected: &AnalysisResult,
        targets: Option<&TargetMetrics>,
    ) -> Result<EditSuggestionSet, AppError> {
        ensure_text(text)?;
        let messages = prompts::edit_messages(text, detected, targets);
        let completion = self
            .llm
            .complete(messages, Some(prompts::edit_function_spec()))
            .await?;

        let raw = match completion {
            Completion::FunctionCall { name, arguments } if name == EDIT_FUNCTION_NAME => arguments,
            Completion::FunctionCall { name, .. } => {
                return Err(CompletionError::UnexpectedFunction {
                    expected: EDIT_FUNCTION_NAME.to_string(),
                    found: name,
                }
                .into())
            }
            // Some deployments ignore `function_call` and answer in content.
            Completion::Text(text) => text,
        };

        match parse_edit_suggestions(&raw) {
            ParseOutcome::Parsed(set) => Ok(set),
            ParseOutcome::Repaired(set) => {
                warn!("Edit suggestions needed repair before parsing");
                Ok(set)
            }
            ParseOutcome::Failed(err) => Err(err.into()),
        }
    }

    /// Sentences whose formality differs from `desired`.
    pub fn flag_mismatches(&self, text: &str, desired: &str) -> Result<Vec<FormalityFlag>, AppError> {
        let desired: Formality = desired.parse().map_err(AppError::Validation)?;
        Ok(self.analyzer.flag_mismatches(text, desired))
    }
}

/// Positive and negative targets only need the right sign; a neutral target
/// needs the neutral band.
pub fn polarity_met(wanted: SentimentCategory, compound: f64) -> bool {
    match wanted {
        SentimentCategory::Positive => compound > 0.0,
        SentimentCategory::Negative => compound < 0.0,
        SentimentCategory::Neutral => SentimentCategory::from_compound(compound) == SentimentCategory::Neutral,
    }
}

fn ensure_text(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("Email text must not be empty".to_string()));
    }
    Ok(())
}
