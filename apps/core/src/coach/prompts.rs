//! Prompt templates for the coaching flows.
//!
//! Every builder is a pure function of its inputs. Scores are rendered with
//! two decimals and missing labels as `unknown`, so the same analysis always
//! yields byte-identical prompts.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::actors::messages::{ChatMessage, FunctionSpec};
use crate::analysis::labels::{Audience, Formality, Intent, SentimentCategory};
use crate::analysis::result::{label_or_unknown, AnalysisResult};

/// Name of the structured-output function used by the edit flow.
pub const EDIT_FUNCTION_NAME: &str = "edit_email";

pub const SUBJECT_COUNT: usize = 4;
pub const SALUTATION_COUNT: usize = 3;
pub const CLOSING_COUNT: usize = 3;
pub const BODY_COUNT: usize = 3;

pub const FEEDBACK_INSTRUCTIONS: &str = "\
You are an email coach that gives constructive feedback on email drafts.

Each request contains the draft together with an automatic analysis:
1. Sentiment polarity (positive, negative and neutral proportions, a compound score and a category)
2. Intent (follow-up, request or inform)
3. Formality (formal, neutral or informal)
4. Audience (professional, personal or general)

Use the analysis to judge the overall tone, whether that tone suits the audience and intent, \
how the email could achieve its purpose more effectively, whether the formality should change \
for this audience, and which specific words or phrases to rework.

Be concise and constructive. Focus on the 2-3 changes that would have the most impact.";

pub const GENERATION_INSTRUCTIONS: &str = "\
You write complete emails from a user's request. Reply with the email only, with no \
commentary before or after it. Aim for clarity, an appropriate tone and a clear purpose.

When the user asks for a negative polarity, the email must be written with negative \
statements so that its average polarity is negative, even if that makes it somewhat blunt.
When the user asks for a positive polarity, the email must be written with positive \
statements so that its average polarity is positive and noticeably warm.";

pub const EDIT_INSTRUCTIONS: &str = "\
You are an email editing assistant. Revise the draft using the metrics provided and return \
exactly 4 subject lines, 3 salutations, 3 closings and 3 revised bodies.
There are two modes:
- Auto mode: only detected metrics are given. Treat them as a baseline and make the improvements you judge best.
- Guided mode: detected and target metrics are given. Rework the email until it matches the targets.
In both modes keep the core message intact while adapting style and tone.";

/// User-requested characteristics for edits and generation. `None` means no
/// preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMetrics {
    pub intent: Option<Intent>,
    pub formality: Option<Formality>,
    pub audience: Option<Audience>,
    pub polarity: Option<SentimentCategory>,
}

impl TargetMetrics {
    pub fn is_empty(&self) -> bool {
        self.intent.is_none()
            && self.formality.is_none()
            && self.audience.is_none()
            && self.polarity.is_none()
    }

    fn render(&self) -> String {
        format!(
            "- Intent: {}\n- Formality: {}\n- Audience: {}\n- Polarity: {}\n",
            preference(self.intent),
            preference(self.formality),
            preference(self.audience),
            preference(self.polarity),
        )
    }
}

fn preference<L: std::fmt::Display>(label: Option<L>) -> String {
    label
        .map(|l| l.to_string())
        .unwrap_or_else(|| "no preference".to_string())
}

/// Auto edits improve freely; guided edits move toward targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Auto,
    Guided,
}

impl EditMode {
    pub fn for_targets(targets: Option<&TargetMetrics>) -> Self {
        match targets {
            Some(t) if !t.is_empty() => EditMode::Guided,
            _ => EditMode::Auto,
        }
    }
}

fn scores_line(analysis: &AnalysisResult) -> String {
    let s = &analysis.sentiment_scores;
    format!(
        "pos={:.2}, neg={:.2}, neu={:.2}, compound={:.2}",
        s.pos, s.neg, s.neu, s.compound
    )
}

/// Detected metrics as a bullet list.
pub fn metrics_block(analysis: &AnalysisResult) -> String {
    format!(
        "- Sentiment Category: {}\n- Sentiment Scores: {}\n- Intent: {}\n- Formality: {}\n- Audience: {}\n",
        analysis.sentiment_category,
        scores_line(analysis),
        label_or_unknown(analysis.intent),
        analysis.formality,
        label_or_unknown(analysis.audience),
    )
}

/// User turn asking for feedback on `text`.
pub fn feedback_prompt(text: &str, analysis: &AnalysisResult) -> String {
    format!(
        "Email Text:\n------\n{}\n------\n\nSentiment Analysis:\n{}\nPlease provide specific, actionable feedback to improve this email.",
        text.trim(),
        metrics_block(analysis),
    )
}

/// User turn for the edit flow, auto or guided depending on `targets`.
pub fn edit_prompt(text: &str, detected: &AnalysisResult, targets: Option<&TargetMetrics>) -> String {
    let mut prompt = format!(
        "Original Email:\n{}\n\nDetected Baseline Metrics (current state of the email):\n{}\n",
        text.trim(),
        metrics_block(detected),
    );

    match (EditMode::for_targets(targets), targets) {
        (EditMode::Guided, Some(targets)) => {
            let _ = write!(
                prompt,
                "Target Metrics (User-Specified):\n{}\n\
                 GUIDED MODE:\n\
                 1. Treat the detected metrics only as a description of the current draft.\n\
                 2. Rewrite the email so it matches the target metrics.\n\
                 3. Shift intent, formality, audience fit and overall polarity as requested.\n\
                 4. Keep the core message while adapting tone and style.",
                targets.render(),
            );
        }
        _ => {
            prompt.push_str(
                "AUTO MODE (no targets given):\n\
                 1. Treat the detected metrics only as a description of the current draft.\n\
                 2. Improve clarity, tone and effectiveness as you see fit.\n\
                 3. Keep the original intent of the message.",
            );
        }
    }

    prompt
}

/// User turn for free-form generation.
pub fn generation_prompt(
    request: &str,
    targets: Option<&TargetMetrics>,
    feedback: Option<&str>,
) -> String {
    let mut prompt = format!("Text to use to generate the email:\n{}\n", request.trim());

    if let Some(targets) = targets.filter(|t| !t.is_empty()) {
        let _ = write!(
            prompt,
            "\nThe user requested the following targets (meet as many as possible):\nTarget Metrics (User-Specified):\n{}",
            targets.render(),
        );
    }

    if let Some(feedback) = feedback.map(str::trim).filter(|f| !f.is_empty()) {
        let _ = write!(
            prompt,
            "\nThe user received the feedback below and wants it applied to this email:\n{}\n",
            feedback,
        );
    }

    prompt
}

fn string_array(count: usize, description: &str) -> serde_json::Value {
    json!({
        "type": "array",
        "items": { "type": "string" },
        "minItems": count,
        "maxItems": count,
        "description": description,
    })
}

/// Function schema forcing exactly 4 subjects and 3 salutations, closings
/// and bodies.
pub fn edit_function_spec() -> FunctionSpec {
    FunctionSpec {
        name: EDIT_FUNCTION_NAME.to_string(),
        description: "Given an email, suggest exactly 4 subject lines, 3 salutations, 3 closings and 3 edited bodies.".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "Subjects": string_array(SUBJECT_COUNT, "Exactly four recommended subject lines"),
                "Salutations": string_array(SALUTATION_COUNT, "Exactly three recommended salutations"),
                "Closings": string_array(CLOSING_COUNT, "Exactly three recommended closings"),
                "Bodies": string_array(BODY_COUNT, "Exactly three recommended bodies"),
            },
            "required": ["Subjects", "Salutations", "Closings", "Bodies"],
        }),
    }
}

/// Fresh message list for one edit request.
pub fn edit_messages(
    text: &str,
    detected: &AnalysisResult,
    targets: Option<&TargetMetrics>,
) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(EDIT_INSTRUCTIONS),
        ChatMessage::user(edit_prompt(text, detected, targets)),
    ]
}
