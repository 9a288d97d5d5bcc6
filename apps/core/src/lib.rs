//! Sentify core: offline email analysis (sentiment, intent, formality,
//! audience) and LLM-backed coaching.

pub mod actors;
pub mod analysis;
pub mod coach;
pub mod config;
pub mod error;
pub mod input;
pub mod telemetry;

pub use analysis::{AnalysisResult, Analyzer};
pub use coach::{Conversation, EmailCoach};
pub use error::AppError;

#[cfg(test)]
mod tests;
