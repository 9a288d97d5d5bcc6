//! # Coach Module
//!
//! LLM-assisted feedback, generation and editing on top of the local analysis.
//!
//! ## Components
//! - `prompts`: deterministic prompt builders and the `edit_email` schema
//! - `conversation`: bounded per-session history
//! - `completion`: strict/lenient parsing of structured edit suggestions
//! - `workflow`: [`EmailCoach`], which ties the pieces together

pub mod completion;
pub mod conversation;
pub mod prompts;
pub mod workflow;

pub use completion::{parse_edit_suggestions, CompletionError, EditSuggestionSet, ParseOutcome};
pub use conversation::Conversation;
pub use prompts::{EditMode, TargetMetrics};
pub use workflow::{EmailCoach, GeneratedEmail};
