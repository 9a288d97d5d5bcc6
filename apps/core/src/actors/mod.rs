//! # Actors Module
//!
//! The completion backend runs as an actor: a handle owns the mailbox sender,
//! a runner task owns the HTTP client and answers each request on a oneshot
//! channel.

pub mod llm;
pub mod messages;
pub mod traits;

pub use llm::LlmActorHandle;
pub use messages::{ActorError, ChatMessage, Completion, FunctionSpec, Role};
pub use traits::LlmActor;
