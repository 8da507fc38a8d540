//! personaquery-engine: Headless conversation engine for the PersonaQuery client
//!
//! This crate provides everything below the view layer:
//! - Transcript data model (messages, sources, input buffer)
//! - The answer service gateway (HTTP, JSON)
//! - The conversation controller and its single-flight request lifecycle
//! - A read-only projection of the conversation for rendering
//! - Layered configuration

pub mod config;
pub mod controller;
pub mod gateway;
pub mod input;
pub mod message;
pub mod view;

// Re-export commonly used types
pub use config::{AskMode, Config, ConfigError};
pub use controller::{
    Conversation, IgnoreReason, PendingRequest, PromptOrigin, RequestId, Resolution,
    SubmitOutcome, NETWORK_ERROR_NOTICE, NO_ANSWER_NOTICE,
};
pub use gateway::{AnswerGateway, AnswerResult, ChatReply, GatewayError, HealthReport, HttpGateway};
pub use input::InputBuffer;
pub use message::{Message, Role, Source, Transcript};
pub use view::{BubbleView, SourceView, TranscriptView, ViewItem};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
