//! Conversation pane module.
//!
//! The pane shows either the landing view (before the first message) or the
//! transcript, with the question input underneath.

mod landing;
mod transcript;
mod widget;

pub use landing::{input_placeholder, landing_lines};
pub use transcript::transcript_lines;
pub use widget::ConversationPane;
