//! Local replies and prompt assembly
//!
//! - [`LocalResponder`] - canned replies for small talk and offline mode
//! - [`Role`] - personas selected by "act as ..." phrases
//! - [`build_prompt`] - full prompt text sent to the AI

pub mod local;
pub mod prompt;
pub mod roles;
pub mod templates;

pub use local::{ContentKind, LocalResponder, offline_attachment_reply};
pub use prompt::{ATTACHMENTS_MARKER, Exchange, build_prompt, recent_history, split_message};
pub use roles::Role;
