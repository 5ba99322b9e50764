//! Session history on disk and its plain-text export
//!
//! Files are never merged or pruned; one JSON file per saved session.

pub mod store;
pub mod transcript;

pub use store::{SessionStore, StoredSession};
pub use transcript::render_transcript;
