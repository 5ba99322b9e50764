//! Data models for chat sessions, attachments and scraped test cases.
//!
//! - [`Turn`] - One user message and the bot response that answers it
//! - [`Session`] - A continuous run of the chat, persisted as one JSON file
//! - [`Attachment`] - A user-selected file plus its extension-derived kind
//! - [`CaseRecord`] - A test case scraped from generated text
//!
//! Session models use serde aliases so history files written with the legacy
//! Spanish keys (`inicio`, `conversaciones`, `usuario`, ...) still load. Timestamps
//! go through the custom deserializers in `parsers::deserializers`.

pub mod attachment;
pub mod case;
pub mod session;
pub mod turn;

pub use attachment::{Attachment, AttachmentKind};
pub use case::{CaseField, CaseRecord};
pub use session::{Session, SessionStats};
pub use turn::Turn;
