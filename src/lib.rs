//! QA Assistant - a terminal chat assistant for software QA work
//!
//! Messages go to Google's Gemini API when a key is configured and fall back
//! to local pattern-based replies otherwise. The library provides:
//!
//! - Text extraction from attached files (PDF, DOCX and plain text formats)
//! - Prompt assembly with recent history, role personas and document templates
//! - JSON session history with plain-text transcript export
//! - A scraper that turns generated `[CP-n]` test case text into records
//! - A clipboard + browser export of those records to a Notion board
//!
//! # Example
//!
//! ```no_run
//! use qa_assistant::chat::ChatEngine;
//! use qa_assistant::parsers::parse_cases;
//!
//! let mut engine = ChatEngine::new("QA Assistant", None);
//! let (_, reply) = engine.process_message("generate test cases for the login form");
//! for case in parse_cases(&reply.text) {
//!     println!("{} {}", case.id, case.title);
//! }
//! ```

pub mod ai;
pub mod attachments;
pub mod chat;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod history;
pub mod logging;
pub mod models;
pub mod notion;
pub mod parsers;
pub mod responder;
pub mod tui;
pub mod utils;

// Re-export commonly used types
pub use attachments::extract_text;
pub use chat::{ChatEngine, Reply};
pub use history::SessionStore;
pub use models::{Attachment, CaseRecord, Session, Turn};
pub use parsers::parse_cases;
pub use responder::LocalResponder;
