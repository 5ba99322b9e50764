//! Parsers for session history files and generated test case text
//!
//! # Error Handling Strategy
//!
//! - **Session files**: a single file either parses or returns an error with
//!   context. The history store decides whether a bad file is skipped
//!   (see `history::store`).
//!
//! - **Case text**: generated text is free-form, so [`parse_cases`] never fails.
//!   Fields it cannot find fall back to defaults and the record remembers which.

pub mod cases;
pub mod deserializers;
pub mod session;

pub use cases::parse_cases;
pub use session::parse_session_file;
