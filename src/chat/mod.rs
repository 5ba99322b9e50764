//! Message routing and the background reply worker

pub mod engine;
pub mod worker;

pub use engine::{
    ATTACHMENTS_ONLY_TEXT, ChatEngine, OutgoingMessage, Reply, history_text, is_exit_command,
};
pub use worker::{ReplyJob, WorkerEvent, spawn_reply};
