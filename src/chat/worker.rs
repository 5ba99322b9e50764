use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use tracing::debug;

use super::engine::{ChatEngine, OutgoingMessage, Reply};
use crate::responder::Exchange;

/// Result of one background request, delivered to the UI thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    Reply { turn: usize, reply: Reply },
}

/// Everything a worker needs, detached from UI state
pub struct ReplyJob {
    pub turn: usize,
    pub engine: ChatEngine,
    pub history: Vec<Exchange>,
    pub message: OutgoingMessage,
}

impl ReplyJob {
    /// Extract attachments and produce the reply. Blocks.
    pub fn run(self) -> WorkerEvent {
        let full_message = self.message.render();
        let reply = self.engine.plan_reply(&full_message, &self.history);
        WorkerEvent::Reply { turn: self.turn, reply }
    }
}

/// Run `job` on its own thread and send the result over `tx`.
///
/// A closed channel means the UI has gone away; the reply is dropped.
pub fn spawn_reply(job: ReplyJob, tx: Sender<WorkerEvent>) -> Result<JoinHandle<()>> {
    let turn = job.turn;
    thread::Builder::new()
        .name(format!("reply-{}", turn))
        .spawn(move || {
            let event = job.run();
            if tx.send(event).is_err() {
                debug!("Reply for turn {} dropped, receiver closed", turn);
            }
        })
        .context("Failed to spawn reply worker")
}
