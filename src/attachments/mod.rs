//! Text extraction for user-attached files
//!
//! Extraction never aborts a message send: each file renders to a block of
//! text, and files that cannot be read render to an inline error line instead.

pub mod docx;
pub mod extract;
pub mod pdf;

pub use extract::{ExtractError, Extraction, extract, extract_text};

use tracing::warn;

use crate::models::Attachment;

const SEPARATOR_WIDTH: usize = 50;

fn separator() -> String {
    "=".repeat(SEPARATOR_WIDTH)
}

/// Render one attachment as a labelled block
pub fn render_attachment(attachment: &Attachment) -> String {
    let name = attachment.file_name();
    let header = format!("{} {}: {}", attachment.kind.icon(), attachment.kind.label(), name);

    match extract(&attachment.path) {
        Ok(Extraction::Text(text)) => {
            format!("{}\nContent:\n{}\n{}\n", header, text, separator())
        }
        Ok(Extraction::Note(note)) => format!("{}\n{}\n{}\n", header, note, separator()),
        Err(e) => {
            warn!("Failed to extract {}: {}", attachment.path.display(), e);
            format!("❌ Error reading {}: {}\n{}\n", name, e, separator())
        }
    }
}

/// Render every attachment, blocks separated by a blank line
pub fn render_attachments(attachments: &[Attachment]) -> String {
    attachments.iter().map(render_attachment).collect::<Vec<_>>().join("\n")
}
