use std::io;
use std::path::Path;

use thiserror::Error;

use super::{docx, pdf};
use crate::models::AttachmentKind;
use crate::utils::read_bounded;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{0}")]
    Io(#[from] io::Error),

    /// Open, size check or read failed
    #[error("{0}")]
    Read(String),

    #[error("file is not valid UTF-8 text")]
    NotUtf8,

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("could not read Word document: {0}")]
    Docx(String),
}

/// What extraction produced for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Text that goes into the prompt
    Text(String),
    /// No usable text. The note explains why.
    Note(&'static str),
}

pub const EMPTY_NOTE: &str = "[The document appears to be empty or has no extractable text]";
pub const LEGACY_DOC_NOTE: &str =
    "[Please convert the file to .docx so it can be read, or paste its content directly]";
pub const IMAGE_NOTE: &str = "[The image has been attached for analysis]";
pub const BINARY_NOTE: &str = "[Binary file - content cannot be shown]";

/// Extract text from `path`, choosing the reader from the extension
pub fn extract(path: &Path) -> Result<Extraction, ExtractError> {
    let kind = AttachmentKind::from_path(path);
    let text = match kind {
        AttachmentKind::LegacyDoc => return Ok(Extraction::Note(LEGACY_DOC_NOTE)),
        AttachmentKind::Image => return Ok(Extraction::Note(IMAGE_NOTE)),
        AttachmentKind::Pdf => pdf::extract_pdf_text(&read_limited(path)?)?,
        AttachmentKind::Docx => docx::extract_docx_text(read_limited(path)?)?,
        AttachmentKind::Text | AttachmentKind::Json | AttachmentKind::Csv | AttachmentKind::Xml => {
            String::from_utf8(read_limited(path)?).map_err(|_| ExtractError::NotUtf8)?
        }
        AttachmentKind::Other => match String::from_utf8(read_limited(path)?) {
            Ok(text) => text,
            Err(_) => return Ok(Extraction::Note(BINARY_NOTE)),
        },
    };

    if text.trim().is_empty() {
        Ok(Extraction::Note(EMPTY_NOTE))
    } else {
        Ok(Extraction::Text(text))
    }
}

/// Extraction that never fails: problems come back as inline text
pub fn extract_text(path: &Path) -> String {
    match extract(path) {
        Ok(Extraction::Text(text)) => text,
        Ok(Extraction::Note(note)) => note.to_string(),
        Err(e) => format!("❌ Error reading {}: {}", display_name(path), e),
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_limited(path: &Path) -> Result<Vec<u8>, ExtractError> {
    read_bounded(path).map_err(|e| ExtractError::Read(format!("{:#}", e)))
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use tempfile::TempDir;

    use super::*;
    use crate::utils::MAX_FILE_SIZE_BYTES;

    #[test]
    fn test_plain_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("requirements.txt");
        fs::write(&path, "The login form must lock after 3 attempts").unwrap();

        assert_eq!(
            extract(&path).unwrap(),
            Extraction::Text("The login form must lock after 3 attempts".to_string())
        );
    }

    #[test]
    fn test_empty_text_file_is_noted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "  \n").unwrap();

        assert_eq!(extract(&path).unwrap(), Extraction::Note(EMPTY_NOTE));
    }

    #[test]
    fn test_legacy_doc_and_image_notes() {
        let dir = TempDir::new().unwrap();
        let doc = dir.path().join("old.doc");
        let image = dir.path().join("screen.png");
        fs::write(&doc, [0xd0, 0xcf, 0x11, 0xe0]).unwrap();
        fs::write(&image, [0x89, b'P', b'N', b'G']).unwrap();

        assert_eq!(extract(&doc).unwrap(), Extraction::Note(LEGACY_DOC_NOTE));
        assert_eq!(extract(&image).unwrap(), Extraction::Note(IMAGE_NOTE));
    }

    #[test]
    fn test_binary_other_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blob.bin");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x9f]).unwrap();

        assert_eq!(extract(&path).unwrap(), Extraction::Note(BINARY_NOTE));
    }

    #[test]
    fn test_non_utf8_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        assert!(matches!(extract(&path), Err(ExtractError::NotUtf8)));
    }

    #[test]
    fn test_missing_file_is_inline_error() {
        let text = extract_text(Path::new("/nonexistent/requirements.txt"));
        assert!(text.starts_with("❌ Error reading requirements.txt: Failed to open file"), "got {text}");
    }

    #[test]
    fn test_oversized_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("huge.txt");
        let file = File::create(&path).unwrap();
        file.set_len(MAX_FILE_SIZE_BYTES + 1).unwrap();

        assert!(matches!(extract(&path), Err(ExtractError::Read(msg)) if msg.contains("File too large")));
        assert!(extract_text(&path).starts_with("❌ Error reading huge.txt: File too large"));
    }

    #[test]
    fn test_corrupt_pdf_is_inline_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.pdf");
        fs::write(&path, b"not a pdf at all").unwrap();

        let text = extract_text(&path);
        assert!(text.contains("❌ Error reading broken.pdf: could not read PDF"), "got {text}");
    }
}
