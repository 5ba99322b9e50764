use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Extraction strategy chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttachmentKind {
    Pdf,
    Docx,
    LegacyDoc,
    Text,
    Json,
    Csv,
    Xml,
    Image,
    Other,
}

impl AttachmentKind {
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "doc" => Self::LegacyDoc,
            "txt" | "md" | "log" => Self::Text,
            "json" => Self::Json,
            "csv" => Self::Csv,
            "xml" => Self::Xml,
            "png" | "jpg" | "jpeg" | "gif" | "bmp" => Self::Image,
            _ => Self::Other,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Image => "🖼️",
            Self::Pdf | Self::Text => "📄",
            Self::Docx | Self::LegacyDoc => "📝",
            Self::Json | Self::Xml => "📋",
            Self::Csv => "📊",
            Self::Other => "📎",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF file",
            Self::Docx => "Word document",
            Self::LegacyDoc => "Word document (legacy format)",
            Self::Text => "Text file",
            Self::Json => "JSON file",
            Self::Csv => "CSV file",
            Self::Xml => "XML file",
            Self::Image => "Image",
            Self::Other => "File",
        }
    }
}

/// A user-selected file, consumed once per message send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub path: PathBuf,
    pub kind: AttachmentKind,
}

impl Attachment {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = AttachmentKind::from_path(&path);
        Self { path, kind }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Icon plus file name, as listed in the attachments pane
    pub fn display_label(&self) -> String {
        format!("{} {}", self.kind.icon(), self.file_name())
    }
}
