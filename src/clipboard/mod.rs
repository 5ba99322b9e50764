use anyhow::{Context, Result};
use arboard::Clipboard;

/// Maximum clipboard size (10MB)
const MAX_CLIPBOARD_SIZE: usize = 10 * 1024 * 1024;

/// Clipboard access, swappable for a mock in tests
pub trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
    fn get_text(&mut self) -> Result<String>;
}

/// Real clipboard implementation using arboard
pub struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        Ok(Self { clipboard })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard.set_text(text).context("Failed to set clipboard contents")?;
        Ok(())
    }

    fn get_text(&mut self) -> Result<String> {
        self.clipboard.get_text().context("Failed to read clipboard contents")
    }
}

/// Validates clipboard text without accessing system clipboard
pub fn validate_clipboard_text(text: &str) -> Result<()> {
    if text.is_empty() {
        anyhow::bail!("Cannot copy empty text to clipboard");
    }

    if text.len() > MAX_CLIPBOARD_SIZE {
        anyhow::bail!(
            "Text too large for clipboard ({} bytes, max {})",
            text.len(),
            MAX_CLIPBOARD_SIZE
        );
    }

    Ok(())
}

/// Validate and copy through any provider
pub fn copy_with_provider(text: &str, provider: &mut dyn ClipboardProvider) -> Result<()> {
    validate_clipboard_text(text)?;
    provider.set_text(text)?;
    Ok(())
}

/// Copy text to the system clipboard.
///
/// # Errors
/// Returns error if:
/// - Text is empty
/// - Text is too large for clipboard (>10MB)
/// - System clipboard is unavailable (headless environment)
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    // Validate before touching the clipboard so CI gets the real error
    validate_clipboard_text(text)?;

    let mut clipboard = SystemClipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}
