use lopdf::Document;
use tracing::debug;

use super::extract::ExtractError;

/// Text of every page in page order, each followed by a newline
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let document = Document::load_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?;
    let pages = document.get_pages();
    debug!("Extracting text from {} PDF pages", pages.len());

    let mut text = String::new();
    for page_number in pages.keys() {
        let page_text = document
            .extract_text(&[*page_number])
            .map_err(|e| ExtractError::Pdf(format!("page {}: {}", page_number, e)))?;
        text.push_str(&page_text);
        text.push('\n');
    }

    Ok(text)
}
