use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;

use super::extract::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Body paragraphs first, one per line, then table rows as `cell | cell | `
pub fn extract_docx_text(bytes: Vec<u8>) -> Result<String, ExtractError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractError::Docx(e.to_string()))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::Docx(format!("{}: {}", DOCUMENT_PART, e)))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)?;

    let body = parse_document_xml(&xml)?;
    Ok(body.render())
}

#[derive(Debug, Default)]
struct DocumentBody {
    paragraphs: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl DocumentBody {
    fn render(&self) -> String {
        let mut out = String::new();
        for paragraph in &self.paragraphs {
            out.push_str(paragraph);
            out.push('\n');
        }
        for row in &self.rows {
            for cell in row.iter().filter(|c| !c.trim().is_empty()) {
                out.push_str(cell);
                out.push_str(" | ");
            }
            out.push('\n');
        }
        out
    }
}

fn parse_document_xml(xml: &str) -> Result<DocumentBody, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut body = DocumentBody::default();

    let mut paragraph = String::new();
    let mut in_text = false;
    // Open table cells and rows, innermost last
    let mut cells: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => paragraph.clear(),
                b"t" => in_text = true,
                b"tr" => rows.push(Vec::new()),
                b"tc" => cells.push(String::new()),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => paragraph.push('\t'),
                b"br" | b"cr" => paragraph.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t.unescape().map_err(|e| ExtractError::Docx(e.to_string()))?;
                paragraph.push_str(&text);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => match cells.last_mut() {
                    Some(cell) => {
                        if !cell.is_empty() {
                            cell.push('\n');
                        }
                        cell.push_str(&paragraph);
                    }
                    None if !paragraph.trim().is_empty() => body.paragraphs.push(paragraph.clone()),
                    None => {}
                },
                b"tc" => {
                    if let Some(cell) = cells.pop()
                        && let Some(row) = rows.last_mut()
                    {
                        row.push(cell);
                    }
                }
                b"tr" => {
                    if let Some(row) = rows.pop() {
                        body.rows.push(row);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ExtractError::Docx(format!(
                    "malformed XML at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        }
    }

    Ok(body)
}
