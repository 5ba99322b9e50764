//! Heuristic scraper for `[CP-n]` test case blocks in generated text.
//!
//! Generated text is free-form, so the scraper never fails: unmatched fields
//! keep the defaults from [`CaseRecord::new`], and blocks that look like
//! prompt instructions rather than cases are dropped.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::{CaseField, CaseRecord};

/// Case id in brackets followed by the title, which models often keep in
/// the template's own brackets: `[CP-001] [Login with valid credentials]`
static CASE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(CP-\d+|[A-Z]+-\d+)\](?:[ \t]*\[([^\n\[\]]+)\]|\s*([^\n\[]+))")
        .expect("Invalid case header regex")
});

/// A line that opens a case block
static CASE_LINE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\w+-\d+\]").expect("Invalid case line regex"));

/// Separator that closes the last block
static BLOCK_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n---\s*\n").expect("Invalid separator regex"));

/// Upper-cased markers after which the text is prompt instructions, not cases
const INSTRUCTION_MARKERS: &[&str] = &[
    "INSTRUCCIONES ESPECÍFICAS",
    "SPECIFIC INSTRUCTIONS",
    "FORMATO DE RESPUESTA",
    "RESPONSE FORMAT",
    "IMPORTANTE:",
    "IMPORTANT:",
    "REQUISITOS:",
    "REQUIREMENTS:",
    "SEPARADORES:",
    "SEPARATORS:",
    "TIPS:",
    "EJEMPLOS:",
    "EXAMPLES:",
    "NOTA:",
    "NOTE:",
];

/// Upper-cased keywords that disqualify a line from being a step
const STEP_NOISE: &[&str] =
    &["INSTRUCCIONES", "INSTRUCTIONS", "IMPORTANTE", "IMPORTANT:", "FORMATO", "RESPONSE FORMAT"];

const MIN_TITLE_CHARS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Field(CaseField),
    Number,
    Passed,
    Steps,
}

/// Lower-case label spellings, Spanish and English
const LABELS: &[(&str, Label)] = &[
    ("descripción", Label::Field(CaseField::Description)),
    ("descripcion", Label::Field(CaseField::Description)),
    ("description", Label::Field(CaseField::Description)),
    ("fecha de creación", Label::Field(CaseField::Date)),
    ("fecha de creacion", Label::Field(CaseField::Date)),
    ("creation date", Label::Field(CaseField::Date)),
    ("created", Label::Field(CaseField::Date)),
    ("nº id", Label::Number),
    ("n° id", Label::Number),
    ("id no.", Label::Number),
    ("id no", Label::Number),
    ("id number", Label::Number),
    ("módulo", Label::Field(CaseField::Module)),
    ("modulo", Label::Field(CaseField::Module)),
    ("module", Label::Field(CaseField::Module)),
    ("prioridad", Label::Field(CaseField::Priority)),
    ("priority", Label::Field(CaseField::Priority)),
    ("status", Label::Field(CaseField::Status)),
    ("estado", Label::Field(CaseField::Status)),
    ("proyectos", Label::Field(CaseField::Project)),
    ("proyecto", Label::Field(CaseField::Project)),
    ("projects", Label::Field(CaseField::Project)),
    ("project", Label::Field(CaseField::Project)),
    ("resultado esperado", Label::Field(CaseField::ExpectedResult)),
    ("expected result", Label::Field(CaseField::ExpectedResult)),
    ("comentarios", Label::Field(CaseField::Comments)),
    ("comments", Label::Field(CaseField::Comments)),
    ("prueba superada", Label::Passed),
    ("test passed", Label::Passed),
    ("pasos a seguir", Label::Steps),
    ("steps to follow", Label::Steps),
    ("steps", Label::Steps),
];

/// Scrape every case record out of `text`
pub fn parse_cases(text: &str) -> Vec<CaseRecord> {
    let filtered = prefilter(text);
    let source = if filtered.is_empty() { text } else { filtered.as_str() };

    let headers: Vec<_> = CASE_HEADER.captures_iter(source).collect();
    let mut cases = Vec::with_capacity(headers.len());

    for (i, caps) in headers.iter().enumerate() {
        let title = caps.get(2).or_else(|| caps.get(3));
        let (Some(whole), Some(id), Some(title)) = (caps.get(0), caps.get(1), title) else {
            continue;
        };

        let start = whole.start();
        let end = match headers.get(i + 1).and_then(|next| next.get(0)) {
            Some(next) => next.start(),
            None => BLOCK_SEPARATOR
                .find(&source[start..])
                .map(|m| start + m.start())
                .unwrap_or(source.len()),
        };

        let title = title.as_str().trim();
        if !is_real_title(title) {
            debug!("Skipping case block {} with title {:?}", id.as_str(), title);
            continue;
        }

        let mut record = CaseRecord::new(id.as_str().trim(), title);
        // Body starts after the header line
        let body = &source[whole.end()..end];
        fill_fields(&mut record, body);
        cases.push(record);
    }

    cases
}

/// Keep only the lines from the first case id up to the first instruction marker
fn prefilter(text: &str) -> String {
    let mut kept = Vec::new();
    let mut capturing = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if CASE_LINE_START.is_match(trimmed) {
            capturing = true;
        }
        if capturing {
            let upper = trimmed.to_uppercase();
            if INSTRUCTION_MARKERS.iter().any(|m| upper.contains(m)) {
                break;
            }
            kept.push(line);
        }
    }

    kept.join("\n")
}

fn is_real_title(title: &str) -> bool {
    let lower = title.to_lowercase();
    !lower.contains("instrucciones")
        && !lower.contains("instructions")
        && title.chars().count() > MIN_TITLE_CHARS
}

fn fill_fields(record: &mut CaseRecord, body: &str) {
    let lines: Vec<&str> = body.lines().map(str::trim).collect();
    let mut steps = Vec::new();
    let mut in_steps = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        i += 1;
        if line.is_empty() {
            continue;
        }

        if let Some((label, inline)) = match_label(line) {
            in_steps = label == Label::Steps;
            if in_steps {
                // `Steps: 1. Open the app` carries the first step inline
                let step = strip_brackets(inline);
                if is_step(&step) {
                    steps.push(step);
                }
                continue;
            }

            let value = if inline.is_empty() {
                // Value sits on the next non-empty line
                match lines[i..].iter().position(|l| !l.is_empty()) {
                    Some(offset) => {
                        let value = lines[i + offset];
                        i += offset + 1;
                        value
                    }
                    None => continue,
                }
            } else {
                inline
            };

            let value = strip_brackets(value);
            if value.is_empty() {
                continue;
            }
            match label {
                Label::Field(field) => record.set(field, value),
                Label::Number => record.number = Some(value),
                Label::Passed | Label::Steps => {}
            }
            continue;
        }

        if in_steps {
            if line.starts_with("---") {
                in_steps = false;
                continue;
            }
            let step = strip_brackets(line);
            if is_step(&step) {
                steps.push(step);
            }
        }
    }

    record.set_steps(steps);
}

fn is_step(step: &str) -> bool {
    if step.is_empty() {
        return false;
    }
    let lower = step.to_lowercase();
    if ["resultado", "expected", "comentarios", "comments"].iter().any(|p| lower.starts_with(p)) {
        return false;
    }
    let upper = step.to_uppercase();
    !STEP_NOISE.iter().any(|k| upper.contains(k))
}

/// Recognise a label line. Returns the label and any value written after a colon
/// on the same line. Leading emoji, bullets and markdown emphasis are ignored.
fn match_label(line: &str) -> Option<(Label, &str)> {
    let stripped = line.trim_start_matches(|c: char| !c.is_alphanumeric());

    for (spelling, label) in LABELS {
        let Some(rest) = strip_prefix_ignore_case(stripped, spelling) else {
            continue;
        };
        let rest = rest.trim_start_matches(['*', '_']).trim_start();
        if rest.is_empty() {
            return Some((*label, ""));
        }
        if let Some(value) = rest.strip_prefix(':') {
            return Some((*label, value.trim().trim_matches(['*', '_']).trim()));
        }
    }

    None
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let mut chars = s.char_indices();
    for expected in prefix.chars() {
        let (_, actual) = chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    match chars.next() {
        Some((idx, _)) => Some(&s[idx..]),
        None => Some(""),
    }
}

fn strip_brackets(value: &str) -> String {
    value.replace(['[', ']'], "").trim().to_string()
}
