use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local};
use tracing::{debug, info};

use super::config::NotionConfig;
use crate::clipboard::{ClipboardProvider, copy_with_provider};
use crate::models::CaseRecord;
use crate::parsers::parse_cases;
use crate::utils::read_bounded;

const UNTESTED: &str = "Pending";

/// Clipboard text counts as case output only if it carries one of these
const CASE_TEXT_MARKERS: &[&str] = &[
    "[CP-",
    "📄 Description",
    "📄 Descripción",
    "🎯 Expected result",
    "🎯 Resultado esperado",
];

/// Opens URLs in the user's browser
pub trait BrowserOpener {
    fn open(&self, url: &str) -> Result<()>;
}

/// Default system browser via the `open` crate
pub struct SystemBrowser;

impl BrowserOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        open::that(url).with_context(|| format!("Failed to open browser at {}", url))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub total: usize,
    pub text: String,
    pub url: String,
}

/// Where the exported case text came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOrigin {
    File(PathBuf),
    LastReply,
    Clipboard,
    Sample,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSource {
    pub origin: ExportOrigin,
    pub text: String,
}

impl ExportSource {
    /// The built-in sample cases
    pub fn sample() -> Self {
        Self { origin: ExportOrigin::Sample, text: SAMPLE_CASES.to_string() }
    }
}

fn looks_like_cases(text: &str) -> bool {
    CASE_TEXT_MARKERS.iter().any(|m| text.contains(m))
}

/// Pick the text to export: an explicit file, then the last AI reply if it
/// holds scrapable cases, then the clipboard if it holds case-like text.
/// `None` when nothing qualifies.
pub fn resolve_export_source(
    file: Option<&Path>,
    last_ai_reply: Option<&str>,
    clipboard: &mut dyn ClipboardProvider,
) -> Result<Option<ExportSource>> {
    if let Some(path) = file {
        let bytes = read_bounded(path)?;
        let text = String::from_utf8(bytes)
            .with_context(|| format!("Case file is not valid UTF-8: {}", path.display()))?;
        return Ok(Some(ExportSource { origin: ExportOrigin::File(path.to_path_buf()), text }));
    }

    if let Some(reply) = last_ai_reply
        && !parse_cases(reply).is_empty()
    {
        return Ok(Some(ExportSource { origin: ExportOrigin::LastReply, text: reply.to_string() }));
    }

    match clipboard.get_text() {
        Ok(text) if looks_like_cases(&text) => {
            Ok(Some(ExportSource { origin: ExportOrigin::Clipboard, text }))
        }
        Ok(_) => Ok(None),
        Err(e) => {
            debug!("Clipboard unavailable as export source: {:#}", e);
            Ok(None)
        }
    }
}

fn format_case(out: &mut String, case: &CaseRecord, position: usize) {
    let number = case.number.clone().unwrap_or_else(|| position.to_string());
    let fields = [
        ("📄 Description", case.description.as_str()),
        ("📅 Created", case.date.as_str()),
        ("🔢 ID No.", number.as_str()),
        ("🗂 Module", case.module.as_str()),
        ("✅ Test passed", UNTESTED),
        ("🚨 Priority", case.priority.as_str()),
        ("🔄 Status", case.status.as_str()),
        ("📌 Project", case.project.as_str()),
        ("🎯 Expected result", case.expected_result.as_str()),
        ("Comments", case.comments.as_str()),
    ];

    out.push_str(&format!("[{}] {}\n\n", case.id, case.title));
    for (label, value) in fields {
        out.push_str(&format!("{}\n{}\n\n", label, value));
    }
    out.push_str("Steps:\n\n");
    for step in &case.steps {
        out.push_str(step);
        out.push('\n');
    }
    out.push_str("\n---\n\n");
}

const NOTION_INSTRUCTIONS: &str = "💡 **Instructions for Notion:**
1. 📋 This content is already in your clipboard
2. 🌐 Notion opens in your browser
3. ➕ Create new pages in your database
4. 📝 Paste each case into its own page
5. 🎨 Notion keeps the emojis and formatting

";

/// Clipboard text for pasting cases into a Notion board
pub fn format_cases_for_notion(cases: &[CaseRecord], database_id: &str, now: DateTime<Local>) -> String {
    let mut out = String::from("# 📋 Test Cases - Automatic Export\n");
    out.push_str(&format!("*Generated on {}*\n\n", now.format("%d/%m/%Y %H:%M")));

    for (i, case) in cases.iter().enumerate() {
        format_case(&mut out, case, i + 1);
    }

    out.push_str(NOTION_INSTRUCTIONS);
    out.push_str(&format!("🔗 **Your database ID:** {}\n", database_id));
    out
}

/// Copy the formatted cases and open the board
pub fn export_cases(
    cases: &[CaseRecord],
    config: &NotionConfig,
    clipboard: &mut dyn ClipboardProvider,
    browser: &dyn BrowserOpener,
) -> Result<ExportReport> {
    if !config.is_configured() {
        bail!("Notion is not configured. Run `qa-assistant notion configure <DATABASE_ID_OR_URL>` first");
    }
    if cases.is_empty() {
        bail!("No test cases found to export");
    }

    let text = format_cases_for_notion(cases, &config.database_id, Local::now());
    copy_with_provider(&text, clipboard).context("Failed to copy cases to clipboard")?;

    let url = config.board_url();
    browser.open(&url)?;

    info!("Exported {} cases to Notion board {}", cases.len(), config.database_id);
    Ok(ExportReport { total: cases.len(), text, url })
}

const SAMPLE_CASES: &str = "[CP-001] Login with valid credentials

📄 Description
Verify that a user can sign in with valid credentials

📅 Created
12/08/2025

🔢 ID No.
1

🗂 Module
Authentication

🚨 Priority
High

🔄 Status
Pending

📌 Project
Login System

🎯 Expected result
The user reaches the main dashboard with an active session

Comments
Critical path for basic system access

Steps:

Open the login page in the browser
Enter a valid username
Enter a valid password
Click the \"Sign in\" button
Verify the redirect to the main dashboard

---

[CP-002] Login with invalid credentials

📄 Description
Verify that the system rejects wrong credentials with a clear error message

📅 Created
12/08/2025

🔢 ID No.
2

🗂 Module
Authentication

🚨 Priority
High

🔄 Status
Pending

📌 Project
Login System

🎯 Expected result
An error message is shown and access is denied

Comments
Guards against unauthorised access

Steps:

Open the login page in the browser
Enter an unknown username
Enter a wrong password
Click the \"Sign in\" button
Verify that an error message appears

---

[CP-003] New user registration

📄 Description
Verify that a new user can create an account with valid data

📅 Created
12/08/2025

🔢 ID No.
3

🗂 Module
Registration

🚨 Priority
Medium

🔄 Status
Pending

📌 Project
Login System

🎯 Expected result
The account is created and a confirmation email is sent

Comments
Check the email delivery in the test environment

Steps:

Open the registration page
Fill in name, email and password
Accept the terms and conditions
Click the \"Create account\" button
Verify the confirmation message

---
";

/// Built-in three-case text for trying the export without an AI round-trip
pub fn sample_cases() -> &'static str {
    SAMPLE_CASES
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::TimeZone;

    use super::*;
    use crate::clipboard::tests::MockClipboard;

    const ID: &str = "1234567890abcdef1234567890abcdef";

    #[derive(Default)]
    struct RecordingBrowser {
        opened: RefCell<Vec<String>>,
        fail: bool,
    }

    impl BrowserOpener for RecordingBrowser {
        fn open(&self, url: &str) -> Result<()> {
            if self.fail {
                bail!("no browser");
            }
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    fn configured() -> NotionConfig {
        NotionConfig::new(ID, None).unwrap()
    }

    #[test]
    fn test_sample_cases_parse_completely() {
        let cases = parse_cases(sample_cases());
        assert_eq!(cases.len(), 3);
        for case in &cases {
            assert!(case.is_complete(), "{} defaulted {:?}", case.id, case.defaulted);
            assert_eq!(case.steps.len(), 5);
        }
        assert_eq!(cases[2].module, "Registration");
    }

    #[test]
    fn test_format_layout() {
        let now = Local.with_ymd_and_hms(2025, 8, 12, 9, 5, 0).unwrap();
        let mut case = CaseRecord::new("CP-009", "Password reset email");
        case.set_steps(vec!["Open reset page".into(), "Submit email".into()]);

        let text = format_cases_for_notion(&[case], ID, now);
        assert!(text.starts_with("# 📋 Test Cases - Automatic Export\n*Generated on 12/08/2025 09:05*\n"));
        assert!(text.contains("[CP-009] Password reset email\n\n📄 Description\n"));
        assert!(text.contains("🔢 ID No.\n1\n"));
        assert!(text.contains("Steps:\n\nOpen reset page\nSubmit email\n\n---\n"));
        assert!(text.contains(&format!("🔗 **Your database ID:** {ID}")));
    }

    #[test]
    fn test_formatted_export_parses_back() {
        let cases = parse_cases(sample_cases());
        let text = format_cases_for_notion(&cases, ID, Local::now());
        let reparsed = parse_cases(&text);

        assert_eq!(reparsed.len(), 3);
        assert_eq!(reparsed[1].expected_result, cases[1].expected_result);
        assert_eq!(reparsed[0].steps, cases[0].steps);
    }

    #[test]
    fn test_export_copies_and_opens_board() {
        let cases = parse_cases(sample_cases());
        let mut clipboard = MockClipboard::default();
        let browser = RecordingBrowser::default();

        let report = export_cases(&cases, &configured(), &mut clipboard, &browser).unwrap();

        assert_eq!(report.total, 3);
        assert_eq!(clipboard.text.as_deref(), Some(report.text.as_str()));
        assert_eq!(*browser.opened.borrow(), vec![format!("https://notion.so/{ID}")]);
    }

    #[test]
    fn test_export_requires_configuration() {
        let cases = parse_cases(sample_cases());
        let mut clipboard = MockClipboard::default();
        let browser = RecordingBrowser::default();

        let err = export_cases(&cases, &NotionConfig::default(), &mut clipboard, &browser).unwrap_err();
        assert!(err.to_string().contains("not configured"));
        assert!(clipboard.text.is_none());
        assert!(browser.opened.borrow().is_empty());
    }

    #[test]
    fn test_export_requires_cases() {
        let mut clipboard = MockClipboard::default();
        let browser = RecordingBrowser::default();
        let err = export_cases(&[], &configured(), &mut clipboard, &browser).unwrap_err();
        assert!(err.to_string().contains("No test cases"));
    }

    #[test]
    fn test_export_surfaces_browser_failure() {
        let cases = parse_cases(sample_cases());
        let mut clipboard = MockClipboard::default();
        let browser = RecordingBrowser { fail: true, ..Default::default() };

        assert!(export_cases(&cases, &configured(), &mut clipboard, &browser).is_err());
        // Text is already on the clipboard for a manual paste
        assert!(clipboard.text.is_some());
    }

    #[test]
    fn test_source_prefers_last_reply_over_clipboard() {
        let mut clipboard = MockClipboard::with_text("[CP-1] From clipboard");
        let source = resolve_export_source(None, Some("[CP-2] From reply"), &mut clipboard).unwrap().unwrap();
        assert_eq!(source.origin, ExportOrigin::LastReply);
    }

    #[test]
    fn test_reply_without_cases_falls_through_to_clipboard() {
        let mut clipboard = MockClipboard::with_text(sample_cases());
        let source = resolve_export_source(None, Some("Here is a summary of the document."), &mut clipboard)
            .unwrap()
            .unwrap();

        assert_eq!(source.origin, ExportOrigin::Clipboard);
        assert_eq!(parse_cases(&source.text).len(), 3);
    }

    #[test]
    fn test_reply_without_cases_and_empty_clipboard_is_none() {
        let mut clipboard = MockClipboard::default();
        let source = resolve_export_source(None, Some("Regression testing re-runs old tests."), &mut clipboard);
        assert!(source.unwrap().is_none());
    }

    #[test]
    fn test_sample_source() {
        let source = ExportSource::sample();
        assert_eq!(source.origin, ExportOrigin::Sample);
        assert_eq!(parse_cases(&source.text).len(), 3);
    }

    #[test]
    fn test_source_uses_clipboard_only_with_case_markers() {
        let mut clipboard = MockClipboard::with_text("shopping list");
        assert!(resolve_export_source(None, None, &mut clipboard).unwrap().is_none());

        let mut clipboard = MockClipboard::with_text("📄 Descripción\nalgo");
        let source = resolve_export_source(None, Some("   "), &mut clipboard).unwrap().unwrap();
        assert_eq!(source.origin, ExportOrigin::Clipboard);
    }

    #[test]
    fn test_source_clipboard_failure_is_none() {
        let mut clipboard = MockClipboard::with_failure();
        assert!(resolve_export_source(None, None, &mut clipboard).unwrap().is_none());
    }

    #[test]
    fn test_source_file_wins() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cases.txt");
        std::fs::write(&path, sample_cases()).unwrap();
        let mut clipboard = MockClipboard::default();

        let source = resolve_export_source(Some(&path), Some("reply"), &mut clipboard).unwrap().unwrap();
        assert_eq!(source.origin, ExportOrigin::File(path));
        assert_eq!(source.text, sample_cases());
    }
}
