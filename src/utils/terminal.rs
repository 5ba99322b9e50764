//! Sanitizing model output before it reaches the terminal.
//!
//! Replies come from a remote model and attachments from arbitrary files, so
//! escape sequences are removed before anything is drawn or printed.

use std::sync::LazyLock;

use regex::Regex;

static ESCAPE_SEQUENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\x1b\[[0-9;?]*[A-Za-z]",  // CSI
        r"|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)", // OSC terminated by BEL or ST
        r"|\x1b[@-Z\\-_]",           // Fe
    ))
    .expect("Invalid escape sequence regex")
});

/// Strip terminal escape sequences and control characters.
///
/// Tabs and newlines survive. Carriage returns are dropped since ratatui treats
/// them as zero-width garbage.
///
/// ```
/// use qa_assistant::utils::sanitize_for_terminal;
///
/// assert_eq!(sanitize_for_terminal("\x1b[31mRed\x1b[0m text"), "Red text");
/// ```
pub fn sanitize_for_terminal(text: &str) -> String {
    ESCAPE_SEQUENCE
        .replace_all(text, "")
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}
