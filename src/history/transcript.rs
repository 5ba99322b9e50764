use crate::models::Session;

const RULE_WIDTH: usize = 50;

/// Plain-text export of one session
pub fn render_transcript(session: &Session, title: &str) -> String {
    let mut out = format!(
        "{}\nDate: {}\nTotal messages: {}\n{}\n\n",
        title,
        session.start.format("%Y-%m-%d %H:%M:%S"),
        session.turns.len(),
        "=".repeat(RULE_WIDTH)
    );

    for turn in &session.turns {
        let time = turn.timestamp.format("%H:%M:%S");
        out.push_str(&format!("[{}] User: {}\n", time, turn.user));
        if turn.is_answered() {
            out.push_str(&format!("[{}] Bot [{}]: {}\n", time, turn.source_badge(), turn.bot_text()));
        }
        out.push('\n');
    }

    out
}
