use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

use super::app::{MessageType, StatusMessage};
use super::commands::HELP_LINES;
use super::layout::AppLayout;
use super::timestamps::{format_clock, format_timestamp};
use crate::models::{Attachment, Turn};

const MUTED: Color = Color::Rgb(113, 113, 122);
const BRIGHT: Color = Color::Rgb(250, 250, 250);
const EMERALD: Color = Color::Rgb(16, 185, 129);
const SKY: Color = Color::Rgb(56, 189, 248);
const RED: Color = Color::Rgb(239, 68, 68);
const BAR_BG: Color = Color::Rgb(24, 24, 27);

/// Everything the UI draws, borrowed from the app
pub struct RenderState<'a> {
    pub assistant_name: &'a str,
    pub ai_label: Option<&'a str>,
    pub session_start: &'a DateTime<Local>,
    pub turns: &'a [Turn],
    pub attachments: &'a [Attachment],
    pub input: &'a str,
    pub pending: bool,
    /// Lines scrolled up from the bottom of the conversation
    pub scroll: u16,
    pub show_help: bool,
    pub status_message: Option<&'a StatusMessage>,
}

/// Render the entire UI
pub fn render_ui(frame: &mut Frame, state: &RenderState) {
    let layout = AppLayout::new(frame.area(), state.attachments.len());

    render_conversation(frame, layout.conversation_area, state);
    if !state.attachments.is_empty() {
        render_attachments(frame, layout.attachments_area, state.attachments);
    }
    render_input(frame, layout.input_area, state);
    render_status_bar(frame, layout.status_area, state);

    if state.show_help {
        render_help(frame, layout.conversation_area);
    }
}

fn conversation_lines<'a>(state: &RenderState<'a>) -> Vec<Line<'a>> {
    let mut lines = Vec::new();

    if state.turns.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("Hello! I'm {}. Type a message or /help.", state.assistant_name),
            Style::default().fg(MUTED),
        )));
        return lines;
    }

    for (idx, turn) in state.turns.iter().enumerate() {
        let clock = format_clock(&turn.timestamp);
        lines.push(Line::from(vec![
            Span::styled("You ", Style::default().fg(SKY).add_modifier(Modifier::BOLD)),
            Span::styled(format!("[{}]", clock), Style::default().fg(MUTED)),
        ]));
        lines.extend(turn.user.lines().map(|l| Line::from(l.to_string())));

        let bot_header = Span::styled(
            format!("{} ", state.assistant_name),
            Style::default().fg(EMERALD).add_modifier(Modifier::BOLD),
        );
        if turn.is_answered() {
            lines.push(Line::from(vec![
                bot_header,
                Span::styled(format!("[{}]", turn.source_badge()), Style::default().fg(MUTED)),
            ]));
            lines.extend(turn.bot_text().lines().map(|l| Line::from(l.to_string())));
        } else if state.pending && idx + 1 == state.turns.len() {
            lines.push(Line::from(vec![
                bot_header,
                Span::styled("is typing...", Style::default().fg(MUTED).add_modifier(Modifier::ITALIC)),
            ]));
        }
        lines.push(Line::from(""));
    }

    lines
}

/// Rows `lines` occupy once word-wrapped to `width`
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines.iter().map(|line| wrapped_rows(line, width)).sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Words that do not fit move to the next row whole; a word wider than a
/// row is split across rows. Trailing spaces may hang past the edge.
fn wrapped_rows(line: &Line, width: usize) -> usize {
    let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
    let mut rows = 1;
    let mut used = 0;

    for chunk in text.split_inclusive(' ') {
        let word = chunk.trim_end_matches(' ');
        let visible = Span::raw(word).width();
        if used > 0 && used + visible > width {
            rows += 1;
            used = 0;
        }
        if used == 0 && visible > width {
            let extra = (visible - 1) / width;
            rows += extra;
            used = visible - extra * width;
        } else {
            used += visible;
        }
        used += chunk.len() - word.len();
    }

    rows
}

fn render_conversation(frame: &mut Frame, area: Rect, state: &RenderState) {
    let lines = conversation_lines(state);

    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);
    let overflow = wrapped_height(&lines, inner_width).saturating_sub(inner_height);
    let top = overflow.saturating_sub(state.scroll);

    let title = format!(
        " {} | started {} ",
        state.assistant_name,
        format_timestamp(state.session_start)
    );
    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(MUTED))
                .title(title),
        )
        .wrap(Wrap { trim: false })
        .scroll((top, 0));

    frame.render_widget(paragraph, area);
}

fn render_attachments(frame: &mut Frame, area: Rect, attachments: &[Attachment]) {
    let items: Vec<ListItem> = attachments
        .iter()
        .enumerate()
        .map(|(idx, attachment)| {
            ListItem::new(format!("{}. {}", idx + 1, attachment.display_label()))
                .style(Style::default().fg(BRIGHT))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(MUTED))
            .title(format!(" Attachments ({}) | /detach N | /clear-attachments ", attachments.len())),
    );

    frame.render_widget(list, area);
}

fn render_input(frame: &mut Frame, area: Rect, state: &RenderState) {
    let (title, style) = if state.pending {
        (" Waiting for reply... ", Style::default().fg(MUTED))
    } else {
        (" Message | Enter: send | /help ", Style::default().fg(BRIGHT))
    };

    // Keep the tail of long input visible
    let inner_width = usize::from(area.width.saturating_sub(2));
    let char_count = state.input.chars().count();
    let visible: String = if inner_width > 0 && char_count >= inner_width {
        state.input.chars().skip(char_count + 1 - inner_width).collect()
    } else {
        state.input.to_string()
    };
    let cursor_offset = visible.chars().count() as u16;

    let paragraph = Paragraph::new(visible).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if state.pending { MUTED } else { EMERALD }))
            .title(title),
    );
    frame.render_widget(paragraph, area);

    if !state.pending && area.width > 2 && area.height > 2 {
        frame.set_cursor_position((area.x + 1 + cursor_offset, area.y + 1));
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &RenderState) {
    let (status_text, style) = if let Some(message) = state.status_message {
        let fg = match message.message_type {
            MessageType::Success => EMERALD,
            MessageType::Error => RED,
        };
        (format!(" {} ", message.text), Style::default().fg(fg).bg(BAR_BG))
    } else {
        let mut parts = vec![];
        parts.push(match state.ai_label {
            Some(label) => format!("[{}]", label),
            None => "[LOCAL]".to_string(),
        });
        parts.push(format!("{} turns", state.turns.len()));
        if !state.attachments.is_empty() {
            parts.push(format!("{} attached", state.attachments.len()));
        }
        parts.push("Ctrl+S: save".to_string());
        parts.push("Ctrl+N: new".to_string());
        parts.push("Ctrl+Y: copy".to_string());
        parts.push("Ctrl+C: quit".to_string());

        (format!(" {} ", parts.join(" | ")), Style::default().fg(BRIGHT).bg(BAR_BG))
    };

    frame.render_widget(Paragraph::new(status_text).style(style), area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = HELP_LINES.iter().map(|l| Line::from(*l)).collect();
    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(EMERALD))
                .title(" Help "),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
