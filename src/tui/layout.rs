use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Rows for the input box, borders included
const INPUT_HEIGHT: u16 = 3;
/// Attachment rows shown before the list is cut off
const MAX_ATTACHMENT_ROWS: u16 = 5;

/// Stacked chat layout
pub struct AppLayout {
    pub conversation_area: Rect,
    pub attachments_area: Rect,
    pub input_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Top to bottom:
    /// - Conversation: remaining rows
    /// - Attachments: one row per file plus borders, hidden when empty
    /// - Input box: 3 rows
    /// - Status bar: bottom row
    pub fn new(area: Rect, attachment_count: usize) -> Self {
        let attachments_height = if attachment_count == 0 {
            0
        } else {
            (attachment_count as u16).min(MAX_ATTACHMENT_ROWS) + 2
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(attachments_height),
                Constraint::Length(INPUT_HEIGHT),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            conversation_area: chunks[0],
            attachments_area: chunks[1],
            input_area: chunks[2],
            status_area: chunks[3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_without_attachments() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 30), 0);

        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.status_area.y, 29);
        assert_eq!(layout.input_area.height, 3);
        assert_eq!(layout.attachments_area.height, 0);
        assert_eq!(layout.conversation_area.height, 26);
    }

    #[test]
    fn test_layout_with_attachments() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 30), 2);

        assert_eq!(layout.attachments_area.height, 4);
        assert_eq!(layout.conversation_area.height, 22);
    }

    #[test]
    fn test_attachment_rows_are_capped() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 40), 50);
        assert_eq!(layout.attachments_area.height, MAX_ATTACHMENT_ROWS + 2);
    }
}
