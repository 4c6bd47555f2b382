//! Pure render functions for the console.
//!
//! Functions here take state by immutable reference and draw to a ratatui
//! frame. They never mutate state.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use rekl_core::Level;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::state::{ConsoleState, LogEntry};

/// Height of the bordered input box.
const INPUT_HEIGHT: u16 = 3;

/// Height of the status line below the input.
const STATUS_HEIGHT: u16 = 1;

const INPUT_LABEL: &str = "Input: ";

/// Snapshot of values shown in the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub speed: i32,
    pub pending: usize,
    pub engine: &'static str,
}

impl StatusLine {
    fn text(&self) -> String {
        format!(
            " {} WPM | {} queued | key: {}",
            self.speed, self.pending, self.engine
        )
    }
}

/// Renders the whole console.
pub fn render(state: &ConsoleState, status: &StatusLine, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    render_log(state, frame, chunks[0]);
    render_input(state, frame, chunks[1]);

    let status_line = Paragraph::new(status.text()).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status_line, chunks[2]);
}

fn render_log(state: &ConsoleState, frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" REKL ");
    let inner = block.inner(area);

    let rows = log_lines(state.log.entries(), usize::from(inner.width));
    // Follow the newest entry.
    let skip = rows.len().saturating_sub(usize::from(inner.height));
    let visible: Vec<Line<'static>> = rows.into_iter().skip(skip).collect();

    frame.render_widget(Paragraph::new(visible).block(block), area);
}

fn render_input(state: &ConsoleState, frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);

    let label_width = INPUT_LABEL.width();
    let available = usize::from(inner.width).saturating_sub(label_width + 1);
    let (visible, cursor_offset) =
        visible_input(state.input.text(), state.input.cursor(), available);

    let line = Line::from(vec![
        Span::styled(INPUT_LABEL, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(visible),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);

    let cursor_x = inner.x + u16::try_from(label_width + cursor_offset).unwrap_or(u16::MAX);
    if cursor_x < inner.x + inner.width {
        frame.set_cursor_position((cursor_x, inner.y));
    }
}

fn prefix_spans(entry: &LogEntry) -> Vec<Span<'static>> {
    let Some(stamp) = &entry.stamp else {
        return Vec::new();
    };
    match entry.level {
        Level::Info => vec![Span::styled(
            format!("{stamp} > "),
            Style::default().fg(Color::Green),
        )],
        Level::Error => vec![Span::styled(
            format!("{stamp} > Error: "),
            Style::default().fg(Color::Red),
        )],
    }
}

/// Lays out log entries as display rows of at most `width` columns.
pub fn log_lines(entries: &[LogEntry], width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for entry in entries {
        let prefix = prefix_spans(entry);
        let prefix_width: usize = prefix.iter().map(|s| s.content.width()).sum();

        for (idx, text_line) in entry.text.split('\n').enumerate() {
            if idx == 0 {
                let first_width = width.saturating_sub(prefix_width).max(1);
                let mut chunks = wrap(text_line, first_width).into_iter();
                let mut spans = prefix.clone();
                if let Some(first) = chunks.next() {
                    spans.push(Span::raw(first));
                }
                rows.push(Line::from(spans));
                rows.extend(chunks.map(Line::from));
            } else {
                rows.extend(wrap(text_line, width).into_iter().map(Line::from));
            }
        }
    }

    rows
}

/// Splits `text` into chunks no wider than `width` display columns.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if current_width + w > width && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_width = 0;
        }
        current.push(ch);
        current_width += w;
    }
    chunks.push(current);
    chunks
}

/// Returns the part of the input to show and the cursor's column within it,
/// scrolling horizontally so the cursor stays visible.
fn visible_input(text: &str, cursor: usize, available: usize) -> (String, usize) {
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());

    let mut start = 0;
    let mut before: usize = chars[..cursor].iter().map(|c| c.width().unwrap_or(0)).sum();
    while before > available && start < cursor {
        before -= chars[start].width().unwrap_or(0);
        start += 1;
    }

    let mut shown = String::new();
    let mut shown_width = 0;
    for &ch in &chars[start..] {
        let w = ch.width().unwrap_or(0);
        if shown_width + w > available + 1 {
            break;
        }
        shown.push(ch);
        shown_width += w;
    }
    (shown, before)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(level: Level, stamp: Option<&str>, text: &str) -> LogEntry {
        LogEntry {
            level,
            stamp: stamp.map(str::to_string),
            text: text.to_string(),
        }
    }

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_info_and_error_prefixes() {
        let rows = log_lines(
            &[
                entry(Level::Info, Some("12:00"), "Sending: CQ"),
                entry(Level::Error, Some("12:01"), "message number out of range"),
            ],
            80,
        );
        assert_eq!(plain(&rows[0]), "12:00 > Sending: CQ");
        assert_eq!(rows[0].spans[0].style.fg, Some(Color::Green));
        assert_eq!(
            plain(&rows[1]),
            "12:01 > Error: message number out of range"
        );
        assert_eq!(rows[1].spans[0].style.fg, Some(Color::Red));
    }

    #[test]
    fn test_banner_has_no_prefix() {
        let rows = log_lines(&[entry(Level::Info, None, "Welcome\nv1")], 80);
        assert_eq!(rows.len(), 2);
        assert_eq!(plain(&rows[0]), "Welcome");
        assert_eq!(plain(&rows[1]), "v1");
    }

    #[test]
    fn test_multiline_text_continues_without_prefix() {
        let rows = log_lines(&[entry(Level::Info, Some("09:30"), "\nSpeed: 18 WPM")], 80);
        assert_eq!(plain(&rows[0]), "09:30 > ");
        assert_eq!(plain(&rows[1]), "Speed: 18 WPM");
    }

    #[test]
    fn test_long_lines_wrap_to_width() {
        let rows = log_lines(&[entry(Level::Info, Some("09:30"), "ABCDEFGH")], 12);
        // "09:30 > " takes 8 columns, leaving 4 on the first row.
        assert_eq!(plain(&rows[0]), "09:30 > ABCD");
        assert_eq!(plain(&rows[1]), "EFGH");
    }

    #[test]
    fn test_wrap_empty_line() {
        assert_eq!(wrap("", 10), vec![String::new()]);
    }

    #[test]
    fn test_visible_input_scrolls_to_cursor() {
        assert_eq!(visible_input("CQ", 2, 10), ("CQ".to_string(), 2));
        let (shown, offset) = visible_input("ABCDEFGHIJ", 10, 4);
        assert_eq!(offset, 4);
        assert!(shown.starts_with("GHIJ"));
    }

    #[test]
    fn test_status_text() {
        let status = StatusLine {
            speed: 18,
            pending: 2,
            engine: "serial-dtr",
        };
        assert_eq!(status.text(), " 18 WPM | 2 queued | key: serial-dtr");
    }
}
