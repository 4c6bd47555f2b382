//! Single-line input field and key mapping.
//!
//! Keys go to the dispatch chain first (as [`KeyInput`]); only keys the chain
//! passes through reach [`InputLine::input`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rekl_core::KeyInput;

/// Maps a crossterm key to the terminal-independent key the chain sees.
pub fn map_key(key: &KeyEvent) -> KeyInput {
    match key.code {
        KeyCode::Up => KeyInput::Up,
        KeyCode::Down => KeyInput::Down,
        KeyCode::Esc => KeyInput::Cancel,
        KeyCode::Enter => KeyInput::Submit,
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            KeyInput::Char(ch)
        }
        _ => KeyInput::Other,
    }
}

/// Returns true for Ctrl+C, which quits without going through the chain.
pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c' | 'C'))
}

/// Text buffer for the input line, with a cursor in char units.
#[derive(Debug, Clone, Default)]
pub struct InputLine {
    text: String,
    cursor: usize,
}

impl InputLine {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Inserts text at the cursor. Line breaks and other control characters
    /// become spaces so a paste stays on one line.
    pub fn insert_str(&mut self, text: &str) {
        let cleaned: String = text
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        let idx = self.byte_index(self.cursor);
        self.text.insert_str(idx, &cleaned);
        self.cursor += cleaned.chars().count();
    }

    pub fn insert_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut buf));
    }

    /// Backspace.
    pub fn delete_prev_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        self.remove_at(self.cursor);
    }

    /// Delete.
    pub fn delete_next_char(&mut self) {
        if self.cursor < self.len() {
            self.remove_at(self.cursor);
        }
    }

    /// Handles a passthrough key.
    pub fn input(&mut self, key: &KeyEvent) {
        if matches!(key.kind, KeyEventKind::Release) {
            return;
        }

        match key.code {
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert_char(ch);
            }
            KeyCode::Backspace => self.delete_prev_char(),
            KeyCode::Delete => self.delete_next_char(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => self.clear(),
            _ => {}
        }
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn remove_at(&mut self, col: usize) {
        let start = self.byte_index(col);
        let end = self.byte_index(col + 1);
        self.text.replace_range(start..end, "");
    }

    fn byte_index(&self, col: usize) -> usize {
        self.text
            .char_indices()
            .nth(col)
            .map_or(self.text.len(), |(idx, _)| idx)
    }
}
