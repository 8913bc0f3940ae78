use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::render;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use unicode_width::UnicodeWidthChar;

/// Which characters an editor accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputKind {
    #[default]
    Text,
    /// Digits, a leading sign and a decimal point.
    Number,
    /// Digits and the separators date formats use: `2024-05-25`, `25/05/2024`,
    /// `25.05.2024 14:30`.
    Date,
}

impl InputKind {
    pub fn accepts(self, c: char) -> bool {
        match self {
            InputKind::Text => !c.is_control(),
            InputKind::Number => c.is_ascii_digit() || matches!(c, '-' | '+' | '.'),
            InputKind::Date => {
                c.is_ascii_digit() || matches!(c, '-' | '/' | '.' | ':' | ' ' | 'T')
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineEditAction {
    /// The event was not for the editor (Enter, Tab, Esc, arrows up/down, ...).
    Ignored,
    /// Consumed without touching the text.
    Moved,
    Changed,
}

/// Single-line text input with cursor movement and horizontal scrolling.
#[derive(Clone, Debug, Default)]
pub struct LineEdit {
    text: String,
    cursor: usize, // char index
    scroll_x: u32,
    kind: InputKind,
}

impl LineEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(kind: InputKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replaces the text and moves the cursor to its end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into().replace(['\r', '\n'], " ");
        self.cursor = self.text.chars().count();
        self.scroll_x = 0;
    }

    pub fn clear(&mut self) {
        self.set_text("");
    }

    pub fn input(&mut self, event: &InputEvent) -> LineEditAction {
        match event {
            InputEvent::Paste(s) => {
                let mut changed = false;
                for ch in s.chars() {
                    let ch = if ch == '\n' || ch == '\r' { ' ' } else { ch };
                    if self.kind.accepts(ch) {
                        self.insert_char(ch);
                        changed = true;
                    }
                }
                if changed {
                    LineEditAction::Changed
                } else {
                    LineEditAction::Moved
                }
            }
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Mouse(_) | InputEvent::FocusLost => LineEditAction::Ignored,
        }
    }

    /// Renders the text (or `placeholder` when empty) and, when `focused`, a block cursor.
    pub fn render(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        style: Style,
        placeholder: Option<(&str, Style)>,
        focused: bool,
    ) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        buf.set_style(area, style);
        self.ensure_cursor_visible(area.width);

        if self.text.is_empty() {
            if let Some((text, ph_style)) = placeholder {
                render::render_str_clipped(area.x, area.y, 0, area.width, buf, text, ph_style);
            }
        } else {
            render::render_str_clipped(
                area.x,
                area.y,
                self.scroll_x,
                area.width,
                buf,
                &self.text,
                style,
            );
        }

        if !focused {
            return;
        }
        if let Some(cell) = self
            .cursor_pos(area)
            .and_then(|(cx, cy)| buf.cell_mut((cx, cy)))
        {
            cell.set_style(style.add_modifier(Modifier::REVERSED));
        }
    }

    /// Screen position of the cursor inside `area`, if visible.
    pub fn cursor_pos(&self, area: Rect) -> Option<(u16, u16)> {
        if area.width == 0 || area.height == 0 {
            return None;
        }
        let x = self.cursor_display_x().saturating_sub(self.scroll_x);
        if x >= area.width as u32 {
            return None;
        }
        Some((area.x + x as u16, area.y))
    }

    fn handle_key(&mut self, key: &KeyEvent) -> LineEditAction {
        match key.code {
            KeyCode::Char(c) => {
                if key.modifiers.ctrl || key.modifiers.alt || !self.kind.accepts(c) {
                    return LineEditAction::Ignored;
                }
                self.insert_char(c);
                LineEditAction::Changed
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return LineEditAction::Moved;
                }
                let start = byte_index(&self.text, self.cursor - 1);
                let end = byte_index(&self.text, self.cursor);
                self.text.replace_range(start..end, "");
                self.cursor -= 1;
                LineEditAction::Changed
            }
            KeyCode::Delete => {
                if self.cursor >= self.char_len() {
                    return LineEditAction::Moved;
                }
                let start = byte_index(&self.text, self.cursor);
                let end = byte_index(&self.text, self.cursor + 1);
                self.text.replace_range(start..end, "");
                LineEditAction::Changed
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                LineEditAction::Moved
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.char_len());
                LineEditAction::Moved
            }
            KeyCode::Home => {
                self.cursor = 0;
                LineEditAction::Moved
            }
            KeyCode::End => {
                self.cursor = self.char_len();
                LineEditAction::Moved
            }
            _ => LineEditAction::Ignored,
        }
    }

    fn insert_char(&mut self, ch: char) {
        let idx = byte_index(&self.text, self.cursor);
        self.text.insert(idx, ch);
        self.cursor += 1;
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn cursor_display_x(&self) -> u32 {
        self.text
            .chars()
            .take(self.cursor)
            .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0) as u32)
            .sum()
    }

    fn ensure_cursor_visible(&mut self, width: u16) {
        let cx = self.cursor_display_x();
        let w = width.max(1) as u32;
        if cx < self.scroll_x {
            self.scroll_x = cx;
        } else if cx >= self.scroll_x + w {
            self.scroll_x = cx + 1 - w;
        }
    }
}

fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code))
    }

    #[test]
    fn inserts_and_moves_cursor() {
        let mut e = LineEdit::new();
        assert_eq!(e.input(&key(KeyCode::Char('a'))), LineEditAction::Changed);
        assert_eq!(e.input(&key(KeyCode::Left)), LineEditAction::Moved);
        e.input(&key(KeyCode::Char('b')));
        assert_eq!(e.text(), "ba");
        assert_eq!(e.cursor(), 1);
    }

    #[test]
    fn backspace_and_delete_respect_bounds() {
        let mut e = LineEdit::new();
        e.set_text("héllo");
        e.input(&key(KeyCode::Backspace));
        assert_eq!(e.text(), "héll");
        e.input(&key(KeyCode::Home));
        assert_eq!(e.input(&key(KeyCode::Backspace)), LineEditAction::Moved);
        e.input(&key(KeyCode::Right));
        e.input(&key(KeyCode::Delete));
        assert_eq!(e.text(), "hll");
    }

    #[test]
    fn number_kind_rejects_letters() {
        let mut e = LineEdit::with_kind(InputKind::Number);
        assert_eq!(e.input(&key(KeyCode::Char('x'))), LineEditAction::Ignored);
        e.input(&InputEvent::Paste("-1a2.5".into()));
        assert_eq!(e.text(), "-12.5");
    }

    #[test]
    fn date_kind_takes_format_separators() {
        let mut e = LineEdit::with_kind(InputKind::Date);
        e.input(&InputEvent::Paste("25/05/2024 14:30".into()));
        assert_eq!(e.text(), "25/05/2024 14:30");
        assert_eq!(e.input(&key(KeyCode::Char('x'))), LineEditAction::Ignored);
        e.set_text("");
        e.input(&InputEvent::Paste("25.05.2024".into()));
        assert_eq!(e.text(), "25.05.2024");
    }

    #[test]
    fn control_keys_are_left_to_the_owner() {
        let mut e = LineEdit::new();
        assert_eq!(e.input(&key(KeyCode::Enter)), LineEditAction::Ignored);
        assert_eq!(e.input(&key(KeyCode::Esc)), LineEditAction::Ignored);
        assert_eq!(e.input(&key(KeyCode::Down)), LineEditAction::Ignored);
    }

    #[test]
    fn renders_placeholder_when_empty() {
        let mut e = LineEdit::new();
        let area = Rect::new(0, 0, 8, 1);
        let mut buf = Buffer::empty(area);
        e.render(area, &mut buf, Style::default(), Some(("Search", Style::default())), false);
        assert_eq!(render::buffer_row_text(&buf, 0), "Search  ");
    }

    #[test]
    fn scrolls_to_keep_cursor_visible() {
        let mut e = LineEdit::new();
        e.set_text("abcdefghij");
        let area = Rect::new(0, 0, 4, 1);
        let mut buf = Buffer::empty(area);
        e.render(area, &mut buf, Style::default(), None, true);
        assert_eq!(render::buffer_row_text(&buf, 0), "hij ");
        assert_eq!(e.cursor_pos(area), Some((3, 0)));
    }
}
