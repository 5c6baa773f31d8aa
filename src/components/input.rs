use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;

/// What a text input is meant to capture. Only `Amount` restricts keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Address,
    Amount,
}

/// Single-line editable text field with a cursor.
#[derive(Debug, Clone)]
pub struct TextInput {
    kind: InputKind,
    value: String,
    /// Cursor position in chars, not bytes.
    cursor: usize,
    placeholder: &'static str,
}

impl TextInput {
    pub fn new(kind: InputKind, placeholder: &'static str) -> Self {
        Self {
            kind,
            value: String::new(),
            cursor: 0,
            placeholder,
        }
    }

    pub fn text(placeholder: &'static str) -> Self {
        Self::new(InputKind::Text, placeholder)
    }

    pub fn address(placeholder: &'static str) -> Self {
        Self::new(InputKind::Address, placeholder)
    }

    pub fn amount(placeholder: &'static str) -> Self {
        Self::new(InputKind::Amount, placeholder)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replace the whole value, e.g. from a paste. Rejected if an amount
    /// field would stop looking like a number.
    pub fn set_value(&mut self, value: &str) -> bool {
        if !self.accepts(value) {
            return false;
        }
        self.value = value.to_string();
        self.cursor = self.value.chars().count();
        true
    }

    /// Apply an editing key. Returns true if the value changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                let mut next = self.value.clone();
                next.remove(self.byte_offset(self.cursor - 1));
                self.commit(next, self.cursor - 1)
            }
            KeyCode::Delete => {
                if self.cursor >= self.value.chars().count() {
                    return false;
                }
                let mut next = self.value.clone();
                next.remove(self.byte_offset(self.cursor));
                self.commit(next, self.cursor)
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.value.chars().count());
                false
            }
            KeyCode::Home => {
                self.cursor = 0;
                false
            }
            KeyCode::End => {
                self.cursor = self.value.chars().count();
                false
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.commit(String::new(), 0)
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let mut next = self.value.clone();
                next.insert(self.byte_offset(self.cursor), c);
                self.commit(next, self.cursor + 1)
            }
            _ => false,
        }
    }

    fn commit(&mut self, next: String, cursor: usize) -> bool {
        if next == self.value || !self.accepts(&next) {
            return false;
        }
        self.value = next;
        self.cursor = cursor;
        true
    }

    fn accepts(&self, candidate: &str) -> bool {
        match self.kind {
            InputKind::Amount => is_amount_text(candidate),
            InputKind::Text | InputKind::Address => true,
        }
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.value
            .char_indices()
            .nth(chars)
            .map_or(self.value.len(), |(i, _)| i)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, title: &str, focused: bool) {
        let border_style = if focused {
            THEME.border_focused_style()
        } else {
            THEME.border_style()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {title} "));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Amount fields keep room for the unit suffix
        let suffix = if self.kind == InputKind::Amount { " ETH" } else { "" };
        let width = (inner.width as usize).saturating_sub(Span::raw(suffix).width());
        let (start, cursor_col) = self.viewport(width);

        let mut spans = if self.is_empty() {
            vec![Span::styled(self.placeholder, THEME.muted_style())]
        } else {
            let style = match self.kind {
                InputKind::Address => THEME.address_style(),
                InputKind::Amount => THEME.eth_style(),
                InputKind::Text => THEME.text_style(),
            };
            let visible = fit_width(self.value.chars().skip(start), width);
            vec![Span::styled(visible, style)]
        };
        if !suffix.is_empty() {
            spans.push(Span::styled(suffix, THEME.muted_style()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), inner);

        if focused && cursor_col < width {
            frame.set_cursor_position((inner.x + cursor_col as u16, inner.y));
        }
    }

    /// First visible char and the cursor's display column for a field
    /// `width` columns wide. Scrolls just enough to keep the cursor in view.
    fn viewport(&self, width: usize) -> (usize, usize) {
        let chars: Vec<char> = self.value.chars().collect();
        let mut start = 0;
        let mut col: usize = chars[..self.cursor].iter().map(|c| char_width(*c)).sum();
        while col >= width && start < self.cursor {
            col -= char_width(chars[start]);
            start += 1;
        }
        (start, col)
    }
}

fn char_width(c: char) -> usize {
    Span::raw(c.to_string()).width()
}

/// Longest prefix of `chars` that fits in `width` columns.
fn fit_width(chars: impl Iterator<Item = char>, width: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for c in chars {
        let w = char_width(c);
        if used + w > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

/// Unsigned decimal in progress: digits with at most one dot, e.g. `1`, `.5`, `0.`.
pub fn is_amount_text(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_digit() || c == '.') && text.matches('.').count() <= 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(input: &mut TextInput, s: &str) {
        for c in s.chars() {
            input.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_typing_appends() {
        let mut input = TextInput::text("");
        type_str(&mut input, "hello");
        assert_eq!(input.value(), "hello");
    }

    #[test]
    fn test_backspace_and_cursor_moves() {
        let mut input = TextInput::text("");
        type_str(&mut input, "helo");
        input.handle_key(key(KeyCode::Left));
        type_str(&mut input, "l");
        assert_eq!(input.value(), "hello");
        input.handle_key(key(KeyCode::End));
        assert!(input.handle_key(key(KeyCode::Backspace)));
        assert_eq!(input.value(), "hell");
        input.handle_key(key(KeyCode::Home));
        assert!(!input.handle_key(key(KeyCode::Backspace)));
        assert!(input.handle_key(key(KeyCode::Delete)));
        assert_eq!(input.value(), "ell");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = TextInput::text("");
        type_str(&mut input, "héllo");
        input.handle_key(key(KeyCode::Home));
        input.handle_key(key(KeyCode::Right));
        input.handle_key(key(KeyCode::Delete));
        assert_eq!(input.value(), "hllo");
    }

    #[test]
    fn test_ctrl_u_clears() {
        let mut input = TextInput::address("");
        type_str(&mut input, "0xabc");
        assert!(input.handle_key(KeyEvent::new(
            KeyCode::Char('u'),
            KeyModifiers::CONTROL
        )));
        assert!(input.is_empty());
    }

    #[test]
    fn test_address_input_takes_any_text() {
        let mut input = TextInput::address("");
        type_str(&mut input, "not an address");
        assert_eq!(input.value(), "not an address");
    }

    #[test]
    fn test_amount_input_filters_keystrokes() {
        let mut input = TextInput::amount("");
        type_str(&mut input, "0.0a1.5");
        assert_eq!(input.value(), "0.015");
    }

    #[test]
    fn test_amount_set_value_rejects_garbage() {
        let mut input = TextInput::amount("");
        assert!(input.set_value("1.25"));
        assert!(!input.set_value("-3"));
        assert_eq!(input.value(), "1.25");
    }

    #[test]
    fn test_cursor_column_counts_display_width() {
        let mut input = TextInput::text("");
        type_str(&mut input, "日本");
        assert_eq!(input.viewport(20), (0, 4));
    }

    #[test]
    fn test_long_value_scrolls_to_keep_cursor_visible() {
        let mut input = TextInput::text("");
        type_str(&mut input, "abcdefghij");
        let (start, col) = input.viewport(4);
        assert_eq!((start, col), (7, 3));
        input.handle_key(key(KeyCode::Home));
        assert_eq!(input.viewport(4), (0, 0));
    }

    #[test]
    fn test_fit_width_stops_before_overflow() {
        assert_eq!(fit_width("ab日c".chars(), 3), "ab");
        assert_eq!(fit_width("abc".chars(), 5), "abc");
    }

    #[test]
    fn test_is_amount_text() {
        assert!(is_amount_text(""));
        assert!(is_amount_text(".5"));
        assert!(is_amount_text("10."));
        assert!(!is_amount_text("1..0"));
        assert!(!is_amount_text("1e18"));
    }
}
