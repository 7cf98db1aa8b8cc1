//! A remote button: glyph, label, keyboard shortcut, and the command it
//! sends.

use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use lgremote_core::Command;

use crate::theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Nerd Font icon.
    pub glyph: &'static str,
    pub label: &'static str,
    pub shortcut: KeyCode,
    pub command: Command,
}

impl Button {
    pub fn new(glyph: &'static str, label: &'static str, shortcut: KeyCode, command: Command) -> Self {
        Self {
            glyph,
            label,
            shortcut,
            command,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, flashing: bool) {
        let border = if flashing {
            theme::button_flash()
        } else {
            theme::button_border()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .style(if flashing {
                theme::button_flash()
            } else {
                Style::default()
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = vec![
            Line::from(Span::styled(self.glyph, theme::glyph(&self.command))),
            Line::from(Span::styled(self.label, theme::button_label())),
        ];
        // On short buttons the shortcut hint is dropped first.
        if inner.height >= 4 {
            lines.push(Line::from(Span::styled(
                shortcut_label(self.shortcut),
                theme::key_hint(),
            )));
        }

        let [text_area] = Layout::vertical([Constraint::Length(line_count(&lines))])
            .flex(Flex::Center)
            .areas(inner);
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), text_area);
    }
}

fn line_count(lines: &[Line<'_>]) -> u16 {
    u16::try_from(lines.len()).unwrap_or(u16::MAX)
}

/// How a shortcut is printed under its button.
pub fn shortcut_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "space".into(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Up => "↑".into(),
        KeyCode::Down => "↓".into(),
        KeyCode::Left => "←".into(),
        KeyCode::Right => "→".into(),
        KeyCode::Enter => "enter".into(),
        KeyCode::Backspace => "bksp".into(),
        other => other.to_string().to_lowercase(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn shortcut_labels() {
        assert_eq!(shortcut_label(KeyCode::Char('+')), "+");
        assert_eq!(shortcut_label(KeyCode::Char(' ')), "space");
        assert_eq!(shortcut_label(KeyCode::Up), "↑");
        assert_eq!(shortcut_label(KeyCode::Backspace), "bksp");
    }
}
