//! Status bar widget for displaying status messages and contextual help.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{AppState, Tab, Theme};

/// Status bar widget.
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar with contextual help.
    pub fn render(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
        let mut lines: Vec<Line> = Vec::new();

        // First line: error, status message, or nothing
        if let Some(error) = &state.error_message {
            lines.push(Line::from(vec![
                Span::styled(
                    "ERROR: ",
                    Style::default()
                        .fg(theme.error)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(error.clone(), Style::default().fg(theme.error)),
            ]));
        } else if !state.status_message.is_empty() {
            lines.push(Line::from(Span::styled(
                state.status_message.clone(),
                Style::default().fg(theme.text),
            )));
        } else {
            lines.push(Line::from(""));
        }

        // Second line: tab-specific hints
        lines.push(Line::from(Span::styled(
            Self::tab_hints(state.active_tab),
            Style::default().fg(theme.text_muted),
        )));

        // Third line: global navigation
        lines.push(Line::from(Span::styled(
            "Tab/Shift+Tab: switch tab | q: quit",
            Style::default().fg(theme.text_muted),
        )));

        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.primary)),
        );
        f.render_widget(widget, area);
    }

    /// Keyboard hints for the active tab.
    const fn tab_hints(tab: Tab) -> &'static str {
        match tab {
            Tab::Orders => "\u{2191}/\u{2193}: select | s: advance status | x: cancel | d: delete",
            Tab::Calculator => {
                "\u{2190}/\u{2192}: design | \u{2191}/\u{2193}: width/height | digits: edit | Backspace: erase"
            }
            Tab::Setup => "digits: edit piece count | Backspace: erase",
            Tab::Plan => "+/-: adjust daily capacity",
            Tab::Devices => "\u{2191}/\u{2193}: select | Enter: connect | x: disconnect | h: idle command",
        }
    }
}
