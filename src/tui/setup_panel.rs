//! Setup tab: sheet, box, and carton math for a piece total.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::calc::{compute_setup, SetupParams, SetupPlan};
use crate::tui::component::{Component, ComponentEvent};
use crate::tui::Theme;

/// Setup tab state.
pub struct SetupPanel {
    params: SetupParams,
    pieces_input: String,
    result: Option<SetupPlan>,
    error: Option<String>,
}

impl SetupPanel {
    /// Creates the panel with the shop's configured constants.
    #[must_use]
    pub fn new(params: SetupParams) -> Self {
        let mut panel = Self {
            params,
            pieces_input: "100".to_string(),
            result: None,
            error: None,
        };
        panel.recompute();
        panel
    }

    /// Latest computed plan, if the input is valid.
    #[must_use]
    pub const fn result(&self) -> Option<&SetupPlan> {
        self.result.as_ref()
    }

    fn recompute(&mut self) {
        self.result = None;
        self.error = None;

        let pieces: u32 = match self.pieces_input.parse() {
            Ok(v) => v,
            Err(_) => {
                self.error = Some(format!(
                    "'{}' is not a valid piece count",
                    self.pieces_input
                ));
                return;
            }
        };

        match compute_setup(pieces, &self.params) {
            Ok(plan) => self.result = Some(plan),
            Err(e) => self.error = Some(e.to_string()),
        }
    }
}

impl Component for SetupPanel {
    type Event = ComponentEvent;

    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event> {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if self.pieces_input.len() < 9 {
                    self.pieces_input.push(c);
                }
                self.recompute();
            }
            KeyCode::Backspace => {
                self.pieces_input.pop();
                self.recompute();
            }
            _ => {}
        }
        None
    }

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .title(" Setup ");
        let inner = block.inner(area);
        f.render_widget(block, area);

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Pieces: ", Style::default().fg(theme.text_secondary)),
                Span::styled(
                    format!("{}_", self.pieces_input),
                    Style::default()
                        .fg(theme.active)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
        ];

        if let Some(error) = &self.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(theme.error),
            )));
        } else if let Some(plan) = &self.result {
            lines.push(Line::from(vec![
                Span::styled("Sheets:  ", Style::default().fg(theme.text_secondary)),
                Span::styled(
                    format!("{:>6}", plan.sheets),
                    Style::default().fg(theme.text),
                ),
                Span::styled(
                    format!(
                        "   ({} pieces/sheet, {} left on last sheet)",
                        self.params.pieces_per_sheet, plan.last_sheet_leftover
                    ),
                    Style::default().fg(theme.text_muted),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Boxes:   ", Style::default().fg(theme.text_secondary)),
                Span::styled(
                    format!("{:>6}", plan.boxes),
                    Style::default().fg(theme.text),
                ),
                Span::styled(
                    format!(
                        "   ({} pieces/box, {} open slots in last box)",
                        self.params.pieces_per_box, plan.last_box_slack
                    ),
                    Style::default().fg(theme.text_muted),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Cartons: ", Style::default().fg(theme.text_secondary)),
                Span::styled(
                    format!("{:>6}", plan.cartons),
                    Style::default().fg(theme.text),
                ),
                Span::styled(
                    format!("   ({} boxes/carton)", self.params.boxes_per_carton),
                    Style::default().fg(theme.text_muted),
                ),
            ]));
        }

        f.render_widget(Paragraph::new(lines), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_input_computes() {
        let panel = SetupPanel::new(SetupParams::default());
        let plan = panel.result().expect("100 pieces is valid");
        assert_eq!(plan.total_pieces, 100);
        assert_eq!(plan.boxes, 1);
    }

    #[test]
    fn test_editing_recomputes() {
        let mut panel = SetupPanel::new(SetupParams::default());
        panel.handle_input(key(KeyCode::Char('0')));
        let plan = panel.result().expect("1000 pieces is valid");
        assert_eq!(plan.total_pieces, 1000);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let mut panel = SetupPanel::new(SetupParams::default());
        for _ in 0..3 {
            panel.handle_input(key(KeyCode::Backspace));
        }
        assert!(panel.result().is_none());
        assert!(panel.error.is_some());
    }
}
