//! Distribution calculator panel.
//!
//! Lets the operator pick a design and grid size, then shows how the pieces
//! split across the design's colors as proportional colored bars.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::calc::{compute_distribution, parse_dimension};
use crate::models::{ColorDistribution, Design, PieceColor};
use crate::tui::component::{Component, ComponentEvent};
use crate::tui::Theme;

/// Which input field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Width,
    Height,
}

/// Calculator tab state.
pub struct CalculatorPanel {
    designs: Vec<Design>,
    selected_design: usize,
    width_input: String,
    height_input: String,
    focus: Field,
    result: Option<ColorDistribution>,
    error: Option<String>,
}

impl CalculatorPanel {
    /// Creates the panel with the stock design catalog.
    #[must_use]
    pub fn new() -> Self {
        let mut panel = Self {
            designs: Design::stock_catalog(),
            selected_design: 0,
            width_input: "10".to_string(),
            height_input: "10".to_string(),
            focus: Field::Width,
            result: None,
            error: None,
        };
        panel.recompute();
        panel
    }

    /// Currently selected design.
    #[must_use]
    pub fn design(&self) -> &Design {
        &self.designs[self.selected_design]
    }

    /// Latest computed distribution, if inputs are valid.
    #[must_use]
    pub const fn result(&self) -> Option<&ColorDistribution> {
        self.result.as_ref()
    }

    fn recompute(&mut self) {
        self.result = None;
        self.error = None;

        let width = match parse_dimension("Width", &self.width_input) {
            Ok(v) => v,
            Err(e) => {
                self.error = Some(e.to_string());
                return;
            }
        };
        let height = match parse_dimension("Height", &self.height_input) {
            Ok(v) => v,
            Err(e) => {
                self.error = Some(e.to_string());
                return;
            }
        };
        let Some(total) = width.checked_mul(height) else {
            self.error = Some("Grid is too large".to_string());
            return;
        };

        match compute_distribution(self.design().colors(), total) {
            Ok(distribution) => self.result = Some(distribution),
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    fn active_input_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Width => &mut self.width_input,
            Field::Height => &mut self.height_input,
        }
    }

    fn render_field(&self, label: &str, value: &str, focused: bool, theme: &Theme) -> Line<'_> {
        let value_style = if focused {
            Style::default()
                .fg(theme.active)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        let cursor = if focused { "_" } else { " " };
        Line::from(vec![
            Span::styled(format!("{label}: "), Style::default().fg(theme.text_secondary)),
            Span::styled(format!("{value}{cursor}"), value_style),
        ])
    }

    fn render_bars(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let Some(distribution) = &self.result else {
            return;
        };
        let max_count = distribution.max_count().max(1);
        let bar_width = area.width.saturating_sub(24);

        for (row, share) in distribution.distribution.iter().enumerate() {
            let y = area.y + row as u16;
            if y >= area.y + area.height {
                break;
            }
            let filled = bar_cells(share.count, max_count, bar_width);
            let line = Line::from(vec![
                Span::styled(
                    format!(" {} ", share.color.to_hex()),
                    Style::default()
                        .fg(label_color(share.color))
                        .bg(share.color.to_ratatui_color()),
                ),
                Span::raw(" "),
                Span::styled(
                    "█".repeat(filled as usize),
                    Style::default().fg(share.color.to_ratatui_color()),
                ),
                Span::styled(
                    "░".repeat(bar_width.saturating_sub(filled) as usize),
                    Style::default().fg(share.color.dim(35).to_ratatui_color()),
                ),
                Span::styled(
                    format!(" {:>6}", share.count),
                    Style::default().fg(theme.text),
                ),
            ]);
            f.render_widget(
                Paragraph::new(line),
                Rect::new(area.x, y, area.width, 1),
            );
        }
    }
}

/// Cells of a `bar_width`-wide bar filled for `count` out of `max_count`.
///
/// Widens to u64 so grids near the u32 piece limit cannot overflow the
/// intermediate product.
fn bar_cells(count: u32, max_count: u32, bar_width: u16) -> u16 {
    let filled = u64::from(count) * u64::from(bar_width) / u64::from(max_count.max(1));
    filled as u16
}

/// Label text color that stays readable on a swatch of the given color.
fn label_color(color: PieceColor) -> Color {
    if color.luma() > 140 {
        Color::Black
    } else {
        Color::White
    }
}

impl Default for CalculatorPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for CalculatorPanel {
    type Event = ComponentEvent;

    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event> {
        match key.code {
            KeyCode::Up | KeyCode::Down => {
                self.focus = match self.focus {
                    Field::Width => Field::Height,
                    Field::Height => Field::Width,
                };
            }
            KeyCode::Left => {
                self.selected_design = self
                    .selected_design
                    .checked_sub(1)
                    .unwrap_or(self.designs.len() - 1);
                self.recompute();
            }
            KeyCode::Right => {
                self.selected_design = (self.selected_design + 1) % self.designs.len();
                self.recompute();
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let input = self.active_input_mut();
                if input.len() < 6 {
                    input.push(c);
                }
                self.recompute();
            }
            KeyCode::Backspace => {
                self.active_input_mut().pop();
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
            .title(" Calculator ");
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // Inputs
                Constraint::Length(2), // Summary
                Constraint::Min(1),    // Bars
            ])
            .split(inner);

        let design = self.design();
        let header = vec![
            Line::from(vec![
                Span::styled("Design: ", Style::default().fg(theme.text_secondary)),
                Span::styled(
                    design.name.clone(),
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({} colors, \u{2190}/\u{2192} to change)", design.color_count()),
                    Style::default().fg(theme.text_muted),
                ),
            ]),
            self.render_field("Width ", &self.width_input, self.focus == Field::Width, theme),
            self.render_field("Height", &self.height_input, self.focus == Field::Height, theme),
        ];
        f.render_widget(Paragraph::new(header), chunks[0]);

        let summary = if let Some(error) = &self.error {
            Line::from(Span::styled(error.clone(), Style::default().fg(theme.error)))
        } else if let Some(d) = &self.result {
            let adjustment = if d.adjustment_count > 0 {
                format!(
                    ", {} color{} get {}",
                    d.adjustment_count,
                    if d.adjustment_count == 1 { "" } else { "s" },
                    d.adjustment_type
                )
            } else {
                String::new()
            };
            Line::from(Span::styled(
                format!(
                    "{} pieces over {} colors: {} each{}",
                    d.total_pieces, d.color_count, d.base_pieces_per_color, adjustment
                ),
                Style::default().fg(theme.text),
            ))
        } else {
            Line::from("")
        };
        f.render_widget(Paragraph::new(summary), chunks[1]);

        self.render_bars(f, chunks[2], theme);
    }
}
