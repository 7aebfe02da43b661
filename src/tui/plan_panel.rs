//! Plan tab: greedy day-by-day production schedule for the open orders.

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::Order;
use crate::services::{compute_plan, ProductionPlan};
use crate::tui::component::{Component, ComponentEvent};
use crate::tui::Theme;

/// Smallest capacity the +/- keys will go down to.
const MIN_CAPACITY: u32 = 100;
/// Step for the +/- capacity keys.
const CAPACITY_STEP: u32 = 100;

/// Plan tab state. Works from a snapshot of open orders; the parent
/// refreshes it when the order book changes.
pub struct PlanPanel {
    orders: Vec<Order>,
    daily_capacity: u32,
    plan: Option<ProductionPlan>,
    error: Option<String>,
}

impl PlanPanel {
    /// Creates the panel with the configured daily capacity.
    #[must_use]
    pub fn new(orders: Vec<Order>, daily_capacity: u32) -> Self {
        let mut panel = Self {
            orders,
            daily_capacity,
            plan: None,
            error: None,
        };
        panel.recompute();
        panel
    }

    /// Replaces the order snapshot and recomputes.
    pub fn set_orders(&mut self, orders: Vec<Order>) {
        self.orders = orders;
        self.recompute();
    }

    /// Latest computed plan.
    #[must_use]
    pub const fn plan(&self) -> Option<&ProductionPlan> {
        self.plan.as_ref()
    }

    fn recompute(&mut self) {
        self.plan = None;
        self.error = None;

        let refs: Vec<&Order> = self.orders.iter().collect();
        let start = Utc::now().date_naive();
        match compute_plan(&refs, self.daily_capacity, start) {
            Ok(plan) => self.plan = Some(plan),
            Err(e) => self.error = Some(e.to_string()),
        }
    }
}

impl Component for PlanPanel {
    type Event = ComponentEvent;

    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event> {
        match key.code {
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.daily_capacity = self.daily_capacity.saturating_add(CAPACITY_STEP);
                self.recompute();
            }
            KeyCode::Char('-') => {
                self.daily_capacity = self
                    .daily_capacity
                    .saturating_sub(CAPACITY_STEP)
                    .max(MIN_CAPACITY);
                self.recompute();
            }
            _ => {}
        }
        None
    }

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let late_count = self.plan.as_ref().map_or(0, |p| p.late_orders().len());
        let title = if late_count > 0 {
            format!(" Plan ({} pieces/day, {late_count} late) ", self.daily_capacity)
        } else {
            format!(" Plan ({} pieces/day) ", self.daily_capacity)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .title(title);
        let inner = block.inner(area);
        f.render_widget(block, area);

        if let Some(error) = &self.error {
            f.render_widget(
                Paragraph::new(Span::styled(error.clone(), Style::default().fg(theme.error))),
                inner,
            );
            return;
        }
        let Some(plan) = &self.plan else { return };

        if plan.days.is_empty() {
            f.render_widget(
                Paragraph::new(Span::styled(
                    "No open orders to plan. Confirm an order first.",
                    Style::default().fg(theme.text_muted),
                )),
                inner,
            );
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(inner);

        let mut day_lines = Vec::new();
        for day in &plan.days {
            day_lines.push(Line::from(vec![
                Span::styled(
                    day.date.to_string(),
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  slack {}", day.slack),
                    Style::default().fg(theme.text_muted),
                ),
            ]));
            for assignment in &day.assignments {
                day_lines.push(Line::from(Span::styled(
                    format!("  {:<20} {:>6} pcs", assignment.customer, assignment.pieces),
                    Style::default().fg(theme.text),
                )));
            }
        }
        f.render_widget(Paragraph::new(day_lines), chunks[0]);

        let mut forecast_lines = vec![Line::from(Span::styled(
            "Forecast",
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ))];
        for forecast in &plan.forecasts {
            let style = if forecast.late {
                Style::default().fg(theme.error)
            } else {
                Style::default().fg(theme.text)
            };
            let due = forecast
                .due_date
                .map_or_else(|| "-".to_string(), |d| d.to_string());
            let flag = if forecast.late { "  LATE" } else { "" };
            forecast_lines.push(Line::from(Span::styled(
                format!(
                    "{:<16} done {}  due {}{}",
                    forecast.customer, forecast.completion_date, due, flag
                ),
                style,
            )));
        }
        f.render_widget(Paragraph::new(forecast_lines), chunks[1]);
    }
}
