//! Devices tab: connection health for the three floor controllers.
//!
//! Shows each device's link state, retry attempts, and next-retry countdown
//! from the shared reconnect state machine. The parent ticks the managers on
//! every poll cycle.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::config::DeviceConfig;
use crate::device::{
    CommandEnvelope, DeviceKind, DeviceManager, LinkState, PickPlaceCommand, RouterCommand,
    TcpJsonTransport, TylerCommand,
};
use crate::tui::component::{Component, ComponentEvent};
use crate::tui::Theme;

/// One managed device plus its display identity.
struct Entry {
    kind: DeviceKind,
    manager: DeviceManager<TcpJsonTransport>,
}

/// Devices tab state.
pub struct DevicesPanel {
    entries: Vec<Entry>,
    selected: usize,
}

impl DevicesPanel {
    /// Creates managers for every configured device.
    #[must_use]
    pub fn new(config: &DeviceConfig) -> Self {
        let policy = config.reconnect_policy();
        let entries = vec![
            Entry {
                kind: DeviceKind::PickPlace,
                manager: DeviceManager::new(
                    config.pick_place_url.clone(),
                    policy,
                    TcpJsonTransport::default(),
                ),
            },
            Entry {
                kind: DeviceKind::PaintRobot,
                manager: DeviceManager::new(
                    config.paint_robot_url.clone(),
                    policy,
                    TcpJsonTransport::default(),
                ),
            },
            Entry {
                kind: DeviceKind::Router,
                manager: DeviceManager::new(
                    config.router_url.clone(),
                    policy,
                    TcpJsonTransport::default(),
                ),
            },
        ];
        Self {
            entries,
            selected: 0,
        }
    }

    /// Advances every device link. Called from the main poll loop.
    pub fn tick(&mut self, now: Instant) {
        for entry in &mut self.entries {
            entry.manager.tick(now);
        }
    }

    /// Shuts all links down, for app exit.
    pub fn shutdown(&mut self) {
        for entry in &mut self.entries {
            entry.manager.shutdown();
        }
    }

    /// A safe command to exercise the selected device's channel.
    const fn idle_command(kind: DeviceKind) -> CommandEnvelope {
        match kind {
            DeviceKind::PickPlace => CommandEnvelope::PickPlace(PickPlaceCommand::Home),
            DeviceKind::PaintRobot => CommandEnvelope::PaintRobot(TylerCommand::Prime),
            DeviceKind::Router => CommandEnvelope::Router(RouterCommand::Arm),
        }
    }

    fn state_span(entry: &Entry, now: Instant, theme: &Theme) -> Span<'static> {
        match entry.manager.state() {
            LinkState::Connected => {
                Span::styled("connected", Style::default().fg(theme.success))
            }
            LinkState::Connecting => {
                Span::styled("connecting...", Style::default().fg(theme.warning))
            }
            LinkState::RetryWait => {
                let countdown = entry
                    .manager
                    .link()
                    .retry_in(now)
                    .map_or_else(|| "now".to_string(), |d| format!("{:.1}s", d.as_secs_f32()));
                Span::styled(
                    format!(
                        "retry in {countdown} (attempt {})",
                        entry.manager.link().failed_attempts()
                    ),
                    Style::default().fg(theme.warning),
                )
            }
            LinkState::Disconnected => {
                Span::styled("disconnected", Style::default().fg(theme.inactive))
            }
        }
    }
}

impl Component for DevicesPanel {
    type Event = ComponentEvent;

    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event> {
        let now = Instant::now();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(self.entries.len() - 1);
                None
            }
            KeyCode::Enter | KeyCode::Char('c') => {
                let entry = &mut self.entries[self.selected];
                entry.manager.connect(now);
                Some(ComponentEvent::Status(format!(
                    "Connecting to {}...",
                    entry.kind
                )))
            }
            KeyCode::Char('x') => {
                let entry = &mut self.entries[self.selected];
                entry.manager.shutdown();
                Some(ComponentEvent::Status(format!(
                    "Disconnected {}",
                    entry.kind
                )))
            }
            KeyCode::Char('h') => {
                let entry = &mut self.entries[self.selected];
                let command = Self::idle_command(entry.kind);
                match entry.manager.send_command(command, now) {
                    Ok(()) => Some(ComponentEvent::Status(format!(
                        "Queued idle command for {}",
                        entry.kind
                    ))),
                    Err(e) => Some(ComponentEvent::Error(e.to_string())),
                }
            }
            _ => None,
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let now = Instant::now();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .title(" Devices ");

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| {
                let mut spans = vec![
                    Span::styled(
                        format!("{:<14}", entry.kind.to_string()),
                        Style::default()
                            .fg(theme.text)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("{:<36}", entry.manager.url()),
                        Style::default().fg(theme.text_muted),
                    ),
                    Self::state_span(entry, now, theme),
                ];
                if entry.manager.pending_commands() > 0 {
                    spans.push(Span::styled(
                        format!("  ({} queued)", entry.manager.pending_commands()),
                        Style::default().fg(theme.text_secondary),
                    ));
                }
                if let Some(message) = entry.manager.last_message() {
                    spans.push(Span::styled(
                        format!("  last: {message}"),
                        Style::default().fg(theme.text_secondary),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(theme.highlight_bg))
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        f.render_stateful_widget(list, area, &mut state);
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
    fn test_panel_starts_disconnected() {
        let panel = DevicesPanel::new(&DeviceConfig::default());
        assert_eq!(panel.entries.len(), 3);
        for entry in &panel.entries {
            assert_eq!(entry.manager.state(), LinkState::Disconnected);
        }
    }

    #[test]
    fn test_selection_bounds() {
        let mut panel = DevicesPanel::new(&DeviceConfig::default());
        for _ in 0..5 {
            panel.handle_input(key(KeyCode::Down));
        }
        assert_eq!(panel.selected, 2);
        for _ in 0..5 {
            panel.handle_input(key(KeyCode::Up));
        }
        assert_eq!(panel.selected, 0);
    }

    #[test]
    fn test_idle_command_queues_while_down() {
        let mut panel = DevicesPanel::new(&DeviceConfig::default());
        let event = panel.handle_input(key(KeyCode::Char('h')));
        assert!(matches!(event, Some(ComponentEvent::Status(_))));
        assert_eq!(panel.entries[0].manager.pending_commands(), 1);
    }
}
