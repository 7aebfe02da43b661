//! Terminal user interface components and state management.
//!
//! This module contains the main TUI loop, `AppState`, event handling,
//! and all dashboard tabs using Ratatui.

pub mod calculator;
pub mod component;
pub mod devices_panel;
pub mod orders_panel;
pub mod plan_panel;
pub mod setup_panel;
pub mod status_bar;
pub mod theme;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout as RatatuiLayout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::constants::APP_NAME;
use crate::services::OrderStore;

pub use calculator::CalculatorPanel;
pub use component::{Component, ComponentEvent};
pub use devices_panel::DevicesPanel;
pub use orders_panel::OrdersPanel;
pub use plan_panel::PlanPanel;
pub use setup_panel::SetupPanel;
pub use status_bar::StatusBar;
pub use theme::Theme;

/// Dashboard tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Order book
    Orders,
    /// Color distribution calculator
    Calculator,
    /// Sheet/box/carton setup math
    Setup,
    /// Production plan
    Plan,
    /// Device connection health
    Devices,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Self; 5] = [
        Self::Orders,
        Self::Calculator,
        Self::Setup,
        Self::Plan,
        Self::Devices,
    ];

    /// Tab title for the tab bar.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Orders => "Orders",
            Self::Calculator => "Calculator",
            Self::Setup => "Setup",
            Self::Plan => "Plan",
            Self::Devices => "Devices",
        }
    }

    /// Index in `ALL`.
    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    /// Next tab, wrapping.
    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous tab, wrapping.
    #[must_use]
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Top-level application state for the dashboard.
pub struct AppState {
    /// Loaded configuration
    pub config: Config,
    /// Resolved theme, refreshed each frame from `config.ui.theme_mode`
    pub theme: Theme,
    /// Active tab
    pub active_tab: Tab,
    /// Orders tab
    pub orders_panel: OrdersPanel,
    /// Calculator tab
    pub calculator_panel: CalculatorPanel,
    /// Setup tab
    pub setup_panel: SetupPanel,
    /// Plan tab
    pub plan_panel: PlanPanel,
    /// Devices tab
    pub devices_panel: DevicesPanel,
    /// Transient status message shown in the status bar
    pub status_message: String,
    /// Error shown as an overlay until dismissed
    pub error_message: Option<String>,
    /// Set when the user asks to quit
    pub should_quit: bool,
}

impl AppState {
    /// Builds the dashboard state from configuration, opening the order store.
    ///
    /// # Errors
    ///
    /// Returns an error if the order store cannot be opened.
    pub fn new(config: Config) -> Result<Self> {
        let orders_path = config.orders_file_path()?;
        let store = OrderStore::open(orders_path).context("Failed to open order store")?;
        let orders_panel = OrdersPanel::new(store);
        let plan_panel = PlanPanel::new(orders_panel.open_orders(), config.shop.daily_capacity);
        let setup_panel = SetupPanel::new(config.shop.setup);
        let devices_panel = DevicesPanel::new(&config.devices);
        let theme = Theme::from_mode(config.ui.theme_mode);

        let status_message = if config.ui.show_help_on_startup {
            "Welcome to Opsdeck. Tab switches views, q quits.".to_string()
        } else {
            String::new()
        };

        Ok(Self {
            config,
            theme,
            active_tab: Tab::Orders,
            orders_panel,
            calculator_panel: CalculatorPanel::new(),
            setup_panel,
            plan_panel,
            devices_panel,
            status_message,
            error_message: None,
            should_quit: false,
        })
    }

    /// Applies an event emitted by the active panel.
    pub fn apply_event(&mut self, event: ComponentEvent) {
        match event {
            ComponentEvent::Status(message) => {
                self.status_message = message;
            }
            ComponentEvent::Error(message) => {
                self.error_message = Some(message);
            }
            ComponentEvent::OrdersChanged => {
                self.status_message = "Order book updated".to_string();
                self.plan_panel.set_orders(self.orders_panel.open_orders());
            }
        }
    }

    /// Routes a key press to the right place.
    pub fn handle_key(&mut self, key: KeyEvent) {
        // An error overlay swallows the next key press
        if self.error_message.is_some() {
            self.error_message = None;
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                self.active_tab = self.active_tab.next();
                self.status_message.clear();
                return;
            }
            KeyCode::BackTab => {
                self.active_tab = self.active_tab.previous();
                self.status_message.clear();
                return;
            }
            _ => {}
        }

        let event = match self.active_tab {
            Tab::Orders => self.orders_panel.handle_input(key),
            Tab::Calculator => self.calculator_panel.handle_input(key),
            Tab::Setup => self.setup_panel.handle_input(key),
            Tab::Plan => self.plan_panel.handle_input(key),
            Tab::Devices => self.devices_panel.handle_input(key),
        };
        if let Some(event) = event {
            self.apply_event(event);
        }
    }
}

/// Initialize terminal for TUI
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore terminal to normal state
pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main event loop
pub fn run_tui(
    state: &mut AppState,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        // Apply theme based on user preference (Auto detects OS, Dark/Light are explicit)
        state.theme = Theme::from_mode(state.config.ui.theme_mode);

        terminal.draw(|f| render(f, state))?;

        // Poll for events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => state.handle_key(key),
                Event::Resize(_, _) => {
                    // Terminal resized, will re-render on next loop
                }
                _ => {}
            }
        }

        // Advance device links (retries, heartbeats, inbound frames)
        state.devices_panel.tick(Instant::now());

        if state.should_quit {
            state.devices_panel.shutdown();
            break;
        }
    }

    Ok(())
}

/// Render the UI from current state
fn render(f: &mut Frame, state: &AppState) {
    // Fill entire screen with theme background color first
    let full_bg = Block::default().style(Style::default().bg(state.theme.background));
    f.render_widget(full_bg, f.area());

    let chunks = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(10),   // Main content
            Constraint::Length(5), // Status bar
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], state);

    match state.active_tab {
        Tab::Orders => state.orders_panel.render(f, chunks[1], &state.theme),
        Tab::Calculator => state.calculator_panel.render(f, chunks[1], &state.theme),
        Tab::Setup => state.setup_panel.render(f, chunks[1], &state.theme),
        Tab::Plan => state.plan_panel.render(f, chunks[1], &state.theme),
        Tab::Devices => state.devices_panel.render(f, chunks[1], &state.theme),
    }

    StatusBar::render(f, chunks[2], state, &state.theme);

    if let Some(error) = &state.error_message {
        render_error_overlay(f, error, &state.theme);
    }
}

/// Render the tab bar with the app title.
fn render_tab_bar(f: &mut Frame, area: Rect, state: &AppState) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| Line::from(tab.title()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(state.active_tab.index())
        .style(Style::default().fg(state.theme.text_secondary))
        .highlight_style(
            Style::default()
                .fg(state.theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(state.theme.primary))
                .title(format!(" {APP_NAME} ")),
        );
    f.render_widget(tabs, area);
}

/// Render an error message overlay on top of everything else.
fn render_error_overlay(f: &mut Frame, error: &str, theme: &Theme) {
    let area = centered_rect(60, 30, f.area());
    f.render_widget(Clear, area);

    let paragraph = Paragraph::new(vec![
        Line::from(Span::styled(error, Style::default().fg(theme.text))),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to dismiss",
            Style::default().fg(theme.text_muted),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.error))
            .title(" Error "),
    )
    .style(Style::default().bg(theme.surface));
    f.render_widget(paragraph, area);
}

/// Helper to create a centered rect using a percentage of the available area.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    RatatuiLayout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_state(dir: &TempDir) -> AppState {
        let mut config = Config::default();
        config.paths.data_dir = Some(dir.path().to_path_buf());
        AppState::new(config).unwrap()
    }

    #[test]
    fn test_tab_cycling_wraps() {
        assert_eq!(Tab::Orders.next(), Tab::Calculator);
        assert_eq!(Tab::Devices.next(), Tab::Orders);
        assert_eq!(Tab::Orders.previous(), Tab::Devices);
    }

    #[test]
    fn test_quit_key() {
        let dir = TempDir::new().unwrap();
        let mut state = test_state(&dir);
        state.handle_key(key(KeyCode::Char('q')));
        assert!(state.should_quit);
    }

    #[test]
    fn test_tab_key_switches_view() {
        let dir = TempDir::new().unwrap();
        let mut state = test_state(&dir);
        state.handle_key(key(KeyCode::Tab));
        assert_eq!(state.active_tab, Tab::Calculator);
        state.handle_key(key(KeyCode::BackTab));
        assert_eq!(state.active_tab, Tab::Orders);
    }

    #[test]
    fn test_error_overlay_swallows_next_key() {
        let dir = TempDir::new().unwrap();
        let mut state = test_state(&dir);
        state.apply_event(ComponentEvent::Error("boom".to_string()));
        assert!(state.error_message.is_some());

        // First key dismisses the error instead of quitting
        state.handle_key(key(KeyCode::Char('q')));
        assert!(state.error_message.is_none());
        assert!(!state.should_quit);
    }

    #[test]
    fn test_orders_change_refreshes_plan() {
        let dir = TempDir::new().unwrap();
        let mut state = test_state(&dir);
        assert!(state.plan_panel.plan().unwrap().days.is_empty());
        state.apply_event(ComponentEvent::OrdersChanged);
        assert_eq!(state.status_message, "Order book updated");
    }
}
