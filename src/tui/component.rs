//! Component trait pattern for TUI panels.
//!
//! Each dashboard tab is a self-contained component that handles its own
//! input and rendering, and signals the parent through events.

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::tui::Theme;

/// A component that can be rendered and handle input.
///
/// Components are self-contained UI elements that manage their own state,
/// handle keyboard input, and can emit events to communicate with the parent.
pub trait Component {
    /// Event type this component can emit
    type Event;

    /// Handle keyboard input.
    ///
    /// Returns `Some(Event)` if the component wants to signal something to the parent.
    /// Returns `None` if input was handled internally without needing parent action.
    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event>;

    /// Render the component within the provided area.
    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme);
}

/// Events emitted by dashboard panels and processed by `AppState`.
#[derive(Debug, Clone)]
pub enum ComponentEvent {
    /// Panel wants a transient status message shown in the status bar
    Status(String),

    /// Panel hit an error the user should see
    Error(String),

    /// The order list changed on disk and other panels should reload
    OrdersChanged,
}
