//! Orders tab: browse the order book and walk orders through their lifecycle.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::models::{Order, OrderStatus};
use crate::services::OrderStore;
use crate::tui::component::{Component, ComponentEvent};
use crate::tui::Theme;

/// Orders tab state. Owns the on-disk store; other panels work from
/// snapshots refreshed through `ComponentEvent::OrdersChanged`.
pub struct OrdersPanel {
    store: OrderStore,
    selected: usize,
}

impl OrdersPanel {
    /// Creates the panel around an open store.
    #[must_use]
    pub const fn new(store: OrderStore) -> Self {
        Self { store, selected: 0 }
    }

    /// Read access to the backing store.
    #[must_use]
    pub const fn store(&self) -> &OrderStore {
        &self.store
    }

    /// Orders eligible for production planning.
    #[must_use]
    pub fn open_orders(&self) -> Vec<Order> {
        self.store.open_orders().into_iter().cloned().collect()
    }

    fn selected_order(&self) -> Option<&Order> {
        self.store.list().get(self.selected)
    }

    fn clamp_selection(&mut self) {
        let len = self.store.list().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// The next step in the normal order lifecycle.
    const fn next_status(status: OrderStatus) -> Option<OrderStatus> {
        match status {
            OrderStatus::Draft => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::InProduction),
            OrderStatus::InProduction => Some(OrderStatus::Completed),
            OrderStatus::Completed => Some(OrderStatus::Shipped),
            OrderStatus::Shipped | OrderStatus::Cancelled => None,
        }
    }

    fn advance_selected(&mut self) -> Option<ComponentEvent> {
        let order = self.selected_order()?;
        let Some(next) = Self::next_status(order.status) else {
            return Some(ComponentEvent::Status(format!(
                "Order is already {}",
                order.status
            )));
        };
        let id = order.id;
        match self.store.set_status(id, next) {
            Ok(_) => Some(ComponentEvent::OrdersChanged),
            Err(e) => Some(ComponentEvent::Error(e.to_string())),
        }
    }

    fn cancel_selected(&mut self) -> Option<ComponentEvent> {
        let order = self.selected_order()?;
        let id = order.id;
        match self.store.set_status(id, OrderStatus::Cancelled) {
            Ok(_) => Some(ComponentEvent::OrdersChanged),
            Err(e) => Some(ComponentEvent::Error(e.to_string())),
        }
    }

    fn remove_selected(&mut self) -> Option<ComponentEvent> {
        let order = self.selected_order()?;
        let id = order.id;
        let event = match self.store.remove(id) {
            Ok(_) => ComponentEvent::OrdersChanged,
            Err(e) => ComponentEvent::Error(e.to_string()),
        };
        self.clamp_selection();
        Some(event)
    }

    fn status_style(status: OrderStatus, theme: &Theme) -> Style {
        let color = match status {
            OrderStatus::Draft => theme.text_muted,
            OrderStatus::Confirmed => theme.primary,
            OrderStatus::InProduction => theme.warning,
            OrderStatus::Completed | OrderStatus::Shipped => theme.success,
            OrderStatus::Cancelled => theme.error,
        };
        Style::default().fg(color)
    }
}

impl Component for OrdersPanel {
    type Event = ComponentEvent;

    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected += 1;
                self.clamp_selection();
                None
            }
            KeyCode::Char('s') => self.advance_selected(),
            KeyCode::Char('x') => self.cancel_selected(),
            KeyCode::Char('d') => self.remove_selected(),
            _ => None,
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let orders = self.store.list();
        let title = format!(" Orders ({}) ", orders.len());
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .title(title);

        if orders.is_empty() {
            let empty = List::new(vec![ListItem::new(Span::styled(
                "No orders. Add one with `opsdeck orders add`.",
                Style::default().fg(theme.text_muted),
            ))])
            .block(block);
            f.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = orders
            .iter()
            .map(|order| {
                let due = order
                    .due_date
                    .map_or_else(|| "-".to_string(), |d| d.to_string());
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<14}", order.status.to_string()),
                        Self::status_style(order.status, theme),
                    ),
                    Span::styled(
                        format!("{:<20}", order.customer),
                        Style::default().fg(theme.text),
                    ),
                    Span::styled(
                        format!("{:<18}", order.design),
                        Style::default().fg(theme.text_secondary),
                    ),
                    Span::styled(
                        format!("{:>4}x{:<4} {:>7} pcs  due {}", order.width, order.height, order.total_pieces(), due),
                        Style::default().fg(theme.text_secondary),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(theme.highlight_bg)
                    .add_modifier(Modifier::BOLD),
            )
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
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn panel_with_orders(dir: &TempDir, count: usize) -> OrdersPanel {
        let mut store = OrderStore::open(dir.path().join("orders.json")).unwrap();
        for i in 0..count {
            let order =
                Order::new(format!("Customer {i}"), "Harbor Blues", 10, 10, None).unwrap();
            store.add(order).unwrap();
        }
        OrdersPanel::new(store)
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let dir = TempDir::new().unwrap();
        let mut panel = panel_with_orders(&dir, 2);

        panel.handle_input(key(KeyCode::Down));
        panel.handle_input(key(KeyCode::Down));
        panel.handle_input(key(KeyCode::Down));
        assert_eq!(panel.selected, 1);

        panel.handle_input(key(KeyCode::Up));
        panel.handle_input(key(KeyCode::Up));
        assert_eq!(panel.selected, 0);
    }

    #[test]
    fn test_advance_walks_the_lifecycle() {
        let dir = TempDir::new().unwrap();
        let mut panel = panel_with_orders(&dir, 1);

        let event = panel.handle_input(key(KeyCode::Char('s')));
        assert!(matches!(event, Some(ComponentEvent::OrdersChanged)));
        assert_eq!(panel.store.list()[0].status, OrderStatus::Confirmed);

        panel.handle_input(key(KeyCode::Char('s')));
        assert_eq!(panel.store.list()[0].status, OrderStatus::InProduction);
    }

    #[test]
    fn test_advance_stops_at_shipped() {
        let dir = TempDir::new().unwrap();
        let mut panel = panel_with_orders(&dir, 1);
        for _ in 0..4 {
            panel.handle_input(key(KeyCode::Char('s')));
        }
        assert_eq!(panel.store.list()[0].status, OrderStatus::Shipped);

        let event = panel.handle_input(key(KeyCode::Char('s')));
        assert!(matches!(event, Some(ComponentEvent::Status(_))));
        assert_eq!(panel.store.list()[0].status, OrderStatus::Shipped);
    }

    #[test]
    fn test_cancel_and_remove() {
        let dir = TempDir::new().unwrap();
        let mut panel = panel_with_orders(&dir, 2);

        panel.handle_input(key(KeyCode::Char('x')));
        assert_eq!(panel.store.list()[0].status, OrderStatus::Cancelled);

        panel.handle_input(key(KeyCode::Char('d')));
        assert_eq!(panel.store.list().len(), 1);
        assert_eq!(panel.selected, 0);
    }
}
