//! Peer list panel (left column).
//!
//! Shows every peer the engine knows about, with its connection status.
//! The selected peer can be expanded into a detail view showing the raw
//! engine record plus the available action.
//!
//! ```text
//! +-- Peers --------+
//! | * ACINQ         |  <- * = connected, selected (highlighted)
//! |   031f8a...     |  <- no *, disconnected
//! +-- Peer detail --+
//! | {               |
//! |   "pubkey": ... |
//! | d: disconnect   |
//! +-----------------+
//! ```

use crate::app::{App, FocusedPanel};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

/// Renders the peer list panel (and the detail view when expanded).
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let show_detail = app.peer_detail && app.selected_peer_info().is_some();

    let (list_area, detail_area) = if show_detail {
        let halves = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        (halves[0], Some(halves[1]))
    } else {
        (area, None)
    };

    render_list(frame, app, list_area);
    if let Some(detail_area) = detail_area {
        render_detail(frame, app, detail_area);
    }
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focused == FocusedPanel::PeerList;

    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .title(" Peers ")
        .borders(Borders::ALL)
        .border_style(border_style);

    if app.peers.is_empty() {
        let empty_msg = Paragraph::new("No peers")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty_msg, area);
        return;
    }

    let items: Vec<ListItem> = app
        .peers
        .iter()
        .map(|peer| {
            // Connection indicator: green * for connected, dim - otherwise
            let (indicator, indicator_color) = if peer.is_connected {
                ("*", Color::Green)
            } else {
                ("-", Color::DarkGray)
            };

            let name_color = if peer.is_connected {
                Color::White
            } else {
                Color::DarkGray
            };

            let line = Line::from(vec![
                Span::styled(format!(" {indicator} "), Style::default().fg(indicator_color)),
                Span::styled(peer.display_label(), Style::default().fg(name_color)),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    // ListState tracks the selected index for the List widget.
    // We create it fresh each frame because ratatui is immediate-mode.
    let mut list_state = ListState::default();
    list_state.select(app.selected_peer);

    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Renders the raw engine record for the selected peer.
fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let Some(peer) = app.selected_peer_info() else {
        return;
    };

    let block = Block::default()
        .title(" Peer detail ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let json = serde_json::to_string_pretty(peer)
        .unwrap_or_else(|e| format!("<could not render peer: {e}>"));

    let mut lines: Vec<Line> = json
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::White))))
        .collect();

    let action_hint = if peer.is_connected {
        "d: disconnect peer"
    } else {
        "d: delete peer"
    };
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        action_hint,
        Style::default().fg(Color::Yellow),
    )));

    let detail = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(detail, area);
}
