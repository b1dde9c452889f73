//! Event handling for the TUI.
//!
//! Converts raw terminal events (from crossterm) into `Action`s that the
//! `App` can process. This module is the bridge between the physical
//! keyboard and the application logic.
//!
//! # Key Bindings
//!
//! | Key          | Context       | Action                          |
//! |--------------|---------------|---------------------------------|
//! | Tab          | Any           | Focus next panel                |
//! | Shift+Tab    | Any           | Focus previous panel            |
//! | Ctrl+C       | Any           | Quit                            |
//! | Esc / q      | Lists         | Quit                            |
//! | Up / k       | Lists         | Select previous row             |
//! | Down / j     | Lists         | Select next row                 |
//! | Enter / Space| Lists         | Expand/collapse detail          |
//! | r            | Any           | Refresh the focused column now  |
//! | n            | Lists         | Select next local node          |
//! | d            | Peer list     | Disconnect or delete the peer   |
//! | x            | Channel list  | Close the channel (confirm)     |
//! | Enter        | Forms         | Submit (or advance field)       |
//! | Esc          | Forms         | Back to the list                |
//! | Up / Down    | Open form     | Switch pubkey/amount field      |
//!
//! While the close-channel confirmation dialog is open it captures all
//! input: `y`/Enter confirms, `n`/Esc cancels, everything else is ignored.

use crate::app::{Action, App, FocusedPanel, InputAction};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Converts a crossterm `Event` into an optional `Action`.
///
/// Returns `None` if the event doesn't map to any action (resize events,
/// key releases, unbound keys).
pub fn handle_event(event: &Event, app: &App) -> Option<Action> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key_event(key, app),
        _ => None,
    }
}

fn handle_key_event(key: &KeyEvent, app: &App) -> Option<Action> {
    // Ctrl+C always quits, regardless of focus
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    // An open confirmation dialog is modal
    if app.confirm_close.is_some() {
        return handle_confirm_key(key);
    }

    if key.code == KeyCode::Tab {
        return Some(Action::FocusNext);
    }
    if key.code == KeyCode::BackTab {
        return Some(Action::FocusPrev);
    }

    match app.focused {
        FocusedPanel::PeerList => handle_peer_list_key(key),
        FocusedPanel::ChannelList => handle_channel_list_key(key),
        FocusedPanel::ConnectForm | FocusedPanel::OpenForm => handle_form_key(key),
    }
}

/// Key handling while the close-channel dialog is open.
fn handle_confirm_key(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => Some(Action::ConfirmAccept),
        KeyCode::Char('n') | KeyCode::Esc => Some(Action::ConfirmCancel),
        _ => None,
    }
}

/// Key handling when the peer list is focused.
fn handle_peer_list_key(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::Down),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::ToggleDetail),
        KeyCode::Char('d') => Some(Action::PeerAction),
        KeyCode::Char('r') => Some(Action::ManualRefresh),
        KeyCode::Char('n') => Some(Action::CycleNode),
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

/// Key handling when the channel list is focused.
fn handle_channel_list_key(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::Down),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::ToggleDetail),
        KeyCode::Char('x') => Some(Action::RequestCloseChannel),
        KeyCode::Char('r') => Some(Action::ManualRefresh),
        KeyCode::Char('n') => Some(Action::CycleNode),
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

/// Key handling when a text form is focused.
///
/// Most keys edit text; Esc returns focus to the form's list. Up/Down is
/// routed through so the open form can switch fields.
fn handle_form_key(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Enter => Some(Action::SubmitInput),
        KeyCode::Esc => Some(Action::LeaveForm),
        KeyCode::Up => Some(Action::Up),
        KeyCode::Down => Some(Action::Down),
        KeyCode::Backspace => Some(Action::Input(InputAction::Backspace)),
        KeyCode::Delete => Some(Action::Input(InputAction::Delete)),
        KeyCode::Left => Some(Action::Input(InputAction::Left)),
        KeyCode::Right => Some(Action::Input(InputAction::Right)),
        KeyCode::Home => Some(Action::Input(InputAction::Home)),
        KeyCode::End => Some(Action::Input(InputAction::End)),
        KeyCode::Char(c) => Some(Action::Input(InputAction::Char(c))),
        _ => None,
    }
}
