//! TUI application state management.
//!
//! `App` holds all the state needed to render the terminal UI and process
//! user input. It follows the **Elm Architecture** pattern (also known as
//! TEA or Model-View-Update):
//!
//! 1. **Model**: the `App` struct holds the state
//! 2. **Update**: `handle_action()` modifies state based on events and
//!    returns the [`Command`]s to execute (engine calls to spawn)
//! 3. **View**: the `ui/` modules render the state to the terminal
//!
//! Commands are pure descriptions of effects — `handle_action` never touches
//! the engine itself. The main loop executes them and posts the completions
//! back as `Action`s. This is what makes the whole behavioral surface
//! testable without a terminal or a running engine.
//!
//! # State ownership
//!
//! The engine is the single source of truth. The peer and channel vectors
//! here are disposable snapshots of the last successful fetch, replaced
//! wholesale on every refresh; a failed refresh leaves the previous snapshot
//! displayed and surfaces the error in the status bar.

use crate::refresh::CollectionKind;
use lndeck_core::engine::EngineError;
use lndeck_core::explorer;
use lndeck_core::types::{ChannelInfo, Network, NodeId, OutPoint, PeerInfo, Pubkey};
use std::time::{Duration, Instant};

/// How long a toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(4);

/// Which panel currently has keyboard focus.
///
/// Tab cycles through them in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPanel {
    /// The peer list (left column).
    PeerList,
    /// The connect-peer input under the peer list.
    ConnectForm,
    /// The channel list (right column).
    ChannelList,
    /// The open-channel form under the channel list.
    OpenForm,
}

impl FocusedPanel {
    fn next(self) -> Self {
        match self {
            FocusedPanel::PeerList => FocusedPanel::ConnectForm,
            FocusedPanel::ConnectForm => FocusedPanel::ChannelList,
            FocusedPanel::ChannelList => FocusedPanel::OpenForm,
            FocusedPanel::OpenForm => FocusedPanel::PeerList,
        }
    }

    fn prev(self) -> Self {
        match self {
            FocusedPanel::PeerList => FocusedPanel::OpenForm,
            FocusedPanel::ConnectForm => FocusedPanel::PeerList,
            FocusedPanel::ChannelList => FocusedPanel::ConnectForm,
            FocusedPanel::OpenForm => FocusedPanel::ChannelList,
        }
    }
}

/// Which field of the open-channel form is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenField {
    Pubkey,
    Amount,
}

/// Text-editing operations shared by all input fields.
#[derive(Debug, Clone, Copy)]
pub enum InputAction {
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

/// Actions that modify the application state.
///
/// Produced by the event handler (key presses), the refresh scheduler
/// (ticks), and completed engine calls.
#[derive(Debug)]
pub enum Action {
    /// User wants to quit the TUI.
    Quit,
    /// Switch focus to the next panel (Tab).
    FocusNext,
    /// Switch focus to the previous panel (Shift+Tab).
    FocusPrev,
    /// Leave a form and return focus to its list (Esc).
    LeaveForm,
    /// Move the selection up in the focused list, or switch to the
    /// previous field in the open-channel form.
    Up,
    /// Move the selection down, or switch to the next form field.
    Down,
    /// Expand/collapse the detail view of the selected row.
    ToggleDetail,
    /// Disconnect or delete the selected peer (choice depends on its
    /// connection state).
    PeerAction,
    /// Ask to close the selected channel (opens the confirmation dialog).
    RequestCloseChannel,
    /// Confirm the pending channel close.
    ConfirmAccept,
    /// Dismiss the confirmation dialog without closing.
    ConfirmCancel,
    /// Select the next local node.
    CycleNode,
    /// Refresh the focused collection now, independent of the timer.
    ManualRefresh,
    /// Scheduler tick: refresh the given collections (and expire toasts).
    Tick(Vec<CollectionKind>),
    /// Edit the focused text field.
    Input(InputAction),
    /// Submit the focused form (Enter).
    SubmitInput,

    // Completions of spawned engine calls.
    NodesFetched(Result<Vec<NodeId>, EngineError>),
    NetworkFetched(Result<Network, EngineError>),
    PeersFetched(Result<Vec<PeerInfo>, EngineError>),
    ChannelsFetched(Result<Vec<ChannelInfo>, EngineError>),
    ConnectFinished(Result<(), EngineError>),
    /// Covers both disconnect and delete — the UI reaction is identical.
    PeerActionFinished(Result<(), EngineError>),
    OpenFinished(Result<ChannelInfo, EngineError>),
    CloseFinished(Result<(), EngineError>),
}

/// An engine call to spawn. Pure data; executed by the main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchNodes,
    FetchNetwork,
    FetchPeers,
    FetchChannels,
    ConnectPeer { node: NodeId, uri: String },
    DisconnectPeer { node: NodeId, pubkey: Pubkey },
    DeletePeer { node: NodeId, pubkey: Pubkey },
    OpenChannel {
        node: NodeId,
        pubkey: Pubkey,
        amount_sats: u64,
    },
    CloseChannel { outpoint: OutPoint },
}

/// Severity of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

/// A transient notification shown in the bottom-right corner.
#[derive(Debug)]
pub struct Toast {
    pub text: String,
    pub level: ToastLevel,
    born: Instant,
}

impl Toast {
    fn new(level: ToastLevel, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level,
            born: Instant::now(),
        }
    }

    fn expired(&self) -> bool {
        self.born.elapsed() >= TOAST_TTL
    }
}

/// A single-line text field with cursor handling.
///
/// The cursor is a byte offset into `value`, always on a character
/// boundary. Shared by the connect input and both open-form fields.
#[derive(Debug, Default)]
pub struct TextField {
    pub value: String,
    pub cursor: usize,
}

impl TextField {
    /// Applies one editing operation.
    pub fn apply(&mut self, action: InputAction) {
        match action {
            InputAction::Char(ch) => {
                self.value.insert(self.cursor, ch);
                self.cursor += ch.len_utf8();
            }
            InputAction::Backspace => {
                if self.cursor > 0 {
                    let prev = self.value[..self.cursor]
                        .char_indices()
                        .next_back()
                        .map(|(idx, _)| idx)
                        .unwrap_or(0);
                    self.value.drain(prev..self.cursor);
                    self.cursor = prev;
                }
            }
            InputAction::Delete => {
                if self.cursor < self.value.len() {
                    let next_len = self.value[self.cursor..]
                        .chars()
                        .next()
                        .map(|c| c.len_utf8())
                        .unwrap_or(0);
                    self.value.drain(self.cursor..self.cursor + next_len);
                }
            }
            InputAction::Left => {
                if self.cursor > 0 {
                    self.cursor = self.value[..self.cursor]
                        .char_indices()
                        .next_back()
                        .map(|(idx, _)| idx)
                        .unwrap_or(0);
                }
            }
            InputAction::Right => {
                if self.cursor < self.value.len() {
                    self.cursor += self.value[self.cursor..]
                        .chars()
                        .next()
                        .map(|c| c.len_utf8())
                        .unwrap_or(0);
                }
            }
            InputAction::Home => self.cursor = 0,
            InputAction::End => self.cursor = self.value.len(),
        }
    }

    /// Clears the field and returns what was in it.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }
}

/// State of the connect-peer form.
#[derive(Debug, Default)]
pub struct ConnectForm {
    pub input: TextField,
    /// Engine failure from the last submission, shown inline.
    pub error: Option<String>,
    /// A submission is in flight; further submits are ignored.
    pub submitting: bool,
}

/// State of the open-channel form.
#[derive(Debug)]
pub struct OpenForm {
    pub pubkey: TextField,
    pub amount: TextField,
    pub active: OpenField,
    /// Validation or engine failure from the last submission, shown inline.
    pub error: Option<String>,
    pub submitting: bool,
    /// The channel created by the last successful submission, displayed
    /// with its outpoint and explorer link.
    pub last_opened: Option<ChannelInfo>,
}

impl Default for OpenForm {
    fn default() -> Self {
        Self {
            pubkey: TextField::default(),
            amount: TextField::default(),
            active: OpenField::Pubkey,
            error: None,
            submitting: false,
            last_opened: None,
        }
    }
}

/// The pending channel-close confirmation.
#[derive(Debug)]
pub struct ConfirmClose {
    pub outpoint: OutPoint,
    /// The close call is in flight; the dialog shows a loading state.
    pub closing: bool,
}

/// The main TUI application state.
pub struct App {
    /// Snapshot of the engine's peers (last successful fetch).
    pub peers: Vec<PeerInfo>,
    /// Snapshot of the engine's channels (last successful fetch).
    pub channels: Vec<ChannelInfo>,
    /// Index of the selected peer row.
    pub selected_peer: Option<usize>,
    /// Index of the selected channel row.
    pub selected_channel: Option<usize>,
    /// Whether the selected peer's detail view is expanded.
    pub peer_detail: bool,
    /// Whether the selected channel's detail view is expanded.
    pub channel_detail: bool,

    /// The engine's local nodes.
    pub nodes: Vec<NodeId>,
    /// Index of the node mutating commands target. Auto-selected when the
    /// engine has exactly one node; otherwise the operator picks.
    pub selected_node: Option<usize>,
    /// The engine's network, once fetched (explorer links).
    pub network: Option<Network>,
    /// Explorer base URL override from config.
    pub explorer_base: Option<String>,

    /// Which panel has keyboard focus.
    pub focused: FocusedPanel,
    pub connect_form: ConnectForm,
    pub open_form: OpenForm,
    /// The close-channel confirmation dialog, when open. While it is open
    /// it captures all input.
    pub confirm_close: Option<ConfirmClose>,
    pub toasts: Vec<Toast>,

    /// A peers fetch is in flight; ticks skip the collection.
    pub peers_in_flight: bool,
    /// A channels fetch is in flight.
    pub channels_in_flight: bool,
    /// The last fetch failure, shown in the status bar until a fetch
    /// succeeds again. The stale snapshot stays on screen.
    pub fetch_error: Option<String>,
    /// Wall-clock time of the last successful fetch, preformatted.
    pub last_refresh: Option<String>,

    /// Whether the app should exit.
    pub should_quit: bool,
}

impl App {
    /// Creates the app with empty snapshots.
    pub fn new(explorer_base: Option<String>) -> Self {
        Self {
            peers: Vec::new(),
            channels: Vec::new(),
            selected_peer: None,
            selected_channel: None,
            peer_detail: false,
            channel_detail: false,
            nodes: Vec::new(),
            selected_node: None,
            network: None,
            explorer_base,
            focused: FocusedPanel::PeerList,
            connect_form: ConnectForm::default(),
            open_form: OpenForm::default(),
            confirm_close: None,
            toasts: Vec::new(),
            peers_in_flight: false,
            channels_in_flight: false,
            fetch_error: None,
            last_refresh: None,
            should_quit: false,
        }
    }

    /// The commands to run once at startup: node list, network, and an
    /// immediate fetch of both collections (the scheduler's first tick
    /// only comes a full interval later).
    pub fn startup_commands(&mut self) -> Vec<Command> {
        self.peers_in_flight = true;
        self.channels_in_flight = true;
        vec![
            Command::FetchNodes,
            Command::FetchNetwork,
            Command::FetchPeers,
            Command::FetchChannels,
        ]
    }

    /// Returns the currently selected peer, if any.
    pub fn selected_peer_info(&self) -> Option<&PeerInfo> {
        self.selected_peer.and_then(|idx| self.peers.get(idx))
    }

    /// Returns the currently selected channel, if any.
    pub fn selected_channel_info(&self) -> Option<&ChannelInfo> {
        self.selected_channel.and_then(|idx| self.channels.get(idx))
    }

    /// The node mutating commands target, if one is selected.
    pub fn selected_node_id(&self) -> Option<&NodeId> {
        self.selected_node.and_then(|idx| self.nodes.get(idx))
    }

    /// Builds an explorer URL for a funding transaction, honoring the
    /// configured base. Falls back to mainnet paths until the network
    /// is known.
    pub fn explorer_tx_url(&self, txid: &str) -> String {
        let network = self.network.unwrap_or(Network::Mainnet);
        match &self.explorer_base {
            Some(base) => explorer::tx_url_with_base(base, txid, network),
            None => explorer::tx_url(txid, network),
        }
    }

    fn toast(&mut self, level: ToastLevel, text: impl Into<String>) {
        self.toasts.push(Toast::new(level, text));
    }

    /// Resolves the target node for a mutating command, complaining
    /// loudly when the choice is ambiguous instead of guessing.
    fn require_node(&mut self) -> Option<NodeId> {
        match self.selected_node_id() {
            Some(node) => Some(node.clone()),
            None => {
                let msg = if self.nodes.is_empty() {
                    "engine reports no nodes"
                } else {
                    "several nodes available: press n to pick one"
                };
                self.toast(ToastLevel::Error, msg);
                None
            }
        }
    }

    /// Processes an action, updates the state, and returns the engine
    /// commands to spawn.
    pub fn handle_action(&mut self, action: Action) -> Vec<Command> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                Vec::new()
            }

            Action::FocusNext => {
                self.focused = self.focused.next();
                Vec::new()
            }

            Action::FocusPrev => {
                self.focused = self.focused.prev();
                Vec::new()
            }

            Action::LeaveForm => {
                self.focused = match self.focused {
                    FocusedPanel::ConnectForm => FocusedPanel::PeerList,
                    FocusedPanel::OpenForm => FocusedPanel::ChannelList,
                    other => other,
                };
                Vec::new()
            }

            Action::Up => self.move_up(),
            Action::Down => self.move_down(),

            Action::ToggleDetail => {
                match self.focused {
                    FocusedPanel::PeerList => self.peer_detail = !self.peer_detail,
                    FocusedPanel::ChannelList => self.channel_detail = !self.channel_detail,
                    _ => {}
                }
                Vec::new()
            }

            Action::PeerAction => self.peer_action(),

            Action::RequestCloseChannel => {
                if let Some(channel) = self.selected_channel_info() {
                    self.confirm_close = Some(ConfirmClose {
                        outpoint: channel.outpoint.clone(),
                        closing: false,
                    });
                }
                Vec::new()
            }

            Action::ConfirmAccept => {
                match &mut self.confirm_close {
                    Some(confirm) if !confirm.closing => {
                        confirm.closing = true;
                        vec![Command::CloseChannel {
                            outpoint: confirm.outpoint.clone(),
                        }]
                    }
                    // Already closing, or no dialog: nothing to do.
                    _ => Vec::new(),
                }
            }

            Action::ConfirmCancel => {
                // Cancel is a no-op while the close call is in flight;
                // the dialog closes when the call finishes.
                if matches!(&self.confirm_close, Some(c) if !c.closing) {
                    self.confirm_close = None;
                }
                Vec::new()
            }

            Action::CycleNode => {
                if !self.nodes.is_empty() {
                    self.selected_node = Some(match self.selected_node {
                        Some(idx) => (idx + 1) % self.nodes.len(),
                        None => 0,
                    });
                }
                Vec::new()
            }

            Action::ManualRefresh => {
                // Out-of-band fetch of the focused column's collection;
                // the scheduler keeps its own cadence.
                let kind = match self.focused {
                    FocusedPanel::PeerList | FocusedPanel::ConnectForm => CollectionKind::Peers,
                    FocusedPanel::ChannelList | FocusedPanel::OpenForm => CollectionKind::Channels,
                };
                self.fetch_if_idle(kind)
            }

            Action::Tick(batch) => {
                self.toasts.retain(|t| !t.expired());
                let mut commands = Vec::new();
                for kind in batch {
                    commands.extend(self.fetch_if_idle(kind));
                }
                commands
            }

            Action::Input(input) => {
                match self.focused {
                    FocusedPanel::ConnectForm => self.connect_form.input.apply(input),
                    FocusedPanel::OpenForm => match self.open_form.active {
                        OpenField::Pubkey => self.open_form.pubkey.apply(input),
                        OpenField::Amount => self.open_form.amount.apply(input),
                    },
                    _ => {}
                }
                Vec::new()
            }

            Action::SubmitInput => match self.focused {
                FocusedPanel::ConnectForm => self.submit_connect(),
                FocusedPanel::OpenForm => self.submit_open(),
                _ => Vec::new(),
            },

            Action::NodesFetched(result) => {
                match result {
                    Ok(nodes) => {
                        self.nodes = nodes;
                        if self.nodes.is_empty() {
                            self.selected_node = None;
                            self.toast(ToastLevel::Error, "engine reports no nodes");
                        } else if self.nodes.len() == 1 {
                            self.selected_node = Some(0);
                        } else if matches!(self.selected_node, Some(idx) if idx >= self.nodes.len())
                        {
                            self.selected_node = None;
                        }
                    }
                    Err(e) => {
                        self.toast(ToastLevel::Error, format!("could not list nodes: {e}"));
                    }
                }
                Vec::new()
            }

            Action::NetworkFetched(result) => {
                match result {
                    Ok(network) => self.network = Some(network),
                    Err(e) => {
                        self.toast(ToastLevel::Error, format!("could not read network: {e}"));
                    }
                }
                Vec::new()
            }

            Action::PeersFetched(result) => {
                self.peers_in_flight = false;
                match result {
                    Ok(peers) => {
                        self.peers = peers;
                        self.selected_peer =
                            clamp_selection(self.selected_peer, self.peers.len());
                        self.mark_refreshed();
                    }
                    Err(e) => {
                        // Keep the stale snapshot; just surface the failure.
                        self.fetch_error = Some(format!("peer refresh failed: {e}"));
                    }
                }
                Vec::new()
            }

            Action::ChannelsFetched(result) => {
                self.channels_in_flight = false;
                match result {
                    Ok(channels) => {
                        self.channels = channels;
                        self.selected_channel =
                            clamp_selection(self.selected_channel, self.channels.len());
                        self.mark_refreshed();
                    }
                    Err(e) => {
                        self.fetch_error = Some(format!("channel refresh failed: {e}"));
                    }
                }
                Vec::new()
            }

            Action::ConnectFinished(result) => {
                self.connect_form.submitting = false;
                match result {
                    Ok(()) => {
                        self.connect_form.input.clear();
                        self.connect_form.error = None;
                        self.peers_in_flight = true;
                        vec![Command::FetchPeers]
                    }
                    Err(e) => {
                        // Keep the entered value so the operator can fix it.
                        self.connect_form.error = Some(e.to_string());
                        Vec::new()
                    }
                }
            }

            Action::PeerActionFinished(result) => {
                if let Err(e) = result {
                    self.toast(ToastLevel::Error, e.to_string());
                }
                // Success shows up on the next poll; no optimistic removal.
                Vec::new()
            }

            Action::OpenFinished(result) => {
                self.open_form.submitting = false;
                match result {
                    Ok(channel) => {
                        self.open_form.last_opened = Some(channel);
                        self.open_form.pubkey.clear();
                        self.open_form.amount.clear();
                        self.open_form.active = OpenField::Pubkey;
                        self.open_form.error = None;
                        self.channels_in_flight = true;
                        vec![Command::FetchChannels]
                    }
                    Err(e) => {
                        self.open_form.error = Some(e.to_string());
                        Vec::new()
                    }
                }
            }

            Action::CloseFinished(result) => {
                // The dialog closes whether the call succeeded or not.
                self.confirm_close = None;
                if let Err(e) = result {
                    self.toast(ToastLevel::Error, e.to_string());
                }
                Vec::new()
            }
        }
    }

    fn move_up(&mut self) -> Vec<Command> {
        match self.focused {
            FocusedPanel::PeerList => {
                if !self.peers.is_empty() {
                    self.selected_peer = Some(match self.selected_peer {
                        Some(idx) => idx.saturating_sub(1),
                        None => 0,
                    });
                }
            }
            FocusedPanel::ChannelList => {
                if !self.channels.is_empty() {
                    self.selected_channel = Some(match self.selected_channel {
                        Some(idx) => idx.saturating_sub(1),
                        None => 0,
                    });
                }
            }
            FocusedPanel::OpenForm => self.open_form.active = OpenField::Pubkey,
            FocusedPanel::ConnectForm => {}
        }
        Vec::new()
    }

    fn move_down(&mut self) -> Vec<Command> {
        match self.focused {
            FocusedPanel::PeerList => {
                if !self.peers.is_empty() {
                    self.selected_peer = Some(match self.selected_peer {
                        Some(idx) => (idx + 1).min(self.peers.len() - 1),
                        None => 0,
                    });
                }
            }
            FocusedPanel::ChannelList => {
                if !self.channels.is_empty() {
                    self.selected_channel = Some(match self.selected_channel {
                        Some(idx) => (idx + 1).min(self.channels.len() - 1),
                        None => 0,
                    });
                }
            }
            FocusedPanel::OpenForm => self.open_form.active = OpenField::Amount,
            FocusedPanel::ConnectForm => {}
        }
        Vec::new()
    }

    /// Disconnect or delete the selected peer. The choice is a pure
    /// function of the peer's connection state: connected peers get
    /// disconnected, disconnected peers get deleted.
    fn peer_action(&mut self) -> Vec<Command> {
        let Some(peer) = self.selected_peer_info() else {
            return Vec::new();
        };
        let pubkey = peer.pubkey.clone();
        let is_connected = peer.is_connected;

        let Some(node) = self.require_node() else {
            return Vec::new();
        };

        if is_connected {
            vec![Command::DisconnectPeer { node, pubkey }]
        } else {
            vec![Command::DeletePeer { node, pubkey }]
        }
    }

    fn submit_connect(&mut self) -> Vec<Command> {
        if self.connect_form.submitting {
            return Vec::new();
        }
        let uri = self.connect_form.input.value.trim().to_string();
        if uri.is_empty() {
            return Vec::new();
        }
        // An implausible prefix marks the field invalid in the UI but does
        // not block submission — the engine is the authority.
        let Some(node) = self.require_node() else {
            return Vec::new();
        };
        self.connect_form.submitting = true;
        vec![Command::ConnectPeer { node, uri }]
    }

    fn submit_open(&mut self) -> Vec<Command> {
        // Enter on the pubkey field advances to the amount field.
        if self.open_form.active == OpenField::Pubkey {
            self.open_form.active = OpenField::Amount;
            return Vec::new();
        }
        if self.open_form.submitting {
            return Vec::new();
        }

        let pubkey = self.open_form.pubkey.value.trim().to_string();
        if pubkey.is_empty() {
            self.open_form.error = Some("peer pubkey is required".to_string());
            return Vec::new();
        }

        // The amount must be a whole number of sats; anything else fails
        // here, before any engine call.
        let amount_text = self.open_form.amount.value.trim().to_string();
        let amount_sats = match amount_text.parse::<u64>() {
            Ok(sats) => sats,
            Err(_) => {
                self.open_form.error =
                    Some(format!("invalid amount {amount_text:?}: expected whole sats"));
                return Vec::new();
            }
        };

        let Some(node) = self.require_node() else {
            return Vec::new();
        };

        self.open_form.error = None;
        self.open_form.submitting = true;
        vec![Command::OpenChannel {
            node,
            pubkey: Pubkey::new(pubkey),
            amount_sats,
        }]
    }

    fn fetch_if_idle(&mut self, kind: CollectionKind) -> Vec<Command> {
        match kind {
            CollectionKind::Peers => {
                if self.peers_in_flight {
                    return Vec::new();
                }
                self.peers_in_flight = true;
                vec![Command::FetchPeers]
            }
            CollectionKind::Channels => {
                if self.channels_in_flight {
                    return Vec::new();
                }
                self.channels_in_flight = true;
                vec![Command::FetchChannels]
            }
        }
    }

    fn mark_refreshed(&mut self) {
        self.fetch_error = None;
        self.last_refresh = Some(chrono::Local::now().format("%H:%M:%S").to_string());
    }
}

/// Keeps a selection index valid after a list was replaced.
fn clamp_selection(selected: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        match selected {
            Some(idx) if idx >= len => Some(len - 1),
            Some(idx) => Some(idx),
            None => Some(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TXID: &str = "3f2a1c9e8d7b6a5f4e3d2c1b0a9f8e7d6c5b4a3f2e1d0c9b8a7f6e5d4c3b2a1f";

    fn peer(pubkey: &str, connected: bool) -> PeerInfo {
        PeerInfo {
            pubkey: Pubkey::new(pubkey),
            alias: None,
            is_connected: connected,
        }
    }

    fn channel(vout: u32) -> ChannelInfo {
        ChannelInfo {
            peer: Pubkey::new("02abcd"),
            outpoint: OutPoint::new(TXID, vout),
            size_sats: 1_000_000,
            balance_sats: 400_000,
            confirmed: true,
        }
    }

    fn engine_err(msg: &str) -> EngineError {
        EngineError::from_engine("test_error", msg)
    }

    /// An app with one node already selected, like after startup against
    /// a typical single-node engine.
    fn app_with_node() -> App {
        let mut app = App::new(None);
        app.handle_action(Action::NodesFetched(Ok(vec![NodeId::new("node-1")])));
        app
    }

    fn type_into(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_action(Action::Input(InputAction::Char(ch)));
        }
    }

    #[test]
    fn disconnect_vs_delete_follows_connection_state() {
        let mut app = app_with_node();
        app.handle_action(Action::PeersFetched(Ok(vec![peer("02ab", true)])));

        let commands = app.handle_action(Action::PeerAction);
        assert_eq!(
            commands,
            vec![Command::DisconnectPeer {
                node: NodeId::new("node-1"),
                pubkey: Pubkey::new("02ab"),
            }]
        );

        app.handle_action(Action::PeersFetched(Ok(vec![peer("02ab", false)])));
        let commands = app.handle_action(Action::PeerAction);
        assert_eq!(
            commands,
            vec![Command::DeletePeer {
                node: NodeId::new("node-1"),
                pubkey: Pubkey::new("02ab"),
            }]
        );
    }

    #[test]
    fn successful_fetch_replaces_snapshot() {
        let mut app = app_with_node();
        app.handle_action(Action::PeersFetched(Ok(vec![peer("02aa", true)])));
        app.handle_action(Action::PeersFetched(Ok(vec![
            peer("02bb", true),
            peer("02cc", false),
        ])));
        assert_eq!(app.peers.len(), 2);
        assert_eq!(app.peers[0].pubkey.as_str(), "02bb");
    }

    #[test]
    fn failed_fetch_keeps_previous_snapshot_and_surfaces_error() {
        let mut app = app_with_node();
        app.handle_action(Action::PeersFetched(Ok(vec![peer("02aa", true)])));
        app.handle_action(Action::PeersFetched(Err(engine_err("engine is busy"))));

        assert_eq!(app.peers.len(), 1, "stale snapshot must stay displayed");
        assert_eq!(app.peers[0].pubkey.as_str(), "02aa");
        let err = app.fetch_error.as_deref().unwrap();
        assert!(err.contains("engine is busy"), "got: {err}");

        // The next successful fetch clears the surfaced error.
        app.handle_action(Action::PeersFetched(Ok(vec![])));
        assert!(app.fetch_error.is_none());
    }

    #[test]
    fn selection_is_clamped_when_list_shrinks() {
        let mut app = app_with_node();
        app.handle_action(Action::ChannelsFetched(Ok(vec![
            channel(0),
            channel(1),
            channel(2),
        ])));
        app.focused = FocusedPanel::ChannelList;
        app.handle_action(Action::Down);
        app.handle_action(Action::Down);
        assert_eq!(app.selected_channel, Some(2));

        app.handle_action(Action::ChannelsFetched(Ok(vec![channel(0)])));
        assert_eq!(app.selected_channel, Some(0));

        app.handle_action(Action::ChannelsFetched(Ok(vec![])));
        assert_eq!(app.selected_channel, None);
    }

    #[test]
    fn close_without_confirm_never_calls_engine() {
        let mut app = app_with_node();
        app.handle_action(Action::ChannelsFetched(Ok(vec![channel(0)])));
        app.focused = FocusedPanel::ChannelList;

        let commands = app.handle_action(Action::RequestCloseChannel);
        assert!(commands.is_empty(), "opening the dialog must not close");
        assert!(app.confirm_close.is_some());

        let commands = app.handle_action(Action::ConfirmCancel);
        assert!(commands.is_empty());
        assert!(app.confirm_close.is_none());
    }

    #[test]
    fn confirm_closes_exactly_once_and_dialog_ends_either_way() {
        let mut app = app_with_node();
        app.handle_action(Action::ChannelsFetched(Ok(vec![channel(0)])));
        app.focused = FocusedPanel::ChannelList;
        app.handle_action(Action::RequestCloseChannel);

        let commands = app.handle_action(Action::ConfirmAccept);
        assert_eq!(
            commands,
            vec![Command::CloseChannel {
                outpoint: OutPoint::new(TXID, 0),
            }]
        );

        // A second accept while the call is in flight must not re-send.
        assert!(app.handle_action(Action::ConfirmAccept).is_empty());

        // Failure: dialog closes, error becomes a toast.
        app.handle_action(Action::CloseFinished(Err(engine_err("already closing"))));
        assert!(app.confirm_close.is_none());
        assert!(app
            .toasts
            .iter()
            .any(|t| t.level == ToastLevel::Error && t.text.contains("already closing")));

        // Success: dialog closes too, no error toast.
        app.handle_action(Action::RequestCloseChannel);
        app.handle_action(Action::ConfirmAccept);
        app.handle_action(Action::CloseFinished(Ok(())));
        assert!(app.confirm_close.is_none());
    }

    #[test]
    fn open_channel_success_shows_outpoint_and_refetches_once() {
        let mut app = app_with_node();
        app.focused = FocusedPanel::OpenForm;
        type_into(&mut app, "02abcd");
        app.handle_action(Action::SubmitInput); // advance to amount
        type_into(&mut app, "500000");

        let commands = app.handle_action(Action::SubmitInput);
        assert_eq!(
            commands,
            vec![Command::OpenChannel {
                node: NodeId::new("node-1"),
                pubkey: Pubkey::new("02abcd"),
                amount_sats: 500_000,
            }]
        );
        assert!(app.open_form.submitting);

        let commands = app.handle_action(Action::OpenFinished(Ok(channel(3))));
        assert_eq!(commands, vec![Command::FetchChannels], "exactly one refetch");
        let opened = app.open_form.last_opened.as_ref().unwrap();
        assert_eq!(opened.outpoint, OutPoint::new(TXID, 3));
        assert!(app.open_form.pubkey.value.is_empty(), "form cleared");
        assert!(app.open_form.amount.value.is_empty());
    }

    #[test]
    fn open_channel_bad_amount_fails_before_any_engine_call() {
        let mut app = app_with_node();
        app.focused = FocusedPanel::OpenForm;
        type_into(&mut app, "02abcd");
        app.handle_action(Action::SubmitInput);
        type_into(&mut app, "12.5");

        let commands = app.handle_action(Action::SubmitInput);
        assert!(commands.is_empty(), "no engine call for a bad amount");
        assert!(app.open_form.error.as_deref().unwrap().contains("12.5"));
        assert!(!app.open_form.submitting);
    }

    #[test]
    fn open_channel_failure_keeps_input_and_shows_engine_message() {
        let mut app = app_with_node();
        app.focused = FocusedPanel::OpenForm;
        type_into(&mut app, "02abcd");
        app.handle_action(Action::SubmitInput);
        type_into(&mut app, "500000");
        app.handle_action(Action::SubmitInput);

        let commands = app.handle_action(Action::OpenFinished(Err(engine_err(
            "the invoice or address is on a different network",
        ))));
        assert!(commands.is_empty(), "no refetch on failure");
        assert_eq!(app.open_form.pubkey.value, "02abcd", "input kept");
        assert_eq!(app.open_form.amount.value, "500000");
        assert_eq!(
            app.open_form.error.as_deref().unwrap(),
            "the invoice or address is on a different network"
        );
    }

    #[test]
    fn connect_success_clears_input_and_refetches_peers_once() {
        let mut app = app_with_node();
        app.focused = FocusedPanel::ConnectForm;
        type_into(&mut app, "lightning:02ab@host:9735");

        let commands = app.handle_action(Action::SubmitInput);
        assert_eq!(
            commands,
            vec![Command::ConnectPeer {
                node: NodeId::new("node-1"),
                uri: "lightning:02ab@host:9735".to_string(),
            }]
        );

        // Double submit while in flight is ignored.
        assert!(app.handle_action(Action::SubmitInput).is_empty());

        let commands = app.handle_action(Action::ConnectFinished(Ok(())));
        assert_eq!(commands, vec![Command::FetchPeers]);
        assert!(app.connect_form.input.value.is_empty());
    }

    #[test]
    fn connect_failure_keeps_input_and_shows_error() {
        let mut app = app_with_node();
        app.focused = FocusedPanel::ConnectForm;
        type_into(&mut app, "lightning:02ab@nowhere:9735");
        app.handle_action(Action::SubmitInput);

        let commands =
            app.handle_action(Action::ConnectFinished(Err(engine_err("peer unreachable"))));
        assert!(commands.is_empty());
        assert_eq!(app.connect_form.input.value, "lightning:02ab@nowhere:9735");
        assert_eq!(app.connect_form.error.as_deref().unwrap(), "peer unreachable");
    }

    #[test]
    fn implausible_connect_string_still_submits() {
        // The prefix check only marks the field invalid; the engine decides.
        let mut app = app_with_node();
        app.focused = FocusedPanel::ConnectForm;
        type_into(&mut app, "02ab@host:9735");

        let commands = app.handle_action(Action::SubmitInput);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn tick_skips_collections_with_fetch_in_flight() {
        let mut app = app_with_node();

        let commands = app.handle_action(Action::Tick(vec![
            CollectionKind::Peers,
            CollectionKind::Channels,
        ]));
        assert_eq!(
            commands,
            vec![Command::FetchPeers, Command::FetchChannels]
        );

        // Both fetches still in flight: the next tick issues nothing.
        let commands = app.handle_action(Action::Tick(vec![
            CollectionKind::Peers,
            CollectionKind::Channels,
        ]));
        assert!(commands.is_empty());

        // Peers completes; only peers is refetched on the next tick.
        app.handle_action(Action::PeersFetched(Ok(vec![])));
        let commands = app.handle_action(Action::Tick(vec![
            CollectionKind::Peers,
            CollectionKind::Channels,
        ]));
        assert_eq!(commands, vec![Command::FetchPeers]);
    }

    #[test]
    fn manual_refresh_targets_the_focused_column() {
        let mut app = app_with_node();
        app.focused = FocusedPanel::ChannelList;
        assert_eq!(
            app.handle_action(Action::ManualRefresh),
            vec![Command::FetchChannels]
        );
        app.focused = FocusedPanel::ConnectForm;
        assert_eq!(
            app.handle_action(Action::ManualRefresh),
            vec![Command::FetchPeers]
        );
    }

    #[test]
    fn mutating_command_without_node_selection_fails_loudly() {
        let mut app = App::new(None);
        app.handle_action(Action::NodesFetched(Ok(vec![
            NodeId::new("node-1"),
            NodeId::new("node-2"),
        ])));
        assert_eq!(app.selected_node, None, "several nodes: no auto-selection");

        app.handle_action(Action::PeersFetched(Ok(vec![peer("02ab", true)])));
        let commands = app.handle_action(Action::PeerAction);
        assert!(commands.is_empty());
        assert!(app
            .toasts
            .iter()
            .any(|t| t.level == ToastLevel::Error && t.text.contains("press n")));

        // Picking a node unblocks the command.
        app.handle_action(Action::CycleNode);
        let commands = app.handle_action(Action::PeerAction);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn single_node_is_auto_selected() {
        let app = app_with_node();
        assert_eq!(app.selected_node_id(), Some(&NodeId::new("node-1")));
    }

    #[test]
    fn expired_toasts_are_dropped_on_tick() {
        let mut app = app_with_node();
        app.toast(ToastLevel::Info, "old news");
        app.toasts[0].born = Instant::now() - TOAST_TTL;
        app.toast(ToastLevel::Info, "fresh");

        app.handle_action(Action::Tick(Vec::new()));
        assert_eq!(app.toasts.len(), 1);
        assert_eq!(app.toasts[0].text, "fresh");
    }

    #[test]
    fn quit_sets_flag_and_issues_no_commands() {
        let mut app = app_with_node();
        assert!(app.handle_action(Action::Quit).is_empty());
        assert!(app.should_quit);
    }

    #[test]
    fn text_field_handles_multibyte_input() {
        let mut field = TextField::default();
        for ch in "añb".chars() {
            field.apply(InputAction::Char(ch));
        }
        assert_eq!(field.value, "añb");
        field.apply(InputAction::Left);
        field.apply(InputAction::Backspace);
        assert_eq!(field.value, "ab");
        field.apply(InputAction::End);
        field.apply(InputAction::Backspace);
        assert_eq!(field.value, "a");
    }
}
