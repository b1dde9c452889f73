//! The wallet engine interface.
//!
//! `lndeck` implements no wallet logic of its own — peer handshakes, channel
//! negotiation, signing, and chain state all live in the external engine
//! daemon. This module defines the seam: an object-safe async trait the UI
//! is written against, so the real RPC client and the test doubles are
//! interchangeable.
//!
//! The trait methods map one-to-one onto the engine's RPC operations (see
//! [`crate::rpc`]). Every mutating operation names the local node it targets;
//! there is deliberately no "default node" anywhere in this interface.

use crate::types::{ChannelInfo, Network, NodeId, OutPoint, PeerInfo, Pubkey};
use async_trait::async_trait;
use thiserror::Error;

/// URI scheme prefix the engine accepts for peer connect strings,
/// e.g. `lightning:02abcd...@host:9735`.
pub const PEER_URI_PREFIX: &str = "lightning:";

/// Returns `true` if the input could plausibly be a peer connect string.
///
/// The empty string counts as plausible (nothing entered yet). Anything else
/// must carry the URI prefix. This is a hint for marking a form field
/// invalid — the engine remains the authority and submission is never
/// blocked on it.
pub fn is_plausible_peer_uri(input: &str) -> bool {
    input.is_empty() || input.starts_with(PEER_URI_PREFIX)
}

/// Errors that can occur when talking to the wallet engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine processed the request and reported a failure.
    /// `message` is shown to the user verbatim.
    #[error("{message}")]
    Engine { code: String, message: String },

    #[error("I/O error talking to engine: {0}")]
    Transport(#[from] std::io::Error),

    #[error("could not decode engine reply: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("engine connection closed")]
    Disconnected,

    #[error("unexpected engine reply to {operation}")]
    UnexpectedReply { operation: &'static str },
}

impl EngineError {
    /// Builds an engine-reported error from its wire form.
    pub fn from_engine(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Engine {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Handle to the external wallet engine.
///
/// All operations are asynchronous and fallible. Implementations must be
/// cheap to clone or share (`Arc<dyn WalletEngine>`), since the UI spawns
/// one task per in-flight call.
#[async_trait]
pub trait WalletEngine: Send + Sync {
    /// Lists the engine's local nodes.
    async fn list_nodes(&self) -> Result<Vec<NodeId>, EngineError>;

    /// Lists all peers known to the engine.
    async fn list_peers(&self) -> Result<Vec<PeerInfo>, EngineError>;

    /// Connects `node` to the peer described by `uri`.
    ///
    /// Fails on a malformed connect string or an unreachable peer.
    async fn connect_peer(&self, node: &NodeId, uri: &str) -> Result<(), EngineError>;

    /// Drops the transport connection to a currently connected peer.
    async fn disconnect_peer(&self, node: &NodeId, pubkey: &Pubkey) -> Result<(), EngineError>;

    /// Forgets a peer that is not currently connected.
    async fn delete_peer(&self, node: &NodeId, pubkey: &Pubkey) -> Result<(), EngineError>;

    /// Lists all channels known to the engine.
    async fn list_channels(&self) -> Result<Vec<ChannelInfo>, EngineError>;

    /// Opens a channel of `amount_sats` from `node` to `pubkey`.
    ///
    /// Fails on insufficient funds, a network mismatch, or an invalid
    /// pubkey. Returns the newly created channel.
    async fn open_channel(
        &self,
        node: &NodeId,
        pubkey: &Pubkey,
        amount_sats: u64,
    ) -> Result<ChannelInfo, EngineError>;

    /// Initiates a cooperative close of the channel at `outpoint`.
    ///
    /// Fails if the channel is not found or is already closing.
    async fn close_channel(&self, outpoint: &OutPoint) -> Result<(), EngineError>;

    /// The network the engine operates on (for explorer links).
    async fn network(&self) -> Result<Network, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_plausible() {
        assert!(is_plausible_peer_uri(""));
    }

    #[test]
    fn prefixed_input_is_plausible() {
        assert!(is_plausible_peer_uri("lightning:02abcd@ln.example.com:9735"));
    }

    #[test]
    fn bare_pubkey_is_not_plausible() {
        assert!(!is_plausible_peer_uri("02abcd@ln.example.com:9735"));
    }

    #[test]
    fn engine_error_message_is_verbatim() {
        let err = EngineError::from_engine(
            "insufficient_funds",
            "Could not create a signed transaction to open channel with",
        );
        assert_eq!(
            err.to_string(),
            "Could not create a signed transaction to open channel with"
        );
    }
}
