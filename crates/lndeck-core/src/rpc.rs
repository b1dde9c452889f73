//! RPC protocol between the wallet engine daemon and lndeck.
//!
//! The engine daemon exposes a Unix domain socket that admin clients connect
//! to. Communication uses **JSON lines**: each message is a single JSON
//! object followed by a newline character (`\n`).
//!
//! # Why JSON?
//!
//! 1. **Debuggability**: you can poke the engine with `socat` and read the
//!    requests and replies directly
//! 2. **Performance is irrelevant**: the socket is localhost-only and the
//!    payloads are tiny (peer and channel listings)
//!
//! # Request-Reply Pattern
//!
//! The client sends one `EngineRequest` and the engine answers with exactly
//! one `EngineReply`, in order. There are no pushed events — the UI polls.
//!
//! # Example Session
//!
//! ```text
//! client → engine:  "ListPeers"
//! engine → client:  {"type":"Peers","peers":[...]}
//! client → engine:  {"CloseChannel":{"outpoint":"3f2a...:0"}}
//! engine → client:  {"type":"Ok"}
//! ```

use crate::types::{ChannelInfo, Network, NodeId, OutPoint, PeerInfo, Pubkey};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur encoding or decoding RPC messages.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RPC line too long: {size} bytes (max {max})")]
    LineTooLong { size: usize, max: usize },
}

/// Maximum RPC line length: 1 MB. A channel listing of a few hundred entries
/// fits comfortably; anything bigger indicates a broken peer on the socket.
pub const MAX_RPC_LINE_LENGTH: usize = 1_048_576;

// ---------------------------------------------------------------------------
// Client → Engine requests
// ---------------------------------------------------------------------------

/// A request sent from the admin client to the engine.
///
/// Each variant maps onto one [`crate::engine::WalletEngine`] operation.
/// The engine always answers with a single `EngineReply`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EngineRequest {
    /// Request the identifiers of the engine's local nodes.
    ListNodes,

    /// Request the list of all known peers.
    ListPeers,

    /// Connect a node to a peer described by a `lightning:` URI.
    ConnectPeer {
        /// The local node that should dial out.
        node: NodeId,
        /// The peer connect string, e.g. `lightning:02ab..@host:9735`.
        uri: String,
    },

    /// Drop the transport connection to a connected peer.
    DisconnectPeer { node: NodeId, pubkey: Pubkey },

    /// Forget a peer that is not currently connected.
    DeletePeer { node: NodeId, pubkey: Pubkey },

    /// Request the list of all known channels.
    ListChannels,

    /// Open a channel to a peer.
    OpenChannel {
        /// The funding node.
        node: NodeId,
        /// The remote peer's pubkey.
        pubkey: Pubkey,
        /// Channel capacity in satoshis.
        amount_sats: u64,
    },

    /// Cooperatively close the channel at the given funding output.
    CloseChannel { outpoint: OutPoint },

    /// Request the network the engine operates on.
    GetNetwork,
}

// ---------------------------------------------------------------------------
// Engine → Client replies
// ---------------------------------------------------------------------------

/// A reply sent from the engine to the admin client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineReply {
    /// Simple acknowledgment (connect, disconnect, delete, close).
    Ok,

    /// Reply to `ListNodes`.
    Nodes { nodes: Vec<NodeId> },

    /// Reply to `ListPeers`.
    Peers { peers: Vec<PeerInfo> },

    /// Reply to `ListChannels`.
    Channels { channels: Vec<ChannelInfo> },

    /// Reply to `OpenChannel`: the newly created channel.
    ChannelOpened { channel: ChannelInfo },

    /// Reply to `GetNetwork`.
    Network { network: Network },

    /// Error reply when a request fails.
    Error {
        /// Machine-readable error code (e.g. "insufficient_funds").
        code: String,
        /// Human-readable description, shown to the user verbatim.
        message: String,
    },
}

/// Serializes an `EngineRequest` to a JSON line (with trailing newline).
pub fn encode_request(request: &EngineRequest) -> Result<String, RpcError> {
    let mut json = serde_json::to_string(request)?;
    json.push('\n');
    Ok(json)
}

/// Deserializes an `EngineRequest` from a JSON line.
pub fn decode_request(line: &str) -> Result<EngineRequest, RpcError> {
    let request = serde_json::from_str(line.trim())?;
    Ok(request)
}

/// Serializes an `EngineReply` to a JSON line (with trailing newline).
pub fn encode_reply(reply: &EngineReply) -> Result<String, RpcError> {
    let mut json = serde_json::to_string(reply)?;
    json.push('\n');
    Ok(json)
}

/// Deserializes an `EngineReply` from a JSON line.
pub fn decode_reply(line: &str) -> Result<EngineReply, RpcError> {
    let reply = serde_json::from_str(line.trim())?;
    Ok(reply)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TXID: &str = "3f2a1c9e8d7b6a5f4e3d2c1b0a9f8e7d6c5b4a3f2e1d0c9b8a7f6e5d4c3b2a1f";

    #[test]
    fn request_list_peers_roundtrip() {
        let req = EngineRequest::ListPeers;
        let json = encode_request(&req).unwrap();
        let decoded = decode_request(&json).unwrap();
        assert!(matches!(decoded, EngineRequest::ListPeers));
    }

    #[test]
    fn request_open_channel_roundtrip() {
        let req = EngineRequest::OpenChannel {
            node: NodeId::new("node-1"),
            pubkey: Pubkey::new("02abcd"),
            amount_sats: 500_000,
        };
        let json = encode_request(&req).unwrap();
        match decode_request(&json).unwrap() {
            EngineRequest::OpenChannel {
                node,
                pubkey,
                amount_sats,
            } => {
                assert_eq!(node.as_str(), "node-1");
                assert_eq!(pubkey.as_str(), "02abcd");
                assert_eq!(amount_sats, 500_000);
            }
            other => panic!("expected OpenChannel, got {other:?}"),
        }
    }

    #[test]
    fn request_close_channel_carries_outpoint() {
        let req = EngineRequest::CloseChannel {
            outpoint: OutPoint::new(TXID, 1),
        };
        let json = encode_request(&req).unwrap();
        // The outpoint travels in its canonical string form
        assert!(json.contains(&format!("{TXID}:1")));
        match decode_request(&json).unwrap() {
            EngineRequest::CloseChannel { outpoint } => {
                assert_eq!(outpoint.vout(), 1);
            }
            other => panic!("expected CloseChannel, got {other:?}"),
        }
    }

    #[test]
    fn reply_peers_roundtrip() {
        let reply = EngineReply::Peers {
            peers: vec![PeerInfo {
                pubkey: Pubkey::new("02abcd"),
                alias: Some("ACINQ".to_string()),
                is_connected: true,
            }],
        };
        let json = encode_reply(&reply).unwrap();
        match decode_reply(&json).unwrap() {
            EngineReply::Peers { peers } => {
                assert_eq!(peers.len(), 1);
                assert_eq!(peers[0].display_label(), "ACINQ");
            }
            other => panic!("expected Peers, got {other:?}"),
        }
    }

    #[test]
    fn reply_error_roundtrip() {
        let reply = EngineReply::Error {
            code: "channel_not_found".to_string(),
            message: format!("no channel at {TXID}:0"),
        };
        let json = encode_reply(&reply).unwrap();
        match decode_reply(&json).unwrap() {
            EngineReply::Error { code, message } => {
                assert_eq!(code, "channel_not_found");
                assert_eq!(message, format!("no channel at {TXID}:0"));
            }
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[test]
    fn encoded_messages_are_single_lines() {
        let req = EngineRequest::ConnectPeer {
            node: NodeId::new("node-1"),
            uri: "lightning:02abcd@host:9735".to_string(),
        };
        let json = encode_request(&req).unwrap();
        let lines: Vec<&str> = json.trim().split('\n').collect();
        assert_eq!(lines.len(), 1, "JSON line must not contain embedded newlines");
    }

    #[test]
    fn all_request_variants_serialize() {
        let requests = vec![
            EngineRequest::ListNodes,
            EngineRequest::ListPeers,
            EngineRequest::ConnectPeer {
                node: NodeId::new("n"),
                uri: "lightning:02ab@h:9735".to_string(),
            },
            EngineRequest::DisconnectPeer {
                node: NodeId::new("n"),
                pubkey: Pubkey::new("02ab"),
            },
            EngineRequest::DeletePeer {
                node: NodeId::new("n"),
                pubkey: Pubkey::new("02ab"),
            },
            EngineRequest::ListChannels,
            EngineRequest::OpenChannel {
                node: NodeId::new("n"),
                pubkey: Pubkey::new("02ab"),
                amount_sats: 1,
            },
            EngineRequest::CloseChannel {
                outpoint: OutPoint::new(TXID, 0),
            },
            EngineRequest::GetNetwork,
        ];
        for req in requests {
            let json = encode_request(&req).unwrap();
            assert!(!json.is_empty());
        }
    }
}
