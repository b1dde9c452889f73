//! Domain types for lndeck.
//!
//! All core types are defined here as **newtypes** — thin wrappers around
//! primitive types that give them distinct identities in the type system.
//! This prevents accidentally passing a `NodeId` where a `Pubkey` is
//! expected, which would compile fine if both were plain `String`s.
//!
//! Everything in this module mirrors engine state. The UI never constructs
//! peers or channels itself; it only deserializes what the engine reports
//! and replaces its snapshot wholesale on each refresh.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Pubkey — identifies a Lightning peer
// ---------------------------------------------------------------------------

/// A peer's node public key, hex-encoded.
///
/// The engine is the authority on what constitutes a valid pubkey; the UI
/// treats it as an opaque identifier. Two peers are the same peer exactly
/// when their pubkeys compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pubkey(String);

impl Pubkey {
    /// Creates a `Pubkey` from a string reported by the engine.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// NodeId — identifies one of the engine's local nodes
// ---------------------------------------------------------------------------

/// Identifier of a local node managed by the wallet engine.
///
/// Most setups run a single node, but the engine API allows several; every
/// mutating command names the node it targets explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(String);

impl NodeId {
    /// Creates a `NodeId` from a string reported by the engine.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// OutPoint — a channel's funding transaction output
// ---------------------------------------------------------------------------

/// Errors that can occur when parsing an `OutPoint` from its string form.
#[derive(Debug, thiserror::Error)]
pub enum OutPointParseError {
    #[error("outpoint is missing the ':' separator")]
    MissingSeparator,
    #[error("outpoint txid must be 64 hex characters (got {0:?})")]
    InvalidTxid(String),
    #[error("outpoint index is not a valid number: {0:?}")]
    InvalidIndex(String),
}

/// A channel's funding output: transaction id plus output index.
///
/// Serialized on the wire and displayed to the user in the canonical
/// `txid:vout` form. Uniquely identifies a channel to the engine's
/// `close_channel` operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OutPoint {
    txid: String,
    vout: u32,
}

impl OutPoint {
    /// Creates an `OutPoint` from already-validated parts.
    pub fn new(txid: impl Into<String>, vout: u32) -> Self {
        Self {
            txid: txid.into(),
            vout,
        }
    }

    /// The funding transaction id (hex), used for explorer links.
    pub fn txid(&self) -> &str {
        &self.txid
    }

    /// The output index within the funding transaction.
    pub fn vout(&self) -> u32 {
        self.vout
    }
}

impl FromStr for OutPoint {
    type Err = OutPointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (txid, vout) = s
            .split_once(':')
            .ok_or(OutPointParseError::MissingSeparator)?;
        if txid.len() != 64 || !txid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(OutPointParseError::InvalidTxid(txid.to_string()));
        }
        let vout = vout
            .parse::<u32>()
            .map_err(|_| OutPointParseError::InvalidIndex(vout.to_string()))?;
        Ok(Self {
            txid: txid.to_string(),
            vout,
        })
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.vout)
    }
}

impl TryFrom<String> for OutPoint {
    type Error = OutPointParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<OutPoint> for String {
    fn from(op: OutPoint) -> Self {
        op.to_string()
    }
}

// ---------------------------------------------------------------------------
// Network — which chain the engine is on
// ---------------------------------------------------------------------------

/// Error returned when a network name is not recognized.
#[derive(Debug, thiserror::Error)]
#[error("unknown network: {0:?}")]
pub struct UnknownNetwork(pub String);

/// The bitcoin network the engine operates on.
///
/// Reported once by the engine and used to build block-explorer links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Signet,
    Regtest,
}

impl Network {
    /// The canonical lowercase name, as the engine reports it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Signet => "signet",
            Network::Regtest => "regtest",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" | "bitcoin" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "signet" => Ok(Network::Signet),
            "regtest" => Ok(Network::Regtest),
            other => Err(UnknownNetwork(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// PeerInfo — a peer as reported by the engine
// ---------------------------------------------------------------------------

/// A Lightning peer known to the engine.
///
/// Fetched on every refresh and replaced wholesale — the UI never merges
/// peer state locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerInfo {
    /// The peer's node public key.
    pub pubkey: Pubkey,
    /// Optional human-readable alias advertised by the peer.
    pub alias: Option<String>,
    /// Whether a transport connection to the peer is currently up.
    pub is_connected: bool,
}

impl PeerInfo {
    /// The label shown in the peer list: the alias when the peer advertises
    /// one, otherwise the pubkey.
    pub fn display_label(&self) -> &str {
        match &self.alias {
            Some(alias) => alias.as_str(),
            None => self.pubkey.as_str(),
        }
    }
}

// ---------------------------------------------------------------------------
// ChannelInfo — a payment channel as reported by the engine
// ---------------------------------------------------------------------------

/// A payment channel known to the engine.
///
/// The detail view renders this struct verbatim (pretty JSON), so the field
/// names here are user-visible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// The remote peer's node public key.
    pub peer: Pubkey,
    /// The channel's funding output.
    pub outpoint: OutPoint,
    /// Total channel capacity in satoshis.
    pub size_sats: u64,
    /// Our spendable balance in satoshis.
    pub balance_sats: u64,
    /// Whether the funding transaction has confirmed.
    pub confirmed: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TXID: &str = "3f2a1c9e8d7b6a5f4e3d2c1b0a9f8e7d6c5b4a3f2e1d0c9b8a7f6e5d4c3b2a1f";

    #[test]
    fn pubkey_display() {
        let pk = Pubkey::new("02abcd");
        assert_eq!(pk.to_string(), "02abcd");
    }

    #[test]
    fn outpoint_parse_and_display() {
        let op: OutPoint = format!("{TXID}:1").parse().unwrap();
        assert_eq!(op.txid(), TXID);
        assert_eq!(op.vout(), 1);
        assert_eq!(op.to_string(), format!("{TXID}:1"));
    }

    #[test]
    fn outpoint_missing_separator_rejected() {
        assert!(matches!(
            TXID.parse::<OutPoint>(),
            Err(OutPointParseError::MissingSeparator)
        ));
    }

    #[test]
    fn outpoint_short_txid_rejected() {
        assert!(matches!(
            "abc123:0".parse::<OutPoint>(),
            Err(OutPointParseError::InvalidTxid(_))
        ));
    }

    #[test]
    fn outpoint_bad_index_rejected() {
        assert!(matches!(
            format!("{TXID}:x").parse::<OutPoint>(),
            Err(OutPointParseError::InvalidIndex(_))
        ));
    }

    #[test]
    fn outpoint_serializes_as_string() {
        let op = OutPoint::new(TXID, 0);
        let json = serde_json::to_string(&op).unwrap();
        assert_eq!(json, format!("\"{TXID}:0\""));
        let parsed: OutPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, op);
    }

    #[test]
    fn network_parse_and_display() {
        assert_eq!("mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        // Core-style naming is accepted too
        assert_eq!("bitcoin".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("signet".parse::<Network>().unwrap(), Network::Signet);
        assert_eq!(Network::Testnet.to_string(), "testnet");
    }

    #[test]
    fn network_unknown_rejected() {
        assert!("litecoin".parse::<Network>().is_err());
    }

    #[test]
    fn peer_display_label_prefers_alias() {
        let mut peer = PeerInfo {
            pubkey: Pubkey::new("02abcd"),
            alias: Some("ACINQ".to_string()),
            is_connected: true,
        };
        assert_eq!(peer.display_label(), "ACINQ");
        peer.alias = None;
        assert_eq!(peer.display_label(), "02abcd");
    }

    #[test]
    fn channel_serde_json_roundtrip() {
        let ch = ChannelInfo {
            peer: Pubkey::new("02abcd"),
            outpoint: OutPoint::new(TXID, 0),
            size_sats: 1_000_000,
            balance_sats: 250_000,
            confirmed: true,
        };
        let json = serde_json::to_string(&ch).unwrap();
        let parsed: ChannelInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.peer, ch.peer);
        assert_eq!(parsed.outpoint, ch.outpoint);
        assert_eq!(parsed.size_sats, 1_000_000);
    }
}
