//! Block-explorer link building.
//!
//! Turns a funding transaction id into a clickable mempool.space URL so the
//! operator can watch a channel open or close confirm on chain. Pure string
//! construction, no error cases.

use crate::types::Network;

/// Default explorer base used when no override is configured.
pub const DEFAULT_EXPLORER_BASE: &str = "https://mempool.space";

/// Builds a transaction URL on the default explorer.
pub fn tx_url(txid: &str, network: Network) -> String {
    tx_url_with_base(DEFAULT_EXPLORER_BASE, txid, network)
}

/// Builds a transaction URL on a specific explorer instance.
///
/// Mainnet transactions live at the root; testnet and signet get a network
/// path segment. Regtest has no public explorer, so links only make sense
/// against a self-hosted `base` — which serves its one network at the root,
/// like mainnet.
pub fn tx_url_with_base(base: &str, txid: &str, network: Network) -> String {
    let base = base.trim_end_matches('/');
    match network {
        Network::Mainnet | Network::Regtest => format!("{base}/tx/{txid}"),
        Network::Testnet => format!("{base}/testnet/tx/{txid}"),
        Network::Signet => format!("{base}/signet/tx/{txid}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TXID: &str = "3f2a1c9e8d7b6a5f4e3d2c1b0a9f8e7d6c5b4a3f2e1d0c9b8a7f6e5d4c3b2a1f";

    #[test]
    fn mainnet_url_has_no_network_segment() {
        assert_eq!(
            tx_url(TXID, Network::Mainnet),
            format!("https://mempool.space/tx/{TXID}")
        );
    }

    #[test]
    fn signet_url_has_network_segment() {
        assert_eq!(
            tx_url(TXID, Network::Signet),
            format!("https://mempool.space/signet/tx/{TXID}")
        );
    }

    #[test]
    fn testnet_url_has_network_segment() {
        assert_eq!(
            tx_url(TXID, Network::Testnet),
            format!("https://mempool.space/testnet/tx/{TXID}")
        );
    }

    #[test]
    fn custom_base_trailing_slash_is_tolerated() {
        assert_eq!(
            tx_url_with_base("http://localhost:8080/", TXID, Network::Regtest),
            format!("http://localhost:8080/tx/{TXID}")
        );
    }
}
