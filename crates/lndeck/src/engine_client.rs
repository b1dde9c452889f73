//! RPC client for the wallet engine daemon.
//!
//! Connects to the engine's Unix domain socket and speaks the JSON-lines
//! protocol from `lndeck_core::rpc`.
//!
//! # Architecture
//!
//! The socket is owned by a single **actor task** ([`EngineClient::run`])
//! that processes one call at a time: write the request line, read the
//! reply line, hand the result back. UI code holds a cheap, cloneable
//! [`EngineHandle`] that submits calls over an mpsc channel with a oneshot
//! for the reply.
//!
//! Funneling every call through one actor serializes all engine access —
//! however many panels want a refresh at once, the engine sees one request
//! at a time, in order.

use async_trait::async_trait;
use lndeck_core::engine::{EngineError, WalletEngine};
use lndeck_core::rpc::{self, EngineReply, EngineRequest, RpcError, MAX_RPC_LINE_LENGTH};
use lndeck_core::types::{ChannelInfo, Network, NodeId, OutPoint, PeerInfo, Pubkey};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, ReadHalf, WriteHalf};
use tokio::net::UnixStream;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// Errors that can occur while establishing the engine connection.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("could not connect to engine at {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("engine daemon is not running (socket not found at {0})")]
    EngineNotRunning(PathBuf),
}

/// One in-flight RPC call: the request plus the channel its reply goes to.
struct RpcCall {
    request: EngineRequest,
    reply_tx: oneshot::Sender<Result<EngineReply, EngineError>>,
}

/// The actor owning the engine socket.
struct EngineClient {
    /// Buffered reader for receiving JSON lines from the engine.
    reader: BufReader<ReadHalf<UnixStream>>,
    /// Writer for sending JSON lines to the engine.
    writer: WriteHalf<UnixStream>,
    /// Buffer reused for reading lines (avoids repeated allocation).
    line_buf: String,
}

impl EngineClient {
    /// Connects to the engine at the given socket path.
    ///
    /// Returns a helpful error if the daemon is not running.
    async fn connect(path: &Path) -> Result<Self, ConnectError> {
        if !path.exists() {
            return Err(ConnectError::EngineNotRunning(path.to_owned()));
        }

        let stream = UnixStream::connect(path)
            .await
            .map_err(|e| ConnectError::Connect {
                path: path.to_owned(),
                source: e,
            })?;

        let (reader, writer) = tokio::io::split(stream);
        let reader = BufReader::new(reader);

        debug!(path = %path.display(), "connected to engine");

        Ok(Self {
            reader,
            writer,
            line_buf: String::with_capacity(4096),
        })
    }

    /// Sends one request and reads its reply.
    async fn round_trip(&mut self, request: &EngineRequest) -> Result<EngineReply, EngineError> {
        let json = rpc::encode_request(request).map_err(map_rpc_error)?;
        self.writer.write_all(json.as_bytes()).await?;
        self.writer.flush().await?;

        self.line_buf.clear();
        let bytes_read = self.reader.read_line(&mut self.line_buf).await?;
        if bytes_read == 0 {
            return Err(EngineError::Disconnected);
        }
        if bytes_read > MAX_RPC_LINE_LENGTH {
            return Err(EngineError::Transport(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("engine reply exceeds {MAX_RPC_LINE_LENGTH} bytes"),
            )));
        }
        rpc::decode_reply(&self.line_buf).map_err(map_rpc_error)
    }

    /// Processes calls one at a time until every handle is dropped.
    async fn run(mut self, mut calls: mpsc::Receiver<RpcCall>) {
        while let Some(call) = calls.recv().await {
            let result = self.round_trip(&call.request).await;
            // The caller may have been dropped (e.g. the app quit while a
            // call was in flight) — the completion is simply discarded.
            let _ = call.reply_tx.send(result);
        }
        debug!("engine client actor stopped");
    }
}

fn map_rpc_error(e: RpcError) -> EngineError {
    match e {
        RpcError::Json(e) => EngineError::Codec(e),
        RpcError::LineTooLong { size, max } => EngineError::Transport(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("RPC line too long: {size} bytes (max {max})"),
        )),
    }
}

/// Cloneable handle to the engine actor.
///
/// This is the concrete [`WalletEngine`] implementation the app runs
/// against in production.
#[derive(Clone)]
pub struct EngineHandle {
    calls: mpsc::Sender<RpcCall>,
}

/// Connects to the engine socket and spawns the client actor.
pub async fn connect(path: &Path) -> Result<EngineHandle, ConnectError> {
    let client = EngineClient::connect(path).await?;
    let (calls_tx, calls_rx) = mpsc::channel(32);
    tokio::spawn(client.run(calls_rx));
    Ok(EngineHandle { calls: calls_tx })
}

impl EngineHandle {
    async fn call(&self, request: EngineRequest) -> Result<EngineReply, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.calls
            .send(RpcCall { request, reply_tx })
            .await
            .map_err(|_| EngineError::Disconnected)?;
        reply_rx.await.map_err(|_| EngineError::Disconnected)?
    }

    /// Calls an operation whose only success reply is `Ok`.
    async fn call_unit(
        &self,
        request: EngineRequest,
        operation: &'static str,
    ) -> Result<(), EngineError> {
        match self.call(request).await? {
            EngineReply::Ok => Ok(()),
            EngineReply::Error { code, message } => Err(EngineError::from_engine(code, message)),
            _ => Err(EngineError::UnexpectedReply { operation }),
        }
    }
}

#[async_trait]
impl WalletEngine for EngineHandle {
    async fn list_nodes(&self) -> Result<Vec<NodeId>, EngineError> {
        match self.call(EngineRequest::ListNodes).await? {
            EngineReply::Nodes { nodes } => Ok(nodes),
            EngineReply::Error { code, message } => Err(EngineError::from_engine(code, message)),
            _ => Err(EngineError::UnexpectedReply {
                operation: "list_nodes",
            }),
        }
    }

    async fn list_peers(&self) -> Result<Vec<PeerInfo>, EngineError> {
        match self.call(EngineRequest::ListPeers).await? {
            EngineReply::Peers { peers } => Ok(peers),
            EngineReply::Error { code, message } => Err(EngineError::from_engine(code, message)),
            _ => Err(EngineError::UnexpectedReply {
                operation: "list_peers",
            }),
        }
    }

    async fn connect_peer(&self, node: &NodeId, uri: &str) -> Result<(), EngineError> {
        self.call_unit(
            EngineRequest::ConnectPeer {
                node: node.clone(),
                uri: uri.to_string(),
            },
            "connect_peer",
        )
        .await
    }

    async fn disconnect_peer(&self, node: &NodeId, pubkey: &Pubkey) -> Result<(), EngineError> {
        self.call_unit(
            EngineRequest::DisconnectPeer {
                node: node.clone(),
                pubkey: pubkey.clone(),
            },
            "disconnect_peer",
        )
        .await
    }

    async fn delete_peer(&self, node: &NodeId, pubkey: &Pubkey) -> Result<(), EngineError> {
        self.call_unit(
            EngineRequest::DeletePeer {
                node: node.clone(),
                pubkey: pubkey.clone(),
            },
            "delete_peer",
        )
        .await
    }

    async fn list_channels(&self) -> Result<Vec<ChannelInfo>, EngineError> {
        match self.call(EngineRequest::ListChannels).await? {
            EngineReply::Channels { channels } => Ok(channels),
            EngineReply::Error { code, message } => Err(EngineError::from_engine(code, message)),
            _ => Err(EngineError::UnexpectedReply {
                operation: "list_channels",
            }),
        }
    }

    async fn open_channel(
        &self,
        node: &NodeId,
        pubkey: &Pubkey,
        amount_sats: u64,
    ) -> Result<ChannelInfo, EngineError> {
        match self
            .call(EngineRequest::OpenChannel {
                node: node.clone(),
                pubkey: pubkey.clone(),
                amount_sats,
            })
            .await?
        {
            EngineReply::ChannelOpened { channel } => Ok(channel),
            EngineReply::Error { code, message } => Err(EngineError::from_engine(code, message)),
            _ => Err(EngineError::UnexpectedReply {
                operation: "open_channel",
            }),
        }
    }

    async fn close_channel(&self, outpoint: &OutPoint) -> Result<(), EngineError> {
        self.call_unit(
            EngineRequest::CloseChannel {
                outpoint: outpoint.clone(),
            },
            "close_channel",
        )
        .await
    }

    async fn network(&self) -> Result<Network, EngineError> {
        match self.call(EngineRequest::GetNetwork).await? {
            EngineReply::Network { network } => Ok(network),
            EngineReply::Error { code, message } => Err(EngineError::from_engine(code, message)),
            _ => Err(EngineError::UnexpectedReply {
                operation: "network",
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::UnixListener;

    /// Spawns a fake engine on a fresh socket: accepts one client and
    /// answers every request through `reply_for`.
    async fn fake_engine(
        reply_for: fn(&EngineRequest) -> EngineReply,
    ) -> (tempfile::TempDir, EngineHandle) {
        let tmp = tempfile::TempDir::new().unwrap();
        let socket = tmp.path().join("engine.sock");
        let listener = UnixListener::bind(&socket).unwrap();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (reader, mut writer) = tokio::io::split(stream);
            let mut reader = BufReader::new(reader);
            let mut line = String::new();
            loop {
                line.clear();
                if reader.read_line(&mut line).await.unwrap() == 0 {
                    return;
                }
                let request = rpc::decode_request(&line).unwrap();
                let reply = rpc::encode_reply(&reply_for(&request)).unwrap();
                writer.write_all(reply.as_bytes()).await.unwrap();
            }
        });

        let handle = connect(&socket).await.unwrap();
        (tmp, handle)
    }

    #[tokio::test]
    async fn list_peers_round_trips() {
        let (_tmp, engine) = fake_engine(|request| match request {
            EngineRequest::ListPeers => EngineReply::Peers {
                peers: vec![PeerInfo {
                    pubkey: Pubkey::new("02abcd"),
                    alias: Some("ACINQ".to_string()),
                    is_connected: true,
                }],
            },
            _ => EngineReply::Ok,
        })
        .await;

        let peers = engine.list_peers().await.unwrap();
        assert_eq!(peers.len(), 1);
        assert_eq!(peers[0].display_label(), "ACINQ");
    }

    #[tokio::test]
    async fn engine_failure_surfaces_code_and_message() {
        let (_tmp, engine) = fake_engine(|_| EngineReply::Error {
            code: "insufficient_funds".to_string(),
            message: "not enough confirmed sats".to_string(),
        })
        .await;

        let err = engine
            .open_channel(&NodeId::new("n"), &Pubkey::new("02ab"), 100_000)
            .await
            .unwrap_err();
        match err {
            EngineError::Engine { code, message } => {
                assert_eq!(code, "insufficient_funds");
                assert_eq!(message, "not enough confirmed sats");
            }
            other => panic!("expected Engine error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn mismatched_reply_is_rejected() {
        // A unit reply to a listing request must not be swallowed
        let (_tmp, engine) = fake_engine(|_| EngineReply::Ok).await;
        let err = engine.list_channels().await.unwrap_err();
        assert!(matches!(err, EngineError::UnexpectedReply { .. }));
    }

    #[tokio::test]
    async fn missing_socket_is_a_clear_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let missing = tmp.path().join("nope.sock");
        let err = match connect(&missing).await {
            Ok(_) => panic!("expected connection to fail"),
            Err(e) => e,
        };
        match err {
            ConnectError::EngineNotRunning(path) => assert_eq!(path, missing),
            other => panic!("expected EngineNotRunning, got {other:?}"),
        }
    }
}
