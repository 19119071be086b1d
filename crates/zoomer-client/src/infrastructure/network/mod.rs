//! Network infrastructure for the client.
//!
//! Handles the TCP connection to the server and forwards decoded restriction
//! messages to the main loop.
//!
//! Architecture:
//! - `ClientConnection` runs a reconnect loop on its own task.
//! - Frames are read and their payloads decoded on that task; decoding
//!   touches no shared state.
//! - Malformed frames are dropped here and never reach the main loop.
//! - Everything else is forwarded, in receipt order, as [`NetworkEvent`]s on
//!   an `mpsc` channel whose single consumer owns the restriction state.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::{
    io::{AsyncRead, AsyncReadExt},
    net::TcpStream,
    sync::mpsc,
    time,
};
use tracing::{debug, error, info, warn};
use zoomer_core::protocol::frame::{
    parse_channel, read_channel_len, read_payload_len, CHANNEL_LEN_SIZE, PAYLOAD_LEN_SIZE,
};
use zoomer_core::protocol::Frame;
use zoomer_core::{decode_inbound, ProtocolError, RestrictionMessage};

/// Default server port.
pub const DEFAULT_PORT: u16 = 25565;

/// Errors that can occur in the client network layer.
#[derive(Debug, Error)]
pub enum ClientNetworkError {
    /// TCP connection to the server failed.
    #[error("failed to connect to server at {addr}: {source}")]
    ConnectFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    /// An I/O error occurred on the established connection.
    #[error("connection I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The framing was invalid; the stream cannot be resynchronised.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Configuration for the client's network connection.
#[derive(Debug, Clone)]
pub struct ClientConnectionConfig {
    /// Address of the server.
    pub server_addr: SocketAddr,
    /// Reconnect interval when the connection drops.
    pub reconnect_interval: Duration,
}

impl Default for ClientConnectionConfig {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            reconnect_interval: Duration::from_secs(5),
        }
    }
}

/// Events emitted by the network layer to the main loop.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkEvent {
    /// The TCP connection was established.
    Connected { server_addr: SocketAddr },
    /// A well-formed restriction message was received.
    Restriction(RestrictionMessage),
    /// The TCP connection was lost.
    Disconnected,
}

/// Manages the TCP connection from the client to the server.
pub struct ClientConnection {
    config: ClientConnectionConfig,
}

impl ClientConnection {
    /// Creates a new (not yet connected) `ClientConnection`.
    pub fn new(config: ClientConnectionConfig) -> Self {
        Self { config }
    }

    /// Starts the reconnect loop on a background task.
    ///
    /// Returns a channel receiver that delivers [`NetworkEvent`]s to the
    /// caller.  Every `Connected` is eventually followed by exactly one
    /// `Disconnected`.  The loop stops once `running` is cleared or the
    /// receiver is dropped.
    pub fn start(self: Arc<Self>, running: Arc<AtomicBool>) -> mpsc::Receiver<NetworkEvent> {
        let (tx, rx) = mpsc::channel(128);
        let this = Arc::clone(&self);

        tokio::spawn(async move {
            while running.load(Ordering::Relaxed) {
                let addr = this.config.server_addr;
                match this.connect().await {
                    Ok(stream) => {
                        info!("connected to server at {addr}");
                        if tx
                            .send(NetworkEvent::Connected { server_addr: addr })
                            .await
                            .is_err()
                        {
                            break;
                        }

                        let receiver_open = read_loop(stream, &tx).await;

                        if tx.send(NetworkEvent::Disconnected).await.is_err() || !receiver_open {
                            break;
                        }
                        info!(
                            "disconnected from server; reconnecting in {:?}",
                            this.config.reconnect_interval
                        );
                    }
                    Err(e) => warn!("{e}"),
                }

                if running.load(Ordering::Relaxed) {
                    time::sleep(this.config.reconnect_interval).await;
                }
            }
            debug!("network loop stopped");
        });

        rx
    }

    async fn connect(&self) -> Result<TcpStream, ClientNetworkError> {
        let addr = self.config.server_addr;
        TcpStream::connect(addr)
            .await
            .map_err(|source| ClientNetworkError::ConnectFailed { addr, source })
    }
}

/// Reads frames from `reader` until the stream ends and forwards decoded
/// messages on `tx`.
///
/// Returns `false` if the receiver went away.
async fn read_loop<R: AsyncRead + Unpin>(mut reader: R, tx: &mpsc::Sender<NetworkEvent>) -> bool {
    loop {
        match read_frame(&mut reader).await {
            Ok(Some(frame)) => {
                let Some(message) = decode_inbound(&frame.channel, &frame.payload) else {
                    continue;
                };
                if tx.send(NetworkEvent::Restriction(message)).await.is_err() {
                    return false;
                }
            }
            Ok(None) => return true,
            Err(ClientNetworkError::Protocol(e)) => {
                warn!("closing connection after invalid frame: {e}");
                return true;
            }
            Err(e) => {
                error!("read error on server connection: {e}");
                return true;
            }
        }
    }
}

/// Reads one frame.
///
/// Returns `Ok(None)` when the stream ends cleanly between frames.
///
/// # Errors
///
/// [`ClientNetworkError::Io`] if the stream fails or ends inside a frame,
/// [`ClientNetworkError::Protocol`] for oversized or non-UTF-8 fields.
pub async fn read_frame<R: AsyncRead + Unpin>(
    reader: &mut R,
) -> Result<Option<Frame>, ClientNetworkError> {
    let mut channel_prefix = [0u8; CHANNEL_LEN_SIZE];
    match reader.read_exact(&mut channel_prefix).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }
    let channel_len = read_channel_len(channel_prefix)?;

    let mut channel = vec![0u8; channel_len];
    reader.read_exact(&mut channel).await?;
    let channel = parse_channel(&channel)?;

    let mut payload_prefix = [0u8; PAYLOAD_LEN_SIZE];
    reader.read_exact(&mut payload_prefix).await?;
    let payload_len = read_payload_len(payload_prefix)?;

    let mut payload = vec![0u8; payload_len];
    reader.read_exact(&mut payload).await?;

    Ok(Some(Frame { channel, payload }))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
