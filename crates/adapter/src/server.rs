//! Server for the tile-match adapter
//!
//! Each connection owns its own [`Session`]; nothing is shared between connections.
//! Uses tokio for async networking.

use std::net::SocketAddr;

use anyhow::Context;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::core::{ConfigError, GameConfig, Session};
use crate::protocol::*;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
    /// Serve stdin/stdout instead of listening on TCP
    pub stdio: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            protocol_version: PROTOCOL_VERSION.to_string(),
            stdio: false,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    ///
    /// - `TILE_MATCH_HOST`: bind address (default: "127.0.0.1")
    /// - `TILE_MATCH_PORT`: port number (default: 7878, 0 picks a free port)
    /// - `TILE_MATCH_STDIO`: "1" or "true" to serve stdin/stdout
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("TILE_MATCH_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        {
            config.host = host;
        }
        if let Some(raw) = lookup("TILE_MATCH_PORT") {
            config.port = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "TILE_MATCH_PORT",
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = lookup("TILE_MATCH_STDIO") {
            config.stdio = matches!(raw.trim().to_lowercase().as_str(), "1" | "true");
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Start the TCP server.
///
/// `ready_tx` receives the bound address once the listener is up.
pub async fn run_server(
    config: ServerConfig,
    game: GameConfig,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    game.validate().context("invalid game configuration")?;

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    let bound = listener.local_addr()?;
    info!(%bound, "TCP server listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let mut client_id_counter = 0u32;

    // Accept incoming connections
    loop {
        let (socket, peer) = listener.accept().await?;
        client_id_counter = client_id_counter.wrapping_add(1);
        let client_id = client_id_counter;

        info!(client_id, %peer, "client connected");

        // Distinct seed per connection so parallel clients do not mirror each other
        let game = game.clone().with_seed(game.seed.wrapping_add(client_id.wrapping_sub(1)));
        let protocol_version = config.protocol_version.clone();

        tokio::spawn(async move {
            let (reader, writer) = socket.into_split();
            let reader = BufReader::new(reader);
            if let Err(e) = serve_connection(reader, writer, game, &protocol_version).await {
                warn!(client_id, error = %e, "client error");
            }
            info!(client_id, "client disconnected");
        });
    }
}

/// Serve a single client over stdin/stdout
pub async fn run_stdio(config: ServerConfig, game: GameConfig) -> anyhow::Result<()> {
    info!("serving stdin/stdout");
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();
    serve_connection(reader, writer, game, &config.protocol_version).await
}

/// Line writer reusing one serialization buffer
struct LineWriter<W> {
    writer: W,
    buf: Vec<u8>,
}

impl<W: AsyncWrite + Unpin> LineWriter<W> {
    fn new(writer: W) -> Self {
        Self {
            writer,
            buf: Vec::with_capacity(4096),
        }
    }

    async fn send<T: Serialize>(&mut self, msg: &T) -> anyhow::Result<()> {
        self.buf.clear();
        serde_json::to_writer(&mut self.buf, msg)?;
        self.buf.push(b'\n');
        self.writer.write_all(&self.buf).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// Drive one session from a line-delimited JSON stream until EOF.
///
/// Protocol problems are answered with `error` messages; only I/O failures and a
/// protocol version mismatch end the connection early.
pub async fn serve_connection<R, W>(
    mut reader: R,
    writer: W,
    game: GameConfig,
    protocol_version: &str,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut session = Session::new(game).context("failed to create session")?;
    let mut out = LineWriter::new(writer);
    let mut handshaken = false;
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            // Client disconnected
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let parsed = match parse_message(trimmed) {
            Ok(ParsedMessage::Unknown(unknown)) => {
                warn!(msg_type = %unknown.msg_type, "unknown message type");
                let error = create_error(
                    unknown.seq,
                    ErrorCode::InvalidMessage,
                    &format!("Unknown message type {}", unknown.msg_type),
                );
                out.send(&error).await?;
                continue;
            }
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "malformed client line");
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                let error = create_error(seq, ErrorCode::InvalidMessage, &e.to_string());
                out.send(&error).await?;
                continue;
            }
        };

        if let ParsedMessage::Hello(hello) = &parsed {
            if !is_compatible_version(&hello.protocol_version) {
                let error = create_error(
                    hello.seq,
                    ErrorCode::ProtocolMismatch,
                    &format!("Protocol version {} not supported", hello.protocol_version),
                );
                out.send(&error).await?;
                break;
            }

            handshaken = true;
            info!(client = %hello.client.name, version = %hello.client.version, "handshake");
            out.send(&create_welcome(hello.seq, protocol_version, session.config()))
                .await?;
            out.send(&create_observation(hello.seq, &session.snapshot()))
                .await?;
            continue;
        }

        if !handshaken {
            let error = create_error(
                seq_of(&parsed),
                ErrorCode::HandshakeRequired,
                "Send hello before any command",
            );
            out.send(&error).await?;
            continue;
        }

        match parsed {
            ParsedMessage::Select(msg) => {
                let outcome = session.select(msg.position());
                debug!(seq = msg.seq, ?outcome, "select");
                out.send(&create_outcome(msg.seq, &outcome, session.last_cascade()))
                    .await?;
            }
            ParsedMessage::Swap(msg) => {
                let outcome = session.swap(msg.from.into(), msg.to.into());
                debug!(seq = msg.seq, ?outcome, "swap");
                out.send(&create_outcome(msg.seq, &outcome, session.last_cascade()))
                    .await?;
            }
            ParsedMessage::Settle(_) => {
                session.settle();
            }
            ParsedMessage::Reset(_) => {
                session.reset();
            }
            ParsedMessage::Observe(_) | ParsedMessage::Hello(_) | ParsedMessage::Unknown(_) => {}
        }

        out.send(&create_observation(seq_of(&parsed), &session.snapshot()))
            .await?;
    }

    Ok(())
}

fn seq_of(msg: &ParsedMessage) -> u64 {
    match msg {
        ParsedMessage::Hello(m) => m.seq,
        ParsedMessage::Select(m) => m.seq,
        ParsedMessage::Swap(m) => m.seq,
        ParsedMessage::Settle(m) | ParsedMessage::Reset(m) | ParsedMessage::Observe(m) => m.seq,
        ParsedMessage::Unknown(m) => m.seq,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr(), "127.0.0.1:7878");
        assert!(!config.stdio);
    }

    #[test]
    fn test_config_from_lookup() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("TILE_MATCH_HOST", "0.0.0.0"),
            ("TILE_MATCH_PORT", "9000"),
            ("TILE_MATCH_STDIO", "true"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert!(config.stdio);

        assert!(matches!(
            ServerConfig::from_lookup(lookup_from(&[("TILE_MATCH_PORT", "http")])),
            Err(ConfigError::InvalidEnv {
                var: "TILE_MATCH_PORT",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_stream_without_hello_is_rejected() {
        let input: &[u8] = b"{\"type\":\"observe\",\"seq\":1}\n";
        let mut output = Vec::new();

        serve_connection(input, &mut output, GameConfig::default(), PROTOCOL_VERSION)
            .await
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["type"], "error");
        assert_eq!(lines[0]["code"], "handshake_required");
        assert_eq!(lines[0]["seq"], 1);
    }
}
