//! One-shot request/response over a connectionless unix datagram socket.
//!
//! The daemon listens on `$XDG_RUNTIME_DIR/lumen-shell.sock`. Each CLI
//! invocation binds its own client endpoint in the abstract namespace
//! (pid + random nonce) so the daemon can reply to the sender address
//! without tracking per-client state, and concurrent invocations never
//! interleave on a descriptor. One request, one reply, then the process
//! exits; the reply wait is bounded so a wedged daemon can't hang a
//! calling script forever.

use std::{
    os::linux::net::SocketAddrExt,
    os::unix::fs::FileTypeExt,
    os::unix::net::{SocketAddr, UnixDatagram as StdUnixDatagram},
    path::PathBuf,
    time::Duration,
};

use snafu::{Backtrace, ResultExt, Snafu, ensure};
use tokio::net::UnixDatagram;
use tracing::debug;

use crate::proto::{ProtocolError, REPLY_LEN, Reply, Request};

/// File name of the daemon's listening endpoint under `XDG_RUNTIME_DIR`.
pub const SOCKET_FILE_NAME: &str = "lumen-shell.sock";

/// How long to wait for the daemon's reply before giving up.
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Snafu, Debug)]
pub enum TransportError {
    #[snafu(display("XDG_RUNTIME_DIR is not set; cannot locate the shell daemon socket"))]
    RuntimeDirUnset,

    #[snafu(display("shell daemon socket {} does not exist (is the shell running?)", path.display()))]
    SocketMissing { path: PathBuf },

    #[snafu(display("{} exists but is not a socket", path.display()))]
    NotASocket { path: PathBuf },

    #[snafu(display("failed to bind client endpoint: {source}"))]
    Bind {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("failed to send request to {}: {source}", path.display()))]
    Send {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("failed to receive reply: {source}"))]
    Receive {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("no reply from the shell daemon within {limit:?}"))]
    Timeout { limit: Duration },

    #[snafu(display("malformed reply: {source}"))]
    MalformedReply { source: ProtocolError },
}

/// Daemon endpoint path derived from the well-known runtime directory.
pub fn default_socket_path() -> Result<PathBuf, TransportError> {
    let Some(dir) = std::env::var_os("XDG_RUNTIME_DIR") else {
        return RuntimeDirUnsetSnafu.fail();
    };
    Ok(PathBuf::from(dir).join(SOCKET_FILE_NAME))
}

/// A client-private datagram endpoint, used for exactly one exchange.
#[derive(Debug)]
pub struct IpcSession {
    socket: UnixDatagram,
    server_path: PathBuf,
    reply_timeout: Duration,
}

impl IpcSession {
    /// Bind a fresh client endpoint targeting the daemon at `server_path`.
    ///
    /// Verifies up front that the path exists and actually is a socket, so
    /// a stopped daemon is a configuration failure before any network
    /// activity, not a send error after.
    pub fn connect(server_path: PathBuf) -> Result<Self, TransportError> {
        match std::fs::metadata(&server_path) {
            Ok(meta) => ensure!(
                meta.file_type().is_socket(),
                NotASocketSnafu {
                    path: server_path.clone(),
                }
            ),
            Err(_) => return SocketMissingSnafu { path: server_path }.fail(),
        }

        let pid = rustix::process::getpid().as_raw_nonzero().get();
        let nonce: u32 = rand::random();
        let name = format!("lumenctl-{pid}-{nonce:08x}");
        let addr = SocketAddr::from_abstract_name(name.as_bytes()).context(BindSnafu)?;
        let std_socket = StdUnixDatagram::bind_addr(&addr).context(BindSnafu)?;
        std_socket.set_nonblocking(true).context(BindSnafu)?;
        let socket = UnixDatagram::from_std(std_socket).context(BindSnafu)?;
        debug!(client = %name, server = %server_path.display(), "bound client endpoint");

        Ok(Self {
            socket,
            server_path,
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_reply_timeout(mut self, limit: Duration) -> Self {
        self.reply_timeout = limit;
        self
    }

    #[must_use]
    pub fn server_path(&self) -> &std::path::Path {
        &self.server_path
    }

    /// Send exactly one request and block for exactly one reply.
    pub async fn roundtrip(&self, request: &Request) -> Result<Reply, TransportError> {
        // the endpoint can vanish between connect() and here
        ensure!(
            self.server_path.exists(),
            SocketMissingSnafu {
                path: self.server_path.clone(),
            }
        );

        let wire = request.encode();
        self.socket
            .send_to(&wire, &self.server_path)
            .await
            .context(SendSnafu {
                path: self.server_path.clone(),
            })?;
        debug!(code = ?request.code(), len = wire.len(), "request sent");

        // larger than any valid reply so an oversized datagram fails decode
        // instead of being silently truncated to a valid-looking prefix
        let mut buf = [0u8; 4 * REPLY_LEN];
        let received =
            tokio::time::timeout(self.reply_timeout, self.socket.recv_from(&mut buf)).await;
        let n = match received {
            Ok(io_result) => io_result.context(ReceiveSnafu)?.0,
            Err(_) => {
                return TimeoutSnafu {
                    limit: self.reply_timeout,
                }
                .fail();
            }
        };
        Reply::decode(&buf[..n]).context(MalformedReplySnafu)
    }
}
