use lumen_ipc::{
    proto::{ProtocolError, ReplyStatus},
    transport::TransportError,
};
use snafu::Snafu;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub(crate)))]
pub enum CtlError {
    #[snafu(display("volume set takes exactly one argument, got {got}"))]
    VolumeArity { got: usize },

    #[snafu(display("invalid volume level {input:?}: expected a number in [0.0, 1.0]"))]
    BadVolume { input: String },

    #[snafu(context(false), display("{source}"))]
    Protocol { source: ProtocolError },

    #[snafu(context(false), display("{source}"))]
    Transport { source: TransportError },

    #[snafu(display("daemon rejected the request: {status:?}"))]
    Rejected { status: ReplyStatus },
}

impl CtlError {
    /// Exit codes, one per error class so scripts can tell "daemon
    /// unreachable" from "daemon unresponsive": 2 validation, 3
    /// configuration, 4 transport, 5 timeout, 6 rejected by the daemon.
    pub fn exit_code(&self) -> u8 {
        match self {
            CtlError::VolumeArity { .. }
            | CtlError::BadVolume { .. }
            | CtlError::Protocol { .. } => 2,
            CtlError::Transport { source } => match source {
                TransportError::RuntimeDirUnset
                | TransportError::SocketMissing { .. }
                | TransportError::NotASocket { .. } => 3,
                TransportError::Timeout { .. } => 5,
                _ => 4,
            },
            CtlError::Rejected { .. } => 6,
        }
    }
}
