//! Wire protocol between `lumenctl` and the shell daemon.
//!
//! Every message is a single datagram: a fixed [`MessageHeader`] followed by
//! the payload for that command code (most codes carry none). The header is
//! self-describing — magic, version, code — so a receiver can reject foreign
//! or future traffic before it knows the payload shape, and new codes can be
//! added without breaking old peers. There are no sequence numbers or
//! checksums: one outstanding request per client socket is the entire
//! concurrency model.

use bytemuck::{Pod, Zeroable};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use snafu::{Snafu, ensure};

/// Every operation the daemon can be asked to perform, one code per CLI verb.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
pub enum CommandCode {
    MessageTrayOpen = 0,
    VolumeUp = 1,
    VolumeDown = 2,
    VolumeSet = 3,
    VolumeMute = 4,
    BrightnessUp = 5,
    BrightnessDown = 6,
    KeyboardBrightnessUp = 7,
    KeyboardBrightnessDown = 8,
    ThemeDark = 9,
    ThemeLight = 10,
    ThemeDumpDark = 11,
    ThemeDumpLight = 12,
    ActivitiesShow = 13,
    ActivitiesHide = 14,
    ActivitiesToggle = 15,
    AppSwitcherShow = 16,
    AppSwitcherHide = 17,
    AppSwitcherToggle = 18,
    WorkspaceSwitcherShow = 19,
    WorkspaceSwitcherHide = 20,
    WorkspaceSwitcherToggle = 21,
    OutputSwitcherShow = 22,
    OutputSwitcherHide = 23,
    OutputSwitcherToggle = 24,
    RenameSwitcherShow = 25,
    RenameSwitcherHide = 26,
    RenameSwitcherToggle = 27,
    WorkspaceAppSwitcherShow = 28,
    WorkspaceAppSwitcherHide = 29,
    WorkspaceAppSwitcherToggle = 30,
}

impl CommandCode {
    pub const ALL: [CommandCode; 31] = [
        CommandCode::MessageTrayOpen,
        CommandCode::VolumeUp,
        CommandCode::VolumeDown,
        CommandCode::VolumeSet,
        CommandCode::VolumeMute,
        CommandCode::BrightnessUp,
        CommandCode::BrightnessDown,
        CommandCode::KeyboardBrightnessUp,
        CommandCode::KeyboardBrightnessDown,
        CommandCode::ThemeDark,
        CommandCode::ThemeLight,
        CommandCode::ThemeDumpDark,
        CommandCode::ThemeDumpLight,
        CommandCode::ActivitiesShow,
        CommandCode::ActivitiesHide,
        CommandCode::ActivitiesToggle,
        CommandCode::AppSwitcherShow,
        CommandCode::AppSwitcherHide,
        CommandCode::AppSwitcherToggle,
        CommandCode::WorkspaceSwitcherShow,
        CommandCode::WorkspaceSwitcherHide,
        CommandCode::WorkspaceSwitcherToggle,
        CommandCode::OutputSwitcherShow,
        CommandCode::OutputSwitcherHide,
        CommandCode::OutputSwitcherToggle,
        CommandCode::RenameSwitcherShow,
        CommandCode::RenameSwitcherHide,
        CommandCode::RenameSwitcherToggle,
        CommandCode::WorkspaceAppSwitcherShow,
        CommandCode::WorkspaceAppSwitcherHide,
        CommandCode::WorkspaceAppSwitcherToggle,
    ];

    /// Payload length for this code; wire size is header + this, known at
    /// compile time per code.
    #[must_use]
    pub const fn payload_len(self) -> usize {
        match self {
            CommandCode::VolumeSet => size_of::<VolumePayload>(),
            _ => 0,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Zeroable, Pod)]
pub struct MessageHeader {
    pub magic: u32,
    pub version: u32,
    pub code: u32,
}

impl MessageHeader {
    pub const MAGIC: u32 = u32::from_be_bytes(*b"LUMN");
    pub const VERSION: u32 = 1;

    #[must_use]
    pub fn new(code: CommandCode) -> Self {
        Self {
            magic: Self::MAGIC,
            version: Self::VERSION,
            code: code.into(),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Zeroable, Pod)]
pub struct VolumePayload {
    pub level: f32,
}

pub const HEADER_LEN: usize = size_of::<MessageHeader>();

/// Largest possible request datagram. Kept a test away from the single
/// datagram guarantee so no fragmentation logic is ever needed.
pub const MAX_WIRE_LEN: usize = HEADER_LEN + size_of::<VolumePayload>();

#[derive(Snafu, Debug)]
pub enum ProtocolError {
    #[snafu(display("message truncated: got {got} bytes, need at least {need}"))]
    Truncated { got: usize, need: usize },

    #[snafu(display("bad magic {magic:#010x}"))]
    BadMagic { magic: u32 },

    #[snafu(display("unsupported protocol version {version}"))]
    BadVersion { version: u32 },

    #[snafu(display("unknown command code {code}"))]
    UnknownCode { code: u32 },

    #[snafu(display("wire length mismatch for {code:?}: got {got}, expected {expected}"))]
    LengthMismatch {
        code: CommandCode,
        got: usize,
        expected: usize,
    },

    #[snafu(display("command {code:?} requires a payload"))]
    PayloadRequired { code: CommandCode },

    #[snafu(display("volume level {level} outside [0.0, 1.0]"))]
    VolumeOutOfRange { level: f32 },

    #[snafu(display("unknown reply status {status}"))]
    UnknownStatus { status: u32 },
}

/// A request to the daemon: a command code plus its typed payload, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Request {
    Bare(CommandCode),
    VolumeSet { level: f32 },
}

impl Request {
    /// A request for a code that carries no payload.
    pub fn bare(code: CommandCode) -> Result<Self, ProtocolError> {
        ensure!(code.payload_len() == 0, PayloadRequiredSnafu { code });
        Ok(Request::Bare(code))
    }

    /// A volume-set request. The level is validated here, on the sending
    /// side; the wire itself does not enforce range, so [`decode`] applies
    /// the same check to be tolerant of misbehaving clients.
    ///
    /// [`decode`]: Self::decode
    pub fn volume_set(level: f32) -> Result<Self, ProtocolError> {
        ensure!(
            level.is_finite() && (0.0..=1.0).contains(&level),
            VolumeOutOfRangeSnafu { level }
        );
        Ok(Request::VolumeSet { level })
    }

    #[must_use]
    pub fn code(&self) -> CommandCode {
        match self {
            Request::Bare(code) => *code,
            Request::VolumeSet { .. } => CommandCode::VolumeSet,
        }
    }

    #[must_use]
    pub fn wire_len(&self) -> usize {
        HEADER_LEN + self.code().payload_len()
    }

    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let header = MessageHeader::new(self.code());
        let mut buf = Vec::with_capacity(self.wire_len());
        buf.extend_from_slice(bytemuck::bytes_of(&header));
        if let Request::VolumeSet { level } = *self {
            buf.extend_from_slice(bytemuck::bytes_of(&VolumePayload { level }));
        }
        buf
    }

    /// Decode one datagram. Rejects bad magic/version, unknown codes,
    /// over- or under-length messages, and out-of-range payloads.
    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        ensure!(
            buf.len() >= HEADER_LEN,
            TruncatedSnafu {
                got: buf.len(),
                need: HEADER_LEN,
            }
        );
        let header: MessageHeader = bytemuck::pod_read_unaligned(&buf[..HEADER_LEN]);
        ensure!(
            header.magic == MessageHeader::MAGIC,
            BadMagicSnafu {
                magic: header.magic,
            }
        );
        ensure!(
            header.version == MessageHeader::VERSION,
            BadVersionSnafu {
                version: header.version,
            }
        );
        let code = CommandCode::try_from(header.code).map_err(|_| {
            UnknownCodeSnafu {
                code: header.code,
            }
            .build()
        })?;
        let expected = HEADER_LEN + code.payload_len();
        ensure!(
            buf.len() == expected,
            LengthMismatchSnafu {
                code,
                got: buf.len(),
                expected,
            }
        );
        match code {
            CommandCode::VolumeSet => {
                let payload: VolumePayload = bytemuck::pod_read_unaligned(&buf[HEADER_LEN..]);
                Self::volume_set(payload.level)
            }
            _ => Ok(Request::Bare(code)),
        }
    }
}

/// Daemon acknowledgement status.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
pub enum ReplyStatus {
    Ok = 0,
    UnknownCommand = 1,
    InvalidPayload = 2,
    Failed = 3,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Zeroable, Pod)]
pub struct ReplyHeader {
    pub magic: u32,
    pub version: u32,
    pub status: u32,
}

pub const REPLY_LEN: usize = size_of::<ReplyHeader>();

/// The daemon's one-datagram answer to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    pub status: ReplyStatus,
}

impl Reply {
    #[must_use]
    pub fn new(status: ReplyStatus) -> Self {
        Self { status }
    }

    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let header = ReplyHeader {
            magic: MessageHeader::MAGIC,
            version: MessageHeader::VERSION,
            status: self.status.into(),
        };
        bytemuck::bytes_of(&header).to_vec()
    }

    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        ensure!(
            buf.len() == REPLY_LEN,
            TruncatedSnafu {
                got: buf.len(),
                need: REPLY_LEN,
            }
        );
        let header: ReplyHeader = bytemuck::pod_read_unaligned(buf);
        ensure!(
            header.magic == MessageHeader::MAGIC,
            BadMagicSnafu {
                magic: header.magic,
            }
        );
        ensure!(
            header.version == MessageHeader::VERSION,
            BadVersionSnafu {
                version: header.version,
            }
        );
        let status = ReplyStatus::try_from(header.status).map_err(|_| {
            UnknownStatusSnafu {
                status: header.status,
            }
            .build()
        })?;
        Ok(Self { status })
    }
}
