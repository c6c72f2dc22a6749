//! Error types for the migration layer.
//!
//! Every adapter validates its arguments before touching the driver and
//! fails fast with an `InvalidArgument`-kind error; driver failures are
//! propagated with their verbatim status code. `NotReady` is the legitimate
//! outcome of a zero-timeout poll, not a fault.

use thiserror::Error;

use crate::hal::{status, HalError};

/// Result type alias for migration-layer operations.
pub type Result<T> = std::result::Result<T, CompatError>;

/// Errors produced by the migration layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompatError {
    /// Board handle outside the hardware address range.
    #[error("board handle {board} is out of range (valid handles are 0-15)")]
    InvalidBoard {
        /// The offending handle.
        board: u8,
    },

    /// Board handle is in range but no board answered at session open.
    #[error("board {board} was not detected when the session was opened")]
    BoardNotDetected {
        /// The undetected handle.
        board: u8,
    },

    /// Legacy DIO group index outside 0-2.
    #[error("invalid DIO group {group}: legacy groups are 0-2")]
    InvalidGroup {
        /// The offending group index.
        group: u16,
    },

    /// Channel number outside the legal range for the operation.
    #[error("invalid channel {channel}: this operation supports channels 0-{max}")]
    InvalidChannel {
        /// The offending channel.
        channel: u16,
        /// Highest legal channel.
        max: u16,
    },

    /// DAC setpoint outside the legacy signed range.
    #[error("DAC setpoint {setpoint} is outside the legacy range [-8191, +8191]")]
    InvalidSetpoint {
        /// The offending setpoint.
        setpoint: i32,
    },

    /// Legacy enumeration code outside its closed set.
    #[error("invalid legacy code {code}: legal codes are 0-{max}")]
    InvalidCode {
        /// The offending code.
        code: u16,
        /// Highest legal code.
        max: u16,
    },

    /// Legacy watchdog period code outside the closed set 0-3.
    #[error("unknown watchdog period code {code}: legacy codes are 0-3")]
    InvalidPeriod {
        /// The offending period code.
        code: u16,
    },

    /// Programmed watchdog interval matches no legacy period code.
    ///
    /// The legacy 10 s period deliberately falls in this bucket when read
    /// back: the reverse translation recognizes only 125 ms, 500 ms and 1 s.
    #[error("watchdog interval of {ms} ms matches no legacy period code")]
    UnknownPeriod {
        /// The interval read back from the board, in milliseconds.
        ms: u32,
    },

    /// Poll list would overflow the 16 hardware time slots.
    #[error("poll list exceeds the 16 hardware slots without an end-of-list marker")]
    PollListTooLong,

    /// Poll list ended without an end-of-list marker.
    #[error("poll list has no end-of-list marker")]
    MissingEndOfList,

    /// A legacy interrupt callback was supplied.
    #[error("interrupt callbacks are not supported: the 826 driver uses blocking calls")]
    CallbacksUnsupported,

    /// A non-blocking poll found no data or event yet.
    #[error("not ready: no data or event available yet")]
    NotReady,

    /// A blocking wait was unblocked by an external cancellation signal.
    #[error("blocking wait was cancelled")]
    Cancelled,

    /// The legacy operation has no behavioral equivalent on the 826.
    #[error("{operation} has no 826 equivalent; see {hint}")]
    Unsupported {
        /// Legacy entry point name.
        operation: &'static str,
        /// Closest modern primitive.
        hint: &'static str,
    },

    /// The 826 driver reported a failure; the code is passed through verbatim.
    #[error("826 driver reported error code {code}")]
    Device {
        /// Raw driver status code.
        code: i32,
    },
}

/// Coarse classification of a [`CompatError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller-supplied value outside its legal domain.
    InvalidArgument,
    /// Non-blocking poll found nothing; retry later.
    NotReady,
    /// No modern equivalent exists for the legacy operation.
    Unsupported,
    /// A blocking wait was cancelled externally.
    Cancelled,
    /// The driver reported a failure.
    Device,
}

impl CompatError {
    /// Classify this error into the coarse taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidBoard { .. }
            | Self::InvalidGroup { .. }
            | Self::InvalidChannel { .. }
            | Self::InvalidSetpoint { .. }
            | Self::InvalidCode { .. }
            | Self::InvalidPeriod { .. }
            | Self::UnknownPeriod { .. }
            | Self::PollListTooLong
            | Self::MissingEndOfList
            | Self::CallbacksUnsupported => ErrorKind::InvalidArgument,
            Self::BoardNotDetected { .. } | Self::NotReady => ErrorKind::NotReady,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Device { .. } => ErrorKind::Device,
        }
    }

    /// Render this error as an 826-style integer status code, for ported
    /// code that still branches on the legacy numeric contract.
    pub fn legacy_code(&self) -> i32 {
        match self {
            Self::Device { code } => *code,
            other => match other.kind() {
                ErrorKind::InvalidArgument | ErrorKind::Unsupported => status::ERR_VALUE,
                ErrorKind::NotReady => status::ERR_NOTREADY,
                ErrorKind::Cancelled => status::ERR_CANCELLED,
                ErrorKind::Device => status::ERR_DRIVER,
            },
        }
    }
}

impl From<HalError> for CompatError {
    fn from(err: HalError) -> Self {
        match err {
            HalError::NotReady => Self::NotReady,
            HalError::Cancelled => Self::Cancelled,
            other => Self::Device { code: other.code() },
        }
    }
}
