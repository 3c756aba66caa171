// Errors the front-end reports to clients as `ERROR <msg>` lines.

use thiserror::Error;

/// A hex payload that is not actually hex.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum HexError {
    #[error("hex must have even length")]
    OddLength,
    #[error("'{0}' is not a hexadecimal digit")]
    BadDigit(char),
}

/// A command the client got wrong, or a per-connection bound it blew.
///
/// All of these render straight onto the wire, so the messages are written
/// for the person on the other end of the socket.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("empty command")]
    EmptyCommand,
    #[error("unknown command")]
    UnknownCommand,
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    BadHex(HexError),
    #[error("payload exceeds {0} bytes")]
    PayloadTooLarge(usize),
    #[error("line exceeds {0} bytes")]
    LineTooLong(usize),
    #[error("too many commands on this connection")]
    TooManyCommands,
}

impl ProtocolError {
    /// Bounds violations kill the connection; plain mistakes do not.
    pub(crate) fn is_fatal(&self) -> bool {
        matches!(
            self,
            ProtocolError::LineTooLong(_) | ProtocolError::TooManyCommands
        )
    }
}
