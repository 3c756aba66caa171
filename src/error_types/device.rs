// Errors from the backing image file.

use thiserror::Error;

/// An I/O failure on the backing file, with the byte offset that failed.
///
/// The offset is the start of the transfer, not the exact byte the
/// operating system gave up on.
#[derive(Debug, Error)]
#[error("image I/O failed at byte offset {offset}: {source}")]
pub struct DeviceError {
    pub offset: u64,
    #[source]
    pub source: std::io::Error,
}

impl DeviceError {
    pub(crate) fn wrap(source: std::io::Error, offset: u64) -> Self {
        DeviceError { offset, source }
    }
}
