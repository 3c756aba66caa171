// Errors from the volume manager and the tables below it.

use thiserror::Error;

use crate::error_types::device::DeviceError;
use crate::volume::layout::layout_struct::GeometryError;
use crate::volume::nodes::node_struct::ChainFault;

/// Everything a volume operation can fail with.
///
/// Each operation either succeeds or signals exactly one of these. Nothing
/// is retried internally; the caller decides what a rejection means.
#[derive(Debug, Error)]
pub enum VolumeError {
    #[error("invalid filename: {0}")]
    InvalidName(NameFault),
    #[error("file not found")]
    NotFound,
    #[error("file already exists")]
    AlreadyExists,
    #[error("{0}")]
    NoSpace(SpaceFault),
    #[error("file is corrupt: {0}")]
    Corrupt(ChainFault),
    #[error(transparent)]
    Io(DeviceError),
}

/// Reasons a filename is rejected before it ever touches a table.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NameFault {
    #[error("name is empty")]
    Empty,
    #[error("name is only whitespace")]
    Blank,
    #[error("name is longer than 11 bytes")]
    TooLong,
    #[error("name contains a non-printable or non-ASCII byte")]
    Unprintable,
}

/// Which table ran out.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SpaceFault {
    #[error("no free file entries")]
    Entries,
    #[error("insufficient free blocks")]
    Blocks,
}

/// Why a volume could not be opened.
///
/// Distinct from [`VolumeError`]: these only happen at construction, before
/// there is a volume to operate on.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error(transparent)]
    Geometry(GeometryError),
    #[error(transparent)]
    Io(DeviceError),
}
