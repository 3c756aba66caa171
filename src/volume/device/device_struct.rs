// The disk, as far as anyone above this file is concerned.

use std::fs::File;

/// Thin wrapper around the backing image: positional reads and writes on a
/// plain `File`, nothing else. No caching, no interpretation of the bytes.
///
/// Positional I/O means no seek state, which means `&self` everywhere.
pub(crate) struct BlockDevice {
    pub(super) file: File,
}
