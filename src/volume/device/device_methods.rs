// Reading and writing the backing image.

// Imports

use std::fs::OpenOptions;
use std::os::unix::fs::FileExt;
use std::path::Path;

use log::trace;

use crate::error_types::device::DeviceError;

use super::device_struct::BlockDevice;

// Implementations

impl BlockDevice {
    /// Open (or create) the backing image at `path`, read/write.
    /// A freshly created image has length zero; the caller grows it.
    pub(crate) fn open(path: &Path) -> Result<BlockDevice, DeviceError> {
        open_backing_file(path)
    }

    /// Current length of the backing image, in bytes.
    pub(crate) fn len(&self) -> Result<u64, DeviceError> {
        let metadata = self.file.metadata().map_err(|failed| DeviceError::wrap(failed, 0))?;
        Ok(metadata.len())
    }

    /// Grow the image to at least `wanted` bytes. Never truncates; new
    /// extent reads as zero.
    pub(crate) fn ensure_len(&self, wanted: u64) -> Result<(), DeviceError> {
        if self.len()? < wanted {
            trace!("Extending the backing image to {wanted} bytes");
            self.file
                .set_len(wanted)
                .map_err(|failed| DeviceError::wrap(failed, wanted))?;
        }
        Ok(())
    }

    /// Fill `buffer` from the image, starting at `offset`.
    pub(crate) fn read_at(&self, offset: u64, buffer: &mut [u8]) -> Result<(), DeviceError> {
        self.file
            .read_exact_at(buffer, offset)
            .map_err(|failed| DeviceError::wrap(failed, offset))
    }

    /// Write all of `bytes` to the image, starting at `offset`.
    pub(crate) fn write_at(&self, offset: u64, bytes: &[u8]) -> Result<(), DeviceError> {
        self.file
            .write_all_at(bytes, offset)
            .map_err(|failed| DeviceError::wrap(failed, offset))
    }
}

// Functions

fn open_backing_file(path: &Path) -> Result<BlockDevice, DeviceError> {
    trace!("Opening backing image at {}", path.display());
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|failed| DeviceError::wrap(failed, 0))?;
    Ok(BlockDevice { file })
}
