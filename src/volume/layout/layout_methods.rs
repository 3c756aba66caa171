// Offsets and the header codec.

// Imports

use super::layout_struct::Geometry;
use super::layout_struct::GeometryError;
use super::layout_struct::ENTRY_BYTES;
use super::layout_struct::HEADER_BYTES;
use super::layout_struct::MAGIC;
use super::layout_struct::NODE_BYTES;

// Implementations

impl Geometry {
    /// Validate a parameter set. The volume must physically fit, and every
    /// block index must fit the signed 16-bit link field.
    pub(crate) fn new(
        total_bytes: u32,
        block_size: u32,
        max_files: u32,
        max_blocks: u32,
    ) -> Result<Geometry, GeometryError> {
        if total_bytes == 0 || block_size == 0 || max_files == 0 || max_blocks == 0 {
            return Err(GeometryError::NonPositive);
        }
        if max_blocks > i16::MAX as u32 {
            return Err(GeometryError::TooManyBlocks(max_blocks));
        }

        let needed = HEADER_BYTES as u64
            + ENTRY_BYTES as u64 * max_files as u64
            + NODE_BYTES as u64 * max_blocks as u64
            + block_size as u64 * max_blocks as u64;
        if needed > total_bytes as u64 {
            return Err(GeometryError::TooSmall { total_bytes, needed });
        }

        Ok(Geometry {
            total_bytes,
            block_size,
            max_files,
            max_blocks,
        })
    }

    /// Byte offset of the entry table.
    pub(crate) fn entries_off(&self) -> u64 {
        HEADER_BYTES as u64
    }

    /// Byte offset of the node table.
    pub(crate) fn nodes_off(&self) -> u64 {
        self.entries_off() + ENTRY_BYTES as u64 * self.max_files as u64
    }

    /// Byte offset of the data region.
    pub(crate) fn data_off(&self) -> u64 {
        self.nodes_off() + NODE_BYTES as u64 * self.max_blocks as u64
    }

    /// Byte offset of entry record `slot`.
    pub(crate) fn entry_pos(&self, slot: usize) -> u64 {
        self.entries_off() + ENTRY_BYTES as u64 * slot as u64
    }

    /// Byte offset of data block `block`.
    pub(crate) fn block_pos(&self, block: u16) -> u64 {
        self.data_off() + self.block_size as u64 * block as u64
    }

    /// Blocks a file of `size` bytes occupies. Zero-byte files occupy none.
    pub(crate) fn blocks_needed(&self, size: u16) -> u16 {
        let size = size as u32;
        ((size + self.block_size - 1) / self.block_size) as u16
    }

    /// Render the 24-byte header record.
    pub(crate) fn encode_header(&self) -> [u8; HEADER_BYTES] {
        let mut bytes = [0u8; HEADER_BYTES];
        bytes[0..4].copy_from_slice(&MAGIC.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.total_bytes.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.block_size.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.max_files.to_le_bytes());
        bytes[16..20].copy_from_slice(&self.max_blocks.to_le_bytes());
        // Bytes 20..24 are reserved and stay zero.
        bytes
    }

    /// Read a header record back. `None` when the magic is absent; the
    /// reserved word is not inspected.
    pub(crate) fn decode_header(bytes: &[u8; HEADER_BYTES]) -> Option<Geometry> {
        if u32::from_le_bytes(word(bytes, 0)) != MAGIC {
            return None;
        }
        Some(Geometry {
            total_bytes: u32::from_le_bytes(word(bytes, 4)),
            block_size: u32::from_le_bytes(word(bytes, 8)),
            max_files: u32::from_le_bytes(word(bytes, 12)),
            max_blocks: u32::from_le_bytes(word(bytes, 16)),
        })
    }
}

// Functions

fn word(bytes: &[u8; HEADER_BYTES], at: usize) -> [u8; 4] {
    [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]
}
