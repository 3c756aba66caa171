// Slot management and the entry record codec.

// Imports

use crate::error_types::volume::NameFault;
use crate::volume::layout::layout_struct::ENTRY_BYTES;
use crate::volume::layout::layout_struct::MAX_NAME_BYTES;
use crate::volume::layout::layout_struct::NAME_BYTES;

use super::entry_struct::Entry;
use super::entry_struct::EntryTable;

// Implementations

impl Entry {
    /// A free slot: empty name, zero size, no chain.
    pub(crate) fn free() -> Entry {
        Entry {
            name: String::new(),
            size: 0,
            first_block: None,
        }
    }

    pub(crate) fn is_free(&self) -> bool {
        self.name.is_empty()
    }

    /// Render the 16-byte entry record: NUL-padded name, then size, then
    /// the first-block link (-1 when there is none).
    pub(crate) fn encode(&self) -> [u8; ENTRY_BYTES] {
        let mut bytes = [0u8; ENTRY_BYTES];
        let name = self.name.as_bytes();
        let keep = name.len().min(MAX_NAME_BYTES);
        bytes[..keep].copy_from_slice(&name[..keep]);
        // Everything between the name and the size field stays NUL.
        bytes[NAME_BYTES..NAME_BYTES + 2].copy_from_slice(&self.size.to_le_bytes());
        let first = match self.first_block {
            Some(block) => block as i16,
            None => -1,
        };
        bytes[NAME_BYTES + 2..ENTRY_BYTES].copy_from_slice(&first.to_le_bytes());
        bytes
    }

    /// Read an entry record back. `bytes` must hold exactly one record.
    /// Name bytes stop at the first NUL; any negative link means no chain.
    pub(crate) fn decode(bytes: &[u8]) -> Entry {
        let name_field = &bytes[..NAME_BYTES];
        let name_len = name_field.iter().position(|byte| *byte == 0).unwrap_or(NAME_BYTES);
        let name = String::from_utf8_lossy(&name_field[..name_len]).into_owned();

        let size = u16::from_le_bytes([bytes[NAME_BYTES], bytes[NAME_BYTES + 1]]);
        let raw_first = i16::from_le_bytes([bytes[NAME_BYTES + 2], bytes[NAME_BYTES + 3]]);
        let first_block = if raw_first >= 0 { Some(raw_first as u16) } else { None };

        Entry { name, size, first_block }
    }
}

impl EntryTable {
    /// A table of `max_files` free slots.
    pub(crate) fn new(max_files: u32) -> EntryTable {
        EntryTable {
            entries: (0..max_files).map(|_| Entry::free()).collect(),
        }
    }

    /// Wrap entries loaded from an existing image.
    pub(crate) fn from_entries(entries: Vec<Entry>) -> EntryTable {
        EntryTable { entries }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn get(&self, slot: usize) -> &Entry {
        &self.entries[slot]
    }

    /// Slot of the live entry called `name`, if any.
    pub(crate) fn find_by_name(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| !entry.is_free() && entry.name == name)
    }

    /// Lowest-index free slot, if any.
    pub(crate) fn find_free(&self) -> Option<usize> {
        self.entries.iter().position(Entry::is_free)
    }

    /// Names of every live entry, in slot order.
    pub(crate) fn list_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| !entry.is_free())
            .map(|entry| entry.name.clone())
            .collect()
    }

    /// Bind a slot to a fresh, empty file.
    pub(crate) fn bind(&mut self, slot: usize, name: &str) {
        self.entries[slot] = Entry {
            name: name.to_string(),
            size: 0,
            first_block: None,
        };
    }

    /// Point a slot at new contents.
    pub(crate) fn set_contents(&mut self, slot: usize, size: u16, first_block: Option<u16>) {
        self.entries[slot].size = size;
        self.entries[slot].first_block = first_block;
    }

    /// Return a slot to the free state.
    pub(crate) fn clear(&mut self, slot: usize) {
        self.entries[slot] = Entry::free();
    }
}

// Functions

/// What a filename must be before it touches a table: 1 to 11 bytes of
/// printable ASCII with at least one non-blank character. The stored form
/// is exactly the caller-supplied bytes; the on-disk NUL padding never
/// leaks back out.
pub(crate) fn validate_name(name: &str) -> Result<(), NameFault> {
    if name.is_empty() {
        return Err(NameFault::Empty);
    }
    if name.len() > MAX_NAME_BYTES {
        return Err(NameFault::TooLong);
    }
    if !name.bytes().all(|byte| (0x20..=0x7E).contains(&byte)) {
        return Err(NameFault::Unprintable);
    }
    if name.trim().is_empty() {
        return Err(NameFault::Blank);
    }
    Ok(())
}
