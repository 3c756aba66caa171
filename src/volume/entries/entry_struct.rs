// The inode table. Fixed slots, no hierarchy, no ceremony.

// Structs, Enums, Flags

/// One slot of the table. A free slot is an empty name; there is nothing
/// more subtle to it than that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry {
    /// 1 to 11 bytes of printable ASCII. Empty means the slot is free.
    pub(crate) name: String,
    /// File size in bytes.
    pub(crate) size: u16,
    /// Head of the block chain. `None` when the file holds no data.
    pub(crate) first_block: Option<u16>,
}

/// All the slots.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct EntryTable {
    pub(super) entries: Vec<Entry>,
}
