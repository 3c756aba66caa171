// One node per data block, each holding its own index and a next-pointer.
// Files are chains through this table; free space is everything that isn't.

use thiserror::Error;

// Structs, Enums, Flags

/// A node's next-pointer. On disk this is a signed 16-bit field with two
/// sentinels, FREE = -1 and END = -2; in memory we carry the tagged version
/// and only speak sentinel at the codec boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Link {
    /// Not on any chain.
    Free,
    /// Last node of a live chain.
    End,
    /// Index of the successor node on the chain.
    Next(u16),
}

/// One slot of the node table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Node {
    /// Redundant with the slot position. Persisted for layout symmetry,
    /// never consulted on a read path.
    pub(crate) block_index: u16,
    pub(crate) next: Link,
}

/// The whole node table, with the free-chain bookkeeping over it.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct NodeTable {
    pub(super) nodes: Vec<Node>,
}

/// The ways a chain can turn out to be lying.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum ChainFault {
    #[error("the entry claims {0} bytes but has no head block")]
    MissingHead(u16),
    #[error("a link points at block {0}, which is outside the node table")]
    OutOfRange(u16),
    #[error("walked into a free node at block {0}")]
    FreeLink(u16),
    #[error("the chain ended after {have} of {need} blocks")]
    EndsEarly { have: u16, need: u16 },
    #[error("the chain is longer than the node table, assuming a loop")]
    Looped,
}
