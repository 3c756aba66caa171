// Everything below this is tables and bytes; this is the filesystem.

use crate::volume::device::device_struct::BlockDevice;
use crate::volume::entries::entry_struct::EntryTable;
use crate::volume::gate::gate_struct::FairRwLock;
use crate::volume::layout::layout_struct::Geometry;
use crate::volume::nodes::node_struct::NodeTable;

// Structs, Enums, Flags

/// A mounted volume: one backing image, one fair gate, five operations.
///
/// A `Volume` is a plain value with an explicit lifecycle. Open as many as
/// you like over distinct images; share one across threads behind an
/// `Arc`. Dropping it closes the image.
pub struct Volume {
    pub(super) geometry: Geometry,
    pub(super) state: FairRwLock<VolumeState>,
}

/// Everything the gate protects. The backing file is touched only through
/// the device in here, and only while holding a turn on the gate.
pub(crate) struct VolumeState {
    pub(super) device: BlockDevice,
    pub(super) entries: EntryTable,
    pub(super) nodes: NodeTable,
}
