// The five operations, and the ordering discipline that keeps a yanked
// power cord from eating anyone's file.

// Imports

use std::path::Path;

use log::debug;
use log::info;
use log::trace;
use log::warn;

use crate::error_types::device::DeviceError;
use crate::error_types::volume::OpenError;
use crate::error_types::volume::SpaceFault;
use crate::error_types::volume::VolumeError;
use crate::volume::device::device_struct::BlockDevice;
use crate::volume::entries::entry_methods::validate_name;
use crate::volume::entries::entry_struct::Entry;
use crate::volume::entries::entry_struct::EntryTable;
use crate::volume::gate::gate_struct::FairRwLock;
use crate::volume::layout::layout_struct::Geometry;
use crate::volume::layout::layout_struct::ENTRY_BYTES;
use crate::volume::layout::layout_struct::HEADER_BYTES;
use crate::volume::layout::layout_struct::MAX_FILE_BYTES;
use crate::volume::layout::layout_struct::NODE_BYTES;
use crate::volume::nodes::node_struct::ChainFault;
use crate::volume::nodes::node_struct::Link;
use crate::volume::nodes::node_struct::Node;
use crate::volume::nodes::node_struct::NodeTable;

use super::manager_struct::Volume;
use super::manager_struct::VolumeState;

// Implementations

impl Volume {
    /// Open the image at `path`, growing it to `total_bytes` if needed.
    ///
    /// An image whose header matches all four parameters resumes as-is,
    /// with its files intact. Anything else, a fresh file included, is
    /// formatted empty.
    pub fn open(
        path: &Path,
        total_bytes: u32,
        block_size: u32,
        max_files: u32,
        max_blocks: u32,
    ) -> Result<Volume, OpenError> {
        open_volume(path, total_bytes, block_size, max_files, max_blocks)
    }

    /// Bind a free slot to `name` as an empty file.
    pub fn create_file(&self, name: &str) -> Result<(), VolumeError> {
        create_file(self, name)
    }

    /// Remove `name`, zeroing every data block it held before the blocks
    /// go back to the pool.
    pub fn delete_file(&self, name: &str) -> Result<(), VolumeError> {
        delete_file(self, name)
    }

    /// Replace the contents of `name` with `bytes`.
    ///
    /// Payloads longer than 65 535 bytes are silently truncated to that
    /// size; the length field on disk is 16 bits and that is the cap.
    /// The previous contents are fully replaced and their blocks zeroed.
    pub fn write_file(&self, name: &str, bytes: &[u8]) -> Result<(), VolumeError> {
        write_file(self, name, bytes)
    }

    /// The full contents of `name`.
    pub fn read_file(&self, name: &str) -> Result<Vec<u8>, VolumeError> {
        read_file(self, name)
    }

    /// Names of every live file, in slot order.
    pub fn list_files(&self) -> Vec<String> {
        let turn = self.state.read();
        turn.entries.list_names()
    }

    /// How many data blocks are currently unallocated.
    pub fn free_blocks(&self) -> usize {
        let turn = self.state.read();
        turn.nodes.count_free()
    }
}

//
// Construction
//

fn open_volume(
    path: &Path,
    total_bytes: u32,
    block_size: u32,
    max_files: u32,
    max_blocks: u32,
) -> Result<Volume, OpenError> {
    let geometry = Geometry::new(total_bytes, block_size, max_files, max_blocks)?;

    let device = BlockDevice::open(path)?;
    device.ensure_len(total_bytes as u64)?;

    let mut header = [0u8; HEADER_BYTES];
    device.read_at(0, &mut header)?;

    let state = if Geometry::decode_header(&header) == Some(geometry) {
        info!("Header matches, resuming the existing volume");
        resume_volume(&geometry, device)?
    } else {
        info!("No usable header, formatting an empty volume");
        format_volume(&geometry, device)?
    };

    Ok(Volume {
        geometry,
        state: FairRwLock::new(state),
    })
}

/// Load the metadata mirrors from a trusted header's image.
fn resume_volume(geometry: &Geometry, device: BlockDevice) -> Result<VolumeState, DeviceError> {
    let mut raw_entries = vec![0u8; ENTRY_BYTES * geometry.max_files as usize];
    device.read_at(geometry.entries_off(), &mut raw_entries)?;
    let entries = EntryTable::from_entries(
        raw_entries.chunks_exact(ENTRY_BYTES).map(Entry::decode).collect(),
    );

    let mut raw_nodes = vec![0u8; NODE_BYTES * geometry.max_blocks as usize];
    device.read_at(geometry.nodes_off(), &mut raw_nodes)?;
    let nodes = NodeTable::from_nodes(
        raw_nodes.chunks_exact(NODE_BYTES).map(Node::decode).collect(),
    );

    debug!(
        "Resumed {} live file(s), {} free block(s)",
        entries.list_names().len(),
        nodes.count_free()
    );
    Ok(VolumeState { device, entries, nodes })
}

/// Write out a completely empty volume: header, free tables, zero data.
fn format_volume(geometry: &Geometry, device: BlockDevice) -> Result<VolumeState, DeviceError> {
    let entries = EntryTable::new(geometry.max_files);
    let nodes = NodeTable::new(geometry.max_blocks);

    device.write_at(0, &geometry.encode_header())?;
    let state = VolumeState { device, entries, nodes };
    flush_all_entries(geometry, &state)?;
    flush_nodes(geometry, &state)?;
    for block in 0..geometry.max_blocks as u16 {
        zero_block(geometry, &state.device, block)?;
    }
    Ok(state)
}

//
// Operations
//

fn create_file(volume: &Volume, name: &str) -> Result<(), VolumeError> {
    trace!("create {name:?}");
    let mut turn = volume.state.write();
    let state = &mut *turn;

    validate_name(name)?;
    if state.entries.find_by_name(name).is_some() {
        return Err(VolumeError::AlreadyExists);
    }
    let slot = state.entries.find_free().ok_or(SpaceFault::Entries)?;

    state.entries.bind(slot, name);
    if let Err(failed) = flush_entry(&volume.geometry, state, slot) {
        // The record never hit the disk; do not pretend the file exists.
        state.entries.clear(slot);
        return Err(failed.into());
    }
    Ok(())
}

fn delete_file(volume: &Volume, name: &str) -> Result<(), VolumeError> {
    trace!("delete {name:?}");
    let geometry = &volume.geometry;
    let mut turn = volume.state.write();
    let state = &mut *turn;

    let slot = state.entries.find_by_name(name).ok_or(VolumeError::NotFound)?;

    if let Some(head) = state.entries.get(slot).first_block {
        let chain = state.nodes.follow_chain(head)?;
        for &block in &chain {
            // Secure erase before the blocks go back to the pool.
            zero_block(geometry, &state.device, block)?;
        }
        state.nodes.free_chain(head)?;
        flush_nodes(geometry, state)?;
    }

    state.entries.clear(slot);
    flush_entry(geometry, state, slot)?;
    Ok(())
}

fn write_file(volume: &Volume, name: &str, bytes: &[u8]) -> Result<(), VolumeError> {
    trace!("write {name:?}, {} byte(s)", bytes.len());
    let geometry = &volume.geometry;
    let mut turn = volume.state.write();
    let state = &mut *turn;

    let slot = state.entries.find_by_name(name).ok_or(VolumeError::NotFound)?;

    // The length field is 16 bits; longer payloads are truncated, not
    // rejected.
    let new_size = bytes.len().min(MAX_FILE_BYTES) as u16;
    let payload = &bytes[..new_size as usize];
    let need = geometry.blocks_needed(new_size) as usize;

    // Build the whole new chain on disk before the entry hears about it.
    let chain = match build_chain(geometry, state, payload, need) {
        Ok(chain) => chain,
        Err((failed, taken)) => {
            release_taken_nodes(geometry, state, &taken);
            return Err(failed);
        }
    };
    if let Err(failed) = flush_nodes(geometry, state) {
        release_taken_nodes(geometry, state, &chain);
        return Err(failed.into());
    }

    let old_size = state.entries.get(slot).size;
    let old_head = state.entries.get(slot).first_block;
    let new_head = chain.first().copied();

    state.entries.set_contents(slot, new_size, new_head);
    if let Err(failed) = flush_entry(geometry, state, slot) {
        // Not committed. Put the entry back and release the new chain.
        state.entries.set_contents(slot, old_size, old_head);
        release_taken_nodes(geometry, state, &chain);
        return Err(failed.into());
    }
    // Commit point. The new contents are now the observable state; from
    // here a failure can only leak the old chain, never lose data.

    if let Some(head) = old_head {
        let old_chain = state.nodes.follow_chain(head)?;
        for &block in &old_chain {
            zero_block(geometry, &state.device, block)?;
        }
        state.nodes.free_chain(head)?;
        flush_nodes(geometry, state)?;
    }
    Ok(())
}

fn read_file(volume: &Volume, name: &str) -> Result<Vec<u8>, VolumeError> {
    trace!("read {name:?}");
    let geometry = &volume.geometry;
    let turn = volume.state.read();
    let state = &*turn;

    let slot = state.entries.find_by_name(name).ok_or(VolumeError::NotFound)?;
    let entry = state.entries.get(slot);
    if entry.size == 0 {
        return Ok(Vec::new());
    }
    let head = entry.first_block.ok_or(ChainFault::MissingHead(entry.size))?;

    let size = entry.size as usize;
    let block_size = geometry.block_size as usize;
    let need = geometry.blocks_needed(entry.size);

    let mut contents = vec![0u8; size];
    let mut current = head;
    let mut have: u16 = 0;
    let mut offset = 0;
    loop {
        if current as usize >= state.nodes.len() {
            return Err(ChainFault::OutOfRange(current).into());
        }
        let chunk = block_size.min(size - offset);
        state
            .device
            .read_at(geometry.block_pos(current), &mut contents[offset..offset + chunk])?;
        offset += chunk;
        have += 1;
        if offset == size {
            break;
        }
        match state.nodes.next_of(current) {
            Link::Next(successor) => current = successor,
            Link::End => return Err(ChainFault::EndsEarly { have, need }.into()),
            Link::Free => return Err(ChainFault::FreeLink(current).into()),
        }
    }
    Ok(contents)
}

//
// Chain building and rollback
//

/// Allocate and fill the new chain. On failure the caller gets the nodes
/// taken so far, to hand to `release_taken_nodes`.
fn build_chain(
    geometry: &Geometry,
    state: &mut VolumeState,
    payload: &[u8],
    need: usize,
) -> Result<Vec<u16>, (VolumeError, Vec<u16>)> {
    if need == 0 {
        return Ok(Vec::new());
    }
    let chain = match state.nodes.allocate_chain(need) {
        Some(chain) => chain,
        None => return Err((SpaceFault::Blocks.into(), Vec::new())),
    };

    let block_size = geometry.block_size as usize;
    for (position, &block) in chain.iter().enumerate() {
        let start = position * block_size;
        let chunk = payload.len().min(start + block_size) - start;

        // A whole block every time: the tail of the last block rides along
        // as zeros.
        let mut buffer = vec![0u8; block_size];
        buffer[..chunk].copy_from_slice(&payload[start..start + chunk]);
        if let Err(failed) = state.device.write_at(geometry.block_pos(block), &buffer) {
            return Err((failed.into(), chain));
        }

        if position > 0 {
            state.nodes.link(chain[position - 1], block);
        }
    }
    Ok(chain)
}

/// Undo a half-built chain: zero what was written, hand the nodes back,
/// flush. Secondary failures here are a tolerable leak, not a second
/// error; they are logged and swallowed.
fn release_taken_nodes(geometry: &Geometry, state: &mut VolumeState, taken: &[u16]) {
    if taken.is_empty() {
        return;
    }
    warn!("Rolling back {} allocated block(s) after a failed write", taken.len());
    for &block in taken {
        if let Err(failed) = zero_block(geometry, &state.device, block) {
            warn!("Could not zero block {block} during rollback: {failed}");
        }
        state.nodes.set_free(block);
    }
    if let Err(failed) = flush_nodes(geometry, state) {
        warn!("Could not flush node records during rollback: {failed}");
    }
}

//
// Flushing
//

/// Write one entry record through to the image.
fn flush_entry(geometry: &Geometry, state: &VolumeState, slot: usize) -> Result<(), DeviceError> {
    state
        .device
        .write_at(geometry.entry_pos(slot), &state.entries.get(slot).encode())
}

fn flush_all_entries(geometry: &Geometry, state: &VolumeState) -> Result<(), DeviceError> {
    for slot in 0..state.entries.len() {
        flush_entry(geometry, state, slot)?;
    }
    Ok(())
}

/// Write the whole node region through in one go.
fn flush_nodes(geometry: &Geometry, state: &VolumeState) -> Result<(), DeviceError> {
    let mut region = Vec::with_capacity(NODE_BYTES * state.nodes.len());
    for index in 0..state.nodes.len() {
        region.extend_from_slice(&state.nodes.get(index as u16).encode());
    }
    state.device.write_at(geometry.nodes_off(), &region)
}

fn zero_block(geometry: &Geometry, device: &BlockDevice, block: u16) -> Result<(), DeviceError> {
    let zeros = vec![0u8; geometry.block_size as usize];
    device.write_at(geometry.block_pos(block), &zeros)
}
