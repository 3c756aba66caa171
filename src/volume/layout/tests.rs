// Unwrapping is okay here, since we want unexpected outcomes to fail tests.
#![allow(clippy::unwrap_used)]

use test_log::test; // We want to see logs while testing.

use super::layout_struct::Geometry;
use super::layout_struct::GeometryError;

// The sizing the server binary ships with.
fn stock_geometry() -> Geometry {
    let total = 24 + 128 * 16 + 1024 * 4 + 1024 * 256;
    Geometry::new(total, 256, 128, 1024).unwrap()
}

#[test]
fn derived_offsets() {
    let geometry = stock_geometry();
    assert_eq!(geometry.entries_off(), 24, "entries start right after the header");
    assert_eq!(geometry.nodes_off(), 24 + 128 * 16, "nodes follow the entry table");
    assert_eq!(
        geometry.data_off(),
        24 + 128 * 16 + 1024 * 4,
        "data follows the node table"
    );
    assert_eq!(
        geometry.block_pos(3),
        geometry.data_off() + 3 * 256,
        "blocks are laid out back to back"
    );
    assert_eq!(
        geometry.entry_pos(5),
        24 + 5 * 16,
        "entry records are laid out back to back"
    );
}

#[test]
fn header_round_trip() {
    let geometry = stock_geometry();
    let bytes = geometry.encode_header();
    assert_eq!(
        Geometry::decode_header(&bytes),
        Some(geometry),
        "decode must undo encode"
    );
}

#[test]
fn header_magic_bytes() {
    let bytes = stock_geometry().encode_header();
    // "FSV2", little-endian.
    assert_eq!(&bytes[0..4], &[0x32, 0x56, 0x53, 0x46], "magic must be 0x46535632");
    assert_eq!(&bytes[20..24], &[0, 0, 0, 0], "reserved word must be zero");
}

#[test]
fn header_without_magic_is_refused() {
    let mut bytes = stock_geometry().encode_header();
    bytes[0] ^= 0xFF;
    assert_eq!(Geometry::decode_header(&bytes), None, "a wrong magic is not a header");

    let zeros = [0u8; 24];
    assert_eq!(Geometry::decode_header(&zeros), None, "a blank image is not a header");
}

#[test]
fn zero_parameters_are_refused() {
    assert_eq!(
        Geometry::new(0, 4, 2, 4),
        Err(GeometryError::NonPositive),
        "zero total bytes"
    );
    assert_eq!(
        Geometry::new(1024, 0, 2, 4),
        Err(GeometryError::NonPositive),
        "zero block size"
    );
    assert_eq!(
        Geometry::new(1024, 4, 0, 4),
        Err(GeometryError::NonPositive),
        "zero entries"
    );
    assert_eq!(
        Geometry::new(1024, 4, 2, 0),
        Err(GeometryError::NonPositive),
        "zero blocks"
    );
}

#[test]
fn undersized_volume_is_refused() {
    // 24 + 2*16 + 4*4 + 4*4 = 88 bytes needed.
    assert_eq!(
        Geometry::new(87, 4, 2, 4),
        Err(GeometryError::TooSmall {
            total_bytes: 87,
            needed: 88
        }),
        "one byte short is short"
    );
    assert!(Geometry::new(88, 4, 2, 4).is_ok(), "an exact fit is fine");
}

#[test]
fn block_count_must_fit_a_signed_link() {
    assert_eq!(
        Geometry::new(u32::MAX, 4, 2, 32_768),
        Err(GeometryError::TooManyBlocks(32_768)),
        "32768 blocks cannot be linked through an i16"
    );
    assert!(
        Geometry::new(u32::MAX, 4, 2, 32_767).is_ok(),
        "32767 blocks is the ceiling"
    );
}

#[test]
fn blocks_needed_rounds_up() {
    let geometry = Geometry::new(1024, 4, 2, 4).unwrap();
    assert_eq!(geometry.blocks_needed(0), 0, "empty files hold no blocks");
    assert_eq!(geometry.blocks_needed(1), 1, "one byte still costs a block");
    assert_eq!(geometry.blocks_needed(4), 1, "an exact fit costs one block");
    assert_eq!(geometry.blocks_needed(5), 2, "one byte over costs another block");
    assert_eq!(geometry.blocks_needed(8), 2, "two exact blocks");
}
