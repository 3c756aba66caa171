// Many threads, one volume, zero torn reads.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::thread;

use test_log::test; // We want to see logs while testing.

use crate::test_common::open_medium;
use crate::test_common::scratch_dir;
use crate::test_common::MEDIUM_BLOCKS;

#[test]
fn parallel_writers_on_distinct_files() {
    let dir = scratch_dir();
    let volume = Arc::new(open_medium(&dir));

    let mut joins = Vec::new();
    for worker in 0..8u8 {
        let volume = Arc::clone(&volume);
        joins.push(thread::spawn(move || {
            let name = format!("file-{worker}");
            let payload = vec![worker; 48];
            volume.create_file(&name).unwrap();
            volume.write_file(&name, &payload).unwrap();
        }));
    }
    for join in joins {
        join.join().unwrap();
    }

    // Every file must have landed whole, on its own blocks.
    let mut names = volume.list_files();
    names.sort();
    assert_eq!(names.len(), 8, "all eight files exist");
    for worker in 0..8u8 {
        let contents = volume.read_file(&format!("file-{worker}")).unwrap();
        assert_eq!(contents, vec![worker; 48], "each file holds its own bytes");
    }
    assert_eq!(
        volume.free_blocks(),
        MEDIUM_BLOCKS as usize - 8 * 3,
        "48 bytes is three 16-byte blocks per file"
    );
}

#[test]
fn readers_never_see_a_half_written_file() {
    let dir = scratch_dir();
    let volume = Arc::new(open_medium(&dir));

    let first = vec![0xAB; 60];
    let second = vec![0xCD; 24];
    volume.create_file("swap").unwrap();
    volume.write_file("swap", &first).unwrap();

    let writer = {
        let volume = Arc::clone(&volume);
        let (first, second) = (first.clone(), second.clone());
        thread::spawn(move || {
            for round in 0..50 {
                let payload = if round % 2 == 0 { &second } else { &first };
                volume.write_file("swap", payload).unwrap();
            }
        })
    };

    let mut joins = vec![writer];
    for _ in 0..4 {
        let volume = Arc::clone(&volume);
        let (first, second) = (first.clone(), second.clone());
        joins.push(thread::spawn(move || {
            for _ in 0..100 {
                let seen = volume.read_file("swap").unwrap();
                assert!(
                    seen == first || seen == second,
                    "a read must return one write in full, never a blend"
                );
            }
        }));
    }
    for join in joins {
        join.join().unwrap();
    }
}

#[test]
fn churn_keeps_the_accounting_straight() {
    let dir = scratch_dir();
    let volume = Arc::new(open_medium(&dir));

    let mut joins = Vec::new();
    for worker in 0..4u8 {
        let volume = Arc::clone(&volume);
        joins.push(thread::spawn(move || {
            let name = format!("churn-{worker}");
            for round in 0..20usize {
                volume.create_file(&name).unwrap();
                volume.write_file(&name, &vec![worker; round % 40 + 1]).unwrap();
                volume.delete_file(&name).unwrap();
            }
        }));
    }
    for join in joins {
        join.join().unwrap();
    }

    assert!(volume.list_files().is_empty(), "every churned file was deleted");
    assert_eq!(
        volume.free_blocks(),
        MEDIUM_BLOCKS as usize,
        "every block must find its way home"
    );
}
