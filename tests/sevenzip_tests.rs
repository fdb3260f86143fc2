//! End-to-end 7z scenarios: a round trip through a directory entry and a
//! file entry, and the iterator invariant spec.md §8 calls out by name for
//! this container — exactly `K` successful `info` calls before `next`
//! returns `NoMoreItems`.

use std::fs;
use std::io::Cursor;

use readex::{Archive, ExtractFlags};
use sevenz_rust2::{SevenZArchiveEntry, SevenZWriter};
use tempfile::TempDir;

fn sevenz_fixture_bytes() -> Vec<u8> {
    let scratch = TempDir::new().unwrap();
    let archive_path = scratch.path().join("fixture.7z");

    let mut writer = SevenZWriter::create(&archive_path).unwrap();

    let dir_entry = SevenZArchiveEntry::directory("docs".to_string());
    writer
        .push_archive_entry(dir_entry, None::<&mut std::io::Empty>)
        .unwrap();

    let data = b"hello from 7z";
    let file_entry = SevenZArchiveEntry::file("docs/readme.txt".to_string());
    writer
        .push_archive_entry(file_entry, Some(&mut Cursor::new(&data[..])))
        .unwrap();

    writer.finish().unwrap();
    fs::read(&archive_path).unwrap()
}

#[test]
fn sevenzip_round_trips_directory_and_file_entry() {
    let src_dir = TempDir::new().unwrap();
    let archive_path = src_dir.path().join("fixture.7z");
    fs::write(&archive_path, sevenz_fixture_bytes()).unwrap();
    let out_dir = TempDir::new().unwrap();

    let mut archive = Archive::open(&archive_path, None).unwrap();
    let mut info_calls = 0;
    let mut saw_directory = false;
    let mut saw_file = false;

    loop {
        match archive.next() {
            Ok(()) => {}
            Err(e) if e.is_soft_terminal() => break,
            Err(e) => panic!("unexpected error: {e}"),
        }
        let entry = archive.info().unwrap();
        info_calls += 1;
        if entry.is_directory() {
            assert_eq!(entry.path, "docs");
            saw_directory = true;
        } else {
            assert_eq!(entry.path, "docs/readme.txt");
            saw_file = true;
        }
        archive
            .extract(out_dir.path(), ExtractFlags::empty(), |_, _| {})
            .unwrap();
    }
    archive.close().unwrap();

    // The two pushed entries are the only `K` here: exactly two successful
    // `info` calls, then `NoMoreItems` on the third `next`.
    assert_eq!(info_calls, 2);
    assert!(saw_directory && saw_file);

    assert!(out_dir.path().join("docs").is_dir());
    let content = fs::read(out_dir.path().join("docs/readme.txt")).unwrap();
    assert_eq!(content, b"hello from 7z");
}

#[test]
fn sevenzip_next_returns_no_more_items_exactly_after_k_entries() {
    let src_dir = TempDir::new().unwrap();
    let archive_path = src_dir.path().join("fixture.7z");
    fs::write(&archive_path, sevenz_fixture_bytes()).unwrap();

    let mut archive = Archive::open(&archive_path, None).unwrap();
    assert!(archive.next().is_ok());
    assert!(archive.info().is_ok());
    assert!(archive.next().is_ok());
    assert!(archive.info().is_ok());

    let err = archive.next().unwrap_err();
    assert!(err.is_soft_terminal());
    assert!(archive.info().unwrap_err().is_soft_terminal());
}
