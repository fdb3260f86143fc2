//! End-to-end TAR scenarios: plain TAR with a GNU long name and an explicit
//! directory entry, gzip-compressed TAR via suffix auto-detection, and the
//! truncated-archive failure mode.

use std::fs;
use std::io::Write;

use readex::{Archive, Error, ExtractFlags};
use tempfile::TempDir;

fn plain_tar_bytes() -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());

    let mut dir_header = tar::Header::new_gnu();
    dir_header.set_entry_type(tar::EntryType::Directory);
    dir_header.set_path("docs/").unwrap();
    dir_header.set_size(0);
    dir_header.set_mode(0o755);
    dir_header.set_cksum();
    builder.append(&dir_header, std::io::empty()).unwrap();

    let long_name = format!("docs/{}.txt", "x".repeat(150));
    let data = b"hello from a long GNU name";
    let mut file_header = tar::Header::new_gnu();
    file_header.set_size(data.len() as u64);
    file_header.set_mode(0o644);
    file_header.set_cksum();
    builder
        .append_data(&mut file_header, &long_name, &data[..])
        .unwrap();

    builder.into_inner().unwrap()
}

fn write_fixture(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn plain_tar_round_trips_directory_and_gnu_long_name() {
    let src_dir = TempDir::new().unwrap();
    let archive_path = write_fixture(&src_dir, "fixture.tar", &plain_tar_bytes());
    let out_dir = TempDir::new().unwrap();

    let mut archive = Archive::open(&archive_path, None).unwrap();
    let mut created_dirs = Vec::new();
    let mut seen_paths = Vec::new();

    loop {
        match archive.next() {
            Ok(()) => {}
            Err(e) if e.is_soft_terminal() => break,
            Err(e) => panic!("unexpected error: {e}"),
        }
        let entry = archive.info().unwrap();
        seen_paths.push(entry.path.clone());
        archive
            .extract(out_dir.path(), ExtractFlags::CALLBACK_DIRS, |p, properties| {
                created_dirs.push((p.to_path_buf(), properties))
            })
            .unwrap();
    }
    archive.close().unwrap();

    assert_eq!(seen_paths[0], "docs/");
    let long_name = seen_paths.iter().find(|p| p.ends_with(".txt")).unwrap();
    assert!(long_name.len() > 150);

    let written = fs::read(out_dir.path().join(long_name)).unwrap();
    assert_eq!(written, b"hello from a long GNU name");
    assert!(out_dir.path().join("docs").is_dir());

    // The directory's callback fires with PROP_DIR and a path relative to
    // `base_path`, never an absolute path.
    let docs_event = created_dirs
        .iter()
        .find(|(p, _)| p == std::path::Path::new("docs"))
        .expect("docs directory creation should have fired a callback event");
    assert_eq!(docs_event.1, readex::PROP_DIR);
    assert!(docs_event.0.is_relative());

    // The file's own callback fires with properties == 0 and its relative
    // path, not the long literal name prefixed with the output directory.
    let file_event = created_dirs
        .iter()
        .find(|(p, _)| p.to_string_lossy().ends_with(".txt"))
        .expect("file extraction should have fired a callback event");
    assert_eq!(file_event.1, 0);
    assert_eq!(file_event.0, std::path::Path::new(long_name.as_str()));
}

#[test]
fn gzip_compressed_tar_is_auto_detected_by_suffix() {
    let src_dir = TempDir::new().unwrap();
    let plain = plain_tar_bytes();

    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&plain).unwrap();
    let compressed = encoder.finish().unwrap();

    let archive_path = write_fixture(&src_dir, "fixture.tar.gz", &compressed);
    let out_dir = TempDir::new().unwrap();

    let mut archive = Archive::open(&archive_path, None).unwrap();
    let mut count = 0;
    loop {
        match archive.next() {
            Ok(()) => {}
            Err(e) if e.is_soft_terminal() => break,
            Err(e) => panic!("unexpected error: {e}"),
        }
        count += 1;
        archive.extract(out_dir.path(), ExtractFlags::empty(), |_, _| {}).unwrap();
    }
    archive.close().unwrap();
    assert_eq!(count, 2);
}

#[test]
fn truncated_tar_reports_module_error_not_panic() {
    let src_dir = TempDir::new().unwrap();
    let full = plain_tar_bytes();
    let truncated = &full[..full.len() / 2];
    let archive_path = write_fixture(&src_dir, "truncated.tar", truncated);
    let out_dir = TempDir::new().unwrap();

    let mut archive = Archive::open(&archive_path, None).unwrap();
    let mut hit_error = false;
    loop {
        match archive.next() {
            Ok(()) => {}
            Err(e) if e.is_soft_terminal() => break,
            Err(Error::Module { .. }) => {
                hit_error = true;
                break;
            }
            Err(e) => panic!("expected a module error, got: {e}"),
        }
        if archive.extract(out_dir.path(), ExtractFlags::empty(), |_, _| {}).is_err() {
            hit_error = true;
            break;
        }
    }
    assert!(hit_error, "truncating the fixture should surface an error before exhausting it cleanly");
}

#[test]
fn missing_base_path_is_reported_before_any_write() {
    let src_dir = TempDir::new().unwrap();
    let archive_path = write_fixture(&src_dir, "fixture.tar", &plain_tar_bytes());

    let mut archive = Archive::open(&archive_path, None).unwrap();
    archive.next().unwrap();
    let err = archive
        .extract("/definitely/does/not/exist/anywhere", ExtractFlags::empty(), |_, _| {})
        .unwrap_err();
    assert!(matches!(err, Error::NoBasePath { .. }));
}

#[test]
fn empty_tar_archive_yields_no_more_items_immediately() {
    let src_dir = TempDir::new().unwrap();
    let empty = tar::Builder::new(Vec::new()).into_inner().unwrap();
    let archive_path = write_fixture(&src_dir, "empty.tar", &empty);

    let mut archive = Archive::open(&archive_path, None).unwrap();
    let err = archive.next().unwrap_err();
    assert!(err.is_soft_terminal());
}

#[test]
fn tar_info_is_available_immediately_after_open_without_next() {
    let src_dir = TempDir::new().unwrap();
    let archive_path = write_fixture(&src_dir, "fixture.tar", &plain_tar_bytes());

    let archive = Archive::open(&archive_path, None).unwrap();
    let entry = archive.info().unwrap();
    assert_eq!(entry.path, "docs/");
}

#[test]
fn tar_first_next_after_open_is_a_noop_landing_on_entry_zero() {
    let src_dir = TempDir::new().unwrap();
    let archive_path = write_fixture(&src_dir, "fixture.tar", &plain_tar_bytes());

    let mut archive = Archive::open(&archive_path, None).unwrap();
    archive.next().unwrap();
    let entry = archive.info().unwrap();
    assert_eq!(entry.path, "docs/");
}

#[test]
fn extraction_callback_fires_once_per_file_without_callback_dirs_flag() {
    let src_dir = TempDir::new().unwrap();
    let archive_path = write_fixture(&src_dir, "fixture.tar", &plain_tar_bytes());
    let out_dir = TempDir::new().unwrap();

    let mut archive = Archive::open(&archive_path, None).unwrap();
    let mut callback_paths = Vec::new();
    loop {
        match archive.next() {
            Ok(()) => {}
            Err(e) if e.is_soft_terminal() => break,
            Err(e) => panic!("unexpected error: {e}"),
        }
        archive
            .extract(out_dir.path(), ExtractFlags::empty(), |p, properties| {
                callback_paths.push((p.to_path_buf(), properties))
            })
            .unwrap();
    }
    archive.close().unwrap();

    // The directory entry's own callback is gated by CALLBACK_DIRS (not set
    // here); the file entry's callback always fires, with properties == 0
    // and a path relative to `base_path`.
    assert_eq!(callback_paths.len(), 1);
    assert!(callback_paths[0].0.ends_with(".txt"));
    assert_eq!(callback_paths[0].1, 0);
    assert!(callback_paths[0].0.is_relative());
}

#[cfg(unix)]
#[test]
fn tar_directory_entry_gets_its_mode_restored() {
    use std::os::unix::fs::PermissionsExt;

    let src_dir = TempDir::new().unwrap();
    let archive_path = write_fixture(&src_dir, "fixture.tar", &plain_tar_bytes());
    let out_dir = TempDir::new().unwrap();

    let mut archive = Archive::open(&archive_path, None).unwrap();
    loop {
        match archive.next() {
            Ok(()) => {}
            Err(e) if e.is_soft_terminal() => break,
            Err(e) => panic!("unexpected error: {e}"),
        }
        archive.extract(out_dir.path(), ExtractFlags::empty(), |_, _| {}).unwrap();
    }
    archive.close().unwrap();

    let mode = fs::metadata(out_dir.path().join("docs")).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
}
