//! Runs the `demos/extract.rs` illustration end-to-end. Only compiled when
//! the `demos` feature is enabled, since that's what builds the binary.

#![cfg(feature = "demos")]

use std::fs;
use std::process::Command;

use tempfile::TempDir;

#[test]
fn extract_demo_writes_files_and_exits_cleanly() {
    let src_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();

    let mut builder = tar::Builder::new(Vec::new());
    let data = b"demo payload";
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, "hello.txt", &data[..]).unwrap();
    let bytes = builder.into_inner().unwrap();

    let archive_path = src_dir.path().join("demo.tar");
    fs::write(&archive_path, bytes).unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_extract"))
        .arg(&archive_path)
        .arg(out_dir.path())
        .status()
        .unwrap();

    assert!(status.success());
    assert_eq!(fs::read(out_dir.path().join("hello.txt")).unwrap(), data);
}
