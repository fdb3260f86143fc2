//! Minimal runnable illustration: extract an archive to a directory,
//! logging progress the way a consumer of this crate would wire up
//! `tracing` itself (the library never installs a subscriber on its own).

use std::env;
use std::process::ExitCode;

use readex::{Archive, ExtractFlags};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let (Some(archive_path), Some(dest)) = (args.next(), args.next()) else {
        eprintln!("usage: extract <archive> <destination-dir>");
        return ExitCode::FAILURE;
    };

    let mut archive = match Archive::open(&archive_path, None) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("failed to open '{archive_path}': {e}");
            return ExitCode::FAILURE;
        }
    };

    loop {
        match archive.next() {
            Ok(()) => {}
            Err(e) if e.is_soft_terminal() => break,
            Err(e) => {
                eprintln!("error reading archive: {e}");
                return ExitCode::FAILURE;
            }
        }

        let entry = match archive.info() {
            Ok(entry) => entry,
            Err(e) => {
                eprintln!("error reading entry metadata: {e}");
                return ExitCode::FAILURE;
            }
        };

        tracing::info!(path = %entry.path, "extracting");
        if let Err(e) = archive.extract(&dest, ExtractFlags::CALLBACK_DIRS, |rel_path, properties| {
            tracing::debug!(path = %rel_path.display(), properties, "extracted");
        }) {
            eprintln!("error extracting '{}': {e}", entry.path);
            return ExitCode::FAILURE;
        }
    }

    if let Err(e) = archive.close() {
        eprintln!("archive closed with a pending error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
