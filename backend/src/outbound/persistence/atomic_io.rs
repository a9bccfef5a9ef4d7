//! Whole-file replacement through a temporary file and rename.
//!
//! Readers see either the previous contents or the new contents, never a
//! partial write. The temporary file lives in the target directory so the
//! rename stays on one filesystem.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use cap_std::fs::{Dir, OpenOptions};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Replace `file_name` inside `dir` with `contents`.
///
/// # Errors
/// Returns the underlying I/O error when the temporary file cannot be
/// written, synced, or renamed. The target is untouched in that case.
pub(crate) fn write_atomic(dir: &Dir, file_name: &str, contents: &[u8]) -> io::Result<()> {
    if file_name.is_empty() || file_name.contains(['/', '\\']) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{file_name:?} is not a plain file name"),
        ));
    }
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(
        ".{file_name}.tmp.{}.{suffix}.{counter}",
        std::process::id()
    );

    write_temp_file(dir, &tmp_name, contents)?;
    if let Err(err) = rename_into_place(dir, &tmp_name, file_name) {
        drop(dir.remove_file(&tmp_name));
        return Err(err);
    }
    sync_directory(dir);
    Ok(())
}

fn write_temp_file(dir: &Dir, tmp_name: &str, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;

    let written = file.write_all(contents).and_then(|()| file.sync_all());
    if written.is_err() {
        drop(file);
        drop(dir.remove_file(tmp_name));
    }
    written
}

#[cfg(windows)]
fn rename_into_place(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows refuses to rename over an existing file.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn rename_into_place(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn sync_directory(dir: &Dir) {
    // Best effort; not every platform can sync a directory handle.
    drop(dir.open(".").and_then(|handle| handle.sync_all()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use cap_std::ambient_authority;
    use tempfile::TempDir;

    fn open(temp: &TempDir) -> Dir {
        Dir::open_ambient_dir(temp.path(), ambient_authority()).expect("open temp dir")
    }

    #[test]
    fn replaces_existing_contents_without_leftovers() {
        let temp = TempDir::new().expect("temp dir");
        let dir = open(&temp);

        write_atomic(&dir, "ledger.json", b"{\"version\":1}").expect("first write");
        write_atomic(&dir, "ledger.json", b"{\"version\":2}").expect("second write");

        assert_eq!(
            dir.read_to_string("ledger.json").expect("read back"),
            "{\"version\":2}"
        );
        let names: Vec<String> = dir
            .entries()
            .expect("list dir")
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["ledger.json".to_owned()]);
    }

    #[test]
    fn rejects_nested_paths() {
        let temp = TempDir::new().expect("temp dir");
        let dir = open(&temp);
        let err = write_atomic(&dir, "nested/ledger.json", b"{}").expect_err("nested path");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
