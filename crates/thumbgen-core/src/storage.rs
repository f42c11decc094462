//! Thumbnail file lifecycle: write to `<name>.part`, fsync, then rename over the final name.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `IHM_spring.png` → `IHM_spring.png.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Write `data` to `final_path`, replacing any existing file.
///
/// Readers never observe a half-written file under the final name. On failure
/// the temp file is removed (best effort) and any existing file is left untouched.
pub fn write_file(final_path: &Path, data: &[u8]) -> std::io::Result<()> {
    let tp = temp_path(final_path);
    let result = write_and_rename(&tp, final_path, data);
    if result.is_err() {
        if let Err(e) = std::fs::remove_file(&tp) {
            tracing::debug!("could not remove {}: {}", tp.display(), e);
        }
    }
    result
}

fn write_and_rename(temp_path: &Path, final_path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);
    std::fs::rename(temp_path, final_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_appends_part() {
        let p = temp_path(Path::new("IHM_spring.png"));
        assert_eq!(p.to_string_lossy(), "IHM_spring.png.part");
        let p2 = temp_path(Path::new("/tmp/out/ilMTB_road.png"));
        assert_eq!(p2.to_string_lossy(), "/tmp/out/ilMTB_road.png.part");
    }

    #[test]
    fn write_creates_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("IHM_spring.png");
        write_file(&final_path, b"\x89PNG first").unwrap();
        assert_eq!(std::fs::read(&final_path).unwrap(), b"\x89PNG first");
        assert!(!temp_path(&final_path).exists());
    }

    #[test]
    fn write_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("IHM_spring.png");
        std::fs::write(&final_path, b"a much longer previous body").unwrap();
        write_file(&final_path, b"new").unwrap();
        assert_eq!(std::fs::read(&final_path).unwrap(), b"new");
    }

    #[test]
    fn write_into_missing_dir_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("nope").join("IHM_spring.png");
        assert!(write_file(&final_path, b"x").is_err());
        assert!(!final_path.exists());
        assert!(!temp_path(&final_path).exists());
    }
}
