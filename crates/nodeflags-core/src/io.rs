use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `data` to `path` through a tempfile in the same directory so a
/// crash never leaves a half-written config behind.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_parent_dirs_and_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("conf/nodeflags.yaml");
        atomic_write(&path, b"version: 1\n").unwrap();
        atomic_write(&path, b"version: 1\nextra_flags: {}\n").unwrap();
        let data = std::fs::read_to_string(&path).unwrap();
        assert!(data.contains("extra_flags"));
    }
}
