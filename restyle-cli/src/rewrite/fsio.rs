use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::core::error::{RestyleError, Result};

/// Read a whole file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| RestyleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| RestyleError::Encoding {
        path: path.to_path_buf(),
    })
}

/// Replace `path` with `content` via a temp file in the same directory and a
/// rename, so readers never see a half-written file. The original file's
/// permissions are carried over.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let io_err = |source: std::io::Error| RestyleError::Io {
        path: path.to_path_buf(),
        source,
    };

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let permissions = fs::metadata(path).map_err(io_err)?.permissions();

    let mut temp = NamedTempFile::new_in(parent).map_err(io_err)?;
    temp.write_all(content.as_bytes()).map_err(io_err)?;
    temp.as_file().sync_all().map_err(io_err)?;
    temp.as_file().set_permissions(permissions).map_err(io_err)?;
    temp.persist(path).map_err(|e| io_err(e.error))?;

    Ok(())
}
