//! Whole-document reads and atomic writes.

use std::path::{Path, PathBuf};

use tracing::debug;

use lakekit_shared::{LakeKitError, Result};

/// Read a UTF-8 document in full.
pub fn read_document(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path).map_err(|e| LakeKitError::io(path, e))?;
    debug!(path = %path.display(), bytes = content.len(), "read document");
    Ok(content)
}

/// Replace `path` with `content`.
///
/// Writes a sibling temp file first, then renames it over the target, so a
/// crash mid-write never leaves a truncated document behind. The temp file
/// is removed on every failure path and the target's permissions carry over.
pub fn write_document(path: &Path, content: &str) -> Result<()> {
    let temp = temp_path(path)?;

    if let Err(e) = std::fs::write(&temp, content) {
        let _ = std::fs::remove_file(&temp);
        return Err(LakeKitError::io(&temp, e));
    }

    // Keep the target's mode instead of the umask default of a fresh file.
    if let Ok(meta) = std::fs::metadata(path) {
        if let Err(e) = std::fs::set_permissions(&temp, meta.permissions()) {
            let _ = std::fs::remove_file(&temp);
            return Err(LakeKitError::io(&temp, e));
        }
    }

    if let Err(e) = std::fs::rename(&temp, path) {
        let _ = std::fs::remove_file(&temp);
        return Err(LakeKitError::io(path, e));
    }

    debug!(path = %path.display(), bytes = content.len(), "wrote document");
    Ok(())
}

/// `.<file name>.tmp` next to the target.
fn temp_path(path: &Path) -> Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        LakeKitError::validation(format!("{} has no file name", path.display()))
    })?;
    let mut temp_name = std::ffi::OsString::from(".");
    temp_name.push(file_name);
    temp_name.push(".tmp");
    Ok(path.with_file_name(temp_name))
}
