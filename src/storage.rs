use crate::error::{IssueTasksError, Result};
use std::fs::{self, Permissions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Mode of a report written where no file existed before.
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// Destination for generated documents
pub trait ReportStorage {
    /// Replace whatever is at `path` with `content`
    fn save(&self, path: &Path, content: &str) -> Result<()>;
}

/// Writes through a temporary file in the target directory, then renames it
/// into place. A failed write leaves the previous file untouched. The result
/// keeps the permissions of the file it replaces.
#[derive(Debug, Default)]
pub struct FileReportStorage;

impl FileReportStorage {
    pub fn new() -> Self {
        FileReportStorage
    }
}

impl ReportStorage for FileReportStorage {
    fn save(&self, path: &Path, content: &str) -> Result<()> {
        let write_error = |source: std::io::Error| IssueTasksError::Write {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut file = NamedTempFile::new_in(&dir).map_err(write_error)?;
        file.write_all(content.as_bytes()).map_err(write_error)?;
        if let Some(permissions) = target_permissions(path).map_err(write_error)? {
            file.as_file()
                .set_permissions(permissions)
                .map_err(write_error)?;
        }
        file.as_file().sync_all().map_err(write_error)?;
        file.persist(path).map_err(|e| write_error(e.error))?;
        Ok(())
    }
}

/// Permissions the saved file should end up with; `None` keeps the temp
/// file's own.
fn target_permissions(path: &Path) -> std::io::Result<Option<Permissions>> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(Some(metadata.permissions())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(default_permissions()),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(NEW_FILE_MODE))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
    None
}
