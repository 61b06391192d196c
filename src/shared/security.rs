use crate::shared::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Maximum size of a package database file read from a source (100 MB)
/// This prevents a hostile image from exhausting memory
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Reads a file that lives inside a source root filesystem.
///
/// Image filesystems routinely contain symbolic links, some of them absolute
/// and therefore pointing at the *host*. The path is canonicalised and must
/// stay under `root`; links that escape are skipped with a warning.
///
/// # Returns
/// `Ok(None)` if the file does not exist or escapes the root
///
/// # Errors
/// Returns an error if:
/// - The path is not a regular file
/// - The file exceeds MAX_FILE_SIZE
/// - The file cannot be read or is not UTF-8
pub fn read_contained_file(root: &Path, path: &Path) -> Result<Option<String>> {
    let canonical = match path.canonicalize() {
        Ok(p) => p,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(anyhow::anyhow!(
                "Failed to resolve {}: {}",
                path.display(),
                e
            ))
        }
    };

    let canonical_root = root
        .canonicalize()
        .map_err(|e| anyhow::anyhow!("Failed to resolve source root {}: {}", root.display(), e))?;

    if !canonical.starts_with(&canonical_root) {
        tracing::warn!(
            path = %path.display(),
            target = %canonical.display(),
            "skipping link that points outside of the source"
        );
        return Ok(None);
    }

    let metadata = fs::metadata(&canonical)
        .map_err(|e| anyhow::anyhow!("Failed to read metadata of {}: {}", path.display(), e))?;

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    validate_file_size(metadata.len(), path, MAX_FILE_SIZE)?;

    let content = fs::read_to_string(&canonical)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;

    Ok(Some(content))
}

/// Validates file size is within acceptable limits
///
/// # Errors
/// Returns an error if the file size exceeds the maximum
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            file_size,
            max_size
        );
    }
    Ok(())
}
