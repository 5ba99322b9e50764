use std::borrow::Cow;
use std::env;
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path};

use anyhow::{Context, Result, bail};

// Upper bound for anything read fully into memory: attachments, session files
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Validates that a file's size is within acceptable limits (10MB)
///
/// Takes an open file handle so the size that is checked belongs to the file
/// that is subsequently read.
///
/// # Errors
///
/// Returns an error if the metadata cannot be read or the file is larger than 10MB.
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    let file_size = metadata.len();
    if file_size > MAX_FILE_SIZE_BYTES {
        bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            file_size,
            MAX_FILE_SIZE_BYTES
        );
    }

    Ok(())
}

/// Open a file, check its size and read it whole
pub fn read_bounded(path: &Path) -> Result<Vec<u8>> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    validate_file_size(&file, path)?;

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(bytes)
}

/// Validates a bare file name used to address an entry inside a managed directory
///
/// # Errors
///
/// Returns an error if the name is empty, contains a path separator or is a
/// `.`/`..` component.
pub fn validate_file_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("File name cannot be empty");
    }
    if name.contains('/') || name.contains('\\') {
        bail!("File name must not contain path separators: {}", name);
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => bail!("Invalid file name: {}", name),
    }
}

/// Formats a path with ~ substitution for the home directory
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use qa_assistant::utils::format_path_with_tilde;
///
/// let path = PathBuf::from("/Users/alice/.local/share/qa-assistant");
/// // Returns "~/.local/share/qa-assistant" if HOME=/Users/alice
/// let formatted = format_path_with_tilde(&path);
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

/// Internal helper for path formatting with optional home override (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && !home.is_empty()
        && path_str.starts_with(home)
    {
        return path_str.replacen(home, "~", 1);
    }

    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}
