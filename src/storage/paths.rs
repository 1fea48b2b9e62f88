//! Data file location

use std::env;
use std::path::{Path, PathBuf};

/// Resolves the data file to read.
///
/// A non-blank explicit path is used as given. Otherwise `default_file` is
/// looked up next to the running executable, falling back to the working
/// directory when the executable's location is unknown.
pub fn resolve_data_path(explicit: Option<&Path>, default_file: &str) -> PathBuf {
    if let Some(path) = explicit.filter(|p| !is_blank(p)) {
        return path.to_path_buf();
    }

    match env::current_exe() {
        Ok(exe) => match exe.parent() {
            Some(dir) => dir.join(default_file),
            None => PathBuf::from(default_file),
        },
        Err(_) => PathBuf::from(default_file),
    }
}

/// Resolves the save target: non-blank explicit path, else `default_file` in
/// the working directory.
pub fn resolve_output_path(explicit: Option<&Path>, default_file: &str) -> PathBuf {
    explicit
        .filter(|p| !is_blank(p))
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(default_file))
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}
