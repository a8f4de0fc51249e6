use std::{
    env,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{DESKTOP_LOG_ENV, DESKTOP_LOG_FILE, DESKTOP_LOG_MAX_BYTES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogCategory {
    Startup,
    Desktop,
    Update,
    Shutdown,
}

impl LogCategory {
    fn tag(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Desktop => "desktop",
            Self::Update => "update",
            Self::Shutdown => "shutdown",
        }
    }
}

pub(crate) fn default_log_root_dir() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(".walnut"))
}

pub(crate) fn resolve_desktop_log_path(root_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    if let Ok(raw) = env::var(DESKTOP_LOG_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match root_dir {
        Some(root) => root.join("logs").join(file_name),
        None => env::temp_dir().join("walnut").join(file_name),
    }
}

pub(crate) fn format_log_line(category: LogCategory, message: &str) -> String {
    format!(
        "[{}] [{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        category.tag(),
        message
    )
}

fn rotated_path(path: &Path) -> PathBuf {
    let mut rotated = path.as_os_str().to_owned();
    rotated.push(".1");
    PathBuf::from(rotated)
}

pub(crate) fn rotate_if_needed(path: &Path, max_bytes: u64) -> Result<bool, String> {
    let size = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(error) => {
            return Err(format!(
                "Failed to stat desktop log {}: {}",
                path.display(),
                error
            ))
        }
    };
    if size < max_bytes {
        return Ok(false);
    }

    fs::rename(path, rotated_path(path)).map_err(|error| {
        format!(
            "Failed to rotate desktop log {}: {}",
            path.display(),
            error
        )
    })?;
    Ok(true)
}

pub(crate) fn append_log_line(path: &Path, line: &str, max_bytes: u64) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|error| {
            format!(
                "Failed to create log directory {}: {}",
                parent.display(),
                error
            )
        })?;
    }
    rotate_if_needed(path, max_bytes)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|error| format!("Failed to open desktop log {}: {}", path.display(), error))?;
    writeln!(file, "{line}")
        .map_err(|error| format!("Failed to write desktop log {}: {}", path.display(), error))
}

fn append_categorized_log(category: LogCategory, message: &str) {
    let line = format_log_line(category, message);
    eprintln!("{line}");

    let path = resolve_desktop_log_path(default_log_root_dir(), DESKTOP_LOG_FILE);
    if let Err(error) = append_log_line(&path, &line, DESKTOP_LOG_MAX_BYTES) {
        eprintln!("{error}");
    }
}

pub(crate) fn append_startup_log(message: &str) {
    append_categorized_log(LogCategory::Startup, message);
}

pub(crate) fn append_desktop_log(message: &str) {
    append_categorized_log(LogCategory::Desktop, message);
}

pub(crate) fn append_update_log(message: &str) {
    append_categorized_log(LogCategory::Update, message);
}

pub(crate) fn append_shutdown_log(message: &str) {
    append_categorized_log(LogCategory::Shutdown, message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_log_line_includes_category_tag() {
        let line = format_log_line(LogCategory::Update, "checking");
        assert!(line.ends_with("[update] checking"));
        assert!(line.starts_with('['));
    }

    #[test]
    fn append_log_line_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("logs").join("desktop.log");

        append_log_line(&path, "first", 1024).expect("append first");
        append_log_line(&path, "second", 1024).expect("append second");

        let content = fs::read_to_string(&path).expect("read log");
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn append_log_line_rotates_oversized_log() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("desktop.log");
        fs::write(&path, "0123456789").expect("seed log");

        append_log_line(&path, "fresh", 8).expect("append after rotation");

        assert_eq!(fs::read_to_string(&path).expect("read log"), "fresh\n");
        assert_eq!(
            fs::read_to_string(rotated_path(&path)).expect("read rotated log"),
            "0123456789"
        );
    }

    #[test]
    fn rotate_if_needed_ignores_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing.log");
        assert_eq!(rotate_if_needed(&path, 1), Ok(false));
    }
}
