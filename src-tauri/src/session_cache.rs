use std::{
    fs,
    path::{Path, PathBuf},
};

use tauri::{AppHandle, Manager};

use crate::{platform::Platform, ShellState};

/// HTTP cache directories the webview keeps for this app. Cookie, storage and
/// IndexedDB directories sit next to these and are never included.
///
/// - darwin: WKWebView caches under the app cache dir.
/// - win32: WebView2 keeps its user data folder (`EBWebView`) in the app
///   local data dir, with the caches under its `Default` profile.
/// - other: WebKitGTK gets the `cache` subdirectory of the app local data dir.
pub(crate) fn webview_http_cache_dirs(
    platform: Platform,
    app_cache_dir: &Path,
    app_local_data_dir: &Path,
) -> Vec<PathBuf> {
    match platform {
        Platform::Darwin => vec![app_cache_dir.join("WebKit").join("NetworkCache")],
        Platform::Win32 => {
            let profile = app_local_data_dir.join("EBWebView").join("Default");
            vec![profile.join("Cache"), profile.join("Code Cache")]
        }
        Platform::Other => vec![app_local_data_dir.join("cache")],
    }
}

fn clear_http_caches<F>(targets: &[PathBuf], log: F)
where
    F: Fn(&str),
{
    for dir in targets {
        match clear_directory_contents(dir) {
            Ok(removed) => log(&format!(
                "cleared session cache {} ({removed} entries)",
                dir.display()
            )),
            Err(error) => log(&error),
        }
    }
}

/// Removes everything below `dir`, keeping `dir` itself. Returns how many
/// entries were removed; entries that cannot be removed are reported in the
/// error after the rest have been attempted.
pub(crate) fn clear_directory_contents(dir: &Path) -> Result<usize, String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(error) => {
            return Err(format!(
                "Failed to read cache directory {}: {}",
                dir.display(),
                error
            ))
        }
    };

    let mut removed = 0;
    let mut failures = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let result = match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => fs::remove_dir_all(&path),
            _ => fs::remove_file(&path),
        };
        match result {
            Ok(()) => removed += 1,
            Err(error) => failures.push(format!("{}: {}", path.display(), error)),
        }
    }

    if failures.is_empty() {
        Ok(removed)
    } else {
        Err(format!(
            "Failed to remove {} cache entries: {}",
            failures.len(),
            failures.join("; ")
        ))
    }
}

pub(crate) fn clear_session_cache<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let path = app_handle.path();
    let (cache_dir, local_data_dir) = match (path.app_cache_dir(), path.app_local_data_dir()) {
        (Ok(cache_dir), Ok(local_data_dir)) => (cache_dir, local_data_dir),
        (Err(error), _) | (_, Err(error)) => {
            log(&format!("session cache directory unavailable: {error}"));
            return;
        }
    };

    let platform = app_handle.state::<ShellState>().platform;
    clear_http_caches(
        &webview_http_cache_dirs(platform, &cache_dir, &local_data_dir),
        log,
    );
}
