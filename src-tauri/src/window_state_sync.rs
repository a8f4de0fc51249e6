use std::{env, path::PathBuf, time::Duration};

use tauri::{AppHandle, Manager, Window};

use crate::{
    append_desktop_log, logging, main_window, window_state::WindowStateStore, ShellState,
    WINDOW_STATE_DEBOUNCE_MS, WINDOW_STATE_FILE,
};

pub fn window_state_path(app_handle: &AppHandle) -> PathBuf {
    match app_handle.path().app_config_dir() {
        Ok(dir) => dir.join(WINDOW_STATE_FILE),
        Err(error) => {
            append_desktop_log(&format!(
                "app config directory unavailable ({error}); storing window state next to logs"
            ));
            logging::default_log_root_dir()
                .unwrap_or_else(env::temp_dir)
                .join(WINDOW_STATE_FILE)
        }
    }
}

/// Records the window's current geometry and schedules a debounced write.
pub fn track_main_window(window: &Window) {
    let app_handle = window.app_handle();
    // The quitting close path flushes once on release.
    if app_handle
        .try_state::<ShellState>()
        .map_or(true, |state| state.is_quitting())
    {
        return;
    }
    let Some(store) = app_handle.try_state::<WindowStateStore>() else {
        return;
    };

    let sample = match main_window::capture_sample(window) {
        Ok(sample) => sample,
        Err(error) => {
            append_desktop_log(&format!("window state sample skipped: {error}"));
            return;
        }
    };
    let Some(generation) = store.record(sample) else {
        return;
    };

    let app_handle = app_handle.clone();
    tauri::async_runtime::spawn(async move {
        tokio::time::sleep(Duration::from_millis(WINDOW_STATE_DEBOUNCE_MS)).await;
        if let Some(store) = app_handle.try_state::<WindowStateStore>() {
            store.flush_if_current(generation, append_desktop_log);
        }
    });
}

pub fn flush_window_state(app_handle: &AppHandle) {
    if let Some(store) = app_handle.try_state::<WindowStateStore>() {
        store.flush(append_desktop_log);
    }
}
