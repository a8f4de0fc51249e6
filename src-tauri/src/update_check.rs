use std::{sync::Mutex, time::Instant};

use semver::Version;
use tauri::{AppHandle, Manager};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use tauri_plugin_updater::{Update, UpdaterExt};

use crate::{append_update_log, platform::Platform, window_state_sync, ShellState, APP_NAME};

/// When a downloaded update is handed to the platform installer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InstallTiming {
    /// Staging only swaps files on disk; the running app keeps going.
    StageThenPrompt,
    /// The installer replaces the running process, so it may only start once
    /// the user agreed to restart or the app is quitting anyway.
    PromptThenInstall,
}

pub(crate) fn install_timing(platform: Platform) -> InstallTiming {
    match platform {
        Platform::Win32 => InstallTiming::PromptThenInstall,
        Platform::Darwin | Platform::Other => InstallTiming::StageThenPrompt,
    }
}

/// A downloaded update waiting for the app to quit.
#[derive(Default)]
pub(crate) struct PendingUpdate(Mutex<Option<(Update, Vec<u8>)>>);

impl PendingUpdate {
    fn store(&self, update: Update, bytes: Vec<u8>) {
        if let Ok(mut pending) = self.0.lock() {
            *pending = Some((update, bytes));
        }
    }

    fn take(&self) -> Option<(Update, Vec<u8>)> {
        self.0.lock().ok()?.take()
    }
}

fn parse_version(raw: &str) -> Result<Version, String> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(trimmed).map_err(|error| format!("invalid version '{raw}': {error}"))
}

pub(crate) fn is_newer_version(current: &str, candidate: &str) -> Result<bool, String> {
    Ok(parse_version(candidate)? > parse_version(current)?)
}

pub(crate) fn update_ready_message(version: &str) -> String {
    format!(
        "{APP_NAME} {version} has been downloaded and will be applied the next time you restart {APP_NAME}.\nRestart now?"
    )
}

/// Fire-and-forget startup check. Every failure is logged and swallowed.
pub async fn run_startup_update_check(app_handle: AppHandle) {
    let current_version = app_handle.package_info().version.to_string();

    append_update_log("initializing updater");
    let exit_handle = app_handle.clone();
    let updater = match app_handle
        .updater_builder()
        .on_before_exit(move || {
            append_update_log("installer taking over; flushing window state");
            window_state_sync::flush_window_state(&exit_handle);
        })
        .build()
    {
        Ok(updater) => updater,
        Err(error) => {
            append_update_log(&format!("failed to initialize updater: {error}"));
            return;
        }
    };

    let check_started = Instant::now();
    let update = match updater.check().await {
        Ok(Some(update)) => update,
        Ok(None) => {
            append_update_log(&format!(
                "check finished: has_update=false current_version={} elapsed_ms={}",
                current_version,
                check_started.elapsed().as_millis()
            ));
            return;
        }
        Err(error) => {
            append_update_log(&format!(
                "check failed (silent): current_version={} elapsed_ms={} error={}",
                current_version,
                check_started.elapsed().as_millis(),
                error
            ));
            return;
        }
    };

    let new_version = update.version.to_string();
    append_update_log(&format!(
        "check finished: has_update=true current_version={} latest_version={} elapsed_ms={}",
        current_version,
        new_version,
        check_started.elapsed().as_millis()
    ));
    match is_newer_version(&current_version, &new_version) {
        Ok(true) => {}
        Ok(false) => {
            append_update_log(&format!(
                "ignoring update {new_version}: not newer than {current_version}"
            ));
            return;
        }
        Err(error) => {
            append_update_log(&format!("ignoring update: {error}"));
            return;
        }
    }

    append_update_log(&format!("downloading update {new_version}"));
    let downloaded_bytes = match update.download(|_, _| {}, || {}).await {
        Ok(bytes) => bytes,
        Err(error) => {
            append_update_log(&format!("failed to download update: {error}"));
            return;
        }
    };

    let platform = app_handle.state::<ShellState>().platform;
    match install_timing(platform) {
        InstallTiming::StageThenPrompt => {
            if let Err(error) = update.install(&downloaded_bytes) {
                append_update_log(&format!("failed to stage update: {error}"));
                return;
            }
            append_update_log(&format!("update {new_version} staged for next restart"));
            if prompt_restart(&app_handle, &new_version) {
                append_update_log("user chose to restart now");
                app_handle.request_restart();
            } else {
                append_update_log("user deferred restart");
            }
        }
        InstallTiming::PromptThenInstall => {
            if prompt_restart(&app_handle, &new_version) {
                append_update_log("user chose to restart now; launching installer");
                install_now(&update, &downloaded_bytes);
            } else {
                append_update_log(&format!("update {new_version} will install on quit"));
                if let Some(pending) = app_handle.try_state::<PendingUpdate>() {
                    pending.store(update, downloaded_bytes);
                }
            }
        }
    }
}

fn prompt_restart(app_handle: &AppHandle, version: &str) -> bool {
    app_handle
        .dialog()
        .message(update_ready_message(version))
        .title("Update ready")
        .kind(MessageDialogKind::Info)
        .buttons(MessageDialogButtons::YesNo)
        .blocking_show()
}

fn install_now(update: &Update, bytes: &[u8]) {
    if let Err(error) = update.install(bytes) {
        append_update_log(&format!("failed to install update: {error}"));
    }
}

/// Hands an update the user deferred to the installer. Runs at exit, after
/// the window state has been flushed.
pub fn install_pending_update(app_handle: &AppHandle) {
    let Some(pending) = app_handle.try_state::<PendingUpdate>() else {
        return;
    };
    if let Some((update, bytes)) = pending.take() {
        append_update_log(&format!("installing deferred update {}", update.version));
        install_now(&update, &bytes);
    }
}
