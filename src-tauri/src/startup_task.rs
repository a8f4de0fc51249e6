use tauri::{AppHandle, Manager};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};

use crate::{
    connectivity, lifecycle::LifecycleSignal, lifecycle_controller, ui_dispatch, update_check,
    ShellState, APP_NAME,
};

pub(crate) const OFFLINE_DIALOG_TITLE: &str = "No internet connection";

pub(crate) fn offline_dialog_detail() -> String {
    format!("{APP_NAME} currently does not work offline.")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StartupAction {
    /// Tell the user the app needs a connection, then quit without a window.
    QuitOffline,
    OpenMainWindow,
}

impl StartupAction {
    /// The lifecycle signal this outcome feeds to the state machine.
    pub(crate) fn signal(self) -> LifecycleSignal {
        match self {
            Self::QuitOffline => LifecycleSignal::BeforeQuit,
            Self::OpenMainWindow => LifecycleSignal::Ready,
        }
    }
}

pub(crate) fn decide_startup(online: bool) -> StartupAction {
    if online {
        StartupAction::OpenMainWindow
    } else {
        StartupAction::QuitOffline
    }
}

fn show_offline_dialog_and_quit<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    log("network unreachable; showing offline dialog");
    app_handle
        .dialog()
        .message(offline_dialog_detail())
        .title(OFFLINE_DIALOG_TITLE)
        .kind(MessageDialogKind::Warning)
        .buttons(MessageDialogButtons::Ok)
        .blocking_show();
    lifecycle_controller::request_quit(app_handle);
}

/// Connectivity gate, then main window, then the update check.
pub fn spawn_startup_task<F>(app_handle: AppHandle, log: F)
where
    F: Fn(&str) + Copy + Send + Sync + 'static,
{
    tauri::async_runtime::spawn(async move {
        let (targets, timeout, update_check_enabled) = {
            let state = app_handle.state::<ShellState>();
            (
                connectivity::probe_targets(&state.config.content_url),
                state.config.connectivity_timeout,
                state.config.update_check_enabled,
            )
        };

        log("checking network connectivity");
        let online = match tauri::async_runtime::spawn_blocking(move || {
            connectivity::is_online(&targets, timeout, log)
        })
        .await
        {
            Ok(online) => online,
            Err(error) => {
                log(&format!(
                    "connectivity check task failed: {error}; continuing startup"
                ));
                true
            }
        };

        let action = decide_startup(online);
        if action == StartupAction::QuitOffline {
            show_offline_dialog_and_quit(&app_handle, log);
            return;
        }

        let signal = action.signal();
        let dispatched = ui_dispatch::run_on_main_thread_dispatch(
            &app_handle,
            "create main window",
            move |main_app| {
                lifecycle_controller::dispatch_signal(main_app, signal);
            },
        );
        if let Err(error) = dispatched {
            log(&error);
            return;
        }

        if update_check_enabled {
            update_check::run_startup_update_check(app_handle.clone()).await;
        } else {
            log("update check disabled for this run");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        lifecycle::{LifecycleEffect, MainWindowLifecycle},
        platform::Platform,
    };

    #[test]
    fn offline_startup_quits_before_any_window_exists() {
        let action = decide_startup(false);
        assert_eq!(action, StartupAction::QuitOffline);
        assert_ne!(action.signal(), LifecycleSignal::Ready);

        let mut lifecycle = MainWindowLifecycle::new(Platform::Darwin);
        assert_eq!(
            lifecycle.dispatch(action.signal()),
            vec![LifecycleEffect::QuitApp]
        );
        assert!(!lifecycle.has_window());
        // A late Ready must not open a window once quitting.
        assert!(lifecycle.dispatch(LifecycleSignal::Ready).is_empty());
    }

    #[test]
    fn online_startup_creates_the_main_window() {
        let action = decide_startup(true);
        assert_eq!(action, StartupAction::OpenMainWindow);

        let mut lifecycle = MainWindowLifecycle::new(Platform::Win32);
        assert_eq!(
            lifecycle.dispatch(action.signal()),
            vec![LifecycleEffect::CreateWindow]
        );
    }

    #[test]
    fn offline_dialog_copy() {
        assert_eq!(OFFLINE_DIALOG_TITLE, "No internet connection");
        assert_eq!(
            offline_dialog_detail(),
            "Walnut currently does not work offline."
        );
    }
}
