use tauri::{webview::PageLoadEvent, Manager, RunEvent, WindowEvent};

use crate::{
    append_desktop_log, append_shutdown_log, append_startup_log,
    app_config::ShellConfig,
    lifecycle::{LifecycleEffect, LifecycleSignal},
    lifecycle_controller, logging, menu_handler,
    platform::Platform,
    startup_task,
    update_check::{self, PendingUpdate},
    window_state::WindowStateStore,
    window_state_sync, ShellState, DESKTOP_LOG_FILE, MAIN_WINDOW_LABEL,
};

pub(crate) fn run() {
    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        logging::resolve_desktop_log_path(logging::default_log_root_dir(), DESKTOP_LOG_FILE)
            .display()
    ));

    let config = match ShellConfig::from_env(append_startup_log) {
        Ok(config) => config,
        Err(error) => {
            append_startup_log(&format!("invalid shell configuration: {error}"));
            return;
        }
    };
    let platform = Platform::current();
    append_startup_log(&format!(
        "mode={:?} content_url={} platform={:?} update_check={}",
        config.mode, config.content_url, platform, config.update_check_enabled
    ));

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            append_desktop_log("second instance launched; activating main window");
            lifecycle_controller::dispatch_signal(app, LifecycleSignal::Activate);
        }))
        .plugin(tauri_plugin_updater::Builder::new().build())
        .plugin(tauri_plugin_dialog::init())
        .manage(ShellState::new(config, platform))
        .on_menu_event(|app, event| menu_handler::handle_menu_event(app, event.id().as_ref()))
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW_LABEL {
                return;
            }

            match event {
                WindowEvent::CloseRequested { api, .. } => {
                    let effects = lifecycle_controller::dispatch_signal(
                        window.app_handle(),
                        LifecycleSignal::CloseRequested,
                    );
                    if effects.contains(&LifecycleEffect::PreventClose) {
                        api.prevent_close();
                    }
                }
                WindowEvent::Moved(_) | WindowEvent::Resized(_) => {
                    window_state_sync::track_main_window(window);
                }
                WindowEvent::Destroyed => {
                    lifecycle_controller::dispatch_signal(
                        window.app_handle(),
                        LifecycleSignal::WindowDestroyed,
                    );
                }
                _ => {}
            }
        })
        .on_page_load(|webview, payload| match payload.event() {
            PageLoadEvent::Started => {
                append_desktop_log(&format!("page-load started: {}", payload.url()));
            }
            PageLoadEvent::Finished => {
                append_desktop_log(&format!("page-load finished: {}", payload.url()));
                if webview.window().label() == MAIN_WINDOW_LABEL {
                    lifecycle_controller::dispatch_signal(
                        webview.app_handle(),
                        LifecycleSignal::FirstPaint,
                    );
                }
            }
        })
        .setup(|app| {
            let app_handle = app.handle().clone();
            let store = WindowStateStore::open(
                window_state_sync::window_state_path(&app_handle),
                append_startup_log,
            );
            append_startup_log(&format!(
                "window state path: {}",
                store.path().display()
            ));
            app_handle.manage(store);
            app_handle.manage(PendingUpdate::default());

            startup_task::spawn_startup_task(app_handle, append_startup_log);
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { code, api, .. } => {
                lifecycle_controller::handle_exit_requested(app_handle, code, &api);
            }
            RunEvent::Exit => {
                window_state_sync::flush_window_state(app_handle);
                update_check::install_pending_update(app_handle);
                append_shutdown_log("desktop process exiting");
            }
            #[cfg(target_os = "macos")]
            RunEvent::Reopen { .. } => {
                lifecycle_controller::dispatch_signal(app_handle, LifecycleSignal::Activate);
            }
            _ => {}
        });
}
