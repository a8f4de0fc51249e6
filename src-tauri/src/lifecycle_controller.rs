use tauri::{AppHandle, ExitRequestApi, Manager};

use crate::{
    append_desktop_log, append_shutdown_log,
    lifecycle::{ExitRequest, LifecycleEffect, LifecycleSignal},
    main_window, menu_setup, session_cache, window_state_sync, ShellState,
};

/// Feeds `signal` to the lifecycle state machine and carries out the
/// window-level effects. Effects that need the originating event
/// (`PreventClose`, `CloseWindow`, `KeepAlive`, `QuitApp`) are returned for the
/// caller to act on.
pub fn dispatch_signal(app_handle: &AppHandle, signal: LifecycleSignal) -> Vec<LifecycleEffect> {
    let Some(state) = app_handle.try_state::<ShellState>() else {
        return Vec::new();
    };
    let effects = match state.dispatch(signal) {
        Ok(effects) => effects,
        Err(error) => {
            append_desktop_log(&format!("lifecycle signal {signal:?} dropped: {error}"));
            return Vec::new();
        }
    };
    match state.lifecycle_summary() {
        Some((lifecycle_state, has_window)) => append_desktop_log(&format!(
            "lifecycle {signal:?} -> {effects:?} (state={lifecycle_state:?}, window={has_window})"
        )),
        None => append_desktop_log(&format!("lifecycle {signal:?} -> {effects:?}")),
    }

    for effect in &effects {
        apply_effect(app_handle, *effect);
    }
    effects
}

fn apply_effect(app_handle: &AppHandle, effect: LifecycleEffect) {
    match effect {
        LifecycleEffect::CreateWindow => match main_window::create_main_window(app_handle) {
            Ok(()) => {
                dispatch_signal(app_handle, LifecycleSignal::WindowCreated);
                if let Err(error) = menu_setup::install_app_menu(app_handle) {
                    append_desktop_log(&format!("failed to install application menu: {error}"));
                }
            }
            Err(error) => append_desktop_log(&error),
        },
        LifecycleEffect::ShowWindow => main_window::show_main_window(app_handle, append_desktop_log),
        LifecycleEffect::HideWindow => main_window::hide_main_window(app_handle, append_desktop_log),
        LifecycleEffect::ClearSessionCache => {
            session_cache::clear_session_cache(app_handle, append_shutdown_log)
        }
        LifecycleEffect::ReleaseWindow => window_state_sync::flush_window_state(app_handle),
        LifecycleEffect::PreventClose
        | LifecycleEffect::CloseWindow
        | LifecycleEffect::KeepAlive
        | LifecycleEffect::QuitApp => {}
    }
}

/// Quit initiated by the shell itself (menu or offline gate).
pub fn request_quit(app_handle: &AppHandle) {
    append_shutdown_log("quit requested");
    let effects = dispatch_signal(app_handle, LifecycleSignal::BeforeQuit);
    if effects.contains(&LifecycleEffect::CloseWindow) {
        main_window::close_main_window(app_handle, append_shutdown_log);
    }
    if effects.contains(&LifecycleEffect::QuitApp) {
        app_handle.exit(0);
    }
}

pub fn handle_exit_requested(app_handle: &AppHandle, code: Option<i32>, api: &ExitRequestApi) {
    let request = ExitRequest::from_code(code);
    if let ExitRequest::Explicit(code) = request {
        append_shutdown_log(&format!("exit requested with code {code}"));
    }

    let effects = dispatch_signal(app_handle, request.signal());
    if let Some(signal) = request.follow_up(&effects) {
        dispatch_signal(app_handle, signal);
    }
    if effects.contains(&LifecycleEffect::KeepAlive) {
        append_desktop_log("all windows closed; staying alive until reactivated");
        api.prevent_exit();
    }
}
