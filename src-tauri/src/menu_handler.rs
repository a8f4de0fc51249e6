use tauri::{AppHandle, Manager};

use crate::{
    append_desktop_log, external_url,
    lifecycle::LifecycleSignal,
    lifecycle_controller, main_window,
    menu_actions::{self, ZoomChange},
    menu_template::{self, MenuRole},
    session_cache, ShellState, APP_NAME,
};

fn apply_zoom(app_handle: &AppHandle, change: ZoomChange) {
    let state = app_handle.state::<ShellState>();
    let percent =
        state.update_zoom_percent(|current| menu_actions::next_zoom_percent(current, change));
    main_window::set_main_window_zoom(
        app_handle,
        menu_actions::zoom_factor(percent),
        append_desktop_log,
    );
}

fn open_menu_link(app_handle: &AppHandle, menu_id: &str) {
    let platform = app_handle.state::<ShellState>().platform;
    let Some(template) = menu_template::build_menu_template(platform, APP_NAME) else {
        return;
    };
    let Some(url) = menu_template::find_link_url(&template, menu_id) else {
        return;
    };
    if let Err(error) = external_url::open_external_url(url) {
        append_desktop_log(&format!("failed to open {url}: {error}"));
    }
}

pub fn handle_menu_event(app_handle: &AppHandle, menu_id: &str) {
    let Some(role) = menu_template::role_from_menu_id(menu_id) else {
        open_menu_link(app_handle, menu_id);
        return;
    };

    match role {
        MenuRole::Reload => main_window::reload_main_window(app_handle, append_desktop_log),
        MenuRole::ForceReload => {
            session_cache::clear_session_cache(app_handle, append_desktop_log);
            main_window::reload_main_window(app_handle, append_desktop_log);
        }
        MenuRole::ToggleDevTools => {
            main_window::toggle_main_window_devtools(app_handle, append_desktop_log)
        }
        MenuRole::ResetZoom => apply_zoom(app_handle, ZoomChange::Reset),
        MenuRole::ZoomIn => apply_zoom(app_handle, ZoomChange::In),
        MenuRole::ZoomOut => apply_zoom(app_handle, ZoomChange::Out),
        MenuRole::ToggleFullscreen => {
            main_window::toggle_fullscreen_main_window(app_handle, append_desktop_log)
        }
        MenuRole::Minimize => main_window::minimize_main_window(app_handle, append_desktop_log),
        MenuRole::Close => main_window::close_main_window(app_handle, append_desktop_log),
        MenuRole::Zoom => main_window::toggle_maximize_main_window(app_handle, append_desktop_log),
        MenuRole::Front => {
            lifecycle_controller::dispatch_signal(app_handle, LifecycleSignal::Activate);
        }
        MenuRole::Quit => lifecycle_controller::request_quit(app_handle),
        MenuRole::PasteAndMatchStyle => main_window::eval_in_main_window(
            app_handle,
            "paste and match style",
            menu_actions::PASTE_AND_MATCH_STYLE_SCRIPT,
            append_desktop_log,
        ),
        MenuRole::Delete => main_window::eval_in_main_window(
            app_handle,
            "delete selection",
            menu_actions::DELETE_SELECTION_SCRIPT,
            append_desktop_log,
        ),
        MenuRole::StartSpeaking => main_window::eval_in_main_window(
            app_handle,
            "start speaking",
            menu_actions::START_SPEAKING_SCRIPT,
            append_desktop_log,
        ),
        MenuRole::StopSpeaking => main_window::eval_in_main_window(
            app_handle,
            "stop speaking",
            menu_actions::STOP_SPEAKING_SCRIPT,
            append_desktop_log,
        ),
        MenuRole::Undo
        | MenuRole::Redo
        | MenuRole::Cut
        | MenuRole::Copy
        | MenuRole::Paste
        | MenuRole::SelectAll
        | MenuRole::About
        | MenuRole::Services
        | MenuRole::Hide
        | MenuRole::HideOthers
        | MenuRole::Unhide => {}
    }
}
