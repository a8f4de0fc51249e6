use tauri::{
    window::Color, AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder, Window,
};
use url::Url;

use crate::{
    append_desktop_log, external_url,
    menu_actions::RELOAD_SCRIPT,
    origin_policy::{self, NavigationDecision},
    window_state::{self, Bounds, WindowGeometry, WindowSample, WindowStateStore},
    ShellState, APP_NAME, MAIN_WINDOW_BACKGROUND, MAIN_WINDOW_LABEL, MIN_WINDOW_HEIGHT,
    MIN_WINDOW_WIDTH,
};

fn allow_navigation(content_url: &Url, target: &Url) -> bool {
    match origin_policy::decide_navigation(content_url, target) {
        NavigationDecision::Allow => true,
        NavigationDecision::OpenExternally => {
            if let Err(error) = external_url::open_external_url(target.as_str()) {
                append_desktop_log(&format!("failed to open external link {target}: {error}"));
            }
            false
        }
        NavigationDecision::Block => {
            append_desktop_log(&format!("blocked navigation to {target}"));
            false
        }
    }
}

fn monitor_bounds(app_handle: &AppHandle) -> Vec<Bounds> {
    let monitors = match app_handle.available_monitors() {
        Ok(monitors) => monitors,
        Err(error) => {
            append_desktop_log(&format!("failed to enumerate monitors: {error}"));
            return Vec::new();
        }
    };

    monitors
        .iter()
        .map(|monitor| {
            let scale_factor = monitor.scale_factor();
            let position = monitor.position().to_logical::<f64>(scale_factor);
            let size = monitor.size().to_logical::<f64>(scale_factor);
            Bounds {
                x: position.x.round() as i32,
                y: position.y.round() as i32,
                width: size.width.round() as u32,
                height: size.height.round() as u32,
            }
        })
        .collect()
}

/// Builds the main window hidden, at the restored geometry. It is shown once
/// the first page load finishes.
pub fn create_main_window(app_handle: &AppHandle) -> Result<(), String> {
    if app_handle.get_webview_window(MAIN_WINDOW_LABEL).is_some() {
        return Ok(());
    }

    let content_url = app_handle.state::<ShellState>().config.content_url.clone();
    let restored = app_handle
        .try_state::<WindowStateStore>()
        .map(|store| store.geometry())
        .unwrap_or_else(|| WindowGeometry::default().clamped());
    let geometry = window_state::ensure_visible(restored, &monitor_bounds(app_handle));

    let navigation_origin = content_url.clone();
    let (red, green, blue) = MAIN_WINDOW_BACKGROUND;
    let mut builder = WebviewWindowBuilder::new(
        app_handle,
        MAIN_WINDOW_LABEL,
        WebviewUrl::External(content_url),
    )
    .title(APP_NAME)
    .inner_size(f64::from(geometry.width), f64::from(geometry.height))
    .min_inner_size(f64::from(MIN_WINDOW_WIDTH), f64::from(MIN_WINDOW_HEIGHT))
    .visible(false)
    .maximized(geometry.maximized)
    .fullscreen(geometry.fullscreen)
    .background_color(Color(red, green, blue, 255))
    .on_navigation(move |target| allow_navigation(&navigation_origin, target));

    builder = match geometry.position() {
        Some((x, y)) => builder.position(f64::from(x), f64::from(y)),
        None => builder.center(),
    };

    #[cfg(target_os = "macos")]
    {
        builder = builder
            .title_bar_style(tauri::TitleBarStyle::Overlay)
            .hidden_title(true);
    }

    builder
        .build()
        .map(|_| ())
        .map_err(|error| format!("Failed to create main window: {error}"))
}

fn with_main_window<F, A>(app_handle: &AppHandle, action: &str, log: F, run: A)
where
    F: Fn(&str),
    A: FnOnce(&WebviewWindow) -> tauri::Result<()>,
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log(&format!("{action} skipped: main window not found"));
        return;
    };
    if let Err(error) = run(&window) {
        log(&format!("failed to {action}: {error}"));
    }
}

pub fn show_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    with_main_window(app_handle, "show main window", log, |window| {
        if window.is_minimized().unwrap_or(false) {
            window.unminimize()?;
        }
        window.show()?;
        window.set_focus()
    });
}

pub fn hide_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    with_main_window(app_handle, "hide main window", log, |window| window.hide());
}

pub fn close_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    with_main_window(app_handle, "close main window", log, |window| window.close());
}

pub fn reload_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    with_main_window(app_handle, "reload main window", log, |window| {
        window.eval(RELOAD_SCRIPT)
    });
}

pub fn eval_in_main_window<F>(app_handle: &AppHandle, action: &str, script: &str, log: F)
where
    F: Fn(&str),
{
    with_main_window(app_handle, action, log, |window| window.eval(script));
}

pub fn minimize_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    with_main_window(app_handle, "minimize main window", log, |window| {
        window.minimize()
    });
}

pub fn toggle_maximize_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    with_main_window(app_handle, "toggle maximize", log, |window| {
        if window.is_maximized()? {
            window.unmaximize()
        } else {
            window.maximize()
        }
    });
}

pub fn toggle_fullscreen_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    with_main_window(app_handle, "toggle fullscreen", log, |window| {
        let fullscreen = window.is_fullscreen()?;
        window.set_fullscreen(!fullscreen)
    });
}

pub fn toggle_main_window_devtools<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    with_main_window(app_handle, "toggle devtools", log, |window| {
        if window.is_devtools_open() {
            window.close_devtools();
        } else {
            window.open_devtools();
        }
        Ok(())
    });
}

pub fn set_main_window_zoom<F>(app_handle: &AppHandle, factor: f64, log: F)
where
    F: Fn(&str),
{
    with_main_window(app_handle, "set zoom", log, |window| window.set_zoom(factor));
}

pub fn remove_main_window_menu<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    with_main_window(app_handle, "remove window menu", log, |window| {
        window.remove_menu().map(|_| ())
    });
}

/// Current geometry of `window` in logical pixels.
pub fn capture_sample(window: &Window) -> Result<WindowSample, String> {
    let scale_factor = window
        .scale_factor()
        .map_err(|error| format!("Failed to read scale factor: {error}"))?;
    let position = window
        .outer_position()
        .map_err(|error| format!("Failed to read window position: {error}"))?
        .to_logical::<f64>(scale_factor);
    let size = window
        .inner_size()
        .map_err(|error| format!("Failed to read window size: {error}"))?
        .to_logical::<f64>(scale_factor);

    Ok(WindowSample {
        bounds: Bounds {
            x: position.x.round() as i32,
            y: position.y.round() as i32,
            width: size.width.round() as u32,
            height: size.height.round() as u32,
        },
        maximized: window.is_maximized().unwrap_or(false),
        fullscreen: window.is_fullscreen().unwrap_or(false),
        minimized: window.is_minimized().unwrap_or(false),
    })
}
