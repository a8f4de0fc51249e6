#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_config;
mod app_constants;
mod app_runtime;
mod app_types;
mod connectivity;
mod external_url;
mod lifecycle;
mod lifecycle_controller;
mod logging;
mod main_window;
mod menu_actions;
mod menu_handler;
mod menu_setup;
mod menu_template;
mod origin_policy;
mod platform;
mod session_cache;
mod startup_task;
mod ui_dispatch;
mod update_check;
mod window_state;
mod window_state_sync;

pub(crate) use app_constants::*;
pub(crate) use app_types::ShellState;
pub(crate) use logging::{
    append_desktop_log, append_shutdown_log, append_startup_log, append_update_log,
};

fn main() {
    app_runtime::run();
}
