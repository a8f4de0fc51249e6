use tauri::{
    menu::{IsMenuItem, Menu, MenuItem, PredefinedMenuItem, Submenu},
    AppHandle, Manager, Wry,
};

use crate::{
    append_desktop_log, main_window,
    menu_actions::is_native_role,
    menu_template::{self, MenuNode, MenuRole},
    ShellState, APP_NAME,
};

fn native_item(
    app_handle: &AppHandle,
    role: MenuRole,
) -> Option<tauri::Result<PredefinedMenuItem<Wry>>> {
    if !is_native_role(role) {
        return None;
    }

    let item = match role {
        MenuRole::Undo => PredefinedMenuItem::undo(app_handle, None),
        MenuRole::Redo => PredefinedMenuItem::redo(app_handle, None),
        MenuRole::Cut => PredefinedMenuItem::cut(app_handle, None),
        MenuRole::Copy => PredefinedMenuItem::copy(app_handle, None),
        MenuRole::Paste => PredefinedMenuItem::paste(app_handle, None),
        MenuRole::SelectAll => PredefinedMenuItem::select_all(app_handle, None),
        MenuRole::About => PredefinedMenuItem::about(app_handle, None, None),
        MenuRole::Services => PredefinedMenuItem::services(app_handle, None),
        MenuRole::Hide => PredefinedMenuItem::hide(app_handle, None),
        MenuRole::HideOthers => PredefinedMenuItem::hide_others(app_handle, None),
        MenuRole::Unhide => PredefinedMenuItem::show_all(app_handle, None),
        _ => return None,
    };
    Some(item)
}

fn build_node(app_handle: &AppHandle, node: &MenuNode) -> Result<Box<dyn IsMenuItem<Wry>>, String> {
    let item: Box<dyn IsMenuItem<Wry>> = match node {
        MenuNode::Separator => Box::new(
            PredefinedMenuItem::separator(app_handle)
                .map_err(|error| format!("Failed to create menu separator: {error}"))?,
        ),
        MenuNode::Role(role) => match native_item(app_handle, *role) {
            Some(item) => Box::new(item.map_err(|error| {
                format!("Failed to create menu item {}: {error}", role.id())
            })?),
            None => Box::new(
                MenuItem::with_id(app_handle, role.id(), role.label(), true, role.accelerator())
                    .map_err(|error| {
                        format!("Failed to create menu item {}: {error}", role.id())
                    })?,
            ),
        },
        MenuNode::Link { id, label, .. } => Box::new(
            MenuItem::with_id(app_handle, *id, *label, true, None::<&str>)
                .map_err(|error| format!("Failed to create menu item {id}: {error}"))?,
        ),
        MenuNode::Submenu { label, children } => {
            let submenu = Submenu::new(app_handle, label, true)
                .map_err(|error| format!("Failed to create submenu {label}: {error}"))?;
            for child in children {
                let built = build_node(app_handle, child)?;
                submenu
                    .append(&*built)
                    .map_err(|error| format!("Failed to populate submenu {label}: {error}"))?;
            }
            Box::new(submenu)
        }
    };
    Ok(item)
}

/// Installs the application menu for the current platform. Safe to call again
/// whenever a window is created; the previous menu is replaced.
pub fn install_app_menu(app_handle: &AppHandle) -> Result<(), String> {
    let platform = app_handle.state::<ShellState>().platform;
    let Some(template) = menu_template::build_menu_template(platform, APP_NAME) else {
        app_handle
            .remove_menu()
            .map_err(|error| format!("Failed to remove application menu: {error}"))?;
        main_window::remove_main_window_menu(app_handle, append_desktop_log);
        return Ok(());
    };

    let menu =
        Menu::new(app_handle).map_err(|error| format!("Failed to create menu bar: {error}"))?;
    for node in &template {
        let built = build_node(app_handle, node)?;
        menu.append(&*built)
            .map_err(|error| format!("Failed to populate menu bar: {error}"))?;
    }
    app_handle
        .set_menu(menu)
        .map_err(|error| format!("Failed to install application menu: {error}"))?;
    Ok(())
}
