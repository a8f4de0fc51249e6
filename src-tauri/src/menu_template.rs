use crate::{platform::Platform, HELP_URL};

pub(crate) const MENU_LEARN_MORE: &str = "menu_learn_more";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MenuRole {
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    PasteAndMatchStyle,
    Delete,
    SelectAll,
    Reload,
    ForceReload,
    ToggleDevTools,
    ResetZoom,
    ZoomIn,
    ZoomOut,
    ToggleFullscreen,
    Minimize,
    Close,
    Zoom,
    Front,
    About,
    Services,
    Hide,
    HideOthers,
    Unhide,
    Quit,
    StartSpeaking,
    StopSpeaking,
}

const ALL_ROLES: &[MenuRole] = &[
    MenuRole::Undo,
    MenuRole::Redo,
    MenuRole::Cut,
    MenuRole::Copy,
    MenuRole::Paste,
    MenuRole::PasteAndMatchStyle,
    MenuRole::Delete,
    MenuRole::SelectAll,
    MenuRole::Reload,
    MenuRole::ForceReload,
    MenuRole::ToggleDevTools,
    MenuRole::ResetZoom,
    MenuRole::ZoomIn,
    MenuRole::ZoomOut,
    MenuRole::ToggleFullscreen,
    MenuRole::Minimize,
    MenuRole::Close,
    MenuRole::Zoom,
    MenuRole::Front,
    MenuRole::About,
    MenuRole::Services,
    MenuRole::Hide,
    MenuRole::HideOthers,
    MenuRole::Unhide,
    MenuRole::Quit,
    MenuRole::StartSpeaking,
    MenuRole::StopSpeaking,
];

impl MenuRole {
    pub(crate) fn id(self) -> &'static str {
        match self {
            Self::Undo => "menu_undo",
            Self::Redo => "menu_redo",
            Self::Cut => "menu_cut",
            Self::Copy => "menu_copy",
            Self::Paste => "menu_paste",
            Self::PasteAndMatchStyle => "menu_paste_and_match_style",
            Self::Delete => "menu_delete",
            Self::SelectAll => "menu_select_all",
            Self::Reload => "menu_reload",
            Self::ForceReload => "menu_force_reload",
            Self::ToggleDevTools => "menu_toggle_devtools",
            Self::ResetZoom => "menu_reset_zoom",
            Self::ZoomIn => "menu_zoom_in",
            Self::ZoomOut => "menu_zoom_out",
            Self::ToggleFullscreen => "menu_toggle_fullscreen",
            Self::Minimize => "menu_minimize",
            Self::Close => "menu_close",
            Self::Zoom => "menu_zoom",
            Self::Front => "menu_front",
            Self::About => "menu_about",
            Self::Services => "menu_services",
            Self::Hide => "menu_hide",
            Self::HideOthers => "menu_hide_others",
            Self::Unhide => "menu_unhide",
            Self::Quit => "menu_quit",
            Self::StartSpeaking => "menu_start_speaking",
            Self::StopSpeaking => "menu_stop_speaking",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Undo => "Undo",
            Self::Redo => "Redo",
            Self::Cut => "Cut",
            Self::Copy => "Copy",
            Self::Paste => "Paste",
            Self::PasteAndMatchStyle => "Paste and Match Style",
            Self::Delete => "Delete",
            Self::SelectAll => "Select All",
            Self::Reload => "Reload",
            Self::ForceReload => "Force Reload",
            Self::ToggleDevTools => "Toggle Developer Tools",
            Self::ResetZoom => "Actual Size",
            Self::ZoomIn => "Zoom In",
            Self::ZoomOut => "Zoom Out",
            Self::ToggleFullscreen => "Toggle Full Screen",
            Self::Minimize => "Minimize",
            Self::Close => "Close Window",
            Self::Zoom => "Zoom",
            Self::Front => "Bring All to Front",
            Self::About => "About",
            Self::Services => "Services",
            Self::Hide => "Hide",
            Self::HideOthers => "Hide Others",
            Self::Unhide => "Show All",
            Self::Quit => "Quit",
            Self::StartSpeaking => "Start Speaking",
            Self::StopSpeaking => "Stop Speaking",
        }
    }

    pub(crate) fn accelerator(self) -> Option<&'static str> {
        match self {
            Self::PasteAndMatchStyle => Some("CmdOrCtrl+Shift+Alt+V"),
            Self::Reload => Some("CmdOrCtrl+R"),
            Self::ForceReload => Some("CmdOrCtrl+Shift+R"),
            Self::ToggleDevTools => Some(if cfg!(target_os = "macos") {
                "Alt+Cmd+I"
            } else {
                "Ctrl+Shift+I"
            }),
            Self::ResetZoom => Some("CmdOrCtrl+0"),
            Self::ZoomIn => Some("CmdOrCtrl+Plus"),
            Self::ZoomOut => Some("CmdOrCtrl+-"),
            Self::ToggleFullscreen => Some(if cfg!(target_os = "macos") {
                "Ctrl+Cmd+F"
            } else {
                "F11"
            }),
            Self::Minimize => Some("CmdOrCtrl+M"),
            Self::Close => Some("CmdOrCtrl+W"),
            Self::Quit => Some("CmdOrCtrl+Q"),
            _ => None,
        }
    }
}

pub(crate) fn role_from_menu_id(menu_id: &str) -> Option<MenuRole> {
    ALL_ROLES.iter().copied().find(|role| role.id() == menu_id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MenuNode {
    Role(MenuRole),
    Separator,
    Link {
        id: &'static str,
        label: &'static str,
        url: &'static str,
    },
    Submenu {
        label: String,
        children: Vec<MenuNode>,
    },
}

impl MenuNode {
    fn submenu(label: impl Into<String>, children: Vec<MenuNode>) -> Self {
        Self::Submenu {
            label: label.into(),
            children,
        }
    }
}

#[cfg(test)]
impl MenuNode {
    fn label(&self) -> Option<&str> {
        match self {
            Self::Submenu { label, .. } => Some(label),
            Self::Link { label, .. } => Some(label),
            Self::Role(role) => Some(role.label()),
            Self::Separator => None,
        }
    }

    fn children(&self) -> &[MenuNode] {
        match self {
            Self::Submenu { children, .. } => children,
            _ => &[],
        }
    }
}

pub(crate) fn find_link_url(nodes: &[MenuNode], menu_id: &str) -> Option<&'static str> {
    nodes.iter().find_map(|node| match node {
        MenuNode::Link { id, url, .. } if *id == menu_id => Some(*url),
        MenuNode::Submenu { children, .. } => find_link_url(children, menu_id),
        _ => None,
    })
}

fn base_template() -> Vec<MenuNode> {
    use MenuNode::{Role, Separator};
    use MenuRole::*;

    vec![
        MenuNode::submenu(
            "Edit",
            vec![
                Role(Undo),
                Role(Redo),
                Separator,
                Role(Cut),
                Role(Copy),
                Role(Paste),
                Role(PasteAndMatchStyle),
                Role(Delete),
                Role(SelectAll),
            ],
        ),
        MenuNode::submenu(
            "View",
            vec![
                Role(Reload),
                Role(ForceReload),
                Role(ToggleDevTools),
                Separator,
                Role(ResetZoom),
                Role(ZoomIn),
                Role(ZoomOut),
                Separator,
                Role(ToggleFullscreen),
            ],
        ),
        MenuNode::submenu("Window", vec![Role(Minimize), Role(Close)]),
        MenuNode::submenu(
            "Help",
            vec![MenuNode::Link {
                id: MENU_LEARN_MORE,
                label: "Learn More",
                url: HELP_URL,
            }],
        ),
    ]
}

fn darwin_app_menu(app_name: &str) -> MenuNode {
    use MenuNode::{Role, Separator};
    use MenuRole::*;

    MenuNode::submenu(
        app_name,
        vec![
            Role(About),
            Separator,
            Role(Services),
            Separator,
            Role(Hide),
            Role(HideOthers),
            Role(Unhide),
            Separator,
            Role(Quit),
        ],
    )
}

/// Builds the application menu for `platform`. `None` means the menu bar is
/// suppressed entirely.
pub(crate) fn build_menu_template(platform: Platform, app_name: &str) -> Option<Vec<MenuNode>> {
    use MenuNode::{Role, Separator};
    use MenuRole::*;

    let mut template = base_template();
    match platform {
        Platform::Win32 => None,
        Platform::Other => Some(template),
        Platform::Darwin => {
            template.insert(0, darwin_app_menu(app_name));
            if let Some(MenuNode::Submenu { children, .. }) = template.get_mut(1) {
                children.push(Separator);
                children.push(MenuNode::submenu(
                    "Speech",
                    vec![Role(StartSpeaking), Role(StopSpeaking)],
                ));
            }
            if let Some(MenuNode::Submenu { children, .. }) = template.get_mut(3) {
                *children = vec![Role(Close), Role(Minimize), Role(Zoom), Separator, Role(Front)];
            }
            Some(template)
        }
    }
}
