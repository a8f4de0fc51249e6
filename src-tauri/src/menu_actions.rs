use crate::menu_template::MenuRole;

pub(crate) const DEFAULT_ZOOM_PERCENT: u32 = 100;
pub(crate) const MIN_ZOOM_PERCENT: u32 = 25;
pub(crate) const MAX_ZOOM_PERCENT: u32 = 500;
pub(crate) const ZOOM_STEP_PERCENT: u32 = 10;

pub(crate) const PASTE_AND_MATCH_STYLE_SCRIPT: &str = "navigator.clipboard.readText().then((text) => document.execCommand('insertText', false, text)).catch(() => {});";
pub(crate) const DELETE_SELECTION_SCRIPT: &str = "document.execCommand('delete');";
pub(crate) const START_SPEAKING_SCRIPT: &str = "(() => { const text = String(window.getSelection() || ''); if (text && window.speechSynthesis) { window.speechSynthesis.cancel(); window.speechSynthesis.speak(new SpeechSynthesisUtterance(text)); } })();";
pub(crate) const STOP_SPEAKING_SCRIPT: &str = "window.speechSynthesis && window.speechSynthesis.cancel();";
pub(crate) const RELOAD_SCRIPT: &str = "window.location.reload();";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ZoomChange {
    Reset,
    In,
    Out,
}

pub(crate) fn next_zoom_percent(current: u32, change: ZoomChange) -> u32 {
    let next = match change {
        ZoomChange::Reset => DEFAULT_ZOOM_PERCENT,
        ZoomChange::In => current.saturating_add(ZOOM_STEP_PERCENT),
        ZoomChange::Out => current.saturating_sub(ZOOM_STEP_PERCENT),
    };
    next.clamp(MIN_ZOOM_PERCENT, MAX_ZOOM_PERCENT)
}

pub(crate) fn zoom_factor(percent: u32) -> f64 {
    f64::from(percent) / 100.0
}

/// Roles the native menu implements itself; everything else is a custom item
/// routed back through the menu event handler.
pub(crate) fn is_native_role(role: MenuRole) -> bool {
    matches!(
        role,
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
            | MenuRole::Unhide
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_steps_and_resets() {
        assert_eq!(next_zoom_percent(100, ZoomChange::In), 110);
        assert_eq!(next_zoom_percent(100, ZoomChange::Out), 90);
        assert_eq!(next_zoom_percent(170, ZoomChange::Reset), 100);
    }

    #[test]
    fn zoom_is_clamped() {
        assert_eq!(next_zoom_percent(MAX_ZOOM_PERCENT, ZoomChange::In), MAX_ZOOM_PERCENT);
        assert_eq!(next_zoom_percent(MIN_ZOOM_PERCENT, ZoomChange::Out), MIN_ZOOM_PERCENT);
        assert_eq!(next_zoom_percent(5, ZoomChange::Out), MIN_ZOOM_PERCENT);
    }

    #[test]
    fn zoom_factor_is_a_ratio() {
        assert!((zoom_factor(125) - 1.25).abs() < f64::EPSILON);
    }

    #[test]
    fn shell_actions_are_custom_items() {
        assert!(is_native_role(MenuRole::Copy));
        assert!(!is_native_role(MenuRole::Reload));
        assert!(!is_native_role(MenuRole::Quit));
        assert!(!is_native_role(MenuRole::StartSpeaking));
    }
}
