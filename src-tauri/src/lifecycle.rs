//! Main-window lifecycle as an explicit state machine.
//!
//! Every framework signal goes through [`MainWindowLifecycle::dispatch`], which
//! updates the state and returns the effects the runtime must carry out, in
//! order. The machine never touches the window itself.

use crate::platform::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LifecycleState {
    Unopened,
    Visible,
    Hidden,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QuitState {
    Running,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LifecycleSignal {
    /// The application finished launching and the connectivity gate passed.
    Ready,
    WindowCreated,
    /// The content view finished its first page load.
    FirstPaint,
    CloseRequested,
    /// Dock click, second launch, or any other request to bring the app forward.
    Activate,
    BeforeQuit,
    WindowDestroyed,
    AllWindowsClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LifecycleEffect {
    CreateWindow,
    ShowWindow,
    HideWindow,
    /// Suppress the default close so the window can be hidden instead.
    PreventClose,
    /// Ask the live window to close; it will come back as `CloseRequested`.
    CloseWindow,
    ClearSessionCache,
    ReleaseWindow,
    KeepAlive,
    QuitApp,
}

#[derive(Debug)]
pub(crate) struct MainWindowLifecycle {
    platform: Platform,
    state: LifecycleState,
    quit: QuitState,
    has_window: bool,
    ready_seen: bool,
}

impl MainWindowLifecycle {
    pub(crate) fn new(platform: Platform) -> Self {
        Self {
            platform,
            state: LifecycleState::Unopened,
            quit: QuitState::Running,
            has_window: false,
            ready_seen: false,
        }
    }

    pub(crate) fn state(&self) -> LifecycleState {
        self.state
    }

    pub(crate) fn is_quitting(&self) -> bool {
        self.quit == QuitState::Quitting
    }

    pub(crate) fn has_window(&self) -> bool {
        self.has_window
    }

    pub(crate) fn dispatch(&mut self, signal: LifecycleSignal) -> Vec<LifecycleEffect> {
        use LifecycleEffect::*;

        match signal {
            LifecycleSignal::Ready => {
                if self.ready_seen || self.is_quitting() {
                    return Vec::new();
                }
                self.ready_seen = true;
                vec![CreateWindow]
            }
            LifecycleSignal::WindowCreated => {
                self.has_window = true;
                self.state = LifecycleState::Unopened;
                Vec::new()
            }
            LifecycleSignal::FirstPaint => {
                if !self.has_window || self.state != LifecycleState::Unopened {
                    return Vec::new();
                }
                self.state = LifecycleState::Visible;
                vec![ShowWindow]
            }
            LifecycleSignal::CloseRequested => {
                if !self.has_window {
                    return Vec::new();
                }
                match self.quit {
                    QuitState::Quitting => {
                        self.state = LifecycleState::Closed;
                        self.has_window = false;
                        vec![ClearSessionCache, ReleaseWindow]
                    }
                    QuitState::Running => {
                        self.state = LifecycleState::Hidden;
                        vec![PreventClose, HideWindow]
                    }
                }
            }
            LifecycleSignal::Activate => {
                // Before first paint the window stays hidden; FirstPaint shows it.
                if !self.has_window
                    || self.is_quitting()
                    || self.state == LifecycleState::Unopened
                {
                    return Vec::new();
                }
                self.state = LifecycleState::Visible;
                vec![ShowWindow]
            }
            LifecycleSignal::BeforeQuit => {
                self.quit = QuitState::Quitting;
                if self.has_window {
                    vec![CloseWindow]
                } else {
                    vec![QuitApp]
                }
            }
            LifecycleSignal::WindowDestroyed => {
                self.has_window = false;
                self.state = LifecycleState::Closed;
                Vec::new()
            }
            LifecycleSignal::AllWindowsClosed => {
                if self.platform.keeps_running_without_windows() && !self.is_quitting() {
                    vec![KeepAlive]
                } else {
                    vec![QuitApp]
                }
            }
        }
    }
}

/// How the framework asked the process to exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExitRequest {
    /// An exit code was given (`exit(code)`, restart after update).
    Explicit(i32),
    /// The last window went away.
    LastWindowClosed,
}

impl ExitRequest {
    pub(crate) fn from_code(code: Option<i32>) -> Self {
        code.map_or(Self::LastWindowClosed, Self::Explicit)
    }

    pub(crate) fn signal(self) -> LifecycleSignal {
        match self {
            Self::Explicit(_) => LifecycleSignal::BeforeQuit,
            Self::LastWindowClosed => LifecycleSignal::AllWindowsClosed,
        }
    }

    /// Windows are torn down without a close request on an explicit exit, so
    /// the quitting close is dispatched directly.
    pub(crate) fn follow_up(self, effects: &[LifecycleEffect]) -> Option<LifecycleSignal> {
        match self {
            Self::Explicit(_) if effects.contains(&LifecycleEffect::CloseWindow) => {
                Some(LifecycleSignal::CloseRequested)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::LifecycleEffect::*;

    fn opened(platform: Platform) -> MainWindowLifecycle {
        let mut lifecycle = MainWindowLifecycle::new(platform);
        assert_eq!(lifecycle.dispatch(LifecycleSignal::Ready), vec![CreateWindow]);
        lifecycle.dispatch(LifecycleSignal::WindowCreated);
        lifecycle
    }

    #[test]
    fn window_is_shown_only_after_first_paint() {
        let mut lifecycle = opened(Platform::Other);
        assert_eq!(lifecycle.state(), LifecycleState::Unopened);
        assert!(lifecycle.has_window());

        assert_eq!(lifecycle.dispatch(LifecycleSignal::FirstPaint), vec![ShowWindow]);
        assert_eq!(lifecycle.state(), LifecycleState::Visible);
    }

    #[test]
    fn ready_only_creates_one_window() {
        let mut lifecycle = opened(Platform::Darwin);
        assert!(lifecycle.dispatch(LifecycleSignal::Ready).is_empty());
    }

    #[test]
    fn close_while_running_hides_and_keeps_handle() {
        let mut lifecycle = opened(Platform::Darwin);
        lifecycle.dispatch(LifecycleSignal::FirstPaint);

        assert_eq!(
            lifecycle.dispatch(LifecycleSignal::CloseRequested),
            vec![PreventClose, HideWindow]
        );
        assert_eq!(lifecycle.state(), LifecycleState::Hidden);
        assert!(lifecycle.has_window());
    }

    #[test]
    fn close_while_quitting_clears_cache_then_releases() {
        let mut lifecycle = opened(Platform::Darwin);
        lifecycle.dispatch(LifecycleSignal::FirstPaint);

        assert_eq!(lifecycle.dispatch(LifecycleSignal::BeforeQuit), vec![CloseWindow]);
        assert!(lifecycle.is_quitting());
        assert_eq!(
            lifecycle.dispatch(LifecycleSignal::CloseRequested),
            vec![ClearSessionCache, ReleaseWindow]
        );
        assert_eq!(lifecycle.state(), LifecycleState::Closed);
        assert!(!lifecycle.has_window());
    }

    #[test]
    fn activate_reshows_hidden_window_without_creating_another() {
        let mut lifecycle = opened(Platform::Darwin);
        lifecycle.dispatch(LifecycleSignal::FirstPaint);
        lifecycle.dispatch(LifecycleSignal::CloseRequested);

        let effects = lifecycle.dispatch(LifecycleSignal::Activate);
        assert_eq!(effects, vec![ShowWindow]);
        assert!(!effects.contains(&CreateWindow));
        assert_eq!(lifecycle.state(), LifecycleState::Visible);
    }

    #[test]
    fn activate_without_window_is_a_no_op() {
        let mut lifecycle = MainWindowLifecycle::new(Platform::Darwin);
        assert!(lifecycle.dispatch(LifecycleSignal::Activate).is_empty());

        let mut lifecycle = opened(Platform::Darwin);
        lifecycle.dispatch(LifecycleSignal::WindowDestroyed);
        assert!(lifecycle.dispatch(LifecycleSignal::Activate).is_empty());
    }

    #[test]
    fn activate_during_initial_load_waits_for_first_paint() {
        let mut lifecycle = opened(Platform::Darwin);

        assert!(lifecycle.dispatch(LifecycleSignal::Activate).is_empty());
        assert_eq!(lifecycle.state(), LifecycleState::Unopened);
        assert_eq!(lifecycle.dispatch(LifecycleSignal::FirstPaint), vec![ShowWindow]);
    }

    #[test]
    fn reload_after_hide_does_not_unhide() {
        let mut lifecycle = opened(Platform::Other);
        lifecycle.dispatch(LifecycleSignal::FirstPaint);
        lifecycle.dispatch(LifecycleSignal::CloseRequested);

        assert!(lifecycle.dispatch(LifecycleSignal::FirstPaint).is_empty());
        assert_eq!(lifecycle.state(), LifecycleState::Hidden);
    }

    #[test]
    fn close_before_first_paint_stays_hidden() {
        let mut lifecycle = opened(Platform::Other);
        lifecycle.dispatch(LifecycleSignal::CloseRequested);
        assert!(lifecycle.dispatch(LifecycleSignal::FirstPaint).is_empty());
        assert_eq!(lifecycle.state(), LifecycleState::Hidden);
    }

    #[test]
    fn before_quit_without_window_quits_directly() {
        let mut lifecycle = MainWindowLifecycle::new(Platform::Other);
        assert_eq!(lifecycle.dispatch(LifecycleSignal::BeforeQuit), vec![QuitApp]);
        assert!(lifecycle.dispatch(LifecycleSignal::Ready).is_empty());
    }

    #[test]
    fn all_windows_closed_keeps_darwin_alive() {
        let mut lifecycle = MainWindowLifecycle::new(Platform::Darwin);
        assert_eq!(
            lifecycle.dispatch(LifecycleSignal::AllWindowsClosed),
            vec![KeepAlive]
        );
    }

    #[test]
    fn all_windows_closed_quits_elsewhere_or_when_quitting() {
        for platform in [Platform::Win32, Platform::Other] {
            let mut lifecycle = MainWindowLifecycle::new(platform);
            assert_eq!(
                lifecycle.dispatch(LifecycleSignal::AllWindowsClosed),
                vec![QuitApp]
            );
        }

        let mut lifecycle = MainWindowLifecycle::new(Platform::Darwin);
        lifecycle.dispatch(LifecycleSignal::BeforeQuit);
        assert_eq!(
            lifecycle.dispatch(LifecycleSignal::AllWindowsClosed),
            vec![QuitApp]
        );
    }

    fn drive_exit(lifecycle: &mut MainWindowLifecycle, code: Option<i32>) -> Vec<LifecycleEffect> {
        let request = ExitRequest::from_code(code);
        let mut effects = lifecycle.dispatch(request.signal());
        if let Some(signal) = request.follow_up(&effects) {
            effects.extend(lifecycle.dispatch(signal));
        }
        effects
    }

    #[test]
    fn explicit_exit_runs_the_quitting_close() {
        let mut lifecycle = opened(Platform::Darwin);
        lifecycle.dispatch(LifecycleSignal::FirstPaint);

        assert_eq!(
            drive_exit(&mut lifecycle, Some(0)),
            vec![CloseWindow, ClearSessionCache, ReleaseWindow]
        );
        assert_eq!(lifecycle.state(), LifecycleState::Closed);
    }

    #[test]
    fn explicit_exit_without_window_quits() {
        let mut lifecycle = MainWindowLifecycle::new(Platform::Other);
        assert_eq!(drive_exit(&mut lifecycle, Some(1)), vec![QuitApp]);
    }

    #[test]
    fn exit_without_code_is_all_windows_closed() {
        assert_eq!(
            ExitRequest::from_code(None).signal(),
            LifecycleSignal::AllWindowsClosed
        );
        let mut lifecycle = opened(Platform::Darwin);
        lifecycle.dispatch(LifecycleSignal::FirstPaint);
        lifecycle.dispatch(LifecycleSignal::CloseRequested);
        assert_eq!(drive_exit(&mut lifecycle, None), vec![KeepAlive]);

        let mut lifecycle = opened(Platform::Win32);
        assert_eq!(drive_exit(&mut lifecycle, None), vec![QuitApp]);
    }
}
