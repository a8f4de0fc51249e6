use std::sync::Mutex;

use crate::{
    app_config::ShellConfig,
    lifecycle::{LifecycleEffect, LifecycleSignal, LifecycleState, MainWindowLifecycle},
    menu_actions::DEFAULT_ZOOM_PERCENT,
    platform::Platform,
};

#[derive(Debug)]
pub(crate) struct ShellState {
    pub(crate) config: ShellConfig,
    pub(crate) platform: Platform,
    lifecycle: Mutex<MainWindowLifecycle>,
    zoom_percent: Mutex<u32>,
}

impl ShellState {
    pub(crate) fn new(config: ShellConfig, platform: Platform) -> Self {
        Self {
            config,
            platform,
            lifecycle: Mutex::new(MainWindowLifecycle::new(platform)),
            zoom_percent: Mutex::new(DEFAULT_ZOOM_PERCENT),
        }
    }

    pub(crate) fn dispatch(&self, signal: LifecycleSignal) -> Result<Vec<LifecycleEffect>, String> {
        let mut lifecycle = self
            .lifecycle
            .lock()
            .map_err(|_| "Lifecycle state lock poisoned.".to_string())?;
        Ok(lifecycle.dispatch(signal))
    }

    pub(crate) fn is_quitting(&self) -> bool {
        self.lifecycle
            .lock()
            .map(|lifecycle| lifecycle.is_quitting())
            .unwrap_or(true)
    }

    /// Current state and whether a window handle is held, for logging.
    pub(crate) fn lifecycle_summary(&self) -> Option<(LifecycleState, bool)> {
        self.lifecycle
            .lock()
            .ok()
            .map(|lifecycle| (lifecycle.state(), lifecycle.has_window()))
    }

    pub(crate) fn update_zoom_percent<F>(&self, update: F) -> u32
    where
        F: FnOnce(u32) -> u32,
    {
        match self.zoom_percent.lock() {
            Ok(mut guard) => {
                *guard = update(*guard);
                *guard
            }
            Err(_) => DEFAULT_ZOOM_PERCENT,
        }
    }
}
