//! Persisted main-window geometry.
//!
//! The record is read once when the main window is built, kept current from
//! move/resize events through [`GeometryTracker`], and written back to disk
//! (debounced by the caller, flushed once more at exit). Missing or corrupt
//! records fall back to the defaults; every size read from disk is clamped
//! to the minimum window size.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};

/// Minimum overlap with a monitor for a restored position to count as visible.
const MIN_VISIBLE_WIDTH: i64 = 64;
const MIN_VISIBLE_HEIGHT: i64 = 32;

#[derive(Debug, Error)]
pub(crate) enum WindowStateError {
    #[error("failed to read window state {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse window state {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize window state: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write window state {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct WindowGeometry {
    pub(crate) x: Option<i32>,
    pub(crate) y: Option<i32>,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) maximized: bool,
    pub(crate) fullscreen: bool,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
            maximized: false,
            fullscreen: false,
        }
    }
}

impl WindowGeometry {
    pub(crate) fn clamped(mut self) -> Self {
        self.width = self.width.max(MIN_WINDOW_WIDTH);
        self.height = self.height.max(MIN_WINDOW_HEIGHT);
        self
    }

    pub(crate) fn position(&self) -> Option<(i32, i32)> {
        self.x.zip(self.y)
    }
}

/// A rectangle in logical pixels, used for window bounds and monitor work areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Bounds {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl Bounds {
    fn overlap(&self, other: &Bounds) -> (i64, i64) {
        let left = i64::from(self.x).max(i64::from(other.x));
        let top = i64::from(self.y).max(i64::from(other.y));
        let right = (i64::from(self.x) + i64::from(self.width))
            .min(i64::from(other.x) + i64::from(other.width));
        let bottom = (i64::from(self.y) + i64::from(self.height))
            .min(i64::from(other.y) + i64::from(other.height));
        ((right - left).max(0), (bottom - top).max(0))
    }
}

/// Drops a restored position that no longer lands on any connected monitor,
/// so the window is centered instead of opening off-screen.
pub(crate) fn ensure_visible(geometry: WindowGeometry, monitors: &[Bounds]) -> WindowGeometry {
    let Some((x, y)) = geometry.position() else {
        return geometry;
    };
    if monitors.is_empty() {
        return geometry;
    }

    let window = Bounds {
        x,
        y,
        width: geometry.width,
        height: geometry.height,
    };
    let visible = monitors.iter().any(|monitor| {
        let (width, height) = window.overlap(monitor);
        width >= MIN_VISIBLE_WIDTH && height >= MIN_VISIBLE_HEIGHT
    });
    if visible {
        geometry
    } else {
        WindowGeometry {
            x: None,
            y: None,
            ..geometry
        }
    }
}

pub(crate) fn read_geometry(path: &Path) -> Result<Option<WindowGeometry>, WindowStateError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(WindowStateError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let geometry =
        serde_json::from_str::<WindowGeometry>(&raw).map_err(|source| WindowStateError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(geometry))
}

/// Loads the persisted geometry, falling back to `defaults` when the record is
/// missing or unreadable. Never fails.
pub(crate) fn load_geometry<L>(path: &Path, defaults: WindowGeometry, log: L) -> WindowGeometry
where
    L: Fn(&str),
{
    match read_geometry(path) {
        Ok(Some(geometry)) => geometry.clamped(),
        Ok(None) => defaults.clamped(),
        Err(error) => {
            log(&format!("{error}; using default window geometry"));
            defaults.clamped()
        }
    }
}

pub(crate) fn write_geometry(path: &Path, geometry: &WindowGeometry) -> Result<(), WindowStateError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| WindowStateError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let serialized = serde_json::to_string_pretty(geometry)?;
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    fs::write(&staging, serialized).map_err(|source| WindowStateError::Write {
        path: staging.clone(),
        source,
    })?;
    fs::rename(&staging, path).map_err(|source| WindowStateError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// One observation of the live window, taken after a move or resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WindowSample {
    pub(crate) bounds: Bounds,
    pub(crate) maximized: bool,
    pub(crate) fullscreen: bool,
    pub(crate) minimized: bool,
}

#[derive(Debug)]
pub(crate) struct GeometryTracker {
    current: WindowGeometry,
    generation: u64,
    persisted_generation: u64,
}

impl GeometryTracker {
    pub(crate) fn new(initial: WindowGeometry) -> Self {
        Self {
            current: initial,
            generation: 0,
            persisted_generation: 0,
        }
    }

    pub(crate) fn current(&self) -> WindowGeometry {
        self.current
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Folds a sample into the tracked geometry. Returns the new generation
    /// when something changed.
    ///
    /// While maximized or fullscreen only the flags are updated so the normal
    /// bounds survive for the next restore. Minimized samples carry no useful
    /// bounds and are ignored.
    pub(crate) fn record(&mut self, sample: WindowSample) -> Option<u64> {
        if sample.minimized {
            return None;
        }

        let mut next = self.current;
        next.maximized = sample.maximized;
        next.fullscreen = sample.fullscreen;
        if !sample.maximized && !sample.fullscreen {
            next.x = Some(sample.bounds.x);
            next.y = Some(sample.bounds.y);
            next.width = sample.bounds.width;
            next.height = sample.bounds.height;
        }

        if next == self.current {
            return None;
        }
        self.current = next;
        self.generation += 1;
        Some(self.generation)
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.generation != self.persisted_generation
    }

    /// A debounced write scheduled at `scheduled` only proceeds if no newer
    /// change arrived in the meantime.
    pub(crate) fn should_write(&self, scheduled: u64) -> bool {
        scheduled == self.generation && self.is_dirty()
    }

    pub(crate) fn mark_persisted(&mut self, generation: u64) {
        if generation > self.persisted_generation {
            self.persisted_generation = generation;
        }
    }
}

/// Owns the window-state file and the tracker behind it.
#[derive(Debug)]
pub(crate) struct WindowStateStore {
    path: PathBuf,
    tracker: Mutex<GeometryTracker>,
    /// Held for the whole snapshot-and-write so the debounced and exit-time
    /// flushes never share the staging file.
    write_lock: Mutex<()>,
}

impl WindowStateStore {
    pub(crate) fn open<L>(path: PathBuf, log: L) -> Self
    where
        L: Fn(&str),
    {
        let initial = load_geometry(&path, WindowGeometry::default(), log);
        Self {
            path,
            tracker: Mutex::new(GeometryTracker::new(initial)),
            write_lock: Mutex::new(()),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn geometry(&self) -> WindowGeometry {
        self.tracker
            .lock()
            .map(|tracker| tracker.current())
            .unwrap_or_default()
    }

    pub(crate) fn record(&self, sample: WindowSample) -> Option<u64> {
        self.tracker.lock().ok()?.record(sample)
    }

    /// Writes the tracked geometry if `generation` is still the latest change.
    pub(crate) fn flush_if_current<L>(&self, generation: u64, log: L)
    where
        L: Fn(&str),
    {
        let Ok(_writing) = self.write_lock.lock() else {
            log("window state write lock poisoned; skipping debounced write");
            return;
        };
        let snapshot = match self.tracker.lock() {
            Ok(tracker) if tracker.should_write(generation) => tracker.current(),
            Ok(_) => return,
            Err(_) => {
                log("window state lock poisoned; skipping debounced write");
                return;
            }
        };
        self.persist(snapshot, generation, log);
    }

    /// Writes the tracked geometry if it changed since the last write.
    pub(crate) fn flush<L>(&self, log: L)
    where
        L: Fn(&str),
    {
        let Ok(_writing) = self.write_lock.lock() else {
            log("window state write lock poisoned; skipping final write");
            return;
        };
        let (snapshot, generation) = match self.tracker.lock() {
            Ok(tracker) if tracker.is_dirty() => (tracker.current(), tracker.generation()),
            Ok(_) => return,
            Err(_) => {
                log("window state lock poisoned; skipping final write");
                return;
            }
        };
        self.persist(snapshot, generation, log);
    }

    fn persist<L>(&self, snapshot: WindowGeometry, generation: u64, log: L)
    where
        L: Fn(&str),
    {
        match write_geometry(&self.path, &snapshot) {
            Ok(()) => {
                if let Ok(mut tracker) = self.tracker.lock() {
                    tracker.mark_persisted(generation);
                }
            }
            Err(error) => log(&error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn sample(x: i32, y: i32, width: u32, height: u32) -> WindowSample {
        WindowSample {
            bounds: Bounds {
                x,
                y,
                width,
                height,
            },
            maximized: false,
            fullscreen: false,
            minimized: false,
        }
    }

    #[test]
    fn missing_state_uses_default_size() {
        let dir = tempfile::tempdir().expect("tempdir");
        let geometry = load_geometry(
            &dir.path().join("window-state.json"),
            WindowGeometry::default(),
            |_| {},
        );
        assert_eq!(geometry.width, 1200);
        assert_eq!(geometry.height, 680);
        assert_eq!(geometry.position(), None);
    }

    #[test]
    fn undersized_state_is_clamped_to_minimum() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("window-state.json");
        fs::write(&path, r#"{"x":10,"y":20,"width":300,"height":599}"#).expect("seed state");

        let geometry = load_geometry(&path, WindowGeometry::default(), |_| {});
        assert_eq!(geometry.width, MIN_WINDOW_WIDTH);
        assert_eq!(geometry.height, MIN_WINDOW_HEIGHT);
        assert_eq!(geometry.position(), Some((10, 20)));
    }

    #[test]
    fn corrupt_state_falls_back_to_defaults_and_logs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("window-state.json");
        fs::write(&path, "{ not json").expect("seed state");
        let logs = RefCell::new(Vec::new());

        let geometry = load_geometry(&path, WindowGeometry::default(), |message| {
            logs.borrow_mut().push(message.to_string())
        });
        assert_eq!(geometry, WindowGeometry::default());
        assert_eq!(logs.borrow().len(), 1);
        assert!(logs.borrow()[0].contains("failed to parse window state"));
    }

    #[test]
    fn negative_size_is_treated_as_corrupt() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("window-state.json");
        fs::write(&path, r#"{"width":-5,"height":700}"#).expect("seed state");

        let geometry = load_geometry(&path, WindowGeometry::default(), |_| {});
        assert_eq!(geometry, WindowGeometry::default());
    }

    #[test]
    fn written_state_is_read_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("window-state.json");
        let geometry = WindowGeometry {
            x: Some(-40),
            y: Some(25),
            width: 1440,
            height: 900,
            maximized: true,
            fullscreen: false,
        };

        write_geometry(&path, &geometry).expect("write state");
        assert_eq!(read_geometry(&path).expect("read state"), Some(geometry));
        assert!(!dir.path().join("nested").join("window-state.json.tmp").exists());
    }

    #[test]
    fn ensure_visible_keeps_position_on_a_monitor() {
        let geometry = WindowGeometry {
            x: Some(100),
            y: Some(100),
            ..WindowGeometry::default()
        };
        let monitors = [Bounds {
            x: 0,
            y: 0,
            width: 1920,
            height: 1080,
        }];
        assert_eq!(ensure_visible(geometry, &monitors), geometry);
    }

    #[test]
    fn ensure_visible_drops_position_from_disconnected_monitor() {
        let geometry = WindowGeometry {
            x: Some(3000),
            y: Some(200),
            ..WindowGeometry::default()
        };
        let monitors = [Bounds {
            x: 0,
            y: 0,
            width: 1920,
            height: 1080,
        }];
        let restored = ensure_visible(geometry, &monitors);
        assert_eq!(restored.position(), None);
        assert_eq!(restored.width, geometry.width);
    }

    #[test]
    fn tracker_keeps_normal_bounds_while_maximized() {
        let mut tracker = GeometryTracker::new(WindowGeometry::default());
        assert_eq!(tracker.record(sample(50, 60, 1000, 700)), Some(1));

        let maximized = WindowSample {
            maximized: true,
            ..sample(0, 0, 2560, 1440)
        };
        assert_eq!(tracker.record(maximized), Some(2));

        let current = tracker.current();
        assert!(current.maximized);
        assert_eq!(current.position(), Some((50, 60)));
        assert_eq!((current.width, current.height), (1000, 700));
    }

    #[test]
    fn tracker_ignores_minimized_and_unchanged_samples() {
        let mut tracker = GeometryTracker::new(WindowGeometry::default());
        assert_eq!(tracker.record(sample(1, 2, 900, 650)), Some(1));
        assert_eq!(tracker.record(sample(1, 2, 900, 650)), None);

        let minimized = WindowSample {
            minimized: true,
            ..sample(-32000, -32000, 160, 28)
        };
        assert_eq!(tracker.record(minimized), None);
        assert_eq!(tracker.generation(), 1);
    }

    #[test]
    fn debounced_write_only_for_latest_generation() {
        let mut tracker = GeometryTracker::new(WindowGeometry::default());
        let first = tracker.record(sample(0, 0, 900, 650)).expect("first change");
        let second = tracker.record(sample(0, 0, 910, 650)).expect("second change");

        assert!(!tracker.should_write(first));
        assert!(tracker.should_write(second));

        tracker.mark_persisted(second);
        assert!(!tracker.should_write(second));
        assert!(!tracker.is_dirty());
    }

    #[test]
    fn store_flush_persists_latest_geometry() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("window-state.json");
        let store = WindowStateStore::open(path.clone(), |_| {});

        let stale = store.record(sample(5, 5, 900, 650)).expect("stale change");
        store.record(sample(5, 5, 1300, 800)).expect("latest change");

        store.flush_if_current(stale, |_| {});
        assert!(!path.exists());

        store.flush(|_| {});
        let persisted = read_geometry(&path).expect("read state").expect("state exists");
        assert_eq!((persisted.width, persisted.height), (1300, 800));
    }

    #[test]
    fn concurrent_flushes_leave_a_valid_latest_record() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("window-state.json");
        let store = WindowStateStore::open(path.clone(), |_| {});
        let errors = Mutex::new(Vec::new());
        let report = |message: &str| {
            if let Ok(mut errors) = errors.lock() {
                errors.push(message.to_string());
            }
        };

        std::thread::scope(|scope| {
            for worker in 0..4u32 {
                let store = &store;
                let report = &report;
                scope.spawn(move || {
                    for step in 0..25u32 {
                        let width = MIN_WINDOW_WIDTH + worker * 100 + step;
                        if let Some(generation) = store.record(sample(10, 10, width, 700)) {
                            store.flush_if_current(generation, report);
                        }
                        store.flush(report);
                    }
                });
            }
        });

        assert_eq!(errors.lock().expect("errors").as_slice(), &[] as &[String]);
        let persisted = read_geometry(&path).expect("read state").expect("state exists");
        assert_eq!(persisted, store.geometry());
    }
}
