// Platform services the theme engine and form engine depend on.
//
// Everything environment-specific (persistence, OS preference queries, the rendered
// document, deferred work) sits behind one of these traits.

use crate::error::{EngineError, Result};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

// --- Storage ---

/// Durable key/value storage for user preferences.
pub trait PreferenceStorage {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.values.borrow_mut().insert(key.to_string(), value.to_string());
        storage
    }
}

impl PreferenceStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept as a flat JSON object on disk. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }
}

impl PreferenceStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        // Unreadable contents are overwritten.
        let mut values = self.load().unwrap_or_default();
        values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&values)?)?;
        Ok(())
    }
}

/// Storage that is switched off (private browsing, sandboxed webview, ...).
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStorage;

impl PreferenceStorage for UnavailableStorage {
    fn read(&self, _key: &str) -> Result<Option<String>> {
        Err(EngineError::StorageUnavailable("storage is disabled".to_string()))
    }

    fn write(&self, _key: &str, _value: &str) -> Result<()> {
        Err(EngineError::StorageUnavailable("storage is disabled".to_string()))
    }
}

// --- Media queries ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(u64);

pub type MediaListener = Rc<dyn Fn(bool)>;

/// OS-level preference queries, e.g. `(prefers-color-scheme: dark)`.
pub trait MediaQuery {
    fn matches(&self, query: &str) -> Result<bool>;
    fn watch(&self, query: &str, listener: MediaListener) -> Result<WatchId>;
    fn unwatch(&self, id: WatchId);
}

/// Media query whose answers are set by hand. The desktop shell feeds it from the webview;
/// tests drive it directly.
#[derive(Default)]
pub struct ManualMediaQuery {
    states: RefCell<HashMap<String, bool>>,
    watchers: RefCell<Vec<(WatchId, String, MediaListener)>>,
    next_id: Cell<u64>,
}

impl ManualMediaQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(query: &str, matches: bool) -> Self {
        let media = Self::new();
        media.states.borrow_mut().insert(query.to_string(), matches);
        media
    }

    /// Updates a query result and notifies its watchers if the value changed.
    pub fn set(&self, query: &str, matches: bool) {
        let previous = self.states.borrow_mut().insert(query.to_string(), matches);
        if previous == Some(matches) {
            return;
        }
        let listeners: Vec<MediaListener> = self
            .watchers
            .borrow()
            .iter()
            .filter(|(_, q, _)| q == query)
            .map(|(_, _, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(matches);
        }
    }

    pub fn watcher_count(&self) -> usize {
        self.watchers.borrow().len()
    }
}

impl MediaQuery for ManualMediaQuery {
    fn matches(&self, query: &str) -> Result<bool> {
        Ok(self.states.borrow().get(query).copied().unwrap_or(false))
    }

    fn watch(&self, query: &str, listener: MediaListener) -> Result<WatchId> {
        let id = WatchId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.watchers.borrow_mut().push((id, query.to_string(), listener));
        Ok(id)
    }

    fn unwatch(&self, id: WatchId) {
        self.watchers.borrow_mut().retain(|(watch_id, _, _)| *watch_id != id);
    }
}

/// No media query support at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedMediaQuery;

impl MediaQuery for UnsupportedMediaQuery {
    fn matches(&self, query: &str) -> Result<bool> {
        Err(EngineError::MediaQueryUnsupported(query.to_string()))
    }

    fn watch(&self, query: &str, _listener: MediaListener) -> Result<WatchId> {
        Err(EngineError::MediaQueryUnsupported(query.to_string()))
    }

    fn unwatch(&self, _id: WatchId) {}
}

// --- Document ---

/// The rendered document root plus the body's inline style.
pub trait Document {
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn has_class(&self, class: &str) -> bool;
    fn set_property(&self, name: &str, value: &str);
    fn set_attribute(&self, name: &str, value: &str);
    fn body_style(&self, property: &str) -> Option<String>;
    fn set_body_style(&self, property: &str, value: Option<&str>);

    /// Writes a batch of custom properties. Implementations backed by a real DOM can
    /// override this to do a single round trip.
    fn set_properties(&self, properties: &[(String, String)]) {
        for (name, value) in properties {
            self.set_property(name, value);
        }
    }
}

/// In-memory document, used headless and in tests.
#[derive(Debug, Default)]
pub struct RecordingDocument {
    classes: RefCell<BTreeSet<String>>,
    properties: RefCell<BTreeMap<String, String>>,
    attributes: RefCell<BTreeMap<String, String>>,
    body_styles: RefCell<BTreeMap<String, String>>,
    property_batches: Cell<usize>,
}

impl RecordingDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classes(&self) -> Vec<String> {
        self.classes.borrow().iter().cloned().collect()
    }

    pub fn property(&self, name: &str) -> Option<String> {
        self.properties.borrow().get(name).cloned()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    /// Number of `set_properties` batches written so far.
    pub fn property_batches(&self) -> usize {
        self.property_batches.get()
    }
}

impl Document for RecordingDocument {
    fn add_class(&self, class: &str) {
        self.classes.borrow_mut().insert(class.to_string());
    }

    fn remove_class(&self, class: &str) {
        self.classes.borrow_mut().remove(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().contains(class)
    }

    fn set_property(&self, name: &str, value: &str) {
        self.properties.borrow_mut().insert(name.to_string(), value.to_string());
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.attributes.borrow_mut().insert(name.to_string(), value.to_string());
    }

    fn body_style(&self, property: &str) -> Option<String> {
        self.body_styles.borrow().get(property).cloned()
    }

    fn set_body_style(&self, property: &str, value: Option<&str>) {
        let mut styles = self.body_styles.borrow_mut();
        match value {
            Some(v) => {
                styles.insert(property.to_string(), v.to_string());
            }
            None => {
                styles.remove(property);
            }
        }
    }

    fn set_properties(&self, properties: &[(String, String)]) {
        let mut stored = self.properties.borrow_mut();
        for (name, value) in properties {
            stored.insert(name.clone(), value.clone());
        }
        self.property_batches.set(self.property_batches.get() + 1);
    }
}

// --- Scheduling ---

pub type Task = Box<dyn FnOnce()>;

/// Deferred work on the UI thread.
pub trait Scheduler {
    /// Runs `task` before the next paint. Hands the task back when there is no frame
    /// primitive so the caller can run it right away.
    fn request_animation_frame(&self, task: Task) -> std::result::Result<(), Task>;
    fn set_timeout(&self, delay: Duration, task: Task);
}

/// Scheduler driven by explicit `advance` / `run_frames` calls.
pub struct ManualScheduler {
    frames_supported: bool,
    now_ms: Cell<u64>,
    seq: Cell<u64>,
    timers: RefCell<Vec<(u64, u64, Task)>>,
    frames: RefCell<Vec<Task>>,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            frames_supported: true,
            now_ms: Cell::new(0),
            seq: Cell::new(0),
            timers: RefCell::new(Vec::new()),
            frames: RefCell::new(Vec::new()),
        }
    }

    /// A scheduler with no animation-frame primitive.
    pub fn without_frames() -> Self {
        Self {
            frames_supported: false,
            ..Self::new()
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Runs every queued frame callback, including ones queued while running.
    pub fn run_frames(&self) {
        loop {
            let batch: Vec<Task> = self.frames.borrow_mut().drain(..).collect();
            if batch.is_empty() {
                break;
            }
            for task in batch {
                task();
            }
        }
    }

    /// Moves the clock forward, firing due timers in deadline order.
    pub fn advance(&self, ms: u64) {
        let target = self.now_ms.get().saturating_add(ms);
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let due = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, (deadline, _, _))| *deadline <= target)
                    .min_by_key(|(_, (deadline, seq, _))| (*deadline, *seq))
                    .map(|(idx, _)| idx);
                due.map(|idx| timers.remove(idx))
            };
            match next {
                Some((deadline, _, task)) => {
                    self.now_ms.set(deadline);
                    task();
                }
                None => break,
            }
        }
        self.now_ms.set(target);
    }
}

impl Scheduler for ManualScheduler {
    fn request_animation_frame(&self, task: Task) -> std::result::Result<(), Task> {
        if !self.frames_supported {
            return Err(task);
        }
        self.frames.borrow_mut().push(task);
        Ok(())
    }

    fn set_timeout(&self, delay: Duration, task: Task) {
        let deadline = self.now_ms.get().saturating_add(delay.as_millis() as u64);
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        self.timers.borrow_mut().push((deadline, seq, task));
    }
}

/// The full set of capabilities handed to the theme controller.
#[derive(Clone)]
pub struct PlatformServices {
    pub storage: Rc<dyn PreferenceStorage>,
    pub media: Rc<dyn MediaQuery>,
    pub document: Option<Rc<dyn Document>>,
    pub scheduler: Rc<dyn Scheduler>,
}

impl PlatformServices {
    /// No document, no media queries, in-memory storage.
    pub fn headless() -> Self {
        Self {
            storage: Rc::new(MemoryStorage::new()),
            media: Rc::new(UnsupportedMediaQuery),
            document: None,
            scheduler: Rc::new(ManualScheduler::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_round_trips_and_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("prefs.json"));
        assert_eq!(storage.read("theme-mode").unwrap(), None);
        storage.write("theme-mode", "dark").unwrap();
        storage.write("other", "x").unwrap();
        assert_eq!(storage.read("theme-mode").unwrap(), Some("dark".to_string()));
        assert_eq!(storage.read("other").unwrap(), Some("x".to_string()));
    }

    #[test]
    fn file_storage_reports_corrupt_file_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();
        let storage = FileStorage::new(&path);
        assert!(storage.read("theme-mode").is_err());
        // ...but writing replaces it
        storage.write("theme-mode", "light").unwrap();
        assert_eq!(storage.read("theme-mode").unwrap(), Some("light".to_string()));
    }

    #[test]
    fn manual_media_query_notifies_only_on_change() {
        let media = ManualMediaQuery::new();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let id = media
            .watch(DARK_SCHEME_QUERY, Rc::new(move |_| counter.set(counter.get() + 1)))
            .unwrap();
        media.set(DARK_SCHEME_QUERY, true);
        media.set(DARK_SCHEME_QUERY, true);
        media.set(REDUCED_MOTION_QUERY, true);
        assert_eq!(hits.get(), 1);
        media.unwatch(id);
        media.set(DARK_SCHEME_QUERY, false);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn manual_scheduler_fires_timers_in_deadline_order() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (log.clone(), log.clone());
        scheduler.set_timeout(Duration::from_millis(300), Box::new(move || a.borrow_mut().push("late")));
        scheduler.set_timeout(Duration::from_millis(100), Box::new(move || b.borrow_mut().push("early")));
        scheduler.advance(99);
        assert!(log.borrow().is_empty());
        scheduler.advance(250);
        assert_eq!(*log.borrow(), vec!["early", "late"]);
        assert_eq!(scheduler.now_ms(), 349);
    }

    #[test]
    fn scheduler_without_frames_hands_task_back() {
        let scheduler = ManualScheduler::without_frames();
        assert!(scheduler.request_animation_frame(Box::new(|| {})).is_err());
    }
}
