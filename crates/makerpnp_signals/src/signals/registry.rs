use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::ReentrantMutex;
use tracing::{debug, trace};

use crate::signals::capability::{Dependent, Observer, Source, SourceId};
use crate::signals::config::SignalConfig;
use crate::signals::error::ConfigError;
use crate::signals::tracker::DependencyTracker;

static GLOBAL: OnceLock<SignalManager> = OnceLock::new();

struct Entry {
    /// Never upgraded, only used to detect that the source has gone away.
    source: Weak<dyn Any + Send + Sync>,
    tracker: Arc<dyn Any + Send + Sync>,
}

impl Entry {
    fn is_live(&self) -> bool {
        self.source.strong_count() > 0
    }
}

type Entries = RefCell<HashMap<SourceId, Entry>>;

struct Inner {
    entries: ReentrantMutex<Entries>,
    config: SignalConfig,
}

/// A registry that associates sources with their dependency trackers.
///
/// Sources are keyed by identity and are never kept alive by the registry. A tracker is created
/// lazily on the first subscription and discarded once it has nothing left to notify.
///
/// All operations, across all sources, are serialized through a single lock which is held while
/// subscribers are being notified. The lock is re-entrant so subscribers may call back into the
/// registry from the notifying thread.
///
/// Cloning a `SignalManager` creates a new handle to the **same** registry.
#[derive(Clone)]
pub struct SignalManager {
    inner: Arc<Inner>,
}

impl Default for SignalManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalManager {
    /// Creates a new, empty registry, independent of the global one.
    pub fn new() -> Self {
        Self::with_config(SignalConfig::default())
    }

    pub fn with_config(config: SignalConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: ReentrantMutex::new(RefCell::new(HashMap::new())),
                config,
            }),
        }
    }

    /// The process-wide registry, created with the default config unless [`init_global`](Self::init_global)
    /// was called first.
    pub fn global() -> &'static SignalManager {
        GLOBAL.get_or_init(SignalManager::new)
    }

    /// The config of the global registry, without creating it.
    pub fn global_config() -> SignalConfig {
        GLOBAL
            .get()
            .map(|manager| *manager.config())
            .unwrap_or_default()
    }

    pub fn init_global(config: SignalConfig) -> Result<(), ConfigError> {
        GLOBAL
            .set(SignalManager::with_config(config))
            .map_err(|_| ConfigError::GlobalAlreadyInitialized)
    }

    pub fn config(&self) -> &SignalConfig {
        &self.inner.config
    }

    /// Notifies the subscribers of `source`, does nothing if the source is not tracked.
    ///
    /// The entry is discarded when the tracker reports no remaining dependents, even if it still has
    /// observers.
    pub fn signal<S: Source + 'static>(&self, source: &S) {
        let id = SourceId::of(source);
        let guard = self.inner.entries.lock();

        let tracker = Self::find::<S>(&guard.borrow(), id);
        let Some(tracker) = tracker else {
            trace!("Signal ignored, source not tracked. source: {}", id);
            return;
        };

        if !tracker.signal(source) {
            Self::discard(&guard, id, &tracker);
        }
    }

    pub fn add_dependency<S: Source + 'static>(&self, source: &Arc<S>, dependent: &Arc<dyn Dependent<S>>) {
        let guard = self.inner.entries.lock();
        let tracker = self.find_or_insert(&guard, source);
        tracker.add_dependent(dependent);
    }

    pub fn add_observer<S: Source + 'static>(&self, source: &Arc<S>, observer: &Arc<dyn Observer<S::Value>>) {
        let guard = self.inner.entries.lock();
        let tracker = self.find_or_insert(&guard, source);
        tracker.add_observer(observer);
    }

    /// Returns `true` if the source still has live subscribers.
    pub fn remove_dependency<S: Source + 'static>(&self, source: &S, dependent: &Arc<dyn Dependent<S>>) -> bool {
        let id = SourceId::of(source);
        let guard = self.inner.entries.lock();

        let tracker = Self::find::<S>(&guard.borrow(), id);
        let Some(tracker) = tracker else {
            return false;
        };

        let remaining = tracker.remove_dependent(dependent);
        if !remaining {
            Self::discard(&guard, id, &tracker);
        }
        remaining
    }

    /// Completes the observer. Returns `true` if the source still has live subscribers.
    pub fn remove_observer<S: Source + 'static>(&self, source: &S, observer: &Arc<dyn Observer<S::Value>>) -> bool {
        let id = SourceId::of(source);
        let guard = self.inner.entries.lock();

        let tracker = Self::find::<S>(&guard.borrow(), id);
        let Some(tracker) = tracker else {
            return false;
        };

        let remaining = tracker.remove_observer(observer);
        if !remaining {
            Self::discard(&guard, id, &tracker);
        }
        remaining
    }

    /// Discards the tracker for `source`.
    ///
    /// Unlike [`DependencyTracker::remove_all`], observers are *not* completed.
    pub fn remove_all_dependencies<S: Source + 'static>(&self, source: &S) {
        let id = SourceId::of(source);
        let guard = self.inner.entries.lock();
        if guard.borrow_mut().remove(&id).is_some() {
            debug!("Removed all dependencies. source: {}", id);
        }
    }

    pub fn is_tracked<S: Source + 'static>(&self, source: &S) -> bool {
        let id = SourceId::of(source);
        let guard = self.inner.entries.lock();
        guard
            .borrow()
            .get(&id)
            .is_some_and(Entry::is_live)
    }

    /// Number of sources that are currently tracked, sources that have been dropped are not counted.
    pub fn tracked_count(&self) -> usize {
        let guard = self.inner.entries.lock();
        guard
            .borrow()
            .values()
            .filter(|entry| entry.is_live())
            .count()
    }

    /// Removes entries whose source has been dropped, returns the amount removed.
    pub fn prune(&self) -> usize {
        let guard = self.inner.entries.lock();
        Self::sweep(&mut guard.borrow_mut())
    }

    fn find<S: Source + 'static>(entries: &HashMap<SourceId, Entry>, id: SourceId) -> Option<Arc<DependencyTracker<S>>> {
        entries
            .get(&id)
            .filter(|entry| entry.is_live())
            .and_then(|entry| {
                entry
                    .tracker
                    .clone()
                    .downcast::<DependencyTracker<S>>()
                    .ok()
            })
    }

    fn find_or_insert<S: Source + 'static>(&self, entries: &Entries, source: &Arc<S>) -> Arc<DependencyTracker<S>> {
        let id = SourceId::of_arc(source);
        let mut entries = entries.borrow_mut();

        if let Some(tracker) = Self::find::<S>(&entries, id) {
            return tracker;
        }

        let swept = Self::sweep(&mut entries);
        let tracker = Arc::new(DependencyTracker::<S>::with_config(self.inner.config));
        let source: Weak<S> = Arc::downgrade(source);
        let source: Weak<dyn Any + Send + Sync> = source;
        entries.insert(id, Entry {
            source,
            tracker: tracker.clone(),
        });
        debug!("Created tracker. source: {}, swept: {}, tracked: {}", id, swept, entries.len());

        tracker
    }

    fn discard<S: Source + 'static>(entries: &Entries, id: SourceId, tracker: &Arc<DependencyTracker<S>>) {
        let mut entries = entries.borrow_mut();
        // a subscriber may have replaced the entry while it was being notified.
        let same_tracker = entries
            .get(&id)
            .is_some_and(|entry| std::ptr::addr_eq(Arc::as_ptr(&entry.tracker), Arc::as_ptr(tracker)));
        if same_tracker {
            entries.remove(&id);
            debug!("Discarded tracker. source: {}, tracked: {}", id, entries.len());
        }
    }

    fn sweep(entries: &mut HashMap<SourceId, Entry>) -> usize {
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live());
        before - entries.len()
    }
}
