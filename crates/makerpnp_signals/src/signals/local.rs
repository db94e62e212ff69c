use std::sync::Arc;

use crate::signals::capability::{Dependent, Observer, Source};
use crate::signals::config::SignalConfig;
use crate::signals::manager::DependencyManager;
use crate::signals::tracker::DependencyTracker;

/// A [`DependencyManager`] that owns its tracker, for sources that can embed their tracking state.
pub struct LocalDependencyManager<S: Source> {
    tracker: DependencyTracker<S>,
}

impl<S: Source> Default for LocalDependencyManager<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Source> LocalDependencyManager<S> {
    pub fn new() -> Self {
        Self::with_config(SignalConfig::default())
    }

    pub fn with_config(config: SignalConfig) -> Self {
        Self {
            tracker: DependencyTracker::with_config(config),
        }
    }
}

impl<S: Source> DependencyManager<S> for LocalDependencyManager<S> {
    fn add_dependent(&self, dependent: &Arc<dyn Dependent<S>>) {
        self.tracker.add_dependent(dependent)
    }

    fn add_observer(&self, observer: &Arc<dyn Observer<S::Value>>) {
        self.tracker.add_observer(observer)
    }

    fn remove_dependent(&self, dependent: &Arc<dyn Dependent<S>>) -> bool {
        self.tracker.remove_dependent(dependent)
    }

    fn remove_observer(&self, observer: &Arc<dyn Observer<S::Value>>) -> bool {
        self.tracker.remove_observer(observer)
    }

    /// Completes every live observer.
    fn remove_all(&self) {
        self.tracker.remove_all()
    }

    fn signal(&self, source: &S) {
        self.tracker.signal(source);
    }
}
