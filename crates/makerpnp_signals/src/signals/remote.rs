use std::ptr;
use std::sync::{Arc, Weak};

use tracing::trace;

use crate::signals::capability::{Dependent, Observer, Source, SourceId};
use crate::signals::manager::DependencyManager;
use crate::signals::registry::SignalManager;

/// A [`DependencyManager`] that keeps no state of its own and forwards everything to a [`SignalManager`],
/// keyed by the source it was created for.
///
/// Only a `Weak` handle on the source is held, so the manager can be stored inside the source itself.
/// Once the source has been dropped subscriptions and signals are ignored and removals report nothing remaining.
pub struct RemoteDependencyManager<S: Source + 'static> {
    source: Weak<S>,
    manager: SignalManager,
}

impl<S: Source + 'static> RemoteDependencyManager<S> {
    /// Uses the global [`SignalManager`].
    pub fn new(source: &Weak<S>) -> Self {
        Self::with_manager(SignalManager::global().clone(), source)
    }

    pub fn with_manager(manager: SignalManager, source: &Weak<S>) -> Self {
        Self {
            source: source.clone(),
            manager,
        }
    }

    pub fn is_tracked(&self) -> bool {
        self.source
            .upgrade()
            .is_some_and(|source| self.manager.is_tracked(&*source))
    }

    fn source(&self) -> Option<Arc<S>> {
        let source = self.source.upgrade();
        if source.is_none() {
            trace!("Source dropped, ignoring.");
        }
        source
    }
}

impl<S: Source + 'static> DependencyManager<S> for RemoteDependencyManager<S> {
    fn add_dependent(&self, dependent: &Arc<dyn Dependent<S>>) {
        if let Some(source) = self.source() {
            self.manager
                .add_dependency(&source, dependent);
        }
    }

    fn add_observer(&self, observer: &Arc<dyn Observer<S::Value>>) {
        if let Some(source) = self.source() {
            self.manager
                .add_observer(&source, observer);
        }
    }

    fn remove_dependent(&self, dependent: &Arc<dyn Dependent<S>>) -> bool {
        self.source()
            .is_some_and(|source| {
                self.manager
                    .remove_dependency(&*source, dependent)
            })
    }

    fn remove_observer(&self, observer: &Arc<dyn Observer<S::Value>>) -> bool {
        self.source()
            .is_some_and(|source| {
                self.manager
                    .remove_observer(&*source, observer)
            })
    }

    /// Discards the source's tracker, observers are not completed.
    fn remove_all(&self) {
        if let Some(source) = self.source() {
            self.manager
                .remove_all_dependencies(&*source);
        }
    }

    /// Always signals the source this manager was created for, whatever `source` is given.
    fn signal(&self, source: &S) {
        let Some(tracked) = self.source() else {
            return;
        };
        if !ptr::eq(source, &*tracked) {
            trace!(
                "Signalled with another source, using the tracked one. given: {}, tracked: {}",
                SourceId::of(source),
                SourceId::of(&*tracked)
            );
        }
        self.manager.signal(&*tracked);
    }
}
