use std::sync::Arc;

use crate::signals::capability::{Dependent, Observer, Source};

/// The operations a source uses to publish changes to its subscribers.
///
/// Implemented by [`LocalDependencyManager`](crate::signals::LocalDependencyManager), which owns its
/// tracker, and by [`RemoteDependencyManager`](crate::signals::RemoteDependencyManager), which uses
/// a [`SignalManager`](crate::signals::SignalManager). Sources do not need to know which one they were given.
pub trait DependencyManager<S: Source>: Send + Sync {
    fn add_dependent(&self, dependent: &Arc<dyn Dependent<S>>);

    fn add_observer(&self, observer: &Arc<dyn Observer<S::Value>>);

    /// Returns `true` if any live subscribers remain.
    fn remove_dependent(&self, dependent: &Arc<dyn Dependent<S>>) -> bool;

    /// Completes the observer. Returns `true` if any live subscribers remain.
    fn remove_observer(&self, observer: &Arc<dyn Observer<S::Value>>) -> bool;

    fn remove_all(&self);

    fn signal(&self, source: &S);
}
