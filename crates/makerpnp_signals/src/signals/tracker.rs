//! Per-source registry of weakly-held subscribers.
//!
//! A [`DependencyTracker`] never owns its subscribers, it only stores `Weak` handles. Entries whose
//! subscriber has been dropped are pruned as a side effect of `add_*`, `signal` and `remove_*`.
//!
//! # Locking
//!
//! Every operation holds the tracker's lock for its full duration, including the time spent inside
//! subscriber callbacks, so concurrent operations from other threads are serialized. The lock is
//! re-entrant: a callback may signal, subscribe or unsubscribe on the same tracker from the same thread.
//! Subscribers added from within a callback are not part of the pass that is already running.

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use parking_lot::ReentrantMutex;
use tracing::{trace, warn};

use crate::signals::capability::{Dependent, Observer, Source, SourceId, same_subscriber};
use crate::signals::config::{FailurePolicy, SignalConfig};
use crate::signals::error::SubscriberError;

struct Subscribers<S: Source> {
    dependents: Vec<Weak<dyn Dependent<S>>>,
    observers: Vec<Weak<dyn Observer<S::Value>>>,
}

impl<S: Source> Subscribers<S> {
    fn live_dependents(&self) -> usize {
        self.dependents
            .iter()
            .filter(|dependent| dependent.strong_count() > 0)
            .count()
    }

    fn live_observers(&self) -> usize {
        self.observers
            .iter()
            .filter(|observer| observer.strong_count() > 0)
            .count()
    }
}

pub struct DependencyTracker<S: Source> {
    // dedicated lock, the subscriber lists are only ever replaced while it is held.
    subscribers: ReentrantMutex<RefCell<Subscribers<S>>>,
    config: SignalConfig,
}

impl<S: Source> Default for DependencyTracker<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Source> DependencyTracker<S> {
    pub fn new() -> Self {
        Self::with_config(SignalConfig::default())
    }

    pub fn with_config(config: SignalConfig) -> Self {
        Self {
            subscribers: ReentrantMutex::new(RefCell::new(Subscribers {
                dependents: Vec::new(),
                observers: Vec::new(),
            })),
            config,
        }
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Duplicates are not detected, a dependent added twice is refreshed twice.
    ///
    /// Entries whose dependent has been dropped are pruned first.
    pub fn add_dependent(&self, dependent: &Arc<dyn Dependent<S>>) {
        let guard = self.subscribers.lock();
        let mut subscribers = guard.borrow_mut();
        subscribers
            .dependents
            .retain(|candidate| candidate.strong_count() > 0);
        subscribers
            .dependents
            .push(Arc::downgrade(dependent));
        trace!("Added dependent. dependents: {}", subscribers.dependents.len());
    }

    /// Entries whose observer has been dropped are pruned first.
    pub fn add_observer(&self, observer: &Arc<dyn Observer<S::Value>>) {
        let guard = self.subscribers.lock();
        let mut subscribers = guard.borrow_mut();
        subscribers
            .observers
            .retain(|candidate| candidate.strong_count() > 0);
        subscribers
            .observers
            .push(Arc::downgrade(observer));
        trace!("Added observer. observers: {}", subscribers.observers.len());
    }

    /// Removes every entry for `dependent` along with any entries whose dependent has been dropped.
    ///
    /// Returns `true` if any live dependents or observers remain.
    pub fn remove_dependent(&self, dependent: &Arc<dyn Dependent<S>>) -> bool {
        let guard = self.subscribers.lock();
        let mut subscribers = guard.borrow_mut();
        subscribers
            .dependents
            .retain(|candidate| candidate.strong_count() > 0 && !same_subscriber(candidate, dependent));

        let remaining = subscribers.live_dependents() + subscribers.live_observers();
        trace!("Removed dependent. remaining: {}", remaining);
        remaining > 0
    }

    /// Removes every entry for `observer` along with any entries whose observer has been dropped.
    ///
    /// `on_completed` is delivered to the observer once per matching entry, before the entries are removed.
    /// Returns `true` if any live dependents or observers remain.
    pub fn remove_observer(&self, observer: &Arc<dyn Observer<S::Value>>) -> bool {
        let guard = self.subscribers.lock();

        let matched = guard
            .borrow()
            .observers
            .iter()
            .filter(|&candidate| same_subscriber(candidate, observer))
            .count();
        for _ in 0..matched {
            self.deliver(|| observer.on_completed(), |cause| SubscriberError::CompletedPanicked {
                cause,
            });
        }

        let mut subscribers = guard.borrow_mut();
        subscribers
            .observers
            .retain(|candidate| candidate.strong_count() > 0 && !same_subscriber(candidate, observer));

        let remaining = subscribers.live_dependents() + subscribers.live_observers();
        trace!("Removed observer. matched: {}, remaining: {}", matched, remaining);
        remaining > 0
    }

    /// Drops every dependent and completes every live observer.
    ///
    /// Dependents have no completion concept so they are discarded without notification.
    pub fn remove_all(&self) {
        let guard = self.subscribers.lock();
        let observers = {
            let mut subscribers = guard.borrow_mut();
            subscribers.dependents.clear();
            std::mem::take(&mut subscribers.observers)
        };

        let live: Vec<_> = observers
            .iter()
            .filter_map(Weak::upgrade)
            .collect();
        trace!("Removing all. completing observers: {}", live.len());

        for observer in live {
            self.deliver(|| observer.on_completed(), |cause| SubscriberError::CompletedPanicked {
                cause,
            });
        }
    }

    /// Refreshes every live dependent, then pushes the source's current value to every live observer.
    ///
    /// Dropped subscribers are pruned. Returns `true` if any dependents remain. Observers are not
    /// considered, a tracker with only observers left reports `false`.
    pub fn signal(&self, source: &S) -> bool {
        let source_id = SourceId::of(source);
        let guard = self.subscribers.lock();

        let (dependents, observers): (Vec<_>, Vec<_>) = {
            let subscribers = guard.borrow();
            (
                subscribers
                    .dependents
                    .iter()
                    .filter_map(Weak::upgrade)
                    .collect(),
                subscribers
                    .observers
                    .iter()
                    .filter_map(Weak::upgrade)
                    .collect(),
            )
        };

        for dependent in &dependents {
            self.deliver(|| dependent.request_refresh(source), |cause| {
                SubscriberError::RefreshPanicked {
                    source_id,
                    cause,
                }
            });
        }

        if !observers.is_empty() {
            let value = source.current_value();
            for observer in &observers {
                self.deliver(|| observer.on_next(&value), |cause| SubscriberError::NextPanicked {
                    source_id,
                    cause,
                });
            }
        }

        // release our strong handles first so that anything dropped during the pass is pruned too.
        drop(dependents);
        drop(observers);

        let mut subscribers = guard.borrow_mut();
        subscribers
            .dependents
            .retain(|dependent| dependent.strong_count() > 0);
        subscribers
            .observers
            .retain(|observer| observer.strong_count() > 0);

        trace!(
            "Signalled. source: {}, dependents: {}, observers: {}",
            source_id,
            subscribers.dependents.len(),
            subscribers.observers.len()
        );
        !subscribers.dependents.is_empty()
    }

    pub fn dependent_count(&self) -> usize {
        self.subscribers
            .lock()
            .borrow()
            .live_dependents()
    }

    pub fn observer_count(&self) -> usize {
        self.subscribers
            .lock()
            .borrow()
            .live_observers()
    }

    pub fn is_empty(&self) -> bool {
        self.dependent_count() + self.observer_count() == 0
    }

    fn deliver(&self, callback: impl FnOnce(), on_panic: impl FnOnce(String) -> SubscriberError) {
        match self.config.failure_policy {
            FailurePolicy::Propagate => callback(),
            FailurePolicy::Isolate => {
                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(callback)) {
                    let error = on_panic(SubscriberError::panic_message(payload.as_ref()));
                    warn!("{}", error);
                }
            }
        }
    }
}
