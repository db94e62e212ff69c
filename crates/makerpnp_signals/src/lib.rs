//! A thread-safe change-notification registry for MakerPnP.
//!
//! Sources (values that can change) publish change events to dependents and observers without
//! either side keeping the other alive. Subscribers are always held weakly, so dropping the last
//! `Arc` to a subscriber unsubscribes it.
//!
//! # Key Features
//!
//! - Per-source trackers that prune dropped subscribers as they notify
//! - A global, identity-keyed registry for sources that cannot embed a tracker
//! - Subscriber panics are isolated and reported via `tracing` (configurable)
//! - Callbacks may re-enter the registry from the notifying thread
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use parking_lot::Mutex;
//! use makerpnp_signals::{DependencyManager, DependencyManagerFactory, FnObserver, Observer, Source};
//!
//! struct Status {
//!     text: Mutex<String>,
//!     dependencies: Box<dyn DependencyManager<Status>>,
//! }
//!
//! impl Source for Status {
//!     type Value = String;
//!
//!     fn current_value(&self) -> String {
//!         self.text.lock().clone()
//!     }
//! }
//!
//! impl Status {
//!     fn set(&self, text: &str) {
//!         *self.text.lock() = text.to_string();
//!         self.dependencies.signal(self);
//!     }
//! }
//!
//! let status = Arc::new(Status {
//!     text: Mutex::new("idle".to_string()),
//!     dependencies: Box::new(DependencyManagerFactory::local::<Status>()),
//! });
//!
//! let last_seen = Arc::new(Mutex::new(String::new()));
//! let last_seen_for_observer = last_seen.clone();
//! let completed = Arc::new(AtomicUsize::new(0));
//! let completed_for_observer = completed.clone();
//! let observer: Arc<dyn Observer<String>> = Arc::new(FnObserver::new(
//!     move |text: &String| *last_seen_for_observer.lock() = text.clone(),
//!     move || {
//!         completed_for_observer.fetch_add(1, Ordering::SeqCst);
//!     },
//! ));
//!
//! status.dependencies.add_observer(&observer);
//! status.set("homing");
//! assert_eq!(*last_seen.lock(), "homing");
//!
//! // removing an observer completes it
//! status.dependencies.remove_observer(&observer);
//! assert_eq!(completed.load(Ordering::SeqCst), 1);
//! ```

pub mod signals;

pub use signals::{
    ConfigError, Dependent, DependencyManager, DependencyManagerFactory, DependencyTracker, FailurePolicy,
    FnObserver, LocalDependencyManager, ManagerKind, Observer, RemoteDependencyManager, SignalConfig, SignalManager,
    Source, SourceId, SubscriberError,
};
