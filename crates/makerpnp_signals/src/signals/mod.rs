//! Core change-notification components.
//!
//! - `DependencyTracker`: the weakly-held dependents and observers of a single source
//! - `SignalManager`: identity-keyed registry of trackers, for sources that do not embed one
//! - `DependencyManager`: the operations a source uses, backed by either of the above
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use makerpnp_signals::{Dependent, SignalManager, Source};
//!
//! struct Temperature(AtomicUsize);
//!
//! impl Source for Temperature {
//!     type Value = usize;
//!
//!     fn current_value(&self) -> usize {
//!         self.0.load(Ordering::SeqCst)
//!     }
//! }
//!
//! let manager = SignalManager::new();
//! let temperature = Arc::new(Temperature(AtomicUsize::new(20)));
//!
//! let refreshes = Arc::new(AtomicUsize::new(0));
//! let refreshes_for_dependent = refreshes.clone();
//! let dependent: Arc<dyn Dependent<Temperature>> = Arc::new(move |_: &Temperature| {
//!     refreshes_for_dependent.fetch_add(1, Ordering::SeqCst);
//! });
//! manager.add_dependency(&temperature, &dependent);
//!
//! temperature.0.store(21, Ordering::SeqCst);
//! manager.signal(&*temperature);
//! assert_eq!(refreshes.load(Ordering::SeqCst), 1);
//!
//! // dropping the dependent is enough to unsubscribe
//! drop(dependent);
//! manager.signal(&*temperature);
//! assert!(!manager.is_tracked(&*temperature));
//! ```

mod capability;
mod config;
mod error;
mod factory;
mod local;
mod manager;
mod registry;
mod remote;
mod tracker;

pub use capability::{Dependent, FnObserver, Observer, Source, SourceId};
pub use config::{FailurePolicy, SignalConfig};
pub use error::{ConfigError, SubscriberError};
pub use factory::{DependencyManagerFactory, ManagerKind};
pub use local::LocalDependencyManager;
pub use manager::DependencyManager;
pub use registry::SignalManager;
pub use remote::RemoteDependencyManager;
pub use tracker::DependencyTracker;
