#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use makerpnp_signals::{Dependent, Observer, Source};
use parking_lot::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Enable with `RUST_LOG`, e.g. `RUST_LOG=makerpnp_signals=trace`.
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init();
}

pub struct TestSource<T> {
    value: Mutex<T>,
}

impl<T: Clone + Send> TestSource<T> {
    pub fn new(value: T) -> Arc<Self> {
        Arc::new(Self {
            value: Mutex::new(value),
        })
    }

    pub fn set(&self, value: T) {
        *self.value.lock() = value;
    }
}

impl<T: Clone + Send> Source for TestSource<T> {
    type Value = T;

    fn current_value(&self) -> T {
        self.value.lock().clone()
    }
}

/// Records every source it was refreshed with, by address.
#[derive(Default)]
pub struct RecordingDependent {
    refreshes: Mutex<Vec<usize>>,
}

impl RecordingDependent {
    pub fn refresh_count(&self) -> usize {
        self.refreshes.lock().len()
    }

    pub fn refreshed_by<S>(&self, source: &S) -> bool {
        let address = source as *const S as usize;
        self.refreshes
            .lock()
            .iter()
            .all(|refreshed| *refreshed == address)
    }
}

impl<S> Dependent<S> for RecordingDependent {
    fn request_refresh(&self, source: &S) {
        self.refreshes
            .lock()
            .push(source as *const S as usize);
    }
}

pub struct RecordingObserver<V> {
    pub values: Mutex<Vec<V>>,
    completions: AtomicUsize,
}

impl<V> Default for RecordingObserver<V> {
    fn default() -> Self {
        Self {
            values: Mutex::new(Vec::new()),
            completions: AtomicUsize::new(0),
        }
    }
}

impl<V> RecordingObserver<V> {
    pub fn completions(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }
}

impl<V: Clone + Send> Observer<V> for RecordingObserver<V> {
    fn on_next(&self, value: &V) {
        self.values.lock().push(value.clone());
    }

    fn on_completed(&self) {
        self.completions.fetch_add(1, Ordering::SeqCst);
    }
}
