use std::sync::{Arc, Weak};

use crate::signals::capability::Source;
use crate::signals::config::SignalConfig;
use crate::signals::local::LocalDependencyManager;
use crate::signals::manager::DependencyManager;
use crate::signals::registry::SignalManager;
use crate::signals::remote::RemoteDependencyManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagerKind {
    /// The manager owns its tracker.
    Local,
    /// The manager uses the global [`SignalManager`].
    Remote,
}

/// Chooses how a source's subscribers are tracked.
pub struct DependencyManagerFactory;

impl DependencyManagerFactory {
    pub fn local<S: Source>() -> LocalDependencyManager<S> {
        LocalDependencyManager::new()
    }

    pub fn local_with_config<S: Source>(config: SignalConfig) -> LocalDependencyManager<S> {
        LocalDependencyManager::with_config(config)
    }

    pub fn remote<S: Source + 'static>(source: &Weak<S>) -> RemoteDependencyManager<S> {
        RemoteDependencyManager::new(source)
    }

    pub fn remote_in<S: Source + 'static>(manager: &SignalManager, source: &Weak<S>) -> RemoteDependencyManager<S> {
        RemoteDependencyManager::with_manager(manager.clone(), source)
    }

    /// A local manager uses the global manager's config, so both kinds behave the same on subscriber failure.
    /// Creating a local manager does not create the global manager, [`SignalManager::init_global`] may still be
    /// called afterwards.
    pub fn create<S: Source + 'static>(kind: ManagerKind, source: &Weak<S>) -> Arc<dyn DependencyManager<S>> {
        match kind {
            ManagerKind::Local => Arc::new(Self::local_with_config::<S>(SignalManager::global_config())),
            ManagerKind::Remote => Arc::new(Self::remote(source)),
        }
    }
}
