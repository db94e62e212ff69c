/// What happens when a subscriber callback panics while being notified.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Catch the panic, report it via `tracing`, and carry on notifying the remaining subscribers.
    #[default]
    Isolate,
    /// Let the panic unwind to the caller, remaining subscribers in the pass are not notified.
    Propagate,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub failure_policy: FailurePolicy,
}

impl SignalConfig {
    pub fn with_failure_policy(failure_policy: FailurePolicy) -> Self {
        Self {
            failure_policy,
        }
    }
}
