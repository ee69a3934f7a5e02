//! Error types returned by the task registry.

use thiserror::Error;

/// Failures raised when resolving or registering a task key.
///
/// State-machine rejections on a `Chronometer` are never reported through this
/// type; they come back as `Transition::Ignored` or a plain reading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The key already has a chronometer. A task can only be created once.
    #[error("task {key} has already been created")]
    DuplicateTask { key: String },

    /// The key was never registered.
    #[error("unknown task {key}")]
    UnknownTask { key: String },
}

impl RegistryError {
    pub(crate) fn duplicate(key: &impl std::fmt::Debug) -> Self {
        Self::DuplicateTask {
            key: format!("{key:?}"),
        }
    }

    pub(crate) fn unknown(key: &impl std::fmt::Debug) -> Self {
        Self::UnknownTask {
            key: format!("{key:?}"),
        }
    }
}
