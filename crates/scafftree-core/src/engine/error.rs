use crate::engine::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    /// A pruning or dedup invariant was violated. Not attributable to
    /// input data; indicates a bug.
    #[error("Internal consistency fault: {0}")]
    Internal(String),

    /// The persistence layer failed during the final write.
    #[error("Persistence failed: {source}")]
    Store {
        #[from]
        source: StoreError,
    },
}

impl GeneratorError {
    /// Whether retrying the whole run may succeed. Only certain
    /// infrastructure faults qualify.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Internal(_) => false,
            Self::Store { source } => source.is_retryable(),
        }
    }
}
