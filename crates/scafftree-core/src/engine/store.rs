use super::tree::ScaffoldTree;
use thiserror::Error;

/// Failures raised by a scaffold tree backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Backend rejected the tree: {reason}")]
    Rejected { reason: String },
    #[error("Backend temporarily unavailable: {reason}")]
    Unavailable { reason: String },
}

impl StoreError {
    /// Transient faults may be retried by the caller; rejections may not.
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Io(_) | StoreError::Unavailable { .. } => true,
            StoreError::Rejected { .. } => false,
        }
    }
}

/// Persistence backend for finished scaffold trees.
///
/// `save_all_new` must be all-or-nothing per tree as far as the caller
/// can observe. `delete` removes a previously saved tree by title and
/// is used to clean up after a partially failed save.
pub trait ScaffoldStore {
    fn save_all_new(&mut self, tree: &ScaffoldTree) -> Result<(), StoreError>;
    fn delete(&mut self, title: &str) -> Result<(), StoreError>;
}

/// Keeps saved trees in a vector. Primarily for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    trees: Vec<ScaffoldTree>,
    fail_next_save: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trees(&self) -> &[ScaffoldTree] {
        &self.trees
    }

    /// Makes the next `save_all_new` fail, for exercising cleanup paths.
    pub fn fail_next_save(&mut self) {
        self.fail_next_save = true;
    }
}

impl ScaffoldStore for InMemoryStore {
    fn save_all_new(&mut self, tree: &ScaffoldTree) -> Result<(), StoreError> {
        if self.fail_next_save {
            self.fail_next_save = false;
            return Err(StoreError::Unavailable {
                reason: "injected failure".to_string(),
            });
        }
        self.trees.push(tree.clone());
        Ok(())
    }

    fn delete(&mut self, title: &str) -> Result<(), StoreError> {
        self.trees.retain(|tree| tree.title() != title);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(
            StoreError::Unavailable {
                reason: "timeout".into()
            }
            .is_retryable()
        );
        assert!(
            !StoreError::Rejected {
                reason: "duplicate title".into()
            }
            .is_retryable()
        );
    }

    #[test]
    fn in_memory_save_and_delete() {
        let mut store = InMemoryStore::new();
        let tree = ScaffoldTree::new("demo", None, "tester");
        store.save_all_new(&tree).unwrap();
        assert_eq!(store.trees().len(), 1);
        store.delete("demo").unwrap();
        assert!(store.trees().is_empty());
    }

    #[test]
    fn injected_failure_fires_once() {
        let mut store = InMemoryStore::new();
        store.fail_next_save();
        let tree = ScaffoldTree::new("demo", None, "tester");
        assert!(store.save_all_new(&tree).is_err());
        assert!(store.save_all_new(&tree).is_ok());
    }
}
