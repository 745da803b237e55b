use scafftree::engine::store::{ScaffoldStore, StoreError};
use scafftree::engine::tree::ScaffoldTree;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

/// Persists a scaffold tree as pretty-printed JSON at a fixed path.
#[derive(Debug)]
pub struct JsonTreeStore {
    path: PathBuf,
}

impl JsonTreeStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ScaffoldStore for JsonTreeStore {
    fn save_all_new(&mut self, tree: &ScaffoldTree) -> Result<(), StoreError> {
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), tree).map_err(|e| {
            StoreError::Rejected {
                reason: e.to_string(),
            }
        })?;
        info!("Scaffold tree written to {:?}", self.path);
        Ok(())
    }

    fn delete(&mut self, _title: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_json_and_deletes_it_again() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.json");
        let mut store = JsonTreeStore::new(path.clone());

        let tree = ScaffoldTree::new("demo", None, "tester");
        store.save_all_new(&tree).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"demo\""));

        store.delete("demo").unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn deleting_a_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonTreeStore::new(dir.path().join("absent.json"));
        store.delete("anything").unwrap();
    }
}
