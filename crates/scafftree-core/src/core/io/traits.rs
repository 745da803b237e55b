use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// One input molecule before parsing: an external identifier, the raw
/// SMILES string and an optional display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoleculeRecord {
    pub external_id: String,
    pub smiles: String,
    pub name: Option<String>,
}

/// Defines the interface for reading molecule list file formats.
pub trait MoleculeListFile {
    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Reads all molecule records from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<Vec<MoleculeRecord>, Self::Error>;

    /// Opens a file by path and reads all molecule records from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    fn read_path(path: impl AsRef<Path>) -> Result<Vec<MoleculeRecord>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}
