use crate::core::io::traits::{MoleculeListFile, MoleculeRecord};
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmiError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Plain SMILES list: one molecule per line, `SMILES [name]`, with `#`
/// comment lines and blank lines skipped. The 1-based line number
/// becomes the external id.
pub struct SmiFile;

impl MoleculeListFile for SmiFile {
    type Error = SmiError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<MoleculeRecord>, Self::Error> {
        let mut records = Vec::new();
        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut parts = trimmed.split_whitespace();
            let smiles = parts.next().unwrap_or_default().to_string();
            let name = {
                let rest = parts.collect::<Vec<_>>().join(" ");
                (!rest.is_empty()).then_some(rest)
            };

            records.push(MoleculeRecord {
                external_id: (line_num + 1).to_string(),
                smiles,
                name,
            });
        }
        Ok(records)
    }
}

#[derive(Debug, Error)]
pub enum CsvMoleculeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),
}

/// CSV molecule list with a header row. Requires `id` and `smiles`
/// columns; a `name` column is optional. Column order is free.
pub struct CsvMoleculeFile;

impl MoleculeListFile for CsvMoleculeFile {
    type Error = CsvMoleculeError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<MoleculeRecord>, Self::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let column = |name: &'static str| -> Result<usize, CsvMoleculeError> {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or(CsvMoleculeError::MissingColumn(name))
        };

        let id_col = column("id")?;
        let smiles_col = column("smiles")?;
        let name_col = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case("name"));

        let mut records = Vec::new();
        for result in csv_reader.records() {
            let row = result?;
            let external_id = row.get(id_col).unwrap_or_default().to_string();
            let smiles = row.get(smiles_col).unwrap_or_default().to_string();
            let name = name_col
                .and_then(|c| row.get(c))
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string());
            records.push(MoleculeRecord {
                external_id,
                smiles,
                name,
            });
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    #[test]
    fn smi_reader_parses_lines_and_names() {
        let input = "CCO ethanol\n\n# comment\nc1ccccc1\n";
        let mut reader = BufReader::new(input.as_bytes());
        let records = SmiFile::read_from(&mut reader).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].smiles, "CCO");
        assert_eq!(records[0].name.as_deref(), Some("ethanol"));
        assert_eq!(records[0].external_id, "1");
        assert_eq!(records[1].smiles, "c1ccccc1");
        assert_eq!(records[1].name, None);
        assert_eq!(records[1].external_id, "4");
    }

    #[test]
    fn csv_reader_handles_arbitrary_column_order() {
        let input = "name,smiles,id\naspirin,CC(=O)Oc1ccccc1C(=O)O,mol-1\n,CCO,mol-2\n";
        let mut reader = BufReader::new(input.as_bytes());
        let records = CsvMoleculeFile::read_from(&mut reader).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].external_id, "mol-1");
        assert_eq!(records[0].name.as_deref(), Some("aspirin"));
        assert_eq!(records[1].name, None);
    }

    #[test]
    fn csv_reader_reports_missing_columns() {
        let input = "id,structure\n1,CCO\n";
        let mut reader = BufReader::new(input.as_bytes());
        let err = CsvMoleculeFile::read_from(&mut reader).unwrap_err();
        assert!(matches!(err, CsvMoleculeError::MissingColumn("smiles")));
    }

    #[test]
    fn read_path_round_trips_through_a_temp_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "C1CCCCC1 cyclohexane").unwrap();
        let records = SmiFile::read_path(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].smiles, "C1CCCCC1");
    }
}
