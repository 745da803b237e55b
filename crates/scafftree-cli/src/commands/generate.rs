use crate::cli::GenerateArgs;
use crate::config;
use crate::error::{CliError, Result};
use crate::output::JsonTreeStore;
use crate::utils::progress::CliProgressHandler;
use scafftree::{
    core::io::{CsvMoleculeFile, MoleculeListFile, MoleculeRecord, SmiFile},
    engine::progress::{CancelToken, ProgressReporter},
    workflows::generate::{self, GenerationOutcome},
};
use std::path::Path;
use tracing::info;

pub fn run(args: GenerateArgs) -> Result<()> {
    let settings = config::resolve(&args)?;

    info!("Loading molecules from {:?}", &args.input);
    let molecules = read_molecules(&args.input)?;
    println!(
        "Generating scaffold tree '{}' from {} molecule(s)...",
        settings.options.title,
        molecules.len()
    );

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let mut store = JsonTreeStore::new(args.output.clone());

    let outcome = generate::run(
        &settings.initiator,
        &molecules,
        &settings.options,
        &mut store,
        &reporter,
        &CancelToken::new(),
    )?;
    progress_handler.finish();

    match outcome {
        GenerationOutcome::Completed(tree) => {
            println!(
                "✓ Scaffold tree '{}' with {} scaffold(s) written to: {}",
                tree.title(),
                tree.len().saturating_sub(1),
                store.path().display()
            );
        }
        GenerationOutcome::Cancelled => {
            println!("Generation was cancelled; nothing was written.");
        }
    }

    Ok(())
}

fn read_molecules(path: &Path) -> Result<Vec<MoleculeRecord>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("smi") | Some("txt") => SmiFile::read_path(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        }),
        Some("csv") => CsvMoleculeFile::read_path(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        }),
        _ => Err(CliError::Argument(format!(
            "unsupported input format for '{}' (expected .smi, .txt or .csv)",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn args(input: PathBuf, output: PathBuf) -> GenerateArgs {
        GenerateArgs {
            input,
            output,
            config: None,
            title: None,
            comment: None,
            ruleset: None,
            deglycosilate: false,
            initiator: None,
        }
    }

    #[test]
    fn end_to_end_smi_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("mols.smi");
        let output = dir.path().join("tree.json");

        let mut file = std::fs::File::create(&input).unwrap();
        writeln!(file, "Cc1ccccc1 toluene").unwrap();
        writeln!(file, "c1ccc(-c2ccccc2)cc1 biphenyl").unwrap();
        drop(file);

        run(args(input, output.clone())).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("\"mols\""));
        assert!(content.contains("c1ccccc1"));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let result = read_molecules(Path::new("molecules.sdf"));
        assert!(matches!(result, Err(CliError::Argument(_))));
    }
}
