use crate::cli::GenerateArgs;
use crate::error::{CliError, Result};
use scafftree::core::scaffold::rules::RuleSet;
use scafftree::engine::config::{GeneratorOptions, GeneratorOptionsBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_INITIATOR: &str = "scafftree-cli";

/// Run configuration as read from a TOML file. Every field is optional;
/// command-line arguments take precedence over file values.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub title: Option<String>,
    pub comment: Option<String>,
    pub initiator: Option<String>,
    pub deglycosilate: Option<bool>,
    /// Path to a prioritization ruleset TOML, resolved relative to the
    /// working directory.
    pub ruleset: Option<PathBuf>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FileConfig =
            toml::from_str(&content).map_err(|e| CliError::FileParsing {
                path: path.to_path_buf(),
                source: e.into(),
            })?;
        debug!("Loaded run configuration from {:?}", path);
        Ok(config)
    }
}

/// Fully resolved settings for one generation run.
pub struct RunSettings {
    pub options: GeneratorOptions,
    pub initiator: String,
}

pub fn resolve(args: &GenerateArgs) -> Result<RunSettings> {
    let file = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };

    let title = args
        .title
        .clone()
        .or(file.title)
        .or_else(|| {
            args.input
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .ok_or_else(|| CliError::Argument("a tree title is required".to_string()))?;

    let comment = args.comment.clone().or(file.comment);
    let deglycosilate = args.deglycosilate || file.deglycosilate.unwrap_or(false);
    let initiator = args
        .initiator
        .clone()
        .or(file.initiator)
        .unwrap_or_else(|| DEFAULT_INITIATOR.to_string());

    let ruleset = match args.ruleset.as_ref().or(file.ruleset.as_ref()) {
        Some(path) => Some(RuleSet::load(path)?),
        None => None,
    };

    let mut builder = GeneratorOptionsBuilder::new()
        .title(title)
        .deglycosilate(deglycosilate);
    if let Some(comment) = comment {
        builder = builder.comment(comment);
    }
    if let Some(ruleset) = ruleset {
        builder = builder.ruleset(ruleset);
    }

    Ok(RunSettings {
        options: builder.build()?,
        initiator,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(input: &str) -> GenerateArgs {
        GenerateArgs {
            input: PathBuf::from(input),
            output: PathBuf::from("out.json"),
            config: None,
            title: None,
            comment: None,
            ruleset: None,
            deglycosilate: false,
            initiator: None,
        }
    }

    #[test]
    fn title_defaults_to_input_stem() {
        let settings = resolve(&args("data/actives.smi")).unwrap();
        assert_eq!(settings.options.title, "actives");
        assert_eq!(settings.initiator, DEFAULT_INITIATOR);
        assert!(!settings.options.deglycosilate);
    }

    #[test]
    fn cli_values_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("run.toml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "title = \"from file\"").unwrap();
        writeln!(file, "deglycosilate = true").unwrap();
        writeln!(file, "initiator = \"alice\"").unwrap();

        let mut args = args("mols.smi");
        args.config = Some(config_path);
        args.title = Some("from cli".to_string());

        let settings = resolve(&args).unwrap();
        assert_eq!(settings.options.title, "from cli");
        assert!(settings.options.deglycosilate);
        assert_eq!(settings.initiator, "alice");
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("run.toml");
        std::fs::write(&config_path, "titel = \"typo\"").unwrap();

        let mut args = args("mols.smi");
        args.config = Some(config_path);
        assert!(matches!(
            resolve(&args),
            Err(CliError::FileParsing { .. })
        ));
    }
}
