use crate::error::Result;
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

/// Maps the `-v` count to a level; `--quiet` silences everything.
fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber: a compact stderr layer, plus a plain
/// (no ANSI) file layer when `log_file` is given.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: &Option<PathBuf>) -> Result<()> {
    let stderr_layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr);

    let registry = tracing_subscriber::registry()
        .with(level_for(verbosity, quiet))
        .with(stderr_layer);

    match log_file {
        Some(path) => {
            let file_layer = fmt::layer()
                .with_writer(File::create(path)?)
                .with_ansi(false)
                .with_target(true);
            registry.with(file_layer).init();
        }
        None => registry.init(),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use tracing::warn;

    #[test]
    fn quiet_wins_over_verbosity() {
        assert_eq!(level_for(3, true), LevelFilter::OFF);
        assert_eq!(level_for(0, false), LevelFilter::WARN);
        assert_eq!(level_for(2, false), LevelFilter::DEBUG);
        assert_eq!(level_for(9, false), LevelFilter::TRACE);
    }

    #[test]
    fn log_file_receives_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");

        let layer = fmt::layer()
            .with_writer(File::create(&path).unwrap())
            .with_ansi(false);
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            warn!("ruleset fell back to the built-in order");
        });

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("ruleset fell back to the built-in order"));
        assert!(content.contains("WARN"));
    }

    #[test]
    fn unwritable_log_file_is_an_io_error() {
        let path = PathBuf::from("/");
        if cfg!(unix) && path.is_dir() {
            assert!(matches!(
                setup_logging(0, false, &Some(path)),
                Err(CliError::Io(_))
            ));
        }
    }
}
