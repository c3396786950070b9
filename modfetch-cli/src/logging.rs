//! Logging setup.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `warn`, or `debug` for
/// the modfetch crates when `verbose` is set. With a log file, output goes
/// there through a non-blocking writer whose guard must be kept alive until
/// exit.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<Option<WorkerGuard>, CliError> {
    let default_directive = if verbose {
        "warn,modfetch=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    match log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .ok_or_else(|| CliError::Logging(format!("not a file: {}", path.display())))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|e| CliError::Logging(e.to_string()))?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| CliError::Logging(e.to_string()))?;
            Ok(None)
        }
    }
}
