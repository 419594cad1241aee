pub mod bootstrap_config;
mod config;
mod matrix;

use crate::config::load_config;
use bootstrap_config::BootstrapConfig;
use common::types::config::Config;
use common::util::logging;
use harvester::step1_load::LoadError;
use harvester::step2_resolve::{OsrmClient, ResolveError};
use harvester::step3_write::WriteError;
use log::{error, info, log_enabled, Level};
use matrix::{compute_matrix, MatrixJob};
use std::fmt::{Display, Formatter};
use std::process::ExitCode;

// One request in flight at a time, so a single-threaded runtime is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_fatal(&err);
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Reported {
    Log,
    Stderr,
}

// Logging may be off (`-l off`) or not set up at all, but a fatal error must always be shown.
fn report_fatal(err: &DistmatError) -> Reported {
    if log_enabled!(target: "main", Level::Error) {
        error!(target: "main", "{}", err);
        Reported::Log
    } else {
        eprintln!("{}", err);
        Reported::Stderr
    }
}

async fn run() -> Result<(), DistmatError> {
    let bootstrap_config = BootstrapConfig::read();

    logging::initialize_logging(bootstrap_config.log_level.into())?;

    let config = load_config(&bootstrap_config)?;

    let (job, backend) = match config {
        Config::Version1 { start, end, output, backend } => {
            info!(target: "main", "Routing via {} (profile '{}')", backend.url, backend.profile);
            (
                MatrixJob { start, end, output },
                OsrmClient::new(backend.url, backend.profile),
            )
        }
    };

    let summary = compute_matrix(&job, &backend).await?;

    info!(
        target: "main",
        "Done! Wrote {} of {} distances to {:?} ({} dropped)",
        summary.written,
        summary.starts * summary.ends,
        job.output.path,
        summary.dropped
    );

    Ok(())
}

#[derive(thiserror::Error, Debug)]
pub enum DistmatError {
    Logging(#[from] log::SetLoggerError),
    Config(#[from] config::ConfigError),
    Load(#[from] LoadError),
    Resolve(#[from] ResolveError),
    Write(#[from] WriteError),
}

impl Display for DistmatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let err: &dyn Display = match self {
            DistmatError::Logging(err) => err,
            DistmatError::Config(err) => err,
            DistmatError::Load(err) => err,
            DistmatError::Resolve(err) => err,
            DistmatError::Write(err) => err,
        };
        let prefix = match self {
            DistmatError::Logging(_) => "Setting up logging",
            DistmatError::Config(_) => "Reading config file",
            DistmatError::Load(_) => "Loading coordinates",
            DistmatError::Resolve(_) => "Resolving distances",
            DistmatError::Write(_) => "Writing distances",
        };
        write!(f, "{}: {}", prefix, err)
    }
}
