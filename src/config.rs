//! Command-line arguments and the job list file.
//!
//! The command line selects *where* to sweep (bucket, credentials, job file);
//! the job file says *what* to sweep: a YAML sequence of `{dir, daysLimit}`
//! records, each pairing an object-name prefix with a retention threshold.

use std::{
    io,
    path::{Path, PathBuf},
};

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

use crate::newtypes::RetentionDays;

/// Bucket swept when `--bucket` is not given.
pub const DEFAULT_BUCKET: &str = "ppc64le-kubernetes";
/// Job file read when `--config-file` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "./config.yml";
/// Service-account key location when `--gcs-cred-path` is not given.
pub const DEFAULT_CRED_PATH: &str = "/etc/gcs-cred/service-account.json";

/// Errors that may occur while loading the job list.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to open or read the job file.
    #[error("failed to read job file {path}: {source}")]
    Read {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The job file is not a valid YAML sequence of jobs.
    #[error("failed to parse job file {path}: {source}")]
    Deserialize {
        /// The file that could not be parsed.
        path: PathBuf,
        /// The underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },
}

/// Command-line surface of the sweeper.
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
#[command(about, version)]
pub struct Args {
    /// Path to the YAML file listing sweep jobs.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: PathBuf,
    /// Name of the GCS bucket to sweep.
    #[arg(long, default_value = DEFAULT_BUCKET)]
    pub bucket: String,
    /// Path to the GCS service-account key file.
    #[arg(long, default_value = DEFAULT_CRED_PATH)]
    pub gcs_cred_path: PathBuf,
}

/// One sweep job: a prefix and the retention threshold for objects under it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Job {
    /// Object-name prefix, emulating a directory.
    pub dir: String,
    /// Minimum age, in whole days, at which objects under `dir` are deleted.
    #[serde(rename = "daysLimit")]
    pub days_limit: RetentionDays,
}

/// Reads the ordered job list from the YAML file at `path`.
///
/// An empty sequence is valid and results in a run that touches nothing.
///
/// # Errors
///
/// - [`Error::Read`] if the file cannot be opened or read.
/// - [`Error::Deserialize`] if the contents are not a YAML sequence of jobs.
pub fn load_jobs(path: &Path) -> Result<Vec<Job>, Error> {
    let contents = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_owned(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| Error::Deserialize {
        path: path.to_owned(),
        source,
    })
}
