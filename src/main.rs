use clap::Parser;
use thiserror::Error;

use gcs_sweeper::config::{self, Args};
use gcs_sweeper::logging;
use gcs_sweeper::storage::gcs::{self, GcsClient};
use gcs_sweeper::sweep;

#[derive(Debug, Error)]
enum Error {
    #[error("failed to load job list: {0}")]
    Config(#[from] config::Error),
    #[error("failed to connect to storage: {0}")]
    Connect(#[from] gcs::Error),
    #[error("sweep failed: {0}")]
    Sweep(#[from] sweep::Error),
}

async fn run() -> Result<(), Error> {
    let args = Args::parse();
    let jobs = config::load_jobs(&args.config_file)?;

    if jobs.is_empty() {
        tracing::info!("job list is empty, nothing to sweep");
        return Ok(());
    }

    let client = GcsClient::connect(&args.gcs_cred_path).await?;
    for job in jobs {
        let report = sweep::sweep(&client, &args.bucket, &job.dir, job.days_limit).await?;
        tracing::info!(
            bucket = %args.bucket,
            prefix = %job.dir,
            examined = report.examined,
            deleted = report.deleted,
            "sweep complete"
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing::subscriber::set_global_default(logging::get_subscriber())
        .expect("failed to set global tracing subscriber");

    if let Err(error) = run().await {
        tracing::error!("{error}");
        std::process::exit(1);
    }
}
