//! One complete pass of listing and conditionally deleting objects.

use std::time::Duration;

use futures::StreamExt;
use thiserror::Error;
use time::OffsetDateTime;

use crate::newtypes::RetentionDays;
use crate::storage::{ObjectStore, StoreError};

/// Wall-clock budget covering one job's entire listing-and-deletion pass.
/// When it expires, in-flight storage calls are cancelled by drop and the job
/// reports failure.
pub const SWEEP_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Errors that may abort a sweep.
///
/// There is no partial-failure tolerance: the first error ends the pass.
/// Objects deleted earlier in the same pass stay deleted.
#[derive(Debug, Error)]
pub enum Error {
    /// Failure while paging through the bucket listing.
    #[error("failed to list bucket {bucket:?} under prefix {prefix:?}: {source}")]
    List {
        /// The bucket being listed.
        bucket: String,
        /// The prefix being listed.
        prefix: String,
        /// The underlying storage error.
        #[source]
        source: StoreError,
    },
    /// Failure deleting a specific object.
    #[error("failed to delete object {name:?} from bucket {bucket:?}: {source}")]
    Delete {
        /// The bucket holding the object.
        bucket: String,
        /// The object that could not be deleted.
        name: String,
        /// The underlying storage error.
        #[source]
        source: StoreError,
    },
    /// The pass did not finish within [`SWEEP_TIMEOUT`].
    #[error("sweep of bucket {bucket:?} under prefix {prefix:?} exceeded its 10-minute budget")]
    Timeout {
        /// The bucket being swept.
        bucket: String,
        /// The prefix being swept.
        prefix: String,
    },
}

/// Counts from one completed sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// How many objects the listing yielded.
    pub examined: u64,
    /// How many of those were deleted.
    pub deleted: u64,
}

/// Whole days elapsed between `created` and `now`, truncating partial days.
fn age_in_days(now: OffsetDateTime, created: OffsetDateTime) -> i64 {
    (now - created).whole_hours() / 24
}

/// Deletes every object in `bucket` under `prefix` whose age in whole days
/// has reached `retention`.
///
/// Records are consumed one at a time from the lazy listing stream; zero
/// matching objects is a normal, successful outcome. Timestamps are compared
/// in UTC.
///
/// # Errors
///
/// - [`Error::List`] if the listing fails at any point.
/// - [`Error::Delete`] if deleting an eligible object fails.
/// - [`Error::Timeout`] if the pass outlives [`SWEEP_TIMEOUT`].
pub async fn sweep<S>(
    store: &S,
    bucket: &str,
    prefix: &str,
    retention: RetentionDays,
) -> Result<SweepReport, Error>
where
    S: ObjectStore + Sync,
{
    match tokio::time::timeout(SWEEP_TIMEOUT, sweep_pass(store, bucket, prefix, retention)).await {
        Ok(result) => result,
        Err(_elapsed) => Err(Error::Timeout {
            bucket: bucket.to_owned(),
            prefix: prefix.to_owned(),
        }),
    }
}

async fn sweep_pass<S>(
    store: &S,
    bucket: &str,
    prefix: &str,
    retention: RetentionDays,
) -> Result<SweepReport, Error>
where
    S: ObjectStore + Sync,
{
    let mut report = SweepReport::default();
    let mut records = store.list_objects(bucket, prefix);

    while let Some(record) = records.next().await {
        let record = record.map_err(|source| Error::List {
            bucket: bucket.to_owned(),
            prefix: prefix.to_owned(),
            source,
        })?;
        report.examined += 1;

        let age_days = age_in_days(OffsetDateTime::now_utc(), record.created);
        tracing::debug!(
            name = %record.name,
            created = %record.created,
            age_days,
            "evaluating object"
        );

        if retention.covers(age_days) {
            store
                .delete_object(bucket, &record.name)
                .await
                .map_err(|source| Error::Delete {
                    bucket: bucket.to_owned(),
                    name: record.name.clone(),
                    source,
                })?;
            report.deleted += 1;
            tracing::info!("deleted object {}", record.name);
        }
    }

    Ok(report)
}
