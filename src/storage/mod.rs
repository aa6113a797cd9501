//! The object-storage collaborator.
//!
//! The sweeper only needs two operations from storage: a lazy listing of the
//! objects under a prefix and a by-name delete. [`ObjectStore`] captures that
//! contract so the sweep logic can be exercised against an in-memory double;
//! [`gcs::GcsClient`] is the real implementation.

pub mod gcs;

use async_trait::async_trait;
use futures::stream::BoxStream;
use time::OffsetDateTime;

/// Error type shared by [`ObjectStore`] implementations.
///
/// Boxed so that test doubles can fail with whatever error type is handy; the
/// sweeper only ever propagates these, it never inspects them.
pub type StoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A transient view of one listed object.
///
/// Records are yielded by the listing stream and dropped once evaluated;
/// nothing here is persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectRecord {
    /// Full object name, including the listing prefix.
    pub name: String,
    /// When the object was created, as reported by the storage service.
    pub created: OffsetDateTime,
}

/// The storage operations the sweeper depends on.
#[async_trait]
pub trait ObjectStore {
    /// Lazily lists the objects in `bucket` whose names start with `prefix`.
    ///
    /// The stream ends normally when the listing is exhausted. Pagination, if
    /// any, happens behind the stream as it is polled; the first page is not
    /// fetched until then.
    fn list_objects(&self, bucket: &str, prefix: &str)
        -> BoxStream<'_, Result<ObjectRecord, StoreError>>;

    /// Deletes the object called `name` from `bucket`.
    async fn delete_object(&self, bucket: &str, name: &str) -> Result<(), StoreError>;
}
