//! Shared test doubles for exercising the sweeper without real storage.
#![allow(dead_code)]

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use time::{Duration, OffsetDateTime};

use gcs_sweeper::storage::{ObjectRecord, ObjectStore, StoreError};

fn simulated(message: &str) -> StoreError {
    Box::new(io::Error::new(io::ErrorKind::Other, message.to_owned()))
}

/// In-memory [`ObjectStore`] with scripted failures.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<Vec<(String, ObjectRecord)>>,
    fail_listing_after: Option<usize>,
    fail_deletes: bool,
    delete_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every listing yield `yielded` records and then an error.
    pub fn with_listing_failure_after(mut self, yielded: usize) -> Self {
        self.fail_listing_after = Some(yielded);
        self
    }

    /// Makes every delete call fail.
    pub fn with_failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    pub fn insert(&self, bucket: &str, name: &str, created: OffsetDateTime) {
        self.objects.lock().unwrap().push((
            bucket.to_owned(),
            ObjectRecord {
                name: name.to_owned(),
                created,
            },
        ));
    }

    /// Inserts an object created `hours` hours before now.
    pub fn insert_aged(&self, bucket: &str, name: &str, hours: i64) {
        self.insert(
            bucket,
            name,
            OffsetDateTime::now_utc() - Duration::hours(hours),
        );
    }

    /// Names of the objects still present in `bucket`, sorted.
    pub fn names(&self, bucket: &str) -> Vec<String> {
        let mut names: Vec<_> = self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|(b, _)| b == bucket)
            .map(|(_, record)| record.name.clone())
            .collect();
        names.sort_unstable();
        names
    }

    /// How many delete calls were issued, successful or not.
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> BoxStream<'_, Result<ObjectRecord, StoreError>> {
        let mut results: Vec<Result<ObjectRecord, StoreError>> = self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|(b, record)| b == bucket && record.name.starts_with(prefix))
            .map(|(_, record)| Ok(record.clone()))
            .collect();

        if let Some(yielded) = self.fail_listing_after {
            results.truncate(yielded);
            results.push(Err(simulated("listing failed partway through")));
        }

        Box::pin(stream::iter(results))
    }

    async fn delete_object(&self, bucket: &str, name: &str) -> Result<(), StoreError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes {
            return Err(simulated("delete refused"));
        }

        let mut objects = self.objects.lock().unwrap();
        let before = objects.len();
        objects.retain(|(b, record)| !(b == bucket && record.name == name));
        if objects.len() == before {
            return Err(simulated("object does not exist"));
        }
        Ok(())
    }
}
