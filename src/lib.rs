//! Scheduled cleanup for Google Cloud Storage buckets.
//!
//! Each configured job pairs an object-name prefix with a retention threshold
//! in whole days. A run lists every object under each prefix and deletes the
//! ones whose age has reached the threshold. Jobs run sequentially against a
//! single bucket; the first error aborts the whole run.

pub mod config;
pub mod logging;
pub mod newtypes;
pub mod storage;
pub mod sweep;

pub use config::{Args, Job};
pub use newtypes::RetentionDays;
pub use sweep::{sweep, SweepReport};
