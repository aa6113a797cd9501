//! Wire types for the slice of the GCS JSON API the sweeper touches.

use serde::Deserialize;
use time::OffsetDateTime;

use crate::storage::ObjectRecord;

/// One page of an object listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ListPage {
    // The API omits `items` entirely when a page is empty.
    #[serde(default)]
    pub items: Vec<StoredObject>,
    pub next_page_token: Option<String>,
}

/// The subset of object metadata the sweeper reads.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StoredObject {
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub time_created: OffsetDateTime,
}

impl From<StoredObject> for ObjectRecord {
    fn from(object: StoredObject) -> Self {
        Self {
            name: object.name,
            created: object.time_created,
        }
    }
}
