//! [`ObjectStore`] implementation over the GCS JSON API.
//!
//! Authentication uses a service-account key file: the key is parsed into
//! [`CredentialsFile`] and exchanged for an OAuth access token scoped to
//! `devstorage.read_write`. Access tokens live about an hour and a whole run
//! is bounded well below that, so one token is fetched at connect time and
//! shared across jobs.

mod types;

use std::{
    io,
    path::{Path, PathBuf},
};

use async_stream::try_stream;
use async_trait::async_trait;
use futures::stream::BoxStream;
use google_cloud_auth::credentials::CredentialsFile;
use google_cloud_auth::token::DefaultTokenSourceProvider;
use google_cloud_token::TokenSourceProvider;
use reqwest::StatusCode;
use thiserror::Error;

use super::{ObjectRecord, ObjectStore, StoreError};
use types::ListPage;

const STORAGE_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_write";
const DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com/storage/v1";
// Trim listing payloads to the fields the sweeper actually reads.
const LIST_FIELDS: &str = "items(name,timeCreated),nextPageToken";

/// Errors that may occur while talking to the storage API.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read the service-account key file.
    #[error("failed to read service-account key file {path}: {source}")]
    ReadCredentials {
        /// The key file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The key file is not valid service-account JSON.
    #[error("failed to parse service-account key file: {0}")]
    ParseCredentials(#[source] serde_json::Error),
    /// Failed to build a token source from the parsed credentials.
    #[error("failed to build token source from service account: {0}")]
    TokenSource(#[source] google_cloud_auth::error::Error),
    /// The token source could not produce an access token.
    #[error("failed to fetch access token: {0}")]
    Token(#[source] StoreError),
    /// An HTTP request could not be sent or its body could not be decoded.
    #[error("storage API request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The storage API answered with a non-success status.
    #[error("storage API returned {status}: {body}")]
    Status {
        /// The response status code.
        status: StatusCode,
        /// The response body, as reported by the API.
        body: String,
    },
}

/// A connected GCS client.
pub struct GcsClient {
    http: reqwest::Client,
    token: Option<String>,
    endpoint: String,
}

impl GcsClient {
    /// Authenticates against GCS with the service-account key at `cred_path`.
    ///
    /// # Errors
    ///
    /// - [`Error::ReadCredentials`] if the key file cannot be read.
    /// - [`Error::ParseCredentials`] if it is not valid service-account JSON.
    /// - [`Error::TokenSource`] / [`Error::Token`] if the key cannot be
    ///   exchanged for an access token.
    pub async fn connect(cred_path: &Path) -> Result<Self, Error> {
        let key_json =
            tokio::fs::read_to_string(cred_path)
                .await
                .map_err(|source| Error::ReadCredentials {
                    path: cred_path.to_owned(),
                    source,
                })?;
        let credentials: CredentialsFile =
            serde_json::from_str(&key_json).map_err(Error::ParseCredentials)?;

        let config = google_cloud_auth::project::Config::default().with_scopes(&[STORAGE_SCOPE]);
        let provider =
            DefaultTokenSourceProvider::new_with_credentials(config, Box::new(credentials))
                .await
                .map_err(Error::TokenSource)?;
        let token = provider
            .token_source()
            .token()
            .await
            .map_err(Error::Token)?;

        Ok(Self {
            http: reqwest::Client::new(),
            token: Some(token),
            endpoint: String::from(DEFAULT_ENDPOINT),
        })
    }

    /// Creates a client that sends no credentials.
    ///
    /// Only useful against local emulators; the real API rejects
    /// unauthenticated deletes.
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self {
            http: reqwest::Client::new(),
            token: None,
            endpoint: String::from(DEFAULT_ENDPOINT),
        }
    }

    /// Replaces the API endpoint, e.g. with a local emulator's address.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Error::Status { status, body })
        }
    }

    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        page_token: Option<&str>,
    ) -> Result<ListPage, Error> {
        let url = format!("{}/b/{}/o", self.endpoint, urlencoding::encode(bucket));
        let mut request = self
            .http
            .get(&url)
            .query(&[("prefix", prefix), ("fields", LIST_FIELDS)]);
        if let Some(page_token) = page_token {
            request = request.query(&[("pageToken", page_token)]);
        }

        let response = self.authorized(request).send().await?;
        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(Error::from)
    }

    async fn delete(&self, bucket: &str, name: &str) -> Result<(), Error> {
        // Object names may contain slashes; they travel as a single
        // percent-encoded path segment.
        let url = format!(
            "{}/b/{}/o/{}",
            self.endpoint,
            urlencoding::encode(bucket),
            urlencoding::encode(name)
        );
        let response = self.authorized(self.http.delete(&url)).send().await?;
        Self::check_status(response).await.map(|_response| ())
    }
}

#[async_trait]
impl ObjectStore for GcsClient {
    fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> BoxStream<'_, Result<ObjectRecord, StoreError>> {
        let bucket = bucket.to_owned();
        let prefix = prefix.to_owned();
        Box::pin(try_stream! {
            let mut page_token: Option<String> = None;
            loop {
                let page = self
                    .list_page(&bucket, &prefix, page_token.as_deref())
                    .await?;
                for object in page.items {
                    yield ObjectRecord::from(object);
                }
                match page.next_page_token {
                    Some(token) => page_token = Some(token),
                    None => break,
                }
            }
        })
    }

    async fn delete_object(&self, bucket: &str, name: &str) -> Result<(), StoreError> {
        self.delete(bucket, name).await.map_err(StoreError::from)
    }
}
