//! Transport layer abstraction.
//!
//! The driver only needs to fetch listings; [`ListingClient`] also exposes
//! the archive and update calls a dashboard page makes.

use async_trait::async_trait;
use hydrodash_listing::{ArchiveOutcome, ErrorBody, ListingResponse, API_PREFIX};
use hydrodash_types::{
    DeviceRecord, DeviceUpdate, RecordId, ResourceKind, ResourceRecord, UserRecord, UserUpdate,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::query::ListingQuery;

/// Something that can answer a listing query.
#[async_trait]
pub trait ListingTransport: Send + Sync {
    /// Fetches one listing page.
    async fn fetch(&self, query: &ListingQuery) -> ClientResult<ListingResponse>;
}

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server origin, e.g. `http://127.0.0.1:8080`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the listing API.
#[derive(Debug, Clone)]
pub struct ListingClient {
    config: ClientConfig,
    client: Client,
}

impl ListingClient {
    /// Creates a client. Fails only if the TLS backend cannot initialise.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Fetches one listing page.
    pub async fn list(&self, query: &ListingQuery) -> ClientResult<ListingResponse> {
        let url = self.url(&query.path());
        debug!(%url, "GET listing");
        let response = self.client.get(url).query(&query.to_params()).send().await?;
        decode(response).await
    }

    /// Moves a record into the archived partition.
    pub async fn archive(&self, kind: ResourceKind, id: RecordId) -> ClientResult<ArchiveOutcome> {
        self.transition(kind, id, "archive").await
    }

    /// Moves a record back into the active partition.
    pub async fn unarchive(&self, kind: ResourceKind, id: RecordId) -> ClientResult<ArchiveOutcome> {
        self.transition(kind, id, "unarchive").await
    }

    async fn transition(
        &self,
        kind: ResourceKind,
        id: RecordId,
        action: &str,
    ) -> ClientResult<ArchiveOutcome> {
        let url = self.url(&format!("{API_PREFIX}/{}/{id}/{action}", kind.path_segment()));
        debug!(%url, "PATCH archive transition");
        let response = self.client.patch(url).send().await?;
        decode(response).await
    }

    /// Saves a user edit.
    pub async fn update_user(&self, id: RecordId, update: &UserUpdate) -> ClientResult<UserRecord> {
        match self.update(ResourceKind::Users, id, update).await? {
            ResourceRecord::User(user) => Ok(user),
            ResourceRecord::Device(_) => Err(unexpected_shape("user")),
        }
    }

    /// Saves a device edit.
    pub async fn update_device(
        &self,
        id: RecordId,
        update: &DeviceUpdate,
    ) -> ClientResult<DeviceRecord> {
        match self.update(ResourceKind::Devices, id, update).await? {
            ResourceRecord::Device(device) => Ok(device),
            ResourceRecord::User(_) => Err(unexpected_shape("device")),
        }
    }

    async fn update<B: Serialize + ?Sized>(
        &self,
        kind: ResourceKind,
        id: RecordId,
        body: &B,
    ) -> ClientResult<ResourceRecord> {
        let url = self.url(&format!("{API_PREFIX}/{}/{id}", kind.path_segment()));
        let response = self.client.put(url).json(body).send().await?;
        decode(response).await
    }
}

#[async_trait]
impl ListingTransport for ListingClient {
    async fn fetch(&self, query: &ListingQuery) -> ClientResult<ListingResponse> {
        self.list(query).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    let text = response.text().await.unwrap_or_default();
    let (code, message, field_errors) = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => (body.code, body.message, body.field_errors),
        Err(_) => ("Unknown".to_string(), text, None),
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        code,
        message,
        field_errors,
    })
}

fn unexpected_shape(expected: &str) -> ClientError {
    ClientError::Api {
        status: 200,
        code: "UnexpectedBody".to_string(),
        message: format!("expected a {expected} record"),
        field_errors: None,
    }
}
