//! Azure Blob Storage over plain HTTP
//!
//! Authentication is a SAS token appended as the query string; acquiring
//! that token is up to the caller.

use super::BlobStore;
use crate::error::{CloudOptError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Storage service version sent with every request
pub const API_VERSION: &str = "2021-08-06";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Blob client for one storage account
pub struct AzureBlobStore {
    client: Client,
    endpoint: Url,
    sas_token: Option<String>,
}

impl AzureBlobStore {
    /// Client for `https://<account>.blob.core.windows.net`
    pub fn new(account: &str, sas_token: Option<String>) -> Result<Self> {
        Self::with_endpoint(&format!("https://{account}.blob.core.windows.net"), sas_token)
    }

    /// Client for a custom endpoint (emulator, private link, tests)
    pub fn with_endpoint(endpoint: &str, sas_token: Option<String>) -> Result<Self> {
        let endpoint = Url::parse(endpoint)?;
        if endpoint.cannot_be_a_base() {
            return Err(CloudOptError::InvalidEndpoint(endpoint.to_string()));
        }

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let sas_token = sas_token
            .map(|t| t.trim_start_matches('?').to_string())
            .filter(|t| !t.is_empty());

        Ok(Self {
            client,
            endpoint,
            sas_token,
        })
    }

    /// URL of a blob, blob names may contain `/` for virtual directories
    fn blob_url(&self, container: &str, blob: &str) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| CloudOptError::InvalidEndpoint(self.endpoint.to_string()))?
            .pop_if_empty()
            .push(container)
            .extend(blob.split('/'));
        url.set_query(self.sas_token.as_deref());
        Ok(url)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(CloudOptError::Transfer {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    async fn download(&self, container: &str, blob: &str) -> Result<Vec<u8>> {
        let url = self.blob_url(container, blob)?;
        debug!(location = %self.location(container, blob), "Downloading blob");

        let response = self
            .client
            .get(url)
            .header("x-ms-version", API_VERSION)
            .send()
            .await?;
        let bytes = Self::check(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn upload(&self, container: &str, blob: &str, data: Vec<u8>) -> Result<()> {
        let url = self.blob_url(container, blob)?;
        debug!(location = %self.location(container, blob), bytes = data.len(), "Uploading blob");

        let response = self
            .client
            .put(url)
            .header("x-ms-version", API_VERSION)
            .header("x-ms-blob-type", "BlockBlob")
            .header("Content-Type", "text/csv")
            .body(data)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    fn location(&self, container: &str, blob: &str) -> String {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(container).extend(blob.split('/'));
        }
        url.to_string()
    }
}
