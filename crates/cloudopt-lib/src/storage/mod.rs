//! Blob storage transfer
//!
//! Batch jobs fetch the input table from object storage and push the report
//! back. The pipeline itself only sees bytes; everything about location and
//! transport lives behind [`BlobStore`].

mod azure;

pub use azure::{AzureBlobStore, API_VERSION};

use crate::error::Result;
use async_trait::async_trait;

/// Object storage holding input tables and reports
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch the full contents of a blob
    async fn download(&self, container: &str, blob: &str) -> Result<Vec<u8>>;

    /// Create or overwrite a blob
    async fn upload(&self, container: &str, blob: &str, data: Vec<u8>) -> Result<()>;

    /// Display form of a blob location, without credentials
    fn location(&self, container: &str, blob: &str) -> String;
}
