//! Media upload service.
//!
//! Multipart only. The JSON content-type header must never be set for
//! these requests: the transport sets the multipart boundary itself.

use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::http::{ApiClient, MultipartPart, RequestOptions};
use crate::normalize::canonicalize;

/// A file picked by the user, ready for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Clone)]
pub struct UploadService {
    client: ApiClient,
}

impl UploadService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Single-file variant: one part under the `image` field. Returns
    /// the stored URL.
    pub async fn upload_image(&self, file: UploadFile) -> Result<String> {
        let part = MultipartPart {
            name: "image".to_string(),
            file_name: file.file_name,
            content_type: file.content_type,
            data: file.data,
        };
        let raw = self
            .client
            .request("/uploads/image", RequestOptions::multipart(vec![part]))
            .await?;
        probe_url(&canonicalize(&raw))
            .ok_or_else(|| ApiError::decode("upload response carried no url"))
    }

    /// Multi-file variant: every part under `images[]`. Returns the
    /// stored URLs in upload order.
    pub async fn upload_images(&self, files: Vec<UploadFile>) -> Result<Vec<String>> {
        if files.is_empty() {
            return Err(ApiError::invalid("no files to upload"));
        }
        let parts = files
            .into_iter()
            .map(|file| MultipartPart {
                name: "images[]".to_string(),
                file_name: file.file_name,
                content_type: file.content_type,
                data: file.data,
            })
            .collect();
        let raw = self
            .client
            .request("/uploads/images", RequestOptions::multipart(parts))
            .await?;
        probe_urls(&canonicalize(&raw))
            .ok_or_else(|| ApiError::decode("upload response carried no urls"))
    }
}

fn probe_url(canonical: &Value) -> Option<String> {
    canonical
        .get("url")
        .or_else(|| canonical.get("data").and_then(|d| d.get("url")))
        .and_then(Value::as_str)
        .map(str::to_owned)
}

fn probe_urls(canonical: &Value) -> Option<Vec<String>> {
    let urls = canonical
        .get("urls")
        .or_else(|| canonical.get("data").and_then(|d| d.get("urls")))?;
    urls.as_array().map(|arr| {
        arr.iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect()
    })
}
