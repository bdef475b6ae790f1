use base64::Engine;
use reqwest::Client;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::{
    error::{Result, SubmitError},
    platform::types::FileEntity,
    utils,
};

#[derive(Debug, Serialize)]
struct GatewayPayload<'a> {
    submission_folder: &'a str,
    data: String,
}

/// Stores prediction files through the challenge's upload gateway
pub struct GatewayUploader {
    http: Client,
    url: String,
}

impl GatewayUploader {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.to_string(),
        })
    }

    /// Upload `path` into the team's prediction folder
    pub async fn upload(&self, path: &Path, folder_id: &str) -> Result<FileEntity> {
        let payload = encode_payload(&std::fs::read(path)?, folder_id);
        info!("Uploading {} to folder {}", path.display(), folder_id);

        let bar = utils::spinner("Uploading prediction file...");
        let response = self.http.post(&self.url).json(&payload).send().await;
        bar.finish_and_clear();

        let response = response?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SubmitError::Platform {
                status: status.as_u16(),
                message: format!("upload gateway rejected the file: {}", body),
            });
        }

        let entity: FileEntity = serde_json::from_str(&body)?;
        info!("Stored {} as {} (version {})", path.display(), entity.id, entity.version_number);
        Ok(entity)
    }
}

fn encode_payload<'a>(contents: &[u8], folder_id: &'a str) -> GatewayPayload<'a> {
    GatewayPayload {
        submission_folder: folder_id,
        data: base64::engine::general_purpose::STANDARD.encode(contents),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let payload = encode_payload(b"PatientID,RiskScore\nP1,0.5\n", "syn1234");
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["submission_folder"], "syn1234");
        assert_eq!(value["data"], "UGF0aWVudElELFJpc2tTY29yZQpQMSwwLjUK");
    }
}
