//! DHIS2 upload client
//!
//! Walks the staging directory and POSTs each staged patient file to the
//! DHIS2 events endpoint. Files are shipped in directory-listing order, one
//! request at a time; a rejected upload is fatal and no retry is attempted
//! here (re-running the program re-stages and re-uploads the location).

use crate::adapters::traits::UploadHandler;
use crate::config::Dhis2Config;
use crate::domain::{Dhis2Error, MedsyncError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// DHIS2 REST API client
pub struct Dhis2Client {
    base_url: String,
    client: Client,
    config: Dhis2Config,
    staging_dir: PathBuf,
}

impl Dhis2Client {
    /// Create a new DHIS2 client from configuration
    ///
    /// `staging_dir` is the directory whose files `hand_off_for_upload`
    /// ships.
    pub fn new(config: Dhis2Config, staging_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                MedsyncError::Dhis2(Dhis2Error::ConnectionFailed(format!(
                    "Failed to build HTTP client: {e}"
                )))
            })?;

        Ok(Self {
            base_url,
            client,
            config,
            staging_dir: staging_dir.into(),
        })
    }

    /// Base URL of the DHIS2 server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn upload_file(&self, path: &std::path::Path) -> Result<()> {
        let contents = fs::read_to_string(path).map_err(|e| {
            MedsyncError::Dhis2(Dhis2Error::StagedFileUnreadable(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;

        let payload: serde_json::Value = serde_json::from_str(&contents).map_err(|e| {
            MedsyncError::Dhis2(Dhis2Error::StagedFileUnreadable(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;

        let url = format!("{}/api/events", self.base_url);
        let response = self
            .client
            .post(&url)
            .basic_auth(
                &self.config.username,
                Some(self.config.password.expose_secret().as_ref()),
            )
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                MedsyncError::Dhis2(if e.is_connect() {
                    Dhis2Error::ConnectionFailed(e.to_string())
                } else {
                    Dhis2Error::InvalidResponse(e.to_string())
                })
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = match status.as_u16() {
                401 | 403 => Dhis2Error::AuthenticationFailed(body),
                code => Dhis2Error::UploadFailed {
                    status: code,
                    message: body,
                },
            };
            return Err(MedsyncError::Dhis2(err));
        }

        tracing::debug!(file = %path.display(), "Uploaded staged artifact");
        Ok(())
    }
}

#[async_trait]
impl UploadHandler for Dhis2Client {
    async fn hand_off_for_upload(&self) -> Result<()> {
        let entries = fs::read_dir(&self.staging_dir).map_err(|e| {
            MedsyncError::Dhis2(Dhis2Error::StagedFileUnreadable(format!(
                "Failed to read staging directory {}: {}",
                self.staging_dir.display(),
                e
            )))
        })?;

        let mut uploaded = 0usize;
        for entry in entries {
            let entry = entry.map_err(|e| {
                MedsyncError::Dhis2(Dhis2Error::StagedFileUnreadable(e.to_string()))
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            self.upload_file(&path).await?;
            uploaded += 1;
        }

        tracing::info!(uploaded, "Upload handoff complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use tempfile::TempDir;

    fn test_config(base_url: String) -> Dhis2Config {
        Dhis2Config {
            base_url,
            username: "admin".to_string(),
            password: secret_string("district".to_string()),
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_hand_off_posts_each_staged_file() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/events")
            .with_status(200)
            .with_body("{}")
            .expect(2)
            .create_async()
            .await;

        let staging = TempDir::new().unwrap();
        fs::write(staging.path().join("p1.json"), r#"{"patient_id":"P1"}"#).unwrap();
        fs::write(staging.path().join("p2.json"), r#"{"patient_id":"P2"}"#).unwrap();

        let client = Dhis2Client::new(test_config(server.url()), staging.path()).unwrap();
        client.hand_off_for_upload().await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_hand_off_empty_staging_is_ok() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/events")
            .expect(0)
            .create_async()
            .await;

        let staging = TempDir::new().unwrap();
        let client = Dhis2Client::new(test_config(server.url()), staging.path()).unwrap();
        client.hand_off_for_upload().await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_upload_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/events")
            .with_status(409)
            .with_body("conflict")
            .create_async()
            .await;

        let staging = TempDir::new().unwrap();
        fs::write(staging.path().join("p1.json"), r#"{"patient_id":"P1"}"#).unwrap();

        let client = Dhis2Client::new(test_config(server.url()), staging.path()).unwrap();
        let err = client.hand_off_for_upload().await.unwrap_err();
        assert!(matches!(
            err,
            MedsyncError::Dhis2(Dhis2Error::UploadFailed { status: 409, .. })
        ));
    }

    #[tokio::test]
    async fn test_unparseable_staged_file_is_fatal() {
        let server = mockito::Server::new_async().await;

        let staging = TempDir::new().unwrap();
        fs::write(staging.path().join("broken.json"), "{not json").unwrap();

        let client = Dhis2Client::new(test_config(server.url()), staging.path()).unwrap();
        let err = client.hand_off_for_upload().await.unwrap_err();
        assert!(matches!(
            err,
            MedsyncError::Dhis2(Dhis2Error::StagedFileUnreadable(_))
        ));
    }
}
