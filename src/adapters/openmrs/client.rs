//! OpenMRS REST client
//!
//! Speaks the OpenMRS REST API with basic auth. `connect` verifies the
//! session endpoint authenticates; `fetch_patient_encounters` pulls the
//! encounter listing for a location and folds it into a [`UnitMap`] in the
//! order the server returned it.

use crate::adapters::traits::SourceConnector;
use crate::config::OpenMrsConfig;
use crate::domain::ids::{EncounterId, LocationId, PatientId};
use crate::domain::{MedsyncError, OpenMrsError, Result, UnitMap};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::time::Duration;

/// OpenMRS REST API client
pub struct OpenMrsClient {
    base_url: String,
    client: Client,
    config: OpenMrsConfig,
}

/// Session endpoint response
#[derive(Debug, Deserialize)]
struct SessionResponse {
    authenticated: bool,
}

/// Encounter listing response
#[derive(Debug, Deserialize)]
struct EncounterListResponse {
    results: Vec<EncounterEntry>,
}

#[derive(Debug, Deserialize)]
struct EncounterEntry {
    uuid: String,
    patient: PatientRef,
    #[serde(rename = "encounterType")]
    encounter_type: Option<TypeRef>,
}

#[derive(Debug, Deserialize)]
struct PatientRef {
    uuid: String,
}

#[derive(Debug, Deserialize)]
struct TypeRef {
    uuid: String,
}

impl OpenMrsClient {
    /// Create a new OpenMRS client from configuration
    pub fn new(config: OpenMrsConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                MedsyncError::OpenMrs(OpenMrsError::ConnectionFailed(format!(
                    "Failed to build HTTP client: {e}"
                )))
            })?;

        Ok(Self {
            base_url,
            client,
            config,
        })
    }

    /// Base URL of the OpenMRS server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_status(status: StatusCode, body: String) -> OpenMrsError {
        match status.as_u16() {
            401 | 403 => OpenMrsError::AuthenticationFailed(body),
            code if status.is_client_error() => OpenMrsError::ClientError {
                status: code,
                message: body,
            },
            code => OpenMrsError::ServerError {
                status: code,
                message: body,
            },
        }
    }

    fn map_request_error(e: reqwest::Error) -> OpenMrsError {
        if e.is_timeout() {
            OpenMrsError::Timeout(e.to_string())
        } else if e.is_connect() {
            OpenMrsError::ConnectionFailed(e.to_string())
        } else {
            OpenMrsError::QueryFailed(e.to_string())
        }
    }
}

#[async_trait]
impl SourceConnector for OpenMrsClient {
    async fn connect(&self) -> Result<()> {
        let url = format!("{}/ws/rest/v1/session", self.base_url);

        let response = self
            .client
            .get(&url)
            .basic_auth(
                &self.config.username,
                Some(self.config.password.expose_secret().as_ref()),
            )
            .send()
            .await
            .map_err(|e| MedsyncError::OpenMrs(Self::map_request_error(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MedsyncError::OpenMrs(Self::map_status(status, body)));
        }

        let session: SessionResponse = response.json().await.map_err(|e| {
            MedsyncError::OpenMrs(OpenMrsError::InvalidResponse(e.to_string()))
        })?;

        if !session.authenticated {
            return Err(MedsyncError::OpenMrs(OpenMrsError::AuthenticationFailed(
                format!("Credentials rejected for user {}", self.config.username),
            )));
        }

        tracing::debug!(base_url = %self.base_url, "OpenMRS session established");
        Ok(())
    }

    async fn fetch_patient_encounters(
        &self,
        location: &LocationId,
        encounter_type_ids: &[String],
    ) -> Result<Option<UnitMap>> {
        let url = format!("{}/ws/rest/v1/encounter", self.base_url);

        let response = self
            .client
            .get(&url)
            .basic_auth(
                &self.config.username,
                Some(self.config.password.expose_secret().as_ref()),
            )
            .query(&[
                ("location", location.as_str()),
                ("v", "custom:(uuid,patient:(uuid),encounterType:(uuid))"),
            ])
            .send()
            .await
            .map_err(|e| MedsyncError::OpenMrs(Self::map_request_error(e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            // Unknown location: the source cannot produce a result
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MedsyncError::OpenMrs(Self::map_status(status, body)));
        }

        let listing: EncounterListResponse = response.json().await.map_err(|e| {
            MedsyncError::OpenMrs(OpenMrsError::InvalidResponse(e.to_string()))
        })?;

        let mut units = UnitMap::new();
        for entry in listing.results {
            if !encounter_type_ids.is_empty() {
                let type_matches = entry
                    .encounter_type
                    .as_ref()
                    .map(|t| encounter_type_ids.contains(&t.uuid))
                    .unwrap_or(false);
                if !type_matches {
                    continue;
                }
            }

            let patient = PatientId::new(entry.patient.uuid)
                .map_err(|e| MedsyncError::OpenMrs(OpenMrsError::InvalidResponse(e)))?;
            let encounter = EncounterId::new(entry.uuid)
                .map_err(|e| MedsyncError::OpenMrs(OpenMrsError::InvalidResponse(e)))?;
            units.push_encounter(patient, encounter);
        }

        tracing::debug!(
            location_id = %location,
            patients = units.len(),
            "Fetched encounter listing"
        );

        Ok(Some(units))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use std::str::FromStr;

    fn test_config(base_url: String) -> OpenMrsConfig {
        OpenMrsConfig {
            base_url,
            username: "sync".to_string(),
            password: secret_string("secret".to_string()),
            encounter_type_ids: vec![],
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_connect_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ws/rest/v1/session")
            .with_status(200)
            .with_body(r#"{"authenticated": true}"#)
            .create_async()
            .await;

        let client = OpenMrsClient::new(test_config(server.url())).unwrap();
        client.connect().await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_connect_rejected_credentials() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/ws/rest/v1/session")
            .with_status(200)
            .with_body(r#"{"authenticated": false}"#)
            .create_async()
            .await;

        let client = OpenMrsClient::new(test_config(server.url())).unwrap();
        let err = client.connect().await.unwrap_err();
        assert!(matches!(
            err,
            MedsyncError::OpenMrs(OpenMrsError::AuthenticationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_connect_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/ws/rest/v1/session")
            .with_status(500)
            .create_async()
            .await;

        let client = OpenMrsClient::new(test_config(server.url())).unwrap();
        let err = client.connect().await.unwrap_err();
        assert!(matches!(
            err,
            MedsyncError::OpenMrs(OpenMrsError::ServerError { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_groups_encounters_by_patient() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/ws/rest/v1/encounter")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"results": [
                    {"uuid": "E1", "patient": {"uuid": "P1"}, "encounterType": {"uuid": "T1"}},
                    {"uuid": "E2", "patient": {"uuid": "P1"}, "encounterType": {"uuid": "T1"}},
                    {"uuid": "E3", "patient": {"uuid": "P2"}, "encounterType": {"uuid": "T2"}}
                ]}"#,
            )
            .create_async()
            .await;

        let client = OpenMrsClient::new(test_config(server.url())).unwrap();
        let location = LocationId::from_str("L1").unwrap();
        let units = client
            .fetch_patient_encounters(&location, &[])
            .await
            .unwrap()
            .unwrap();

        assert_eq!(units.len(), 2);
        assert_eq!(
            units.get(&PatientId::from_str("P1").unwrap()).unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn test_fetch_filters_by_encounter_type() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/ws/rest/v1/encounter")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"results": [
                    {"uuid": "E1", "patient": {"uuid": "P1"}, "encounterType": {"uuid": "T1"}},
                    {"uuid": "E2", "patient": {"uuid": "P2"}, "encounterType": {"uuid": "T2"}}
                ]}"#,
            )
            .create_async()
            .await;

        let client = OpenMrsClient::new(test_config(server.url())).unwrap();
        let location = LocationId::from_str("L1").unwrap();
        let units = client
            .fetch_patient_encounters(&location, &["T1".to_string()])
            .await
            .unwrap()
            .unwrap();

        assert_eq!(units.len(), 1);
        assert!(units.get(&PatientId::from_str("P2").unwrap()).is_none());
    }

    #[tokio::test]
    async fn test_fetch_unknown_location_returns_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/ws/rest/v1/encounter")
            .match_query(mockito::Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let client = OpenMrsClient::new(test_config(server.url())).unwrap();
        let location = LocationId::from_str("unknown").unwrap();
        let result = client.fetch_patient_encounters(&location, &[]).await.unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_new_strips_trailing_slash() {
        let client = OpenMrsClient::new(test_config("https://example.org/openmrs/".into())).unwrap();
        assert_eq!(client.base_url(), "https://example.org/openmrs");
    }
}
