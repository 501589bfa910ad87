//! reqwest-backed implementation of `UserApi`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{UpdatePayload, UpdateStatus, UserApi, UserRecord};
use crate::config::FormConfig;
use crate::error::ApiError;
use crate::reference::{lenient_text, Id, RoleOption, SectorOption, SupervisorOption};

const ROLES_PATH: &str = "roles";
const SECTORS_PATH: &str = "sectors";
const SUPERVISORS_PATH: &str = "supervisors";
const USER_DETAILS_PATH: &str = "user-details";

/// Wire shape of `GET user-details/{id}`.
#[derive(Debug, Deserialize)]
struct UserDetailsResponse {
    #[serde(default)]
    user_details: Option<UserDetails>,
    #[serde(default, deserialize_with = "lenient_text")]
    email: Option<String>,
    #[serde(default)]
    role: Value,
    #[serde(default)]
    supervisors: Option<Vec<SupervisorOption>>,
}

#[derive(Debug, Default, Deserialize)]
struct UserDetails {
    #[serde(default, deserialize_with = "lenient_text")]
    first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    mobile_no: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    sector: Option<String>,
}

impl From<UserDetailsResponse> for UserRecord {
    fn from(wire: UserDetailsResponse) -> Self {
        let details = wire.user_details.unwrap_or_default();
        UserRecord {
            first_name: details.first_name,
            last_name: details.last_name,
            mobile_no: details.mobile_no,
            email: wire.email,
            sector_id: details.sector.map(Id::new),
            role: wire.role,
            supervisors: wire.supervisors.unwrap_or_default(),
        }
    }
}

/// HTTP client for the user-details backend.
pub struct HttpUserApi {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpUserApi {
    /// Fails only if the TLS backend cannot be initialised.
    pub fn new(base_url: impl Into<String>, auth_token: Option<String>, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into(),
            auth_token,
        })
    }

    pub fn from_config(config: &FormConfig) -> Result<Self, ApiError> {
        Self::new(
            config.api_base_url.clone(),
            config.auth_token.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.auth_token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!("GET {}", url);

        let res = self.authorized(self.client.get(&url)).send().await?.error_for_status()?;
        let body = res.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl UserApi for HttpUserApi {
    async fn fetch_roles(&self) -> Result<Vec<RoleOption>, ApiError> {
        self.get_json(ROLES_PATH).await
    }

    async fn fetch_sectors(&self) -> Result<Vec<SectorOption>, ApiError> {
        self.get_json(SECTORS_PATH).await
    }

    async fn fetch_supervisors(&self) -> Result<Vec<SupervisorOption>, ApiError> {
        self.get_json(SUPERVISORS_PATH).await
    }

    async fn get_record(&self, id: &str) -> Result<UserRecord, ApiError> {
        let wire: UserDetailsResponse = self.get_json(&format!("{}/{}", USER_DETAILS_PATH, id)).await?;
        Ok(wire.into())
    }

    async fn update_record(&self, id: &str, payload: &UpdatePayload) -> Result<UpdateStatus, ApiError> {
        let url = self.url(&format!("{}/{}", USER_DETAILS_PATH, id));
        debug!("POST {}", url);

        let res = self
            .authorized(self.client.post(&url).form(payload))
            .send()
            .await?
            .error_for_status()?;
        let body = res.text().await?;
        Ok(UpdateStatus::from_body(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_details_flattening() {
        let wire: UserDetailsResponse = serde_json::from_value(json!({
            "user_details": {
                "first_name": "Ada",
                "last_name": null,
                "mobile_no": 5551234,
                "sector": 4
            },
            "email": "ada@example.com",
            "role": "[\"3\",\"5\"]",
            "supervisors": [{ "id": 7, "user_name": "Grace" }]
        }))
        .unwrap();

        let record = UserRecord::from(wire);
        assert_eq!(record.first_name.as_deref(), Some("Ada"));
        assert_eq!(record.last_name, None);
        assert_eq!(record.mobile_no.as_deref(), Some("5551234"));
        assert_eq!(record.sector_id, Some(Id::from("4")));
        assert_eq!(record.role, json!("[\"3\",\"5\"]"));
        assert_eq!(record.supervisors[0].id, Id::from("7"));
    }

    #[test]
    fn test_user_details_tolerates_missing_sections() {
        let wire: UserDetailsResponse = serde_json::from_value(json!({ "email": "x@y.z" })).unwrap();
        let record = UserRecord::from(wire);
        assert_eq!(record.first_name, None);
        assert!(record.supervisors.is_empty());
        assert_eq!(record.role, Value::Null);
    }

    #[test]
    fn test_from_config_keeps_settings() {
        let config = FormConfig {
            api_base_url: "http://10.0.0.2/api".into(),
            auth_token: Some("abc".into()),
            request_timeout_secs: 3,
            ..FormConfig::default()
        };
        let api = HttpUserApi::from_config(&config).unwrap();
        assert_eq!(api.url("roles"), "http://10.0.0.2/api/roles");
        assert_eq!(api.auth_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_url_joining() {
        let api = HttpUserApi::new("http://localhost:8000/api/", None, Duration::from_secs(1)).unwrap();
        assert_eq!(api.url("roles"), "http://localhost:8000/api/roles");
    }
}
