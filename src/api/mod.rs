//! User API
//!
//! The consumed side of the form: three dropdown endpoints plus read/update
//! of a single user record. `HttpUserApi` talks to the real backend; tests
//! plug in scripted implementations of the same trait.

mod http;

pub use http::HttpUserApi;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::form::UserFormState;
use crate::reference::{Id, RoleOption, SectorOption, SupervisorOption};

/// Existing user record as returned by the backend, flattened.
///
/// Scalars are optional because the backend omits or nulls them freely.
/// `role` stays raw: it is usually a delimited string, but anything else
/// must decode to "no roles" rather than fail the load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserRecord {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub mobile_no: Option<String>,
    pub email: Option<String>,
    pub sector_id: Option<Id>,
    pub role: Value,
    pub supervisors: Vec<SupervisorOption>,
}

/// Body of the update call. Identifier lists travel as JSON-encoded strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatePayload {
    pub first_name: String,
    pub last_name: String,
    pub mobile_no: String,
    pub email: String,
    pub role: String,
    pub sector: String,
    pub supervisors: String,
}

impl UpdatePayload {
    pub fn from_state(state: &UserFormState) -> Result<Self, ApiError> {
        let role = serde_json::to_string(&state.selected_role_ids)
            .map_err(|source| ApiError::Encode { field: "role", source })?;
        let supervisors = serde_json::to_string(&state.selected_supervisor_ids().collect::<Vec<_>>())
            .map_err(|source| ApiError::Encode { field: "supervisors", source })?;

        Ok(Self {
            first_name: state.first_name.clone(),
            last_name: state.last_name.clone(),
            mobile_no: state.mobile_no.clone(),
            email: state.email.clone(),
            role,
            sector: state
                .selected_sector_id
                .as_ref()
                .map(|id| id.as_str().to_string())
                .unwrap_or_default(),
            supervisors,
        })
    }
}

/// Logical result of an update the server did answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    Ok,
    Fail,
}

impl UpdateStatus {
    /// Only an explicit `"status": "fail"` counts as failure.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(json) if json.get("status").and_then(Value::as_str) == Some("fail") => UpdateStatus::Fail,
            _ => UpdateStatus::Ok,
        }
    }
}

#[async_trait]
pub trait UserApi: Send + Sync {
    async fn fetch_roles(&self) -> Result<Vec<RoleOption>, ApiError>;

    async fn fetch_sectors(&self) -> Result<Vec<SectorOption>, ApiError>;

    async fn fetch_supervisors(&self) -> Result<Vec<SupervisorOption>, ApiError>;

    async fn get_record(&self, id: &str) -> Result<UserRecord, ApiError>;

    async fn update_record(&self, id: &str, payload: &UpdatePayload) -> Result<UpdateStatus, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_status_parsing() {
        assert_eq!(UpdateStatus::from_body(r#"{"status":"fail"}"#), UpdateStatus::Fail);
        assert_eq!(UpdateStatus::from_body(r#"{"status":"ok"}"#), UpdateStatus::Ok);
        assert_eq!(UpdateStatus::from_body(r#"{"message":"saved"}"#), UpdateStatus::Ok);
        assert_eq!(UpdateStatus::from_body("<html>saved</html>"), UpdateStatus::Ok);
        assert_eq!(UpdateStatus::from_body(""), UpdateStatus::Ok);
    }

    #[test]
    fn test_payload_encodes_id_lists_as_json_strings() {
        let mut state = UserFormState::default();
        state.first_name = "Ada".into();
        state.selected_role_ids = vec![Id::from("3"), Id::from("5")];
        state.selected_sector_id = Some(Id::from("9"));

        let payload = UpdatePayload::from_state(&state).unwrap();
        assert_eq!(payload.role, r#"["3","5"]"#);
        assert_eq!(payload.sector, "9");
        assert_eq!(payload.supervisors, "[]");
        assert_eq!(payload.first_name, "Ada");
    }

    #[test]
    fn test_payload_keeps_supervisor_order() {
        let mut state = UserFormState::default();
        state.push_supervisor(Id::from("8"), "Zed".into());
        state.push_supervisor(Id::from("2"), "Amy".into());
        let payload = UpdatePayload::from_state(&state).unwrap();
        assert_eq!(payload.supervisors, r#"["8","2"]"#);
    }
}
