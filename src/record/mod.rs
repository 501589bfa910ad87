//! Record Loader
//!
//! Fetches an existing user and translates it into the initial form state.
//! A failed fetch produces no state at all, so the caller's form is never
//! partially overwritten.

use regex::Regex;
use serde_json::Value;
use tracing::{info, warn};

use crate::api::{UserApi, UserRecord};
use crate::error::LoadError;
use crate::form::UserFormState;
use crate::reference::Id;

lazy_static::lazy_static! {
    static ref NOT_ROLE_CHAR: Regex = Regex::new(r"[^0-9,]").expect("static pattern");
}

/// Extract role ids from the raw `role` value of a record.
///
/// Only strings are understood: everything but digits and commas is
/// stripped, the rest is split on commas and empty segments dropped.
/// Any other JSON value yields no roles.
pub fn parse_roles(raw: &Value) -> Vec<Id> {
    match raw {
        Value::String(s) => parse_role_str(s),
        _ => Vec::new(),
    }
}

pub fn parse_role_str(raw: &str) -> Vec<Id> {
    NOT_ROLE_CHAR
        .replace_all(raw, "")
        .split(',')
        .filter(|segment| !segment.trim().is_empty())
        .map(Id::from)
        .collect()
}

/// Pure translation of a fetched record into form state.
///
/// Repeated role or supervisor ids keep their first occurrence.
pub fn snapshot(record: UserRecord) -> UserFormState {
    let mut state = UserFormState {
        first_name: record.first_name.unwrap_or_default(),
        last_name: record.last_name.unwrap_or_default(),
        mobile_no: record.mobile_no.unwrap_or_default(),
        email: record.email.unwrap_or_default(),
        selected_sector_id: record.sector_id.filter(|id| !id.is_empty()),
        ..UserFormState::default()
    };

    for id in parse_roles(&record.role) {
        state.push_role(id);
    }
    for supervisor in record.supervisors {
        state.push_supervisor(supervisor.id, supervisor.user_name);
    }

    state
}

/// Fetch record `id` and build its form state.
pub async fn load_record(api: &dyn UserApi, id: &str) -> Result<UserFormState, LoadError> {
    match api.get_record(id).await {
        Ok(record) => {
            let state = snapshot(record);
            info!(
                record = id,
                roles = state.selected_role_ids.len(),
                supervisors = state.selected_supervisors.len(),
                "User record loaded"
            );
            Ok(state)
        }
        Err(source) => {
            warn!(record = id, "Failed to fetch profile data: {}", source);
            Err(LoadError::Record { id: id.to_string(), source })
        }
    }
}
