//! Error taxonomy for the user edit form.
//!
//! Every failure here is recoverable: the operator retries the action that
//! triggered it. Nothing tears the session down.

use thiserror::Error;

use crate::form::ValidationErrors;
use crate::reference::ReferenceList;

/// Failures at the `UserApi` boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("could not encode {field} for the update payload: {source}")]
    Encode {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Used by in-memory implementations that have no HTTP layer.
    #[error("{0}")]
    Unavailable(String),
}

/// Load failures. Neither kind blocks the rest of the form.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load {list} reference data: {source}")]
    Reference {
        list: ReferenceList,
        #[source]
        source: ApiError,
    },

    #[error("failed to load user record {id}: {source}")]
    Record {
        id: String,
        #[source]
        source: ApiError,
    },

    #[error("no record id to load")]
    MissingRecordId,
}

/// Outcome of a submit attempt that did not end in a successful update.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(ValidationErrors),

    #[error("server rejected the update")]
    Rejected,

    #[error("update request failed: {0}")]
    Transport(#[source] ApiError),

    #[error("a submission is already in flight")]
    InFlight,

    #[error("no record id to update")]
    MissingRecordId,
}
