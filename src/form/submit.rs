//! Submit Coordinator
//!
//! Validate, serialize, post. Invalid forms never reach the network, and
//! only one submission per coordinator may be in flight. Local state is
//! never rolled back: on failure the edits stay in the form for another try.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::reconcile::DerivedState;
use super::state::UserFormState;
use super::validate::validate;
use crate::api::{UpdatePayload, UpdateStatus, UserApi};
use crate::error::SubmitError;
use crate::notify::Notification;

pub const UPDATED_MESSAGE: &str = "User updated successfully!";
pub const REJECTED_MESSAGE: &str = "Failed to update user!";
pub const TRANSPORT_MESSAGE: &str = "Could not reach the server. Changes were not saved.";

/// Clears the in-flight flag when the submission ends, however it ends.
struct FlightGuard(Arc<AtomicBool>);

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Clone)]
pub struct SubmitCoordinator {
    api: Arc<dyn UserApi>,
    in_flight: Arc<AtomicBool>,
}

impl SubmitCoordinator {
    pub fn new(api: Arc<dyn UserApi>) -> Self {
        Self {
            api,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn take_flight(&self) -> Result<FlightGuard, SubmitError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| FlightGuard(self.in_flight.clone()))
            .map_err(|_| SubmitError::InFlight)
    }

    pub async fn submit(
        &self,
        record_id: &str,
        state: &UserFormState,
        derived: &DerivedState,
    ) -> Result<(), SubmitError> {
        let errors = validate(state, derived);
        if !errors.is_empty() {
            debug!(fields = errors.len(), "Submit blocked by validation");
            return Err(SubmitError::Invalid(errors));
        }

        if record_id.trim().is_empty() {
            warn!("Refusing to submit without a record id");
            return Err(SubmitError::MissingRecordId);
        }

        let _flight = match self.take_flight() {
            Ok(guard) => guard,
            Err(err) => {
                warn!(record = record_id, "Ignoring submit while another is in flight");
                return Err(err);
            }
        };

        let payload = UpdatePayload::from_state(state).map_err(SubmitError::Transport)?;
        let attempt = Uuid::new_v4();
        info!(%attempt, record = record_id, "Submitting user update");

        match self.api.update_record(record_id, &payload).await {
            Ok(UpdateStatus::Ok) => {
                info!(%attempt, record = record_id, "User updated");
                Ok(())
            }
            Ok(UpdateStatus::Fail) => {
                warn!(%attempt, record = record_id, "Server rejected user update");
                Err(SubmitError::Rejected)
            }
            Err(err) => {
                error!(%attempt, record = record_id, "Error submitting form: {}", err);
                Err(SubmitError::Transport(err))
            }
        }
    }
}

/// The notification a submit outcome raises, if any.
pub fn notification_for(outcome: &Result<(), SubmitError>) -> Option<Notification> {
    match outcome {
        Ok(()) => Some(Notification::success(UPDATED_MESSAGE)),
        Err(SubmitError::Rejected) => Some(Notification::error(REJECTED_MESSAGE)),
        Err(SubmitError::Transport(_)) => Some(Notification::error(TRANSPORT_MESSAGE)),
        Err(SubmitError::Invalid(_)) | Err(SubmitError::InFlight) | Err(SubmitError::MissingRecordId) => None,
    }
}
