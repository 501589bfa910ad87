//! Form Session
//!
//! Owns one edit form: reference lists, form state, derived state, last
//! validation errors and the notification signal. This is the surface a
//! presentation layer binds to. All mutation happens through `&mut self`,
//! so loads and operator actions are applied one at a time even though the
//! fetches themselves run concurrently.

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::mem;
use std::sync::Arc;
use tracing::{debug, info};

use super::reconcile::{settle, transition, DerivedState};
use super::state::{FormAction, UserFormState};
use super::submit::{notification_for, SubmitCoordinator};
use super::validate::ValidationErrors;
use crate::api::UserApi;
use crate::error::{LoadError, SubmitError};
use crate::notify::NotificationCenter;
use crate::record::load_record;
use crate::reference::{fetch_list, ReferenceDataStore, ReferenceList, ReferenceLoad};

/// One completed fetch.
enum LoadEvent {
    Reference(Result<ReferenceLoad, LoadError>),
    Record(Result<UserFormState, LoadError>),
}

pub struct FormSession {
    record_id: String,
    api: Arc<dyn UserApi>,
    reference: ReferenceDataStore,
    state: UserFormState,
    derived: DerivedState,
    errors: ValidationErrors,
    submitter: SubmitCoordinator,
    notifications: NotificationCenter,
}

impl FormSession {
    pub fn new(api: Arc<dyn UserApi>, record_id: impl Into<String>, notifications: NotificationCenter) -> Self {
        Self {
            record_id: record_id.into(),
            submitter: SubmitCoordinator::new(api.clone()),
            api,
            reference: ReferenceDataStore::new(),
            state: UserFormState::default(),
            derived: DerivedState::default(),
            errors: ValidationErrors::default(),
            notifications,
        }
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn state(&self) -> &UserFormState {
        &self.state
    }

    pub fn derived(&self) -> &DerivedState {
        &self.derived
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn reference(&self) -> &ReferenceDataStore {
        &self.reference
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn submitter(&self) -> &SubmitCoordinator {
        &self.submitter
    }

    /// Start all loads at once and fold each result in as it lands.
    ///
    /// Returns every failure encountered; each was already logged and none
    /// stops the others. An empty record id skips the record fetch.
    pub async fn mount(&mut self) -> Vec<LoadError> {
        let mut pending: FuturesUnordered<BoxFuture<'static, LoadEvent>> = FuturesUnordered::new();

        for list in ReferenceList::ALL {
            let api = self.api.clone();
            pending.push(async move { LoadEvent::Reference(fetch_list(api.as_ref(), list).await) }.boxed());
        }

        if self.record_id.trim().is_empty() {
            debug!("No record id, skipping record fetch");
        } else {
            let api = self.api.clone();
            let id = self.record_id.clone();
            pending.push(async move { LoadEvent::Record(load_record(api.as_ref(), &id).await) }.boxed());
        }

        let mut failures = Vec::new();
        while let Some(event) = pending.next().await {
            let outcome = match event {
                LoadEvent::Reference(outcome) => self.apply_reference(outcome),
                LoadEvent::Record(outcome) => self.apply_record(outcome),
            };
            if let Err(err) = outcome {
                failures.push(err);
            }
        }

        info!(record = %self.record_id, failures = failures.len(), "Form mounted");
        failures
    }

    /// Store one reference outcome and re-derive, so selections that were
    /// waiting on this list resolve now.
    pub fn apply_reference(&mut self, outcome: Result<ReferenceLoad, LoadError>) -> Result<(), LoadError> {
        let stored = match outcome {
            Ok(load) => {
                self.reference.store(load);
                Ok(())
            }
            Err(err) => Err(self.reference.mark_failed(err)),
        };
        self.resettle();
        stored
    }

    /// Replace the form state with a loaded record. A failed load leaves the
    /// current state untouched.
    pub fn apply_record(&mut self, outcome: Result<UserFormState, LoadError>) -> Result<(), LoadError> {
        self.state = outcome?;
        self.errors = ValidationErrors::default();
        self.resettle();
        Ok(())
    }

    /// Fetch the record again. Local edits are replaced only on success.
    /// Without a record id there is nothing to fetch.
    pub async fn reload(&mut self) -> Result<(), LoadError> {
        if self.record_id.trim().is_empty() {
            return Err(LoadError::MissingRecordId);
        }
        let outcome = load_record(self.api.as_ref(), &self.record_id).await;
        self.apply_record(outcome)
    }

    /// Apply an operator action and re-derive.
    pub fn dispatch(&mut self, action: FormAction) -> &DerivedState {
        let (state, derived) = transition(mem::take(&mut self.state), action, &self.reference);
        self.state = state;
        self.derived = derived;
        &self.derived
    }

    /// Validate and post. Field errors are kept for display; submit results
    /// raise a notification.
    pub async fn submit(&mut self) -> Result<(), SubmitError> {
        let outcome = self.submitter.submit(&self.record_id, &self.state, &self.derived).await;

        match &outcome {
            Err(SubmitError::Invalid(errors)) => self.errors = errors.clone(),
            Err(SubmitError::InFlight) => {}
            _ => self.errors = ValidationErrors::default(),
        }
        if let Some(notification) = notification_for(&outcome) {
            self.notifications.show(notification).await;
        }

        outcome
    }

    fn resettle(&mut self) {
        let (state, derived) = settle(mem::take(&mut self.state), &self.reference);
        self.state = state;
        self.derived = derived;
    }
}
