//! Selection Reconciler
//!
//! Derives display and approval state from the raw selections plus the
//! reference lists. Derived state is always recomputed, never stored, so it
//! cannot drift from the selections it describes.
//!
//! Runs after every action and after every reference list arrives. It must
//! cope with any list still pending: until roles have loaded, approval is
//! unknown, and record-provided role ids and supervisors are left alone.
//! Once roles are loaded, role ids that match no role are dropped.

use serde::Serialize;
use tracing::debug;

use super::state::{FormAction, UserFormState};
use crate::reference::{ReferenceDataStore, ReferenceList};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DerivedState {
    /// Names of the selected roles, in reference-list order.
    pub role_labels: Vec<String>,
    /// Names of the selected supervisors, in selection order.
    pub supervisor_labels: Vec<String>,
    pub requires_supervisor_approval: bool,
    /// Set when the supervisor selection no longer has a reason to exist.
    pub clear_supervisors: bool,
    pub sector_label: Option<String>,
}

impl DerivedState {
    /// The supervisor picker is only offered while approval is required.
    pub fn show_supervisors(&self) -> bool {
        self.requires_supervisor_approval
    }
}

pub fn reconcile(state: &UserFormState, reference: &ReferenceDataStore) -> DerivedState {
    let selected: Vec<_> = reference
        .roles()
        .iter()
        .filter(|role| state.has_role(&role.id))
        .collect();

    let role_labels = selected.iter().map(|role| role.role_name.clone()).collect();
    let requires_supervisor_approval = selected.iter().any(|role| role.needs_approval);
    // A failed roles list never arrives, so only a pending one defers clearing.
    let clear_supervisors = !reference.is_pending(ReferenceList::Roles) && !requires_supervisor_approval;

    let supervisor_labels = if clear_supervisors {
        Vec::new()
    } else {
        state
            .selected_supervisors
            .iter()
            .map(|s| s.user_name.clone())
            .collect()
    };

    let sector_label = state
        .selected_sector_id
        .as_ref()
        .and_then(|id| reference.find_sector(id))
        .map(|sector| sector.sector_name.clone());

    DerivedState {
        role_labels,
        supervisor_labels,
        requires_supervisor_approval,
        clear_supervisors,
        sector_label,
    }
}

/// Reconcile and enforce the result on the state.
pub fn settle(mut state: UserFormState, reference: &ReferenceDataStore) -> (UserFormState, DerivedState) {
    if reference.is_loaded(ReferenceList::Roles) {
        let before = state.selected_role_ids.len();
        state.selected_role_ids.retain(|id| reference.find_role(id).is_some());
        let dropped = before - state.selected_role_ids.len();
        if dropped > 0 {
            debug!(dropped, "Dropping role ids with no matching role");
        }
    }

    let derived = reconcile(&state, reference);
    if derived.clear_supervisors && !state.selected_supervisors.is_empty() {
        debug!(
            cleared = state.selected_supervisors.len(),
            "No selected role needs approval, clearing supervisors"
        );
        state.selected_supervisors.clear();
    }
    (state, derived)
}

/// Pure transition: current state plus one action gives the next state and
/// its derived view.
pub fn transition(
    mut state: UserFormState,
    action: FormAction,
    reference: &ReferenceDataStore,
) -> (UserFormState, DerivedState) {
    state.apply(action, reference);
    settle(state, reference)
}
