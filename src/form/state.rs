//! Form state and the operator actions that mutate it.

use serde::Serialize;
use std::fmt;

use crate::reference::{Id, ReferenceDataStore};

/// Free-text fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    FirstName,
    LastName,
    MobileNo,
    Email,
}

impl TextField {
    pub const ALL: [TextField; 4] = [
        TextField::FirstName,
        TextField::LastName,
        TextField::MobileNo,
        TextField::Email,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TextField::FirstName => "first_name",
            TextField::LastName => "last_name",
            TextField::MobileNo => "mobile_no",
            TextField::Email => "email",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chosen supervisor. The display name is captured at selection time
/// because the record supplies it before the supervisor list may exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupervisorSelection {
    pub id: Id,
    pub user_name: String,
}

/// Everything the operator can change. Derived display state lives in
/// `DerivedState` and is never stored here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserFormState {
    pub first_name: String,
    pub last_name: String,
    pub mobile_no: String,
    pub email: String,
    /// Append-ordered, no duplicates.
    pub selected_role_ids: Vec<Id>,
    pub selected_sector_id: Option<Id>,
    /// Append-ordered, no duplicate ids.
    pub selected_supervisors: Vec<SupervisorSelection>,
}

/// Operator-driven mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    Edit(TextField, String),
    SelectRole(Id),
    RemoveRole(Id),
    SelectSector(Id),
    ClearSector,
    SelectSupervisor(Id),
    RemoveSupervisor(Id),
}

impl UserFormState {
    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::FirstName => &self.first_name,
            TextField::LastName => &self.last_name,
            TextField::MobileNo => &self.mobile_no,
            TextField::Email => &self.email,
        }
    }

    fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::FirstName => &mut self.first_name,
            TextField::LastName => &mut self.last_name,
            TextField::MobileNo => &mut self.mobile_no,
            TextField::Email => &mut self.email,
        }
    }

    pub fn selected_supervisor_ids(&self) -> impl Iterator<Item = &Id> + '_ {
        self.selected_supervisors.iter().map(|s| &s.id)
    }

    pub fn has_role(&self, id: &Id) -> bool {
        self.selected_role_ids.contains(id)
    }

    pub fn has_supervisor(&self, id: &Id) -> bool {
        self.selected_supervisor_ids().any(|s| s == id)
    }

    pub(crate) fn push_role(&mut self, id: Id) -> bool {
        if self.has_role(&id) {
            return false;
        }
        self.selected_role_ids.push(id);
        true
    }

    pub(crate) fn push_supervisor(&mut self, id: Id, user_name: String) -> bool {
        if self.has_supervisor(&id) {
            return false;
        }
        self.selected_supervisors.push(SupervisorSelection { id, user_name });
        true
    }

    /// Apply one action. Returns whether anything changed.
    ///
    /// Role and supervisor selections must resolve against the loaded
    /// reference lists; unresolved or repeated ids are silent no-ops.
    pub fn apply(&mut self, action: FormAction, reference: &ReferenceDataStore) -> bool {
        match action {
            FormAction::Edit(field, value) => {
                let slot = self.text_mut(field);
                if *slot == value {
                    return false;
                }
                *slot = value;
                true
            }
            FormAction::SelectRole(id) => match reference.find_role(&id) {
                Some(_) => self.push_role(id),
                None => false,
            },
            FormAction::RemoveRole(id) => {
                let before = self.selected_role_ids.len();
                self.selected_role_ids.retain(|r| *r != id);
                self.selected_role_ids.len() != before
            }
            FormAction::SelectSector(id) => {
                let next = if id.is_empty() { None } else { Some(id) };
                let changed = self.selected_sector_id != next;
                self.selected_sector_id = next;
                changed
            }
            FormAction::ClearSector => self.selected_sector_id.take().is_some(),
            FormAction::SelectSupervisor(id) => match reference.find_supervisor(&id) {
                Some(option) => {
                    let user_name = option.user_name.clone();
                    self.push_supervisor(id, user_name)
                }
                None => false,
            },
            FormAction::RemoveSupervisor(id) => {
                let before = self.selected_supervisors.len();
                self.selected_supervisors.retain(|s| s.id != id);
                self.selected_supervisors.len() != before
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{ReferenceLoad, RoleOption, SupervisorOption};

    fn reference() -> ReferenceDataStore {
        let mut store = ReferenceDataStore::new();
        store.store(ReferenceLoad::Roles(vec![
            RoleOption { id: Id::from("1"), role_name: "Admin".into(), needs_approval: false },
            RoleOption { id: Id::from("2"), role_name: "Approver".into(), needs_approval: true },
        ]));
        store.store(ReferenceLoad::Supervisors(vec![SupervisorOption {
            id: Id::from("7"),
            user_name: "grace".into(),
        }]));
        store
    }

    #[test]
    fn test_select_role_is_idempotent() {
        let refs = reference();
        let mut state = UserFormState::default();

        assert!(state.apply(FormAction::SelectRole(Id::from("2")), &refs));
        assert!(!state.apply(FormAction::SelectRole(Id::from("2")), &refs));
        assert_eq!(state.selected_role_ids, vec![Id::from("2")]);
    }

    #[test]
    fn test_select_unknown_role_is_noop() {
        let refs = reference();
        let mut state = UserFormState::default();
        assert!(!state.apply(FormAction::SelectRole(Id::from("99")), &refs));

        // Nothing resolves while the list is still pending.
        let pending = ReferenceDataStore::new();
        assert!(!state.apply(FormAction::SelectRole(Id::from("1")), &pending));
        assert!(state.selected_role_ids.is_empty());
    }

    #[test]
    fn test_remove_role() {
        let refs = reference();
        let mut state = UserFormState::default();
        state.apply(FormAction::SelectRole(Id::from("1")), &refs);
        state.apply(FormAction::SelectRole(Id::from("2")), &refs);

        assert!(state.apply(FormAction::RemoveRole(Id::from("1")), &refs));
        assert!(!state.apply(FormAction::RemoveRole(Id::from("1")), &refs));
        assert_eq!(state.selected_role_ids, vec![Id::from("2")]);
    }

    #[test]
    fn test_sector_is_single_valued() {
        let refs = reference();
        let mut state = UserFormState::default();
        state.apply(FormAction::SelectSector(Id::from("A")), &refs);
        state.apply(FormAction::SelectSector(Id::from("B")), &refs);
        assert_eq!(state.selected_sector_id, Some(Id::from("B")));

        state.apply(FormAction::SelectSector(Id::from("")), &refs);
        assert_eq!(state.selected_sector_id, None);
    }

    #[test]
    fn test_supervisor_select_captures_name() {
        let refs = reference();
        let mut state = UserFormState::default();
        assert!(state.apply(FormAction::SelectSupervisor(Id::from("7")), &refs));
        assert!(!state.apply(FormAction::SelectSupervisor(Id::from("7")), &refs));
        assert!(!state.apply(FormAction::SelectSupervisor(Id::from("8")), &refs));
        assert_eq!(state.selected_supervisors[0].user_name, "grace");

        assert!(state.apply(FormAction::RemoveSupervisor(Id::from("7")), &refs));
        assert!(state.selected_supervisors.is_empty());
    }

    #[test]
    fn test_edit_text_field() {
        let refs = reference();
        let mut state = UserFormState::default();
        assert!(state.apply(FormAction::Edit(TextField::Email, "a@b.c".into()), &refs));
        assert!(!state.apply(FormAction::Edit(TextField::Email, "a@b.c".into()), &refs));
        assert_eq!(state.text(TextField::Email), "a@b.c");
        assert_eq!(TextField::parse("mobile_no"), Some(TextField::MobileNo));
        assert_eq!(TextField::parse("nickname"), None);
    }
}
