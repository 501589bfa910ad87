//! Form Validator
//!
//! Every rule is checked; all violations are reported together.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::reconcile::DerivedState;
use super::state::{TextField, UserFormState};

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FirstName,
    LastName,
    MobileNo,
    Email,
    Role,
    Sector,
    Supervisors,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::MobileNo => "mobile_no",
            Field::Email => "email",
            Field::Role => "role",
            Field::Sector => "sector",
            Field::Supervisors => "supervisors",
        }
    }
}

impl From<TextField> for Field {
    fn from(field: TextField) -> Self {
        match field {
            TextField::FirstName => Field::FirstName,
            TextField::LastName => Field::LastName,
            TextField::MobileNo => Field::MobileNo,
            TextField::Email => Field::Email,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field to message. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn insert(&mut self, field: Field, message: &str) {
        self.0.insert(field, message.to_string());
    }
}

fn required_message(field: TextField) -> &'static str {
    match field {
        TextField::FirstName => "First name is required.",
        TextField::LastName => "Last name is required.",
        TextField::MobileNo => "Mobile number is required.",
        TextField::Email => "Email is required.",
    }
}

pub fn validate(state: &UserFormState, derived: &DerivedState) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    // Presence only; no format checks on mobile number or email.
    for field in TextField::ALL {
        if state.text(field).trim().is_empty() {
            errors.insert(field.into(), required_message(field));
        }
    }

    if state.selected_role_ids.is_empty() {
        errors.insert(Field::Role, "At least select one role.");
    }

    if state.selected_sector_id.as_ref().map_or(true, |id| id.is_empty()) {
        errors.insert(Field::Sector, "Sector is required.");
    }

    if derived.requires_supervisor_approval && state.selected_supervisors.is_empty() {
        errors.insert(Field::Supervisors, "At least select one supervisor.");
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::Id;

    fn filled() -> UserFormState {
        UserFormState {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            mobile_no: "5551234".into(),
            email: "ada@example.com".into(),
            selected_role_ids: vec![Id::from("1")],
            selected_sector_id: Some(Id::from("10")),
            selected_supervisors: Vec::new(),
        }
    }

    #[test]
    fn test_empty_form_reports_all_base_fields() {
        let errors = validate(&UserFormState::default(), &DerivedState::default());
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(
            fields,
            vec![
                Field::FirstName,
                Field::LastName,
                Field::MobileNo,
                Field::Email,
                Field::Role,
                Field::Sector
            ]
        );
        assert!(!errors.contains(Field::Supervisors));
    }

    #[test]
    fn test_whitespace_is_blank() {
        let mut state = filled();
        state.first_name = "   ".into();
        state.email = "\t".into();
        let errors = validate(&state, &DerivedState::default());
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(Field::FirstName), Some("First name is required."));
        assert!(errors.contains(Field::Email));
    }

    #[test]
    fn test_supervisor_required_with_approval() {
        let mut state = filled();
        let derived = DerivedState { requires_supervisor_approval: true, ..Default::default() };

        let errors = validate(&state, &derived);
        assert_eq!(errors.get(Field::Supervisors), Some("At least select one supervisor."));

        state.push_supervisor(Id::from("7"), "grace".into());
        assert!(validate(&state, &derived).is_empty());
    }

    #[test]
    fn test_filled_form_is_valid() {
        assert!(validate(&filled(), &DerivedState::default()).is_empty());
    }

    #[test]
    fn test_errors_serialize_by_field_name() {
        let derived = DerivedState { requires_supervisor_approval: true, ..Default::default() };
        let errors = validate(&filled(), &derived);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["supervisors"], "At least select one supervisor.");
    }
}
