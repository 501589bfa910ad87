//! Form Module
//!
//! The dependent multi-select state machine: operator actions, the
//! reconciler that keeps roles, supervisors and approval consistent, the
//! validator, and submission.

mod reconcile;
mod session;
mod state;
mod submit;
mod validate;

pub use reconcile::{reconcile, settle, transition, DerivedState};
pub use session::FormSession;
pub use state::{FormAction, SupervisorSelection, TextField, UserFormState};
pub use submit::{notification_for, SubmitCoordinator, REJECTED_MESSAGE, TRANSPORT_MESSAGE, UPDATED_MESSAGE};
pub use validate::{validate, Field, ValidationErrors};
