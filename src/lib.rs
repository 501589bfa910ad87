//! User Edit Form
//!
//! Headless core of an administrative "edit user" form:
//! - Reference lists (roles, sectors, supervisors) loaded independently
//! - Record loading with lenient role-string parsing
//! - Dependent multi-select reconciliation (approval roles gate supervisors)
//! - Validation and single-flight submission
//! - Auto-dismissing notifications

pub mod api;
pub mod config;
pub mod console;
pub mod error;
pub mod form;
pub mod notify;
pub mod record;
pub mod reference;
pub mod telemetry;

// Re-exports for convenience
pub use api::{HttpUserApi, UserApi};
pub use config::FormConfig;
pub use error::{ApiError, LoadError, SubmitError};
pub use form::{FormAction, FormSession};
pub use notify::NotificationCenter;
