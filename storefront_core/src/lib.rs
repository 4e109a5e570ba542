//! Common code for storefront clients: form schemas, validation, and talking
//! to the backend.

/// Talk to the backend.
pub mod api;

/// Validated forms that submit to the backend.
pub mod controller;
pub use controller::{Controller, FormConfig, SubmissionResult};

/// The account pages: login, registration, password change and reset.
pub mod forms;

/// Site paths, parsed from incoming links.
pub mod route;
pub use route::{AuthToken, Route};

/// Declaring fields and their rules.
pub mod schema;
pub use schema::Schema;

/// Checking field values against a schema.
pub mod validate;
pub use validate::FieldErrors;
