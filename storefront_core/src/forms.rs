use crate::api::{change_password, login, register, reset_password};
use crate::controller::{FormConfig, Wording};
use crate::route::{AuthToken, Route};
use crate::schema::{FieldKind, FieldSpec, Schema, SchemaError};
use serde_json::Value;

/// Passwords are 6 to 20 characters everywhere.
const PASSWORD_LEN: (usize, usize) = (6, 20);

/// Said when a request never got an answer
const SOMETHING_WENT_WRONG: &str = "Something went wrong!";

/// Every form that asks for an email address asks the same way.
fn email() -> FieldSpec {
    FieldSpec::new("email", "Email", FieldKind::Email)
}

/// A password field with the usual bounds.
fn password(name: &str, label: &str) -> FieldSpec {
    FieldSpec::new(name, label, FieldKind::Password).length(PASSWORD_LEN.0, PASSWORD_LEN.1)
}

/// Log in with email and password.
///
/// ## Errors
///
/// Only if the schema is malformed, which would be a bug here.
pub fn login() -> Result<FormConfig, SchemaError> {
    Ok(FormConfig {
        schema: Schema::new(vec![email(), password("password", "Password")])?,
        endpoint: login::PATH,
        redirect: Route::Home,
        wording: Wording {
            title: "Welcome Back 👋",
            submit: "Login",
            submitting: "Logging in...",
            success: "Login successful!",
            failure: "Login failed!",
            unreachable: SOMETHING_WENT_WRONG,
        },
        hidden: Vec::new(),
    })
}

/// Create an account.
///
/// ## Errors
///
/// Only if the schema is malformed, which would be a bug here.
pub fn register() -> Result<FormConfig, SchemaError> {
    Ok(FormConfig {
        schema: Schema::new(vec![
            FieldSpec::new("name", "Name", FieldKind::Text).length(2, 100),
            email(),
            FieldSpec::new("phone", "Phone number", FieldKind::Text)
                .length(10, 15)
                .in_digits(),
            password("password", "Password"),
        ])?,
        endpoint: register::PATH,
        redirect: Route::Home,
        wording: Wording {
            title: "Create an Account",
            submit: "Register",
            submitting: "Registering...",
            success: "Registration successful!",
            failure: "Registration failed!",
            unreachable: "An error occurred during registration",
        },
        hidden: Vec::new(),
    })
}

/// Change a password, given the current one.
///
/// ## Errors
///
/// Only if the schema is malformed, which would be a bug here.
pub fn change_password() -> Result<FormConfig, SchemaError> {
    Ok(FormConfig {
        schema: Schema::new(vec![
            email(),
            password("password", "Password"),
            password("newPassword", "New password"),
        ])?,
        endpoint: change_password::PATH,
        redirect: Route::Home,
        wording: Wording {
            title: "Change Password 🔒",
            submit: "Change Password",
            submitting: "Changing password...",
            success: "Password changed successfully!",
            failure: "Password change failed!",
            unreachable: SOMETHING_WENT_WRONG,
        },
        hidden: Vec::new(),
    })
}

/// Set a new password using the token from a reset link. The token is sent
/// as-is (or as `null` if the link didn't have one.)
///
/// ## Errors
///
/// Only if the schema is malformed, which would be a bug here.
pub fn reset_password(token: Option<&AuthToken>) -> Result<FormConfig, SchemaError> {
    let token = token.map_or(Value::Null, |token| Value::String(token.as_str().to_owned()));

    Ok(FormConfig {
        schema: Schema::new(vec![
            email(),
            password("password", "New password"),
            password("confirmPassword", "Confirm password")
                .matches("password")
                .local_only(),
        ])?,
        endpoint: reset_password::PATH,
        redirect: Route::Login,
        wording: Wording {
            title: "Reset Password",
            submit: "Reset Password",
            submitting: "Resetting password...",
            success: "Password reset successfully!",
            failure: "Password reset failed!",
            unreachable: SOMETHING_WENT_WRONG,
        },
        hidden: Vec::new(),
    }
    .with_hidden("token", token))
}

/// The form for a route, if it has one.
///
/// ## Errors
///
/// Only if the schema is malformed, which would be a bug here.
pub fn for_route(route: &Route) -> Result<Option<FormConfig>, SchemaError> {
    match route {
        Route::Home => Ok(None),
        Route::Login => login().map(Some),
        Route::Register => register().map(Some),
        Route::ChangePassword => change_password().map(Some),
        Route::ResetPassword(token) => reset_password(token.as_ref()).map(Some),
    }
}
