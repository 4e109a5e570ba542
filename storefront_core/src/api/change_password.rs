use serde::{Deserialize, Serialize};

/// The request to swap a known password for a new one.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Req {
    /// Email the account was registered with.
    pub email: String,

    /// The current password.
    pub password: String,

    /// What the password should be from now on.
    pub new_password: String,
}

/// Where the change password endpoint lives.
pub const PATH: &str = "/change-password";
