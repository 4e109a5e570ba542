use serde::{Deserialize, Serialize};

/// The request to set a new password using a reset token.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Req {
    /// The token from the reset link, exactly as we got it. Absent if the
    /// link didn't carry one; the server decides what that means.
    pub token: Option<String>,

    /// Email the account was registered with.
    pub email: String,

    /// The new password.
    pub password: String,
}

/// Where the reset password endpoint lives.
pub const PATH: &str = "/reset-password";
