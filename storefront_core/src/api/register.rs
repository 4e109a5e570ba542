use serde::{Deserialize, Serialize};

/// The request to register a new account.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Req {
    /// Display name
    pub name: String,

    /// Contact phone number, as typed
    pub phone: String,

    /// Email to use for contact and login.
    pub email: String,

    /// Plaintext password to use for login.
    pub password: String,
}

/// Where the register endpoint lives.
pub const PATH: &str = "/register";
