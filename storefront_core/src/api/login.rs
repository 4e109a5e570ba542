use serde::{Deserialize, Serialize};

/// The request to log into the server.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Req {
    /// Email the account was registered with.
    pub email: String,

    /// Plaintext password to use for login.
    pub password: String,
}

/// Where the login endpoint lives.
pub const PATH: &str = "/login";
