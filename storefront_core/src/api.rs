/// Things that can go wrong talking to the backend
pub mod error;
pub use error::Error;

/// The shape of every response, and how we read it
pub mod response;
pub use response::Outcome;

/// Client for the backend
pub mod client;
pub use client::{Backend, Client};

/// Log in to an existing account
pub mod login;

/// Create a new account
pub mod register;

/// Change a password, knowing the old one
pub mod change_password;

/// Reset a password with a token from an email link
pub mod reset_password;

/// Where the backend lives unless configured otherwise
pub const DEFAULT_SERVER: &str = "https://backend-e-comerce-project.vercel.app";
