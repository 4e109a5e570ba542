use thiserror::Error;

/// Easy alias for error handling
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can happen while sending requests. Note that a server saying
/// "no" is not an error here; see `Outcome::Rejected`.
#[derive(Debug, Error)]
pub enum Error {
    /// We couldn't parse a URL, for example if the base URL was invalid.
    #[error("URL error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// We never got a response, for example because the server was down or
    /// the network was unavailable.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
