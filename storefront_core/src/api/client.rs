use super::error;
use super::response::Outcome;
use super::{change_password, login, register, reset_password};
use core::future::Future;
use serde::Serialize;
use serde_json::Value;
use url::Url;

/// Anything that can deliver a form submission and tell us what happened.
/// `Client` is the real one; tests use fakes.
pub trait Backend {
    /// Send `body` as JSON to `path`, returning how the server responded.
    ///
    /// ## Errors
    ///
    /// Only when there was no response to interpret (see `Client::send`.)
    fn send(&self, path: &str, body: &Value) -> impl Future<Output = error::Result<Outcome>> + Send;
}

/// Client for the backend API
#[derive(Debug, Clone)]
pub struct Client {
    /// The server to connect to. Should only be the protocol and domain, e.g.
    /// `https://backend.your-domain.com`.
    pub server: String,

    /// Shared HTTP connection pool
    http: reqwest::Client,
}

/// The typed methods (`login`, `register`, …) are for callers that build
/// requests themselves. Forms built on `Controller` go through `Backend::send`
/// with a body assembled from their schema instead.
impl Client {
    /// Construct a new client
    pub fn new(server: String) -> Self {
        Self {
            server,
            http: reqwest::Client::new(),
        }
    }

    /// Log into the server.
    ///
    /// ## Errors
    ///
    /// Errors are the same as `send`.
    pub async fn login(&self, req: &login::Req) -> error::Result<Outcome> {
        self.post(login::PATH, req).await
    }

    /// Register a new account.
    ///
    /// ## Errors
    ///
    /// Errors are the same as `send`.
    pub async fn register(&self, req: &register::Req) -> error::Result<Outcome> {
        self.post(register::PATH, req).await
    }

    /// Change a password.
    ///
    /// ## Errors
    ///
    /// Errors are the same as `send`.
    pub async fn change_password(&self, req: &change_password::Req) -> error::Result<Outcome> {
        self.post(change_password::PATH, req).await
    }

    /// Reset a password with a token.
    ///
    /// ## Errors
    ///
    /// Errors are the same as `send`.
    pub async fn reset_password(&self, req: &reset_password::Req) -> error::Result<Outcome> {
        self.post(reset_password::PATH, req).await
    }

    /// POST a JSON body and interpret whatever comes back.
    ///
    /// ## Errors
    ///
    /// - `Error::UrlParse` if the configured server isn't a valid URL
    /// - `Error::Http` if we never got a complete response (connection
    ///   refused, DNS failure, body cut off…)
    ///
    /// Any response at all, whatever its status, is an `Ok`: the body decides
    /// whether it was a success.
    #[tracing::instrument(skip(self, body))]
    async fn post<T>(&self, path: &str, body: &T) -> error::Result<Outcome>
    where
        T: Serialize + ?Sized,
    {
        let url = Url::parse(&self.server)?.join(path)?;

        let resp = self.http.post(url).json(body).send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        let outcome = Outcome::from_body(&bytes);
        tracing::debug!(%status, ?outcome, path, "got response");

        Ok(outcome)
    }
}

impl Backend for Client {
    async fn send(&self, path: &str, body: &Value) -> error::Result<Outcome> {
        self.post(path, body).await
    }
}
