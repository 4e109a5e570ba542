use super::Action;
use storefront_core::{
    api::{Backend, Client},
    controller::Submission,
};

/// Connections to external services that effects use. We keep these around
/// to share connections across the app as a whole.
pub struct EffectContext {
    /// Client for the backend
    client: Client,
}

impl EffectContext {
    /// Get a new `EffectContext` talking to `server`
    pub fn new(server: String) -> Self {
        Self {
            client: Client::new(server),
        }
    }
}

/// Things that can happen as a result of user input. Side effects!
#[derive(Debug)]
pub enum Effect {
    /// Send a form to the backend
    Submit(Submission),
}

impl Effect {
    /// Perform the side-effectful portions of this effect, returning the next
    /// `Action` the application needs to handle
    pub async fn run(self, conn: &EffectContext) -> Option<Action> {
        match self {
            Self::Submit(submission) => {
                tracing::info!(ticket = ?submission.ticket, path = submission.path, "sending form");

                let result = conn
                    .client
                    .send(submission.path, &submission.body)
                    .await;

                if let Err(problem) = &result {
                    tracing::error!(?problem, "problem sending form");
                }

                Some(Action::Submitted(submission.ticket, result))
            }
        }
    }
}
