//! A form that knows how to validate and submit itself.
//!
//! The controller never does IO on its own. `begin_submit` hands back a
//! `Submission` describing the one request to make; whoever runs it reports
//! back with `complete`. This keeps the controller usable from an event loop
//! that runs requests as background tasks, while `submit` does the whole
//! round trip in place for callers that can just `await`.

use crate::api::{self, Backend, Outcome};
use crate::route::Route;
use crate::schema::{FieldSpec, RuleKind, Schema};
use crate::validate::{self, FieldErrors, PASSWORDS_DO_NOT_MATCH};
use core::sync::atomic::{AtomicU64, Ordering};
use serde_json::{Map, Value};

/// Source of unique tickets for the whole process
static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// The words a page uses to talk about itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wording {
    /// Heading for the page
    pub title: &'static str,

    /// Label on the submit button
    pub submit: &'static str,

    /// Label on the submit button while a request is in flight
    pub submitting: &'static str,

    /// Toast for a successful submission
    pub success: &'static str,

    /// Toast when the server says no without saying why
    pub failure: &'static str,

    /// Toast when we couldn't reach the server at all
    pub unreachable: &'static str,
}

/// Everything needed to set up a form page
#[derive(Debug, Clone)]
pub struct FormConfig {
    /// The fields and their rules
    pub schema: Schema,

    /// The path to POST to
    pub endpoint: &'static str,

    /// Where to go after a successful submission
    pub redirect: Route,

    /// What to call things
    pub wording: Wording,

    /// Values sent along with the fields that the user never edits
    pub hidden: Vec<(String, Value)>,
}

impl FormConfig {
    /// Send a value the user doesn't edit alongside the fields.
    #[must_use]
    pub fn with_hidden(mut self, name: &str, value: Value) -> Self {
        self.hidden.push((name.to_owned(), value));
        self
    }
}

/// Identifies one submission. If a ticket comes back that we're not waiting
/// for (because the submission was cancelled, or already completed) the
/// result is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// Get a ticket no one else has
    fn next() -> Self {
        Self(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
    }
}

/// A request the controller wants made
#[derive(Debug, Clone)]
pub struct Submission {
    /// Hand this back to `complete` with the result
    pub ticket: Ticket,

    /// Where to send it
    pub path: &'static str,

    /// The JSON body: every sent field, plus hidden values
    pub body: Value,
}

/// What happened when we submitted the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    /// The server accepted it. Go to `redirect`.
    Success {
        /// Where to navigate
        redirect: Route,

        /// What to tell the user
        message: String,
    },

    /// It didn't work. The form stays as it was so the user can try again.
    Failure {
        /// What to tell the user
        message: String,
    },
}

/// Why a submission didn't go out
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Blocked {
    /// At least one field failed validation
    #[error("{} field(s) need attention", .0.len())]
    Invalid(FieldErrors),

    /// We're already waiting on a response
    #[error("already submitting")]
    InFlight,
}

impl Blocked {
    /// Something to say out loud about the block, beyond the inline field
    /// errors. Only mismatched confirmations get one.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Self::Invalid(errors) if errors.any(RuleKind::Matches) => Some(PASSWORDS_DO_NOT_MATCH),
            _ => None,
        }
    }
}

/// Tried to use a field the schema doesn't have
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no field named `{0}`")]
pub struct UnknownField(pub String);

/// Where the controller is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Nothing sent yet (or the last send was cancelled)
    Idle,

    /// Waiting on the server. Further submissions are blocked.
    Submitting(Ticket),

    /// The last submission finished
    Done(SubmissionResult),
}

/// A validated form, bound to one endpoint
#[derive(Debug)]
pub struct Controller {
    /// How this form is set up
    config: FormConfig,

    /// Current value of each field, in schema order
    values: Vec<String>,

    /// Fields currently failing validation
    errors: FieldErrors,

    /// Lifecycle
    status: Status,
}

/// A handle on one field of a form
#[derive(Debug)]
pub struct FieldBinding<'c> {
    /// The form the field belongs to
    controller: &'c mut Controller,

    /// Which field
    idx: usize,
}

impl FieldBinding<'_> {
    /// What the field currently holds
    pub fn value(&self) -> &str {
        self.controller.values.get(self.idx).map_or("", String::as_str)
    }

    /// Replace the field's value. Any fields already showing an error are
    /// checked again, so errors clear as soon as they're fixed.
    pub fn set(self, value: String) {
        if let Some(slot) = self.controller.values.get_mut(self.idx) {
            *slot = value;
        }

        self.controller.recheck_flagged();
    }
}

impl Controller {
    /// Set up an empty form
    pub fn new(config: FormConfig) -> Self {
        let values = vec![String::new(); config.schema.len()];

        Self {
            config,
            values,
            errors: FieldErrors::new(),
            status: Status::Idle,
        }
    }

    /// How this form is set up
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// The fields, in order
    pub fn fields(&self) -> &[FieldSpec] {
        self.config.schema.fields()
    }

    /// Get a handle to read and update a field.
    ///
    /// ## Errors
    ///
    /// `UnknownField` if the schema has no field by that name.
    pub fn bind_field(&mut self, name: &str) -> Result<FieldBinding<'_>, UnknownField> {
        let idx = self
            .config
            .schema
            .position(name)
            .ok_or_else(|| UnknownField(name.to_owned()))?;

        Ok(FieldBinding {
            controller: self,
            idx,
        })
    }

    /// Read a field's current value.
    ///
    /// ## Errors
    ///
    /// `UnknownField` if the schema has no field by that name.
    pub fn field(&self, name: &str) -> Result<&str, UnknownField> {
        self.config
            .schema
            .position(name)
            .and_then(|idx| self.values.get(idx))
            .map(String::as_str)
            .ok_or_else(|| UnknownField(name.to_owned()))
    }

    /// Check every field against its rules. Doesn't change anything; see
    /// `errors` for what's currently shown.
    pub fn validate(&self) -> FieldErrors {
        validate::validate(&self.config.schema, &self.values)
    }

    /// Fields that failed the last time they were checked
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Where we are in the lifecycle
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Are we waiting on the server?
    pub fn is_submitting(&self) -> bool {
        matches!(self.status, Status::Submitting(_))
    }

    /// What the submit button should say right now
    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting() {
            self.config.wording.submitting
        } else {
            self.config.wording.submit
        }
    }

    /// Validate and, if everything passes, prepare the one request to send.
    /// The form counts as submitting until `complete` or `cancel`.
    ///
    /// ## Errors
    ///
    /// - `Blocked::InFlight` if a submission is already outstanding
    /// - `Blocked::Invalid` if any field fails validation
    pub fn begin_submit(&mut self) -> Result<Submission, Blocked> {
        if self.is_submitting() {
            return Err(Blocked::InFlight);
        }

        self.errors = self.validate();
        if !self.errors.is_empty() {
            tracing::debug!(fields = ?self.errors.names().collect::<Vec<_>>(), "validation failed");
            return Err(Blocked::Invalid(self.errors.clone()));
        }

        let ticket = Ticket::next();
        self.status = Status::Submitting(ticket);

        tracing::info!(?ticket, path = self.config.endpoint, "submitting form");

        Ok(Submission {
            ticket,
            path: self.config.endpoint,
            body: self.body(),
        })
    }

    /// Apply the result of a submission. Returns `None` (and changes nothing)
    /// if we weren't waiting for this ticket.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: api::error::Result<Outcome>,
    ) -> Option<SubmissionResult> {
        if self.status != Status::Submitting(ticket) {
            tracing::debug!(?ticket, "ignoring result for a submission we're not waiting on");
            return None;
        }

        Some(self.finish(result))
    }

    /// Stop waiting on the outstanding submission, if any. Its result will be
    /// ignored when it arrives.
    pub fn cancel(&mut self) {
        if let Status::Submitting(ticket) = self.status {
            tracing::debug!(?ticket, "cancelling submission");
            self.status = Status::Idle;
        }
    }

    /// Validate, send, and interpret the response in one go.
    ///
    /// ## Errors
    ///
    /// Same as `begin_submit`; nothing is sent if it fails.
    pub async fn submit<B>(&mut self, backend: &B) -> Result<SubmissionResult, Blocked>
    where
        B: Backend,
    {
        let submission = self.begin_submit()?;
        let mut pending = Pending {
            controller: self,
            ticket: submission.ticket,
        };

        let result = backend.send(submission.path, &submission.body).await;

        Ok(pending.controller.finish(result))
    }

    /// Turn a response into a result and settle our status.
    fn finish(&mut self, result: api::error::Result<Outcome>) -> SubmissionResult {
        let wording = &self.config.wording;

        let outcome = match result {
            Ok(Outcome::Accepted) => SubmissionResult::Success {
                redirect: self.config.redirect.clone(),
                message: wording.success.to_owned(),
            },
            Ok(Outcome::Rejected(message)) => SubmissionResult::Failure {
                message: message.unwrap_or_else(|| wording.failure.to_owned()),
            },
            Err(err) => {
                tracing::warn!(?err, path = self.config.endpoint, "could not reach the server");

                SubmissionResult::Failure {
                    message: wording.unreachable.to_owned(),
                }
            }
        };

        self.status = Status::Done(outcome.clone());
        outcome
    }

    /// The request body for the current values
    fn body(&self) -> Value {
        let mut body = Map::new();

        for (field, value) in self.config.schema.fields().iter().zip(&self.values) {
            if field.sent {
                body.insert(field.name.clone(), Value::String(value.clone()));
            }
        }

        for (name, value) in &self.config.hidden {
            body.insert(name.clone(), value.clone());
        }

        Value::Object(body)
    }

    /// Re-check fields that are currently showing errors.
    fn recheck_flagged(&mut self) {
        let flagged: Vec<String> = self.errors.names().map(str::to_owned).collect();

        for name in flagged {
            if let Some(field) = self.config.schema.get(&name) {
                let outcome = validate::check_field(&self.config.schema, field, &self.values);
                self.errors.set(&name, outcome);
            }
        }
    }
}

/// A submission `Controller::submit` is waiting on. If the future is dropped
/// before the response arrives, the form stops waiting.
struct Pending<'c> {
    /// The form that sent it
    controller: &'c mut Controller,

    /// Which submission
    ticket: Ticket,
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if self.controller.status == Status::Submitting(self.ticket) {
            tracing::debug!(ticket = ?self.ticket, "submission dropped before it finished");
            self.controller.cancel();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::{change_password, login, register, reset_password, Client};
    use crate::forms;
    use crate::route::AuthToken;
    use core::future;
    use core::time::Duration;
    use tokio::time::timeout;
    use std::sync::Mutex;
    use tokio::net::TcpListener;

    /// A backend that records what it was sent and always gives the same
    /// answer.
    struct Recorder {
        /// Everything sent so far
        sent: Mutex<Vec<(String, Value)>>,

        /// What to answer with
        reply: Outcome,
    }

    impl Recorder {
        fn new(reply: Outcome) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                reply,
            }
        }

        fn sent(&self) -> Vec<(String, Value)> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Backend for Recorder {
        async fn send(&self, path: &str, body: &Value) -> api::error::Result<Outcome> {
            self.sent
                .lock()
                .unwrap()
                .push((path.to_string(), body.clone()));

            Ok(self.reply.clone())
        }
    }

    fn fill(controller: &mut Controller, values: &[(&str, &str)]) {
        for (name, value) in values {
            controller
                .bind_field(name)
                .unwrap()
                .set((*value).to_string());
        }
    }

    fn valid_login() -> Controller {
        let mut controller = Controller::new(forms::login().unwrap());
        fill(
            &mut controller,
            &[("email", "user@example.com"), ("password", "secret1")],
        );
        controller
    }

    #[test]
    fn binding_reads_and_writes() {
        let mut controller = Controller::new(forms::login().unwrap());

        let binding = controller.bind_field("email").unwrap();
        assert_eq!(binding.value(), "");
        binding.set("a@b.co".to_string());

        assert_eq!(controller.field("email").unwrap(), "a@b.co");
    }

    #[test]
    fn binding_unknown_field_fails() {
        let mut controller = Controller::new(forms::login().unwrap());

        assert_eq!(
            controller.bind_field("phone").unwrap_err(),
            UnknownField("phone".to_string())
        );
        assert!(controller.field("phone").is_err());
    }

    #[test]
    fn validate_has_no_side_effects() {
        let controller = Controller::new(forms::login().unwrap());

        assert_eq!(controller.validate().len(), 2);
        assert!(controller.errors().is_empty());
        assert_eq!(controller.status(), &Status::Idle);
    }

    #[test]
    fn errors_clear_once_fixed() {
        let mut controller = Controller::new(forms::login().unwrap());
        fill(&mut controller, &[("email", "nope"), ("password", "abc")]);

        assert!(controller.begin_submit().is_err());
        assert_eq!(controller.errors().len(), 2);

        fill(&mut controller, &[("password", "secret1")]);
        assert_eq!(controller.errors().names().collect::<Vec<_>>(), vec!["email"]);

        fill(&mut controller, &[("email", "still nope")]);
        assert_eq!(controller.errors().message("email"), Some("Invalid email address"));

        fill(&mut controller, &[("email", "user@example.com")]);
        assert!(controller.errors().is_empty());
    }

    #[test]
    fn untouched_fields_are_not_flagged_while_typing() {
        let mut controller = Controller::new(forms::login().unwrap());

        fill(&mut controller, &[("email", "n")]);

        assert!(controller.errors().is_empty());
    }

    #[test]
    fn fixing_password_clears_mismatch_on_confirmation() {
        let mut controller = Controller::new(forms::reset_password(None).unwrap());
        fill(
            &mut controller,
            &[
                ("email", "user@example.com"),
                ("password", "secret1"),
                ("confirmPassword", "secret2"),
            ],
        );

        assert!(controller.begin_submit().is_err());
        assert!(controller.errors().get("confirmPassword").is_some());

        fill(&mut controller, &[("password", "secret2")]);
        assert!(controller.errors().is_empty());
    }

    #[test]
    fn body_has_sent_fields_and_hidden_values() {
        let token = AuthToken::new("tok+en/==".to_string());
        let mut controller = Controller::new(forms::reset_password(Some(&token)).unwrap());
        fill(
            &mut controller,
            &[
                ("email", "user@example.com"),
                ("password", "secret1"),
                ("confirmPassword", "secret1"),
            ],
        );

        let submission = controller.begin_submit().unwrap();

        assert_eq!(submission.path, reset_password::PATH);
        assert_eq!(
            serde_json::from_value::<reset_password::Req>(submission.body.clone()).unwrap(),
            reset_password::Req {
                token: Some("tok+en/==".to_string()),
                email: "user@example.com".to_string(),
                password: "secret1".to_string(),
            }
        );
        assert!(submission.body.get("confirmPassword").is_none());
    }

    #[test]
    fn missing_token_is_sent_as_null() {
        let mut controller = Controller::new(forms::reset_password(None).unwrap());
        fill(
            &mut controller,
            &[
                ("email", "user@example.com"),
                ("password", "secret1"),
                ("confirmPassword", "secret1"),
            ],
        );

        let submission = controller.begin_submit().unwrap();

        assert_eq!(submission.body.get("token"), Some(&Value::Null));
    }

    #[test]
    fn bodies_match_endpoint_contracts() {
        let mut register = Controller::new(forms::register().unwrap());
        fill(
            &mut register,
            &[
                ("name", "Jo Doe"),
                ("phone", "+91 98765 43210"),
                ("email", "jo@example.com"),
                ("password", "secret1"),
            ],
        );
        let submission = register.begin_submit().unwrap();
        assert_eq!(submission.path, register::PATH);
        assert_eq!(
            serde_json::from_value::<register::Req>(submission.body).unwrap(),
            register::Req {
                name: "Jo Doe".to_string(),
                phone: "+91 98765 43210".to_string(),
                email: "jo@example.com".to_string(),
                password: "secret1".to_string(),
            }
        );

        let mut change = Controller::new(forms::change_password().unwrap());
        fill(
            &mut change,
            &[
                ("email", "jo@example.com"),
                ("password", "secret1"),
                ("newPassword", "secret2"),
            ],
        );
        let submission = change.begin_submit().unwrap();
        assert_eq!(submission.path, change_password::PATH);
        assert_eq!(
            serde_json::from_value::<change_password::Req>(submission.body).unwrap(),
            change_password::Req {
                email: "jo@example.com".to_string(),
                password: "secret1".to_string(),
                new_password: "secret2".to_string(),
            }
        );

        let submission = valid_login().begin_submit().unwrap();
        assert_eq!(submission.path, login::PATH);
        assert_eq!(
            serde_json::from_value::<login::Req>(submission.body).unwrap(),
            login::Req {
                email: "user@example.com".to_string(),
                password: "secret1".to_string(),
            }
        );
    }

    #[test]
    fn second_submission_is_blocked_while_in_flight() {
        let mut controller = valid_login();

        let first = controller.begin_submit().unwrap();
        assert!(controller.is_submitting());
        assert_eq!(controller.submit_label(), "Logging in...");
        assert_eq!(controller.begin_submit().unwrap_err(), Blocked::InFlight);

        controller.complete(first.ticket, Ok(Outcome::Rejected(None)));
        assert!(!controller.is_submitting());
        assert_eq!(controller.submit_label(), "Login");
        assert!(controller.begin_submit().is_ok());
    }

    #[test]
    fn result_applies_exactly_once() {
        let mut controller = valid_login();
        let submission = controller.begin_submit().unwrap();

        assert_eq!(
            controller.complete(submission.ticket, Ok(Outcome::Accepted)),
            Some(SubmissionResult::Success {
                redirect: Route::Home,
                message: "Login successful!".to_string(),
            })
        );
        assert_eq!(
            controller.complete(submission.ticket, Ok(Outcome::Accepted)),
            None
        );
    }

    #[test]
    fn cancelled_results_are_ignored() {
        let mut controller = valid_login();
        let submission = controller.begin_submit().unwrap();

        controller.cancel();

        assert_eq!(
            controller.complete(submission.ticket, Ok(Outcome::Accepted)),
            None
        );
        assert_eq!(controller.status(), &Status::Idle);
    }

    /// A backend that never answers
    struct Silent;

    impl Backend for Silent {
        async fn send(&self, _path: &str, _body: &Value) -> api::error::Result<Outcome> {
            future::pending().await
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_abandoned_submit_releases_the_form() {
        let mut controller = valid_login();

        let res = timeout(Duration::from_millis(50), controller.submit(&Silent)).await;

        assert!(res.is_err());
        assert_eq!(controller.status(), &Status::Idle);
        assert!(controller.begin_submit().is_ok());
    }

    #[test]
    fn tickets_from_other_forms_are_ignored() {
        let mut first = valid_login();
        let mut second = valid_login();

        let from_first = first.begin_submit().unwrap();
        second.begin_submit().unwrap();

        assert_eq!(second.complete(from_first.ticket, Ok(Outcome::Accepted)), None);
        assert!(second.is_submitting());
    }

    #[test]
    fn mismatch_block_has_notice() {
        let mut controller = Controller::new(forms::reset_password(None).unwrap());
        fill(
            &mut controller,
            &[
                ("email", "user@example.com"),
                ("password", "secret1"),
                ("confirmPassword", "secret9"),
            ],
        );

        let blocked = controller.begin_submit().unwrap_err();

        assert_eq!(blocked.notice(), Some("Passwords do not match"));
        assert_eq!(Blocked::InFlight.notice(), None);
    }

    #[test_log::test(tokio::test)]
    async fn test_invalid_form_never_sends() {
        let backend = Recorder::new(Outcome::Accepted);
        let mut controller = Controller::new(forms::login().unwrap());
        fill(
            &mut controller,
            &[("email", "not-an-email"), ("password", "secret1")],
        );

        let blocked = controller.submit(&backend).await.unwrap_err();

        assert!(matches!(blocked, Blocked::Invalid(ref errors) if errors.message("email").is_some()));
        assert!(backend.sent().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_mismatched_reset_never_sends() {
        let backend = Recorder::new(Outcome::Accepted);
        let mut controller = Controller::new(forms::reset_password(None).unwrap());
        fill(
            &mut controller,
            &[
                ("email", "user@example.com"),
                ("password", "secret1"),
                ("confirmPassword", "secret2"),
            ],
        );

        let blocked = controller.submit(&backend).await.unwrap_err();

        assert_eq!(blocked.notice(), Some("Passwords do not match"));
        assert!(backend.sent().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_success_sends_once_and_redirects() {
        let backend = Recorder::new(Outcome::Accepted);
        let mut controller = valid_login();

        let result = controller.submit(&backend).await.unwrap();

        assert_eq!(
            result,
            SubmissionResult::Success {
                redirect: Route::Home,
                message: "Login successful!".to_string(),
            }
        );
        assert_eq!(backend.sent().len(), 1);
        assert_eq!(controller.status(), &Status::Done(result));
    }

    #[test_log::test(tokio::test)]
    async fn test_server_message_is_shown() {
        let backend = Recorder::new(Outcome::Rejected(Some("X".to_string())));
        let mut controller = valid_login();

        let result = controller.submit(&backend).await.unwrap();

        assert_eq!(
            result,
            SubmissionResult::Failure {
                message: "X".to_string()
            }
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_rejection_without_message_uses_fallback() {
        let backend = Recorder::new(Outcome::Rejected(None));
        let mut controller = Controller::new(forms::change_password().unwrap());
        fill(
            &mut controller,
            &[
                ("email", "user@example.com"),
                ("password", "secret1"),
                ("newPassword", "secret2"),
            ],
        );

        let result = controller.submit(&backend).await.unwrap();

        assert_eq!(
            result,
            SubmissionResult::Failure {
                message: "Password change failed!".to_string()
            }
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_network_failure_is_generic_and_keeps_values() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let backend = Client::new(format!("http://{addr}"));

        let mut controller = valid_login();

        let result = controller.submit(&backend).await.unwrap();

        assert_eq!(
            result,
            SubmissionResult::Failure {
                message: "Something went wrong!".to_string()
            }
        );
        assert_eq!(controller.field("email").unwrap(), "user@example.com");
        assert_eq!(controller.field("password").unwrap(), "secret1");
        assert!(!controller.is_submitting());
    }
}
