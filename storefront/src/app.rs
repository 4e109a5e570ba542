/// Things that can happen to the app
mod action;
pub use action::Action;

/// Side effects the app asks for
mod effect;
pub use effect::{Effect, EffectContext};

/// A page showing one form
mod form_page;
use form_page::{FormEvent, FormPage};

/// The landing page
mod home;
use home::Home;

/// Things drawn over the page
mod popover;
use popover::Popover;

/// Short-lived notifications
mod toast;
use toast::{Tone, Toasts};

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{prelude::*, widgets::Paragraph, Frame};
use std::process::ExitCode;
use storefront_core::{
    controller::Blocked,
    forms,
    route::RouteError,
    schema::SchemaError,
    Controller, Route, SubmissionResult,
};

/// The "functional core" of the app.
#[derive(Debug)]
pub struct App {
    /// Status to display (visible at the bottom of the screen)
    status_line: Option<String>,

    /// Where we are
    location: Route,

    /// What's on screen
    page: Page,

    /// Anything drawn over the page
    popover: Option<Popover>,

    /// Notifications in the corner
    toasts: Toasts,

    /// Set once we want to quit
    exit: Option<ExitCode>,
}

/// What's on screen
#[derive(Debug)]
enum Page {
    /// The landing page
    Home(Home),

    /// One of the account forms
    Form(Box<FormPage>),
}

/// What a keypress on a page asked for
enum Intent {
    /// Nothing beyond what the page did itself
    Nothing,

    /// Go somewhere else
    Navigate(Route),

    /// Send the current form
    Submit,

    /// Open the help popover
    Help,

    /// Leave the app
    Quit,
}

impl App {
    /// Create a new instance of the app
    pub fn new() -> Self {
        Self {
            status_line: None,
            location: Route::Home,
            page: Page::Home(Home::default()),
            popover: None,
            toasts: Toasts::default(),
            exit: None,
        }
    }

    /// Open the page a link points at, if we were given one. Opening a page
    /// never needs the network, so this has no effects yet; it returns them
    /// anyway so the event loop starts every app the same way.
    pub fn init(&mut self, link: Option<&str>) -> Vec<Effect> {
        if let Some(link) = link {
            match Route::parse(link) {
                Ok(route) => self.navigate(route),
                Err(err) => self.problem(err.into()),
            }
        }

        vec![]
    }

    /// Render the app's UI to the screen
    pub fn render(&mut self, frame: &mut Frame) {
        let vertical = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]);
        let [body_area, status_area] = vertical.areas(frame.area());

        match &mut self.page {
            Page::Home(home) => home.render(body_area, frame),
            Page::Form(form) => form.render(body_area, frame),
        }

        self.toasts.render(frame, body_area);

        if let Some(popover) = &self.popover {
            popover.render(frame, body_area);
        }

        let status = Paragraph::new(format!(
            "{} · {}",
            self.location,
            match &self.status_line {
                Some(line) => line.as_str(),
                None => "Press F1 for help",
            }
        ));

        frame.render_widget(status, status_area);
    }

    /// Handle an `Action`, updating the app's state and producing some side effect(s)
    pub fn handle(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Key(key) => self.handle_key(key),

            Action::Submitted(ticket, result) => {
                let Page::Form(form) = &mut self.page else {
                    tracing::debug!(?ticket, "no form open; dropping submission result");
                    return vec![];
                };

                match form.controller.complete(ticket, result) {
                    Some(SubmissionResult::Success { redirect, message }) => {
                        self.toasts.push(Tone::Success, message, Utc::now());
                        self.navigate(redirect);
                    }
                    Some(SubmissionResult::Failure { message }) => {
                        self.status_line = None;
                        self.toasts.push(Tone::Error, message, Utc::now());
                    }
                    None => {}
                }

                vec![]
            }

            Action::Problem(problem) => {
                self.status_line = Some(problem);

                vec![]
            }

            Action::TimePassed => {
                self.toasts.expire(Utc::now());

                vec![]
            }
        }
    }

    /// Let the TUI manager know whether we're all wrapped up and can exit.
    pub fn should_exit(&self) -> Option<ExitCode> {
        self.exit
    }

    /// Work out what a keypress means for whatever's on screen.
    fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if key.kind != KeyEventKind::Press {
            return vec![];
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.exit = Some(ExitCode::SUCCESS);
            return vec![];
        }

        if self.popover.is_some() {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Enter | KeyCode::F(1) | KeyCode::Char('q' | '?')
            ) {
                self.popover = None;
            }

            return vec![];
        }

        let intent = match &mut self.page {
            Page::Home(home) => match key.code {
                KeyCode::Char('q') => Intent::Quit,
                KeyCode::Char('?') | KeyCode::F(1) => Intent::Help,
                KeyCode::Char('j') | KeyCode::Down => {
                    home.selected = home.selected.next();
                    Intent::Nothing
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    home.selected = home.selected.prev();
                    Intent::Nothing
                }
                KeyCode::Enter => Intent::Navigate(home.selected.route()),
                KeyCode::Char('l') => Intent::Navigate(Route::Login),
                KeyCode::Char('r') => Intent::Navigate(Route::Register),
                KeyCode::Char('c') => Intent::Navigate(Route::ChangePassword),
                KeyCode::Char('p') => Intent::Navigate(Route::ResetPassword(None)),
                _ => {
                    self.status_line = Some(format!("Unknown key {:?}", key.code));
                    Intent::Nothing
                }
            },
            Page::Form(form) => match key.code {
                KeyCode::F(1) => Intent::Help,
                _ => match form.handle_event(key) {
                    FormEvent::Edited => Intent::Nothing,
                    FormEvent::Submit => Intent::Submit,
                    FormEvent::Back => Intent::Navigate(Route::Home),
                },
            },
        };

        match intent {
            Intent::Nothing => vec![],
            Intent::Navigate(route) => {
                self.navigate(route);
                vec![]
            }
            Intent::Submit => self.submit(),
            Intent::Help => {
                self.popover = Some(Popover::Help);
                vec![]
            }
            Intent::Quit => {
                self.exit = Some(ExitCode::SUCCESS);
                vec![]
            }
        }
    }

    /// Try to send the current form.
    fn submit(&mut self) -> Vec<Effect> {
        let Page::Form(form) = &mut self.page else {
            return vec![];
        };

        match form.submit() {
            Ok(submission) => {
                self.status_line = Some(form.controller.submit_label().to_owned());

                vec![Effect::Submit(submission)]
            }
            Err(blocked) => {
                if let Some(notice) = blocked.notice() {
                    self.toasts.push(Tone::Error, notice.to_owned(), Utc::now());
                }

                self.status_line = Some(match blocked {
                    Blocked::Invalid(_) => "Please fix the highlighted fields".to_owned(),
                    Blocked::InFlight => form.controller.submit_label().to_owned(),
                });

                vec![]
            }
        }
    }

    /// Leave the current page for another. Anything the old page was waiting
    /// on is abandoned.
    fn navigate(&mut self, route: Route) {
        if let Page::Form(form) = &mut self.page {
            form.controller.cancel();
        }

        match forms::for_route(&route) {
            Ok(Some(config)) => {
                self.page = Page::Form(Box::new(FormPage::new(Controller::new(config))));
            }
            Ok(None) => self.page = Page::Home(Home::default()),
            Err(err) => {
                self.problem(err.into());
                return;
            }
        }

        tracing::info!(%route, "navigated");
        self.location = route;
        self.status_line = None;
    }

    /// Log a problem and show it in the status line
    fn problem(&mut self, problem: Problem) {
        tracing::error!(?problem, "problem");
        self.status_line = Some(problem.to_string());
    }
}

/// Problems the app can run into on its own (as opposed to problems talking
/// to the server, which become toasts.)
#[derive(Debug, thiserror::Error)]
pub enum Problem {
    /// We were asked to open a link that isn't one of our pages
    #[error("Could not open link: {0}")]
    Route(#[from] RouteError),

    /// A form's schema was malformed
    #[error("Could not set up the form: {0}")]
    Schema(#[from] SchemaError),
}
