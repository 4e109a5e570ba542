use crossterm::event::KeyEvent;
use storefront_core::api::{error, Outcome};
use storefront_core::controller::Ticket;

/// Things that can happen to this app
#[derive(Debug)]
pub enum Action {
    /// The user did something on the keyboard
    Key(KeyEvent),

    /// A form submission came back (or failed to reach the server)
    Submitted(Ticket, error::Result<Outcome>),

    /// Something bad happened; display it to the user
    Problem(String),

    /// Some amount of time passed and we should do clock things
    TimePassed,
}
