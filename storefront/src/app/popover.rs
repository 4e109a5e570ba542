use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Style, Stylize},
    widgets::{Block, Borders, Clear, Padding, Row, Table},
    Frame,
};

/// States shown above the current page.
#[derive(Debug, PartialEq, Eq)]
pub enum Popover {
    /// Show a table of keyboard shortcuts
    Help,
}

impl Popover {
    /// Render the popover over the body
    pub fn render(&self, frame: &mut Frame<'_>, body_area: Rect) {
        match self {
            Popover::Help => {
                let popup_vert = Layout::vertical([Constraint::Percentage(50)]).flex(Flex::Center);
                let popup_horiz =
                    Layout::horizontal([Constraint::Percentage(50)]).flex(Flex::Center);

                let [popup_area] = popup_vert.areas(body_area);
                let [popup_area] = popup_horiz.areas(popup_area);

                let popup = Table::new(
                    [
                        Row::new(vec!["F1 / ? (home)", "Display this help"]),
                        Row::new(vec!["j / down (home)", "Select page below"]),
                        Row::new(vec!["k / up (home)", "Select page above"]),
                        Row::new(vec!["enter (home)", "Open selected page"]),
                        Row::new(vec!["l / r / c / p", "Login / Register / Change / Reset"]),
                        Row::new(vec!["q (home)", "Quit"]),
                        Row::new(vec!["tab / down (form)", "Next field"]),
                        Row::new(vec!["shift-tab / up (form)", "Previous field"]),
                        Row::new(vec!["enter (form)", "Submit"]),
                        Row::new(vec!["escape (form)", "Back to home"]),
                        Row::new(vec!["ctrl-c", "Quit from anywhere"]),
                    ],
                    [Constraint::Max(22), Constraint::Fill(1)],
                )
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Keyboard Shortcuts")
                        .padding(Padding::horizontal(1))
                        .border_style(Style::new().blue()),
                );

                frame.render_widget(Clear, popup_area);
                frame.render_widget(popup, popup_area);
            }
        }
    }
}
