use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use storefront_core::{
    controller::{Blocked, Submission},
    schema::FieldKind,
    Controller,
};
use tui_input::{backend::crossterm::EventHandler, Input};

/// Rows each field takes up: a bordered input plus a line for its error.
const FIELD_HEIGHT: u16 = 4;

/// A page showing one form
#[derive(Debug)]
pub struct FormPage {
    /// Validation and submission
    pub controller: Controller,

    /// Text editing state for each field, in schema order
    inputs: Vec<Input>,

    /// Which field we're editing
    active: usize,
}

/// What the user asked the form to do
#[derive(Debug, PartialEq, Eq)]
pub enum FormEvent {
    /// Nothing that concerns anyone else
    Edited,

    /// Send it
    Submit,

    /// Leave this page
    Back,
}

impl FormPage {
    /// Set up an empty form
    pub fn new(controller: Controller) -> Self {
        let inputs = controller
            .fields()
            .iter()
            .map(|_| Input::default())
            .collect();

        Self {
            controller,
            inputs,
            active: 0,
        }
    }

    /// Which field has the cursor
    pub fn active_field(&self) -> Option<&str> {
        self.controller
            .fields()
            .get(self.active)
            .map(|field| field.name.as_str())
    }

    /// Try to start a submission.
    ///
    /// ## Errors
    ///
    /// Whatever blocked the submission (see `Controller::begin_submit`.)
    pub fn submit(&mut self) -> Result<Submission, Blocked> {
        self.controller.begin_submit()
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn render(&mut self, body_area: Rect, frame: &mut Frame<'_>) {
        let fields = self.controller.fields();
        let height = 2 + 1 + FIELD_HEIGHT * fields.len() as u16 + 1;

        let popup_vert = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center);
        let popup_horiz = Layout::horizontal([Constraint::Percentage(50)]).flex(Flex::Center);

        let [popup_area] = popup_vert.areas(body_area);
        let [popup_area] = popup_horiz.areas(popup_area);
        frame.render_widget(Clear, popup_area);

        let wording = &self.controller.config().wording;
        let outer = Block::default()
            .borders(Borders::ALL)
            .title(wording.title)
            .border_style(Style::default().fg(Color::Blue));
        let inner_area = outer.inner(popup_area);
        frame.render_widget(outer, popup_area);

        let width = inner_area.width.saturating_sub(2 + 1); // -2 for the border, -1 for the cursor

        let mut constraints = vec![Constraint::Length(FIELD_HEIGHT); fields.len()];
        constraints.push(Constraint::Length(1));
        let rows = Layout::vertical(constraints).split(inner_area);

        for (idx, (field, input)) in fields.iter().zip(&self.inputs).enumerate() {
            let [input_area, error_area] =
                Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(rows[idx]);

            let scroll = input.visual_scroll(width as usize);
            let shown = match field.kind {
                FieldKind::Password => "*".repeat(input.value().chars().count()),
                FieldKind::Text | FieldKind::Email => input.value().to_owned(),
            };

            let error = self.controller.errors().message(&field.name);
            let border_style = if error.is_some() {
                Style::default().fg(Color::Red)
            } else if idx == self.active {
                Style::default().fg(Color::Blue)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            frame.render_widget(
                Paragraph::new(shown).scroll((0, scroll as u16)).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(field.label.as_str())
                        .border_style(border_style),
                ),
                input_area,
            );

            if let Some(message) = error {
                frame.render_widget(Paragraph::new(message).red(), error_area);
            }

            if idx == self.active {
                frame.set_cursor_position((
                    input_area.x
                        + (input.visual_cursor().max(scroll) - scroll) as u16 // current end of text
                        + 1, // just past the end of the text
                    input_area.y + 1, // +1 row for the border/title
                ));
            }
        }

        let button_style = if self.controller.is_submitting() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().add_modifier(Modifier::BOLD).fg(Color::Blue)
        };

        if let Some(button_area) = rows.last() {
            frame.render_widget(
                Paragraph::new(Line::from(format!("[ {} ]", self.controller.submit_label())))
                    .centered()
                    .style(button_style),
                *button_area,
            );
        }
    }

    pub fn handle_event(&mut self, key: KeyEvent) -> FormEvent {
        let count = self.inputs.len().max(1);

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.active = (self.active + 1) % count;
                FormEvent::Edited
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.active = (self.active + count - 1) % count;
                FormEvent::Edited
            }
            KeyCode::Enter => FormEvent::Submit,
            KeyCode::Esc => FormEvent::Back,
            _ => {
                let Some(input) = self.inputs.get_mut(self.active) else {
                    return FormEvent::Edited;
                };

                if input.handle_event(&Event::Key(key)).is_some() {
                    let value = input.value().to_owned();

                    if let Some(name) = self.active_field().map(str::to_owned) {
                        if let Ok(binding) = self.controller.bind_field(&name) {
                            binding.set(value);
                        }
                    }
                }

                FormEvent::Edited
            }
        }
    }
}
