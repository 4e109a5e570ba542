use crate::cyclic_enum;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use storefront_core::Route;

cyclic_enum!(Link, Login, Register, ChangePassword, ResetPassword);

impl Link {
    /// What to show in the menu
    fn label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Register",
            Self::ChangePassword => "Change password",
            Self::ResetPassword => "Reset password",
        }
    }

    /// Where it goes. The reset page normally gets its token from an email
    /// link; opening it from here means there isn't one.
    pub fn route(self) -> Route {
        match self {
            Self::Login => Route::Login,
            Self::Register => Route::Register,
            Self::ChangePassword => Route::ChangePassword,
            Self::ResetPassword => Route::ResetPassword(None),
        }
    }
}

/// The landing page
#[derive(Debug)]
pub struct Home {
    /// Which link is highlighted
    pub selected: Link,
}

impl Home {
    pub fn render(&self, body_area: Rect, frame: &mut Frame<'_>) {
        let popup_vert = Layout::vertical([Constraint::Length(10)]).flex(Flex::Center);
        let popup_horiz = Layout::horizontal([Constraint::Length(48)]).flex(Flex::Center);

        let [popup_area] = popup_vert.areas(body_area);
        let [popup_area] = popup_horiz.areas(popup_area);
        frame.render_widget(Clear, popup_area);

        let [title_area, tagline_area, links_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .areas(popup_area);

        frame.render_widget(
            Paragraph::new(Line::from("E-Commerce").bold()).centered(),
            title_area,
        );
        frame.render_widget(
            Paragraph::new("The best place to shop your favorite products.")
                .centered()
                .fg(Color::Gray),
            tagline_area,
        );

        let items: Vec<ListItem> = Link::ALL
            .iter()
            .map(|link| ListItem::new(link.label()))
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Blue)),
            )
            .highlight_symbol("● ")
            .highlight_style(Style::new().add_modifier(Modifier::BOLD));

        let mut state = ListState::default().with_selected(Some(self.selected.index()));
        frame.render_stateful_widget(list, links_area, &mut state);
    }
}

impl Default for Home {
    fn default() -> Self {
        Self {
            selected: Link::Login,
        }
    }
}
