use chrono::{DateTime, TimeDelta, Utc};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// How long a toast stays up, in seconds
const TOAST_LIFETIME_SECS: i64 = 4;

/// Toasts stack in the top right corner; past this many the oldest go.
const MAX_TOASTS: usize = 3;

/// Good news or bad news
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Something worked
    Success,

    /// Something didn't
    Error,
}

/// A short-lived notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Good or bad
    pub tone: Tone,

    /// What to say
    pub message: String,

    /// When to take it down
    expires_at: DateTime<Utc>,
}

/// The toasts currently on screen, oldest first
#[derive(Debug, Default)]
pub struct Toasts(Vec<Toast>);

impl Toasts {
    /// Put up a new toast
    pub fn push(&mut self, tone: Tone, message: String, now: DateTime<Utc>) {
        tracing::debug!(?tone, %message, "showing toast");

        self.0.push(Toast {
            tone,
            message,
            expires_at: now + TimeDelta::seconds(TOAST_LIFETIME_SECS),
        });

        if self.0.len() > MAX_TOASTS {
            self.0.remove(0);
        }
    }

    /// Take down any toasts that have been up long enough. Returns whether
    /// anything changed.
    pub fn expire(&mut self, now: DateTime<Utc>) -> bool {
        let before = self.0.len();
        self.0.retain(|toast| toast.expires_at > now);
        before != self.0.len()
    }

    /// What's up right now
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.0.iter()
    }

    /// Stack the toasts in the top right corner, newest first
    pub fn render(&self, frame: &mut Frame<'_>, body_area: Rect) {
        if self.0.is_empty() {
            return;
        }

        let column = Layout::horizontal([Constraint::Percentage(30)]).flex(Flex::End);
        let [column] = column.areas(body_area);

        let rows = Layout::vertical(vec![Constraint::Length(3); self.0.len()]).split(column);

        for (toast, area) in self.0.iter().rev().zip(rows.iter()) {
            let color = match toast.tone {
                Tone::Success => Color::Green,
                Tone::Error => Color::Red,
            };

            let width = area.width.saturating_sub(2) as usize;
            let message = if toast.message.chars().count() > width && width > 1 {
                let mut short: String = toast.message.chars().take(width - 1).collect();
                short.push('…');
                short
            } else {
                toast.message.clone()
            };

            frame.render_widget(Clear, *area);
            frame.render_widget(
                Paragraph::new(message)
                    .wrap(Wrap { trim: true })
                    .style(Style::default().fg(color))
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_style(Style::default().fg(color)),
                    ),
                *area,
            );
        }
    }
}
