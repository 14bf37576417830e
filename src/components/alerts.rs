use std::collections::VecDeque;

use color_eyre::Result;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Padding, Paragraph, Wrap},
    Frame,
};

use crate::{
    components::Renderable,
    notification::{Notification, Severity},
};

/// Notifications waiting to be acknowledged. The oldest one is shown and blocks the rest of the
/// interface until it is dismissed.
pub struct Alerts {
    pending: VecDeque<Notification>,
    hint: String,
}

impl Alerts {
    pub fn new(hint: String) -> Self {
        Self {
            pending: VecDeque::new(),
            hint,
        }
    }

    pub fn push(&mut self, notification: Notification) {
        self.pending.push_back(notification);
    }

    pub fn dismiss(&mut self) -> Option<Notification> {
        self.pending.pop_front()
    }

    pub fn current(&self) -> Option<&Notification> {
        self.pending.front()
    }

    pub fn is_blocking(&self) -> bool {
        !self.pending.is_empty()
    }
}

impl Renderable for Alerts {
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let Some(current) = self.current() else {
            return Ok(());
        };
        let (title, colour) = match current.severity {
            Severity::Info => ("Sorted", Style::new().green()),
            Severity::Error => ("Sort failed", Style::new().red()),
        };
        let mut footer = self.hint.clone();
        if self.pending.len() > 1 {
            footer.push_str(&format!(" ({} more)", self.pending.len() - 1));
        }
        let lines = vec![
            Line::raw(current.text.clone()),
            Line::raw(""),
            Line::styled(footer, Style::new().dark_gray()),
        ];
        frame.render_widget(
            Paragraph::new(lines)
                .block(
                    Block::bordered()
                        .title(Span::styled(
                            title,
                            Style::default().add_modifier(Modifier::BOLD),
                        ))
                        .border_style(colour)
                        .padding(Padding::horizontal(1)),
                )
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            area,
        );
        Ok(())
    }
}
