use color_eyre::Result;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Padding, Paragraph, Wrap},
    Frame,
};

use crate::components::Renderable;

/// Contents of the overlay shown while sort requests are running
pub struct Busy {
    label: String,
    in_flight: usize,
}

impl Busy {
    pub fn new(label: String) -> Self {
        Self {
            label,
            in_flight: 0,
        }
    }

    pub fn set_label(&mut self, label: &str) {
        if self.label != label {
            self.label = label.to_string();
        }
    }

    pub fn set_in_flight(&mut self, in_flight: usize) {
        self.in_flight = in_flight;
    }
}

impl Renderable for Busy {
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let mut lines = vec![Line::raw(self.label.clone())];
        if self.in_flight > 1 {
            lines.push(Line::styled(
                format!("{} playlists in progress", self.in_flight),
                Style::new().dark_gray(),
            ));
        }
        let title = Span::styled("Please wait", Style::default().add_modifier(Modifier::BOLD));
        frame.render_widget(
            Paragraph::new(lines)
                .block(
                    Block::bordered()
                        .title(title)
                        .border_style(Style::new().yellow())
                        .padding(Padding::horizontal(1)),
                )
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            area,
        );
        Ok(())
    }
}
