use color_eyre::Result;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    widgets::Clear,
    Frame,
};

use crate::components::Renderable;

/// Draws a component in a box in the middle of the given area, on top of whatever is there
pub struct Popup<T: Renderable> {
    /// Percentage of the area's width
    width: u16,
    /// Rows
    height: u16,
    comp: T,
}

impl<T: Renderable> Popup<T> {
    pub fn new(comp: T, width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            comp,
        }
    }

    pub fn inner(&self) -> &T {
        &self.comp
    }

    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.comp
    }
}

impl<T: Renderable> Renderable for Popup<T> {
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let vertical = Layout::vertical([Constraint::Length(self.height)]).flex(Flex::Center);
        let horizontal =
            Layout::horizontal([Constraint::Percentage(self.width)]).flex(Flex::Center);
        let [area] = vertical.areas(area);
        let [area] = horizontal.areas(area);
        frame.render_widget(Clear, area);
        self.comp.draw(frame, area)
    }
}
