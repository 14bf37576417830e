use color_eyre::Result;
use ratatui::{layout::Rect, Frame};

pub mod alerts;
pub mod busy;
pub mod lib;
pub mod pageview;

/// Renderable trait means that the component can be drawn on the screen
pub trait Renderable {
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;
}
