use color_eyre::Result;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, List, ListState, Paragraph},
    Frame,
};

use crate::page::{element::ElementRef, Page};

/// List of the sort buttons on the page, one of which is selected
pub struct PageView {
    buttons: Vec<ElementRef>,
    id_attribute: String,
    state: ListState,
}

impl PageView {
    pub fn new(buttons: Vec<ElementRef>, id_attribute: String) -> Self {
        let mut state = ListState::default();
        if !buttons.is_empty() {
            state.select_first();
        }
        Self {
            buttons,
            id_attribute,
            state,
        }
    }

    pub fn selected(&self) -> Option<ElementRef> {
        self.state
            .selected()
            .and_then(|pos| self.buttons.get(pos).copied())
    }

    pub fn up(&mut self) {
        self.state.select_previous();
    }

    pub fn down(&mut self) {
        // ListState only clamps the selection while rendering
        if let Some(pos) = self.state.selected() {
            if pos + 1 < self.buttons.len() {
                self.state.select(Some(pos + 1));
            }
        }
    }

    pub fn top(&mut self) {
        if !self.buttons.is_empty() {
            self.state.select(Some(0));
        }
    }

    pub fn bottom(&mut self) {
        if !self.buttons.is_empty() {
            self.state.select(Some(self.buttons.len() - 1));
        }
    }

    fn gen_items(&self, page: &Page) -> Vec<Line<'static>> {
        self.buttons
            .iter()
            .filter_map(|b| page.get(*b))
            .map(|el| {
                let id = match el.get_attribute(&self.id_attribute) {
                    Some(id) => Span::styled(format!("  {id}"), Style::new().dark_gray()),
                    None => Span::styled("  (no playlist ID)", Style::new().red()),
                };
                Line::from(vec![Span::raw(el.label().to_string()), id])
            })
            .collect()
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect, page: &Page) -> Result<()> {
        let title = Span::styled(
            "Playlists",
            Style::default().add_modifier(Modifier::BOLD),
        );
        let block = Block::bordered().title(title);
        if self.buttons.is_empty() {
            frame.render_widget(
                Paragraph::new(vec![
                    Line::raw("No playlists configured."),
                    Line::raw("Add some under `page.playlists` in the config, or pass --playlist."),
                ])
                .centered()
                .block(block),
                area,
            );
            return Ok(());
        }
        let list = List::new(self.gen_items(page))
            .block(block)
            .highlight_style(Style::new().reversed())
            .highlight_symbol(">");
        frame.render_stateful_widget(list, area, &mut self.state);
        Ok(())
    }
}
