//! A tiny document model: a flat list of elements that can be looked up by class or by ID. It is
//! all the sort controller needs from a page, and what the terminal interface renders.

pub mod element;

use element::{Display, Element, ElementRef};

use crate::config::pageconfig::{PageConfig, PlaylistEntry};

#[derive(Debug, Clone, Default)]
pub struct Page {
    elements: Vec<Element>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the playlist page: one sort button per playlist, in order, followed by a hidden
    /// overlay.
    pub fn render(config: &PageConfig, playlists: &[PlaylistEntry]) -> Self {
        let mut page = Self::new();
        for entry in playlists {
            let mut button = Element::new(&entry.label()).with_class(&config.sort_button_class);
            if let Some(id) = &entry.id {
                button = button.with_attribute(&config.id_attribute, id);
            }
            page.push(button);
        }
        page.push(
            Element::new(&config.overlay_label)
                .with_id(&config.overlay_id)
                .with_display(Display::None),
        );
        page
    }

    pub fn push(&mut self, element: Element) -> ElementRef {
        self.elements.push(element);
        ElementRef(self.elements.len() - 1)
    }

    pub fn get(&self, element: ElementRef) -> Option<&Element> {
        self.elements.get(element.0)
    }

    pub fn get_mut(&mut self, element: ElementRef) -> Option<&mut Element> {
        self.elements.get_mut(element.0)
    }

    /// Every element carrying the class, in document order
    pub fn query_class(&self, class: &str) -> Vec<ElementRef> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.has_class(class))
            .map(|(i, _)| ElementRef(i))
            .collect()
    }

    /// First element with the ID
    pub fn get_element_by_id(&self, id: &str) -> Option<ElementRef> {
        self.elements
            .iter()
            .position(|e| e.id() == Some(id))
            .map(ElementRef)
    }
}
