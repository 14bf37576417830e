use std::{
    collections::BTreeSet,
    sync::atomic::{AtomicUsize, Ordering},
};

use tracing::{debug, warn};

use crate::page::{
    element::{Display, ElementRef},
    Page,
};

/// Identifies one in-flight sort request
pub type Ticket = usize;

static COUNTER: AtomicUsize = AtomicUsize::new(1);

/// Returns a unique ticket number
pub fn next_ticket() -> Ticket {
    COUNTER.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Shows the overlay while at least one request is in flight. Each request holds a ticket; the
/// overlay is hidden only once the last ticket is released, so overlapping requests do not hide
/// it early.
#[derive(Debug, Default)]
pub struct OverlayGate {
    target: Option<ElementRef>,
    in_flight: BTreeSet<Ticket>,
}

impl OverlayGate {
    /// Looks up the overlay element. The gate still counts requests without one, it just has
    /// nothing to show.
    pub fn attach(page: &Page, overlay_id: &str) -> Self {
        let target = page.get_element_by_id(overlay_id);
        if target.is_none() {
            warn!("No element with ID {overlay_id:?} found; sorting will run without an overlay");
        }
        Self {
            target,
            in_flight: BTreeSet::new(),
        }
    }

    pub fn acquire(&mut self, page: &mut Page, ticket: Ticket) -> Visibility {
        if !self.in_flight.insert(ticket) {
            warn!("Ticket {ticket} acquired the overlay twice");
        }
        self.apply(page)
    }

    /// Releasing an unknown ticket does nothing
    pub fn release(&mut self, page: &mut Page, ticket: Ticket) -> Visibility {
        if !self.in_flight.remove(&ticket) {
            debug!("Ticket {ticket} released, but it was not holding the overlay");
        }
        self.apply(page)
    }

    pub fn visibility(&self) -> Visibility {
        if self.in_flight.is_empty() {
            Visibility::Hidden
        } else {
            Visibility::Visible
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    fn apply(&self, page: &mut Page) -> Visibility {
        let visibility = self.visibility();
        if let Some(el) = self.target.and_then(|t| page.get_mut(t)) {
            el.set_display(match visibility {
                Visibility::Visible => Display::Block,
                Visibility::Hidden => Display::None,
            });
        }
        visibility
    }
}
