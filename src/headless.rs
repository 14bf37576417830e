use std::sync::Arc;

use color_eyre::{eyre::eyre, Result};
use tokio::sync::mpsc::{self};
use tracing::{info, warn};

use crate::{
    action::Action,
    config::{pageconfig::PlaylistEntry, Config},
    notification::Notification,
    overlay::Visibility,
    page::Page,
    sortclient::{
        outcome::{SortOutcome, SortReply},
        HttpSortClient, SortBackend,
    },
    trigger::SortTrigger,
};

/// What happened to a batch of sort requests
#[derive(Debug, Default)]
pub struct Report {
    /// In the order the results arrived
    pub notifications: Vec<Notification>,
    pub failed: usize,
}

/// Drives a [`SortTrigger`] without a terminal: one button per playlist ID, every button clicked
/// once.
pub struct Headless<B: SortBackend> {
    page: Page,
    trigger: SortTrigger<B>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl<B: SortBackend> Headless<B> {
    pub fn new(config: &Config, backend: Arc<B>, ids: &[String]) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let playlists: Vec<PlaylistEntry> =
            ids.iter().map(|id| PlaylistEntry::new(id, None)).collect();
        let page = Page::render(&config.page, &playlists);
        let mut trigger = SortTrigger::new(
            backend,
            action_tx,
            config.page.clone(),
            config.messages.clone(),
        );
        trigger.init(&page);
        Self {
            page,
            trigger,
            action_rx,
        }
    }

    pub fn overlay(&self) -> Visibility {
        self.trigger.overlay()
    }

    /// Sends every request at once, then waits for all of them to settle
    pub async fn run(&mut self) -> Report {
        let mut report = Report::default();
        for button in self.trigger.buttons().to_vec() {
            if let Err(e) = self.trigger.click(&mut self.page, button) {
                warn!("Skipping button {button:?}: {e}");
                report.failed += 1;
                report
                    .notifications
                    .push(Notification::error(format!("Cannot sort: {e}")));
            }
        }

        while self.trigger.in_flight() > 0 {
            // The trigger holds a sender, so this only ends once every ticket is back
            let Some(action) = self.action_rx.recv().await else {
                break;
            };
            if matches!(
                action,
                Action::SortAbandoned(_)
                    | Action::SortSettled {
                        reply: SortReply::Unreachable(_)
                            | SortReply::Sorted(SortOutcome::Failure { .. }),
                        ..
                    }
            ) {
                report.failed += 1;
            }
            if let Some(notification) = self.trigger.on_action(&mut self.page, action) {
                report.notifications.push(notification);
            }
        }
        report
    }
}

/// Sorts the given playlists against the configured server and prints one line per result
pub async fn run(config: Config, ids: Vec<String>) -> Result<()> {
    let backend = Arc::new(HttpSortClient::new(&config.server)?);
    info!("Sorting {} playlists via {}", ids.len(), config.server.url);
    let report = Headless::new(&config, backend, &ids).run().await;
    for notification in &report.notifications {
        println!("{notification}");
    }
    if report.failed > 0 {
        return Err(eyre!("{} of {} playlists failed to sort", report.failed, ids.len()));
    }
    Ok(())
}
