use std::{error::Error, fmt::Display, sync::Arc};

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

use crate::{
    action::Action,
    config::{messageconfig::MessageConfig, pageconfig::PageConfig},
    notification::Notification,
    overlay::{next_ticket, OverlayGate, Ticket, Visibility},
    page::{element::ElementRef, Page},
    sortclient::{
        outcome::{SortOutcome, SortReply},
        types::PlaylistID,
        SortBackend,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickError {
    /// The element is not one of the sort buttons bound by [`SortTrigger::init`]
    NotBound(ElementRef),
    /// The button carries no usable playlist ID
    MissingPlaylistId(ElementRef),
}

impl Error for ClickError {}

impl Display for ClickError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClickError::NotBound(_) => write!(f, "not a sort button"),
            ClickError::MissingPlaylistId(_) => write!(f, "the button has no valid playlist ID"),
        }
    }
}

/// Reports the result of a request task back to the UI loop. If the task goes away before
/// reporting (panic, runtime shutting down), the ticket is returned as abandoned on drop so that
/// the overlay is never left up.
struct SettleGuard {
    ticket: Ticket,
    action_tx: UnboundedSender<Action>,
    armed: bool,
}

impl SettleGuard {
    fn new(ticket: Ticket, action_tx: UnboundedSender<Action>) -> Self {
        Self {
            ticket,
            action_tx,
            armed: true,
        }
    }

    fn settle(mut self, reply: SortReply) {
        self.armed = false;
        let _ = self.action_tx.send(Action::SortSettled {
            ticket: self.ticket,
            reply,
        });
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        if self.armed {
            let _ = self.action_tx.send(Action::SortAbandoned(self.ticket));
        }
    }
}

/// Turns clicks on sort buttons into sort requests, and request results into notifications.
///
/// All page state is touched from the owner's loop only. Request tasks report back through the
/// action channel, and the owner hands those actions to [`SortTrigger::on_action`].
pub struct SortTrigger<B: SortBackend> {
    backend: Arc<B>,
    action_tx: UnboundedSender<Action>,
    page_config: PageConfig,
    messages: MessageConfig,
    gate: OverlayGate,
    buttons: Vec<ElementRef>,
    initialized: bool,
}

impl<B: SortBackend> SortTrigger<B> {
    pub fn new(
        backend: Arc<B>,
        action_tx: UnboundedSender<Action>,
        page_config: PageConfig,
        messages: MessageConfig,
    ) -> Self {
        Self {
            backend,
            action_tx,
            page_config,
            messages,
            gate: OverlayGate::default(),
            buttons: vec![],
            initialized: false,
        }
    }

    /// Binds every sort button on the page and finds the overlay. Only the first call does
    /// anything; it returns the number of buttons bound, later calls return 0.
    pub fn init(&mut self, page: &Page) -> usize {
        if self.initialized {
            debug!("Sort buttons are already bound");
            return 0;
        }
        self.initialized = true;
        self.gate = OverlayGate::attach(page, &self.page_config.overlay_id);
        self.buttons = page.query_class(&self.page_config.sort_button_class);
        info!("Bound {} sort buttons", self.buttons.len());
        self.buttons.len()
    }

    pub fn buttons(&self) -> &[ElementRef] {
        &self.buttons
    }

    pub fn overlay(&self) -> Visibility {
        self.gate.visibility()
    }

    pub fn in_flight(&self) -> usize {
        self.gate.in_flight()
    }

    /// Shows the overlay, then sends one sort request for the button's playlist in the
    /// background. Must be called within a tokio runtime.
    pub fn click(&mut self, page: &mut Page, element: ElementRef) -> Result<Ticket, ClickError> {
        if !self.buttons.contains(&element) {
            return Err(ClickError::NotBound(element));
        }
        let Some(id) = page
            .get(element)
            .and_then(|e| e.get_attribute(&self.page_config.id_attribute))
            .and_then(PlaylistID::new)
        else {
            warn!(
                "Sort button {element:?} has no {:?} attribute",
                self.page_config.id_attribute
            );
            return Err(ClickError::MissingPlaylistId(element));
        };

        let ticket = next_ticket();
        self.gate.acquire(page, ticket);
        info!(ticket, "Sorting playlist {id}");

        let backend = self.backend.clone();
        let guard = SettleGuard::new(ticket, self.action_tx.clone());
        tokio::spawn(async move {
            let reply = match backend.sort_playlist(&id).await {
                Ok(outcome) => SortReply::Sorted(outcome),
                Err(e) => SortReply::Unreachable(e.to_string()),
            };
            guard.settle(reply);
        });
        Ok(ticket)
    }

    /// Releases the ticket, then decides what the user gets to see
    pub fn settle(&mut self, page: &mut Page, ticket: Ticket, reply: SortReply) -> Option<Notification> {
        self.gate.release(page, ticket);
        match reply {
            SortReply::Sorted(SortOutcome::Success { message }) => {
                info!(ticket, "Sort finished: {message}");
                Some(Notification::info(message))
            }
            SortReply::Sorted(SortOutcome::Failure { status, detail }) => {
                warn!(
                    ticket,
                    "Server failed to sort the playlist (status {status:?}): {}",
                    detail.as_deref().unwrap_or("no details")
                );
                Some(Notification::error(&self.messages.generic_failure))
            }
            SortReply::Unreachable(reason) => {
                error!(ticket, "Sort request failed: {reason}");
                self.transport_notification()
            }
        }
    }

    pub fn abandon(&mut self, page: &mut Page, ticket: Ticket) -> Option<Notification> {
        self.gate.release(page, ticket);
        error!(ticket, "Sort request stopped without reporting back");
        self.transport_notification()
    }

    /// Dispatches request results; every other action is ignored
    pub fn on_action(&mut self, page: &mut Page, action: Action) -> Option<Notification> {
        match action {
            Action::SortSettled { ticket, reply } => self.settle(page, ticket, reply),
            Action::SortAbandoned(ticket) => self.abandon(page, ticket),
            _ => None,
        }
    }

    fn transport_notification(&self) -> Option<Notification> {
        self.messages
            .notify_on_transport_error
            .then(|| Notification::error(&self.messages.transport_failure))
    }
}

#[cfg(test)]
pub mod tests {
    use std::{
        future::Future,
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;
    use tokio::{
        sync::mpsc::{unbounded_channel, UnboundedReceiver},
        time::sleep,
    };
    use tracing::{subscriber::with_default, Level};
    use tracing_subscriber::layer::SubscriberExt;

    use crate::{
        config::pageconfig::PlaylistEntry,
        notification::Severity,
        page::element::{Display, Element},
        sortclient::error::TransportError,
        tests::LogCapture,
    };

    use super::*;

    /// Answers based on the playlist ID:
    /// `fail` gives a failure status, `down` a transport error, `panic` kills the task,
    /// `slow-<ms>` waits before succeeding, anything else succeeds with `Sorted <id>`.
    #[derive(Default)]
    pub struct FakeBackend {
        pub calls: AtomicUsize,
    }

    impl SortBackend for FakeBackend {
        fn sort_playlist(
            &self,
            id: &PlaylistID,
        ) -> impl Future<Output = Result<SortOutcome, TransportError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let id = id.to_string();
            async move {
                if let Some(ms) = id.strip_prefix("slow-").and_then(|s| s.parse::<u64>().ok()) {
                    sleep(Duration::from_millis(ms)).await;
                }
                match id.as_str() {
                    "fail" => Ok(SortOutcome::Failure {
                        status: "error".to_string(),
                        detail: Some("Failed to clear playlist".to_string()),
                    }),
                    "down" => Err(TransportError::Status(StatusCode::BAD_GATEWAY)),
                    "panic" => panic!("Backend blew up"),
                    other => Ok(SortOutcome::Success {
                        message: format!("Sorted {other}"),
                    }),
                }
            }
        }
    }

    struct Fixture {
        trigger: SortTrigger<FakeBackend>,
        page: Page,
        backend: Arc<FakeBackend>,
        rx: UnboundedReceiver<Action>,
        overlay: ElementRef,
    }

    impl Fixture {
        fn new(ids: &[&str], messages: MessageConfig) -> Self {
            let config = PageConfig::default();
            let playlists: Vec<PlaylistEntry> =
                ids.iter().map(|id| PlaylistEntry::new(id, None)).collect();
            let page = Page::render(&config, &playlists);
            let overlay = page.get_element_by_id("overlay").unwrap();
            let backend = Arc::new(FakeBackend::default());
            let (tx, rx) = unbounded_channel();
            let mut trigger = SortTrigger::new(backend.clone(), tx, config, messages);
            trigger.init(&page);
            Self {
                trigger,
                page,
                backend,
                rx,
                overlay,
            }
        }

        fn click(&mut self, index: usize) -> Ticket {
            let button = self.trigger.buttons()[index];
            self.trigger.click(&mut self.page, button).unwrap()
        }

        /// Waits for the next request result and hands it to the trigger
        async fn pump(&mut self) -> (Option<Ticket>, Option<Notification>) {
            let action = self.rx.recv().await.expect("Action channel closed");
            let ticket = match &action {
                Action::SortSettled { ticket, .. } => Some(*ticket),
                Action::SortAbandoned(ticket) => Some(*ticket),
                _ => None,
            };
            (ticket, self.trigger.on_action(&mut self.page, action))
        }

        fn overlay_display(&self) -> Display {
            self.page.get(self.overlay).unwrap().display()
        }
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let mut f = Fixture::new(&["a", "b"], MessageConfig::default());
        assert_eq!(f.trigger.buttons().len(), 2);
        assert_eq!(f.trigger.init(&f.page), 0);
        f.page.push(
            Element::new("Late")
                .with_class("sort-btn")
                .with_attribute("data-playlist-id", "late"),
        );
        assert_eq!(f.trigger.init(&f.page), 0);
        assert_eq!(f.trigger.buttons().len(), 2);
    }

    #[tokio::test]
    async fn test_overlay_shows_before_request() {
        let mut f = Fixture::new(&["42 tracks"], MessageConfig::default());
        assert_eq!(f.overlay_display(), Display::None);

        f.click(0);
        // The request task has not run yet on this single threaded runtime
        assert_eq!(f.backend.calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.trigger.overlay(), Visibility::Visible);
        assert_eq!(f.overlay_display(), Display::Block);

        let (_, notification) = f.pump().await;
        assert_eq!(f.backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(notification, Some(Notification::info("Sorted 42 tracks")));
        assert_eq!(f.trigger.overlay(), Visibility::Hidden);
        assert_eq!(f.overlay_display(), Display::None);
    }

    #[tokio::test]
    async fn test_failure_shows_generic_message() {
        let mut f = Fixture::new(&["fail"], MessageConfig::default());
        f.click(0);
        let (_, notification) = f.pump().await;
        let notification = notification.unwrap();
        assert_eq!(notification.severity, Severity::Error);
        assert_eq!(notification.text, "Sorting failed. Sorry!");
        assert_eq!(f.overlay_display(), Display::None);
    }

    #[tokio::test]
    async fn test_transport_error() {
        let mut f = Fixture::new(&["down"], MessageConfig::default());
        f.click(0);
        let (_, notification) = f.pump().await;
        assert_eq!(
            notification,
            Some(Notification::error(
                "Could not reach the sorting server. Sorting failed."
            ))
        );
        assert_eq!(f.overlay_display(), Display::None);
    }

    #[test]
    fn test_transport_errors_are_logged() {
        let logs = LogCapture::default();
        let subscriber = tracing_subscriber::registry().with(logs.clone());
        let mut f = Fixture::new(
            &["down"],
            MessageConfig {
                notify_on_transport_error: false,
                ..MessageConfig::default()
            },
        );
        with_default(subscriber, || {
            let unreachable = SortReply::Unreachable("connection refused".to_string());
            assert_eq!(f.trigger.settle(&mut f.page, 1, unreachable), None);
            assert_eq!(f.trigger.abandon(&mut f.page, 2), None);
        });
        let errors = logs.at_level(Level::ERROR);
        assert_eq!(errors.len(), 2, "{errors:?}");
        assert_eq!(errors[0], "Sort request failed: connection refused");
        assert_eq!(errors[1], "Sort request stopped without reporting back");
        assert_eq!(f.trigger.overlay(), Visibility::Hidden);
    }

    #[tokio::test]
    async fn test_transport_error_silent() {
        let mut f = Fixture::new(
            &["down"],
            MessageConfig {
                notify_on_transport_error: false,
                ..MessageConfig::default()
            },
        );
        f.click(0);
        let (_, notification) = f.pump().await;
        assert_eq!(notification, None);
        assert_eq!(f.trigger.overlay(), Visibility::Hidden);
        assert_eq!(f.overlay_display(), Display::None);
    }

    #[tokio::test]
    async fn test_panicking_task_releases_overlay() {
        let mut f = Fixture::new(&["panic"], MessageConfig::default());
        let ticket = f.click(0);
        let (settled, notification) = f.pump().await;
        assert_eq!(settled, Some(ticket));
        assert!(notification.is_some());
        assert_eq!(f.trigger.overlay(), Visibility::Hidden);
        assert_eq!(f.overlay_display(), Display::None);
    }

    #[tokio::test]
    async fn test_double_click_sends_two_requests() {
        let mut f = Fixture::new(&["slow-10"], MessageConfig::default());
        let first = f.click(0);
        let second = f.click(0);
        assert_ne!(first, second);
        assert_eq!(f.trigger.in_flight(), 2);

        let (_, n1) = f.pump().await;
        assert_eq!(f.trigger.overlay(), Visibility::Visible);
        assert_eq!(f.overlay_display(), Display::Block);
        let (_, n2) = f.pump().await;
        assert_eq!(f.trigger.overlay(), Visibility::Hidden);
        assert_eq!(f.overlay_display(), Display::None);

        assert_eq!(f.backend.calls.load(Ordering::SeqCst), 2);
        assert_eq!(n1, Some(Notification::info("Sorted slow-10")));
        assert_eq!(n2, Some(Notification::info("Sorted slow-10")));
    }

    #[tokio::test]
    async fn test_out_of_order_completion() {
        let mut f = Fixture::new(&["slow-80", "slow-5"], MessageConfig::default());
        let slow = f.click(0);
        let fast = f.click(1);

        let (first, _) = f.pump().await;
        assert_eq!(first, Some(fast));
        // The slow request is still running, so the overlay stays
        assert_eq!(f.overlay_display(), Display::Block);

        let (second, _) = f.pump().await;
        assert_eq!(second, Some(slow));
        assert_eq!(f.overlay_display(), Display::None);
    }

    #[tokio::test]
    async fn test_rejected_clicks() {
        let config = PageConfig::default();
        let mut page = Page::render(
            &config,
            &[PlaylistEntry {
                id: None,
                name: Some("Broken".to_string()),
            }],
        );
        let stray = page.push(Element::new("Not a button"));
        let backend = Arc::new(FakeBackend::default());
        let (tx, _rx) = unbounded_channel();
        let mut trigger = SortTrigger::new(backend.clone(), tx, config, MessageConfig::default());

        let broken = page.query_class("sort-btn")[0];
        // Nothing is bound before init
        assert_eq!(
            trigger.click(&mut page, broken),
            Err(ClickError::NotBound(broken))
        );

        trigger.init(&page);
        assert_eq!(
            trigger.click(&mut page, broken),
            Err(ClickError::MissingPlaylistId(broken))
        );
        assert_eq!(
            trigger.click(&mut page, stray),
            Err(ClickError::NotBound(stray))
        );
        assert_eq!(trigger.overlay(), Visibility::Hidden);
        assert_eq!(trigger.in_flight(), 0);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_playlist_id_is_rejected() {
        let config = PageConfig::default();
        let mut page = Page::render(
            &config,
            &[
                PlaylistEntry::new("   ", Some("Blank")),
                PlaylistEntry::new("..", Some("Parent")),
            ],
        );
        let backend = Arc::new(FakeBackend::default());
        let (tx, _rx) = unbounded_channel();
        let mut trigger =
            SortTrigger::new(backend.clone(), tx, config, MessageConfig::default());
        trigger.init(&page);
        for button in trigger.buttons().to_vec() {
            assert_eq!(
                trigger.click(&mut page, button),
                Err(ClickError::MissingPlaylistId(button))
            );
        }
        assert_eq!(trigger.overlay(), Visibility::Hidden);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }
}
