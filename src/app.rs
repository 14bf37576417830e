use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Stylize,
    widgets::Paragraph,
    Frame,
};
use tokio::sync::mpsc::{self};
use tracing::{debug, info, warn};

use crate::{
    action::Action,
    components::{alerts::Alerts, busy::Busy, lib::popup::Popup, pageview::PageView, Renderable},
    config::Config,
    notification::Notification,
    page::{element::Display, Page},
    sortclient::{HttpSortClient, SortBackend},
    trace_dbg,
    trigger::{ClickError, SortTrigger},
    tui::{Event, Tui},
};

pub struct App<B: SortBackend = HttpSortClient> {
    config: Config,
    tick_rate: f64,
    frame_rate: f64,
    page: Page,
    trigger: SortTrigger<B>,
    view: PageView,
    busy: Popup<Busy>,
    alerts: Popup<Alerts>,
    footer: String,
    should_quit: bool,
    should_suspend: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl<B: SortBackend> App<B> {
    pub fn new(config: Config, backend: Arc<B>, tick_rate: f64, frame_rate: f64) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let page = Page::render(&config.page, &config.page.playlists);
        let mut trigger = SortTrigger::new(
            backend,
            action_tx.clone(),
            config.page.clone(),
            config.messages.clone(),
        );
        trigger.init(&page);
        let view = PageView::new(trigger.buttons().to_vec(), config.page.id_attribute.clone());

        let key = |action: Action| {
            config
                .keybindings
                .find_key_str(&action)
                .unwrap_or_else(|| "(unbound)".to_string())
        };
        let hint = format!("Press {} to close", key(Action::Click));
        let footer = format!(
            "{} sort  {}/{} move  {} quit",
            key(Action::Click),
            key(Action::Up),
            key(Action::Down),
            key(Action::Quit)
        );
        let busy = Busy::new(config.page.overlay_label.clone());

        Self {
            tick_rate,
            frame_rate,
            page,
            trigger,
            view,
            busy: Popup::new(busy, 50, 5),
            alerts: Popup::new(Alerts::new(hint), 60, 7),
            footer,
            should_quit: false,
            should_suspend: false,
            action_tx,
            action_rx,
            config,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        trace_dbg!("Starting the interface...");
        let mut tui = Tui::new()?
            .tick_rate(self.tick_rate)
            .frame_rate(self.frame_rate);
        tui.enter()?;

        let action_tx = self.action_tx.clone();
        loop {
            self.handle_events(&mut tui).await?;
            self.handle_actions(&mut tui)?;
            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(Action::Resume)?;
                action_tx.send(Action::ClearScreen)?;
                tui.resume()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }

    async fn handle_events(&mut self, tui: &mut Tui) -> Result<()> {
        let Some(event) = tui.next_event().await else {
            return Ok(());
        };
        let action_tx = self.action_tx.clone();
        match event {
            Event::Tick => action_tx.send(Action::Tick)?,
            Event::Render => action_tx.send(Action::Render)?,
            Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
            Event::Key(key) => self.handle_key_event(key)?,
            _ => {}
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if let Some(action) = self.config.keybindings.action_for(&key) {
            info!("Got action: {action:?}");
            self.action_tx.send(action.clone())?;
        }
        Ok(())
    }

    fn handle_actions(&mut self, tui: &mut Tui) -> Result<()> {
        while let Ok(action) = self.action_rx.try_recv() {
            if action != Action::Tick && action != Action::Render {
                debug!("{action:?}");
            };

            match action {
                Action::ClearScreen => tui.terminal.clear()?,
                Action::Resize(w, h) => self.handle_resize(tui, w, h)?,
                Action::Render => self.render(tui)?,
                action => {
                    if let Some(ret) = self.update(action)? {
                        debug!("Got {ret:?} as a response");
                        self.action_tx.send(ret)?
                    }
                }
            };
        }
        Ok(())
    }

    /// Applies everything that does not need the terminal
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let blocked = self.alerts.inner().is_blocking();
        match action {
            Action::Quit => self.should_quit = true,
            Action::Suspend => self.should_suspend = true,
            Action::Resume => self.should_suspend = false,
            Action::Error(msg) => self.alerts.inner_mut().push(Notification::error(msg)),
            Action::Click | Action::Dismiss if blocked => {
                self.alerts.inner_mut().dismiss();
            }
            Action::Up | Action::Down | Action::Top | Action::Bottom if blocked => {}
            Action::Up => self.view.up(),
            Action::Down => self.view.down(),
            Action::Top => self.view.top(),
            Action::Bottom => self.view.bottom(),
            Action::Click => self.click_selected(),
            action @ (Action::SortSettled { .. } | Action::SortAbandoned(_)) => {
                if let Some(notification) = self.trigger.on_action(&mut self.page, action) {
                    self.alerts.inner_mut().push(notification);
                }
            }
            _ => {}
        };
        Ok(None)
    }

    fn click_selected(&mut self) {
        let Some(button) = self.view.selected() else {
            return;
        };
        if let Err(e) = self.trigger.click(&mut self.page, button) {
            warn!("Ignoring click: {e}");
            let label = self.page.get(button).map(|b| b.label()).unwrap_or_default();
            let text = match e {
                ClickError::MissingPlaylistId(_) => format!("Cannot sort {label:?}: {e}"),
                ClickError::NotBound(_) => format!("{label:?} is {e}"),
            };
            self.alerts.inner_mut().push(Notification::error(text));
        }
    }

    fn handle_resize(&mut self, tui: &mut Tui, w: u16, h: u16) -> Result<()> {
        tui.resize(Rect::new(0, 0, w, h))?;
        self.render(tui)?;
        Ok(())
    }

    /// Label of the overlay element, if the page currently shows it
    fn overlay_label(&self) -> Option<&str> {
        self.page
            .get_element_by_id(&self.config.page.overlay_id)
            .and_then(|o| self.page.get(o))
            .filter(|o| o.display() == Display::Block)
            .map(|o| o.label())
    }

    fn render(&mut self, tui: &mut Tui) -> Result<()> {
        if let Some(label) = self.overlay_label().map(str::to_string) {
            let busy = self.busy.inner_mut();
            busy.set_label(&label);
            busy.set_in_flight(self.trigger.in_flight());
        }
        let show_busy = self.overlay_label().is_some();
        tui.draw(|frame| {
            if let Err(err) = self.draw(frame, show_busy) {
                let _ = self
                    .action_tx
                    .send(Action::Error(format!("Failed to draw: {:?}", err)));
            }
        })?;
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame, show_busy: bool) -> Result<()> {
        let area = frame.area();
        let [main, footer] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);
        self.view.draw(frame, main, &self.page)?;
        frame.render_widget(Paragraph::new(self.footer.as_str()).dark_gray(), footer);
        if show_busy {
            self.busy.draw(frame, area)?;
        }
        if self.alerts.inner().is_blocking() {
            self.alerts.draw(frame, area)?;
        }
        Ok(())
    }
}
