//! Terminal dashboard application.
//!
//! The `App` owns the terminal, the store and the feed worker. Input is
//! mapped to actions; feed actions go to the worker, everything else is
//! reduced into the store, and the worker's snapshots come back through the
//! action channel.

use crate::api::{HttpTransport, RetryPolicy, RetryingClient};
use crate::config::Config;
use crate::error::Result;
use crate::events::EventHandler;
use crate::feed::{FeedCommand, FeedLoader, FeedWorker, HttpFeedSource, SnapshotCache};
use crate::state::{Action, Store};
use crate::ui::Ui;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// The dashboard application.
pub struct App {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    store: Store,
    ui: Ui,
    event_handler: EventHandler,
    action_rx: mpsc::UnboundedReceiver<Action>,
    worker: FeedWorker,
    tick_rate: Duration,
    mouse_capture: bool,
}

impl App {
    /// Set up the terminal and start the feed worker.
    pub fn new(config: Config) -> Result<Self> {
        let transport = HttpTransport::new(config.backend.timeout())?;
        let client = RetryingClient::new(
            Arc::new(transport),
            RetryPolicy::from_config(&config.backend),
        );
        let source = HttpFeedSource::new(client, config.feed.api_url.clone());
        let cache = config
            .feed
            .cache_ttl()
            .map(|ttl| Arc::new(SnapshotCache::new(ttl)));
        let loader = FeedLoader::from_config(Arc::new(source), &config.feed, cache);

        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let worker = FeedWorker::spawn(loader, action_tx.clone());
        let store = Store::new(action_tx);

        let mouse_capture = config.ui.mouse_support;
        let terminal = init_terminal(mouse_capture)?;

        info!(api_url = %config.feed.api_url, "dashboard started");

        Ok(Self {
            terminal,
            store,
            ui: Ui::new(config.keybindings.clone(), config.ui.show_help_bar),
            event_handler: EventHandler::new(config.keybindings, config.ui.mouse_support),
            action_rx,
            worker,
            tick_rate: Duration::from_millis(config.ui.tick_rate_ms.max(10)),
            mouse_capture,
        })
    }

    /// Run until the user quits.
    pub fn run(&mut self) -> Result<()> {
        self.store.dispatch(Action::LoadFeed)?;

        while !self.store.app.should_quit {
            self.terminal
                .draw(|frame| self.ui.render(frame, &self.store))?;

            if let Some(action) = self.event_handler.next(self.tick_rate)? {
                self.handle_action(action);
            }
            while let Ok(action) = self.action_rx.try_recv() {
                self.handle_action(action);
            }
            self.store.reduce(Action::Tick);
        }

        info!("dashboard closed");
        Ok(())
    }

    fn handle_action(&mut self, action: Action) {
        if matches!(action, Action::RefreshFeed) {
            self.store.reduce(Action::ClearError);
        }
        match FeedCommand::from_action(&action) {
            Some(command) => {
                if let Err(e) = self.worker.send(command) {
                    warn!(error = %e, "feed command dropped");
                    self.store.reduce(Action::SetError(e.to_string()));
                }
            }
            None => self.store.reduce(action),
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        restore_terminal(self.terminal.backend_mut(), self.mouse_capture);
        let _ = self.terminal.show_cursor();
    }
}

/// Raw mode plus the alternate screen. Anything that fails after raw mode is
/// on puts the terminal back before returning the error.
fn init_terminal(mouse_capture: bool) -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    enter_screen(&mut stdout, mouse_capture)
        .and_then(|()| Terminal::new(CrosstermBackend::new(io::stdout())))
        .map_err(|e| {
            restore_terminal(&mut stdout, mouse_capture);
            e.into()
        })
}

fn enter_screen(out: &mut impl Write, mouse_capture: bool) -> io::Result<()> {
    execute!(out, EnterAlternateScreen)?;
    if mouse_capture {
        execute!(out, EnableMouseCapture)?;
    }
    Ok(())
}

fn restore_terminal(out: &mut impl Write, mouse_capture: bool) {
    let _ = disable_raw_mode();
    if mouse_capture {
        let _ = execute!(out, DisableMouseCapture);
    }
    let _ = execute!(out, LeaveAlternateScreen);
}
