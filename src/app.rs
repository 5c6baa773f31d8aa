use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::prelude::*;
use ratatui::widgets::*;
use tokio::sync::mpsc;

use crate::components::Component;
use crate::components::header::Header;
use crate::components::help::HelpOverlay;
use crate::components::home::HomePage;
use crate::components::status_bar::StatusBar;
use crate::data::DataService;
use crate::data::history::EventSync;
use crate::data::types::{HistoryRequest, TxNotice};
use crate::data::watch::BlockWatcher;
use crate::events::AppEvent;
use crate::theme::THEME;

pub struct App {
    // Components
    header: Header,
    home: HomePage,
    status_bar: StatusBar,
    help: HelpOverlay,

    // Data
    data_service: Arc<DataService>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    history_request: HistoryRequest,
    event_sync: EventSync,
    /// Latest head seen, used to tag reads.
    head: u64,
    _watcher: Option<BlockWatcher>,

    // State
    should_quit: bool,
    tick_rate: Duration,
}

impl App {
    pub fn new(
        data_service: Arc<DataService>,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        history_request: HistoryRequest,
        tick_rate_ms: u64,
    ) -> Self {
        let session = data_service.session();
        Self {
            header: Header::new(history_request.contract.clone()),
            home: HomePage::new(history_request.contract.clone(), session),
            status_bar: StatusBar::new(session),
            help: HelpOverlay::new(),
            data_service,
            event_rx,
            event_sync: EventSync::new(history_request.from_block, history_request.watch),
            history_request,
            head: 0,
            _watcher: None,
            should_quit: false,
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    pub fn set_chain_info(&mut self, name: String, symbol: String) {
        self.header.chain_name = name;
        self.header.native_symbol = symbol;
    }

    /// Keep the block watcher alive for as long as the app runs.
    pub fn set_watcher(&mut self, watcher: BlockWatcher) {
        self._watcher = Some(watcher);
    }

    pub async fn run(&mut self, mut terminal: ratatui::DefaultTerminal) -> color_eyre::Result<()> {
        self.refresh_reads();
        let from = self.event_sync.start();
        self.data_service
            .fetch_events(self.history_request.clone(), from, None);

        let mut interval = tokio::time::interval(self.tick_rate);
        let mut events = EventStream::new();

        while !self.should_quit {
            tokio::select! {
                _ = interval.tick() => {
                    terminal.draw(|frame| self.render(frame))?;
                }
                Some(Ok(event)) = events.next() => {
                    self.handle_terminal_event(event);
                }
                Some(app_event) = self.event_rx.recv() => {
                    self.handle_app_event(app_event);
                }
            }
        }

        tracing::info!("shutting down");
        Ok(())
    }

    fn refresh_reads(&self) {
        for request in self.home.read_requests(self.head) {
            self.data_service.read_contract(request);
        }
    }

    /// Ask for events in the blocks not yet requested up to `head`.
    fn sync_events(&mut self, head: u64) {
        if let Some((from, to)) = self.event_sync.next_range(head) {
            self.data_service
                .fetch_events(self.history_request.clone(), from, Some(to));
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        frame.render_widget(
            Block::default().style(Style::default().bg(THEME.bg)),
            area,
        );

        // header (1) | page (fill) | status bar (1)
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.header.render(frame, chunks[0]);
        self.home.render(frame, chunks[1]);
        self.status_bar.render(frame, chunks[2]);

        self.help.render(frame, area);
    }

    fn handle_terminal_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only handle key press events (not release/repeat) for cross-platform compat
            if key.kind != KeyEventKind::Press {
                return;
            }
            self.handle_key(key);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Help overlay consumes all keys when visible
        if self.help.handle_key(key) {
            return;
        }

        if !self.home.is_editing() {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('?') => {
                    self.help.toggle();
                    return;
                }
                _ => {}
            }
        }

        // A key press may have cleared a stale error
        self.status_bar.error_message = None;

        if let Some(event) = self.home.handle_key(key) {
            self.handle_app_event(event);
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Connected(chain_id) => {
                self.header.chain_id = chain_id;
                self.status_bar.connected = true;
            }
            AppEvent::NewBlock(number) => {
                self.head = self.head.max(number);
                self.header.latest_block = number;
                self.status_bar.latest_block = number;
                self.status_bar.connected = true;
                self.refresh_reads();
                self.sync_events(number);
            }
            AppEvent::WsConnected => {
                self.status_bar.ws_connected = true;
            }
            AppEvent::WsDisconnected => {
                self.status_bar.ws_connected = false;
            }
            AppEvent::ReadResult {
                function,
                at_block,
                value,
            } => {
                self.home.apply_read(&function, at_block, value);
            }
            AppEvent::EventsLoaded {
                records,
                through_block,
            } => {
                self.event_sync.loaded(through_block);
                let added = self.home.history.apply(records);
                if added > 0 {
                    tracing::debug!(added, through_block, "event history updated");
                }
            }
            AppEvent::EventsFailed { from, error } => {
                self.event_sync.failed(from);
                self.home.history.fail(error);
            }
            AppEvent::Submit(request) => {
                tracing::info!(
                    function = %request.function,
                    args = ?request.args,
                    value = ?request.value,
                    "submitting transaction"
                );
                self.data_service.write_contract(request);
            }
            AppEvent::WriteSubmitted { function, hash } => {
                self.status_bar.tx_notice = Some(TxNotice::Pending { function, hash });
            }
            AppEvent::WriteConfirmed {
                function,
                hash,
                success,
            } => {
                self.status_bar.tx_notice = Some(TxNotice::Confirmed {
                    function,
                    hash,
                    success,
                });
            }
            AppEvent::WriteFailed {
                function,
                context,
                error,
            } => {
                self.home.on_write_failed(&function, context, &error);
            }
            AppEvent::Error(msg) => {
                tracing::warn!("{msg}");
                self.status_bar.error_message = Some(msg);
            }
        }
    }
}
