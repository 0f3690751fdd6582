//! Ticker typeahead engine.
//!
//! [`SearchForm`] owns all state of one search box. It is a plain state machine driven by
//! [`FormEvent`]s; timers and index fetches run as spawned tasks that only ever post events
//! back onto the form's channel, so every mutation happens inside [`SearchForm::dispatch`]
//! on a single task.

pub mod debounce;
pub mod dismiss;
pub mod document;
pub mod guard;
pub mod navigator;
pub mod position;
pub mod ranker;
pub mod view;

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::core::config::TypeaheadConfig;
use crate::core::types::{ExchangeScope, SearchCommit, TickerItem};
use crate::fetch::{self, TickerSource};
use crate::tickers::TickerIndex;

use self::debounce::DebounceScheduler;
use self::document::{DocumentEvent, DocumentEvents, FormHost, Subscription};
use self::guard::SelectionGuard;
use self::navigator::{KeyboardNavigator, NavAction, NavKey};
use self::position::{DropdownPosition, PositionTracker};

#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    /// The input's text changed.
    Input(String),
    Key(NavKey),
    /// The search button was pressed.
    Submit,
    SuggestionHovered(usize),
    /// Pointer-down on a suggestion row.
    SuggestionPressed(usize),
    ExchangeChanged(ExchangeScope),
    Document(DocumentEvent),
    DebounceElapsed(u64),
    SuppressionElapsed(u64),
    IndexLoaded {
        request: u64,
        exchange: ExchangeScope,
        items: Vec<TickerItem>,
    },
    Unmount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Waiting for the debounce to fire.
    Typing,
    Open,
    /// A selection just committed; debounce firings are ignored.
    Suppressed,
}

/// What the user typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    raw: String,
    /// Set by keystrokes, cleared when a commit writes the selected symbol back.
    typed: bool,
}

impl QueryState {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn normalized(&self) -> String {
        ranker::normalize(&self.raw)
    }

    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }

    pub fn is_typed(&self) -> bool {
        self.typed
    }

    fn set(&mut self, raw: String, typed: bool) {
        self.raw = raw;
        self.typed = typed;
    }

    fn clear(&mut self) {
        self.raw.clear();
        self.typed = false;
    }
}

/// Sends events to a mounted form.
#[derive(Debug, Clone)]
pub struct FormHandle {
    tx: mpsc::UnboundedSender<FormEvent>,
}

impl FormHandle {
    /// Returns `false` once the form is gone.
    pub fn send(&self, event: FormEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn input(&self, text: impl Into<String>) -> bool {
        self.send(FormEvent::Input(text.into()))
    }

    pub fn key(&self, key: NavKey) -> bool {
        self.send(FormEvent::Key(key))
    }

    pub fn change_exchange(&self, exchange: ExchangeScope) -> bool {
        self.send(FormEvent::ExchangeChanged(exchange))
    }

    pub fn unmount(&self) -> bool {
        self.send(FormEvent::Unmount)
    }
}

pub struct SearchForm {
    config: TypeaheadConfig,
    exchange: ExchangeScope,
    index: TickerIndex,
    query: QueryState,
    suggestions: Vec<TickerItem>,
    navigator: KeyboardNavigator,
    debounce: DebounceScheduler,
    guard: SelectionGuard,
    tracker: PositionTracker,
    host: Box<dyn FormHost>,
    source: Arc<dyn TickerSource>,
    events: mpsc::UnboundedSender<FormEvent>,
    commits: mpsc::UnboundedSender<SearchCommit>,
    active_request: u64,
    mounted: bool,
    document: Option<Subscription>,
}

impl SearchForm {
    /// Mounts a form, subscribes it to `document` and starts loading the index for `exchange`.
    /// Events for the form arrive on the returned receiver; feed them to [`SearchForm::run`] or
    /// to [`SearchForm::dispatch`].
    pub fn mount(
        config: TypeaheadConfig,
        exchange: ExchangeScope,
        source: Arc<dyn TickerSource>,
        host: Box<dyn FormHost>,
        document: &DocumentEvents,
        commits: mpsc::UnboundedSender<SearchCommit>,
    ) -> (Self, mpsc::UnboundedReceiver<FormEvent>) {
        let (events, rx) = mpsc::unbounded_channel();

        let forward = events.clone();
        let subscription =
            document.subscribe(move |event| forward.send(FormEvent::Document(event)).is_ok());

        let mut form = Self {
            debounce: DebounceScheduler::new(config.debounce),
            guard: SelectionGuard::new(config.suppression),
            tracker: PositionTracker::new(config.dropdown_z_index),
            config,
            exchange,
            index: TickerIndex::empty(exchange),
            query: QueryState::default(),
            suggestions: Vec::new(),
            navigator: KeyboardNavigator::new(),
            host,
            source,
            events,
            commits,
            active_request: 0,
            mounted: true,
            document: Some(subscription),
        };
        log::debug!("Search form mounted for {}", exchange);
        form.load_index();
        (form, rx)
    }

    pub fn handle(&self) -> FormHandle {
        FormHandle {
            tx: self.events.clone(),
        }
    }

    /// Processes events until the form is unmounted.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<FormEvent>) {
        while let Some(event) = events.recv().await {
            self.dispatch(event);
            if !self.mounted {
                break;
            }
        }
    }

    pub fn dispatch(&mut self, event: FormEvent) {
        if !self.mounted {
            log::debug!("Ignoring {:?} after unmount", event);
            return;
        }
        match event {
            FormEvent::Input(text) => self.set_query(text, true),
            FormEvent::Key(key) => self.on_key(key),
            FormEvent::Submit => {
                if let Some(symbol) = navigator::resolve_submission(self.query.raw(), &self.index) {
                    self.commit(symbol);
                }
            }
            FormEvent::SuggestionHovered(position) => {
                self.navigator.hover(position, self.suggestions.len())
            }
            FormEvent::SuggestionPressed(position) => {
                if let Some(item) = self.suggestions.get(position) {
                    let symbol = item.display.clone();
                    self.commit(symbol);
                }
            }
            FormEvent::ExchangeChanged(exchange) => self.change_exchange(exchange),
            FormEvent::Document(event) => self.on_document(event),
            FormEvent::DebounceElapsed(generation) => self.on_debounce(generation),
            FormEvent::SuppressionElapsed(generation) => {
                if self.guard.release(generation) {
                    log::debug!("Suppression window ended");
                }
            }
            FormEvent::IndexLoaded {
                request,
                exchange,
                items,
            } => self.on_index_loaded(request, exchange, items),
            FormEvent::Unmount => self.unmount(),
        }
    }

    pub fn exchange(&self) -> ExchangeScope {
        self.exchange
    }

    pub fn index(&self) -> &TickerIndex {
        &self.index
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn suggestions(&self) -> &[TickerItem] {
        &self.suggestions
    }

    pub fn highlight(&self) -> Option<usize> {
        self.navigator.highlight()
    }

    /// `-1` when nothing is highlighted.
    pub fn highlight_index(&self) -> isize {
        self.navigator.as_index()
    }

    pub fn is_open(&self) -> bool {
        !self.suggestions.is_empty()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn position(&self) -> DropdownPosition {
        self.tracker.current()
    }

    pub fn phase(&self) -> Phase {
        if self.guard.is_suppressed() {
            Phase::Suppressed
        } else if self.is_open() {
            Phase::Open
        } else if self.debounce.is_pending() {
            Phase::Typing
        } else {
            Phase::Idle
        }
    }

    fn set_query(&mut self, text: String, typed: bool) {
        self.query.set(text, typed);
        if self.query.is_blank() {
            self.debounce.cancel();
            self.replace_suggestions(Vec::new());
            return;
        }
        self.schedule_rank();
    }

    fn schedule_rank(&mut self) {
        let tx = self.events.clone();
        self.debounce.schedule(move |generation| {
            let _ = tx.send(FormEvent::DebounceElapsed(generation));
        });
    }

    fn on_debounce(&mut self, generation: u64) {
        if !self.debounce.accept(generation) {
            log::debug!("Dropping superseded debounce firing {}", generation);
            return;
        }
        if self.guard.is_suppressed() {
            log::debug!("Debounce fired during suppression window, list stays closed");
            return;
        }
        let ranked = ranker::rank(
            self.query.raw(),
            self.index.items(),
            self.config.max_suggestions,
        );
        log::debug!(
            "Query {:?} ranked {} of {} tickers",
            self.query.normalized(),
            ranked.len(),
            self.index.len()
        );
        self.replace_suggestions(ranked);
    }

    fn on_key(&mut self, key: NavKey) {
        match self
            .navigator
            .handle(key, &self.suggestions, self.query.raw(), &self.index)
        {
            NavAction::Stay => {}
            NavAction::Commit(symbol) => self.commit(symbol),
            NavAction::Close => self.close(),
        }
    }

    fn commit(&mut self, symbol: String) {
        let tx = self.events.clone();
        self.guard.engage(move |generation| {
            let _ = tx.send(FormEvent::SuppressionElapsed(generation));
        });

        let commit = SearchCommit::new(&symbol, self.exchange);
        self.set_query(symbol, false);
        self.close();

        log::debug!("Committing {} on {}", commit.symbol, commit.exchange);
        if self.commits.send(commit).is_err() {
            log::warn!("Search commit dropped, host is no longer listening");
        }
    }

    fn close(&mut self) {
        self.replace_suggestions(Vec::new());
    }

    fn replace_suggestions(&mut self, suggestions: Vec<TickerItem>) {
        self.suggestions = suggestions;
        self.navigator.reset();
        self.reposition();
    }

    fn reposition(&mut self) {
        let shown = self.is_open();
        let host = &self.host;
        self.tracker
            .recompute(shown, || (host.form_rect(), host.scroll_offset()));
    }

    fn on_document(&mut self, event: DocumentEvent) {
        match event {
            DocumentEvent::PointerDown { target } => {
                if self.is_open() && dismiss::is_outside(target, self.host.as_ref()) {
                    log::debug!("Pointer-down outside the search form, closing suggestions");
                    self.close();
                }
            }
            DocumentEvent::Scroll | DocumentEvent::Resize => self.reposition(),
        }
    }

    fn change_exchange(&mut self, exchange: ExchangeScope) {
        if exchange == self.exchange {
            return;
        }
        log::debug!("Exchange changed {} -> {}", self.exchange, exchange);
        self.exchange = exchange;
        self.debounce.cancel();
        self.query.clear();
        self.replace_suggestions(Vec::new());
        self.index = TickerIndex::empty(exchange);
        self.load_index();
    }

    fn load_index(&mut self) {
        self.active_request += 1;
        let request = self.active_request;
        let exchange = self.exchange;
        let source = Arc::clone(&self.source);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let items = fetch::load_or_empty(source.as_ref(), exchange).await;
            let _ = tx.send(FormEvent::IndexLoaded {
                request,
                exchange,
                items,
            });
        });
    }

    fn on_index_loaded(&mut self, request: u64, exchange: ExchangeScope, items: Vec<TickerItem>) {
        if request != self.active_request || exchange != self.exchange {
            log::debug!("Discarding stale ticker index for {} (request {})", exchange, request);
            return;
        }
        self.index = TickerIndex::new(exchange, items);
        // A committed symbol written back into the input does not reopen the list.
        if self.query.is_typed() && !self.query.is_blank() {
            self.schedule_rank();
        }
    }

    fn unmount(&mut self) {
        self.mounted = false;
        self.debounce.cancel();
        self.guard.cancel();
        self.document = None;
        self.replace_suggestions(Vec::new());
        log::debug!("Search form unmounted");
    }
}
