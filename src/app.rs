//! App state and core application logic
//!
//! The typeahead controller owns the search input, the suggestion list and
//! the debounce/stamp bookkeeping. `App` wraps it with the result panel,
//! backend status and the key bindings, and turns user intent into
//! [`Action`]s that `dispatch` runs against a [`MovieBackend`].

use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::api::{BackendError, LookupKey, MovieBackend};
use crate::models::{MovieDetail, Pong, SuggestionItem};
use crate::service::search::is_searchable;

/// Quiet period after the last edit before suggestions are requested
pub const DEBOUNCE: Duration = Duration::from_millis(200);

// =============================================================================
// Debouncer
// =============================================================================

/// Single-shot timer that restarts on every `reset`
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Restart the quiet period from `now`
    pub fn reset(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once when the deadline has passed
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE)
    }
}

// =============================================================================
// Input Mode / Loading State
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    /// Result panel focused; single-key shortcuts active
    Normal,
    /// Text input mode (search box focused)
    #[default]
    Editing,
}

/// Loading state for the detail lookup
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadingState {
    /// Idle - no loading in progress
    #[default]
    Idle,
    /// Loading with optional message
    Loading(Option<String>),
    /// Error with message
    Error(String),
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadingState::Error(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LoadingState::Loading(Some(msg)) => Some(msg),
            LoadingState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Last known backend liveness
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BackendStatus {
    #[default]
    Unknown,
    Online(String),
    Offline(String),
}

// =============================================================================
// Typeahead Controller
// =============================================================================

/// Where the typeahead currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    PendingFetch,
    ShowingSuggestions,
    SuggestionHighlighted,
}

/// Side effects requested by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    FetchSuggestions { stamp: u64, term: String },
    LookupById(String),
    LookupByTitle(String),
    FocusInput,
    Ping,
}

/// Incremental search over a single text input
#[derive(Debug, Clone, Default)]
pub struct Typeahead {
    input: String,
    /// Cursor position in characters
    cursor: usize,
    suggestions: Vec<SuggestionItem>,
    active: Option<usize>,
    visible: bool,
    debouncer: Debouncer,
    /// Last stamp issued; only the reply carrying it is applied
    stamp: u64,
    in_flight: bool,
}

impl Typeahead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Trimmed search term
    pub fn term(&self) -> &str {
        self.input.trim()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn suggestions(&self) -> &[SuggestionItem] {
        &self.suggestions
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    pub fn phase(&self) -> Phase {
        if self.visible && !self.suggestions.is_empty() {
            if self.active.is_some() {
                Phase::SuggestionHighlighted
            } else {
                Phase::ShowingSuggestions
            }
        } else if self.debouncer.is_pending() || self.in_flight {
            Phase::PendingFetch
        } else {
            Phase::Idle
        }
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    fn byte_offset(&self, chars: usize) -> usize {
        self.input
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    fn char_len(&self) -> usize {
        self.input.chars().count()
    }

    /// Insert character at cursor
    pub fn insert(&mut self, c: char, now: Instant) {
        let at = self.byte_offset(self.cursor);
        self.input.insert(at, c);
        self.cursor += 1;
        self.on_input_changed(now);
    }

    /// Delete character before cursor
    pub fn backspace(&mut self, now: Instant) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_offset(self.cursor);
            self.input.remove(at);
            self.on_input_changed(now);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self, now: Instant) {
        if self.cursor < self.char_len() {
            let at = self.byte_offset(self.cursor);
            self.input.remove(at);
            self.on_input_changed(now);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Replace the whole input as if typed
    pub fn set_input(&mut self, text: &str, now: Instant) {
        self.input = text.to_string();
        self.cursor = self.char_len();
        self.on_input_changed(now);
    }

    fn on_input_changed(&mut self, now: Instant) {
        if is_searchable(&self.input) {
            self.debouncer.reset(now);
        } else {
            self.debouncer.cancel();
            self.drop_suggestions();
            self.invalidate();
        }
    }

    fn drop_suggestions(&mut self) {
        self.suggestions.clear();
        self.active = None;
        self.visible = false;
    }

    /// Make every outstanding suggestion reply stale
    fn invalidate(&mut self) {
        self.stamp += 1;
        self.in_flight = false;
    }

    // -------------------------------------------------------------------------
    // Fetching
    // -------------------------------------------------------------------------

    /// Advance the debounce clock; yields a fetch once the input has settled
    pub fn tick(&mut self, now: Instant) -> Option<Action> {
        if !self.debouncer.fire_if_due(now) || !is_searchable(&self.input) {
            return None;
        }

        self.stamp += 1;
        self.in_flight = true;
        Some(Action::FetchSuggestions {
            stamp: self.stamp,
            term: self.term().to_string(),
        })
    }

    /// Apply a suggestion reply. Returns false when the reply was stale.
    pub fn apply_suggestions<E: Display>(
        &mut self,
        stamp: u64,
        result: Result<Vec<SuggestionItem>, E>,
    ) -> bool {
        if stamp != self.stamp {
            debug!(stamp, latest = self.stamp, "dropping stale suggestions");
            return false;
        }

        self.in_flight = false;
        match result {
            Ok(items) => {
                self.visible = !items.is_empty();
                self.suggestions = items;
                self.active = None;
            }
            Err(e) => {
                debug!(error = %e, "suggestion fetch failed");
                self.drop_suggestions();
            }
        }
        true
    }

    // -------------------------------------------------------------------------
    // Navigation and selection
    // -------------------------------------------------------------------------

    pub fn move_down(&mut self) {
        if !self.visible || self.suggestions.is_empty() {
            return;
        }
        let max = self.suggestions.len() - 1;
        self.active = Some(self.active.map_or(0, |i| (i + 1).min(max)));
    }

    pub fn move_up(&mut self) {
        if !self.visible || self.suggestions.is_empty() {
            return;
        }
        self.active = Some(self.active.map_or(0, |i| i.saturating_sub(1)));
    }

    /// Hide the list, keeping the highlight
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Choose suggestion `index`: fill the input and look it up by id
    pub fn select(&mut self, index: usize) -> Option<Action> {
        let item = self.suggestions.get(index)?.clone();

        self.input = item.title;
        self.cursor = self.char_len();
        self.visible = false;
        self.debouncer.cancel();
        self.invalidate();

        Some(Action::LookupById(item.imdb_id))
    }

    /// Enter: highlighted suggestion if shown, else an exact-title lookup
    pub fn submit(&mut self) -> Option<Action> {
        if self.visible {
            if let Some(i) = self.active {
                return self.select(i);
            }
        }
        is_searchable(&self.input).then(|| Action::LookupByTitle(self.term().to_string()))
    }

    /// Explicit search action
    pub fn search(&self) -> Action {
        if is_searchable(&self.input) {
            Action::LookupByTitle(self.term().to_string())
        } else {
            Action::FocusInput
        }
    }

    /// Empty the input and forget every suggestion, including in-flight ones
    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
        self.debouncer.cancel();
        self.drop_suggestions();
        self.invalidate();
    }

    /// Handle keys while the input is focused
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Option<Action> {
        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Down => {
                self.move_down();
                None
            }
            KeyCode::Up => {
                self.move_up();
                None
            }
            KeyCode::Esc => {
                self.hide();
                None
            }
            KeyCode::Char(c) => {
                self.insert(c, now);
                None
            }
            KeyCode::Backspace => {
                self.backspace(now);
                None
            }
            KeyCode::Delete => {
                self.delete(now);
                None
            }
            KeyCode::Left => {
                self.cursor_left();
                None
            }
            KeyCode::Right => {
                self.cursor_right();
                None
            }
            KeyCode::Home => {
                self.cursor_home();
                None
            }
            KeyCode::End => {
                self.cursor_end();
                None
            }
            _ => None,
        }
    }
}

// =============================================================================
// Messages
// =============================================================================

/// Results posted back to the event loop by spawned backend calls
#[derive(Debug)]
pub enum Message {
    Suggestions {
        stamp: u64,
        result: Result<Vec<SuggestionItem>, BackendError>,
    },
    Detail(Result<MovieDetail, BackendError>),
    Pong(Result<Pong, BackendError>),
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Whether the app is running
    pub running: bool,
    /// Current input mode
    pub input_mode: InputMode,
    pub typeahead: Typeahead,
    /// Record shown in the result panel
    pub detail: Option<MovieDetail>,
    /// Detail lookup state
    pub loading: LoadingState,
    pub backend: BackendStatus,
    /// Backend address, shown in the status bar
    pub backend_url: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            running: true,
            input_mode: InputMode::Editing,
            typeahead: Typeahead::new(),
            detail: None,
            loading: LoadingState::Idle,
            backend: BackendStatus::Unknown,
            backend_url: String::new(),
        }
    }
}

impl App {
    /// Create a new App instance
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            ..Self::default()
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Empty the input and hide both the suggestions and the result
    pub fn clear(&mut self) {
        self.typeahead.clear();
        self.detail = None;
        self.loading = LoadingState::Idle;
        self.input_mode = InputMode::Editing;
    }

    /// Advance timers; may yield a suggestion fetch
    pub fn tick(&mut self, now: Instant) -> Option<Action> {
        self.typeahead.tick(now)
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returning any backend work to dispatch
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            let action = match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => {
                    self.quit();
                    None
                }
                KeyCode::Char('u') => {
                    self.clear();
                    None
                }
                KeyCode::Char('s') => Some(self.typeahead.search()),
                KeyCode::Char('p') => Some(Action::Ping),
                _ => None,
            };
            return self.intercept(action);
        }

        let action = if self.input_mode == InputMode::Editing {
            self.handle_editing_key(key, now)
        } else {
            self.handle_normal_key(key)
        };
        self.intercept(action)
    }

    /// Keep local actions local; mark lookups as loading
    fn intercept(&mut self, action: Option<Action>) -> Option<Action> {
        match action {
            Some(Action::FocusInput) => {
                self.input_mode = InputMode::Editing;
                None
            }
            Some(Action::LookupById(_)) | Some(Action::LookupByTitle(_)) => {
                self.loading = LoadingState::Loading(Some("Loading...".into()));
                action
            }
            other => other,
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent, now: Instant) -> Option<Action> {
        // Esc with no list open leaves the input
        if key.code == KeyCode::Esc && !self.typeahead.is_visible() {
            self.input_mode = InputMode::Normal;
            return None;
        }
        self.typeahead.handle_key(key, now)
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                None
            }
            KeyCode::Char('/') | KeyCode::Char('i') | KeyCode::Enter => Some(Action::FocusInput),
            KeyCode::Char('c') => {
                self.clear();
                None
            }
            KeyCode::Char('p') => Some(Action::Ping),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Backend replies
    // -------------------------------------------------------------------------

    pub fn apply(&mut self, message: Message) {
        match message {
            Message::Suggestions { stamp, result } => {
                self.typeahead.apply_suggestions(stamp, result);
            }
            Message::Detail(Ok(detail)) => {
                self.detail = Some(detail);
                self.loading = LoadingState::Idle;
            }
            Message::Detail(Err(e)) => {
                self.detail = None;
                let msg = if e.is_not_found() {
                    "No match found".to_string()
                } else {
                    format!("Lookup failed: {}", e)
                };
                self.loading = LoadingState::Error(msg);
            }
            Message::Pong(Ok(pong)) => self.backend = BackendStatus::Online(pong.time),
            Message::Pong(Err(e)) => self.backend = BackendStatus::Offline(e.to_string()),
        }
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Run `action` on a background task, posting the reply to `tx`
pub fn dispatch(action: Action, backend: Arc<dyn MovieBackend>, tx: UnboundedSender<Message>) {
    tokio::spawn(async move {
        let message = match action {
            Action::FetchSuggestions { stamp, term } => Message::Suggestions {
                stamp,
                result: backend.suggestions(&term).await,
            },
            Action::LookupById(id) => Message::Detail(backend.movie(&LookupKey::Id(id)).await),
            Action::LookupByTitle(title) => {
                Message::Detail(backend.movie(&LookupKey::Title(title)).await)
            }
            Action::Ping => Message::Pong(backend.ping().await),
            Action::FocusInput => return,
        };
        // Receiver gone means the UI is shutting down
        let _ = tx.send(message);
    });
}
