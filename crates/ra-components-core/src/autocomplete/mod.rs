//! Autocomplete input with an infinitely scrolling suggestion list.
//!
//! [`Autocomplete`] is the engine: it owns the input text, the committed value, the accumulated
//! suggestions of the current query session and the selection marker. It never renders on its
//! own; two thin adapters in [`mount`] put it on screen:
//!
//! - [`mount::AutocompleteElement`] draws its own bordered input and an overlay dropdown.
//! - [`mount::AttachedAutocomplete`] is attached to a container rectangle owned by the host.
//!
//! Searches are requested, not performed: a text change returns
//! [`AutocompleteAction::Search`] and the host answers later with
//! [`Autocomplete::complete_search`]. Each request carries a [`SearchToken`]; answers for any
//! token other than the one currently in flight are dropped, so a slow response for an old query
//! can never land in the list of a newer one.

pub mod mount;
pub mod view;

use crate::error::FetchError;
use crate::error::OptionsError;
use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::line_edit::LineEdit;
use crate::line_edit::LineEditAction;
use crate::viewport::ViewportState;
use ratatui::style::Style;
use ratatui::text::Line;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use tracing::trace;
use tracing::warn;

/// One selectable suggestion.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub text: String,
}

impl Item {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Identifies one search request: the session it belongs to and the page it asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SearchToken {
    pub generation: u64,
    pub page: u32,
}

/// A page of suggestions the host should look up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(skip)]
    pub token: SearchToken,
    pub query: String,
    pub page: u32,
    pub page_size: u32,
}

/// The host's answer to a [`SearchRequest`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResponse {
    pub token: SearchToken,
    pub result: Result<Vec<Item>, FetchError>,
}

impl SearchResponse {
    pub fn ok(token: SearchToken, items: Vec<Item>) -> Self {
        Self {
            token,
            result: Ok(items),
        }
    }

    pub fn err(token: SearchToken, error: FetchError) -> Self {
        Self {
            token,
            result: Err(error),
        }
    }
}

/// Renders one suggestion row.
pub type ItemTemplate = Arc<dyn Fn(&Item) -> Line<'static> + Send + Sync>;

#[derive(Clone)]
pub struct AutocompleteOptions {
    pub placeholder: String,
    pub page_size: u32,
    /// Maximum number of suggestion rows shown at once.
    pub max_visible: u16,
    pub item_template: Option<ItemTemplate>,
    pub input_style: Style,
    pub list_style: Style,
    pub selected_style: Style,
    pub show_scrollbar: bool,
}

impl Default for AutocompleteOptions {
    fn default() -> Self {
        Self {
            placeholder: "Search...".to_string(),
            page_size: 10,
            max_visible: 6,
            item_template: None,
            input_style: Style::default(),
            list_style: Style::default(),
            selected_style: Style::default(),
            show_scrollbar: true,
        }
    }
}

impl fmt::Debug for AutocompleteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutocompleteOptions")
            .field("placeholder", &self.placeholder)
            .field("page_size", &self.page_size)
            .field("max_visible", &self.max_visible)
            .field("item_template", &self.item_template.is_some())
            .field("show_scrollbar", &self.show_scrollbar)
            .finish_non_exhaustive()
    }
}

impl AutocompleteOptions {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.page_size == 0 {
            return Err(OptionsError::ZeroPageSize);
        }
        Ok(())
    }
}

/// Plain-data subset of [`AutocompleteOptions`] that can be loaded from configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutocompleteConfig {
    pub placeholder: String,
    pub page_size: u32,
    pub max_visible: u16,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        let o = AutocompleteOptions::default();
        Self {
            placeholder: o.placeholder,
            page_size: o.page_size,
            max_visible: o.max_visible,
        }
    }
}

impl From<AutocompleteConfig> for AutocompleteOptions {
    fn from(c: AutocompleteConfig) -> Self {
        Self {
            placeholder: c.placeholder,
            page_size: c.page_size,
            max_visible: c.max_visible,
            ..Self::default()
        }
    }
}

/// State of the current query, from one text change to the next.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub generation: u64,
    pub query: String,
    pub page: u32,
    pub page_size: u32,
    /// Set once a page came back empty; no further pages are requested for this query.
    pub exhausted: bool,
    in_flight: Option<SearchToken>,
}

impl Session {
    pub fn loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<SearchToken> {
        self.in_flight
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AutocompleteAction {
    None,
    Redraw,
    /// Look up this page and hand the result to [`Autocomplete::complete_search`].
    Search(SearchRequest),
    /// A suggestion was committed as the new value.
    ValueChanged(Item),
}

pub struct Autocomplete {
    options: AutocompleteOptions,
    input: LineEdit,
    value_id: String,
    items: Vec<Item>,
    selected: Option<usize>,
    open: bool,
    session: Session,
    list: ViewportState,
}

impl Default for Autocomplete {
    fn default() -> Self {
        Self::with_options(AutocompleteOptions::default())
    }
}

impl fmt::Debug for Autocomplete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Autocomplete")
            .field("text", &self.input.text())
            .field("value_id", &self.value_id)
            .field("items", &self.items.len())
            .field("selected", &self.selected)
            .field("open", &self.open)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl Autocomplete {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: AutocompleteOptions) -> Self {
        let page_size = options.page_size.max(1);
        let mut list = ViewportState::default();
        list.set_viewport(options.max_visible.max(1));
        Self {
            options,
            input: LineEdit::new(),
            value_id: String::new(),
            items: Vec::new(),
            selected: None,
            open: false,
            session: Session {
                page: 1,
                page_size,
                ..Session::default()
            },
            list,
        }
    }

    pub fn try_with_options(options: AutocompleteOptions) -> Result<Self, OptionsError> {
        options.validate()?;
        Ok(Self::with_options(options))
    }

    pub fn options(&self) -> &AutocompleteOptions {
        &self.options
    }

    pub fn set_item_template(&mut self, template: Option<ItemTemplate>) {
        self.options.item_template = template;
    }

    /// Sets the committed value without searching or notifying.
    pub fn set_value(&mut self, id: impl Into<String>, text: impl Into<String>) {
        self.value_id = id.into();
        self.input.set_text(text);
    }

    /// The committed id paired with the current input text.
    pub fn value(&self) -> Item {
        Item {
            id: self.value_id.clone(),
            text: self.input.text().to_string(),
        }
    }

    pub fn clear_value(&mut self) {
        self.value_id.clear();
        self.input.clear();
    }

    pub fn text(&self) -> &str {
        self.input.text()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// `true` while the suggestion list is shown.
    pub fn is_open(&self) -> bool {
        self.open && !self.items.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.session.loading()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn list_viewport(&self) -> &ViewportState {
        &self.list
    }

    pub(crate) fn input_mut(&mut self) -> &mut LineEdit {
        &mut self.input
    }

    pub(crate) fn set_list_height(&mut self, h: u16) {
        self.list.set_viewport(h.max(1));
    }

    /// Handles keyboard and paste input. Mouse input is hit-tested by the mounting adapters.
    pub fn handle_event(&mut self, event: &InputEvent) -> AutocompleteAction {
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Paste(_) => self.edit(event),
            InputEvent::Mouse(_) | InputEvent::FocusLost => AutocompleteAction::None,
        }
    }

    /// Applies the host's answer to a previous [`AutocompleteAction::Search`].
    pub fn complete_search(&mut self, response: SearchResponse) -> AutocompleteAction {
        if self.session.in_flight != Some(response.token) {
            debug!(
                generation = response.token.generation,
                page = response.token.page,
                current = self.session.generation,
                "discarding stale search response"
            );
            return AutocompleteAction::None;
        }
        self.session.in_flight = None;

        match response.result {
            Ok(items) if items.is_empty() => {
                debug!(page = response.token.page, "search exhausted");
                self.session.exhausted = true;
                AutocompleteAction::None
            }
            Ok(items) => {
                debug!(
                    page = response.token.page,
                    received = items.len(),
                    "search page applied"
                );
                self.items.extend(items);
                self.list.set_content(self.items.len() as u32);
                self.open = true;
                AutocompleteAction::Redraw
            }
            Err(err) => {
                warn!(page = response.token.page, error = %err, "search failed");
                AutocompleteAction::None
            }
        }
    }

    /// Commits the suggestion at `index`, as a click on it would.
    pub fn select_item(&mut self, index: usize) -> AutocompleteAction {
        if !self.is_open() || index >= self.items.len() {
            return AutocompleteAction::None;
        }
        self.commit(index)
    }

    /// Closes the suggestion list, keeping the input as typed.
    pub fn close(&mut self) -> AutocompleteAction {
        let was_open = self.is_open();
        self.open = false;
        self.selected = None;
        if was_open {
            AutocompleteAction::Redraw
        } else {
            AutocompleteAction::None
        }
    }

    /// Scrolls the suggestion list; reaching the bottom requests the next page.
    ///
    /// A list that fits its viewport only asks for more while its last page came back full;
    /// a short page that fits has nothing below it to scroll to.
    pub fn scroll_list(&mut self, delta: i32) -> AutocompleteAction {
        if !self.is_open() {
            return AutocompleteAction::None;
        }
        let fits = self.list.content_h <= self.list.viewport_h as u32;
        let loaded = self.session.page as usize * self.session.page_size as usize;
        if fits && self.items.len() < loaded {
            return AutocompleteAction::None;
        }
        let scrolled = self.list.scroll_y_by(delta);
        if let Some(req) = self.on_scroll() {
            return AutocompleteAction::Search(req);
        }
        if scrolled {
            AutocompleteAction::Redraw
        } else {
            AutocompleteAction::None
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> AutocompleteAction {
        match key.code {
            KeyCode::Down => self.move_selection(1),
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Esc => self.close(),
            KeyCode::Enter | KeyCode::Tab | KeyCode::BackTab => {
                if let Some(idx) = self.selected.filter(|_| self.is_open()) {
                    return self.commit(idx);
                }
                let closed = self.close();
                if key.code == KeyCode::Enter {
                    return AutocompleteAction::Search(self.start_session());
                }
                closed
            }
            _ => self.edit(&InputEvent::Key(key.clone())),
        }
    }

    fn edit(&mut self, event: &InputEvent) -> AutocompleteAction {
        match self.input.input(event) {
            LineEditAction::Changed => AutocompleteAction::Search(self.start_session()),
            LineEditAction::Moved => AutocompleteAction::Redraw,
            LineEditAction::Ignored => AutocompleteAction::None,
        }
    }

    fn move_selection(&mut self, step: i64) -> AutocompleteAction {
        if !self.is_open() {
            return AutocompleteAction::None;
        }
        let last = self.items.len() as i64 - 1;
        let current = self.selected.map(|i| i as i64).unwrap_or(-1);
        let next = (current + step).max(0).min(last) as usize;
        trace!(from = ?self.selected, to = next, "autocomplete selection moved");
        self.selected = Some(next);

        if self.list.ensure_visible(next as u32) {
            if let Some(req) = self.on_scroll() {
                return AutocompleteAction::Search(req);
            }
        }
        AutocompleteAction::Redraw
    }

    fn commit(&mut self, index: usize) -> AutocompleteAction {
        let Some(item) = self.items.get(index).cloned() else {
            return AutocompleteAction::None;
        };
        debug!(id = %item.id, "autocomplete value committed");
        self.value_id = item.id.clone();
        self.input.set_text(item.text.clone());
        self.reset_list();
        // Anything still in flight belongs to a query the user has moved past.
        self.session.generation += 1;
        self.session.in_flight = None;
        AutocompleteAction::ValueChanged(item)
    }

    fn start_session(&mut self) -> SearchRequest {
        self.reset_list();
        self.session = Session {
            generation: self.session.generation + 1,
            query: self.input.text().to_string(),
            page: 1,
            page_size: self.options.page_size.max(1),
            exhausted: false,
            in_flight: None,
        };
        self.issue()
    }

    fn on_scroll(&mut self) -> Option<SearchRequest> {
        if !self.list.at_bottom() || self.session.loading() || self.session.exhausted {
            return None;
        }
        self.session.page += 1;
        Some(self.issue())
    }

    fn issue(&mut self) -> SearchRequest {
        let token = SearchToken {
            generation: self.session.generation,
            page: self.session.page,
        };
        self.session.in_flight = Some(token);
        debug!(
            query = %self.session.query,
            page = token.page,
            generation = token.generation,
            "search requested"
        );
        SearchRequest {
            token,
            query: self.session.query.clone(),
            page: self.session.page,
            page_size: self.session.page_size,
        }
    }

    fn reset_list(&mut self) {
        self.items.clear();
        self.selected = None;
        self.open = false;
        self.list.set_content(0);
        self.list.to_top();
    }
}
