//! Paginated data table with sorting, per-column filters and inline cell editing.
//!
//! Layout, top to bottom: a header row (sortable columns carry `↕`, `↑` or `↓`), a row of filter
//! inputs, the body and a [`Paginator`] line.
//!
//! Like the autocomplete, the table never loads data itself. Changing the page, the sort or a
//! filter returns [`DataTableAction::Fetch`]; the host resolves the request (directly or through
//! a [`DataSource`](crate::fetch::DataSource)) and hands the answer to
//! [`DataTable::complete_fetch`]. Data can also be pushed with [`DataTable::load_data`].
//!
//! Keys while idle: arrows move the selected cell, `s` sorts by the selected column, `/` edits
//! its filter, Enter edits the cell (editable tables only) and PageUp/PageDown (or `[`/`]`) flip
//! pages. While editing a cell, Enter and Tab commit and move on, Shift+Tab moves back and Esc
//! discards.

pub mod model;
pub mod pager;
mod view;

pub use model::Cell;
pub use model::CellFormatter;
pub use model::Column;
pub use model::ColumnType;
pub use model::DisplayFormat;
pub use model::EditEvent;
pub use model::FetchReply;
pub use model::FetchRequest;
pub use model::FetchResponse;
pub use model::FetchToken;
pub use model::FilterEntry;
pub use model::FilterOp;
pub use model::FilterState;
pub use model::Filters;
pub use model::Row;
pub use model::SortDirection;
pub use model::SortState;
pub use model::value_text;
pub use pager::PagerAction;
pub use pager::PagerBar;
pub use pager::PagerState;
pub use pager::Paginator;
pub use view::ColumnSpan;
pub use view::TableLayout;

use crate::date_format::DateFormatter;
use crate::date_format::PatternDateFormatter;
use crate::error::OptionsError;
use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;
use crate::keymap;
use crate::keymap::Binding;
use crate::line_edit::LineEdit;
use crate::line_edit::LineEditAction;
use crate::theme::Theme;
use crate::viewport::ViewportState;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use tracing::trace;
use tracing::warn;

#[derive(Clone, Debug, PartialEq)]
pub enum DataTableAction {
    None,
    Redraw,
    /// Load this page and hand the result to [`DataTable::complete_fetch`].
    Fetch(FetchRequest),
    /// A cell edit was committed into the row.
    Edited(EditEvent),
}

#[derive(Clone, Debug)]
pub struct TableBindings {
    pub sort: Binding,
    pub filter: Binding,
    pub edit: Binding,
    pub next_page: Binding,
    pub prev_page: Binding,
}

impl Default for TableBindings {
    fn default() -> Self {
        Self {
            sort: Binding::new("s", "sort by column", vec![keymap::key_char('s')]),
            filter: Binding::new("/", "filter column", vec![keymap::key_char('/')]),
            edit: Binding::new("enter", "edit cell", vec![keymap::key(KeyCode::Enter)]),
            next_page: Binding::new(
                "pgdn/]",
                "next page",
                vec![keymap::key(KeyCode::PageDown), keymap::key_char(']')],
            ),
            prev_page: Binding::new(
                "pgup/[",
                "previous page",
                vec![keymap::key(KeyCode::PageUp), keymap::key_char('[')],
            ),
        }
    }
}

impl TableBindings {
    /// Every binding, in help-bar order.
    pub fn all(&self) -> Vec<Binding> {
        vec![
            self.sort.clone(),
            self.filter.clone(),
            self.edit.clone(),
            self.prev_page.clone(),
            self.next_page.clone(),
        ]
    }
}

#[derive(Clone)]
pub struct DataTableOptions {
    /// Initial page, 1-based.
    pub page: u32,
    pub page_size: u32,
    /// Field whose value identifies a row in [`EditEvent::key_value`].
    pub key_field: Option<String>,
    pub empty_text: String,
    pub filter_placeholder: String,
    pub show_scrollbar: bool,
    pub header_style: Style,
    pub cell_style: Style,
    pub selected_style: Style,
    pub editing_style: Style,
    pub separator_style: Style,
    pub date_formatter: Arc<dyn DateFormatter>,
    pub bindings: TableBindings,
}

impl Default for DataTableOptions {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 5,
            key_field: None,
            empty_text: "No data found".to_string(),
            filter_placeholder: "Filter".to_string(),
            show_scrollbar: true,
            header_style: Style::default(),
            cell_style: Style::default(),
            selected_style: Style::default(),
            editing_style: Style::default(),
            separator_style: Style::default(),
            date_formatter: Arc::new(PatternDateFormatter),
            bindings: TableBindings::default(),
        }
    }
}

impl fmt::Debug for DataTableOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTableOptions")
            .field("page", &self.page)
            .field("page_size", &self.page_size)
            .field("key_field", &self.key_field)
            .field("empty_text", &self.empty_text)
            .field("show_scrollbar", &self.show_scrollbar)
            .finish_non_exhaustive()
    }
}

impl DataTableOptions {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.page == 0 {
            return Err(OptionsError::ZeroPage);
        }
        if self.page_size == 0 {
            return Err(OptionsError::ZeroPageSize);
        }
        if self.key_field.as_deref() == Some("") {
            return Err(OptionsError::EmptyKeyField);
        }
        Ok(())
    }
}

/// Plain-data subset of [`DataTableOptions`] that can be loaded from configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableConfig {
    pub page: u32,
    pub page_size: u32,
    pub key_field: Option<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 5,
            key_field: None,
        }
    }
}

impl From<TableConfig> for DataTableOptions {
    fn from(c: TableConfig) -> Self {
        Self {
            page: c.page,
            page_size: c.page_size,
            key_field: c.key_field,
            ..Self::default()
        }
    }
}

struct CellEdit {
    cell: Cell,
    editor: LineEdit,
    original: Value,
}

struct FilterEdit {
    col: usize,
    editor: LineEdit,
}

pub struct DataTable {
    options: DataTableOptions,
    columns: Vec<Column>,
    rows: Vec<Row>,
    total_rows: u64,
    page: u32,
    editable: bool,
    sort: SortState,
    filters: Filters,
    selected: Option<Cell>,
    editing: Option<CellEdit>,
    filter_edit: Option<FilterEdit>,
    body: ViewportState,
    pager: Box<dyn Paginator>,
    generation: u64,
    in_flight: Option<FetchToken>,
    layout: Option<TableLayout>,
}

impl Default for DataTable {
    fn default() -> Self {
        Self::with_options(DataTableOptions::default())
    }
}

impl fmt::Debug for DataTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTable")
            .field("columns", &self.columns.len())
            .field("rows", &self.rows.len())
            .field("total_rows", &self.total_rows)
            .field("page", &self.page)
            .field("editable", &self.editable)
            .field("sort", &self.sort)
            .field("filters", &self.filters)
            .field("selected", &self.selected)
            .field("editing", &self.editing_cell())
            .finish_non_exhaustive()
    }
}

impl DataTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DataTableOptions) -> Self {
        let page = options.page.max(1);
        let pager = PagerBar::new(PagerState {
            page,
            page_size: options.page_size.max(1),
            total_rows: 0,
        });
        Self {
            options,
            columns: Vec::new(),
            rows: Vec::new(),
            total_rows: 0,
            page,
            editable: false,
            sort: SortState::default(),
            filters: Filters::default(),
            selected: None,
            editing: None,
            filter_edit: None,
            body: ViewportState::default(),
            pager: Box::new(pager),
            generation: 0,
            in_flight: None,
            layout: None,
        }
    }

    pub fn try_with_options(options: DataTableOptions) -> Result<Self, OptionsError> {
        options.validate()?;
        Ok(Self::with_options(options))
    }

    /// Replaces the default [`PagerBar`].
    pub fn with_paginator(mut self, pager: impl Paginator + 'static) -> Self {
        self.pager = Box::new(pager);
        self.sync_pager();
        self
    }

    pub fn options(&self) -> &DataTableOptions {
        &self.options
    }

    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.columns = columns;
        self.editing = None;
        self.filter_edit = None;
        self.selected = clamp_cell(self.selected, self.rows.len(), self.columns.len());
    }

    /// Moves to `page` (clamped to at least 1) and requests it.
    pub fn set_page(&mut self, page: u32) -> DataTableAction {
        self.page = page.max(1);
        self.request_fetch()
    }

    /// Turns edit mode on or off for the whole table. Turning it off discards an open edit.
    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
        if !editable && self.editing.take().is_some() {
            trace!("cell edit discarded: table no longer editable");
        }
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Replaces the displayed rows, selects the first cell and resyncs the paginator.
    ///
    /// An open cell edit is dropped without being committed.
    pub fn load_data(&mut self, rows: Vec<Row>, total_rows: u64, page: u32) {
        debug!(rows = rows.len(), total_rows, page, "table data loaded");
        self.rows = rows;
        self.total_rows = total_rows;
        self.page = page.max(1);
        self.editing = None;
        self.body.set_content(self.rows.len() as u32);
        self.body.to_top();
        self.selected =
            (!self.rows.is_empty() && !self.columns.is_empty()).then(|| Cell::new(0, 0));
        self.sync_pager();
    }

    /// [`load_data`](Self::load_data) with the row count as total, on page 1.
    pub fn load_rows(&mut self, rows: Vec<Row>) {
        let total = rows.len() as u64;
        self.load_data(rows, total, 1);
    }

    /// Applies the host's answer to a previous [`DataTableAction::Fetch`].
    pub fn complete_fetch(&mut self, reply: FetchReply) -> DataTableAction {
        if self.in_flight != Some(reply.token) {
            debug!(
                token = reply.token.0,
                current = self.generation,
                "discarding stale fetch response"
            );
            return DataTableAction::None;
        }
        self.in_flight = None;
        match reply.result {
            Ok(response) => {
                self.load_data(response.items, response.total, response.page);
                DataTableAction::Redraw
            }
            Err(err) => {
                warn!(page = self.page, error = %err, "table fetch failed");
                DataTableAction::None
            }
        }
    }

    /// Sorts by `field`: asc first, toggling on repeats. Always requests a fetch.
    pub fn sort_by(&mut self, field: &str) -> DataTableAction {
        self.sort.sort_by(field);
        debug!(field, direction = ?self.sort.direction, "table sorted");
        self.request_fetch()
    }

    pub fn set_filter(&mut self, field: &str, text: impl Into<String>) -> DataTableAction {
        let text = text.into();
        debug!(field, text = %text, "table filter set");
        self.filters.set(field, text);
        self.request_fetch()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn selected_cell(&self) -> Option<Cell> {
        self.selected
    }

    pub fn editing_cell(&self) -> Option<Cell> {
        self.editing.as_ref().map(|e| e.cell)
    }

    /// Text in the open cell editor, if any.
    pub fn editor_text(&self) -> Option<&str> {
        self.editing.as_ref().map(|e| e.editor.text())
    }

    /// Column whose filter input is being edited.
    pub fn filter_editing(&self) -> Option<usize> {
        self.filter_edit.as_ref().map(|e| e.col)
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn pager_state(&self) -> PagerState {
        self.pager.state()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Layout of the last render, if any.
    pub fn layout(&self) -> Option<&TableLayout> {
        self.layout.as_ref()
    }

    /// Display text of a body cell as it is rendered.
    pub fn cell_text(&self, row: usize, col: usize) -> Option<String> {
        let column = self.columns.get(col)?;
        let record = self.rows.get(row)?;
        Some(column.display_text(
            record.get(&column.field),
            self.options.date_formatter.as_ref(),
        ))
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> DataTableAction {
        match event {
            InputEvent::Key(key) => {
                if self.filter_edit.is_some() {
                    self.handle_filter_key(key)
                } else if self.editing.is_some() {
                    self.handle_edit_key(key)
                } else {
                    self.handle_idle_key(key)
                }
            }
            InputEvent::Paste(_) => {
                let editor = match (&mut self.filter_edit, &mut self.editing) {
                    (Some(f), _) => &mut f.editor,
                    (None, Some(e)) => &mut e.editor,
                    (None, None) => return DataTableAction::None,
                };
                redraw_if_consumed(editor.input(event))
            }
            InputEvent::Mouse(mouse) => self.handle_mouse(event, mouse),
            InputEvent::FocusLost => self.blur(),
        }
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        view::render(self, area, buf, theme);
    }

    /// Commits whatever input is open, as losing focus would.
    pub fn blur(&mut self) -> DataTableAction {
        if self.filter_edit.is_some() {
            return self.commit_filter();
        }
        match self.commit_edit() {
            Some(edited) => DataTableAction::Edited(edited),
            None => DataTableAction::None,
        }
    }

    fn handle_idle_key(&mut self, key: &KeyEvent) -> DataTableAction {
        let bindings = &self.options.bindings;
        if bindings.next_page.matches(key) {
            let change = self.pager.next_page();
            return self.apply_pager(change);
        }
        if bindings.prev_page.matches(key) {
            let change = self.pager.prev_page();
            return self.apply_pager(change);
        }

        let Some(cell) = self.selected else {
            return DataTableAction::None;
        };
        if bindings.sort.matches(key) {
            return match self.columns.get(cell.col).filter(|c| c.sortable) {
                Some(column) => {
                    let field = column.field.clone();
                    self.sort_by(&field)
                }
                None => DataTableAction::None,
            };
        }
        if bindings.filter.matches(key) {
            return self.begin_filter(cell.col);
        }
        if bindings.edit.matches(key) {
            return if self.begin_edit(cell) {
                DataTableAction::Redraw
            } else {
                DataTableAction::None
            };
        }

        match key.code {
            KeyCode::Up => self.move_selection(-1, 0),
            KeyCode::Down => self.move_selection(1, 0),
            KeyCode::Left => self.move_selection(0, -1),
            KeyCode::Right => self.move_selection(0, 1),
            _ => DataTableAction::None,
        }
    }

    fn handle_edit_key(&mut self, key: &KeyEvent) -> DataTableAction {
        match key.code {
            _ if key.is_back_tab() => self.commit_and_advance(-1),
            KeyCode::Enter | KeyCode::Tab => self.commit_and_advance(1),
            KeyCode::Esc => {
                self.cancel_edit();
                DataTableAction::Redraw
            }
            _ => match self.editing.as_mut() {
                Some(edit) => redraw_if_consumed(edit.editor.input(&InputEvent::Key(key.clone()))),
                None => DataTableAction::None,
            },
        }
    }

    fn handle_filter_key(&mut self, key: &KeyEvent) -> DataTableAction {
        match key.code {
            KeyCode::Enter => self.commit_filter(),
            KeyCode::Esc => {
                self.filter_edit = None;
                DataTableAction::Redraw
            }
            _ => match self.filter_edit.as_mut() {
                Some(edit) => redraw_if_consumed(edit.editor.input(&InputEvent::Key(key.clone()))),
                None => DataTableAction::None,
            },
        }
    }

    fn handle_mouse(&mut self, event: &InputEvent, mouse: &MouseEvent) -> DataTableAction {
        let Some(layout) = self.layout.clone() else {
            return DataTableAction::None;
        };
        match mouse.kind {
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
                if !mouse.is_inside(layout.body) {
                    return DataTableAction::None;
                }
                let delta = if mouse.kind == MouseEventKind::ScrollDown {
                    1
                } else {
                    -1
                };
                if self.body.scroll_y_by(delta) {
                    DataTableAction::Redraw
                } else {
                    DataTableAction::None
                }
            }
            _ if mouse.is_left_click() => self.handle_click(event, mouse, &layout),
            _ => DataTableAction::None,
        }
    }

    fn handle_click(
        &mut self,
        event: &InputEvent,
        mouse: &MouseEvent,
        layout: &TableLayout,
    ) -> DataTableAction {
        let inside = mouse.is_inside(layout.area);

        // An open input swallows the first click elsewhere: it only loses focus.
        if let Some(col) = self.filter_edit.as_ref().map(|e| e.col) {
            if mouse.is_inside(layout.filters) && layout.column_at(mouse.x) == Some(col) {
                return DataTableAction::None;
            }
            let committed = self.commit_filter();
            if !inside {
                self.selected = None;
            }
            return committed;
        }
        if let Some(current) = self.editing_cell() {
            let target = self.cell_at(layout, mouse);
            if target == Some(current) {
                return DataTableAction::None;
            }
            let edited = self.commit_edit();
            match target {
                Some(cell) => {
                    self.begin_edit(cell);
                }
                None if !inside => self.selected = None,
                None => {}
            }
            return match edited {
                Some(e) => DataTableAction::Edited(e),
                None => DataTableAction::Redraw,
            };
        }

        if !inside {
            return match self.selected.take() {
                Some(_) => DataTableAction::Redraw,
                None => DataTableAction::None,
            };
        }
        if mouse.is_inside(layout.header) {
            let Some(column) = layout
                .column_at(mouse.x)
                .and_then(|i| self.columns.get(i))
                .filter(|c| c.sortable)
            else {
                return DataTableAction::None;
            };
            let field = column.field.clone();
            return self.sort_by(&field);
        }
        if mouse.is_inside(layout.filters) {
            return match layout.column_at(mouse.x) {
                Some(col) => self.begin_filter(col),
                None => DataTableAction::None,
            };
        }
        if mouse.is_inside(layout.pager) {
            let change = self.pager.handle_event(event);
            return self.apply_pager(change);
        }
        let Some(cell) = self.cell_at(layout, mouse) else {
            return DataTableAction::None;
        };
        if self.editable {
            self.begin_edit(cell);
        } else {
            self.select(cell);
        }
        DataTableAction::Redraw
    }

    fn cell_at(&self, layout: &TableLayout, mouse: &MouseEvent) -> Option<Cell> {
        if !mouse.is_inside(layout.body) {
            return None;
        }
        let col = layout.column_at(mouse.x)?;
        let row = self.body.y as usize + (mouse.y - layout.body.y) as usize;
        (row < self.rows.len() && col < self.columns.len()).then(|| Cell::new(row, col))
    }

    fn select(&mut self, cell: Cell) {
        trace!(row = cell.row, col = cell.col, "table cell selected");
        self.selected = Some(cell);
        self.body.ensure_visible(cell.row as u32);
    }

    fn move_selection(&mut self, drow: i64, dcol: i64) -> DataTableAction {
        let Some(current) = self.selected else {
            return DataTableAction::None;
        };
        if self.rows.is_empty() || self.columns.is_empty() {
            return DataTableAction::None;
        }
        let next = Cell::new(
            (current.row as i64 + drow).clamp(0, self.rows.len() as i64 - 1) as usize,
            (current.col as i64 + dcol).clamp(0, self.columns.len() as i64 - 1) as usize,
        );
        if next == current {
            return DataTableAction::None;
        }
        self.select(next);
        DataTableAction::Redraw
    }

    /// Opens the inline editor on `cell`, preloaded with its raw value.
    fn begin_edit(&mut self, cell: Cell) -> bool {
        if !self.editable {
            return false;
        }
        let (Some(column), Some(record)) = (self.columns.get(cell.col), self.rows.get(cell.row))
        else {
            return false;
        };
        let original = record.get(&column.field).cloned().unwrap_or(Value::Null);
        let mut editor = LineEdit::with_kind(column.kind.input_kind());
        editor.set_text(value_text(&original));
        trace!(row = cell.row, col = cell.col, "cell edit started");
        self.select(cell);
        self.editing = Some(CellEdit {
            cell,
            editor,
            original,
        });
        true
    }

    /// Writes the editor text into the row and reports it.
    fn commit_edit(&mut self) -> Option<EditEvent> {
        let edit = self.editing.take()?;
        let key_value = self.key_value(edit.cell.row);
        let column = self.columns.get(edit.cell.col)?;
        let record = self.rows.get_mut(edit.cell.row)?;
        let value = parse_cell_value(column, edit.editor.text());
        record.insert(column.field.clone(), value.clone());
        debug!(row = edit.cell.row, field = %column.field, "cell edit committed");
        Some(EditEvent {
            row_index: edit.cell.row,
            key_value,
            field: column.field.clone(),
            value,
            previous: edit.original,
            field_format: column.field_format().map(str::to_string),
            display_format: column.display_format().map(str::to_string),
        })
    }

    fn cancel_edit(&mut self) {
        if let Some(edit) = self.editing.take() {
            trace!(row = edit.cell.row, col = edit.cell.col, "cell edit discarded");
        }
        self.selected = None;
    }

    /// Commits, then reopens the editor `step` cells away in row-major order, wrapping around.
    fn commit_and_advance(&mut self, step: i64) -> DataTableAction {
        let Some(from) = self.editing_cell() else {
            return DataTableAction::None;
        };
        let edited = self.commit_edit();
        if let Some(next) = self.neighbor(from, step) {
            self.begin_edit(next);
        }
        match edited {
            Some(e) => DataTableAction::Edited(e),
            None => DataTableAction::Redraw,
        }
    }

    fn neighbor(&self, cell: Cell, step: i64) -> Option<Cell> {
        let cols = self.columns.len() as i64;
        let total = self.rows.len() as i64 * cols;
        if total == 0 {
            return None;
        }
        let index = cell.row as i64 * cols + cell.col as i64;
        let next = (index + step).rem_euclid(total);
        Some(Cell::new((next / cols) as usize, (next % cols) as usize))
    }

    fn begin_filter(&mut self, col: usize) -> DataTableAction {
        let Some(column) = self.columns.get(col) else {
            return DataTableAction::None;
        };
        let mut editor = LineEdit::new();
        if let Some(existing) = self.filters.get(&column.field) {
            editor.set_text(existing.text.clone());
        }
        trace!(field = %column.field, "filter edit started");
        self.filter_edit = Some(FilterEdit { col, editor });
        DataTableAction::Redraw
    }

    /// Closes the filter input; a changed value becomes the column's filter and is fetched.
    fn commit_filter(&mut self) -> DataTableAction {
        let Some(edit) = self.filter_edit.take() else {
            return DataTableAction::None;
        };
        let Some(column) = self.columns.get(edit.col) else {
            return DataTableAction::Redraw;
        };
        let previous = self
            .filters
            .get(&column.field)
            .map(|f| f.text.as_str())
            .unwrap_or("");
        if previous == edit.editor.text() {
            return DataTableAction::Redraw;
        }
        let field = column.field.clone();
        self.set_filter(&field, edit.editor.text())
    }

    fn apply_pager(&mut self, change: PagerAction) -> DataTableAction {
        match change {
            PagerAction::PageChanged(page) => self.set_page(page),
            PagerAction::None => DataTableAction::None,
        }
    }

    fn request_fetch(&mut self) -> DataTableAction {
        self.generation += 1;
        let token = FetchToken(self.generation);
        self.in_flight = Some(token);
        let request = FetchRequest {
            token,
            page: self.page,
            page_size: self.options.page_size.max(1),
            sort_field: self.sort.field.clone(),
            sort_direction: self.sort.direction,
            filters: self.filters.to_entries(),
        };
        debug!(
            page = request.page,
            sort_field = ?request.sort_field,
            filters = request.filters.len(),
            "table fetch requested"
        );
        DataTableAction::Fetch(request)
    }

    fn sync_pager(&mut self) {
        self.pager.set_options(PagerState {
            page: self.page,
            page_size: self.options.page_size.max(1),
            total_rows: self.total_rows,
        });
    }

    fn key_value(&self, row: usize) -> Option<Value> {
        let key = self.options.key_field.as_deref()?;
        self.rows.get(row)?.get(key).cloned()
    }
}

fn redraw_if_consumed(action: LineEditAction) -> DataTableAction {
    match action {
        LineEditAction::Changed | LineEditAction::Moved => DataTableAction::Redraw,
        LineEditAction::Ignored => DataTableAction::None,
    }
}

/// Number columns store a JSON number when the text parses as one; everything else is a string.
fn parse_cell_value(column: &Column, text: &str) -> Value {
    if column.kind == ColumnType::Number {
        if let Ok(n) = text.trim().parse::<i64>() {
            return Value::from(n);
        }
        if let Some(n) = text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
        {
            return Value::Number(n);
        }
    }
    Value::String(text.to_string())
}

fn clamp_cell(cell: Option<Cell>, rows: usize, cols: usize) -> Option<Cell> {
    if rows == 0 || cols == 0 {
        return None;
    }
    cell.map(|c| Cell::new(c.row.min(rows - 1), c.col.min(cols - 1)))
}

#[cfg(test)]
mod tests;
