//! Autocomplete and data table components for `ratatui` applications.
//!
//! This crate re-exports [`ra_components_core`]; see its documentation for the design. Enable the
//! `crossterm` feature for [`crossterm_input`], which converts crossterm events into
//! [`input::InputEvent`].
pub use ra_components_core::autocomplete;
#[cfg(feature = "crossterm")]
pub use ra_components_core::crossterm_input;
pub use ra_components_core::datatable;
pub use ra_components_core::date_format;
pub use ra_components_core::error;
pub use ra_components_core::fetch;
pub use ra_components_core::help;
pub use ra_components_core::input;
pub use ra_components_core::keymap;
pub use ra_components_core::line_edit;
pub use ra_components_core::render;
pub use ra_components_core::theme;
pub use ra_components_core::viewport;

/// The types most applications need.
pub mod prelude {
    pub use crate::autocomplete::AutocompleteAction;
    pub use crate::autocomplete::AutocompleteOptions;
    pub use crate::autocomplete::Item;
    pub use crate::autocomplete::SearchRequest;
    pub use crate::autocomplete::SearchResponse;
    pub use crate::autocomplete::mount::AttachedAutocomplete;
    pub use crate::autocomplete::mount::AutocompleteElement;
    pub use crate::datatable::Column;
    pub use crate::datatable::ColumnType;
    pub use crate::datatable::DataTable;
    pub use crate::datatable::DataTableAction;
    pub use crate::datatable::DataTableOptions;
    pub use crate::datatable::EditEvent;
    pub use crate::datatable::FetchReply;
    pub use crate::datatable::FetchRequest;
    pub use crate::datatable::FetchResponse;
    pub use crate::datatable::Row;
    pub use crate::error::FetchError;
    pub use crate::fetch::DataSource;
    pub use crate::fetch::SearchSource;
    pub use crate::fetch::resolve_fetch;
    pub use crate::fetch::resolve_search;
    pub use crate::input::InputEvent;
    pub use crate::theme::Theme;
}
