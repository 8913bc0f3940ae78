//! `ra-components-core` provides data-entry widgets for terminal UIs built on `ratatui`.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: you drive input + rendering from your app.
//! - No async runtime: loading data is requested through returned actions, and the app hands
//!   the answers back. The [`fetch`] traits help when the app already has async sources.
//! - Hit testing is scoped to each widget's own bounds, so every event can be routed to every
//!   widget.
//!
//! ## Getting started
//!
//! Most users should depend on the facade crate `ra-components`. Useful entry points:
//! - [`autocomplete::mount::AutocompleteElement`]: bordered input with an overlay dropdown.
//! - [`autocomplete::mount::AttachedAutocomplete`]: the same engine drawn into a host rectangle.
//! - [`datatable::DataTable`]: paginated table with sorting, filters and inline editing.
//!
//! ## Loading data
//!
//! ```ignore
//! match table.handle_event(&event) {
//!     DataTableAction::Fetch(req) => {
//!         let reply = block_on(resolve_fetch(&source, req));
//!         table.complete_fetch(reply);
//!     }
//!     DataTableAction::Edited(edit) => save(edit),
//!     _ => {}
//! }
//! ```
pub mod theme;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

pub mod render;
pub mod viewport;

pub mod date_format;
pub mod error;
pub mod fetch;
pub mod help;
pub mod input;
pub mod keymap;
pub mod line_edit;

pub mod autocomplete;
pub mod datatable;
