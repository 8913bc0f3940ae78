use crate::date_format::DateFormatter;
use crate::error::FetchError;
use crate::line_edit::InputKind;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// One record, keyed by column field.
pub type Row = serde_json::Map<String, Value>;

/// Turns a raw cell value into display text.
pub type CellFormatter = Arc<dyn Fn(&Value) -> String + Send + Sync>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Date,
}

impl ColumnType {
    /// Character set of the inline editor for cells of this type.
    pub fn input_kind(self) -> InputKind {
        match self {
            ColumnType::Text => InputKind::Text,
            ColumnType::Number => InputKind::Number,
            ColumnType::Date => InputKind::Date,
        }
    }
}

#[derive(Clone, Default)]
pub enum DisplayFormat {
    #[default]
    Raw,
    /// Reformat a stored date (`field_format`) for display (`display_format`).
    Date {
        field_format: String,
        display_format: String,
    },
    Custom(CellFormatter),
}

impl fmt::Debug for DisplayFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayFormat::Raw => f.write_str("Raw"),
            DisplayFormat::Date {
                field_format,
                display_format,
            } => f
                .debug_struct("Date")
                .field("field_format", field_format)
                .field("display_format", display_format)
                .finish(),
            DisplayFormat::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Column configuration for [`DataTable`](super::DataTable).
#[derive(Clone, Debug, Default)]
pub struct Column {
    pub field: String,
    pub header: String,
    pub sortable: bool,
    pub kind: ColumnType,
    pub display: DisplayFormat,
    /// Fixed width in cells; columns without one share the remaining space.
    pub width: Option<u16>,
}

impl Column {
    pub fn new(field: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            header: header.into(),
            ..Self::default()
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn with_kind(mut self, kind: ColumnType) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_date_format(
        mut self,
        field_format: impl Into<String>,
        display_format: impl Into<String>,
    ) -> Self {
        self.display = DisplayFormat::Date {
            field_format: field_format.into(),
            display_format: display_format.into(),
        };
        self
    }

    pub fn with_formatter(mut self, f: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        self.display = DisplayFormat::Custom(Arc::new(f));
        self
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn field_format(&self) -> Option<&str> {
        match &self.display {
            DisplayFormat::Date { field_format, .. } => Some(field_format.as_str()),
            _ => None,
        }
    }

    pub fn display_format(&self) -> Option<&str> {
        match &self.display {
            DisplayFormat::Date { display_format, .. } => Some(display_format.as_str()),
            _ => None,
        }
    }

    /// Display text of `value` under this column's format. Missing values render empty.
    pub fn display_text(&self, value: Option<&Value>, dates: &dyn DateFormatter) -> String {
        match &self.display {
            DisplayFormat::Raw => value.map(value_text).unwrap_or_default(),
            DisplayFormat::Date {
                field_format,
                display_format,
            } => {
                let raw = value.map(value_text).unwrap_or_default();
                dates.convert(&raw, field_format, display_format)
            }
            DisplayFormat::Custom(f) => f(value.unwrap_or(&Value::Null)),
        }
    }
}

/// Plain text of a JSON value: strings unquoted, `null` empty, everything else as JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// The single active sort.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortState {
    pub field: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    /// Sorting the active field again flips asc to desc; anything else starts at asc.
    pub fn sort_by(&mut self, field: &str) {
        let direction =
            if self.field.as_deref() == Some(field) && self.direction == SortDirection::Asc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
        self.field = Some(field.to_string());
        self.direction = direction;
    }

    pub fn direction_of(&self, field: &str) -> Option<SortDirection> {
        (self.field.as_deref() == Some(field)).then_some(self.direction)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    #[default]
    #[serde(rename = "=")]
    Eq,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    pub text: String,
    pub opt: FilterOp,
}

/// Per-field filters in the order they were first set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filters {
    entries: Vec<(String, FilterState)>,
}

impl Filters {
    pub fn set(&mut self, field: &str, text: impl Into<String>) {
        let state = FilterState {
            text: text.into(),
            opt: FilterOp::Eq,
        };
        match self.entries.iter_mut().find(|(f, _)| f.as_str() == field) {
            Some((_, existing)) => *existing = state,
            None => self.entries.push((field.to_string(), state)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FilterState> {
        self.entries
            .iter()
            .find(|(f, _)| f.as_str() == field)
            .map(|(_, state)| state)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterState)> {
        self.entries.iter().map(|(f, s)| (f.as_str(), s))
    }

    pub fn to_entries(&self) -> Vec<FilterEntry> {
        self.iter()
            .map(|(field, state)| FilterEntry {
                field: field.to_string(),
                value: state.text.clone(),
                opt: state.opt,
            })
            .collect()
    }
}

/// One filter as sent to the data source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterEntry {
    pub field: String,
    pub value: String,
    pub opt: FilterOp,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FetchToken(pub u64);

/// A page of rows the host should load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    #[serde(skip)]
    pub token: FetchToken,
    pub page: u32,
    pub page_size: u32,
    pub sort_field: Option<String>,
    pub sort_direction: SortDirection,
    pub filters: Vec<FilterEntry>,
}

/// One page of data from the source.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchResponse {
    pub items: Vec<Row>,
    pub total: u64,
    pub page: u32,
}

/// The host's answer to a [`FetchRequest`].
#[derive(Clone, Debug, PartialEq)]
pub struct FetchReply {
    pub token: FetchToken,
    pub result: Result<FetchResponse, FetchError>,
}

impl FetchReply {
    pub fn ok(token: FetchToken, response: FetchResponse) -> Self {
        Self {
            token,
            result: Ok(response),
        }
    }

    pub fn err(token: FetchToken, error: FetchError) -> Self {
        Self {
            token,
            result: Err(error),
        }
    }
}

/// A body cell address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A committed cell edit.
#[derive(Clone, Debug, PartialEq)]
pub struct EditEvent {
    pub row_index: usize,
    /// Value of the configured key field in the edited row, if any.
    pub key_value: Option<Value>,
    pub field: String,
    pub value: Value,
    pub previous: Value,
    pub field_format: Option<String>,
    pub display_format: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_format::PatternDateFormatter;
    use serde_json::json;

    #[test]
    fn sort_toggles_on_same_field_and_resets_on_another() {
        let mut s = SortState::default();
        s.sort_by("name");
        assert_eq!(s.direction_of("name"), Some(SortDirection::Asc));
        s.sort_by("name");
        assert_eq!(s.direction_of("name"), Some(SortDirection::Desc));
        s.sort_by("name");
        assert_eq!(s.direction_of("name"), Some(SortDirection::Asc));
        s.sort_by("name");
        s.sort_by("age");
        assert_eq!(s.direction_of("age"), Some(SortDirection::Asc));
        assert_eq!(s.direction_of("name"), None);
    }

    #[test]
    fn filters_keep_insertion_order_and_overwrite_in_place() {
        let mut f = Filters::default();
        f.set("b", "1");
        f.set("a", "2");
        f.set("b", "3");
        let fields: Vec<_> = f.iter().map(|(k, s)| (k, s.text.as_str())).collect();
        assert_eq!(fields, vec![("b", "3"), ("a", "2")]);
    }

    #[test]
    fn fetch_request_wire_format() {
        let mut filters = Filters::default();
        filters.set("name", "Al");
        let req = FetchRequest {
            token: FetchToken(3),
            page: 2,
            page_size: 5,
            sort_field: None,
            sort_direction: SortDirection::Asc,
            filters: filters.to_entries(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "page": 2,
                "pageSize": 5,
                "sortField": null,
                "sortDirection": "asc",
                "filters": [{"field": "name", "value": "Al", "opt": "="}],
            })
        );
    }

    #[test]
    fn fetch_response_parses() {
        let resp: FetchResponse = serde_json::from_value(json!({
            "items": [{"name": "Alice"}],
            "total": 11,
            "page": 3,
        }))
        .unwrap();
        assert_eq!(resp.total, 11);
        assert_eq!(resp.items[0]["name"], json!("Alice"));
    }

    #[test]
    fn display_text_by_format() {
        let dates = PatternDateFormatter;
        let raw = Column::new("n", "N");
        assert_eq!(raw.display_text(Some(&json!(42)), &dates), "42");
        assert_eq!(raw.display_text(Some(&json!("x")), &dates), "x");
        assert_eq!(raw.display_text(None, &dates), "");

        let date = Column::new("d", "D").with_date_format("yyyy-MM-dd", "dd/MM/yyyy");
        assert_eq!(
            date.display_text(Some(&json!("2024-05-25")), &dates),
            "25/05/2024"
        );
        assert_eq!(date.field_format(), Some("yyyy-MM-dd"));

        let custom = Column::new("p", "P").with_formatter(|v| format!("${}", value_text(v)));
        assert_eq!(custom.display_text(Some(&json!(3)), &dates), "$3");
    }
}
