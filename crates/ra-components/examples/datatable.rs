use crossterm::event::DisableFocusChange;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableFocusChange;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use futures::FutureExt;
use futures::executor::block_on;
use futures::future::BoxFuture;
use ra_components::crossterm_input::input_event_from_crossterm;
use ra_components::datatable::Column;
use ra_components::datatable::ColumnType;
use ra_components::datatable::DataTable;
use ra_components::datatable::DataTableAction;
use ra_components::datatable::DataTableOptions;
use ra_components::datatable::EditEvent;
use ra_components::datatable::FetchRequest;
use ra_components::datatable::FetchResponse;
use ra_components::datatable::Row;
use ra_components::datatable::SortDirection;
use ra_components::datatable::value_text;
use ra_components::error::FetchError;
use ra_components::fetch::DataSource;
use ra_components::fetch::resolve_fetch;
use ra_components::help::HelpBar;
use ra_components::input::InputEvent;
use ra_components::input::KeyCode;
use ra_components::theme::Theme;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Constraint;
use ratatui::layout::Layout;
use ratatui::widgets::Block;
use ratatui::widgets::Widget;
use serde_json::Value;
use serde_json::json;
use std::cmp::Ordering;
use std::io;
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// In-memory backend: filters by case-insensitive substring, sorts, then pages.
struct PeopleSource {
    rows: Mutex<Vec<Row>>,
}

impl PeopleSource {
    fn new() -> Self {
        let names = [
            ("Alice", 31, "1993-04-12"),
            ("Bob", 27, "1997-11-02"),
            ("Carol", 45, "1979-06-30"),
            ("Dave", 38, "1986-01-19"),
            ("Eve", 23, "2001-09-08"),
            ("Frank", 52, "1972-03-25"),
            ("Grace", 36, "1988-12-14"),
            ("Heidi", 29, "1995-07-21"),
            ("Ivan", 41, "1983-02-05"),
            ("Judy", 33, "1991-10-27"),
            ("Mallory", 47, "1977-05-16"),
            ("Niaj", 25, "1999-08-03"),
        ];
        let rows = names
            .iter()
            .enumerate()
            .filter_map(|(i, (name, age, born))| {
                json!({ "id": i + 1, "name": name, "age": age, "born": born })
                    .as_object()
                    .cloned()
            })
            .collect();
        Self {
            rows: Mutex::new(rows),
        }
    }

    fn apply_edit(&self, edit: &EditEvent) {
        let Some(key) = &edit.key_value else {
            return;
        };
        let Ok(mut rows) = self.rows.lock() else {
            return;
        };
        if let Some(row) = rows.iter_mut().find(|r| r.get("id") == Some(key)) {
            row.insert(edit.field.clone(), edit.value.clone());
        }
    }

    fn query(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| FetchError::rejected("people store poisoned"))?;
        let mut matched: Vec<Row> = rows
            .iter()
            .filter(|row| {
                request.filters.iter().all(|f| {
                    let cell = row.get(&f.field).map(value_text).unwrap_or_default();
                    cell.to_lowercase().contains(&f.value.to_lowercase())
                })
            })
            .cloned()
            .collect();
        if let Some(field) = &request.sort_field {
            matched.sort_by(|a, b| {
                let ord = compare(a.get(field), b.get(field));
                match request.sort_direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }
        let total = matched.len() as u64;
        let skip = (request.page.saturating_sub(1) * request.page_size) as usize;
        Ok(FetchResponse {
            items: matched
                .into_iter()
                .skip(skip)
                .take(request.page_size as usize)
                .collect(),
            total,
            page: request.page,
        })
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a.and_then(Value::as_f64), b.and_then(Value::as_f64)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => {
            let x = a.map(value_text).unwrap_or_default();
            let y = b.map(value_text).unwrap_or_default();
            x.cmp(&y)
        }
    }
}

impl DataSource for PeopleSource {
    fn fetch(&self, request: FetchRequest) -> BoxFuture<'_, Result<FetchResponse, FetchError>> {
        async move { self.query(&request) }.boxed()
    }
}

fn main() -> io::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(tracing_appender::rolling::never(".", "datatable-demo.log"))
        .with_ansi(false)
        .try_init();

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal);

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;
    res
}

fn run<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>) -> io::Result<()> {
    let theme = Theme::default();
    let source = PeopleSource::new();

    let options = DataTableOptions {
        key_field: Some("id".to_string()),
        ..Default::default()
    };
    let help = HelpBar::new(options.bindings.all());
    let mut table = DataTable::with_options(options);
    table.set_columns(vec![
        Column::new("id", "ID").with_kind(ColumnType::Number).with_width(4),
        Column::new("name", "Name").sortable(),
        Column::new("age", "Age")
            .sortable()
            .with_kind(ColumnType::Number),
        Column::new("born", "Born")
            .with_kind(ColumnType::Date)
            .with_date_format("yyyy-MM-dd", "dd/MM/yyyy"),
    ]);
    table.set_editable(true);

    let mut pending = match table.set_page(1) {
        DataTableAction::Fetch(req) => Some(req),
        _ => None,
    };

    loop {
        if let Some(req) = pending.take() {
            let reply = block_on(resolve_fetch(&source, req));
            table.complete_fetch(reply);
        }

        terminal.draw(|f| {
            let area = f.area();
            let buf = f.buffer_mut();
            let frame = Block::bordered().title("datatable demo · Ctrl+C quits");
            let inner = frame.inner(area);
            frame.render(area, buf);

            let [body, footer] =
                Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);
            table.render(body, buf, &theme);
            help.render(footer, buf, &theme);
        })?;

        if !crossterm::event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Some(event) = input_event_from_crossterm(crossterm::event::read()?) else {
            continue;
        };
        if let InputEvent::Key(key) = &event {
            if key.modifiers.ctrl && key.code == KeyCode::Char('c') {
                return Ok(());
            }
        }

        match table.handle_event(&event) {
            DataTableAction::Fetch(req) => pending = Some(req),
            DataTableAction::Edited(edit) => {
                info!(field = %edit.field, value = %edit.value, "cell edited");
                source.apply_edit(&edit);
            }
            DataTableAction::Redraw | DataTableAction::None => {}
        }
    }
}
