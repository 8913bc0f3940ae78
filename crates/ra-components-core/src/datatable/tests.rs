use super::*;
use crate::error::FetchError;
use crate::input::KeyModifiers;
use crate::render::buffer_row_text;
use proptest::prelude::*;
use serde_json::json;

fn row(v: Value) -> Row {
    match v {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

fn people() -> Vec<Row> {
    vec![
        row(json!({"id": 1, "name": "Alice", "age": 30})),
        row(json!({"id": 2, "name": "Bob", "age": 25})),
        row(json!({"id": 3, "name": "Carol", "age": 41})),
    ]
}

fn table() -> DataTable {
    let mut t = DataTable::with_options(DataTableOptions {
        key_field: Some("id".into()),
        ..Default::default()
    });
    t.set_columns(vec![
        Column::new("name", "Name").sortable(),
        Column::new("age", "Age").with_kind(ColumnType::Number),
    ]);
    t.load_rows(people());
    t
}

fn editable() -> DataTable {
    let mut t = table();
    t.set_editable(true);
    t
}

fn key(code: KeyCode) -> InputEvent {
    InputEvent::key(code)
}

fn fetch(action: DataTableAction) -> FetchRequest {
    match action {
        DataTableAction::Fetch(req) => req,
        other => panic!("expected a fetch, got {other:?}"),
    }
}

fn edited(action: DataTableAction) -> EditEvent {
    match action {
        DataTableAction::Edited(e) => e,
        other => panic!("expected an edit, got {other:?}"),
    }
}

/// Columns land at x 0..15 and 16..30; body rows start at y 2.
fn render(t: &mut DataTable) -> Buffer {
    let area = Rect::new(0, 0, 30, 8);
    let mut buf = Buffer::empty(area);
    t.render(area, &mut buf, &Theme::default());
    buf
}

#[test]
fn load_selects_first_cell_and_syncs_pager() {
    let mut t = table();
    assert_eq!(t.row_count(), 3);
    assert_eq!(t.selected_cell(), Some(Cell::new(0, 0)));
    t.load_data(people(), 12, 2);
    assert_eq!(
        t.pager_state(),
        PagerState {
            page: 2,
            page_size: 5,
            total_rows: 12
        }
    );
}

#[test]
fn renders_header_filters_body_and_pager() {
    let mut t = table();
    let buf = render(&mut t);
    assert!(buffer_row_text(&buf, 0).starts_with("Name ↕"));
    assert!(buffer_row_text(&buf, 1).starts_with("Filter"));
    assert!(buffer_row_text(&buf, 2).starts_with("Alice"));
    assert!(buffer_row_text(&buf, 3).contains("25"));
    assert!(buffer_row_text(&buf, 4).starts_with("Carol"));
    assert!(buffer_row_text(&buf, 7).starts_with("‹ Page 1/1 › · 3 rows"));
}

#[test]
fn empty_page_shows_placeholder_row() {
    let mut t = table();
    t.load_data(Vec::new(), 0, 1);
    assert_eq!(t.selected_cell(), None);
    let buf = render(&mut t);
    assert!(buffer_row_text(&buf, 2).starts_with("No data found"));
}

#[test]
fn arrows_move_and_clamp() {
    let mut t = table();
    assert_eq!(t.handle_event(&key(KeyCode::Up)), DataTableAction::None);
    assert_eq!(t.handle_event(&key(KeyCode::Left)), DataTableAction::None);
    t.handle_event(&key(KeyCode::Right));
    t.handle_event(&key(KeyCode::Right));
    t.handle_event(&key(KeyCode::Down));
    t.handle_event(&key(KeyCode::Down));
    t.handle_event(&key(KeyCode::Down));
    assert_eq!(t.selected_cell(), Some(Cell::new(2, 1)));
}

#[test]
fn sorting_toggles_and_fetches_each_time() {
    let mut t = table();
    let req = fetch(t.handle_event(&InputEvent::char('s')));
    assert_eq!(req.sort_field.as_deref(), Some("name"));
    assert_eq!(req.sort_direction, SortDirection::Asc);
    let req = fetch(t.handle_event(&InputEvent::char('s')));
    assert_eq!(req.sort_direction, SortDirection::Desc);
    let req = fetch(t.sort_by("name"));
    assert_eq!(req.sort_direction, SortDirection::Asc);

    // Age is not sortable.
    t.handle_event(&key(KeyCode::Right));
    assert_eq!(t.handle_event(&InputEvent::char('s')), DataTableAction::None);
}

#[test]
fn header_click_sorts_and_shows_icon() {
    let mut t = table();
    render(&mut t);
    let req = fetch(t.handle_event(&InputEvent::click(2, 0)));
    assert_eq!(req.sort_field.as_deref(), Some("name"));
    let buf = render(&mut t);
    assert!(buffer_row_text(&buf, 0).starts_with("Name ↑"));
    assert_eq!(t.handle_event(&InputEvent::click(18, 0)), DataTableAction::None);
}

#[test]
fn fetch_cycle_applies_latest_response_only() {
    let mut t = table();
    let first = fetch(t.set_page(2));
    let second = fetch(t.set_page(3));
    assert!(t.is_loading());

    let stale = FetchReply::ok(
        first.token,
        FetchResponse {
            items: vec![row(json!({"name": "Stale"}))],
            total: 20,
            page: 2,
        },
    );
    assert_eq!(t.complete_fetch(stale), DataTableAction::None);
    assert_eq!(t.cell_text(0, 0).as_deref(), Some("Alice"));

    let fresh = FetchReply::ok(
        second.token,
        FetchResponse {
            items: vec![row(json!({"name": "Zed", "age": 9}))],
            total: 11,
            page: 3,
        },
    );
    assert_eq!(t.complete_fetch(fresh), DataTableAction::Redraw);
    assert_eq!(t.cell_text(0, 0).as_deref(), Some("Zed"));
    assert_eq!(t.pager_state().page, 3);
    assert_eq!(t.pager_state().total_rows, 11);
    assert!(!t.is_loading());
}

#[test]
fn failed_fetch_keeps_current_page() {
    let mut t = table();
    let req = fetch(t.set_page(2));
    let reply = FetchReply::err(req.token, FetchError::rejected("offline"));
    assert_eq!(t.complete_fetch(reply), DataTableAction::None);
    assert_eq!(t.row_count(), 3);
    assert!(!t.is_loading());
}

#[test]
fn page_keys_go_through_the_paginator() {
    let mut t = table();
    t.load_data(people(), 12, 1);
    assert_eq!(t.handle_event(&key(KeyCode::PageUp)), DataTableAction::None);
    let req = fetch(t.handle_event(&key(KeyCode::PageDown)));
    assert_eq!(req.page, 2);
    assert_eq!(req.page_size, 5);
}

#[test]
fn filter_commits_on_enter_only_when_changed() {
    let mut t = table();
    assert_eq!(t.handle_event(&InputEvent::char('/')), DataTableAction::Redraw);
    assert_eq!(t.filter_editing(), Some(0));
    assert_eq!(t.handle_event(&InputEvent::char('A')), DataTableAction::Redraw);
    let req = fetch(t.handle_event(&key(KeyCode::Enter)));
    assert_eq!(
        req.filters,
        vec![FilterEntry {
            field: "name".into(),
            value: "A".into(),
            opt: FilterOp::Eq,
        }]
    );
    assert_eq!(t.filter_editing(), None);

    t.handle_event(&InputEvent::char('/'));
    assert_eq!(t.handle_event(&key(KeyCode::Enter)), DataTableAction::Redraw);
}

#[test]
fn filter_commits_on_blur_and_esc_abandons() {
    let mut t = table();
    render(&mut t);
    t.handle_event(&InputEvent::click(2, 1));
    assert_eq!(t.filter_editing(), Some(0));
    t.handle_event(&InputEvent::Paste("Bo".into()));
    let req = fetch(t.handle_event(&InputEvent::click(2, 3)));
    assert_eq!(req.filters[0].value, "Bo");
    // The blur click is consumed.
    assert_eq!(t.selected_cell(), Some(Cell::new(0, 0)));

    t.handle_event(&InputEvent::char('/'));
    t.handle_event(&InputEvent::char('x'));
    assert_eq!(t.handle_event(&key(KeyCode::Esc)), DataTableAction::Redraw);
    assert_eq!(t.filters().get("name").map(|f| f.text.as_str()), Some("Bo"));
}

#[test]
fn filter_blur_outside_the_table_clears_selection() {
    let mut t = table();
    render(&mut t);
    t.handle_event(&InputEvent::click(2, 1));
    t.handle_event(&InputEvent::char('A'));
    let req = fetch(t.handle_event(&InputEvent::click(50, 50)));
    assert_eq!(req.filters[0].value, "A");
    assert_eq!(t.filter_editing(), None);
    assert_eq!(t.selected_cell(), None);
}

#[test]
fn enter_commits_edit_and_moves_to_next_cell() {
    let mut t = editable();
    assert_eq!(t.handle_event(&key(KeyCode::Enter)), DataTableAction::Redraw);
    assert_eq!(t.editing_cell(), Some(Cell::new(0, 0)));
    assert_eq!(t.editor_text(), Some("Alice"));

    t.handle_event(&key(KeyCode::Backspace));
    t.handle_event(&InputEvent::Paste("ce!".into()));
    let e = edited(t.handle_event(&key(KeyCode::Enter)));
    assert_eq!(
        e,
        EditEvent {
            row_index: 0,
            key_value: Some(json!(1)),
            field: "name".into(),
            value: json!("Alicce!"),
            previous: json!("Alice"),
            field_format: None,
            display_format: None,
        }
    );
    assert_eq!(t.cell_text(0, 0).as_deref(), Some("Alicce!"));
    assert_eq!(t.editing_cell(), Some(Cell::new(0, 1)));
    assert_eq!(t.editor_text(), Some("30"));
}

#[test]
fn number_edits_store_numbers() {
    let mut t = editable();
    t.handle_event(&key(KeyCode::Right));
    t.handle_event(&key(KeyCode::Enter));
    t.handle_event(&key(KeyCode::Backspace));
    t.handle_event(&key(KeyCode::Backspace));
    // Letters are rejected by the number editor.
    t.handle_event(&InputEvent::char('x'));
    t.handle_event(&InputEvent::char('4'));
    t.handle_event(&InputEvent::char('2'));
    let e = edited(t.handle_event(&key(KeyCode::Enter)));
    assert_eq!(e.value, json!(42));
    assert_eq!(t.rows()[0]["age"], json!(42));
}

#[test]
fn tab_and_shift_tab_wrap_in_row_major_order() {
    let mut t = editable();
    t.handle_event(&key(KeyCode::Enter));
    t.handle_event(&key(KeyCode::BackTab));
    assert_eq!(t.editing_cell(), Some(Cell::new(2, 1)));
    t.handle_event(&key(KeyCode::Tab));
    assert_eq!(t.editing_cell(), Some(Cell::new(0, 0)));
    let shift_tab =
        InputEvent::Key(KeyEvent::new(KeyCode::Tab).with_modifiers(KeyModifiers::shift()));
    t.handle_event(&shift_tab);
    assert_eq!(t.editing_cell(), Some(Cell::new(2, 1)));
}

#[test]
fn escape_discards_edit_silently() {
    let mut t = editable();
    t.handle_event(&key(KeyCode::Enter));
    t.handle_event(&InputEvent::char('Z'));
    assert_eq!(t.handle_event(&key(KeyCode::Esc)), DataTableAction::Redraw);
    assert_eq!(t.editing_cell(), None);
    assert_eq!(t.selected_cell(), None);
    assert_eq!(t.cell_text(0, 0).as_deref(), Some("Alice"));
}

#[test]
fn focus_lost_commits_without_moving() {
    let mut t = editable();
    t.handle_event(&key(KeyCode::Enter));
    t.handle_event(&InputEvent::char('!'));
    let e = edited(t.handle_event(&InputEvent::FocusLost));
    assert_eq!(e.value, json!("Alice!"));
    assert_eq!(t.editing_cell(), None);
    assert_eq!(t.selected_cell(), Some(Cell::new(0, 0)));
}

#[test]
fn clicks_select_or_edit_depending_on_mode() {
    let mut t = table();
    render(&mut t);
    assert_eq!(t.handle_event(&InputEvent::click(17, 3)), DataTableAction::Redraw);
    assert_eq!(t.selected_cell(), Some(Cell::new(1, 1)));
    assert_eq!(t.editing_cell(), None);

    t.set_editable(true);
    t.handle_event(&InputEvent::click(1, 4));
    assert_eq!(t.editing_cell(), Some(Cell::new(2, 0)));

    // Clicking another cell commits the open edit and edits the new one.
    t.handle_event(&InputEvent::char('?'));
    let e = edited(t.handle_event(&InputEvent::click(1, 2)));
    assert_eq!(e.row_index, 2);
    assert_eq!(e.value, json!("Carol?"));
    assert_eq!(t.editing_cell(), Some(Cell::new(0, 0)));
}

#[test]
fn click_outside_clears_selection() {
    let mut t = table();
    render(&mut t);
    assert_eq!(t.handle_event(&InputEvent::click(50, 50)), DataTableAction::Redraw);
    assert_eq!(t.selected_cell(), None);
    assert_eq!(t.handle_event(&key(KeyCode::Down)), DataTableAction::None);
}

#[test]
fn turning_edit_mode_off_discards_open_edit() {
    let mut t = editable();
    t.handle_event(&key(KeyCode::Enter));
    t.handle_event(&InputEvent::char('!'));
    t.set_editable(false);
    assert_eq!(t.editing_cell(), None);
    assert_eq!(t.cell_text(0, 0).as_deref(), Some("Alice"));
    assert_eq!(t.handle_event(&key(KeyCode::Enter)), DataTableAction::None);
}

#[test]
fn date_columns_report_formats_and_redisplay() {
    let mut t = DataTable::new();
    t.set_columns(vec![
        Column::new("born", "Born")
            .with_kind(ColumnType::Date)
            .with_date_format("yyyy-MM-dd", "dd/MM/yyyy"),
    ]);
    t.load_rows(vec![row(json!({"born": "2024-05-25"}))]);
    t.set_editable(true);
    assert_eq!(t.cell_text(0, 0).as_deref(), Some("25/05/2024"));

    t.handle_event(&key(KeyCode::Enter));
    assert_eq!(t.editor_text(), Some("2024-05-25"));
    t.handle_event(&key(KeyCode::Backspace));
    t.handle_event(&InputEvent::char('6'));
    let e = edited(t.handle_event(&InputEvent::FocusLost));
    assert_eq!(e.key_value, None);
    assert_eq!(e.field_format.as_deref(), Some("yyyy-MM-dd"));
    assert_eq!(e.display_format.as_deref(), Some("dd/MM/yyyy"));
    assert_eq!(t.cell_text(0, 0).as_deref(), Some("26/05/2024"));
}

#[test]
fn slash_dates_keep_their_separators_when_edited() {
    let mut t = DataTable::new();
    t.set_columns(vec![
        Column::new("born", "Born")
            .with_kind(ColumnType::Date)
            .with_date_format("dd/MM/yyyy", "dd/MM/yyyy"),
    ]);
    t.load_rows(vec![row(json!({"born": "25/05/2024"}))]);
    t.set_editable(true);

    t.handle_event(&key(KeyCode::Enter));
    for _ in 0..5 {
        t.handle_event(&key(KeyCode::Backspace));
    }
    for c in "/2025".chars() {
        t.handle_event(&InputEvent::char(c));
    }
    let e = edited(t.handle_event(&InputEvent::FocusLost));
    assert_eq!(e.value, json!("25/05/2025"));
    assert_eq!(t.cell_text(0, 0).as_deref(), Some("25/05/2025"));
}

#[test]
fn set_columns_clamps_selection() {
    let mut t = table();
    t.handle_event(&key(KeyCode::Right));
    t.set_columns(vec![Column::new("name", "Name")]);
    assert_eq!(t.selected_cell(), Some(Cell::new(0, 0)));
}

#[test]
fn options_validate_and_load_from_config() {
    assert_eq!(
        DataTable::try_with_options(DataTableOptions {
            page_size: 0,
            ..Default::default()
        })
        .unwrap_err(),
        OptionsError::ZeroPageSize
    );
    assert_eq!(
        DataTableOptions {
            key_field: Some(String::new()),
            ..Default::default()
        }
        .validate(),
        Err(OptionsError::EmptyKeyField)
    );

    let cfg: TableConfig = serde_json::from_str(r#"{"pageSize": 20, "keyField": "id"}"#).unwrap();
    let opts = DataTableOptions::from(cfg);
    assert_eq!(opts.page, 1);
    assert_eq!(opts.page_size, 20);
    assert_eq!(opts.key_field.as_deref(), Some("id"));
}

proptest! {
    #[test]
    fn navigation_stays_in_grid(
        rows in 1usize..8,
        cols in 1usize..5,
        moves in proptest::collection::vec(0u8..4, 0..60),
    ) {
        let mut t = DataTable::new();
        t.set_columns((0..cols).map(|c| Column::new(format!("c{c}"), "")).collect());
        t.load_rows((0..rows).map(|r| row(json!({"c0": r}))).collect());
        for m in moves {
            let code = match m {
                0 => KeyCode::Up,
                1 => KeyCode::Down,
                2 => KeyCode::Left,
                _ => KeyCode::Right,
            };
            t.handle_event(&key(code));
            let cell = t.selected_cell().unwrap();
            prop_assert!(cell.row < rows && cell.col < cols);
        }
    }
}

/// Jumps straight to the last page on any click.
struct LastPagePager {
    state: PagerState,
}

impl Paginator for LastPagePager {
    fn set_options(&mut self, state: PagerState) {
        self.state = state;
    }

    fn state(&self) -> PagerState {
        self.state
    }

    fn handle_event(&mut self, event: &InputEvent) -> PagerAction {
        match event {
            InputEvent::Mouse(_) => PagerAction::PageChanged(self.state.total_pages()),
            _ => PagerAction::None,
        }
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, _theme: &Theme) {
        let text = format!("[{} of {}]", self.state.page, self.state.total_pages());
        buf.set_string(area.x, area.y, text, Style::default());
    }
}

#[test]
fn custom_paginator_drives_the_fetch_cycle() {
    let mut t = table().with_paginator(LastPagePager {
        state: PagerState::default(),
    });
    t.load_data(people(), 12, 1);

    let buf = render(&mut t);
    assert!(buffer_row_text(&buf, 7).starts_with("[1 of 3]"));

    assert_eq!(fetch(t.handle_event(&key(KeyCode::PageDown))).page, 2);
    assert_eq!(fetch(t.handle_event(&InputEvent::click(2, 7))).page, 3);
}
