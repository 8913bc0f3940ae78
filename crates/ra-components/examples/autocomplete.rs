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
use ra_components::autocomplete::AutocompleteAction;
use ra_components::autocomplete::AutocompleteOptions;
use ra_components::autocomplete::Item;
use ra_components::autocomplete::SearchRequest;
use ra_components::autocomplete::mount::AttachedAutocomplete;
use ra_components::autocomplete::mount::AutocompleteElement;
use ra_components::crossterm_input::input_event_from_crossterm;
use ra_components::error::FetchError;
use ra_components::fetch::SearchSource;
use ra_components::fetch::resolve_search;
use ra_components::input::InputEvent;
use ra_components::input::KeyCode;
use ra_components::theme::Theme;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Widget;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const FRUIT: &[&str] = &[
    "Apple", "Apricot", "Avocado", "Banana", "Blackberry", "Blueberry", "Cherry", "Coconut",
    "Cranberry", "Date", "Dragonfruit", "Durian", "Elderberry", "Fig", "Gooseberry", "Grape",
    "Grapefruit", "Guava", "Kiwi", "Kumquat", "Lemon", "Lime", "Lychee", "Mango", "Melon",
    "Mulberry", "Nectarine", "Olive", "Orange", "Papaya", "Passionfruit", "Peach", "Pear",
    "Persimmon", "Pineapple", "Plum", "Pomegranate", "Quince", "Raspberry", "Strawberry",
    "Tangerine", "Watermelon",
];

/// Case-insensitive substring match over [`FRUIT`], paged.
struct FruitSource;

impl SearchSource for FruitSource {
    fn search(&self, request: SearchRequest) -> BoxFuture<'_, Result<Vec<Item>, FetchError>> {
        async move {
            let needle = request.query.to_lowercase();
            let skip = (request.page.saturating_sub(1) * request.page_size) as usize;
            Ok(FRUIT
                .iter()
                .enumerate()
                .filter(|(_, name)| name.to_lowercase().contains(&needle))
                .skip(skip)
                .take(request.page_size as usize)
                .map(|(i, name)| Item::new(i.to_string(), *name))
                .collect())
        }
        .boxed()
    }
}

fn main() -> io::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(tracing_appender::rolling::never(".", "autocomplete-demo.log"))
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
    let source = FruitSource;

    let mut element = AutocompleteElement::new(AutocompleteOptions {
        placeholder: "Type a fruit...".into(),
        page_size: 5,
        ..Default::default()
    })
    .with_label("Element");
    element.set_focused(true);

    let mut attached = AttachedAutocomplete::new(AutocompleteOptions {
        page_size: 5,
        item_template: Some(Arc::new(|item: &Item| {
            Line::from(vec![
                Span::raw(item.text.clone()),
                Span::raw(format!("  #{}", item.id)).dark_gray(),
            ])
        })),
        ..Default::default()
    });

    let mut status = String::from("Click a field to focus it. Ctrl+C quits.");

    loop {
        terminal.draw(|f| {
            let area = f.area();
            let buf = f.buffer_mut();

            let frame = Block::bordered().title("autocomplete demo");
            let inner = frame.inner(area);
            frame.render(area, buf);

            let container = Rect::new(
                inner.x + 40,
                inner.y,
                30.min(inner.width.saturating_sub(40)),
                8,
            );
            Block::bordered().title("Attached").render(container, buf);
            let slot = Block::bordered().inner(container);
            if attached.layout().map(|l| l.bounds) != Some(slot) {
                attached.attach(slot);
            }
            attached.render(buf);

            buf.set_string(
                inner.x,
                inner.bottom().saturating_sub(1),
                &status,
                theme.text_muted,
            );
            // Drawn last: its dropdown overlays whatever is below it.
            element.render(Rect::new(inner.x, inner.y, 36.min(inner.width), 3), buf);
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
        // Every widget sees every event; hit testing keeps them apart.
        let actions = [element.handle_event(&event), attached.handle_event(&event)];
        for (which, action) in actions.into_iter().enumerate() {
            match action {
                AutocompleteAction::Search(req) => {
                    let response = block_on(resolve_search(&source, req));
                    if which == 0 {
                        element.complete_search(response);
                    } else {
                        attached.complete_search(response);
                    }
                }
                AutocompleteAction::ValueChanged(item) => {
                    status = format!("selected {} (id {})", item.text, item.id);
                }
                AutocompleteAction::Redraw | AutocompleteAction::None => {}
            }
        }
    }
}
