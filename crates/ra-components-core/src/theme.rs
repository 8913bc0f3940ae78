use ratatui::style::Modifier;
use ratatui::style::Style;

/// Shared palette for the widgets in this crate.
///
/// Widget options fall back to these styles whenever their own style is left at
/// `Style::default()`.
#[derive(Clone, Debug)]
pub struct Theme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub accent: Style,
    pub border: Style,
    pub header: Style,
    pub input: Style,
    pub placeholder: Style,
    pub selected: Style,
    pub editing: Style,
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Stylize;

        Self {
            text_primary: Style::default(),
            text_muted: Style::default().dark_gray(),
            accent: Style::default().cyan(),
            border: Style::default().dark_gray(),
            header: Style::default().add_modifier(Modifier::BOLD),
            input: Style::default(),
            placeholder: Style::default().dark_gray().italic(),
            selected: Style::default().add_modifier(Modifier::REVERSED),
            editing: Style::default().yellow().add_modifier(Modifier::UNDERLINED),
        }
    }
}
