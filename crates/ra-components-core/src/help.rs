use crate::keymap::Binding;
use crate::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

#[derive(Clone, Debug)]
pub struct HelpBarOptions {
    pub style: Style,
    pub key_style: Style,
    pub separator: String,
}

impl Default for HelpBarOptions {
    fn default() -> Self {
        Self {
            style: Style::default(),
            key_style: Style::default(),
            separator: " • ".to_string(),
        }
    }
}

/// One-line summary of key bindings: `s sort by column • / filter column`.
#[derive(Clone, Debug, Default)]
pub struct HelpBar {
    bindings: Vec<Binding>,
    options: HelpBarOptions,
}

impl HelpBar {
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self {
            bindings,
            options: HelpBarOptions::default(),
        }
    }

    pub fn with_options(bindings: Vec<Binding>, options: HelpBarOptions) -> Self {
        Self { bindings, options }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let style = if self.options.style == Style::default() {
            theme.text_muted
        } else {
            self.options.style
        };
        let key_style = if self.options.key_style == Style::default() {
            theme.accent
        } else {
            self.options.key_style
        };
        buf.set_style(area, style);
        buf.set_line(area.x, area.y, &self.to_line(style, key_style), area.width);
    }

    fn to_line(&self, style: Style, key_style: Style) -> Line<'static> {
        let mut spans: Vec<Span<'static>> = Vec::new();
        for (i, b) in self.bindings.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(self.options.separator.clone(), style));
            }
            spans.push(Span::styled(b.help_key.clone(), key_style));
            spans.push(Span::styled(" ", style));
            spans.push(Span::styled(b.help_desc.clone(), style));
        }
        Line::from(spans)
    }
}
