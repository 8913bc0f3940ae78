//! The two ways of putting an [`Autocomplete`] on screen.

use super::Autocomplete;
use super::AutocompleteAction;
use super::AutocompleteOptions;
use super::SearchResponse;
use super::view;
use super::view::AutocompleteLayout;
use crate::input::InputEvent;
use crate::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Block;
use ratatui::widgets::Clear;
use ratatui::widgets::Widget;
use tracing::debug;

/// Self-contained autocomplete: draws its own bordered input and, below it, an overlay list
/// clipped to the frame.
///
/// Give it a rectangle at least three rows tall for the input; the dropdown extends past that
/// rectangle, so render it after whatever it may cover.
pub struct AutocompleteElement {
    engine: Autocomplete,
    theme: Theme,
    label: Option<String>,
    focused: bool,
    layout: Option<AutocompleteLayout>,
}

impl Default for AutocompleteElement {
    fn default() -> Self {
        Self::new(AutocompleteOptions::default())
    }
}

impl AutocompleteElement {
    pub fn new(options: AutocompleteOptions) -> Self {
        Self {
            engine: Autocomplete::with_options(options),
            theme: Theme::default(),
            label: None,
            focused: false,
            layout: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn engine(&self) -> &Autocomplete {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Autocomplete {
        &mut self.engine
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Layout of the last render, if any.
    pub fn layout(&self) -> Option<AutocompleteLayout> {
        self.layout
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> AutocompleteAction {
        match event {
            InputEvent::Mouse(mouse) => {
                let Some(layout) = self.layout else {
                    return AutocompleteAction::None;
                };
                let (action, focus) = view::handle_mouse(&mut self.engine, &layout, mouse);
                if let Some(f) = focus {
                    self.focused = f;
                }
                action
            }
            InputEvent::FocusLost => {
                self.focused = false;
                AutocompleteAction::Redraw
            }
            _ if self.focused => self.engine.handle_event(event),
            _ => AutocompleteAction::None,
        }
    }

    pub fn complete_search(&mut self, response: SearchResponse) -> AutocompleteAction {
        self.engine.complete_search(response)
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height == 0 {
            self.layout = None;
            return;
        }
        let border = if self.focused {
            self.theme.accent
        } else {
            self.theme.border
        };

        let input_box = Rect::new(area.x, area.y, area.width, area.height.min(3));
        let mut block = Block::bordered().border_style(border);
        if let Some(label) = &self.label {
            block = block.title(label.as_str());
        }
        let inner = block.inner(input_box);
        block.render(input_box, buf);
        view::render_input(&mut self.engine, inner, buf, &self.theme, self.focused);

        let mut layout = AutocompleteLayout {
            bounds: input_box,
            input: inner,
            list: None,
        };

        if self.engine.is_open() {
            let wanted = (self.engine.items().len() as u16)
                .min(self.engine.options().max_visible.max(1))
                .saturating_add(2);
            let top = input_box.bottom();
            let available = buf.area.bottom().saturating_sub(top);
            let h = wanted.min(available);
            if h > 2 {
                let outer = Rect::new(input_box.x, top, input_box.width, h);
                Clear.render(outer, buf);
                let list_block = Block::bordered().border_style(border);
                let list_inner = list_block.inner(outer);
                list_block.render(outer, buf);
                view::render_list(&mut self.engine, list_inner, buf, &self.theme);
                layout.list = Some(list_inner);
                layout.bounds = input_box.union(outer);
            }
        }

        self.layout = Some(layout);
    }
}

/// Autocomplete bound to a container rectangle owned by the host.
///
/// The input takes the container's first row and the suggestions the rows below it. Until
/// [`attach`](Self::attach) is called, and after [`detach`](Self::detach), the adapter ignores
/// every event and draws nothing.
pub struct AttachedAutocomplete {
    engine: Autocomplete,
    theme: Theme,
    container: Option<Rect>,
    focused: bool,
}

impl Default for AttachedAutocomplete {
    fn default() -> Self {
        Self::new(AutocompleteOptions::default())
    }
}

impl AttachedAutocomplete {
    pub fn new(options: AutocompleteOptions) -> Self {
        Self {
            engine: Autocomplete::with_options(options),
            theme: Theme::default(),
            container: None,
            focused: false,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Binds the widget to `container`. Calling it again moves or resizes the widget.
    pub fn attach(&mut self, container: Rect) {
        debug!(?container, "autocomplete attached");
        self.container = Some(container);
    }

    /// Unbinds the widget and closes its list.
    pub fn detach(&mut self) {
        debug!("autocomplete detached");
        self.container = None;
        self.focused = false;
        self.engine.close();
    }

    pub fn is_attached(&self) -> bool {
        self.container.is_some()
    }

    pub fn engine(&self) -> &Autocomplete {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Autocomplete {
        &mut self.engine
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused && self.container.is_some();
    }

    pub fn layout(&self) -> Option<AutocompleteLayout> {
        let container = self.container?;
        if container.width == 0 || container.height == 0 {
            return None;
        }
        let input = Rect::new(container.x, container.y, container.width, 1);
        let list = if self.engine.is_open() && container.height > 1 {
            let h = (container.height - 1).min(self.engine.options().max_visible.max(1));
            Some(Rect::new(container.x, container.y + 1, container.width, h))
        } else {
            None
        };
        Some(AutocompleteLayout {
            bounds: container,
            input,
            list,
        })
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> AutocompleteAction {
        let Some(layout) = self.layout() else {
            return AutocompleteAction::None;
        };
        match event {
            InputEvent::Mouse(mouse) => {
                if let Some(list) = layout.list {
                    self.engine.set_list_height(list.height);
                }
                let (action, focus) = view::handle_mouse(&mut self.engine, &layout, mouse);
                if let Some(f) = focus {
                    self.focused = f;
                }
                action
            }
            InputEvent::FocusLost => {
                self.focused = false;
                AutocompleteAction::Redraw
            }
            _ if self.focused => self.engine.handle_event(event),
            _ => AutocompleteAction::None,
        }
    }

    /// Answers to searches are accepted even while detached so the loading gate is released.
    pub fn complete_search(&mut self, response: SearchResponse) -> AutocompleteAction {
        self.engine.complete_search(response)
    }

    pub fn render(&mut self, buf: &mut Buffer) {
        let Some(layout) = self.layout() else {
            return;
        };
        Clear.render(layout.bounds, buf);
        view::render_input(&mut self.engine, layout.input, buf, &self.theme, self.focused);
        if let Some(list) = layout.list {
            view::render_list(&mut self.engine, list, buf, &self.theme);
        }
    }
}
