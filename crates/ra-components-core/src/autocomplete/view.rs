//! Rendering and hit testing shared by both autocomplete adapters.

use super::Autocomplete;
use super::AutocompleteAction;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;
use crate::render;
use crate::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;

/// Where an adapter placed the input and the list during the last render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AutocompleteLayout {
    /// Everything that counts as "inside" the widget for outside-click detection.
    pub bounds: Rect,
    pub input: Rect,
    /// Rows available to suggestions; `None` while the list is closed.
    pub list: Option<Rect>,
}

impl AutocompleteLayout {
    fn contains(&self, mouse: &MouseEvent) -> bool {
        mouse.is_inside(self.bounds) || self.list.is_some_and(|l| mouse.is_inside(l))
    }
}

pub(crate) fn render_input(
    engine: &mut Autocomplete,
    area: Rect,
    buf: &mut Buffer,
    theme: &Theme,
    focused: bool,
) {
    let style = pick(engine.options().input_style, theme.input);
    let placeholder = engine.options().placeholder.clone();
    engine
        .input_mut()
        .render(
            area,
            buf,
            style,
            Some((placeholder.as_str(), theme.placeholder)),
            focused,
        );
}

/// Draws the visible slice of suggestions into `area`.
pub(crate) fn render_list(engine: &mut Autocomplete, area: Rect, buf: &mut Buffer, theme: &Theme) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    engine.set_list_height(area.height);

    let base = pick(engine.options().list_style, theme.text_primary);
    let selected_style = pick(engine.options().selected_style, theme.selected);
    let viewport = *engine.list_viewport();
    let show_scrollbar = engine.options().show_scrollbar
        && viewport.content_h > viewport.viewport_h as u32
        && area.width >= 2;
    let rows_area = if show_scrollbar {
        Rect::new(area.x, area.y, area.width - 1, area.height)
    } else {
        area
    };

    buf.set_style(area, base);
    let template = engine.options().item_template.clone();
    for (dy, idx) in viewport.visible_range().enumerate() {
        let Some(item) = engine.items().get(idx) else {
            break;
        };
        let row = Rect::new(rows_area.x, rows_area.y + dy as u16, rows_area.width, 1);
        if engine.selected_index() == Some(idx) {
            buf.set_style(row, selected_style);
        }
        let line = match &template {
            Some(t) => t(item),
            None => Line::raw(item.text.clone()),
        };
        render::render_line_clipped(row, buf, &line);
    }

    if show_scrollbar {
        render::render_scrollbar(
            Rect::new(area.x + area.width - 1, area.y, 1, area.height),
            buf,
            &viewport,
            theme.text_muted,
        );
    }
}

/// Routes a mouse event given the adapter's last layout.
///
/// Returns the action and whether the widget should now hold focus (`Some(true)` for a click
/// inside, `Some(false)` for a click outside).
pub(crate) fn handle_mouse(
    engine: &mut Autocomplete,
    layout: &AutocompleteLayout,
    mouse: &MouseEvent,
) -> (AutocompleteAction, Option<bool>) {
    match mouse.kind {
        MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
            let over_list = layout.list.is_some_and(|l| mouse.is_inside(l));
            if !over_list {
                return (AutocompleteAction::None, None);
            }
            let delta = if mouse.kind == MouseEventKind::ScrollDown {
                1
            } else {
                -1
            };
            (engine.scroll_list(delta), None)
        }
        _ if mouse.is_left_click() => {
            if !layout.contains(mouse) {
                return (engine.close(), Some(false));
            }
            if let Some(list) = layout.list.filter(|l| mouse.is_inside(*l)) {
                let idx = engine.list_viewport().y as usize + (mouse.y - list.y) as usize;
                return (engine.select_item(idx), Some(true));
            }
            (AutocompleteAction::Redraw, Some(true))
        }
        _ => (AutocompleteAction::None, None),
    }
}

fn pick(own: Style, fallback: Style) -> Style {
    if own == Style::default() {
        fallback
    } else {
        own
    }
}
