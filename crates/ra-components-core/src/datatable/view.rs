use super::Cell;
use super::Column;
use super::DataTable;
use super::SortDirection;
use crate::render;
use crate::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;

/// Horizontal extent of one column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSpan {
    pub x: u16,
    pub width: u16,
}

/// Where the table placed each of its parts during the last render.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableLayout {
    pub area: Rect,
    pub header: Rect,
    pub filters: Rect,
    pub body: Rect,
    pub pager: Rect,
    pub columns: Vec<ColumnSpan>,
}

impl TableLayout {
    /// Splits `area` into header, filter, body and pager rows. `scrollbar` reserves the last body
    /// column.
    pub fn compute(area: Rect, columns: &[Column], scrollbar: bool) -> Self {
        let row = |offset: u16, h: u16| {
            if offset < area.height {
                Rect::new(area.x, area.y + offset, area.width, h.min(area.height - offset))
            } else {
                Rect::new(area.x, area.bottom(), area.width, 0)
            }
        };
        let body_h = area.height.saturating_sub(3);
        let pager = if area.height >= 3 {
            Rect::new(area.x, area.bottom() - 1, area.width, 1)
        } else {
            Rect::new(area.x, area.bottom(), area.width, 0)
        };
        let content_w = if scrollbar {
            area.width.saturating_sub(1)
        } else {
            area.width
        };

        let mut spans = Vec::with_capacity(columns.len());
        let mut x = area.x;
        let right = area.x + content_w;
        for width in column_widths(columns, content_w) {
            let visible = width.min(right.saturating_sub(x));
            spans.push(ColumnSpan { x, width: visible });
            x = x.saturating_add(width).saturating_add(1).min(right);
        }

        Self {
            area,
            header: row(0, 1),
            filters: row(1, 1),
            body: row(2, body_h),
            pager,
            columns: spans,
        }
    }

    pub fn column_at(&self, x: u16) -> Option<usize> {
        self.columns
            .iter()
            .position(|s| s.width > 0 && x >= s.x && x < s.x + s.width)
    }
}

/// Fixed columns keep their width; the others share what is left, one separator between each.
pub fn column_widths(columns: &[Column], available: u16) -> Vec<u16> {
    if columns.is_empty() {
        return Vec::new();
    }
    let separators = columns.len() as u16 - 1;
    let space = available.saturating_sub(separators);
    let fixed: u16 = columns
        .iter()
        .filter_map(|c| c.width)
        .fold(0u16, u16::saturating_add);
    let auto = columns.iter().filter(|c| c.width.is_none()).count() as u16;
    let (share, mut extra) = if auto == 0 {
        (0, 0)
    } else {
        let free = space.saturating_sub(fixed);
        (free / auto, free % auto)
    };

    columns
        .iter()
        .map(|c| match c.width {
            Some(w) => w,
            None => {
                let bonus = u16::from(extra > 0);
                extra = extra.saturating_sub(1);
                share + bonus
            }
        })
        .collect()
}

pub(super) fn render(table: &mut DataTable, area: Rect, buf: &mut Buffer, theme: &Theme) {
    if area.width == 0 || area.height == 0 {
        table.layout = None;
        return;
    }

    let body_h = area.height.saturating_sub(3);
    table.body.set_viewport(body_h);
    table.body.set_content(table.rows.len() as u32);
    let scrollbar = table.options.show_scrollbar
        && body_h > 0
        && area.width >= 2
        && table.rows.len() > body_h as usize;
    let layout = TableLayout::compute(area, &table.columns, scrollbar);

    let opts = &table.options;
    let header_style = pick(opts.header_style, theme.header);
    let cell_style = pick(opts.cell_style, theme.text_primary);
    let selected_style = pick(opts.selected_style, theme.selected);
    let editing_style = pick(opts.editing_style, theme.editing);
    let separator_style = pick(opts.separator_style, theme.border);

    buf.set_style(area, cell_style);

    if layout.header.height > 0 {
        buf.set_style(layout.header, header_style);
        for (column, span) in table.columns.iter().zip(&layout.columns) {
            let mut title = column.header.clone();
            if column.sortable {
                title.push(' ');
                title.push_str(sort_icon(table.sort.direction_of(&column.field)));
            }
            render::render_str_clipped(
                span.x,
                layout.header.y,
                0,
                span.width,
                buf,
                &title,
                header_style,
            );
        }
        draw_separators(&layout, layout.header.y, buf, separator_style);
    }

    if layout.filters.height > 0 {
        let y = layout.filters.y;
        for (i, (column, span)) in table.columns.iter().zip(&layout.columns).enumerate() {
            let rect = Rect::new(span.x, y, span.width, 1);
            match table.filter_edit.as_mut().filter(|e| e.col == i) {
                Some(edit) => edit.editor.render(rect, buf, theme.input, None, true),
                None => match table.filters.get(&column.field).filter(|f| !f.text.is_empty()) {
                    Some(f) => render::render_str_clipped(
                        rect.x,
                        y,
                        0,
                        rect.width,
                        buf,
                        &f.text,
                        theme.input,
                    ),
                    None => render::render_str_clipped(
                        rect.x,
                        y,
                        0,
                        rect.width,
                        buf,
                        &opts.filter_placeholder,
                        theme.placeholder,
                    ),
                },
            }
        }
        draw_separators(&layout, y, buf, separator_style);
    }

    if layout.body.height > 0 {
        if table.rows.is_empty() {
            render::render_str_clipped(
                layout.body.x,
                layout.body.y,
                0,
                layout.body.width,
                buf,
                &opts.empty_text,
                theme.text_muted,
            );
        } else {
            let formatter = opts.date_formatter.as_ref();
            for (dy, r) in table.body.visible_range().enumerate() {
                let Some(record) = table.rows.get(r) else {
                    break;
                };
                let y = layout.body.y + dy as u16;
                for (c, (column, span)) in table.columns.iter().zip(&layout.columns).enumerate() {
                    let rect = Rect::new(span.x, y, span.width, 1);
                    let cell = Cell::new(r, c);
                    if let Some(edit) = table.editing.as_mut().filter(|e| e.cell == cell) {
                        edit.editor.render(rect, buf, editing_style, None, true);
                        continue;
                    }
                    if table.selected == Some(cell) {
                        buf.set_style(rect, selected_style);
                    }
                    let text = column.display_text(record.get(&column.field), formatter);
                    let style = if table.selected == Some(cell) {
                        selected_style
                    } else {
                        cell_style
                    };
                    render::render_str_clipped(rect.x, y, 0, rect.width, buf, &text, style);
                }
                draw_separators(&layout, y, buf, separator_style);
            }
        }

        if scrollbar {
            render::render_scrollbar(
                Rect::new(area.right() - 1, layout.body.y, 1, layout.body.height),
                buf,
                &table.body,
                theme.text_muted,
            );
        }
    }

    if layout.pager.height > 0 {
        table.pager.render(layout.pager, buf, theme);
    }
    table.layout = Some(layout);
}

fn sort_icon(direction: Option<SortDirection>) -> &'static str {
    match direction {
        None => "↕",
        Some(SortDirection::Asc) => "↑",
        Some(SortDirection::Desc) => "↓",
    }
}

fn draw_separators(layout: &TableLayout, y: u16, buf: &mut Buffer, style: Style) {
    let right = layout.area.right();
    for span in layout.columns.iter().take(layout.columns.len().saturating_sub(1)) {
        let x = span.x + span.width;
        if span.width == 0 || x >= right {
            continue;
        }
        buf.set_span(x, y, &Span::styled("│", style), 1);
    }
}

fn pick(own: Style, fallback: Style) -> Style {
    if own == Style::default() {
        fallback
    } else {
        own
    }
}
