use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use unicode_width::UnicodeWidthChar;

use crate::viewport::ViewportState;

/// Draws a one-column scrollbar for `state` into `area`.
pub fn render_scrollbar(area: Rect, buf: &mut Buffer, state: &ViewportState, style: Style) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    buf.set_style(area, style);
    if state.content_h <= state.viewport_h as u32 || state.content_h == 0 {
        return;
    }

    let track_h = area.height as f64;
    let thumb_h = ((state.viewport_h as f64 / state.content_h as f64) * track_h)
        .round()
        .clamp(1.0, track_h) as u16;

    let max_y = state
        .content_h
        .saturating_sub(state.viewport_h as u32)
        .max(1) as f64;
    let thumb_top = ((state.y as f64 / max_y) * (track_h - thumb_h as f64))
        .round()
        .clamp(0.0, (track_h - thumb_h as f64).max(0.0)) as u16;

    for dy in 0..area.height {
        let ch = if dy >= thumb_top && dy < thumb_top + thumb_h {
            "█"
        } else {
            "│"
        };
        buf.set_stringn(area.x, area.y + dy, ch, 1, style);
    }
}

/// Writes `input` at `(x, y)`, skipping the first `start_col` display columns and writing at
/// most `max_cols` columns. Wide characters that would straddle either edge are dropped.
pub fn render_str_clipped(
    x: u16,
    y: u16,
    start_col: u32,
    max_cols: u16,
    buf: &mut Buffer,
    input: &str,
    style: Style,
) {
    let visible = slice_by_cols(input, start_col, max_cols);
    if visible.is_empty() {
        return;
    }
    buf.set_stringn(x, y, &visible, max_cols as usize, style);
}

/// Draws a styled line clipped to `area`'s first row.
pub fn render_line_clipped(area: Rect, buf: &mut Buffer, line: &Line<'_>) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    buf.set_line(area.x, area.y, line, area.width);
}

pub fn slice_by_cols(input: &str, start_col: u32, max_cols: u16) -> String {
    if max_cols == 0 {
        return String::new();
    }

    let start_col = start_col as usize;
    let max_cols = max_cols as usize;
    let mut col = 0usize;
    let mut out_cols = 0usize;
    let mut out = String::new();

    for ch in input.chars() {
        let ch = if ch == '\t' || ch == '\n' { ' ' } else { ch };
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if w == 0 {
            continue;
        }
        if col < start_col {
            col += w;
            continue;
        }
        if out_cols + w > max_cols {
            break;
        }
        out.push(ch);
        col += w;
        out_cols += w;
    }

    out
}

/// Reads back the symbols of one buffer row, mostly useful in tests and snapshots.
pub fn buffer_row_text(buf: &Buffer, y: u16) -> String {
    let area = buf.area;
    let mut out = String::new();
    for x in area.x..area.x + area.width {
        if let Some(cell) = buf.cell((x, y)) {
            out.push_str(cell.symbol());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_by_cols_limits_width_and_skips_prefix() {
        assert_eq!(slice_by_cols("\t1", 0, 4), " 1");
        assert_eq!(slice_by_cols("abcdef", 0, 3), "abc");
        assert_eq!(slice_by_cols("abcdef", 2, 3), "cde");
    }

    #[test]
    fn slice_by_cols_drops_partial_wide_chars() {
        assert_eq!(slice_by_cols("你好", 0, 3), "你");
        assert_eq!(slice_by_cols("你好", 2, 2), "好");
    }

    #[test]
    fn clipped_text_lands_in_buffer() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 1));
        render_str_clipped(1, 0, 2, 3, &mut buf, "abcdef", Style::default());
        assert_eq!(buffer_row_text(&buf, 0), " cde  ");
    }

    #[test]
    fn scrollbar_thumb_follows_the_viewport() {
        let mut state = ViewportState::default();
        state.set_viewport(5);
        state.set_content(50);
        let area = Rect::new(0, 0, 1, 5);
        let mut buf = Buffer::empty(area);
        render_scrollbar(area, &mut buf, &state, Style::default());
        assert_eq!(buffer_row_text(&buf, 0), "█");
        assert_eq!(buffer_row_text(&buf, 4), "│");

        state.to_bottom();
        let mut buf = Buffer::empty(area);
        render_scrollbar(area, &mut buf, &state, Style::default());
        assert_eq!(buffer_row_text(&buf, 0), "│");
        assert_eq!(buffer_row_text(&buf, 4), "█");
    }
}
