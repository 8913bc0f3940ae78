//! Page navigation collaborator of the data table.

use crate::input::InputEvent;
use crate::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PagerState {
    /// 1-based.
    pub page: u32,
    pub page_size: u32,
    pub total_rows: u64,
}

impl Default for PagerState {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 5,
            total_rows: 0,
        }
    }
}

impl PagerState {
    /// Number of pages, never less than one.
    pub fn total_pages(&self) -> u32 {
        let size = self.page_size.max(1) as u64;
        self.total_rows.div_ceil(size).clamp(1, u32::MAX as u64) as u32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagerAction {
    None,
    /// The user asked for this page. The pager does not move by itself; the owner fetches the
    /// page and resyncs the pager with [`Paginator::set_options`] once it is loaded.
    PageChanged(u32),
}

/// The contract the data table needs from its paginator.
pub trait Paginator: Send {
    fn set_options(&mut self, state: PagerState);

    fn state(&self) -> PagerState;

    fn next_page(&self) -> PagerAction {
        let s = self.state();
        if s.page < s.total_pages() {
            PagerAction::PageChanged(s.page + 1)
        } else {
            PagerAction::None
        }
    }

    fn prev_page(&self) -> PagerAction {
        let s = self.state();
        if s.page > 1 {
            PagerAction::PageChanged(s.page - 1)
        } else {
            PagerAction::None
        }
    }

    /// Mouse input, hit-tested against the last render.
    fn handle_event(&mut self, event: &InputEvent) -> PagerAction;

    fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme);
}

/// One-line pager: `‹ Page 2/7 › · 34 rows`.
#[derive(Clone, Debug, Default)]
pub struct PagerBar {
    state: PagerState,
    prev: Option<Rect>,
    next: Option<Rect>,
}

impl PagerBar {
    pub fn new(state: PagerState) -> Self {
        Self {
            state,
            prev: None,
            next: None,
        }
    }
}

impl Paginator for PagerBar {
    fn set_options(&mut self, state: PagerState) {
        self.state = state;
    }

    fn state(&self) -> PagerState {
        self.state
    }

    fn handle_event(&mut self, event: &InputEvent) -> PagerAction {
        let InputEvent::Mouse(mouse) = event else {
            return PagerAction::None;
        };
        if !mouse.is_left_click() {
            return PagerAction::None;
        }
        if self.prev.is_some_and(|r| mouse.is_inside(r)) {
            return self.prev_page();
        }
        if self.next.is_some_and(|r| mouse.is_inside(r)) {
            return self.next_page();
        }
        PagerAction::None
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        self.prev = None;
        self.next = None;
        if area.width == 0 || area.height == 0 {
            return;
        }

        let pages = self.state.total_pages();
        let page = self.state.page;
        let arrow = |enabled: bool| {
            if enabled {
                theme.accent
            } else {
                theme.text_muted
            }
        };
        let label = format!(" Page {page}/{pages} ");
        let summary = format!(" · {} rows", self.state.total_rows);
        let line = Line::from(vec![
            Span::styled("‹", arrow(page > 1)),
            Span::styled(label.clone(), theme.text_primary),
            Span::styled("›", arrow(page < pages)),
            Span::styled(summary, theme.text_muted),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);

        self.prev = Some(Rect::new(area.x, area.y, 1, 1));
        let next_x = area.x as u32 + 1 + label.width() as u32;
        if next_x < area.right() as u32 {
            self.next = Some(Rect::new(next_x as u16, area.y, 1, 1));
        }
    }
}
