/// Vertical scroll state of a list-like area measured in rows.
///
/// `y` is the first visible row, `viewport_h` the number of visible rows and `content_h` the
/// number of rows the content has in total.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewportState {
    pub y: u32,
    pub viewport_h: u16,
    pub content_h: u32,
}

impl ViewportState {
    pub fn set_viewport(&mut self, h: u16) {
        self.viewport_h = h;
        self.clamp();
    }

    pub fn set_content(&mut self, h: u32) {
        self.content_h = h;
        self.clamp();
    }

    pub fn clamp(&mut self) {
        self.y = self.y.min(self.max_y());
    }

    /// Scrolls by `delta` rows and returns `true` if the offset changed.
    pub fn scroll_y_by(&mut self, delta: i32) -> bool {
        let before = self.y;
        let next = self.y as i64 + delta as i64;
        self.y = next.clamp(0, self.max_y() as i64) as u32;
        self.y != before
    }

    pub fn to_top(&mut self) {
        self.y = 0;
    }

    pub fn to_bottom(&mut self) {
        self.y = self.max_y();
    }

    /// Scrolls the minimum amount needed for `row` to be visible. Returns `true` if it scrolled.
    pub fn ensure_visible(&mut self, row: u32) -> bool {
        let before = self.y;
        let h = self.viewport_h.max(1) as u32;
        if row < self.y {
            self.y = row;
        } else if row >= self.y.saturating_add(h) {
            self.y = row.saturating_sub(h - 1);
        }
        self.clamp();
        self.y != before
    }

    /// `true` when the last content row is visible (`y + viewport_h >= content_h`).
    pub fn at_bottom(&self) -> bool {
        self.y.saturating_add(self.viewport_h as u32) >= self.content_h
    }

    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let start = self.y as usize;
        let end = (self.y.saturating_add(self.viewport_h as u32)).min(self.content_h) as usize;
        start..end.max(start)
    }

    fn max_y(&self) -> u32 {
        self.content_h.saturating_sub(self.viewport_h as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_offset_to_content() {
        let mut s = ViewportState::default();
        s.set_viewport(5);
        s.set_content(6);
        s.y = 99;
        s.clamp();
        assert_eq!(s.y, 1);
    }

    #[test]
    fn bottom_is_reached_when_last_row_visible() {
        let mut s = ViewportState::default();
        s.set_viewport(3);
        s.set_content(10);
        assert!(!s.at_bottom());
        s.to_bottom();
        assert_eq!(s.y, 7);
        assert!(s.at_bottom());
        assert_eq!(s.visible_range(), 7..10);
    }

    #[test]
    fn short_content_is_always_at_bottom() {
        let mut s = ViewportState::default();
        s.set_viewport(5);
        s.set_content(2);
        assert!(s.at_bottom());
        assert!(!s.scroll_y_by(1));
    }

    #[test]
    fn ensure_visible_scrolls_minimally() {
        let mut s = ViewportState::default();
        s.set_viewport(3);
        s.set_content(20);
        assert!(s.ensure_visible(4));
        assert_eq!(s.y, 2);
        assert!(!s.ensure_visible(3));
        assert!(s.ensure_visible(0));
        assert_eq!(s.y, 0);
    }
}
