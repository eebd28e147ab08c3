//! Scroll bookkeeping for the transcript pane.
//!
//! The offset counts rows from the top of the laid-out transcript. While
//! `auto_scroll` is set the renderer pins the view to the bottom so newly
//! appended turns are visible; any manual upward scroll releases the pin and
//! scrolling back to the bottom restores it.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    offset: u16,
    max_offset: u16,
    auto_scroll: bool,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0,
            max_offset: 0,
            auto_scroll: true,
        }
    }
}

/// Largest offset that still fills the viewport.
pub fn max_scroll_offset(total_lines: usize, available_height: u16) -> u16 {
    let total = total_lines.min(u16::MAX as usize) as u16;
    total.saturating_sub(available_height)
}

impl ScrollState {
    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn is_auto(&self) -> bool {
        self.auto_scroll
    }

    /// Clamp against the latest layout and return the offset to draw with.
    pub fn sync(&mut self, total_lines: usize, available_height: u16) -> u16 {
        self.max_offset = max_scroll_offset(total_lines, available_height);
        if self.auto_scroll {
            self.offset = self.max_offset;
        } else {
            self.offset = self.offset.min(self.max_offset);
        }
        self.offset
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.auto_scroll = false;
        self.offset = self.offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.offset = self.offset.saturating_add(lines).min(self.max_offset);
        if self.offset >= self.max_offset {
            self.auto_scroll = true;
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset;
        self.auto_scroll = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_offset_saturates_when_content_fits() {
        assert_eq!(max_scroll_offset(5, 10), 0);
        assert_eq!(max_scroll_offset(25, 10), 15);
    }

    #[test]
    fn auto_scroll_follows_growing_content() {
        let mut scroll = ScrollState::default();
        assert_eq!(scroll.sync(30, 10), 20);
        assert_eq!(scroll.sync(40, 10), 30);
    }

    #[test]
    fn manual_scroll_releases_and_bottom_restores_pin() {
        let mut scroll = ScrollState::default();
        scroll.sync(30, 10);

        scroll.scroll_up(5);
        assert!(!scroll.is_auto());
        assert_eq!(scroll.sync(40, 10), 15);

        scroll.scroll_down(100);
        assert!(scroll.is_auto());
        assert_eq!(scroll.offset(), 30);
    }

    #[test]
    fn scroll_to_bottom_re_enables_auto_scroll() {
        let mut scroll = ScrollState::default();
        scroll.sync(50, 10);
        scroll.scroll_up(20);
        scroll.scroll_to_bottom();
        assert!(scroll.is_auto());
        assert_eq!(scroll.offset(), 40);
    }
}
