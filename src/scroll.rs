//! Scroll coupling between the editor pane and the preview pane.
//!
//! The two panes hold different renderings of the same document, so their
//! heights differ. Mirroring is proportional: the source pane's scroll
//! fraction is reapplied to the target pane's own scroll range. The link is
//! one-way, the preview never scrolls the editor.

/// Scroll position of one pane, measured in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaneMetrics {
    /// First visible row.
    pub scroll_top: usize,
    /// Total rows of content.
    pub content_height: usize,
    /// Rows visible at once.
    pub view_height: usize,
}

impl PaneMetrics {
    pub fn new(scroll_top: usize, content_height: usize, view_height: usize) -> Self {
        Self {
            scroll_top,
            content_height,
            view_height,
        }
    }

    /// Largest valid `scroll_top`. Zero when the content fits the viewport.
    pub fn max_scroll(&self) -> usize {
        self.content_height.saturating_sub(self.view_height)
    }

    /// How far down the scrollable range this pane sits, in `0.0..=1.0`.
    /// A pane whose content fits its viewport reports `0.0`.
    pub fn fraction(&self) -> f64 {
        let range = self.max_scroll();
        if range == 0 {
            return 0.0;
        }
        self.scroll_top as f64 / range as f64
    }

    /// True when the bottom of the content is within `threshold` rows of
    /// the viewport's lower edge. Used to decide whether the panes should
    /// follow appended content.
    pub fn near_bottom(&self, threshold: usize) -> bool {
        self.scroll_top + self.view_height + threshold >= self.content_height
    }
}

/// Scroll position that puts the target pane at the same relative depth as
/// the source pane.
pub fn mirror(source: PaneMetrics, target: PaneMetrics) -> usize {
    (source.fraction() * target.max_scroll() as f64).round() as usize
}

/// Scroll position that pins a pane to its bottom.
pub fn bottom(target: PaneMetrics) -> usize {
    target.max_scroll()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_zero_when_content_fits() {
        let pane = PaneMetrics::new(0, 80, 100);
        assert_eq!(pane.fraction(), 0.0);
        assert_eq!(pane.max_scroll(), 0);
    }

    #[test]
    fn test_mirror_is_proportional() {
        // Halfway down a 200-row document in a 100-row viewport lands
        // halfway down the target's own range.
        let source = PaneMetrics::new(50, 200, 100);
        let target = PaneMetrics::new(0, 400, 100);
        assert_eq!(mirror(source, target), 150);
    }

    #[test]
    fn test_mirror_endpoints() {
        let target = PaneMetrics::new(0, 400, 100);
        let top = PaneMetrics::new(0, 200, 100);
        let bottom_src = PaneMetrics::new(100, 200, 100);
        assert_eq!(mirror(top, target), 0);
        assert_eq!(mirror(bottom_src, target), 300);
    }

    #[test]
    fn test_mirror_when_target_fits_viewport() {
        let source = PaneMetrics::new(50, 200, 100);
        let target = PaneMetrics::new(0, 40, 100);
        assert_eq!(mirror(source, target), 0);
    }

    #[test]
    fn test_mirror_when_source_fits_viewport() {
        let source = PaneMetrics::new(0, 20, 100);
        let target = PaneMetrics::new(0, 400, 100);
        assert_eq!(mirror(source, target), 0);
    }

    #[test]
    fn test_near_bottom_within_threshold() {
        // 3 rows hidden below the fold, threshold 3.
        let pane = PaneMetrics::new(97, 200, 100);
        assert!(pane.near_bottom(3));
        assert!(PaneMetrics::new(100, 200, 100).near_bottom(0));
    }

    #[test]
    fn test_near_bottom_far_from_bottom() {
        let pane = PaneMetrics::new(10, 200, 100);
        assert!(!pane.near_bottom(3));
    }

    #[test]
    fn test_bottom_pins_to_max_scroll() {
        assert_eq!(bottom(PaneMetrics::new(0, 400, 100)), 300);
        assert_eq!(bottom(PaneMetrics::new(0, 40, 100)), 0);
    }
}
