//! Scroll geometry: offsets, extents and relative progress
//!
//! Everything here is plain arithmetic on the three quantities a scroll
//! container exposes: where its content is displaced to, how large the
//! content is, and how large the visible viewport is.

use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Axis
// ─────────────────────────────────────────────────────────────────────────────

/// One of the two scroll axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal (scroll left)
    X,
    /// Vertical (scroll top)
    Y,
}

impl Axis {
    /// Both axes, horizontal first.
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// Get a display label for the axis.
    pub fn label(&self) -> &'static str {
        match self {
            Axis::X => "horizontal",
            Axis::Y => "vertical",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Offset and Extent
// ─────────────────────────────────────────────────────────────────────────────

/// Displacement of content within a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset {
    pub x: f32,
    pub y: f32,
}

impl ScrollOffset {
    pub const ZERO: ScrollOffset = ScrollOffset { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component on the given axis.
    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Set the component on the given axis.
    pub fn set(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }

    /// Copy with one component replaced.
    pub fn with(mut self, axis: Axis, value: f32) -> Self {
        self.set(axis, value);
        self
    }
}

/// A width/height pair (content size or viewport size).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Length along the given axis.
    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scroll Metrics
// ─────────────────────────────────────────────────────────────────────────────

/// Snapshot of a scroll container's state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Current scroll offset
    pub offset: ScrollOffset,
    /// Total scrollable content extent
    pub content: Extent,
    /// Visible extent
    pub viewport: Extent,
}

impl ScrollMetrics {
    pub fn new(offset: ScrollOffset, content: Extent, viewport: Extent) -> Self {
        Self {
            offset,
            content,
            viewport,
        }
    }

    /// Maximum meaningful offset on `axis`, never negative.
    pub fn range(&self, axis: Axis) -> f32 {
        scroll_range(self.content.get(axis), self.viewport.get(axis))
    }

    /// Whether the container can scroll at all on `axis`.
    pub fn is_scrollable(&self, axis: Axis) -> bool {
        self.range(axis) > 0.0
    }

    /// Offset divided by range, in `[0, 1]`. Zero when there is no range.
    pub fn progress(&self, axis: Axis) -> f32 {
        relative_progress(self.offset.get(axis), self.range(axis))
    }

    /// Offset that puts this container at `progress` on `axis`.
    ///
    /// Returns `None` when the container has no range on that axis, since
    /// there is nothing to set.
    pub fn offset_for_progress(&self, axis: Axis, progress: f32) -> Option<f32> {
        let range = self.range(axis);
        if range <= 0.0 {
            return None;
        }
        Some((progress.clamp(0.0, 1.0) * range).round())
    }

    /// Clamp `value` into `[0, range]` for `axis`.
    pub fn clamp_offset(&self, axis: Axis, value: f32) -> f32 {
        clamp_to_range(value, self.range(axis))
    }

    /// Clamp both offset components into range.
    pub fn clamped(mut self) -> Self {
        for axis in Axis::ALL {
            let value = self.clamp_offset(axis, self.offset.get(axis));
            self.offset.set(axis, value);
        }
        self
    }
}

/// `content - viewport`, clamped to be non-negative. Non-finite sizes have no range.
pub fn scroll_range(content: f32, viewport: f32) -> f32 {
    if !content.is_finite() || !viewport.is_finite() || content <= viewport {
        return 0.0;
    }
    content - viewport
}

/// Relative progress of `offset` within `range`.
pub fn relative_progress(offset: f32, range: f32) -> f32 {
    if range <= 0.0 || offset.is_nan() {
        return 0.0;
    }
    (offset / range).clamp(0.0, 1.0)
}

fn clamp_to_range(value: f32, range: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, range.max(0.0))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(offset: (f32, f32), content: (f32, f32), viewport: (f32, f32)) -> ScrollMetrics {
        ScrollMetrics::new(
            ScrollOffset::new(offset.0, offset.1),
            Extent::new(content.0, content.1),
            Extent::new(viewport.0, viewport.1),
        )
    }

    #[test]
    fn test_scroll_range() {
        assert_eq!(scroll_range(2000.0, 400.0), 1600.0);
        assert_eq!(scroll_range(400.0, 400.0), 0.0);
        assert_eq!(scroll_range(300.0, 400.0), 0.0);
        assert_eq!(scroll_range(f32::NAN, 400.0), 0.0);
        assert_eq!(scroll_range(f32::INFINITY, 400.0), 0.0);
        assert_eq!(scroll_range(2000.0, f32::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_progress() {
        let m = metrics((0.0, 800.0), (400.0, 2000.0), (400.0, 400.0));
        assert_eq!(m.progress(Axis::Y), 0.5);
        // No horizontal range: progress is defined as zero
        assert_eq!(m.progress(Axis::X), 0.0);
        assert!(!m.is_scrollable(Axis::X));
        assert!(m.is_scrollable(Axis::Y));
    }

    #[test]
    fn test_offset_for_progress_rounds() {
        let m = metrics((0.0, 0.0), (100.0, 1200.0), (100.0, 400.0));
        assert_eq!(m.offset_for_progress(Axis::Y, 0.5), Some(400.0));
        assert_eq!(m.offset_for_progress(Axis::Y, 1.0 / 3.0), Some(267.0));
        assert_eq!(m.offset_for_progress(Axis::X, 0.5), None);
    }

    #[test]
    fn test_offset_for_progress_clamps_input() {
        let m = metrics((0.0, 0.0), (100.0, 500.0), (100.0, 100.0));
        assert_eq!(m.offset_for_progress(Axis::Y, 1.7), Some(400.0));
        assert_eq!(m.offset_for_progress(Axis::Y, -0.2), Some(0.0));
    }

    #[test]
    fn test_clamped() {
        let m = metrics((-5.0, 900.0), (300.0, 1000.0), (200.0, 400.0)).clamped();
        assert_eq!(m.offset, ScrollOffset::new(0.0, 600.0));
    }

    #[test]
    fn test_offset_accessors() {
        let offset = ScrollOffset::ZERO.with(Axis::Y, 12.0);
        assert_eq!(offset.get(Axis::X), 0.0);
        assert_eq!(offset.get(Axis::Y), 12.0);
        assert_eq!(Axis::X.to_string(), "horizontal");
    }
}
