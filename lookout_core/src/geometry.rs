// Copyright 2026 the Lookout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport and element geometry.
//!
//! Everything here is vertical-only: the tracker cares about how far an
//! element extends into the viewport along the scroll axis. Element bounds are
//! always expressed relative to the viewport's top edge, the way a host's
//! bounding-box query reports them (negative `top` means the element starts
//! above the visible area).

use kurbo::Rect;

/// A snapshot of the viewport, read fresh for every evaluation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportGeometry {
    /// Visible height of the viewport.
    pub height: f64,
    /// Current document scroll offset along the vertical axis.
    pub scroll_offset: f64,
}

impl ViewportGeometry {
    /// Creates a viewport snapshot.
    #[inline]
    #[must_use]
    pub const fn new(height: f64, scroll_offset: f64) -> Self {
        Self {
            height,
            scroll_offset,
        }
    }

    /// Returns the full, unmargined vertical band of the viewport.
    #[inline]
    #[must_use]
    pub const fn band(&self) -> VerticalBand {
        VerticalBand {
            top: 0.0,
            bottom: self.height,
        }
    }
}

/// A vertical interval in viewport coordinates.
///
/// Produced from a [`ViewportGeometry`] after root margins are applied; see
/// [`RootMargin::band`](crate::config::RootMargin::band).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VerticalBand {
    /// Top edge of the band.
    pub top: f64,
    /// Bottom edge of the band.
    pub bottom: f64,
}

/// Bounding box of a tracked element, relative to the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementBounds {
    rect: Rect,
}

impl ElementBounds {
    /// Creates bounds spanning `top..bottom` with zero width.
    #[inline]
    #[must_use]
    pub const fn new(top: f64, bottom: f64) -> Self {
        Self {
            rect: Rect::new(0.0, top, 0.0, bottom),
        }
    }

    /// Wraps a full bounding rectangle (as reported by the host).
    #[inline]
    #[must_use]
    pub const fn from_rect(rect: Rect) -> Self {
        Self { rect }
    }

    /// Returns the underlying rectangle.
    #[inline]
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Top edge relative to the viewport top.
    #[inline]
    #[must_use]
    pub const fn top(&self) -> f64 {
        self.rect.y0
    }

    /// Bottom edge relative to the viewport top.
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> f64 {
        self.rect.y1
    }

    /// Height of the element. Negative for inverted rectangles.
    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.rect.y1 - self.rect.y0
    }
}

/// Length of the overlap between `bounds` and `band`, never negative.
#[must_use]
pub fn visible_extent(bounds: &ElementBounds, band: VerticalBand) -> f64 {
    (bounds.bottom().min(band.bottom) - bounds.top().max(band.top)).max(0.0)
}

/// Returns whether `bounds` intersects `band`, counting edge contact.
///
/// An element whose edge lies exactly on a band edge intersects with zero
/// area, the same way an intersection observer reports it.
#[must_use]
pub fn touches(bounds: &ElementBounds, band: VerticalBand) -> bool {
    bounds.top() <= band.bottom && bounds.bottom() >= band.top
}

/// Fraction of the element's height that lies inside `band`, in `[0, 1]`.
///
/// Zero-height and inverted elements report `0.0`.
#[must_use]
pub fn visible_ratio(bounds: &ElementBounds, band: VerticalBand) -> f64 {
    let height = bounds.height();
    if height <= 0.0 || height.is_nan() {
        return 0.0;
    }
    (visible_extent(bounds, band) / height).min(1.0)
}

/// Scroll progress through an element, in `[0, 1]`.
///
/// `0.0` while the element's top is still at or below the viewport top,
/// rising to `1.0` once the viewport top has scrolled past a full element
/// height. Zero-height elements report `0.0`.
#[must_use]
pub fn scroll_progress(bounds: &ElementBounds, viewport: &ViewportGeometry) -> f64 {
    let height = bounds.height();
    if height <= 0.0 || height.is_nan() {
        return 0.0;
    }
    let element_top = bounds.top() + viewport.scroll_offset;
    let scroll_relative = viewport.scroll_offset - element_top;
    let percent = scroll_relative / height;
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn ratio_of_partially_visible_element() {
        let vp = ViewportGeometry::new(800.0, 0.0);
        let bounds = ElementBounds::new(100.0, 900.0);
        assert!((visible_ratio(&bounds, vp.band()) - 0.875).abs() < EPS);
    }

    #[test]
    fn ratio_is_zero_outside_viewport() {
        let vp = ViewportGeometry::new(800.0, 0.0);
        assert_eq!(visible_ratio(&ElementBounds::new(800.0, 1200.0), vp.band()), 0.0);
        assert_eq!(visible_ratio(&ElementBounds::new(-400.0, 0.0), vp.band()), 0.0);
    }

    #[test]
    fn edge_contact_touches_band() {
        let band = ViewportGeometry::new(800.0, 0.0).band();
        assert!(touches(&ElementBounds::new(800.0, 1200.0), band), "top on bottom edge");
        assert!(touches(&ElementBounds::new(-400.0, 0.0), band), "bottom on top edge");
        assert!(!touches(&ElementBounds::new(800.5, 1200.0), band), "just below");
        assert!(!touches(&ElementBounds::new(-400.0, -0.5), band), "just above");
    }

    #[test]
    fn zero_height_has_zero_ratio_and_progress() {
        let vp = ViewportGeometry::new(800.0, 250.0);
        let flat = ElementBounds::new(10.0, 10.0);
        assert_eq!(visible_ratio(&flat, vp.band()), 0.0);
        assert_eq!(scroll_progress(&flat, &vp), 0.0);

        let inverted = ElementBounds::new(50.0, 10.0);
        assert_eq!(visible_ratio(&inverted, vp.band()), 0.0);
        assert_eq!(scroll_progress(&inverted, &vp), 0.0);
    }

    #[test]
    fn progress_clamps_to_unit_interval() {
        let vp = ViewportGeometry::new(800.0, 300.0);
        // Element starts at page offset 0 and is 900 tall.
        let bounds = ElementBounds::new(-300.0, 600.0);
        assert!((scroll_progress(&bounds, &vp) - 300.0 / 900.0).abs() < EPS);

        let below = ElementBounds::new(200.0, 1100.0);
        assert_eq!(scroll_progress(&below, &vp), 0.0);

        let far_above = ElementBounds::new(-5000.0, -4100.0);
        assert_eq!(scroll_progress(&far_above, &vp), 1.0);
    }

    #[test]
    fn from_rect_keeps_vertical_edges() {
        let bounds = ElementBounds::from_rect(Rect::new(5.0, -20.0, 300.0, 180.0));
        assert_eq!(bounds.top(), -20.0);
        assert_eq!(bounds.bottom(), 180.0);
        assert_eq!(bounds.height(), 200.0);
    }
}
