// Copyright 2026 the Lookout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout reads against the live DOM.

use kurbo::Rect;
use lookout_core::backend::LayoutProvider;
use lookout_core::geometry::{ElementBounds, ViewportGeometry};
use web_sys::{DomRect, Element, Window};

/// [`LayoutProvider`] backed by `window` metrics and
/// `getBoundingClientRect()`.
///
/// Elements that are no longer connected to the document report no bounds,
/// which makes the tracker prune them.
#[derive(Clone, Debug)]
pub struct DomLayout {
    window: Window,
}

impl DomLayout {
    /// Creates a layout reader for `window`.
    #[must_use]
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    /// Returns the window this layout reads from.
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl LayoutProvider<Element> for DomLayout {
    fn viewport(&self) -> ViewportGeometry {
        let height = self
            .window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let scroll_offset = self.window.scroll_y().unwrap_or(0.0);
        ViewportGeometry::new(height, scroll_offset)
    }

    fn bounds(&self, host: &Element) -> Option<ElementBounds> {
        if !host.is_connected() {
            return None;
        }
        Some(bounds_from_client_rect(&host.get_bounding_client_rect()))
    }
}

fn bounds_from_client_rect(r: &DomRect) -> ElementBounds {
    ElementBounds::from_rect(Rect::new(r.left(), r.top(), r.right(), r.bottom()))
}
