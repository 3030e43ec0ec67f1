// Copyright 2026 the Lookout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-progress driven stroke animation.
//!
//! A stepped element's progress (see
//! [`Transitions::progress`](crate::tracker::Transitions::progress)) can drive
//! an SVG stroke "drawing" effect by lowering `stroke-dashoffset` as the
//! reader scrolls. [`StrokeRamp`] maps progress to an offset.

/// Linear mapping from scroll progress to a stroke dash offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeRamp {
    /// Offset at zero progress (the stroke is fully hidden).
    pub max: f64,
    /// Offset decrease per unit of progress.
    pub rate: f64,
    /// Progress the ramp waits for; at or below it the offset stays at `max`.
    pub gate: Option<f64>,
}

impl StrokeRamp {
    /// Leading stroke of the info graphic: starts drawing immediately.
    pub const INFO_LEAD: Self = Self {
        max: 1000.0,
        rate: 2500.0,
        gate: None,
    };

    /// Trailing stroke of the info graphic: waits until 42 % progress.
    pub const INFO_TRAIL: Self = Self {
        max: 1000.0,
        rate: 1500.0,
        gate: Some(0.42),
    };

    /// Returns the dash offset for `percent` progress.
    ///
    /// The result is not clamped at zero; overshooting past the end of the
    /// path is harmless.
    #[must_use]
    pub fn offset(&self, percent: f64) -> f64 {
        match self.gate {
            Some(gate) if percent <= gate => self.max,
            _ => self.max - percent * self.rate,
        }
    }
}
