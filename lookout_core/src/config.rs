// Copyright 2026 the Lookout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element threshold configuration.
//!
//! A [`TrackConfig`] pairs a [`TrackMode`] (how the element's state is
//! derived from geometry) with the class name the presenter toggles. The
//! presets mirror the page behaviors the tracker was built for:
//!
//! | preset                         | mode             | class       |
//! |--------------------------------|------------------|-------------|
//! | [`reveal`](TrackConfig::reveal)       | binary-ratio, bottom margin −25 % | `viewport`  |
//! | [`fixed`](TrackConfig::fixed)         | top-cross        | `fixed`     |
//! | [`at_bottom`](TrackConfig::at_bottom) | bottom-visible   | `at-bottom` |
//! | [`steps`](TrackConfig::steps)         | stepped          | `step-N`    |
//!
//! String parsers ([`StepCount::parse`], [`RootMargin::parse`]) accept the
//! attribute-style surface hosts read from markup.

use alloc::borrow::Cow;
use core::fmt;
use core::num::NonZeroU32;

use crate::geometry::{VerticalBand, ViewportGeometry};

/// Errors produced while parsing configuration strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The step-count attribute was empty.
    EmptyStepCount,
    /// The step-count attribute did not start with a positive integer.
    InvalidStepCount,
    /// A root-margin string had the wrong number of parts or a bad length.
    InvalidMargin,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyStepCount => write!(f, "step count is empty"),
            Self::InvalidStepCount => write!(f, "step count is not a positive integer"),
            Self::InvalidMargin => write!(f, "root margin is not a valid 1-4 part length list"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Number of buckets a stepped element is divided into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StepCount(NonZeroU32);

impl StepCount {
    /// Step count used when none is configured or parsing fails.
    pub const DEFAULT: Self = Self(NonZeroU32::new(3).unwrap());

    /// Creates a step count, returning `None` for zero.
    #[must_use]
    pub const fn new(steps: u32) -> Option<Self> {
        match NonZeroU32::new(steps) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Returns the number of steps.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Parses the leading integer of an attribute value.
    ///
    /// Surrounding whitespace is ignored and trailing non-digits are
    /// dropped, so `"4"`, `" 5 "` and `"6px"` all parse. Zero, negative, and
    /// non-numeric values are errors; callers fall back to
    /// [`StepCount::DEFAULT`].
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConfigError::EmptyStepCount);
        }
        let digits = s.strip_prefix('+').unwrap_or(s);
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        digits[..end]
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or(ConfigError::InvalidStepCount)
    }
}

impl Default for StepCount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A CSS-style length used in root margins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    /// Absolute pixels.
    Px(f64),
    /// Percentage of the viewport dimension the margin applies to.
    Percent(f64),
}

impl Length {
    /// Resolves the length against `basis` (the viewport height for vertical
    /// edges).
    #[inline]
    #[must_use]
    pub fn resolve(self, basis: f64) -> f64 {
        match self {
            Self::Px(px) => px,
            Self::Percent(pct) => basis * pct / 100.0,
        }
    }

    fn parse(s: &str) -> Result<Self, ConfigError> {
        let (number, make): (&str, fn(f64) -> Self) = if let Some(n) = s.strip_suffix("px") {
            (n, Self::Px)
        } else if let Some(n) = s.strip_suffix('%') {
            (n, Self::Percent)
        } else {
            // Unitless zero is the only bare number CSS accepts.
            (s, Self::Px)
        };
        let value: f64 = number.parse().map_err(|_| ConfigError::InvalidMargin)?;
        if !value.is_finite() || (number == s && value != 0.0) {
            return Err(ConfigError::InvalidMargin);
        }
        Ok(make(value))
    }
}

/// Insets applied to the viewport before intersecting.
///
/// Positive values grow the effective viewport, negative values shrink it.
/// Only `top` and `bottom` influence vertical tracking; `left` and `right`
/// are kept so parsed margins round-trip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootMargin {
    /// Top inset.
    pub top: Length,
    /// Right inset.
    pub right: Length,
    /// Bottom inset.
    pub bottom: Length,
    /// Left inset.
    pub left: Length,
}

impl RootMargin {
    /// No margin: the band is the full viewport.
    pub const ZERO: Self = Self {
        top: Length::Px(0.0),
        right: Length::Px(0.0),
        bottom: Length::Px(0.0),
        left: Length::Px(0.0),
    };

    /// Margin that shrinks the viewport from the bottom by `pct` percent.
    #[must_use]
    pub const fn bottom_percent(pct: f64) -> Self {
        Self {
            bottom: Length::Percent(-pct),
            ..Self::ZERO
        }
    }

    /// Parses CSS margin shorthand with one to four lengths.
    ///
    /// `"0px 0px -25% 0px"` is top/right/bottom/left; shorter forms expand
    /// the way CSS `margin` does.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let mut parts = [Length::Px(0.0); 4];
        let mut count = 0;
        for token in s.split_ascii_whitespace() {
            if count == 4 {
                return Err(ConfigError::InvalidMargin);
            }
            parts[count] = Length::parse(token)?;
            count += 1;
        }
        let [a, b, c, d] = parts;
        match count {
            1 => Ok(Self {
                top: a,
                right: a,
                bottom: a,
                left: a,
            }),
            2 => Ok(Self {
                top: a,
                right: b,
                bottom: a,
                left: b,
            }),
            3 => Ok(Self {
                top: a,
                right: b,
                bottom: c,
                left: b,
            }),
            4 => Ok(Self {
                top: a,
                right: b,
                bottom: c,
                left: d,
            }),
            _ => Err(ConfigError::InvalidMargin),
        }
    }

    /// Returns the vertical band of `viewport` after applying this margin.
    #[must_use]
    pub fn band(&self, viewport: &ViewportGeometry) -> VerticalBand {
        let h = viewport.height;
        VerticalBand {
            top: -self.top.resolve(h),
            bottom: h + self.bottom.resolve(h),
        }
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::ZERO
    }
}

/// How an element's state is derived from its geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TrackMode {
    /// Boolean; on while the element intersects the (margin-adjusted)
    /// viewport with a visible ratio of at least `threshold`.
    BinaryRatio {
        /// Minimum visible ratio in `[0, 1]`.
        threshold: f64,
        /// Insets applied to the viewport first.
        root_margin: RootMargin,
    },
    /// Boolean; on while the element spans the viewport top edge (top at or
    /// above it, bottom at or below it).
    TopCross,
    /// Boolean; on while the element's bottom edge lies inside the viewport.
    BottomVisible,
    /// Integer in `1..=steps`, tracking scroll progress through the element.
    Stepped {
        /// Number of buckets.
        steps: StepCount,
    },
}

impl TrackMode {
    /// Returns whether this mode produces a step rather than a flag.
    #[inline]
    #[must_use]
    pub const fn is_stepped(&self) -> bool {
        matches!(self, Self::Stepped { .. })
    }
}

/// Threshold configuration plus the class name a presenter toggles.
///
/// For stepped modes `class_name` is a prefix; step `n` maps to
/// `"{class_name}{n}"`.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackConfig {
    /// State derivation mode.
    pub mode: TrackMode,
    /// Class name (or prefix, for stepped modes).
    pub class_name: Cow<'static, str>,
}

impl TrackConfig {
    /// Binary-ratio tracking with the given threshold and class `viewport`.
    ///
    /// The threshold is clamped into `[0, 1]`; NaN becomes `0`.
    #[must_use]
    pub fn ratio(threshold: f64) -> Self {
        let threshold = if threshold.is_nan() {
            0.0
        } else {
            threshold.clamp(0.0, 1.0)
        };
        Self {
            mode: TrackMode::BinaryRatio {
                threshold,
                root_margin: RootMargin::ZERO,
            },
            class_name: Cow::Borrowed("viewport"),
        }
    }

    /// Section reveal: any intersection with the top three quarters of the
    /// viewport.
    #[must_use]
    pub fn reveal() -> Self {
        Self::ratio(0.0).with_root_margin(RootMargin::bottom_percent(25.0))
    }

    /// Sticky start: class `fixed` once the top edge reaches the viewport top.
    #[must_use]
    pub fn fixed() -> Self {
        Self {
            mode: TrackMode::TopCross,
            class_name: Cow::Borrowed("fixed"),
        }
    }

    /// Sticky end: class `at-bottom` while the bottom edge is on screen.
    #[must_use]
    pub fn at_bottom() -> Self {
        Self {
            mode: TrackMode::BottomVisible,
            class_name: Cow::Borrowed("at-bottom"),
        }
    }

    /// Stepped progress with class prefix `step-`.
    #[must_use]
    pub fn steps(steps: StepCount) -> Self {
        Self {
            mode: TrackMode::Stepped { steps },
            class_name: Cow::Borrowed("step-"),
        }
    }

    /// Replaces the class name (or step prefix).
    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<Cow<'static, str>>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Sets the root margin. Has no effect on modes other than binary-ratio.
    #[must_use]
    pub fn with_root_margin(mut self, margin: RootMargin) -> Self {
        if let TrackMode::BinaryRatio { root_margin, .. } = &mut self.mode {
            *root_margin = margin;
        }
        self
    }
}
