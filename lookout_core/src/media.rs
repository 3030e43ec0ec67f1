// Copyright 2026 the Lookout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Video-player controls for carousel slides.
//!
//! The carousel itself (slide layout, swiping, pagination) belongs to an
//! external library and is reached only through [`MediaCollaborator`]. This
//! module holds the host-independent part: the controls view model
//! ([`PlayerControls`]), click routing ([`ClickIntent`]), and the small
//! formatting and seek helpers.

use alloc::format;
use alloc::string::String;

/// Playback state of one slide's video.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    /// Not playing (initial state, or paused by the user).
    #[default]
    Paused,
    /// Playing.
    Playing,
    /// Reached the end.
    Ended,
}

/// The external carousel and its per-slide videos.
pub trait MediaCollaborator {
    /// Number of slides.
    fn slide_count(&self) -> usize;

    /// Index of the active (centered) slide.
    fn active_slide(&self) -> usize;

    /// Makes `slide` the active slide.
    fn slide_to(&mut self, slide: usize);

    /// Playback state of the video on `slide`.
    fn playback_state(&self, slide: usize) -> PlaybackState;

    /// Starts the video on `slide`.
    fn play(&mut self, slide: usize);

    /// Pauses the video on `slide`.
    fn pause(&mut self, slide: usize);

    /// Moves the video on `slide` to `seconds`.
    fn seek(&mut self, slide: usize, seconds: f64);

    /// Called when the carousel changes slides. Pauses every playing video
    /// and returns how many were paused.
    fn on_slide_change(&mut self) -> usize {
        let mut paused = 0;
        for slide in 0..self.slide_count() {
            if self.playback_state(slide) == PlaybackState::Playing {
                self.pause(slide);
                paused += 1;
            }
        }
        paused
    }
}

/// What a click on a slide should do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClickIntent {
    /// The click landed on the controls bar, which handles it itself.
    Ignore,
    /// The slide is not active yet; bring it to the center first.
    ActivateSlide,
    /// Toggle play/pause on the active slide.
    TogglePlayback,
}

impl ClickIntent {
    /// Routes a click on a slide.
    #[must_use]
    pub const fn resolve(is_active_slide: bool, inside_controls: bool) -> Self {
        if inside_controls {
            Self::Ignore
        } else if !is_active_slide {
            Self::ActivateSlide
        } else {
            Self::TogglePlayback
        }
    }

    /// Resolves a click on `slide` and performs it on `carousel`.
    pub fn dispatch<C>(carousel: &mut C, slide: usize, inside_controls: bool) -> Self
    where
        C: MediaCollaborator + ?Sized,
    {
        let intent = Self::resolve(carousel.active_slide() == slide, inside_controls);
        match intent {
            Self::Ignore => {}
            Self::ActivateSlide => carousel.slide_to(slide),
            Self::TogglePlayback => toggle(carousel, slide),
        }
        intent
    }
}

/// Plays a paused or ended video, pauses a playing one.
pub fn toggle<C>(carousel: &mut C, slide: usize)
where
    C: MediaCollaborator + ?Sized,
{
    if carousel.playback_state(slide) == PlaybackState::Playing {
        carousel.pause(slide);
    } else {
        carousel.play(slide);
    }
}

/// Formats seconds as `m:ss`, flooring fractional seconds.
///
/// Negative and non-finite inputs format as `0:00`.
#[must_use]
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return String::from("0:00");
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "positive finite seconds; truncation is the intended floor"
    )]
    let total = seconds as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Fraction of a progress bar at `click_x`, clamped to `[0, 1]`.
///
/// A zero-width or degenerate bar yields `0.0`.
#[must_use]
pub fn seek_fraction(click_x: f64, bar_left: f64, bar_width: f64) -> f64 {
    if bar_width <= 0.0 || bar_width.is_nan() {
        return 0.0;
    }
    let fraction = (click_x - bar_left) / bar_width;
    if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    }
}

fn usable_duration(duration: Option<f64>) -> Option<f64> {
    duration.filter(|d| d.is_finite() && *d > 0.0)
}

/// Media element events the controls react to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MediaEvent {
    /// Metadata is available; `duration` may be NaN or infinite for streams.
    LoadedMetadata {
        /// Reported duration in seconds.
        duration: f64,
    },
    /// Playback started.
    Play,
    /// Playback paused.
    Pause,
    /// Playback position moved.
    TimeUpdate {
        /// Current position in seconds.
        current_time: f64,
    },
    /// Playback reached the end.
    Ended,
}

/// What the controls bar should display.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlsView {
    /// Whether the slide carries its "is playing" class.
    pub is_playing: bool,
    /// Whether the play button shows its "paused" (pause icon) state.
    pub button_paused: bool,
    /// Width of the filled part of the progress bar, in percent.
    pub filled_percent: f64,
    /// Remaining-time label (full duration once ended).
    pub time_label: String,
}

/// View model for one slide's video controls.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerControls {
    duration: Option<f64>,
    current_time: f64,
    state: PlaybackState,
}

impl PlayerControls {
    /// Creates controls for a video whose metadata has not loaded yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            duration: None,
            current_time: 0.0,
            state: PlaybackState::Paused,
        }
    }

    /// Returns the current playback state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    /// Applies a media event and returns the updated view.
    pub fn handle(&mut self, event: MediaEvent) -> ControlsView {
        match event {
            MediaEvent::LoadedMetadata { duration } => self.duration = Some(duration),
            MediaEvent::Play => self.state = PlaybackState::Playing,
            MediaEvent::Pause => {
                if self.state != PlaybackState::Ended {
                    self.state = PlaybackState::Paused;
                }
            }
            MediaEvent::TimeUpdate { current_time } => {
                if usable_duration(self.duration).is_some() {
                    self.current_time = current_time;
                }
            }
            MediaEvent::Ended => self.state = PlaybackState::Ended,
        }
        self.view()
    }

    /// Seek target in seconds for a click at `fraction` of the bar, or `None`
    /// while the duration is unknown.
    #[must_use]
    pub fn seek_target(&self, fraction: f64) -> Option<f64> {
        let duration = usable_duration(self.duration)?;
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        Some(fraction * duration)
    }

    /// Returns the view for the current state.
    #[must_use]
    pub fn view(&self) -> ControlsView {
        let playing = self.state == PlaybackState::Playing;
        let duration = usable_duration(self.duration);
        let (filled_percent, time_label) = match (self.state, duration) {
            (PlaybackState::Ended, Some(d)) => (0.0, format_time(d)),
            (PlaybackState::Ended, None) => (0.0, format_time(0.0)),
            (_, Some(d)) => (
                (self.current_time / d * 100.0).clamp(0.0, 100.0),
                format_time(d - self.current_time),
            ),
            (_, None) => (0.0, format_time(0.0)),
        };
        ControlsView {
            is_playing: playing,
            button_paused: playing,
            filled_percent,
            time_label,
        }
    }
}
