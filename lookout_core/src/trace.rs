// Copyright 2026 the Lookout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for evaluation passes.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! tracker and hosts call at each stage of a pass. All method bodies default
//! to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! Pruned elements are additionally reported in
//! [`Transitions::pruned`](crate::tracker::Transitions::pruned), which does
//! not depend on the feature.

use crate::config::{ConfigError, StepCount};
use crate::geometry::ViewportGeometry;
use crate::tracker::{ElementId, TransitionKind};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted before an evaluation pass reads any element geometry.
#[derive(Clone, Copy, Debug)]
pub struct EvaluateBeginEvent {
    /// Pass counter (1 for the first pass).
    pub pass: u64,
    /// Number of tracked elements at the start of the pass.
    pub tracked: usize,
    /// Viewport snapshot used for the whole pass.
    pub viewport: ViewportGeometry,
}

/// Emitted after an evaluation pass has committed its changes.
#[derive(Clone, Copy, Debug)]
pub struct EvaluateEndEvent {
    /// Pass counter.
    pub pass: u64,
    /// Number of state transitions produced.
    pub transitions: usize,
    /// Number of progress updates produced.
    pub progress: usize,
    /// Number of elements pruned because their host went away.
    pub pruned: usize,
}

/// Emitted once per state transition.
#[derive(Clone, Copy, Debug)]
pub struct TransitionEvent {
    /// Pass counter.
    pub pass: u64,
    /// Element whose state changed.
    pub element: ElementId,
    /// What changed.
    pub kind: TransitionKind,
}

/// Emitted when a detached element is dropped from the tracked set.
#[derive(Clone, Copy, Debug)]
pub struct PrunedEvent {
    /// Pass counter.
    pub pass: u64,
    /// The (now stale) handle of the pruned element.
    pub element: ElementId,
}

/// Emitted when a host-supplied configuration value was rejected and a
/// default was used instead.
#[derive(Clone, Copy, Debug)]
pub struct ConfigFallbackEvent {
    /// Why the value was rejected.
    pub error: ConfigError,
    /// Step count used instead.
    pub fallback_steps: StepCount,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from evaluation passes and host setup.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called at the start of an evaluation pass.
    fn on_evaluate_begin(&mut self, e: &EvaluateBeginEvent) {
        _ = e;
    }

    /// Called at the end of an evaluation pass.
    fn on_evaluate_end(&mut self, e: &EvaluateEndEvent) {
        _ = e;
    }

    /// Called for every state transition.
    fn on_transition(&mut self, e: &TransitionEvent) {
        _ = e;
    }

    /// Called for every pruned element.
    fn on_pruned(&mut self, e: &PrunedEvent) {
        _ = e;
    }

    /// Called when configuration parsing fell back to a default.
    fn on_config_fallback(&mut self, e: &ConfigFallbackEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer for an optional sink.
    #[inline]
    #[must_use]
    pub fn from_option(sink: Option<&'a mut dyn TraceSink>) -> Self {
        match sink {
            Some(sink) => Self::new(sink),
            None => Self::none(),
        }
    }

    /// Emits an [`EvaluateBeginEvent`].
    #[inline]
    pub fn evaluate_begin(&mut self, e: &EvaluateBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_evaluate_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`EvaluateEndEvent`].
    #[inline]
    pub fn evaluate_end(&mut self, e: &EvaluateEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_evaluate_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TransitionEvent`].
    #[inline]
    pub fn transition(&mut self, e: &TransitionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PrunedEvent`].
    #[inline]
    pub fn pruned(&mut self, e: &PrunedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pruned(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ConfigFallbackEvent`].
    #[inline]
    pub fn config_fallback(&mut self, e: &ConfigFallbackEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_config_fallback(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
