// Copyright 2026 the Lookout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use lookout_core::trace::{
    ConfigFallbackEvent, EvaluateBeginEvent, EvaluateEndEvent, PrunedEvent, TraceSink,
    TransitionEvent,
};
use lookout_core::tracker::TransitionKind;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn describe(kind: TransitionKind) -> String {
    match kind {
        TransitionKind::Activated => "on".into(),
        TransitionKind::Deactivated => "off".into(),
        TransitionKind::Stepped { from: Some(from), to } => format!("step {from}->{to}"),
        TransitionKind::Stepped { from: None, to } => format!("step ->{to}"),
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_evaluate_begin(&mut self, e: &EvaluateBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[eval:begin] pass={} tracked={} viewport={:.1}px scroll={:.1}px",
            e.pass, e.tracked, e.viewport.height, e.viewport.scroll_offset,
        );
    }

    fn on_evaluate_end(&mut self, e: &EvaluateEndEvent) {
        let _ = writeln!(
            self.writer,
            "[eval:end] pass={} transitions={} progress={} pruned={}",
            e.pass, e.transitions, e.progress, e.pruned,
        );
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        let _ = writeln!(
            self.writer,
            "[transition] pass={} element={} {}",
            e.pass,
            e.element,
            describe(e.kind),
        );
    }

    fn on_pruned(&mut self, e: &PrunedEvent) {
        let _ = writeln!(
            self.writer,
            "[pruned] pass={} element={}",
            e.pass, e.element,
        );
    }

    fn on_config_fallback(&mut self, e: &ConfigFallbackEvent) {
        let _ = writeln!(
            self.writer,
            "[config] {} (using {} steps)",
            e.error,
            e.fallback_steps.get(),
        );
    }
}
