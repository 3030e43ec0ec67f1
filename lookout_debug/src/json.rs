// Copyright 2026 the Lookout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON-lines trace output.
//!
//! [`JsonLinesSink`] writes each event as a single JSON object followed by a
//! newline, so a session can be piped into `jq` or loaded line by line.
//! Every object carries an `"event"` tag naming its type.

use std::io::Write;

use serde_json::{Value, json};

use lookout_core::trace::{
    ConfigFallbackEvent, EvaluateBeginEvent, EvaluateEndEvent, PrunedEvent, TraceSink,
    TransitionEvent,
};
use lookout_core::tracker::{ElementId, TransitionKind};

/// Writes one JSON object per trace event.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for JsonLinesSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesSink").finish_non_exhaustive()
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, value: &Value) {
        if serde_json::to_writer(&mut self.writer, value).is_ok() {
            let _ = self.writer.write_all(b"\n");
        }
    }
}

fn element(id: ElementId) -> Value {
    json!({ "index": id.index(), "generation": id.generation() })
}

fn kind(kind: TransitionKind) -> Value {
    match kind {
        TransitionKind::Activated => json!({ "type": "activated" }),
        TransitionKind::Deactivated => json!({ "type": "deactivated" }),
        TransitionKind::Stepped { from, to } => {
            json!({ "type": "stepped", "from": from, "to": to })
        }
    }
}

impl<W: Write> TraceSink for JsonLinesSink<W> {
    fn on_evaluate_begin(&mut self, e: &EvaluateBeginEvent) {
        self.emit(&json!({
            "event": "evaluate_begin",
            "pass": e.pass,
            "tracked": e.tracked,
            "viewport": {
                "height": e.viewport.height,
                "scroll_offset": e.viewport.scroll_offset,
            },
        }));
    }

    fn on_evaluate_end(&mut self, e: &EvaluateEndEvent) {
        self.emit(&json!({
            "event": "evaluate_end",
            "pass": e.pass,
            "transitions": e.transitions,
            "progress": e.progress,
            "pruned": e.pruned,
        }));
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        self.emit(&json!({
            "event": "transition",
            "pass": e.pass,
            "element": element(e.element),
            "kind": kind(e.kind),
        }));
    }

    fn on_pruned(&mut self, e: &PrunedEvent) {
        self.emit(&json!({
            "event": "pruned",
            "pass": e.pass,
            "element": element(e.element),
        }));
    }

    fn on_config_fallback(&mut self, e: &ConfigFallbackEvent) {
        self.emit(&json!({
            "event": "config_fallback",
            "error": e.error.to_string(),
            "fallback_steps": e.fallback_steps.get(),
        }));
    }
}
