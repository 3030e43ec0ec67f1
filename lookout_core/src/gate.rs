// Copyright 2026 the Lookout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-rate limiting for high-frequency layout signals.
//!
//! Scroll events can fire many times per rendered frame. [`FrameGate`]
//! latches the first request and swallows the rest until the host's next
//! frame callback, so layout is read at most once per frame. The gate only
//! affects how often evaluation runs, never what it computes.

/// Coalesces evaluation requests into at most one per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameGate {
    pending: bool,
    coalesced: u64,
    frames: u64,
}

impl FrameGate {
    /// Creates an idle gate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: false,
            coalesced: 0,
            frames: 0,
        }
    }

    /// Records a layout signal.
    ///
    /// Returns `true` when the caller must schedule a frame callback (the
    /// first request since the last frame); `false` when one is already
    /// pending.
    pub fn request(&mut self) -> bool {
        if self.pending {
            self.coalesced += 1;
            false
        } else {
            self.pending = true;
            true
        }
    }

    /// Called from the frame callback. Returns whether an evaluation is due,
    /// and re-arms the gate.
    pub fn begin_frame(&mut self) -> bool {
        let due = core::mem::replace(&mut self.pending, false);
        if due {
            self.frames += 1;
        }
        due
    }

    /// Drops a pending request (the scheduled callback was cancelled).
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    /// Returns whether a frame callback is outstanding.
    #[inline]
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Number of requests absorbed by an already-pending frame.
    #[inline]
    #[must_use]
    pub const fn coalesced(&self) -> u64 {
        self.coalesced
    }

    /// Number of frames that ran an evaluation.
    #[inline]
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }
}
