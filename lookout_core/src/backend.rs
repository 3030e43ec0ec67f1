// Copyright 2026 the Lookout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for host integrations.
//!
//! A host (a browser page, a native widget tree, a test double) provides two
//! pieces:
//!
//! - **Layout**: implements [`LayoutProvider`] to answer geometry queries:
//!   one viewport snapshot per pass and a bounding box per element handle.
//!   Returning `None` from [`bounds`](LayoutProvider::bounds) marks the
//!   element as detached; the tracker prunes it instead of failing.
//!
//! - **Presenter**: implements [`Presenter`] to apply a [`Transitions`]
//!   batch to the host's elements, typically as class-list edits computed
//!   with [`ClassEdits::for_transition`].
//!
//! How evaluations are triggered (scroll listeners, frame callbacks) is
//! backend-specific and not abstracted by a trait; see
//! [`FrameGate`](crate::gate::FrameGate) for the shared rate-limiting logic.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_scroll() {
//!     if gate.request() {
//!         schedule_frame(on_frame);
//!     }
//! }
//!
//! fn on_frame() {
//!     if !gate.begin_frame() {
//!         return;
//!     }
//!     tracker.evaluate_into(&layout, &mut transitions);
//!     presenter.apply(&tracker, &transitions);
//! }
//! ```

use alloc::format;
use alloc::string::{String, ToString};

use crate::geometry::{ElementBounds, ViewportGeometry};
use crate::tracker::{TransitionKind, Transitions, VisibilityTracker};

/// Supplies geometry for an evaluation pass.
pub trait LayoutProvider<H> {
    /// Returns a fresh viewport snapshot.
    fn viewport(&self) -> ViewportGeometry;

    /// Returns the element's bounds relative to the viewport, or `None` if
    /// the element is no longer part of the host tree.
    fn bounds(&self, host: &H) -> Option<ElementBounds>;
}

/// Applies an evaluated [`Transitions`] batch to the host.
pub trait Presenter<H> {
    /// Applies the given batch, reading host handles and configurations from
    /// `tracker` as needed.
    fn apply(&mut self, tracker: &VisibilityTracker<H>, transitions: &Transitions);
}

/// Class-list edits for one transition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassEdits {
    /// Class to remove, if any.
    pub remove: Option<String>,
    /// Class to add, if any.
    pub add: Option<String>,
}

impl ClassEdits {
    /// Computes the edits for `kind` on an element configured with
    /// `class_name` (a step prefix for stepped elements).
    #[must_use]
    pub fn for_transition(kind: TransitionKind, class_name: &str) -> Self {
        match kind {
            TransitionKind::Activated => Self {
                remove: None,
                add: Some(class_name.to_string()),
            },
            TransitionKind::Deactivated => Self {
                remove: Some(class_name.to_string()),
                add: None,
            },
            TransitionKind::Stepped { from, to } => Self {
                remove: from.map(|from| format!("{class_name}{from}")),
                add: Some(format!("{class_name}{to}")),
            },
        }
    }
}
