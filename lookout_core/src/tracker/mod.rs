// Copyright 2026 the Lookout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility tracker data model.
//!
//! A *tracked element* is a host element registered with a
//! [`VisibilityTracker`]. Each one has:
//!
//! - An identity ([`ElementId`]), a generational handle that becomes stale
//!   when the element is unregistered or pruned.
//! - A host handle `H`, opaque to the tracker and handed to the
//!   [`LayoutProvider`](crate::backend::LayoutProvider) for measurement.
//! - A static [`TrackConfig`](crate::config::TrackConfig).
//! - A **derived state** ([`ElementState`]) written only by
//!   [`evaluate`](VisibilityTracker::evaluate).
//!
//! Evaluation returns a [`Transitions`] batch that presenters
//! [consume](crate::backend::Presenter::apply) to update the host.

mod evaluate;
mod id;
mod store;

pub use evaluate::{
    ProgressChange, Transition, TransitionKind, Transitions, derive_state, step_for,
};
pub use id::ElementId;
pub use store::{ElementState, VisibilityTracker};
