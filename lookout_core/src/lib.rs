// Copyright 2026 the Lookout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport visibility tracking with batched state transitions.
//!
//! `lookout_core` derives per-element state from how an element sits in the
//! viewport: whether enough of it is visible, whether its top has reached the
//! viewport top, whether its bottom edge is on screen, or how far the reader
//! has scrolled through it. It is `no_std` compatible (with `alloc`) and
//! stores elements in struct-of-arrays slots addressed by generational
//! handles.
//!
//! # Architecture
//!
//! ```text
//!   host signal (scroll / resize)
//!       │
//!       ▼
//!   FrameGate::request() ──► host frame callback ──► FrameGate::begin_frame()
//!                                                          │
//!                 ┌────────────────────────────────────────┘
//!                 ▼
//!   VisibilityTracker::evaluate(&LayoutProvider) ──► Transitions ──► Presenter::apply()
//! ```
//!
//! **[`tracker`]**: Element registry, evaluation, and the [`Transitions`]
//! batch. Target states are pure functions of current geometry and static
//! configuration.
//!
//! **[`config`]**: [`TrackConfig`] presets and parsers for attribute-style
//! configuration (step counts, root margins).
//!
//! **[`geometry`]**: Viewport snapshots, element bounds, visibility ratio
//! and scroll progress.
//!
//! **[`backend`]**: The [`LayoutProvider`](backend::LayoutProvider) and
//! [`Presenter`](backend::Presenter) traits hosts implement.
//!
//! **[`gate`]**: [`FrameGate`](gate::FrameGate) for at-most-once-per-frame
//! evaluation.
//!
//! **[`progress`]**: Scroll progress to SVG stroke offsets.
//!
//! **[`media`]**: Video-player controls for carousel slides.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types, with
//! zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//!
//! [`Transitions`]: tracker::Transitions
//! [`TrackConfig`]: config::TrackConfig

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod config;
pub mod gate;
pub mod geometry;
pub mod media;
pub mod progress;
pub mod trace;
pub mod tracker;
