// Copyright 2026 the Lookout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for lookout.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`DomLayout`]: viewport metrics and `getBoundingClientRect()` reads
//! - [`ClassListPresenter`]: `classList` edits and stroke animation
//! - [`ScrollDriver`]: scroll/resize listeners gated to one evaluation per
//!   `requestAnimationFrame`
//! - [`PageEffects`]: selector-based wiring for a whole page
//!
//! # Crate features
//!
//! - `trace` (disabled by default): forwards `lookout_core/trace` and enables
//!   `with_trace_sink` on [`PageEffects`] and [`ScrollDriver`]. Without it,
//!   tracing compiles away.
//!
//! ```rust,ignore
//! let window = web_sys::window().ok_or("no window")?;
//! let driver = PageEffects::new().attach(window)?;
//! // ...
//! driver.dispose();
//! ```

#![no_std]

extern crate alloc;

mod driver;
mod layout;
mod page;
mod presenter;

pub use driver::ScrollDriver;
pub use layout::DomLayout;
pub use lookout_core::backend::{LayoutProvider, Presenter};
pub use page::PageEffects;
pub use presenter::{ClassListPresenter, StrokeBinding};
