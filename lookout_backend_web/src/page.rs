// Copyright 2026 the Lookout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative page wiring.
//!
//! [`PageEffects::attach`] scans the document for the markup conventions
//! below, registers each match with a tracker and starts a
//! [`ScrollDriver`]:
//!
//! | Selector        | Configuration                                      |
//! |-----------------|----------------------------------------------------|
//! | `[data-fixed]`  | [`TrackConfig::fixed`] and [`TrackConfig::at_bottom`] |
//! | `section`       | [`TrackConfig::reveal`]                            |
//! | `[data-steps]`  | [`TrackConfig::steps`] with the attribute's count  |
//!
//! A stepped element with id `info` additionally drives the strokes of
//! `#black` and `#black2`.

use alloc::boxed::Box;
use alloc::vec::Vec;

use lookout_core::config::{StepCount, TrackConfig};
use lookout_core::progress::StrokeRamp;
use lookout_core::trace::{ConfigFallbackEvent, TraceSink, Tracer};
use lookout_core::tracker::VisibilityTracker;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{Document, Element, Window};

use crate::driver::ScrollDriver;
use crate::presenter::{ClassListPresenter, StrokeBinding};

const INFO_ID: &str = "info";
const INFO_LEAD_ID: &str = "black";
const INFO_TRAIL_ID: &str = "black2";

/// Builder for the page's scroll effects.
#[derive(Default)]
pub struct PageEffects {
    default_steps: StepCount,
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for PageEffects {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PageEffects")
            .field("default_steps", &self.default_steps)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl PageEffects {
    /// Creates the default wiring (fallback step count of 3, no tracing).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the step count used when `data-steps` does not parse.
    #[must_use]
    pub fn with_default_steps(mut self, steps: StepCount) -> Self {
        self.default_steps = steps;
        self
    }

    /// Routes configuration and evaluation events to `sink`.
    ///
    /// Requires the `trace` feature.
    #[cfg(feature = "trace")]
    #[must_use]
    pub fn with_trace_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Scans `window`'s document, registers every match and starts the
    /// driver. The initial evaluation has run when this returns.
    pub fn attach(self, window: Window) -> Result<ScrollDriver, JsValue> {
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;

        let mut tracker = VisibilityTracker::new();
        let mut presenter = ClassListPresenter::new();
        let mut sink = self.sink;
        {
            let mut tracer = match sink.as_deref_mut() {
                Some(sink) => Tracer::new(sink),
                None => Tracer::none(),
            };

            for el in query_all(&document, "[data-fixed]")? {
                let _ = tracker.register(el.clone(), TrackConfig::fixed());
                let _ = tracker.register(el, TrackConfig::at_bottom());
            }
            for el in query_all(&document, "section")? {
                let _ = tracker.register(el, TrackConfig::reveal());
            }
            for el in query_all(&document, "[data-steps]")? {
                let attr = el.get_attribute("data-steps");
                let steps = resolve_steps(attr.as_deref(), self.default_steps, &mut tracer);
                let is_info = el.id() == INFO_ID;
                let id = tracker.register(el, TrackConfig::steps(steps));
                if is_info {
                    for (target, ramp) in [
                        (INFO_LEAD_ID, StrokeRamp::INFO_LEAD),
                        (INFO_TRAIL_ID, StrokeRamp::INFO_TRAIL),
                    ] {
                        if let Some(target) = document.get_element_by_id(target) {
                            presenter.bind_stroke(StrokeBinding {
                                source: id,
                                target,
                                ramp,
                            });
                        }
                    }
                }
            }
        }

        let driver = ScrollDriver::new(window, tracker, presenter);
        #[cfg(feature = "trace")]
        let driver = match sink {
            Some(sink) => driver.with_trace_sink(sink),
            None => driver,
        };
        driver.init()?;
        Ok(driver)
    }
}

/// Parses a `data-steps` value, falling back to `default` (and reporting
/// the fallback) when it is missing or invalid.
fn resolve_steps(attr: Option<&str>, default: StepCount, tracer: &mut Tracer<'_>) -> StepCount {
    match StepCount::parse(attr.unwrap_or("")) {
        Ok(steps) => steps,
        Err(error) => {
            tracer.config_fallback(&ConfigFallbackEvent {
                error,
                fallback_steps: default,
            });
            default
        }
    }
}

fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}
