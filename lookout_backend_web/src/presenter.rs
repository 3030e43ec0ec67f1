// Copyright 2026 the Lookout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `classList` presenter.
//!
//! Translates a [`Transitions`] batch into class-list edits on the tracked
//! elements, and drives bound SVG strokes from scroll progress.
//!
//! [`Transitions`]: lookout_core::tracker::Transitions

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use lookout_core::backend::{ClassEdits, Presenter};
use lookout_core::progress::StrokeRamp;
use lookout_core::tracker::{ElementId, Transitions, VisibilityTracker};
use wasm_bindgen::JsCast as _;
use web_sys::{CssStyleDeclaration, DomTokenList, Element, HtmlElement, SvgElement};

/// Links a stepped element's progress to another element's
/// `stroke-dashoffset`.
#[derive(Clone, Debug)]
pub struct StrokeBinding {
    /// Tracked element whose progress drives the stroke.
    pub source: ElementId,
    /// Element (usually an SVG path) whose stroke is animated.
    pub target: Element,
    /// Progress-to-offset mapping.
    pub ramp: StrokeRamp,
}

/// Applies transitions to DOM elements via `classList`.
///
/// For stepped elements every other class carrying the step prefix is
/// removed before the new one is added, so exactly one step class remains
/// even if page scripts touched the list in between.
#[derive(Debug, Default)]
pub struct ClassListPresenter {
    strokes: Vec<StrokeBinding>,
}

impl ClassListPresenter {
    /// Creates a presenter with no stroke bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stroke binding.
    pub fn bind_stroke(&mut self, binding: StrokeBinding) {
        self.strokes.push(binding);
    }

    /// Returns the active stroke bindings.
    #[must_use]
    pub fn strokes(&self) -> &[StrokeBinding] {
        &self.strokes
    }
}

impl Presenter<Element> for ClassListPresenter {
    fn apply(&mut self, tracker: &VisibilityTracker<Element>, transitions: &Transitions) {
        // 1. Class edits
        for t in &transitions.changes {
            let (Some(el), Some(config)) = (tracker.host(t.element), tracker.config(t.element))
            else {
                continue;
            };
            let list = el.class_list();
            let edits = ClassEdits::for_transition(t.kind, &config.class_name);
            if config.mode.is_stepped()
                && let Some(add) = &edits.add
            {
                remove_stray_steps(&list, &config.class_name, add);
            }
            if let Some(class) = &edits.remove {
                let _ = list.remove_1(class);
            }
            if let Some(class) = &edits.add {
                let _ = list.add_1(class);
            }
        }

        // 2. Strokes
        for change in &transitions.progress {
            for binding in self.strokes.iter().filter(|b| b.source == change.element) {
                set_stroke_offset(&binding.target, binding.ramp.offset(change.percent));
            }
        }

        // 3. Bindings whose source was pruned
        if !transitions.pruned.is_empty() {
            self.strokes
                .retain(|b| !transitions.pruned.contains(&b.source));
        }
    }
}

fn remove_stray_steps(list: &DomTokenList, prefix: &str, keep: &str) {
    // The token list is live; collect before removing.
    let stray: Vec<String> = (0..list.length())
        .filter_map(|i| list.item(i))
        .filter(|class| is_stray_step(class, prefix, keep))
        .collect();
    for class in stray {
        let _ = list.remove_1(&class);
    }
}

fn is_stray_step(class: &str, prefix: &str, keep: &str) -> bool {
    class != keep
        && class
            .strip_prefix(prefix)
            .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

fn set_stroke_offset(target: &Element, offset: f64) {
    if let Some(style) = style_of(target) {
        let _ = style.set_property("stroke-dashoffset", &format!("{offset}"));
    }
}

fn style_of(target: &Element) -> Option<CssStyleDeclaration> {
    if let Some(el) = target.dyn_ref::<SvgElement>() {
        Some(el.style())
    } else {
        target.dyn_ref::<HtmlElement>().map(HtmlElement::style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stray_step_classes() {
        assert!(is_stray_step("step-1", "step-", "step-2"));
        assert!(is_stray_step("step-12", "step-", "step-2"));
        assert!(!is_stray_step("step-2", "step-", "step-2"), "kept class");
        assert!(!is_stray_step("stepper", "step-", "step-2"), "other prefix");
        assert!(!is_stray_step("step-", "step-", "step-2"), "bare prefix");
        assert!(!is_stray_step("step-large", "step-", "step-2"), "non-numeric");
    }
}
