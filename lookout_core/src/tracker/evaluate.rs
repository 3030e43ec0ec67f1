// Copyright 2026 the Lookout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Evaluation passes and transition batching.
//!
//! A pass runs in three steps:
//!
//! 1. **Compute**: read a fresh [`ViewportGeometry`] and every element's
//!    bounds from the [`LayoutProvider`], and derive each element's target
//!    state. Nothing in the tracker is mutated. Elements whose bounds cannot
//!    be read are set aside as detached.
//! 2. **Commit**: diff targets against current states. Each element yields
//!    at most one [`Transition`] and at most one [`ProgressChange`].
//! 3. **Prune**: detached elements are released and listed in
//!    [`Transitions::pruned`].
//!
//! Target states depend only on the current geometry and the element's
//! configuration, so two passes over unchanged geometry produce an empty
//! second batch.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::backend::LayoutProvider;
use crate::config::{StepCount, TrackMode};
use crate::geometry::{ElementBounds, ViewportGeometry, scroll_progress, touches, visible_ratio};
use crate::trace::{EvaluateBeginEvent, EvaluateEndEvent, PrunedEvent, TransitionEvent, Tracer};

use super::id::ElementId;
use super::store::{ElementState, VisibilityTracker};

/// What changed for one element in one pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// A boolean state turned on.
    Activated,
    /// A boolean state turned off.
    Deactivated,
    /// A stepped element moved to a new step.
    Stepped {
        /// Previous step, or `None` on the first assignment.
        from: Option<u32>,
        /// New step.
        to: u32,
    },
}

impl TransitionKind {
    /// Returns the transition from `old` to `new`, or `None` if they match.
    #[must_use]
    pub fn between(old: ElementState, new: ElementState) -> Option<Self> {
        match (old, new) {
            (ElementState::Flag(a), ElementState::Flag(b)) if a != b => Some(if b {
                Self::Activated
            } else {
                Self::Deactivated
            }),
            (ElementState::Step(from), ElementState::Step(Some(to))) if from != Some(to) => {
                Some(Self::Stepped { from, to })
            }
            _ => None,
        }
    }
}

/// A state transition of one element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// The element that changed.
    pub element: ElementId,
    /// What changed.
    pub kind: TransitionKind,
}

/// A new scroll-progress value for a stepped element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressChange {
    /// The stepped element.
    pub element: ElementId,
    /// Progress through the element, in `[0, 1]`.
    pub percent: f64,
}

/// The batch of changes produced by a single evaluation pass.
#[derive(Clone, Debug, Default)]
pub struct Transitions {
    /// Pass counter this batch belongs to.
    pub pass: u64,
    /// State transitions, in slot order, at most one per element.
    pub changes: Vec<Transition>,
    /// Progress updates for stepped elements whose progress moved.
    pub progress: Vec<ProgressChange>,
    /// Elements dropped because their host could not be measured.
    ///
    /// These handles are already stale when the batch is returned.
    pub pruned: Vec<ElementId>,
}

impl Transitions {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.pass = 0;
        self.changes.clear();
        self.progress.clear();
        self.pruned.clear();
    }

    /// Returns `true` if the pass produced nothing to apply.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.progress.is_empty() && self.pruned.is_empty()
    }
}

/// Target computed for one element during the compute step.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Target {
    pub(crate) idx: u32,
    pub(crate) state: ElementState,
    pub(crate) progress: Option<f64>,
}

/// Returns the step for a progress value: the smallest `i` in `1..=steps`
/// with `percent <= i / steps`, or `1` if none matches.
///
/// Runs in constant time regardless of the step count.
#[must_use]
pub fn step_for(percent: f64, steps: StepCount) -> u32 {
    let n = steps.get();
    // Non-positive progress lands in the first bucket; NaN and values past
    // the last bucket match nothing and fall back to it.
    if percent.is_nan() || percent <= 0.0 || percent > 1.0 {
        return 1;
    }
    let count = f64::from(n);
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "percent is in (0, 1], so the product lies in (0, n]"
    )]
    let mut step = ((percent * count).ceil() as u32).clamp(1, n);
    // Rounding in the product can land one bucket off the `<=` boundary.
    while step < n && percent > f64::from(step) / count {
        step += 1;
    }
    while step > 1 && percent <= f64::from(step - 1) / count {
        step -= 1;
    }
    step
}

/// Derives the state of an element from its geometry and mode.
#[must_use]
pub fn derive_state(
    mode: &TrackMode,
    bounds: &ElementBounds,
    viewport: &ViewportGeometry,
) -> ElementState {
    derive(mode, bounds, viewport).0
}

fn derive(
    mode: &TrackMode,
    bounds: &ElementBounds,
    viewport: &ViewportGeometry,
) -> (ElementState, Option<f64>) {
    match *mode {
        TrackMode::BinaryRatio {
            threshold,
            root_margin,
        } => {
            let band = root_margin.band(viewport);
            let on = touches(bounds, band) && visible_ratio(bounds, band) >= threshold;
            (ElementState::Flag(on), None)
        }
        TrackMode::TopCross => {
            let on = bounds.top() <= 0.0 && bounds.bottom() >= 0.0;
            (ElementState::Flag(on), None)
        }
        TrackMode::BottomVisible => {
            let bottom = bounds.bottom();
            (
                ElementState::Flag(bottom >= 0.0 && bottom <= viewport.height),
                None,
            )
        }
        TrackMode::Stepped { steps } => {
            let percent = scroll_progress(bounds, viewport);
            (
                ElementState::Step(Some(step_for(percent, steps))),
                Some(percent),
            )
        }
    }
}

impl<H> VisibilityTracker<H> {
    /// Evaluates every tracked element against the current layout and
    /// returns the resulting batch.
    pub fn evaluate<L>(&mut self, layout: &L) -> Transitions
    where
        L: LayoutProvider<H> + ?Sized,
    {
        let mut out = Transitions::default();
        self.evaluate_traced(layout, &mut Tracer::none(), &mut out);
        out
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into<L>(&mut self, layout: &L, out: &mut Transitions)
    where
        L: LayoutProvider<H> + ?Sized,
    {
        self.evaluate_traced(layout, &mut Tracer::none(), out);
    }

    /// Like [`evaluate_into`](Self::evaluate_into), reporting pass, transition,
    /// and prune events to `tracer`.
    pub fn evaluate_traced<L>(
        &mut self,
        layout: &L,
        tracer: &mut Tracer<'_>,
        out: &mut Transitions,
    ) where
        L: LayoutProvider<H> + ?Sized,
    {
        out.clear();
        self.pass += 1;
        out.pass = self.pass;

        let viewport = layout.viewport();
        tracer.evaluate_begin(&EvaluateBeginEvent {
            pass: self.pass,
            tracked: self.len(),
            viewport,
        });

        // Compute: read-only over the tracked set.
        let mut targets = core::mem::take(&mut self.targets);
        let mut detached = core::mem::take(&mut self.detached);
        targets.clear();
        detached.clear();
        for idx in 0..self.len {
            let Some(host) = &self.hosts[idx as usize] else {
                continue;
            };
            match layout.bounds(host) {
                Some(bounds) => {
                    let mode = &self.configs[idx as usize].mode;
                    let (state, progress) = derive(mode, &bounds, &viewport);
                    targets.push(Target {
                        idx,
                        state,
                        progress,
                    });
                }
                None => detached.push(idx),
            }
        }

        // Commit.
        for target in &targets {
            let slot = target.idx as usize;
            let element = ElementId {
                idx: target.idx,
                generation: self.generation[slot],
            };

            if let Some(kind) = TransitionKind::between(self.states[slot], target.state) {
                self.states[slot] = target.state;
                out.changes.push(Transition { element, kind });
                tracer.transition(&TransitionEvent {
                    pass: self.pass,
                    element,
                    kind,
                });
            }

            if let Some(percent) = target.progress
                && self.progress[slot] != Some(percent)
            {
                self.progress[slot] = Some(percent);
                out.progress.push(ProgressChange { element, percent });
            }
        }

        // Prune.
        for &idx in &detached {
            let element = ElementId {
                idx,
                generation: self.generation[idx as usize],
            };
            if self.release(idx).is_some() {
                out.pruned.push(element);
                tracer.pruned(&PrunedEvent {
                    pass: self.pass,
                    element,
                });
            }
        }

        self.targets = targets;
        self.detached = detached;

        tracer.evaluate_end(&EvaluateEndEvent {
            pass: self.pass,
            transitions: out.changes.len(),
            progress: out.progress.len(),
            pruned: out.pruned.len(),
        });
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::vec;

    use super::*;
    use crate::config::TrackConfig;

    /// In-memory layout: a viewport plus bounds keyed by host id. Hosts
    /// missing from the map are treated as detached.
    #[derive(Default)]
    struct ScriptedLayout {
        viewport: ViewportGeometry,
        bounds: BTreeMap<u32, ElementBounds>,
    }

    impl ScriptedLayout {
        fn new(height: f64, scroll_offset: f64) -> Self {
            Self {
                viewport: ViewportGeometry::new(height, scroll_offset),
                bounds: BTreeMap::new(),
            }
        }

        fn place(&mut self, host: u32, top: f64, bottom: f64) {
            self.bounds.insert(host, ElementBounds::new(top, bottom));
        }

        /// Scrolls to `offset`, moving every element by the delta.
        fn scroll_to(&mut self, offset: f64) {
            let delta = offset - self.viewport.scroll_offset;
            self.viewport.scroll_offset = offset;
            for b in self.bounds.values_mut() {
                *b = ElementBounds::new(b.top() - delta, b.bottom() - delta);
            }
        }
    }

    impl LayoutProvider<u32> for ScriptedLayout {
        fn viewport(&self) -> ViewportGeometry {
            self.viewport
        }

        fn bounds(&self, host: &u32) -> Option<ElementBounds> {
            self.bounds.get(host).copied()
        }
    }

    fn flag(tracker: &VisibilityTracker<u32>, id: ElementId) -> bool {
        tracker.state(id).is_some_and(ElementState::is_active)
    }

    #[test]
    fn partially_visible_element_crosses_ratio_threshold() {
        let mut layout = ScriptedLayout::new(800.0, 0.0);
        layout.place(1, 100.0, 900.0);

        let mut tracker = VisibilityTracker::new();
        let id = tracker.register(1, TrackConfig::ratio(0.66));
        let changes = tracker.evaluate(&layout);

        assert_eq!(
            changes.changes,
            vec![Transition {
                element: id,
                kind: TransitionKind::Activated
            }]
        );
        assert!(flag(&tracker, id), "ratio 0.875 should pass threshold 0.66");
    }

    #[test]
    fn elements_outside_viewport_are_never_active() {
        for threshold in [0.0, 0.1, 0.5, 1.0] {
            let mut layout = ScriptedLayout::new(800.0, 0.0);
            layout.place(1, 801.0, 1400.0);
            layout.place(2, 2000.0, 2100.0);
            layout.place(3, -600.0, -1.0);
            layout.place(4, -900.0, -10.0);

            let mut tracker = VisibilityTracker::new();
            let ids: Vec<_> = (1..=4)
                .map(|h| tracker.register(h, TrackConfig::ratio(threshold)))
                .collect();
            let changes = tracker.evaluate(&layout);

            assert!(changes.changes.is_empty(), "no element should activate");
            for id in ids {
                assert!(!flag(&tracker, id), "threshold {threshold}: {id:?} inactive");
            }
        }
    }

    #[test]
    fn element_filling_viewport_is_active_for_any_threshold() {
        for threshold in [0.0, 0.25, 0.66, 1.0] {
            let mut layout = ScriptedLayout::new(800.0, 0.0);
            layout.place(1, 0.0, 800.0);
            let mut tracker = VisibilityTracker::new();
            let id = tracker.register(1, TrackConfig::ratio(threshold));
            let _ = tracker.evaluate(&layout);
            assert!(flag(&tracker, id), "threshold {threshold} should be met");
        }
    }

    #[test]
    fn unchanged_geometry_is_idempotent() {
        let mut layout = ScriptedLayout::new(800.0, 0.0);
        layout.place(1, 100.0, 900.0);
        layout.place(2, -300.0, 600.0);
        layout.place(3, -50.0, 400.0);

        let mut tracker = VisibilityTracker::new();
        let _ = tracker.register(1, TrackConfig::ratio(0.66));
        let _ = tracker.register(2, TrackConfig::steps(StepCount::DEFAULT));
        let _ = tracker.register(3, TrackConfig::fixed());

        let first = tracker.evaluate(&layout);
        assert!(!first.is_empty(), "first pass assigns states");

        let mut second = Transitions::default();
        tracker.evaluate_into(&layout, &mut second);
        assert!(second.is_empty(), "second pass must not notify: {second:?}");
        assert_eq!(second.pass, 2);
    }

    #[test]
    fn stepped_examples() {
        // Element at page offset 0, 900 tall.
        let mut layout = ScriptedLayout::new(800.0, 0.0);
        layout.place(1, 0.0, 900.0);
        let mut tracker = VisibilityTracker::new();
        let id = tracker.register(1, TrackConfig::steps(StepCount::DEFAULT));

        let first = tracker.evaluate(&layout);
        assert_eq!(
            first.changes[0].kind,
            TransitionKind::Stepped { from: None, to: 1 }
        );

        layout.scroll_to(300.0);
        let changes = tracker.evaluate(&layout);
        assert!(changes.changes.is_empty(), "1/3 progress stays on step 1");
        assert_eq!(tracker.state(id), Some(ElementState::Step(Some(1))));
        assert_eq!(changes.progress.len(), 1);

        layout.scroll_to(600.0);
        let changes = tracker.evaluate(&layout);
        assert_eq!(
            changes.changes[0].kind,
            TransitionKind::Stepped {
                from: Some(1),
                to: 2
            }
        );

        layout.scroll_to(650.0);
        let changes = tracker.evaluate(&layout);
        assert_eq!(
            changes.changes[0].kind,
            TransitionKind::Stepped {
                from: Some(2),
                to: 3
            }
        );
    }

    #[test]
    fn steps_are_monotonic_in_progress() {
        for n in 1..=6 {
            let steps = StepCount::new(n).unwrap();
            let mut last = 0;
            for k in 0..=1000 {
                let step = step_for(f64::from(k) / 1000.0, steps);
                assert!(step >= last, "n={n} k={k}: {step} < {last}");
                assert!((1..=n).contains(&step), "step {step} out of range");
                last = step;
            }
        }
    }

    #[test]
    fn zero_height_stepped_element_stays_on_first_step() {
        let mut layout = ScriptedLayout::new(800.0, 500.0);
        layout.place(1, -200.0, -200.0);
        let mut tracker = VisibilityTracker::new();
        let id = tracker.register(1, TrackConfig::steps(StepCount::new(4).unwrap()));
        let _ = tracker.evaluate(&layout);
        assert_eq!(tracker.state(id), Some(ElementState::Step(Some(1))));
        assert_eq!(tracker.progress(id), Some(0.0));
    }

    #[test]
    fn detached_elements_are_pruned_once() {
        let mut layout = ScriptedLayout::new(800.0, 0.0);
        layout.place(1, 0.0, 100.0);
        layout.place(2, 0.0, 100.0);

        let mut tracker = VisibilityTracker::new();
        let keep = tracker.register(1, TrackConfig::ratio(0.5));
        let gone = tracker.register(2, TrackConfig::ratio(0.5));
        let _ = tracker.evaluate(&layout);

        let _ = layout.bounds.remove(&2);
        let changes = tracker.evaluate(&layout);
        assert_eq!(changes.pruned, vec![gone]);
        assert!(changes.changes.is_empty(), "pruning is not a transition");
        assert!(!tracker.is_alive(gone), "pruned handle is stale");
        assert!(tracker.is_alive(keep), "attached element survives");

        let changes = tracker.evaluate(&layout);
        assert!(changes.pruned.is_empty(), "pruned elements are reported once");
    }

    #[test]
    fn unregistered_elements_stop_notifying() {
        let mut layout = ScriptedLayout::new(800.0, 0.0);
        layout.place(1, 1000.0, 1200.0);
        let mut tracker = VisibilityTracker::new();
        let id = tracker.register(1, TrackConfig::ratio(0.5));
        let _ = tracker.evaluate(&layout);

        let _ = tracker.unregister(id);
        layout.place(1, 0.0, 200.0);
        let changes = tracker.evaluate(&layout);
        assert!(changes.is_empty(), "no notifications after unregister");
    }

    #[test]
    fn leaving_the_viewport_deactivates() {
        let mut layout = ScriptedLayout::new(800.0, 0.0);
        layout.place(1, 100.0, 500.0);
        let mut tracker = VisibilityTracker::new();
        let id = tracker.register(1, TrackConfig::ratio(0.5));
        let _ = tracker.evaluate(&layout);
        assert!(flag(&tracker, id), "fully visible element is active");

        layout.scroll_to(1000.0);
        let changes = tracker.evaluate(&layout);
        assert_eq!(changes.changes[0].kind, TransitionKind::Deactivated);
    }

    #[test]
    fn reveal_margin_ignores_bottom_quarter() {
        let mut layout = ScriptedLayout::new(800.0, 0.0);
        layout.place(1, 640.0, 1000.0);
        layout.place(2, 560.0, 1000.0);
        let mut tracker = VisibilityTracker::new();
        let low = tracker.register(1, TrackConfig::reveal());
        let high = tracker.register(2, TrackConfig::reveal());
        let _ = tracker.evaluate(&layout);
        assert!(!flag(&tracker, low), "top at 80% of viewport is not revealed");
        assert!(flag(&tracker, high), "top at 70% of viewport is revealed");
    }

    #[test]
    fn sticky_modes() {
        let mut layout = ScriptedLayout::new(800.0, 0.0);
        layout.place(1, 200.0, 2200.0);
        let mut tracker = VisibilityTracker::new();
        let fixed = tracker.register(1, TrackConfig::fixed());
        let bottom = tracker.register(1, TrackConfig::at_bottom());

        let _ = tracker.evaluate(&layout);
        assert!(!flag(&tracker, fixed), "top still below viewport top");
        assert!(!flag(&tracker, bottom), "bottom below viewport");

        layout.scroll_to(200.0);
        let changes = tracker.evaluate(&layout);
        assert_eq!(changes.changes.len(), 1);
        assert!(flag(&tracker, fixed), "top reached viewport top");

        layout.scroll_to(1600.0);
        let _ = tracker.evaluate(&layout);
        assert!(flag(&tracker, fixed), "top stays above");
        assert!(flag(&tracker, bottom), "bottom edge at 600 is on screen");

        layout.scroll_to(2300.0);
        let _ = tracker.evaluate(&layout);
        assert!(!flag(&tracker, bottom), "bottom scrolled above viewport");
        assert!(!flag(&tracker, fixed), "element fully above releases fixed");
    }

    #[test]
    fn fixed_holds_only_while_the_element_spans_the_top_edge() {
        let vp = ViewportGeometry::new(800.0, 0.0);
        let mode = TrackConfig::fixed().mode;
        let state = |top, bottom| derive_state(&mode, &ElementBounds::new(top, bottom), &vp);
        assert_eq!(state(10.0, 900.0), ElementState::Flag(false));
        assert_eq!(state(0.0, 900.0), ElementState::Flag(true));
        assert_eq!(state(-500.0, 400.0), ElementState::Flag(true));
        assert_eq!(state(-900.0, 0.0), ElementState::Flag(true));
        assert_eq!(state(-3000.0, -1000.0), ElementState::Flag(false));
    }

    #[test]
    fn reveal_counts_contact_with_the_margin_edge() {
        // 800 px viewport with a -25 % bottom margin: the band ends at 600.
        let mut layout = ScriptedLayout::new(800.0, 0.0);
        layout.place(1, 600.0, 900.0);
        layout.place(2, 601.0, 900.0);
        let mut tracker = VisibilityTracker::new();
        let edge = tracker.register(1, TrackConfig::reveal());
        let below = tracker.register(2, TrackConfig::reveal());
        let _ = tracker.evaluate(&layout);
        assert!(flag(&tracker, edge), "top on the band edge is revealed");
        assert!(!flag(&tracker, below), "top below the band edge is not");
    }

    #[test]
    fn closed_form_step_matches_bucket_scan() {
        fn scan(percent: f64, n: u32) -> u32 {
            (1..=n)
                .find(|&i| percent <= f64::from(i) / f64::from(n))
                .unwrap_or(1)
        }
        for n in 1..=50 {
            let steps = StepCount::new(n).unwrap();
            for k in 0..=(n * 20) {
                let percent = f64::from(k) / f64::from(n * 20);
                assert_eq!(step_for(percent, steps), scan(percent, n), "n={n} k={k}");
            }
            for i in 0..=n {
                let boundary = f64::from(i) / f64::from(n);
                assert_eq!(step_for(boundary, steps), scan(boundary, n), "n={n} at {i}/{n}");
            }
        }
        let three = StepCount::DEFAULT;
        assert_eq!(step_for(f64::NAN, three), 1);
        assert_eq!(step_for(-0.5, three), 1);
        assert_eq!(step_for(1.5, three), 1);
    }

    #[test]
    fn huge_step_counts_resolve_immediately() {
        let steps = StepCount::parse("4000000000").unwrap();
        assert_eq!(step_for(1.0, steps), 4_000_000_000);
        assert_eq!(step_for(0.5, steps), 2_000_000_000);
        assert_eq!(step_for(0.0, steps), 1);
    }

    #[test]
    fn one_transition_per_element_per_pass() {
        let mut layout = ScriptedLayout::new(800.0, 0.0);
        for h in 0..8 {
            layout.place(h, f64::from(h) * 150.0, f64::from(h) * 150.0 + 400.0);
        }
        let mut tracker = VisibilityTracker::new();
        for h in 0..8 {
            let _ = tracker.register(h, TrackConfig::ratio(0.3));
            let _ = tracker.register(h, TrackConfig::steps(StepCount::new(5).unwrap()));
        }
        layout.scroll_to(420.0);
        let changes = tracker.evaluate(&layout);
        let mut seen: Vec<_> = changes.changes.iter().map(|t| t.element).collect();
        let total = seen.len();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), total, "duplicate notifications in one pass");
    }

    #[test]
    fn transition_between_states() {
        assert_eq!(
            TransitionKind::between(ElementState::Flag(false), ElementState::Flag(true)),
            Some(TransitionKind::Activated)
        );
        assert_eq!(
            TransitionKind::between(ElementState::Flag(true), ElementState::Flag(true)),
            None
        );
        assert_eq!(
            TransitionKind::between(ElementState::Step(Some(2)), ElementState::Step(Some(2))),
            None
        );
        assert_eq!(
            TransitionKind::between(ElementState::Step(None), ElementState::Step(Some(1))),
            Some(TransitionKind::Stepped { from: None, to: 1 })
        );
    }

    #[test]
    fn derive_state_matches_pass_result() {
        let vp = ViewportGeometry::new(800.0, 0.0);
        let bounds = ElementBounds::new(100.0, 900.0);
        assert_eq!(
            derive_state(&TrackConfig::ratio(0.66).mode, &bounds, &vp),
            ElementState::Flag(true)
        );
        assert_eq!(
            derive_state(&TrackConfig::ratio(0.9).mode, &bounds, &vp),
            ElementState::Flag(false)
        );
    }
}
