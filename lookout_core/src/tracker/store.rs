// Copyright 2026 the Lookout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays element storage with registration and queries.

use alloc::vec::Vec;

use crate::config::{TrackConfig, TrackMode};

use super::evaluate::Target;
use super::id::ElementId;

/// Current derived state of a tracked element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementState {
    /// Boolean modes (binary-ratio, top-cross, bottom-visible).
    Flag(bool),
    /// Stepped mode. `None` until the first evaluation assigns a step.
    Step(Option<u32>),
}

impl ElementState {
    /// State an element starts in before its first evaluation.
    ///
    /// Boolean modes start off, matching a host element that does not carry
    /// the class yet; stepped modes start without a step so the first pass
    /// always assigns one.
    #[must_use]
    pub const fn initial(mode: &TrackMode) -> Self {
        if mode.is_stepped() {
            Self::Step(None)
        } else {
            Self::Flag(false)
        }
    }

    /// Returns `true` for an active boolean state.
    #[inline]
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Flag(true))
    }

    /// Returns the current step, if this is an assigned stepped state.
    #[inline]
    #[must_use]
    pub const fn step(self) -> Option<u32> {
        match self {
            Self::Step(step) => step,
            Self::Flag(_) => None,
        }
    }
}

/// Tracks a set of host elements and derives per-element state from their
/// geometry.
///
/// `H` is the host's opaque element handle (a DOM `Element`, a widget id, or
/// a plain integer in tests). Elements are addressed by [`ElementId`]
/// handles; internally each occupies a slot in parallel arrays. Unregistered
/// slots are recycled via a free list, and generation counters make stale
/// handles inert: queries return `None` and removal returns `None` instead of
/// panicking.
///
/// The tracked set is only mutated by [`register`](Self::register),
/// [`unregister`](Self::unregister), [`clear`](Self::clear), and the pruning
/// step at the end of [`evaluate`](Self::evaluate).
#[derive(Debug)]
pub struct VisibilityTracker<H> {
    // -- Per-element data --
    pub(crate) hosts: Vec<Option<H>>,
    pub(crate) configs: Vec<TrackConfig>,
    pub(crate) states: Vec<ElementState>,
    pub(crate) progress: Vec<Option<f64>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,
    pub(crate) live: u32,

    // -- Evaluation --
    pub(crate) pass: u64,
    pub(crate) targets: Vec<Target>,
    pub(crate) detached: Vec<u32>,
}

impl<H> Default for VisibilityTracker<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> VisibilityTracker<H> {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hosts: Vec::new(),
            configs: Vec::new(),
            states: Vec::new(),
            progress: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            live: 0,
            pass: 0,
            targets: Vec::new(),
            detached: Vec::new(),
        }
    }

    // -- Registration API --

    /// Starts tracking `host` with the given configuration.
    ///
    /// The element starts in [`ElementState::initial`] and is first evaluated
    /// by the next [`evaluate`](Self::evaluate) call.
    pub fn register(&mut self, host: H, config: TrackConfig) -> ElementId {
        let state = ElementState::initial(&config.mode);
        let idx = if let Some(idx) = self.free_list.pop() {
            let slot = idx as usize;
            self.hosts[slot] = Some(host);
            self.configs[slot] = config;
            self.states[slot] = state;
            self.progress[slot] = None;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.hosts.push(Some(host));
            self.configs.push(config);
            self.states.push(state);
            self.progress.push(None);
            self.generation.push(0);
            idx
        };
        self.live += 1;

        ElementId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Stops tracking an element and hands its host handle back.
    ///
    /// Returns `None` if the handle is stale (already unregistered or
    /// pruned). No further transitions are produced for the element.
    pub fn unregister(&mut self, id: ElementId) -> Option<H> {
        if !self.is_alive(id) {
            return None;
        }
        self.release(id.idx)
    }

    /// Stops tracking every element. Outstanding handles become stale.
    pub fn clear(&mut self) {
        for idx in 0..self.len {
            if self.hosts[idx as usize].is_some() {
                let _ = self.release(idx);
            }
        }
    }

    /// Returns whether the given handle refers to a tracked element.
    #[must_use]
    pub fn is_alive(&self, id: ElementId) -> bool {
        id.idx < self.len
            && self.generation[id.idx as usize] == id.generation
            && self.hosts[id.idx as usize].is_some()
    }

    // -- Queries --

    /// Number of tracked elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.live as usize
    }

    /// Returns `true` if nothing is tracked.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of completed evaluation passes.
    #[inline]
    #[must_use]
    pub fn pass(&self) -> u64 {
        self.pass
    }

    /// Returns the host handle of a tracked element.
    #[must_use]
    pub fn host(&self, id: ElementId) -> Option<&H> {
        if !self.is_alive(id) {
            return None;
        }
        self.hosts[id.idx as usize].as_ref()
    }

    /// Returns the configuration of a tracked element.
    #[must_use]
    pub fn config(&self, id: ElementId) -> Option<&TrackConfig> {
        self.is_alive(id).then(|| &self.configs[id.idx as usize])
    }

    /// Returns the current state of a tracked element.
    #[must_use]
    pub fn state(&self, id: ElementId) -> Option<ElementState> {
        self.is_alive(id).then(|| self.states[id.idx as usize])
    }

    /// Returns the last computed scroll progress of a stepped element.
    ///
    /// `None` for boolean modes and for stepped elements not yet evaluated.
    #[must_use]
    pub fn progress(&self, id: ElementId) -> Option<f64> {
        if !self.is_alive(id) {
            return None;
        }
        self.progress[id.idx as usize]
    }

    /// Iterates over tracked elements in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &H)> + '_ {
        self.hosts.iter().enumerate().filter_map(|(slot, host)| {
            let host = host.as_ref()?;
            let idx = u32::try_from(slot).ok()?;
            Some((
                ElementId {
                    idx,
                    generation: self.generation[slot],
                },
                host,
            ))
        })
    }

    // -- Internal helpers --

    /// Frees slot `idx`, bumping its generation so old handles go stale.
    pub(crate) fn release(&mut self, idx: u32) -> Option<H> {
        let slot = idx as usize;
        let host = self.hosts[slot].take()?;
        self.generation[slot] = self.generation[slot].wrapping_add(1);
        self.free_list.push(idx);
        self.live -= 1;
        Some(host)
    }
}

impl<H: PartialEq> VisibilityTracker<H> {
    /// Finds the handle for a host element, if it is tracked.
    ///
    /// A host registered more than once (for example with both
    /// [`TrackConfig::fixed`] and [`TrackConfig::at_bottom`]) yields its
    /// lowest slot; use [`iter`](Self::iter) to see every registration.
    #[must_use]
    pub fn find(&self, host: &H) -> Option<ElementId> {
        self.iter().find(|(_, h)| *h == host).map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::config::StepCount;

    #[test]
    fn register_and_unregister() {
        let mut tracker = VisibilityTracker::new();
        let id = tracker.register(7_u32, TrackConfig::ratio(0.66));
        assert!(tracker.is_alive(id), "registered element should be alive");
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.host(id), Some(&7));

        assert_eq!(tracker.unregister(id), Some(7));
        assert!(!tracker.is_alive(id), "unregistered element should be stale");
        assert!(tracker.is_empty(), "tracker should be empty");
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut tracker = VisibilityTracker::new();
        let id1 = tracker.register(1_u32, TrackConfig::fixed());
        let _ = tracker.unregister(id1);
        let id2 = tracker.register(2_u32, TrackConfig::at_bottom());

        assert_eq!(id1.index(), id2.index());
        assert_ne!(id1.generation(), id2.generation());
        assert!(!tracker.is_alive(id1), "old handle must not alias the new slot");
        assert_eq!(tracker.host(id1), None);
        assert_eq!(tracker.config(id1), None);
        assert_eq!(tracker.host(id2), Some(&2));
    }

    #[test]
    fn unregister_stale_handle_is_noop() {
        let mut tracker = VisibilityTracker::new();
        let id = tracker.register(1_u32, TrackConfig::fixed());
        assert_eq!(tracker.unregister(id), Some(1));
        assert_eq!(tracker.unregister(id), None);
        assert_eq!(tracker.len(), 0);
    }

    #[test]
    fn initial_states_follow_mode() {
        let mut tracker = VisibilityTracker::new();
        let flag = tracker.register(1_u32, TrackConfig::reveal());
        let stepped = tracker.register(2_u32, TrackConfig::steps(StepCount::DEFAULT));
        assert_eq!(tracker.state(flag), Some(ElementState::Flag(false)));
        assert_eq!(tracker.state(stepped), Some(ElementState::Step(None)));
        assert_eq!(tracker.progress(stepped), None);
    }

    #[test]
    fn clear_releases_everything() {
        let mut tracker = VisibilityTracker::new();
        let ids: Vec<_> = (0..4_u32)
            .map(|h| tracker.register(h, TrackConfig::fixed()))
            .collect();
        tracker.clear();
        assert!(tracker.is_empty(), "clear should drop every element");
        assert!(ids.iter().all(|&id| !tracker.is_alive(id)), "handles go stale");
        assert_eq!(tracker.iter().count(), 0);
    }

    #[test]
    fn iter_and_find_skip_freed_slots() {
        let mut tracker = VisibilityTracker::new();
        let a = tracker.register(10_u32, TrackConfig::fixed());
        let b = tracker.register(20_u32, TrackConfig::fixed());
        let c = tracker.register(30_u32, TrackConfig::fixed());
        let _ = tracker.unregister(b);

        let hosts: Vec<u32> = tracker.iter().map(|(_, h)| *h).collect();
        assert_eq!(hosts, vec![10, 30]);
        assert_eq!(tracker.find(&30), Some(c));
        assert_eq!(tracker.find(&10), Some(a));
        assert_eq!(tracker.find(&20), None);
    }
}
