// Copyright 2026 the Lookout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-driven evaluation loop.
//!
//! [`ScrollDriver`] listens for `scroll` and `resize` on the window, gates
//! them through a [`FrameGate`], and runs one tracker evaluation inside a
//! one-shot `requestAnimationFrame` callback. Unlike a continuous animation
//! loop, nothing is scheduled while the page is idle.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use lookout_core::backend::Presenter as _;
use lookout_core::gate::FrameGate;
use lookout_core::trace::{TraceSink, Tracer};
use lookout_core::tracker::{Transitions, VisibilityTracker};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Element, Window};

use crate::layout::DomLayout;
use crate::presenter::ClassListPresenter;

// Direct global bindings instead of `web_sys::Window` methods, so the frame
// path never has to fetch the window.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

/// Window-driven visibility evaluation.
///
/// Create with [`ScrollDriver::new`], then call [`init`](Self::init) to run
/// the initial pass and start listening. [`dispose`](Self::dispose) (or
/// dropping the driver) removes the listeners, cancels any pending frame and
/// forgets every tracked element.
pub struct ScrollDriver {
    inner: Rc<DriverInner>,
}

type FrameClosure = Closure<dyn FnMut(f64)>;
type ListenerClosure = Closure<dyn FnMut()>;

struct DriverInner {
    window: Window,
    layout: DomLayout,
    tracker: RefCell<VisibilityTracker<Element>>,
    presenter: RefCell<ClassListPresenter>,
    /// Reused across passes.
    transitions: RefCell<Transitions>,
    gate: Cell<FrameGate>,
    sink: RefCell<Option<Box<dyn TraceSink>>>,

    /// The one-shot closure handed to `requestAnimationFrame`.
    frame: RefCell<Option<FrameClosure>>,
    /// Shared `scroll` / `resize` listener.
    listener: RefCell<Option<ListenerClosure>>,

    running: Cell<bool>,
    raf_id: Cell<i32>,
}

impl ScrollDriver {
    /// Creates a driver that is **not yet listening**.
    #[must_use]
    pub fn new(
        window: Window,
        tracker: VisibilityTracker<Element>,
        presenter: ClassListPresenter,
    ) -> Self {
        Self {
            inner: Rc::new(DriverInner {
                layout: DomLayout::new(window.clone()),
                window,
                tracker: RefCell::new(tracker),
                presenter: RefCell::new(presenter),
                transitions: RefCell::new(Transitions::default()),
                gate: Cell::new(FrameGate::new()),
                sink: RefCell::new(None),
                frame: RefCell::new(None),
                listener: RefCell::new(None),
                running: Cell::new(false),
                raf_id: Cell::new(0),
            }),
        }
    }

    /// Routes evaluation events to `sink`.
    ///
    /// Requires the `trace` feature.
    #[cfg(feature = "trace")]
    #[must_use]
    pub fn with_trace_sink(self, sink: Box<dyn TraceSink>) -> Self {
        *self.inner.sink.borrow_mut() = Some(sink);
        self
    }

    /// Runs the initial evaluation and starts listening for `scroll`
    /// (passive) and `resize`.
    ///
    /// If already running, this is a no-op.
    pub fn init(&self) -> Result<(), JsValue> {
        if self.inner.running.get() {
            return Ok(());
        }

        let inner = Rc::clone(&self.inner);
        let frame = Closure::wrap(Box::new(move |_timestamp_ms: f64| {
            let mut gate = inner.gate.get();
            let due = gate.begin_frame();
            inner.gate.set(gate);
            if due && inner.running.get() {
                inner.run_pass();
            }
        }) as Box<dyn FnMut(f64)>);

        let inner = Rc::clone(&self.inner);
        let listener = Closure::wrap(Box::new(move || {
            inner.schedule();
        }) as Box<dyn FnMut()>);

        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        let callback = listener.as_ref().unchecked_ref();
        self.inner
            .window
            .add_event_listener_with_callback_and_add_event_listener_options(
                "scroll", callback, &options,
            )?;
        if let Err(err) = self
            .inner
            .window
            .add_event_listener_with_callback("resize", callback)
        {
            let _ = self
                .inner
                .window
                .remove_event_listener_with_callback("scroll", callback);
            return Err(err);
        }

        *self.inner.frame.borrow_mut() = Some(frame);
        *self.inner.listener.borrow_mut() = Some(listener);
        self.inner.running.set(true);

        self.inner.run_pass();
        Ok(())
    }

    /// Stops listening and clears the tracker.
    ///
    /// Safe to call more than once.
    pub fn dispose(&self) {
        if let Some(listener) = self.inner.listener.borrow_mut().take() {
            let callback = listener.as_ref().unchecked_ref();
            let _ = self
                .inner
                .window
                .remove_event_listener_with_callback("scroll", callback);
            let _ = self
                .inner
                .window
                .remove_event_listener_with_callback("resize", callback);
        }

        let mut gate = self.inner.gate.get();
        if gate.is_pending() {
            cancel_animation_frame(self.inner.raf_id.get());
            gate.cancel();
            self.inner.gate.set(gate);
        }
        // Drop the JS closure so it doesn't leak.
        self.inner.frame.borrow_mut().take();

        self.inner.running.set(false);
        self.inner.tracker.borrow_mut().clear();
        self.inner.transitions.borrow_mut().clear();
    }

    /// Runs an evaluation immediately, outside the frame gate.
    pub fn evaluate_now(&self) {
        self.inner.run_pass();
    }

    /// Returns `true` between [`init`](Self::init) and
    /// [`dispose`](Self::dispose).
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    /// Returns the number of tracked elements.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.inner.tracker.borrow().len()
    }

    /// Returns the frame gate's counters.
    #[must_use]
    pub fn gate(&self) -> FrameGate {
        self.inner.gate.get()
    }
}

impl DriverInner {
    fn schedule(&self) {
        let mut gate = self.gate.get();
        if gate.request()
            && let Some(ref frame) = *self.frame.borrow()
        {
            let id = request_animation_frame(frame.as_ref().unchecked_ref());
            self.raf_id.set(id);
        }
        self.gate.set(gate);
    }

    fn run_pass(&self) {
        let mut tracker = self.tracker.borrow_mut();
        let mut transitions = self.transitions.borrow_mut();
        let mut sink = self.sink.borrow_mut();
        let mut tracer = match sink.as_deref_mut() {
            Some(sink) => Tracer::new(sink),
            None => Tracer::none(),
        };
        tracker.evaluate_traced(&self.layout, &mut tracer, &mut transitions);
        if !transitions.is_empty() {
            self.presenter.borrow_mut().apply(&tracker, &transitions);
        }
    }
}

impl Drop for ScrollDriver {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl core::fmt::Debug for ScrollDriver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollDriver")
            .field("running", &self.inner.running.get())
            .field("tracked", &self.tracked())
            .field("gate", &self.inner.gate.get())
            .finish_non_exhaustive()
    }
}
