//! Frame Scheduler - Coalesced per-frame callback dispatch
//!
//! Callers register callbacks (optionally tied to a host element) and
//! the scheduler folds all of them into a single upstream frame
//! request. On each tick it dispatches only the entries whose gating
//! conditions pass; the rest stay queued. Off-screen work therefore
//! burns no CPU, and resumes automatically once its element becomes
//! eligible.
//!
//! The upstream primitives are injected through [`FrameDriver`]:
//! a native per-frame callback when the platform has one (re-armed only
//! while the queue is non-empty), or a fixed-rate 60 Hz interval that is
//! installed once and left running (see [`clock`]).
//!
//! Eligibility per entry, checked against the [`HostInspector`] passed
//! into [`tick`](FrameScheduler::tick):
//!
//! - no associated element, or
//! - the element is in view AND (the window is focused OR the element
//!   carries `keepalive="true"`).
//!
//! Within one tick, eligible entries fire in reverse registration order
//! (last registered first). Callers rely on that order for layering.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use easel_events::event::add_listeners;
//! use easel_events::host::HostRegistry;
//! use easel_events::scheduler::{FrameScheduler, TimerDriver};
//!
//! let scheduler = FrameScheduler::new(TimerDriver::new());
//! add_listeners(Some(&window), &scheduler.focus_listeners());
//!
//! let view = scheduler.clone();
//! scheduler.schedule(move || view.redraw(), Some(canvas));
//!
//! // Embedder loop
//! if scheduler.driver().take_due() {
//!     scheduler.tick(&host);
//! }
//! ```

pub mod clock;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use spark_signals::{signal, Signal};

use crate::event::{EventMap, PointerEvent};
use crate::host::HostInspector;

pub use clock::{IntervalClock, TimerDriver};

// =============================================================================
// TYPES
// =============================================================================

/// Fallback tick period: 60 frames per second.
pub const FRAME_PERIOD: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Element attribute that lets an entry bypass the window-focus gate.
/// Visibility is still required.
pub const KEEPALIVE_ATTRIBUTE: &str = "keepalive";

/// A scheduled callback. Fires at most once.
pub type FrameCallback = Box<dyn FnOnce()>;

/// One pending queue entry: the callback and its gating element.
struct Entry {
    callback: FrameCallback,
    element: Option<usize>,
}

/// Queue and upstream-request bookkeeping, shared across handles.
struct SchedulerState {
    callbacks: Vec<Entry>,
    requested: bool,
    timer_installed: bool,
    ticking: bool,
}

// =============================================================================
// FRAME DRIVER
// =============================================================================

/// Injected upstream frame primitives.
///
/// Implementations never invoke callbacks themselves; they only arm the
/// platform mechanism. The embedder calls
/// [`FrameScheduler::tick`] when that mechanism fires.
pub trait FrameDriver {
    /// True when the platform exposes a native per-frame callback
    /// primitive. Decides between request-per-frame and interval mode.
    fn has_native_frames(&self) -> bool;

    /// Arm one upstream per-frame callback. Only called in native mode.
    fn request_frame(&self);

    /// Install the fallback repeating timer. Called at most once per
    /// scheduler, only in non-native mode; the timer stays running.
    fn start_interval(&self, period: Duration);
}

// =============================================================================
// FRAME SCHEDULER
// =============================================================================

/// Coalescing frame scheduler.
///
/// Cheap-clone handle over shared state, so callbacks can hold a clone
/// and reschedule themselves from inside a tick. Entries scheduled
/// during a tick are not considered until the next tick.
pub struct FrameScheduler<D: FrameDriver> {
    state: Rc<RefCell<SchedulerState>>,
    driver: Rc<D>,
    focused: Signal<bool>,
}

impl<D: FrameDriver> Clone for FrameScheduler<D> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            driver: self.driver.clone(),
            focused: self.focused.clone(),
        }
    }
}

impl<D: FrameDriver> FrameScheduler<D> {
    /// Create a scheduler over the given driver. The window starts
    /// focused; attach [`focus_listeners`](Self::focus_listeners) to a
    /// window-like target to track real focus changes.
    pub fn new(driver: D) -> Self {
        Self {
            state: Rc::new(RefCell::new(SchedulerState {
                callbacks: Vec::new(),
                requested: false,
                timer_installed: false,
                ticking: false,
            })),
            driver: Rc::new(driver),
            focused: signal(true),
        }
    }

    /// Access the injected driver (e.g. to poll a [`TimerDriver`]).
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Enqueue a callback for a subsequent tick. Never invokes
    /// synchronously.
    ///
    /// With an element, invocation waits until the element passes the
    /// visibility/focus gate, indefinitely if it never does.
    pub fn schedule(&self, callback: impl FnOnce() + 'static, element: Option<usize>) {
        let mut state = self.state.borrow_mut();
        state.callbacks.push(Entry {
            callback: Box::new(callback),
            element,
        });

        if self.driver.has_native_frames() {
            // One upstream request covers all collected callbacks.
            if !state.requested {
                state.requested = true;
                drop(state);
                self.driver.request_frame();
            }
        } else if !state.timer_installed {
            state.timer_installed = true;
            drop(state);
            self.driver.start_interval(FRAME_PERIOD);
        }
    }

    /// Run one eligibility scan and dispatch pass.
    ///
    /// Scans the queue in reverse insertion order; each eligible entry
    /// is removed and invoked immediately, exactly once. In native mode
    /// the driver is re-armed only while entries remain queued.
    ///
    /// A nested tick from inside a callback is a no-op: one scan owns
    /// the queue at a time.
    pub fn tick(&self, inspector: &impl HostInspector) {
        {
            let mut state = self.state.borrow_mut();
            if state.ticking {
                return;
            }
            state.ticking = true;
        }

        // Scan downward from the length at tick start; entries pushed
        // by callbacks during the tick sit above and wait their turn.
        let mut i = self.state.borrow().callbacks.len();
        while i > 0 {
            i -= 1;
            let element = self.state.borrow().callbacks[i].element;
            let eligible = match element {
                None => true,
                Some(el) => {
                    let keep_alive = inspector
                        .attribute(el, KEEPALIVE_ATTRIBUTE)
                        .as_deref()
                        == Some("true");
                    (keep_alive || self.focused.get()) && inspector.is_in_view(el)
                }
            };
            if eligible {
                // Remove before invoking: the entry must leave the
                // queue exactly once, and only for its invocation.
                let entry = self.state.borrow_mut().callbacks.remove(i);
                (entry.callback)();
            }
        }

        self.state.borrow_mut().ticking = false;

        if self.driver.has_native_frames() {
            if self.state.borrow().callbacks.is_empty() {
                self.state.borrow_mut().requested = false;
            } else {
                // Deferred or freshly scheduled entries remain: keep
                // the loop alive, it would die off otherwise.
                self.driver.request_frame();
            }
        }
    }

    /// Number of entries waiting for a tick.
    pub fn pending(&self) -> usize {
        self.state.borrow().callbacks.len()
    }

    /// Current window-focus state.
    pub fn focused(&self) -> bool {
        self.focused.get()
    }

    /// Override the window-focus state directly.
    pub fn set_focused(&self, focused: bool) {
        self.focused.set(focused);
    }

    /// `focus`/`blur` listeners that keep the focus flag in sync.
    /// Attach to a window-like target with
    /// [`add_listeners`](crate::event::add_listeners).
    pub fn focus_listeners(&self) -> EventMap {
        let on_focus = self.focused.clone();
        let on_blur = self.focused.clone();
        EventMap::new()
            .on("focus", Rc::new(move |_: &PointerEvent| {
                on_focus.set(true);
            }))
            .on("blur", Rc::new(move |_: &PointerEvent| {
                on_blur.set(false);
            }))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{add_listeners, EventEmitter};
    use crate::host::HostRegistry;
    use std::cell::Cell;

    /// Driver double: records upstream calls, performs nothing.
    struct RecordingDriver {
        native: bool,
        frame_requests: Cell<usize>,
        intervals_started: Cell<usize>,
    }

    impl RecordingDriver {
        fn native() -> Self {
            Self {
                native: true,
                frame_requests: Cell::new(0),
                intervals_started: Cell::new(0),
            }
        }

        fn fallback() -> Self {
            Self {
                native: false,
                frame_requests: Cell::new(0),
                intervals_started: Cell::new(0),
            }
        }
    }

    impl FrameDriver for RecordingDriver {
        fn has_native_frames(&self) -> bool {
            self.native
        }

        fn request_frame(&self) {
            self.frame_requests.set(self.frame_requests.get() + 1);
        }

        fn start_interval(&self, _period: Duration) {
            self.intervals_started.set(self.intervals_started.get() + 1);
        }
    }

    fn visible_element(host: &mut HostRegistry) -> usize {
        let el = host.insert();
        host.set_in_view(el, true);
        el
    }

    #[test]
    fn test_schedule_never_invokes_synchronously() {
        let scheduler = FrameScheduler::new(RecordingDriver::native());
        let fired = Rc::new(Cell::new(false));
        let fired_clone = fired.clone();

        scheduler.schedule(move || fired_clone.set(true), None);

        assert!(!fired.get());
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_elementless_callbacks_fire_in_reverse_order() {
        let scheduler = FrameScheduler::new(RecordingDriver::native());
        let host = HostRegistry::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for label in ["a", "b", "c"] {
            let order = order.clone();
            scheduler.schedule(move || order.borrow_mut().push(label), None);
        }

        scheduler.tick(&host);

        assert_eq!(*order.borrow(), vec!["c", "b", "a"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_invisible_element_defers_until_visible() {
        let scheduler = FrameScheduler::new(RecordingDriver::native());
        let mut host = HostRegistry::new();
        let el = host.insert();

        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        scheduler.schedule(move || count_clone.set(count_clone.get() + 1), Some(el));

        // Out of view: any number of ticks leaves the entry queued.
        for _ in 0..5 {
            scheduler.tick(&host);
        }
        assert_eq!(count.get(), 0);
        assert_eq!(scheduler.pending(), 1);

        // In view with focus: fires on the next tick, exactly once.
        host.set_in_view(el, true);
        scheduler.tick(&host);
        assert_eq!(count.get(), 1);
        assert_eq!(scheduler.pending(), 0);

        scheduler.tick(&host);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_blur_gates_visible_elements() {
        let scheduler = FrameScheduler::new(RecordingDriver::native());
        let mut host = HostRegistry::new();
        let el = visible_element(&mut host);

        let fired = Rc::new(Cell::new(false));
        let fired_clone = fired.clone();
        scheduler.schedule(move || fired_clone.set(true), Some(el));

        scheduler.set_focused(false);
        scheduler.tick(&host);
        assert!(!fired.get());

        scheduler.set_focused(true);
        scheduler.tick(&host);
        assert!(fired.get());
    }

    #[test]
    fn test_keepalive_bypasses_focus_but_not_visibility() {
        let scheduler = FrameScheduler::new(RecordingDriver::native());
        let mut host = HostRegistry::new();
        let el = host.insert();
        host.set_attribute(el, KEEPALIVE_ATTRIBUTE, "true");

        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        scheduler.schedule(move || count_clone.set(count_clone.get() + 1), Some(el));

        scheduler.set_focused(false);

        // Keepalive does not override the visibility gate.
        scheduler.tick(&host);
        assert_eq!(count.get(), 0);

        // Visible but blurred: keepalive lets it through.
        host.set_in_view(el, true);
        scheduler.tick(&host);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_keepalive_must_be_exactly_true() {
        let scheduler = FrameScheduler::new(RecordingDriver::native());
        let mut host = HostRegistry::new();
        let el = visible_element(&mut host);
        host.set_attribute(el, KEEPALIVE_ATTRIBUTE, "yes");

        let fired = Rc::new(Cell::new(false));
        let fired_clone = fired.clone();
        scheduler.schedule(move || fired_clone.set(true), Some(el));

        scheduler.set_focused(false);
        scheduler.tick(&host);
        assert!(!fired.get());
    }

    #[test]
    fn test_mixed_eligibility_partitions_queue() {
        let scheduler = FrameScheduler::new(RecordingDriver::native());
        let mut host = HostRegistry::new();
        let visible = visible_element(&mut host);
        let hidden = host.insert();

        let order = Rc::new(RefCell::new(Vec::new()));
        let log = |label: &'static str| {
            let order = order.clone();
            move || order.borrow_mut().push(label)
        };

        scheduler.schedule(log("free"), None);
        scheduler.schedule(log("hidden"), Some(hidden));
        scheduler.schedule(log("visible"), Some(visible));

        scheduler.tick(&host);

        // Reverse scan: visible fires before free; hidden stays queued.
        assert_eq!(*order.borrow(), vec!["visible", "free"]);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_native_request_coalesced_and_rearmed() {
        let scheduler = FrameScheduler::new(RecordingDriver::native());
        let mut host = HostRegistry::new();
        let hidden = host.insert();

        scheduler.schedule(|| {}, None);
        scheduler.schedule(|| {}, None);
        scheduler.schedule(|| {}, Some(hidden));

        // Many registrations, one upstream request.
        assert_eq!(scheduler.driver().frame_requests.get(), 1);
        assert_eq!(scheduler.driver().intervals_started.get(), 0);

        // The hidden entry survives the tick, so the loop is re-armed.
        scheduler.tick(&host);
        assert_eq!(scheduler.driver().frame_requests.get(), 2);

        // Drained: no further requests, and a new schedule re-requests.
        host.set_in_view(hidden, true);
        scheduler.tick(&host);
        assert_eq!(scheduler.driver().frame_requests.get(), 2);

        scheduler.schedule(|| {}, None);
        assert_eq!(scheduler.driver().frame_requests.get(), 3);
    }

    #[test]
    fn test_fallback_interval_installed_once() {
        let scheduler = FrameScheduler::new(RecordingDriver::fallback());
        let host = HostRegistry::new();

        scheduler.schedule(|| {}, None);
        scheduler.schedule(|| {}, None);
        scheduler.tick(&host);
        scheduler.schedule(|| {}, None);

        // Installed on first schedule, left running, never re-armed.
        assert_eq!(scheduler.driver().intervals_started.get(), 1);
        assert_eq!(scheduler.driver().frame_requests.get(), 0);
    }

    #[test]
    fn test_reschedule_from_inside_tick_waits_for_next_tick() {
        let scheduler = FrameScheduler::new(RecordingDriver::native());
        let host = HostRegistry::new();

        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let handle = scheduler.clone();
        scheduler.schedule(
            move || {
                count_clone.set(count_clone.get() + 1);
                let count_clone = count_clone.clone();
                handle.schedule(move || count_clone.set(count_clone.get() + 1), None);
            },
            None,
        );

        scheduler.tick(&host);
        // The rescheduled entry is queued, not invoked this tick.
        assert_eq!(count.get(), 1);
        assert_eq!(scheduler.pending(), 1);

        scheduler.tick(&host);
        assert_eq!(count.get(), 2);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_nested_tick_from_callback_is_noop() {
        let scheduler = FrameScheduler::new(RecordingDriver::native());
        let host = HostRegistry::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        {
            let order = order.clone();
            scheduler.schedule(move || order.borrow_mut().push("a"), None);
        }
        {
            // Registered last, so scanned first; ticks its own handle
            // while the outer scan is mid-queue.
            let order = order.clone();
            let handle = scheduler.clone();
            scheduler.schedule(
                move || {
                    order.borrow_mut().push("b");
                    handle.tick(&HostRegistry::new());
                },
                None,
            );
        }

        scheduler.tick(&host);

        // The nested tick drains nothing; the outer scan still visits
        // and fires every entry exactly once, in reverse order.
        assert_eq!(*order.borrow(), vec!["b", "a"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_tick_usable_again_after_nested_attempt() {
        let scheduler = FrameScheduler::new(RecordingDriver::native());
        let host = HostRegistry::new();

        let handle = scheduler.clone();
        scheduler.schedule(move || handle.tick(&HostRegistry::new()), None);
        scheduler.tick(&host);

        // The guard is released: a later tick still dispatches.
        let fired = Rc::new(Cell::new(false));
        let fired_clone = fired.clone();
        scheduler.schedule(move || fired_clone.set(true), None);
        scheduler.tick(&host);
        assert!(fired.get());
    }

    #[test]
    fn test_focus_listeners_track_window_focus() {
        let scheduler = FrameScheduler::new(RecordingDriver::native());
        let window = EventEmitter::new();

        add_listeners(Some(&window), &scheduler.focus_listeners());
        assert!(scheduler.focused());

        window.emit("blur", &PointerEvent::empty());
        assert!(!scheduler.focused());

        window.emit("focus", &PointerEvent::empty());
        assert!(scheduler.focused());
    }

    #[test]
    fn test_focus_change_mid_tick_applies_to_later_entries() {
        let scheduler = FrameScheduler::new(RecordingDriver::native());
        let mut host = HostRegistry::new();
        let el = visible_element(&mut host);

        let fired = Rc::new(Cell::new(false));
        let fired_clone = fired.clone();
        // Registered first, so scanned last.
        scheduler.schedule(move || fired_clone.set(true), Some(el));

        let handle = scheduler.clone();
        scheduler.schedule(move || handle.set_focused(false), None);

        scheduler.tick(&host);
        // The blur from the second callback gates the first entry.
        assert!(!fired.get());
        assert_eq!(scheduler.pending(), 1);
    }
}
