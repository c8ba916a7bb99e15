//! Timing sources: "run this before the next paint" plus a clock.
//!
//! Hosts implement [`TimingSource`]. [`detect_timing`] performs the one-time
//! capability check an adapter runs when it builds an animator.

use std::cell::RefCell;

/// Opaque id of a scheduled callback.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct FrameHandle(pub u64);

pub trait TimingSource {
    /// Schedule `callback` to run once, before the next paint (or after the
    /// fallback delay).
    fn schedule(&self, callback: Box<dyn FnOnce()>) -> FrameHandle;
    /// Cancel a scheduled callback. Unknown or already-run handles are ignored.
    fn cancel(&self, handle: FrameHandle);
    /// Current time in milliseconds.
    fn now_ms(&self) -> f64;
}

/// Frame primitives in preference order, each with its cancel counterpart.
pub const FRAME_PRIMITIVES: &[(&str, &str)] = &[
    ("requestAnimationFrame", "cancelAnimationFrame"),
    ("webkitRequestAnimationFrame", "webkitCancelAnimationFrame"),
    ("mozRequestAnimationFrame", "mozCancelAnimationFrame"),
    ("oRequestAnimationFrame", "oCancelAnimationFrame"),
    ("msRequestAnimationFrame", "msCancelAnimationFrame"),
];

/// Outcome of capability detection.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TimingKind {
    AnimationFrame {
        request: &'static str,
        cancel: &'static str,
    },
    Timer,
}

/// Hosts whose frame primitive is known to misbehave.
pub fn is_broken_frame_host(user_agent: &str) -> bool {
    user_agent.contains("Safari") && !user_agent.contains("Chrome")
}

/// Pick the first available frame primitive, or the timer fallback.
/// `available(name)` reports whether both halves of a primitive pair exist
/// when asked for the request name.
pub fn detect_timing(available: impl Fn(&str) -> bool, user_agent: &str) -> TimingKind {
    if is_broken_frame_host(user_agent) {
        log::debug!("frame timing disabled for user agent, using timer fallback");
        return TimingKind::Timer;
    }
    let kind = FRAME_PRIMITIVES
        .iter()
        .find(|(request, _)| available(request))
        .map(|&(request, cancel)| TimingKind::AnimationFrame { request, cancel })
        .unwrap_or(TimingKind::Timer);
    log::debug!("timing source detected: {kind:?}");
    kind
}

#[derive(Default)]
struct ManualState {
    now: f64,
    next: u64,
    pending: Vec<(FrameHandle, Box<dyn FnOnce()>)>,
}

/// Deterministic timing source for headless hosts and tests.
///
/// Callbacks queue until [`ManualFrames::advance`] moves the clock and runs
/// every callback that was pending when the frame began.
#[derive(Default)]
pub struct ManualFrames {
    state: RefCell<ManualState>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `dt_ms` and run one frame. Returns how many
    /// callbacks ran.
    pub fn advance(&self, dt_ms: f64) -> usize {
        let handles: Vec<FrameHandle> = {
            let mut st = self.state.borrow_mut();
            st.now += dt_ms;
            st.pending.iter().map(|(h, _)| *h).collect()
        };
        let mut ran = 0;
        for handle in handles {
            // Take one at a time so a callback may cancel a later one.
            let cb = {
                let mut st = self.state.borrow_mut();
                st.pending
                    .iter()
                    .position(|(h, _)| *h == handle)
                    .map(|idx| st.pending.remove(idx).1)
            };
            if let Some(cb) = cb {
                cb();
                ran += 1;
            }
        }
        ran
    }

    /// Set the clock without running anything.
    pub fn set_now(&self, now_ms: f64) {
        self.state.borrow_mut().now = now_ms;
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }
}

impl TimingSource for ManualFrames {
    fn schedule(&self, callback: Box<dyn FnOnce()>) -> FrameHandle {
        let mut st = self.state.borrow_mut();
        let handle = FrameHandle(st.next);
        st.next = st.next.wrapping_add(1);
        st.pending.push((handle, callback));
        handle
    }

    fn cancel(&self, handle: FrameHandle) {
        self.state.borrow_mut().pending.retain(|(h, _)| *h != handle);
    }

    fn now_ms(&self) -> f64 {
        self.state.borrow().now
    }
}
