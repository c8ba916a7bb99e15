//! Per-element animation queue.
//!
//! Jobs run strictly FIFO; only the head is ever active. A single `advance`
//! routine moves the queue forward. It runs after `animate`, `stop` and
//! `finish`, and again whenever a frame callback lands the head job on its
//! destination. Frame callbacks carry the epoch they were scheduled in;
//! `stop`/`finish` bump the epoch so late callbacks become no-ops.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::config::Config;
use crate::easing::EasingSpec;
use crate::job::{FramePlan, Job, JobState, PropertyTarget};
use crate::style::StyleTarget;
use crate::timing::{FrameHandle, TimingSource};
use crate::units::RawValue;

/// Stand-in once the element is gone: reads nothing, drops writes.
struct Detached;

impl StyleTarget for Detached {
    fn read(&self, _name: &str) -> String {
        String::new()
    }
    fn write(&self, _name: &str, _value: &str) {}
}

#[derive(Default)]
struct QueueState {
    jobs: VecDeque<Job>,
    frame: Option<FrameHandle>,
    epoch: u64,
}

struct Inner {
    timing: Rc<dyn TimingSource>,
    element: Weak<dyn StyleTarget>,
    length_unit: String,
    state: RefCell<QueueState>,
}

/// What a frame callback found for the running job.
enum Frame {
    Landed,
    Interpolate {
        plan: FramePlan,
        start_ms: f64,
        elapsed: f64,
    },
}

/// What `advance` found at the head of the queue.
enum Step {
    Idle,
    Complete(Option<Box<dyn FnOnce()>>),
}

/// Animation controller for one element. Cloning yields another handle to the
/// same queue.
///
/// The animator does not keep its element alive. Once the element is dropped,
/// queued jobs still run to completion but their writes are discarded.
#[derive(Clone)]
pub struct Animator {
    inner: Rc<Inner>,
}

impl Animator {
    pub fn new<S>(element: &Rc<S>, timing: Rc<dyn TimingSource>, cfg: &Config) -> Self
    where
        S: StyleTarget + 'static,
    {
        let element: Rc<dyn StyleTarget> = element.clone();
        Self {
            inner: Rc::new(Inner {
                timing,
                element: Rc::downgrade(&element),
                length_unit: cfg.length_unit.clone(),
                state: RefCell::new(QueueState::default()),
            }),
        }
    }

    /// Whether two handles drive the same queue.
    pub fn ptr_eq(a: &Animator, b: &Animator) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    /// Queue an animation of `properties` to their destination values.
    ///
    /// `duration_ms == 0` applies the destinations as soon as the job reaches
    /// the head of the queue, synchronously if the queue is idle.
    pub fn animate<P, K, V, F>(
        &self,
        properties: P,
        duration_ms: f64,
        easing: impl Into<EasingSpec>,
        on_complete: F,
    ) -> &Self
    where
        P: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RawValue>,
        F: FnOnce() + 'static,
    {
        self.enqueue(properties, duration_ms, easing.into(), Some(Box::new(on_complete)))
    }

    /// `animate` with the default easing and no completion callback.
    pub fn animate_to<P, K, V>(&self, properties: P, duration_ms: f64) -> &Self
    where
        P: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RawValue>,
    {
        self.enqueue(properties, duration_ms, EasingSpec::Default, None)
    }

    fn enqueue<P, K, V>(
        &self,
        properties: P,
        duration_ms: f64,
        easing: EasingSpec,
        on_complete: Option<Box<dyn FnOnce()>>,
    ) -> &Self
    where
        P: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RawValue>,
    {
        let targets = properties
            .into_iter()
            .map(|(name, raw)| {
                PropertyTarget::new(name.as_ref(), &raw.into(), &self.inner.length_unit)
            })
            .collect();
        let job = Job::new(targets, duration_ms, easing, on_complete);
        self.inner.state.borrow_mut().jobs.push_back(job);
        self.advance();
        self
    }

    /// Cancel the in-flight frame and drop the head job, or the whole queue
    /// when `clear_queue` is set. Dropped jobs never fire their callbacks.
    pub fn stop(&self, clear_queue: bool) -> &Self {
        {
            let mut st = self.inner.state.borrow_mut();
            self.cancel_frame(&mut st);
            if clear_queue {
                log::debug!("stop: clearing {} queued job(s)", st.jobs.len());
                st.jobs.clear();
            } else if st.jobs.pop_front().is_some() {
                log::debug!("stop: dropped head job, {} remaining", st.jobs.len());
            }
        }
        self.advance();
        self
    }

    /// Cancel the in-flight frame, write every queued job's destination values
    /// in queue order, and empty the queue. Completion callbacks are not run.
    pub fn finish(&self) -> &Self {
        let mut st = self.inner.state.borrow_mut();
        self.cancel_frame(&mut st);
        let style = self.inner.element.upgrade();
        let style: &dyn StyleTarget = style.as_deref().unwrap_or(&Detached);
        log::debug!("finish: flushing {} job(s)", st.jobs.len());
        for job in st.jobs.drain(..) {
            job.apply_destinations(style);
        }
        self
    }

    /// True while any job is queued or running.
    pub fn is_animating(&self) -> bool {
        !self.inner.state.borrow().jobs.is_empty()
    }

    pub fn queue_len(&self) -> usize {
        self.inner.state.borrow().jobs.len()
    }

    /// State of the head job, if any.
    pub fn head_state(&self) -> Option<JobState> {
        self.inner.state.borrow().jobs.front().map(|j| j.state)
    }

    fn cancel_frame(&self, st: &mut QueueState) {
        st.epoch = st.epoch.wrapping_add(1);
        if let Some(handle) = st.frame.take() {
            self.inner.timing.cancel(handle);
        }
    }

    fn schedule_frame(&self, st: &mut QueueState) {
        if st.frame.is_some() {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        let epoch = st.epoch;
        let handle = self.inner.timing.schedule(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                Animator { inner }.on_frame(epoch);
            }
        }));
        st.frame = Some(handle);
    }

    /// Drive the head of the queue until it is running or the queue is empty.
    /// Completion callbacks run with no borrow held, so they may re-enter.
    fn advance(&self) {
        loop {
            let step = {
                let mut guard = self.inner.state.borrow_mut();
                let st = &mut *guard;
                let Some(head) = st.jobs.front_mut() else {
                    return;
                };
                let state = head.state;
                match state {
                    JobState::Pending if head.duration_ms <= 0.0 => {
                        let style = self.inner.element.upgrade();
                        head.apply_destinations(style.as_deref().unwrap_or(&Detached));
                        let cb = head.take_callback();
                        st.jobs.pop_front();
                        Step::Complete(cb)
                    }
                    JobState::Pending => {
                        let style = self.inner.element.upgrade();
                        let now = self.inner.timing.now_ms();
                        head.start(style.as_deref().unwrap_or(&Detached), now);
                        log::debug!(
                            "job started: {} propert(ies) over {}ms",
                            head.targets.len(),
                            head.duration_ms
                        );
                        self.schedule_frame(st);
                        Step::Idle
                    }
                    JobState::Running { .. } => Step::Idle,
                    JobState::Finished { .. } => {
                        let cb = head.take_callback();
                        st.jobs.pop_front();
                        log::debug!("job complete, {} remaining", st.jobs.len());
                        Step::Complete(cb)
                    }
                }
            };
            match step {
                Step::Idle => return,
                Step::Complete(cb) => {
                    if let Some(cb) = cb {
                        cb();
                    }
                }
            }
        }
    }

    fn on_frame(&self, epoch: u64) {
        let step = {
            let mut guard = self.inner.state.borrow_mut();
            let st = &mut *guard;
            if st.epoch != epoch {
                return;
            }
            st.frame = None;
            let now = self.inner.timing.now_ms();
            let Some(head) = st.jobs.front_mut() else {
                return;
            };
            let JobState::Running { start_ms } = head.state else {
                return;
            };
            let elapsed = now - start_ms;
            if elapsed >= head.duration_ms {
                let style = self.inner.element.upgrade();
                head.apply_destinations(style.as_deref().unwrap_or(&Detached));
                head.mark_finished();
                Frame::Landed
            } else {
                log::trace!("frame at {elapsed}ms of {}ms", head.duration_ms);
                match head.frame_plan() {
                    Some(plan) => Frame::Interpolate {
                        plan,
                        start_ms,
                        elapsed,
                    },
                    None => return,
                }
            }
        };
        match step {
            Frame::Landed => self.advance(),
            Frame::Interpolate {
                plan,
                start_ms,
                elapsed,
            } => {
                // Custom easings may call back into this animator.
                let values = plan.values_at(elapsed);
                let mut guard = self.inner.state.borrow_mut();
                let st = &mut *guard;
                let same_job = matches!(
                    st.jobs.front().map(|j| j.state),
                    Some(JobState::Running { start_ms: s }) if s == start_ms
                );
                if st.epoch != epoch || !same_job {
                    return;
                }
                let style = self.inner.element.upgrade();
                let style: &dyn StyleTarget = style.as_deref().unwrap_or(&Detached);
                for (name, value) in &values {
                    style.write(name, value);
                }
                self.schedule_frame(st);
            }
        }
    }
}
