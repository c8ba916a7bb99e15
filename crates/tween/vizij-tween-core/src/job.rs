//! Queued animation jobs and their per-property targets.

use std::fmt;

use crate::easing::{Easing, EasingSpec};
use crate::style::StyleTarget;
use crate::units::{format_value, normalize_name, resolve, split_numeric, RawValue};

/// One property's animation within a job.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyTarget {
    /// Normalized (single-token) property name.
    pub name: String,
    /// Rendered value at job start, expressed in `unit`. Unset until the job starts.
    pub start: Option<f64>,
    pub destination: f64,
    pub unit: String,
}

impl PropertyTarget {
    pub fn new(name: &str, raw: &RawValue, length_unit: &str) -> Self {
        let name = normalize_name(name);
        let resolved = resolve(&name, raw, length_unit);
        Self {
            name,
            start: None,
            destination: resolved.destination,
            unit: resolved.unit,
        }
    }

    /// Read the current rendered value and convert it into this target's unit.
    ///
    /// When the rendered unit differs, the destination unit is written
    /// temporarily with the same magnitude, the rendered result gives the
    /// ratio, and the original value is restored.
    fn capture_start(&mut self, style: &dyn StyleTarget) {
        let rendered = style.read(&self.name);
        let (current, current_unit) = split_numeric(&rendered);
        let mut start = current;
        if current_unit != self.unit && current != 0.0 {
            style.write(&self.name, &format_value(current, &self.unit));
            let (converted, _) = split_numeric(&style.read(&self.name));
            style.write(&self.name, &rendered);
            let scaled = current * (current / converted);
            if converted != 0.0 && scaled.is_finite() {
                start = scaled;
            }
        }
        self.start = Some(start);
    }

    fn write_destination(&self, style: &dyn StyleTarget) {
        style.write(&self.name, &format_value(self.destination, &self.unit));
    }
}

/// Lifecycle of a job. `Finished` carries the same start time as `Running`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum JobState {
    Pending,
    Running { start_ms: f64 },
    Finished { start_ms: f64 },
}

/// One queued "animate to these values" request.
pub struct Job {
    pub targets: Vec<PropertyTarget>,
    pub duration_ms: f64,
    pub easing: EasingSpec,
    pub state: JobState,
    resolved: Option<Easing>,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl Job {
    pub fn new(
        targets: Vec<PropertyTarget>,
        duration_ms: f64,
        easing: EasingSpec,
        on_complete: Option<Box<dyn FnOnce()>>,
    ) -> Self {
        Self {
            targets,
            duration_ms: if duration_ms.is_finite() {
                duration_ms.max(0.0)
            } else {
                0.0
            },
            easing,
            state: JobState::Pending,
            resolved: None,
            on_complete,
        }
    }

    pub fn is_started(&self) -> bool {
        !matches!(self.state, JobState::Pending)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, JobState::Finished { .. })
    }

    /// Pending -> Running: capture start values and fix the easing.
    pub(crate) fn start(&mut self, style: &dyn StyleTarget, now_ms: f64) {
        debug_assert!(!self.is_started());
        for target in &mut self.targets {
            target.capture_start(style);
        }
        self.resolved = Some(self.easing.resolve());
        self.state = JobState::Running { start_ms: now_ms };
    }

    /// Running -> Finished.
    pub(crate) fn mark_finished(&mut self) {
        if let JobState::Running { start_ms } = self.state {
            self.state = JobState::Finished { start_ms };
        }
    }

    pub(crate) fn apply_destinations(&self, style: &dyn StyleTarget) {
        for target in &self.targets {
            target.write_destination(style);
        }
    }

    /// Snapshot of what a frame needs to interpolate, detached from the queue
    /// so the easing can run without the queue borrowed.
    pub(crate) fn frame_plan(&self) -> Option<FramePlan> {
        let easing = self.resolved.clone()?;
        Some(FramePlan {
            easing,
            duration_ms: self.duration_ms,
            targets: self.targets.clone(),
        })
    }

    pub(crate) fn take_callback(&mut self) -> Option<Box<dyn FnOnce()>> {
        self.on_complete.take()
    }
}

/// Eased values for one frame of a running job.
pub(crate) struct FramePlan {
    easing: Easing,
    duration_ms: f64,
    targets: Vec<PropertyTarget>,
}

impl FramePlan {
    /// `(name, formatted value)` for every target at `elapsed_ms` into the job.
    pub(crate) fn values_at(&self, elapsed_ms: f64) -> Vec<(String, String)> {
        self.targets
            .iter()
            .map(|target| {
                let start = target.start.unwrap_or(0.0);
                let value = self.easing.apply(
                    elapsed_ms,
                    start,
                    target.destination - start,
                    self.duration_ms,
                );
                (target.name.clone(), format_value(value, &target.unit))
            })
            .collect()
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("targets", &self.targets)
            .field("duration_ms", &self.duration_ms)
            .field("easing", &self.easing)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
