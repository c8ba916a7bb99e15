//! Easing functions and selector resolution.
//!
//! Every easing has the shape `f(elapsed, start, delta, duration) -> value`.
//! Two are built in: `linear` and `swing` (cosine ease, the default).

use std::f64::consts::PI;
use std::fmt;
use std::rc::Rc;

/// Caller-supplied easing with the four-argument numeric signature.
pub type EasingFn = Rc<dyn Fn(f64, f64, f64, f64) -> f64>;

/// Linear ramp from `start` to `start + delta`.
#[inline]
pub fn linear(elapsed: f64, start: f64, delta: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return start + delta;
    }
    delta * elapsed / duration + start
}

/// Cosine ease-in-out.
#[inline]
pub fn swing(elapsed: f64, start: f64, delta: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return start + delta;
    }
    (0.5 - (elapsed / duration * PI).cos() / 2.0) * delta + start
}

/// Easing as requested by the caller, before resolution.
#[derive(Clone, Default)]
pub enum EasingSpec {
    #[default]
    Default,
    Named(String),
    Custom(EasingFn),
}

impl EasingSpec {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64, f64, f64, f64) -> f64 + 'static,
    {
        EasingSpec::Custom(Rc::new(f))
    }

    /// Resolve to a callable easing. Unrecognised names fall back to swing.
    pub fn resolve(&self) -> Easing {
        match self {
            EasingSpec::Default => Easing::Swing,
            EasingSpec::Named(name) => match name.as_str() {
                "linear" => Easing::Linear,
                "swing" => Easing::Swing,
                other => {
                    log::debug!("unknown easing '{other}', using swing");
                    Easing::Swing
                }
            },
            EasingSpec::Custom(f) => Easing::Custom(f.clone()),
        }
    }
}

impl From<&str> for EasingSpec {
    fn from(name: &str) -> Self {
        EasingSpec::Named(name.to_string())
    }
}

impl From<Option<&str>> for EasingSpec {
    fn from(name: Option<&str>) -> Self {
        name.map(EasingSpec::from).unwrap_or_default()
    }
}

impl fmt::Debug for EasingSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EasingSpec::Default => f.write_str("Default"),
            EasingSpec::Named(name) => f.debug_tuple("Named").field(name).finish(),
            EasingSpec::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Resolved easing, fixed for the lifetime of a running job.
#[derive(Clone)]
pub enum Easing {
    Linear,
    Swing,
    Custom(EasingFn),
}

impl Easing {
    #[inline]
    pub fn apply(&self, elapsed: f64, start: f64, delta: f64, duration: f64) -> f64 {
        match self {
            Easing::Linear => linear(elapsed, start, delta, duration),
            Easing::Swing => swing(elapsed, start, delta, duration),
            Easing::Custom(f) => f(elapsed, start, delta, duration),
        }
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("Linear"),
            Easing::Swing => f.write_str("Swing"),
            Easing::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
