//! Vizij Tween Core (host-agnostic)
//!
//! Per-element animation queues: callers enqueue "animate these properties to
//! these values over this duration" requests and each element's [`Animator`]
//! runs them strictly one after another, frame by frame, against an injected
//! [`TimingSource`] and [`StyleTarget`]. Adapters (WASM) provide the host
//! implementations; [`ManualFrames`] and [`MemoryStyle`] serve headless use.

pub mod animator;
pub mod config;
pub mod easing;
pub mod error;
pub mod job;
pub mod registry;
pub mod style;
pub mod timing;
pub mod units;

// Re-exports for consumers (adapters)
pub use animator::Animator;
pub use config::Config;
pub use easing::{Easing, EasingFn, EasingSpec};
pub use error::TweenError;
pub use job::{Job, JobState, PropertyTarget};
pub use registry::Registry;
pub use style::{MemoryStyle, StyleTarget};
pub use timing::{detect_timing, FrameHandle, ManualFrames, TimingKind, TimingSource};
pub use units::{parse_properties_json, RawValue};
