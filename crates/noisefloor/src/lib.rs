//! Minimum-statistics noise floor estimation.
//!
//! Tracks a time-varying noise floor from a stream of normalized spectral
//! magnitude frames, without an explicit signal-activity detector. The
//! estimator combines adaptive one-pole smoothing, recursive moment
//! tracking with bias correction, and windowed-minimum tracking: the floor
//! can only rise by a bounded margin above the smallest recently observed
//! smoothed power, so signal bursts do not drag the estimate upward.
//!
//! Framing, windowing, and the spectral transform are left to the caller;
//! the estimator consumes one magnitude frame per [`compute`] call and
//! returns the updated noise-floor history in dB.
//!
//! [`compute`]: NoiseEstimator::compute

pub mod config;
pub(crate) mod history;
pub(crate) mod min_tracker;
pub mod noise_estimator;

pub use noise_estimator::{FrameError, InitError, NoiseEstimator};
