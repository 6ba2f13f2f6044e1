//! Minimum-statistics noise floor estimator.
//!
//! Stateful recursive estimator driven by one normalized magnitude-spectrum
//! frame per [`NoiseEstimator::compute`] call. Each bin updates a one-pole
//! smoothed power with an adaptive factor that approaches one while the
//! signal stays close to the current noise reference, derives an
//! equivalent-degrees-of-freedom surrogate from recursive first and second
//! moments, corrects the smoothed power for the downward bias of a windowed
//! minimum, and sets the new floor to the minimum over a trailing search
//! window plus a bounded slope margin.
//!
//! The recursive state deliberately carries across bins and across calls as
//! one unbroken recurrence: the bin axis of successive frames is treated as
//! a single time series for smoothing and minimum tracking.

use crate::config::{
    ALPHA_MAX, BETA_MAX, BIAS_GAIN, CORRECTION_DECAY, CORRECTION_MAX, CORRECTION_MIN, DOF_MAX,
    DOF_NORM, LOG_FLOOR, max_noise_slope, search_window,
};
use crate::history::History;
use crate::min_tracker::MinTracker;

/// Error returned by [`NoiseEstimator::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InitError {
    /// The frame size must hold at least one bin.
    ZeroSize,
    /// The initial noise power must be positive and finite.
    InvalidNoisePower { power: f32 },
}

impl std::fmt::Display for InitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::ZeroSize => write!(f, "frame size must be at least 1 bin"),
            Self::InvalidNoisePower { power } => {
                write!(f, "initial noise power {power} must be positive and finite")
            }
        }
    }
}

impl std::error::Error for InitError {}

/// Error returned by [`NoiseEstimator::compute`].
///
/// A failed call leaves internal state untouched; the caller may retry with
/// the next frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameError {
    /// The frame length does not match the configured size.
    LengthMismatch { expected: usize, actual: usize },
    /// The frame's total squared magnitude is zero, which would force a
    /// division by zero in the energy-mismatch ratio.
    ZeroEnergy,
    /// The frame contains a magnitude whose squared value is not finite.
    NonFinite { index: usize },
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::LengthMismatch { expected, actual } => {
                write!(f, "frame holds {actual} bins; expected {expected}")
            }
            Self::ZeroEnergy => write!(f, "frame has zero total energy"),
            Self::NonFinite { index } => {
                write!(f, "frame magnitude at bin {index} is not finite")
            }
        }
    }
}

impl std::error::Error for FrameError {}

/// Minimum-statistics noise floor estimator.
///
/// Constructed once with a fixed frame size and an initial noise power,
/// then fed one frame per [`compute`](Self::compute) call, strictly in time
/// order. All state is owned by the instance; concurrent use requires
/// external mutual exclusion around the whole estimator.
#[derive(Debug)]
pub struct NoiseEstimator {
    size: usize,
    /// Minimum-search window length, 7/8 of the frame size.
    window: usize,
    /// Current noise-floor reference, log-power dB.
    floor_db: f32,
    /// Last one-pole-smoothed instantaneous power; carries across calls.
    last_power: f32,
    /// The N most recent smoothed powers.
    power_history: History,
    /// The N most recent noise-floor values (dB); the primary output.
    floor_history: History,
    /// Recursive local mean of the smoothed power.
    first_moment: f32,
    /// Recursive local mean-square of the smoothed power.
    second_moment: f32,
    /// The N most recent degrees-of-freedom surrogates.
    dof_history: History,
    /// Low-pass-filtered smoothing correction accumulator.
    correction_acc: f32,
    /// The N most recent adaptive smoothing factors, diagnostic only.
    alpha_history: History,
    /// Per-call candidate buffer for the minimum search: the trailing
    /// window of the previous call's floor history, then one
    /// bias-corrected power per bin.
    candidates: Vec<f32>,
    min_tracker: MinTracker,
}

impl NoiseEstimator {
    /// Creates an estimator for frames of `size` bins, seeded with
    /// `initial_noise_power` (linear power units).
    pub fn new(size: usize, initial_noise_power: f32) -> Result<Self, InitError> {
        if size == 0 {
            return Err(InitError::ZeroSize);
        }
        if !initial_noise_power.is_finite() || initial_noise_power <= 0.0 {
            return Err(InitError::InvalidNoisePower {
                power: initial_noise_power,
            });
        }
        let window = search_window(size);
        Ok(Self {
            size,
            window,
            // The reference recurrence seeds the floor on the amplitude dB
            // scale while every later update uses power dB; kept as-is.
            floor_db: 20.0 * initial_noise_power.log10(),
            last_power: 0.0,
            power_history: History::filled(size, initial_noise_power),
            floor_history: History::filled(size, 0.0),
            first_moment: 0.0,
            second_moment: 0.0,
            dof_history: History::filled(size, 0.0),
            correction_acc: 0.0,
            alpha_history: History::filled(size, 0.0),
            candidates: Vec::with_capacity(window + 1 + size),
            min_tracker: MinTracker::new(),
        })
    }

    /// Advances the estimator by one frame of non-negative, normalized
    /// spectral magnitudes and returns the updated noise-floor history in
    /// dB, oldest first.
    pub fn compute(&mut self, frame: &[f32]) -> Result<Vec<f32>, FrameError> {
        // Validate before touching any state.
        if frame.len() != self.size {
            return Err(FrameError::LengthMismatch {
                expected: self.size,
                actual: frame.len(),
            });
        }
        if let Some(index) = frame.iter().position(|&m| !(m * m).is_finite()) {
            return Err(FrameError::NonFinite { index });
        }
        let energy: f32 = frame.iter().map(|&m| m * m).sum();
        if energy <= 0.0 {
            return Err(FrameError::ZeroEnergy);
        }

        // Average degrees-of-freedom surrogate over the recent past;
        // reflects the recent spectral variance level.
        let avg_norm = self.dof_history.sum() / self.size as f32;
        tracing::trace!(avg_norm, "average normalized variance of smoothed power");

        // Frame-level energy mismatch between the smoothed-power history
        // and the incoming frame drives the smoothing correction.
        let x = self.power_history.sum() / energy - 1.0;
        let correction = (CORRECTION_MAX / (1.0 + x * x)).max(CORRECTION_MIN);
        let bias_multiplier = 1.0 + BIAS_GAIN * avg_norm.sqrt();
        let slope = max_noise_slope(avg_norm);
        let window = self.window;

        // Seed the minimum search with the trailing floor values of the
        // previous call so the window is continuous across call boundaries.
        let seed_len = (window + 1).min(self.size);
        self.candidates.clear();
        self.candidates.extend(self.floor_history.tail(seed_len));
        self.min_tracker.clear();
        let mut admitted = 0;

        for (n, &magnitude) in frame.iter().enumerate() {
            // Confidence factor: near 1 while the smoothed power sits on
            // the current reference, decaying as they diverge. This is
            // what separates noise-like bins from signal bursts.
            // The floor keeps the linear reference nonzero even when the
            // seed power is at the bottom of the f32 range.
            let reference = db_to_power(self.floor_db).max(f32::MIN_POSITIVE);
            let deviation = self.last_power / reference - 1.0;
            let alpha_opt = 1.0 / (1.0 + deviation * deviation);

            self.correction_acc = CORRECTION_DECAY * self.correction_acc + correction;
            let alpha = ALPHA_MAX * self.correction_acc * alpha_opt;
            let beta = (alpha * alpha).min(BETA_MAX);

            self.last_power = alpha * self.last_power + (1.0 - alpha) * magnitude * magnitude;
            self.first_moment = beta * self.first_moment + (1.0 - beta) * self.last_power;
            self.second_moment =
                beta * self.second_moment + (1.0 - beta) * self.last_power * self.last_power;

            // Equivalent degrees of freedom from the local variance,
            // relative to the reference and capped.
            let variance = (self.second_moment - self.first_moment).abs();
            let dof_db = 10.0 * log10_floored(0.5 * variance) - self.floor_db;
            let dof = db_to_power(dof_db).min(DOF_MAX);

            // Inverse of the minimum-statistics bias table for this
            // window length. dof <= 0.5 keeps the denominator above 2.
            let dof_tilde = (1.0 / dof - 2.0 * DOF_NORM) / (1.0 - DOF_NORM);
            let bias = 1.0 + (window - 1) as f32 * 2.0 / dof_tilde.abs();

            self.candidates
                .push(10.0 * log10_floored(bias_multiplier * bias * self.last_power));

            // Admit candidates up to the leading edge of this bin's search
            // window, then retire the ones that slid out of it. Freshly
            // appended candidates enter the window two bins later, exactly
            // as in the reference recurrence.
            while admitted < n + window {
                self.min_tracker.push(admitted, self.candidates[admitted]);
                admitted += 1;
            }
            self.min_tracker.evict_before(n);
            self.floor_db = self.min_tracker.min() + slope;

            self.power_history.push(self.last_power);
            self.floor_history.push(self.floor_db);
            self.dof_history.push(dof);
            self.alpha_history.push(alpha);

            debug_assert!((0.0..=ALPHA_MAX).contains(&alpha));
            debug_assert!((0.0..=BETA_MAX).contains(&beta));
            debug_assert!(dof > 0.0 && dof <= DOF_MAX);
        }

        Ok(self.floor_history.to_vec())
    }

    /// The current noise-floor history in dB, oldest first, without
    /// advancing the estimator.
    pub fn noise_estimate(&self) -> Vec<f32> {
        self.floor_history.to_vec()
    }

    /// The recent adaptive smoothing factors, oldest first. Diagnostic
    /// only; the values are never fed back into the recursion.
    pub fn smoothing_factors(&self) -> Vec<f32> {
        self.alpha_history.to_vec()
    }

    /// The current scalar noise-floor reference in dB.
    pub fn floor_db(&self) -> f32 {
        self.floor_db
    }

    /// The configured frame size in bins.
    pub fn frame_size(&self) -> usize {
        self.size
    }
}

fn db_to_power(db: f32) -> f32 {
    10.0f32.powf(db / 10.0)
}

fn log10_floored(value: f32) -> f32 {
    value.max(LOG_FLOOR).log10()
}
