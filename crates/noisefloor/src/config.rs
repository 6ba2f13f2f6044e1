//! Constants of the minimum-statistics recurrence.

/// Upper cap on the adaptive smoothing factor.
pub const ALPHA_MAX: f32 = 0.96;

/// Upper cap on the second-order (moment) smoothing factor.
pub const BETA_MAX: f32 = 0.8;

/// Decay of the smoothing-correction accumulator per bin.
pub const CORRECTION_DECAY: f32 = 0.7;

/// Bounds on the per-call correction term derived from the frame-level
/// energy mismatch.
pub const CORRECTION_MAX: f32 = 0.3;
pub const CORRECTION_MIN: f32 = 0.21;

/// Gain of the bias multiplier over the square root of the average
/// degrees-of-freedom surrogate.
pub const BIAS_GAIN: f32 = 2.12;

/// Normalization constant in the inverse-bias approximation of the
/// minimum-statistics bias table.
pub const DOF_NORM: f32 = 0.91;

/// Upper cap on the equivalent-degrees-of-freedom surrogate.
pub const DOF_MAX: f32 = 0.5;

/// Floor applied to every `log10` argument, keeping the recurrence finite
/// when a variance or power estimate collapses to zero.
pub const LOG_FLOOR: f32 = 1e-10;

/// Maximum allowed upward slope of the noise floor, in dB per bin.
///
/// Larger average spectral variance permits a steeper rise.
pub fn max_noise_slope(avg_norm: f32) -> f32 {
    if avg_norm < 0.03 {
        9.03
    } else if avg_norm < 0.05 {
        6.02
    } else if avg_norm < 0.06 {
        3.01
    } else {
        0.8
    }
}

/// Length of the minimum-search window for frames of `size` bins.
///
/// 7/8 of the frame, floored, and never shorter than one bin.
pub fn search_window(size: usize) -> usize {
    (7 * size / 8).max(1)
}
