//! Exponential moving average
//!
//! The EMA is recomputed from scratch over whatever window it is given:
//! `ema_0 = x_0`, `ema_t = α·x_t + (1 − α)·ema_{t−1}`, `α = 2 / (period + 1)`.
//! Nothing is carried between calls, so a short window yields a value that
//! is still dominated by its own first sample.

/// Smoothing factor for an EMA span
pub fn smoothing_factor(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Final EMA value over `values`
pub fn ema(values: &[f64], period: usize) -> Option<f64> {
    if values.is_empty() || period == 0 {
        return None;
    }

    let alpha = smoothing_factor(period);
    let seed = values[0];
    Some(
        values[1..]
            .iter()
            .fold(seed, |ema, &value| alpha * value + (1.0 - alpha) * ema),
    )
}
