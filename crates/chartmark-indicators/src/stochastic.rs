//! Stochastic oscillator.

use chartmark_core::{Bar, Series};

use crate::ma::sma_strict;

/// Smoothed %K and %D lines.
#[derive(Debug, Clone)]
pub struct StochasticOutput {
    pub k: Series,
    pub d: Series,
}

/// Raw %K over the `k_period` high/low window, smoothed by an SMA of length
/// `smooth`; %D is an SMA of the smoothed line. Both smoothing passes require
/// every value in their window to be defined, otherwise the slot stays
/// undefined.
pub fn stochastic(bars: &[Bar], k_period: usize, d_period: usize, smooth: usize) -> StochasticOutput {
    let mut raw_k = Vec::with_capacity(bars.len());
    for i in 0..bars.len() {
        if k_period == 0 || i + 1 < k_period {
            raw_k.push(f64::NAN);
            continue;
        }
        let window = &bars[i + 1 - k_period..=i];
        let lowest = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let highest = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        raw_k.push((bars[i].close - lowest) / (highest - lowest) * 100.0);
    }

    let k = sma_strict(&raw_k, smooth);
    let d = sma_strict(&k, d_period);

    StochasticOutput {
        k: Series::from(k),
        d: Series::from(d),
    }
}
