//! Moving averages.

use chartmark_core::{Bar, Series};

/// Simple moving average of closes.
///
/// Undefined until `period - 1` bars of history have accumulated.
pub fn sma(bars: &[Bar], period: usize) -> Series {
    if period == 0 {
        return Series::undefined(bars.len());
    }
    let mut out = Series::with_capacity(bars.len());
    for i in 0..bars.len() {
        if i + 1 < period {
            out.push_undefined();
        } else {
            let sum: f64 = bars[i + 1 - period..=i].iter().map(|b| b.close).sum();
            out.push(sum / period as f64);
        }
    }
    out
}

/// Exponential moving average of closes, seeded at the first close.
///
/// Defined at every index: there is no warm-up gap.
pub fn ema(bars: &[Bar], period: usize) -> Series {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    Series::from(ema_values(&closes, period))
}

/// EMA over a raw value series, seeded at the first value.
pub(crate) fn ema_values(values: &[f64], period: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    out.push(first);
    for i in 1..values.len() {
        let prev = out[i - 1];
        out.push(values[i] * k + prev * (1.0 - k));
    }
    out
}

/// SMA over a raw value series that may carry sentinel slots.
///
/// A window produces a value only when every slot in it is defined; the
/// sentinel propagates otherwise.
pub(crate) fn sma_strict(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if period == 0 || i + 1 < period || values[i].is_nan() {
            out.push(f64::NAN);
            continue;
        }
        let window = &values[i + 1 - period..=i];
        if window.iter().any(|v| v.is_nan()) {
            out.push(f64::NAN);
        } else {
            out.push(window.iter().sum::<f64>() / period as f64);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::bars_from_closes;
    use approx::assert_relative_eq;

    #[test]
    fn sma_exact_means() {
        let bars = bars_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let out = sma(&bars, 3);
        assert_eq!(out.get(0), None);
        assert_eq!(out.get(1), None);
        assert_eq!(out.get(2), Some(2.0));
        assert_eq!(out.get(3), Some(3.0));
        assert_eq!(out.get(4), Some(4.0));
    }

    #[test]
    fn sma_empty() {
        assert!(sma(&[], 3).is_empty());
    }

    #[test]
    fn ema_has_no_warmup_gap() {
        let bars = bars_from_closes(&[10.0, 11.0, 12.0, 13.0]);
        let out = ema(&bars, 3);
        assert_eq!(out.get(0), Some(10.0));
        // k = 0.5 for period 3
        assert_relative_eq!(out.get(1).unwrap(), 10.5);
        assert_relative_eq!(out.get(2).unwrap(), 11.25);
        assert_relative_eq!(out.get(3).unwrap(), 12.125);
    }

    #[test]
    fn ema_single_bar_is_close() {
        let bars = bars_from_closes(&[42.0]);
        let out = ema(&bars, 20);
        assert_eq!(out.get(0), Some(42.0));
    }

    #[test]
    fn sma_strict_requires_full_window() {
        let values = [f64::NAN, f64::NAN, 3.0, 4.0, 5.0];
        let out = sma_strict(&values, 3);
        assert!(out[2].is_nan());
        assert!(out[3].is_nan());
        assert_relative_eq!(out[4], 4.0);
    }
}
