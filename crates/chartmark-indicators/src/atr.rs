//! ATR (Average True Range).

use chartmark_core::{Bar, Series};

/// True range per bar; the first bar falls back to high - low.
pub(crate) fn true_range(bars: &[Bar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                let prev_close = bars[i - 1].close;
                (bar.high - bar.low)
                    .max((bar.high - prev_close).abs())
                    .max((bar.low - prev_close).abs())
            }
        })
        .collect()
}

/// First ATR at `period - 1` is the simple mean of the first `period` true
/// ranges; Wilder's recurrence after that. All-undefined when the sequence
/// is not longer than the period.
pub fn atr(bars: &[Bar], period: usize) -> Series {
    let n = bars.len();
    if period == 0 || n <= period {
        return Series::undefined(n);
    }

    let tr = true_range(bars);
    let mut out = vec![f64::NAN; n];

    let initial: f64 = tr[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = initial;

    for i in period..n {
        out[i] = (out[i - 1] * (period - 1) as f64 + tr[i]) / period as f64;
    }

    Series::from(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::bars_from_hlc;
    use approx::assert_relative_eq;

    #[test]
    fn true_range_uses_prev_close_gaps() {
        // Second bar gaps above the first close: TR = high - prev_close.
        let bars = bars_from_hlc(&[(102.0, 98.0, 100.0), (110.0, 106.0, 108.0)]);
        let tr = true_range(&bars);
        assert_relative_eq!(tr[0], 4.0);
        assert_relative_eq!(tr[1], 10.0);
    }

    #[test]
    fn seed_is_simple_mean() {
        let hlc: Vec<(f64, f64, f64)> = (0..5).map(|i| (104.0 + i as f64, 100.0, 102.0)).collect();
        let bars = bars_from_hlc(&hlc);
        let out = atr(&bars, 3);
        let tr = true_range(&bars);
        assert_eq!(out.get(0), None);
        assert_eq!(out.get(1), None);
        assert_relative_eq!(out.get(2).unwrap(), (tr[0] + tr[1] + tr[2]) / 3.0);
        // Wilder recurrence after the seed.
        let expected = (out.get(2).unwrap() * 2.0 + tr[3]) / 3.0;
        assert_relative_eq!(out.get(3).unwrap(), expected);
    }

    #[test]
    fn short_input_is_all_undefined() {
        let bars = bars_from_hlc(&[(102.0, 98.0, 100.0), (103.0, 99.0, 101.0), (104.0, 100.0, 102.0)]);
        let out = atr(&bars, 3);
        assert!((0..3).all(|i| out.get(i).is_none()));
    }

    #[test]
    fn deterministic_reruns() {
        let hlc: Vec<(f64, f64, f64)> = (0..50)
            .map(|i| {
                let p = 100.0 + (i as f64 * 1.3).sin() * 7.0;
                (p + 2.5, p - 2.5, p)
            })
            .collect();
        let bars = bars_from_hlc(&hlc);
        let a = atr(&bars, 14);
        let b = atr(&bars, 14);
        for i in 0..a.len() {
            assert_eq!(a.get(i), b.get(i));
        }
    }
}
