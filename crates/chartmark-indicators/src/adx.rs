//! ADX (Average Directional Index) with +DI/-DI.

use chartmark_core::{Bar, Series};

use crate::atr::true_range;

/// ADX output: the trend-strength line plus both directional lines.
#[derive(Debug, Clone)]
pub struct AdxOutput {
    pub adx: Series,
    pub plus_di: Series,
    pub minus_di: Series,
}

/// Directional movement with exclusivity: only the larger of the two positive
/// moves counts, and a tie zeroes both. TR, +DM and -DM run through a
/// cumulative Wilder smoothing seeded with a raw sum (not a mean; ATR keeps
/// the mean-seeded convention, this one does not). DX uses a zero fallback
/// when both DI lines are zero, and ADX is the same smoothing applied to DX.
pub fn adx(bars: &[Bar], period: usize) -> AdxOutput {
    let n = bars.len();
    let mut plus_dm = Vec::with_capacity(n);
    let mut minus_dm = Vec::with_capacity(n);

    for i in 0..n {
        if i == 0 {
            plus_dm.push(0.0);
            minus_dm.push(0.0);
            continue;
        }
        let up_move = bars[i].high - bars[i - 1].high;
        let down_move = bars[i - 1].low - bars[i].low;
        plus_dm.push(if up_move > down_move && up_move > 0.0 { up_move } else { 0.0 });
        minus_dm.push(if down_move > up_move && down_move > 0.0 { down_move } else { 0.0 });
    }

    let tr = true_range(bars);
    let smooth_tr = wilder_sum(&tr, period);
    let smooth_plus = wilder_sum(&plus_dm, period);
    let smooth_minus = wilder_sum(&minus_dm, period);

    let mut plus_di = vec![f64::NAN; n];
    let mut minus_di = vec![f64::NAN; n];
    let mut dx = vec![f64::NAN; n];

    for i in 0..n {
        let str_i = smooth_tr[i];
        if str_i.is_nan() || str_i == 0.0 {
            continue;
        }
        let p = smooth_plus[i] / str_i * 100.0;
        let m = smooth_minus[i] / str_i * 100.0;
        plus_di[i] = p;
        minus_di[i] = m;

        let di_sum = p + m;
        dx[i] = if di_sum == 0.0 {
            0.0
        } else {
            (p - m).abs() / di_sum * 100.0
        };
    }

    let adx = wilder_sum(&dx, period);

    AdxOutput {
        adx: Series::from(adx),
        plus_di: Series::from(plus_di),
        minus_di: Series::from(minus_di),
    }
}

/// Cumulative Wilder smoothing: the first smoothed value is the raw sum of
/// the first `period` defined inputs, then
/// `s[i] = s[i-1] - s[i-1] / period + x[i]`.
///
/// A leading undefined prefix (as the DX line has) is skipped, not treated
/// as zero.
fn wilder_sum(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if period == 0 {
        return out;
    }
    let Some(first) = values.iter().position(|v| !v.is_nan()) else {
        return out;
    };
    let seed_end = first + period;
    if seed_end > n {
        return out;
    }

    let mut acc: f64 = values[first..seed_end].iter().sum();
    out[seed_end - 1] = acc;
    for i in seed_end..n {
        acc = acc - acc / period as f64 + values[i];
        out[i] = acc;
    }
    out
}
