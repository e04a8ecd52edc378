//! Ichimoku cloud.

use chartmark_core::{Bar, Series};

/// All five Ichimoku lines, index-aligned with the bar sequence.
///
/// The spans are displaced forward: the value plotted at `i` was computed at
/// `i - displacement`. Chikou is displaced backward: the value at `i` is the
/// close from `i + displacement`.
#[derive(Debug, Clone)]
pub struct IchimokuOutput {
    pub tenkan: Series,
    pub kijun: Series,
    pub senkou_a: Series,
    pub senkou_b: Series,
    pub chikou: Series,
}

pub fn ichimoku(
    bars: &[Bar],
    tenkan_period: usize,
    kijun_period: usize,
    senkou_b_period: usize,
    displacement: usize,
) -> IchimokuOutput {
    let n = bars.len();
    let mut tenkan = Series::with_capacity(n);
    let mut kijun = Series::with_capacity(n);
    let mut senkou_a = Series::with_capacity(n);
    let mut senkou_b = Series::with_capacity(n);
    let mut chikou = Series::with_capacity(n);

    for i in 0..n {
        tenkan.push(window_midpoint(bars, tenkan_period, i));
        kijun.push(window_midpoint(bars, kijun_period, i));
    }

    for i in 0..n {
        if i >= displacement {
            let src = i - displacement;
            match (tenkan.get(src), kijun.get(src)) {
                (Some(t), Some(k)) => senkou_a.push((t + k) / 2.0),
                _ => senkou_a.push_undefined(),
            }
            senkou_b.push(window_midpoint(bars, senkou_b_period, src));
        } else {
            senkou_a.push_undefined();
            senkou_b.push_undefined();
        }

        if i + displacement < n {
            chikou.push(bars[i + displacement].close);
        } else {
            chikou.push_undefined();
        }
    }

    IchimokuOutput {
        tenkan,
        kijun,
        senkou_a,
        senkou_b,
        chikou,
    }
}

/// (highest high + lowest low) / 2 over the trailing window ending at `index`.
fn window_midpoint(bars: &[Bar], period: usize, index: usize) -> f64 {
    if period == 0 || index + 1 < period {
        return f64::NAN;
    }
    let window = &bars[index + 1 - period..=index];
    let highest = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let lowest = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    (highest + lowest) / 2.0
}
