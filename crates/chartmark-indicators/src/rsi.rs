//! RSI (Relative Strength Index).
//!
//! Wilder's smoothing for average gain/loss:
//! - seed: simple mean of the first `period` deltas
//! - thereafter: avg = (avg * (period - 1) + x) / period
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss), with a zero average loss
//! replaced by a small epsilon so the output stays a comparable number in
//! [0, 100] instead of propagating a division by zero.

use chartmark_core::{Bar, Series};

const LOSS_EPSILON: f64 = 1e-10;

pub fn rsi(bars: &[Bar], period: usize) -> Series {
    let n = bars.len();
    if period == 0 || n <= period {
        return Series::undefined(n);
    }

    let mut out = vec![f64::NAN; n];
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..=period {
        let change = bars[i].close - bars[i - 1].close;
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss -= change;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    out[period] = 100.0 - 100.0 / (1.0 + avg_gain / guard(avg_loss));

    for i in period + 1..n {
        let change = bars[i].close - bars[i - 1].close;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;
        out[i] = 100.0 - 100.0 / (1.0 + avg_gain / guard(avg_loss));
    }

    Series::from(out)
}

fn guard(avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        LOSS_EPSILON
    } else {
        avg_loss
    }
}
