//! MACD (Moving Average Convergence Divergence).

use chartmark_core::{Bar, Series};

use crate::ma::ema_values;

/// MACD output lines.
#[derive(Debug, Clone)]
pub struct MacdOutput {
    /// Fast EMA minus slow EMA.
    pub macd: Series,
    /// EMA of the MACD line, treated as a fresh close series.
    pub signal: Series,
    /// MACD minus signal.
    pub histogram: Series,
}

pub fn macd(bars: &[Bar], fast: usize, slow: usize, signal: usize) -> MacdOutput {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let fast_ema = ema_values(&closes, fast);
    let slow_ema = ema_values(&closes, slow);

    let macd_line: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_values(&macd_line, signal);
    let histogram: Vec<f64> = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    MacdOutput {
        macd: Series::from(macd_line),
        signal: Series::from(signal_line),
        histogram: Series::from(histogram),
    }
}
