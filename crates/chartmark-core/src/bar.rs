//! Bar data structures for OHLCV data.

/// One OHLCV sample for a fixed interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Bar open time in epoch milliseconds. Strictly increasing and unique
    /// across a sequence.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Validate a bar has reasonable values.
pub fn validate_bar(bar: &Bar) -> bool {
    bar.open.is_finite()
        && bar.high.is_finite()
        && bar.low.is_finite()
        && bar.close.is_finite()
        && bar.volume.is_finite()
        && bar.high >= bar.low
        && bar.open > 0.0
        && bar.close > 0.0
        && bar.low > 0.0
        && bar.volume >= 0.0
}

/// Validate a bar sequence has strictly increasing, unique times.
pub fn validate_bars(bars: &[Bar]) -> bool {
    bars.windows(2).all(|w| w[0].time < w[1].time)
}
