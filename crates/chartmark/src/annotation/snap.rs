//! Snap engine: magnet a free point onto the nearest bar's OHLC.

use chartmark_core::{Bar, DataPoint};

/// Snap to the nearest bar by time, then to the nearest of that bar's
/// open/high/low/close by price. An empty bar sequence returns the input
/// unchanged.
pub fn snap_to_ohlc(point: DataPoint, bars: &[Bar]) -> DataPoint {
    let Some(bar) = bars.iter().min_by_key(|b| (b.time - point.time).abs()) else {
        return point;
    };

    let mut price = bar.open;
    let mut best = (bar.open - point.price).abs();
    for candidate in [bar.high, bar.low, bar.close] {
        let diff = (candidate - point.price).abs();
        if diff < best {
            best = diff;
            price = candidate;
        }
    }

    DataPoint::new(bar.time, price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars() -> Vec<Bar> {
        vec![
            Bar::new(1000, 100.0, 110.0, 95.0, 105.0, 10.0),
            Bar::new(2000, 105.0, 115.0, 100.0, 112.0, 10.0),
            Bar::new(3000, 112.0, 120.0, 108.0, 118.0, 10.0),
        ]
    }

    #[test]
    fn test_snaps_time_and_price() {
        let snapped = snap_to_ohlc(DataPoint::new(2100, 114.2), &bars());
        assert_eq!(snapped.time, 2000);
        assert_eq!(snapped.price, 115.0);
    }

    #[test]
    fn test_price_is_exactly_one_of_ohlc() {
        let bars = bars();
        let snapped = snap_to_ohlc(DataPoint::new(2600, 109.0), &bars);
        assert_eq!(snapped.time, 3000);
        let ohlc = [bars[2].open, bars[2].high, bars[2].low, bars[2].close];
        assert!(ohlc.contains(&snapped.price));
        assert_eq!(snapped.price, 108.0);
    }

    #[test]
    fn test_midpoint_prefers_nearer_bar() {
        // 1400 is nearer to 1000 than to 2000.
        let snapped = snap_to_ohlc(DataPoint::new(1400, 96.0), &bars());
        assert_eq!(snapped.time, 1000);
        assert_eq!(snapped.price, 95.0);
    }

    #[test]
    fn test_empty_bars_return_input() {
        let point = DataPoint::new(123, 45.6);
        assert_eq!(snap_to_ohlc(point, &[]), point);
    }
}
