//! Bollinger bands.

use chartmark_core::{Bar, Series};

use crate::ma::sma;

/// Bollinger band output: the middle band is the SMA of the same period.
#[derive(Debug, Clone)]
pub struct BollingerOutput {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

/// Bands at `middle ± mult * sigma`, where sigma is the population standard
/// deviation of the trailing close window.
pub fn bollinger(bars: &[Bar], period: usize, mult: f64) -> BollingerOutput {
    let middle = sma(bars, period);
    let mut upper = Series::with_capacity(bars.len());
    let mut lower = Series::with_capacity(bars.len());

    for i in 0..bars.len() {
        match middle.get(i) {
            None => {
                upper.push_undefined();
                lower.push_undefined();
            }
            Some(mean) => {
                let sum_sq: f64 = bars[i + 1 - period..=i]
                    .iter()
                    .map(|b| (b.close - mean).powi(2))
                    .sum();
                let std_dev = (sum_sq / period as f64).sqrt();
                upper.push(mean + mult * std_dev);
                lower.push(mean - mult * std_dev);
            }
        }
    }

    BollingerOutput { upper, middle, lower }
}
