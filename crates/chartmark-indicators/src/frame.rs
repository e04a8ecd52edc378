//! Indicator parameters and the combined analysis frame.

use serde::{Deserialize, Serialize};

use chartmark_core::{Bar, Series};

use crate::{adx, atr, bollinger, ichimoku, ma, macd, rsi, sar, stochastic};

/// Parameters for every supported indicator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub sma_period: usize,
    pub ema_period: usize,
    pub bollinger_period: usize,
    pub bollinger_mult: f64,
    pub rsi_period: usize,
    pub macd: MacdParams,
    pub stochastic: StochasticParams,
    pub atr_period: usize,
    pub adx_period: usize,
    pub ichimoku: IchimokuParams,
    pub sar: SarParams,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_period: 20,
            ema_period: 20,
            bollinger_period: 20,
            bollinger_mult: 2.0,
            rsi_period: 14,
            macd: MacdParams::default(),
            stochastic: StochasticParams::default(),
            atr_period: 14,
            adx_period: 14,
            ichimoku: IchimokuParams::default(),
            sar: SarParams::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StochasticParams {
    pub k_period: usize,
    pub d_period: usize,
    pub smooth: usize,
}

impl Default for StochasticParams {
    fn default() -> Self {
        Self {
            k_period: 14,
            d_period: 3,
            smooth: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IchimokuParams {
    pub tenkan: usize,
    pub kijun: usize,
    pub senkou_b: usize,
    pub displacement: usize,
}

impl Default for IchimokuParams {
    fn default() -> Self {
        Self {
            tenkan: 9,
            kijun: 26,
            senkou_b: 52,
            displacement: 26,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SarParams {
    pub start: f64,
    pub step: f64,
    pub max: f64,
}

impl Default for SarParams {
    fn default() -> Self {
        Self {
            start: 0.02,
            step: 0.02,
            max: 0.2,
        }
    }
}

/// An indicator group toggled as one unit in the visibility map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorId {
    Sma,
    Ema,
    Bollinger,
    Rsi,
    Macd,
    Stochastic,
    Atr,
    Adx,
    Ichimoku,
    Sar,
}

impl IndicatorId {
    pub const ALL: [IndicatorId; 10] = [
        IndicatorId::Sma,
        IndicatorId::Ema,
        IndicatorId::Bollinger,
        IndicatorId::Rsi,
        IndicatorId::Macd,
        IndicatorId::Stochastic,
        IndicatorId::Atr,
        IndicatorId::Adx,
        IndicatorId::Ichimoku,
        IndicatorId::Sar,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IndicatorId::Sma => "sma",
            IndicatorId::Ema => "ema",
            IndicatorId::Bollinger => "bollinger",
            IndicatorId::Rsi => "rsi",
            IndicatorId::Macd => "macd",
            IndicatorId::Stochastic => "stochastic",
            IndicatorId::Atr => "atr",
            IndicatorId::Adx => "adx",
            IndicatorId::Ichimoku => "ichimoku",
            IndicatorId::Sar => "sar",
        }
    }

    /// Which groups start visible.
    pub fn default_visible(&self) -> bool {
        matches!(self, IndicatorId::Rsi | IndicatorId::Macd)
    }
}

/// One derived output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesId {
    Sma,
    Ema,
    BbUpper,
    BbLower,
    Rsi,
    MacdLine,
    MacdSignal,
    MacdHistogram,
    StochK,
    StochD,
    Atr,
    Adx,
    DiPlus,
    DiMinus,
    Tenkan,
    Kijun,
    SenkouA,
    SenkouB,
    Chikou,
    Sar,
}

impl SeriesId {
    pub const ALL: [SeriesId; 20] = [
        SeriesId::Sma,
        SeriesId::Ema,
        SeriesId::BbUpper,
        SeriesId::BbLower,
        SeriesId::Rsi,
        SeriesId::MacdLine,
        SeriesId::MacdSignal,
        SeriesId::MacdHistogram,
        SeriesId::StochK,
        SeriesId::StochD,
        SeriesId::Atr,
        SeriesId::Adx,
        SeriesId::DiPlus,
        SeriesId::DiMinus,
        SeriesId::Tenkan,
        SeriesId::Kijun,
        SeriesId::SenkouA,
        SeriesId::SenkouB,
        SeriesId::Chikou,
        SeriesId::Sar,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SeriesId::Sma => "sma",
            SeriesId::Ema => "ema",
            SeriesId::BbUpper => "bb_upper",
            SeriesId::BbLower => "bb_lower",
            SeriesId::Rsi => "rsi",
            SeriesId::MacdLine => "macd_line",
            SeriesId::MacdSignal => "macd_signal",
            SeriesId::MacdHistogram => "macd_hist",
            SeriesId::StochK => "stoch_k",
            SeriesId::StochD => "stoch_d",
            SeriesId::Atr => "atr",
            SeriesId::Adx => "adx",
            SeriesId::DiPlus => "di_plus",
            SeriesId::DiMinus => "di_minus",
            SeriesId::Tenkan => "tenkan_sen",
            SeriesId::Kijun => "kijun_sen",
            SeriesId::SenkouA => "senkou_span_a",
            SeriesId::SenkouB => "senkou_span_b",
            SeriesId::Chikou => "chikou_span",
            SeriesId::Sar => "sar",
        }
    }

    /// The visibility group this line belongs to.
    pub fn indicator(&self) -> IndicatorId {
        match self {
            SeriesId::Sma => IndicatorId::Sma,
            SeriesId::Ema => IndicatorId::Ema,
            SeriesId::BbUpper | SeriesId::BbLower => IndicatorId::Bollinger,
            SeriesId::Rsi => IndicatorId::Rsi,
            SeriesId::MacdLine | SeriesId::MacdSignal | SeriesId::MacdHistogram => IndicatorId::Macd,
            SeriesId::StochK | SeriesId::StochD => IndicatorId::Stochastic,
            SeriesId::Atr => IndicatorId::Atr,
            SeriesId::Adx | SeriesId::DiPlus | SeriesId::DiMinus => IndicatorId::Adx,
            SeriesId::Tenkan
            | SeriesId::Kijun
            | SeriesId::SenkouA
            | SeriesId::SenkouB
            | SeriesId::Chikou => IndicatorId::Ichimoku,
            SeriesId::Sar => IndicatorId::Sar,
        }
    }
}

/// Every derived series for one bar sequence: the merged per-bar record that
/// feeds the rendering surface and the snap engine's bar lookups.
///
/// Smoothing-based lines (EMA, the Wilder family, SAR) are order-dependent
/// with no valid resumption point, so a frame is always recomputed from the
/// full sequence, never patched incrementally.
#[derive(Debug, Clone, Default)]
pub struct AnalysisFrame {
    len: usize,
    sma: Series,
    ema: Series,
    bb_upper: Series,
    bb_lower: Series,
    rsi: Series,
    macd_line: Series,
    macd_signal: Series,
    macd_histogram: Series,
    stoch_k: Series,
    stoch_d: Series,
    atr: Series,
    adx: Series,
    di_plus: Series,
    di_minus: Series,
    tenkan: Series,
    kijun: Series,
    senkou_a: Series,
    senkou_b: Series,
    chikou: Series,
    sar: Series,
}

impl AnalysisFrame {
    pub fn compute(bars: &[Bar], params: &IndicatorParams) -> Self {
        let bb = bollinger::bollinger(bars, params.bollinger_period, params.bollinger_mult);
        let macd_out = macd::macd(bars, params.macd.fast, params.macd.slow, params.macd.signal);
        let stoch = stochastic::stochastic(
            bars,
            params.stochastic.k_period,
            params.stochastic.d_period,
            params.stochastic.smooth,
        );
        let adx_out = adx::adx(bars, params.adx_period);
        let ichi = ichimoku::ichimoku(
            bars,
            params.ichimoku.tenkan,
            params.ichimoku.kijun,
            params.ichimoku.senkou_b,
            params.ichimoku.displacement,
        );

        Self {
            len: bars.len(),
            sma: ma::sma(bars, params.sma_period),
            ema: ma::ema(bars, params.ema_period),
            bb_upper: bb.upper,
            bb_lower: bb.lower,
            rsi: rsi::rsi(bars, params.rsi_period),
            macd_line: macd_out.macd,
            macd_signal: macd_out.signal,
            macd_histogram: macd_out.histogram,
            stoch_k: stoch.k,
            stoch_d: stoch.d,
            atr: atr::atr(bars, params.atr_period),
            adx: adx_out.adx,
            di_plus: adx_out.plus_di,
            di_minus: adx_out.minus_di,
            tenkan: ichi.tenkan,
            kijun: ichi.kijun,
            senkou_a: ichi.senkou_a,
            senkou_b: ichi.senkou_b,
            chikou: ichi.chikou,
            sar: sar::parabolic_sar(bars, params.sar.start, params.sar.step, params.sar.max),
        }
    }

    pub fn series(&self, id: SeriesId) -> &Series {
        match id {
            SeriesId::Sma => &self.sma,
            SeriesId::Ema => &self.ema,
            SeriesId::BbUpper => &self.bb_upper,
            SeriesId::BbLower => &self.bb_lower,
            SeriesId::Rsi => &self.rsi,
            SeriesId::MacdLine => &self.macd_line,
            SeriesId::MacdSignal => &self.macd_signal,
            SeriesId::MacdHistogram => &self.macd_histogram,
            SeriesId::StochK => &self.stoch_k,
            SeriesId::StochD => &self.stoch_d,
            SeriesId::Atr => &self.atr,
            SeriesId::Adx => &self.adx,
            SeriesId::DiPlus => &self.di_plus,
            SeriesId::DiMinus => &self.di_minus,
            SeriesId::Tenkan => &self.tenkan,
            SeriesId::Kijun => &self.kijun,
            SeriesId::SenkouA => &self.senkou_a,
            SeriesId::SenkouB => &self.senkou_b,
            SeriesId::Chikou => &self.chikou,
            SeriesId::Sar => &self.sar,
        }
    }

    /// Number of bars this frame was computed over.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::bars_from_hlc;

    fn sample_bars(n: usize) -> Vec<Bar> {
        let hlc: Vec<(f64, f64, f64)> = (0..n)
            .map(|i| {
                let p = 100.0 + (i as f64 * 0.45).sin() * 8.0;
                (p + 2.0, p - 2.0, p)
            })
            .collect();
        bars_from_hlc(&hlc)
    }

    #[test]
    fn every_series_is_aligned() {
        let bars = sample_bars(90);
        let frame = AnalysisFrame::compute(&bars, &IndicatorParams::default());
        for id in SeriesId::ALL {
            assert_eq!(frame.series(id).len(), bars.len(), "{} misaligned", id.name());
        }
    }

    #[test]
    fn empty_bars_degrade_cleanly() {
        let frame = AnalysisFrame::compute(&[], &IndicatorParams::default());
        assert!(frame.is_empty());
        for id in SeriesId::ALL {
            assert!(frame.series(id).is_empty());
        }
    }

    #[test]
    fn single_bar_is_mostly_undefined() {
        let bars = sample_bars(1);
        let frame = AnalysisFrame::compute(&bars, &IndicatorParams::default());
        assert_eq!(frame.series(SeriesId::Rsi).get(0), None);
        assert_eq!(frame.series(SeriesId::Atr).get(0), None);
        // Seeded recurrences are the exception: they exist from bar zero.
        assert!(frame.series(SeriesId::Ema).get(0).is_some());
        assert!(frame.series(SeriesId::Sar).get(0).is_some());
    }

    #[test]
    fn series_ids_group_consistently() {
        for id in SeriesId::ALL {
            // Every line belongs to a group that is itself registered.
            assert!(IndicatorId::ALL.contains(&id.indicator()));
        }
    }

    #[test]
    fn params_deserialize_with_partial_input() {
        let params: IndicatorParams = toml::from_str("rsi_period = 7\n[macd]\nfast = 5\n").unwrap();
        assert_eq!(params.rsi_period, 7);
        assert_eq!(params.macd.fast, 5);
        assert_eq!(params.macd.slow, 26);
        assert_eq!(params.sma_period, 20);
    }
}
