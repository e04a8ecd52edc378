//! Indicator computation engine.
//!
//! Every function here is a pure transform from a bar sequence to one or more
//! derived series aligned 1:1 with the input. Identical input produces
//! identical output; there is no cross-call state. Insufficient warm-up
//! history yields the undefined sentinel, never an error. Degenerate inputs
//! (empty sequence, single bar) degrade to all-sentinel series.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod frame;
pub mod ichimoku;
pub mod ma;
pub mod macd;
pub mod rsi;
pub mod sar;
pub mod stochastic;

pub use adx::{adx, AdxOutput};
pub use atr::atr;
pub use bollinger::{bollinger, BollingerOutput};
pub use frame::{
    AnalysisFrame, IchimokuParams, IndicatorId, IndicatorParams, MacdParams, SarParams,
    SeriesId, StochasticParams,
};
pub use ichimoku::{ichimoku, IchimokuOutput};
pub use ma::{ema, sma};
pub use macd::{macd, MacdOutput};
pub use rsi::rsi;
pub use sar::parabolic_sar;
pub use stochastic::{stochastic, StochasticOutput};
