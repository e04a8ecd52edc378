//! Parabolic SAR (stop-and-reverse).

use chartmark_core::{Bar, Series};

/// One SAR step with the trend side it was computed on.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SarStep {
    pub value: f64,
    #[allow(dead_code)]
    pub long: bool,
}

/// Stop-and-reverse state machine.
///
/// Starts long with `sar = low[0]`, `ep = high[0]`, `af = start`. Each step
/// advances the stop toward the extreme point, clamps it against the prior
/// two bars so it never penetrates them, and flips the trend when price
/// crosses the stop: the new stop is the old extreme point, the extreme
/// resets to the current bar's opposing extreme, and the factor resets to
/// `start`. A new favorable extreme accelerates by `step`, capped at `max`.
pub fn parabolic_sar(bars: &[Bar], start: f64, step: f64, max: f64) -> Series {
    Series::from(
        sar_steps(bars, start, step, max)
            .into_iter()
            .map(|s| s.value)
            .collect::<Vec<f64>>(),
    )
}

pub(crate) fn sar_steps(bars: &[Bar], start: f64, step: f64, max: f64) -> Vec<SarStep> {
    let Some(first) = bars.first() else {
        return Vec::new();
    };

    let mut long = true;
    let mut af = start;
    let mut ep = first.high;
    let mut out = Vec::with_capacity(bars.len());
    out.push(SarStep {
        value: first.low,
        long,
    });

    for i in 1..bars.len() {
        let prev_sar = out[i - 1].value;
        let prev_high = bars[i - 1].high;
        let prev_low = bars[i - 1].low;
        let two_back_low = if i >= 2 { bars[i - 2].low } else { prev_low };
        let two_back_high = if i >= 2 { bars[i - 2].high } else { prev_high };

        let mut sar = prev_sar + af * (ep - prev_sar);

        if long {
            sar = sar.min(prev_low).min(two_back_low);
            if bars[i].low < sar {
                long = false;
                sar = ep;
                ep = bars[i].low;
                af = start;
            } else if bars[i].high > ep {
                ep = bars[i].high;
                af = (af + step).min(max);
            }
        } else {
            sar = sar.max(prev_high).max(two_back_high);
            if bars[i].high > sar {
                long = true;
                sar = ep;
                ep = bars[i].high;
                af = start;
            } else if bars[i].low < ep {
                ep = bars[i].low;
                af = (af + step).min(max);
            }
        }

        out.push(SarStep { value: sar, long });
    }

    out
}
