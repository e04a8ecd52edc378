//! Chart session: bars, derived series, visibility, annotations, history.
//!
//! One session owns a bar sequence and everything derived from it, and
//! exposes the command surface an embedding shell drives. All mutation runs
//! synchronously inside these entry points.

use std::collections::HashMap;

use thiserror::Error;

use chartmark_core::{validate_bars, Bar};
use chartmark_indicators::{AnalysisFrame, IndicatorId, SeriesId};

use crate::annotation::{Annotation, AnnotationId, AnnotationKind, ToolController};
use crate::config::Config;
use crate::history::HistoryGuard;

/// How close (in bars) the viewport may get to the earliest loaded bar
/// before an extension request is armed.
pub const HISTORY_EDGE_BARS: usize = 5;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("bar times must be strictly increasing and unique (violation at index {index})")]
    NonMonotonicTime { index: usize },
    #[error("extension bars must strictly precede the loaded range")]
    ExtensionOverlap,
}

#[derive(Debug)]
pub struct ChartSession {
    bars: Vec<Bar>,
    times: Vec<i64>,
    config: Config,
    frame: AnalysisFrame,
    visibility: HashMap<IndicatorId, bool>,
    controller: ToolController,
    history: HistoryGuard,
}

impl ChartSession {
    pub fn new(bars: Vec<Bar>, config: Config) -> Result<Self, SessionError> {
        check_ascending(&bars)?;
        let times: Vec<i64> = bars.iter().map(|b| b.time).collect();
        let frame = AnalysisFrame::compute(&bars, &config.indicators);
        let visibility = IndicatorId::ALL
            .iter()
            .map(|&id| (id, config.display.visible(id)))
            .collect();

        Ok(Self {
            bars,
            times,
            config,
            frame,
            visibility,
            controller: ToolController::new(),
            history: HistoryGuard::default(),
        })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn frame(&self) -> &AnalysisFrame {
        &self.frame
    }

    /// One line as (time, value) pairs, undefined slots omitted.
    pub fn series_points(&self, id: SeriesId) -> Vec<(i64, f64)> {
        self.frame.series(id).points(&self.times)
    }

    /// Every line whose indicator group is currently visible.
    pub fn visible_series(&self) -> Vec<(SeriesId, Vec<(i64, f64)>)> {
        SeriesId::ALL
            .iter()
            .filter(|id| self.is_visible(id.indicator()))
            .map(|&id| (id, self.series_points(id)))
            .collect()
    }

    pub fn is_visible(&self, id: IndicatorId) -> bool {
        self.visibility.get(&id).copied().unwrap_or(false)
    }

    pub fn visibility(&self) -> &HashMap<IndicatorId, bool> {
        &self.visibility
    }

    pub fn toggle_series_visibility(&mut self, id: IndicatorId) {
        let entry = self.visibility.entry(id).or_insert(false);
        *entry = !*entry;
    }

    // ---- annotation commands --------------------------------------------

    pub fn select_tool(&mut self, kind: Option<AnnotationKind>) {
        self.controller.select_tool(kind);
    }

    pub fn toggle_magnet(&mut self) {
        self.controller.toggle_magnet();
    }

    pub fn delete_annotation(&mut self, id: AnnotationId) -> bool {
        self.controller.delete_annotation(id)
    }

    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.controller.annotations()
    }

    pub fn preview(&self) -> Option<&Annotation> {
        self.controller.preview()
    }

    pub fn controller(&self) -> &ToolController {
        &self.controller
    }

    /// Pointer handlers need the bar slice and a mapper; route through here
    /// so callers cannot hand the controller a stale sequence.
    pub fn controller_mut(&mut self) -> (&mut ToolController, &[Bar]) {
        (&mut self.controller, &self.bars)
    }

    // ---- history extension ----------------------------------------------

    /// Report the first visible bar index after a pan/zoom. Arms an
    /// extension request when the viewport nears the earliest loaded bar.
    pub fn note_visible_range(&mut self, first_visible: usize) -> bool {
        if first_visible < HISTORY_EDGE_BARS {
            self.request_history_extension()
        } else {
            false
        }
    }

    /// Ask to fetch older bars. `false` when a request is already pending
    /// or the cooldown has not elapsed.
    pub fn request_history_extension(&mut self) -> bool {
        let started = self.history.try_begin();
        if started {
            log::info!("history extension requested ({} bars loaded)", self.bars.len());
        }
        started
    }

    pub fn history_in_flight(&self) -> bool {
        self.history.is_in_flight()
    }

    /// Prepend older bars and recompute every derived series from scratch.
    ///
    /// Smoothing recurrences (EMA, the Wilder family, SAR) depend on the
    /// full historical prefix, so the frame is never patched incrementally.
    pub fn apply_history_extension(&mut self, older: Vec<Bar>) -> Result<usize, SessionError> {
        if let Err(err) = check_ascending(&older) {
            self.history.finish();
            return Err(err);
        }
        if let (Some(last_old), Some(first_current)) = (older.last(), self.bars.first()) {
            if last_old.time >= first_current.time {
                self.history.finish();
                return Err(SessionError::ExtensionOverlap);
            }
        }

        let added = older.len();
        if added > 0 {
            self.bars.splice(0..0, older);
            self.recompute();
            log::info!("history extended by {added} bars, total {}", self.bars.len());
        }
        self.history.finish();
        Ok(added)
    }

    /// Release the guard after a failed or cancelled fetch.
    pub fn abort_history_extension(&mut self) {
        log::debug!("history extension aborted");
        self.history.finish();
    }

    fn recompute(&mut self) {
        self.times = self.bars.iter().map(|b| b.time).collect();
        self.frame = AnalysisFrame::compute(&self.bars, &self.config.indicators);
    }
}

fn check_ascending(bars: &[Bar]) -> Result<(), SessionError> {
    if validate_bars(bars) {
        return Ok(());
    }
    let index = bars
        .windows(2)
        .position(|w| w[0].time >= w[1].time)
        .map(|i| i + 1)
        .unwrap_or(0);
    Err(SessionError::NonMonotonicTime { index })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bars(start_time: i64, count: usize) -> Vec<Bar> {
        (0..count)
            .map(|i| {
                let t = start_time + i as i64 * 1000;
                let p = 100.0 + ((t / 1000) as f64 * 0.43).sin() * 9.0;
                Bar::new(t, p, p + 2.0, p - 2.0, p + 0.5, 50.0)
            })
            .collect()
    }

    #[test]
    fn rejects_non_monotonic_bars() {
        let mut bars = make_bars(0, 5);
        bars[3].time = bars[2].time;
        let err = ChartSession::new(bars, Config::default()).unwrap_err();
        assert_eq!(err, SessionError::NonMonotonicTime { index: 3 });
    }

    #[test]
    fn default_visibility_matches_display_config() {
        let session = ChartSession::new(make_bars(0, 60), Config::default()).unwrap();
        assert!(session.is_visible(IndicatorId::Rsi));
        assert!(session.is_visible(IndicatorId::Macd));
        assert!(!session.is_visible(IndicatorId::Sma));

        let visible: Vec<SeriesId> = session.visible_series().into_iter().map(|(id, _)| id).collect();
        assert!(visible.contains(&SeriesId::Rsi));
        assert!(visible.contains(&SeriesId::MacdHistogram));
        assert!(!visible.contains(&SeriesId::Sma));
    }

    #[test]
    fn toggle_visibility_roundtrip() {
        let mut session = ChartSession::new(make_bars(0, 60), Config::default()).unwrap();
        session.toggle_series_visibility(IndicatorId::Sar);
        assert!(session.is_visible(IndicatorId::Sar));
        session.toggle_series_visibility(IndicatorId::Sar);
        assert!(!session.is_visible(IndicatorId::Sar));
    }

    #[test]
    fn series_points_omit_undefined_slots() {
        let session = ChartSession::new(make_bars(0, 60), Config::default()).unwrap();
        let rsi = session.series_points(SeriesId::Rsi);
        // 14-period RSI defines 60 - 14 values.
        assert_eq!(rsi.len(), 46);
        assert_eq!(rsi[0].0, session.bars()[14].time);
    }

    #[test]
    fn history_requests_coalesce() {
        let mut session = ChartSession::new(make_bars(100_000, 60), Config::default()).unwrap();
        assert!(session.request_history_extension());
        // A second trigger while one is pending is a no-op.
        assert!(!session.request_history_extension());
        assert!(!session.note_visible_range(2));

        session.apply_history_extension(make_bars(0, 50)).unwrap();
        assert_eq!(session.bars().len(), 110);
        // Within the cooldown window the guard stays closed.
        assert!(!session.request_history_extension());
    }

    #[test]
    fn far_viewport_does_not_arm_extension() {
        let mut session = ChartSession::new(make_bars(0, 60), Config::default()).unwrap();
        assert!(!session.note_visible_range(30));
        assert!(!session.history_in_flight());
    }

    #[test]
    fn extension_must_precede_loaded_range() {
        let mut session = ChartSession::new(make_bars(10_000, 20), Config::default()).unwrap();
        session.request_history_extension();
        let err = session.apply_history_extension(make_bars(10_000, 5)).unwrap_err();
        assert_eq!(err, SessionError::ExtensionOverlap);
        // The guard was released despite the failure.
        assert!(!session.history_in_flight());
    }

    #[test]
    fn extension_recompute_matches_fresh_computation() {
        let older = make_bars(0, 40);
        let recent = make_bars(40_000, 40);

        let mut extended = ChartSession::new(recent.clone(), Config::default()).unwrap();
        extended.request_history_extension();
        extended.apply_history_extension(older.clone()).unwrap();

        let mut combined = older;
        combined.extend(recent);
        let fresh = ChartSession::new(combined, Config::default()).unwrap();

        for id in SeriesId::ALL {
            let a = extended.frame().series(id);
            let b = fresh.frame().series(id);
            assert_eq!(a.len(), b.len(), "{} length", id.name());
            for i in 0..a.len() {
                let (x, y) = (a.values()[i], b.values()[i]);
                assert!(
                    x.is_nan() == y.is_nan() && (x.is_nan() || x == y),
                    "{} diverges at {i}: {x} vs {y}",
                    id.name()
                );
            }
        }
    }

    #[test]
    fn malformed_extension_releases_guard() {
        let mut session = ChartSession::new(make_bars(10_000, 20), Config::default()).unwrap();
        session.request_history_extension();
        let mut older = make_bars(0, 5);
        older.swap(0, 4);
        assert!(session.apply_history_extension(older).is_err());
        assert!(!session.history_in_flight());
    }

    #[test]
    fn empty_extension_is_accepted() {
        let mut session = ChartSession::new(make_bars(0, 20), Config::default()).unwrap();
        session.request_history_extension();
        assert_eq!(session.apply_history_extension(Vec::new()).unwrap(), 0);
        assert!(!session.history_in_flight());
    }
}
