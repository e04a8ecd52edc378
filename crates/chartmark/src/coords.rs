//! Coordinate mapping between data space and pixel space.
//!
//! The chart surface owns the visual scale. The engine consumes it through
//! [`CoordinateMapper`] and re-queries on every interaction: the mapping can
//! be non-linear and changes under pan and zoom, so results must never be
//! cached across events.

use chartmark_core::DataPoint;

/// Screen coordinates in pixels from the top-left corner of the chart area.
///
/// X increases to the right, Y increases downward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPos {
    pub x: f32,
    pub y: f32,
}

impl ScreenPos {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_to(self, other: ScreenPos) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f32, f32)> for ScreenPos {
    fn from(pos: (f32, f32)) -> Self {
        Self::new(pos.0, pos.1)
    }
}

/// Bidirectional mapping between data space and pixel space.
///
/// Every method returns `None` outside the active scale; the engine treats
/// an unmappable coordinate as "no match" / "skip this step" rather than an
/// error.
pub trait CoordinateMapper {
    /// Pixel x for a time, or `None` outside the active scale.
    fn time_to_x(&self, time: i64) -> Option<f32>;

    /// Pixel y for a price, or `None` outside the active scale.
    fn price_to_y(&self, price: f64) -> Option<f32>;

    /// Time under a pixel x, or `None` outside the active scale.
    fn x_to_time(&self, x: f32) -> Option<i64>;

    /// Price under a pixel y, or `None` outside the active scale.
    fn y_to_price(&self, y: f32) -> Option<f64>;

    /// Map a data-space point to pixels; `None` if either axis is off-scale.
    fn point_to_screen(&self, point: DataPoint) -> Option<ScreenPos> {
        Some(ScreenPos::new(
            self.time_to_x(point.time)?,
            self.price_to_y(point.price)?,
        ))
    }

    /// Map a pixel position into data space; `None` if either axis is off-scale.
    fn screen_to_point(&self, pos: ScreenPos) -> Option<DataPoint> {
        Some(DataPoint::new(
            self.x_to_time(pos.x)?,
            self.y_to_price(pos.y)?,
        ))
    }
}

/// Linear reference scale over a fixed time/price window and pixel viewport.
///
/// The price axis is inverted the usual way: the highest price maps to y = 0.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    time_start: i64,
    time_end: i64,
    price_min: f64,
    price_max: f64,
    width: f32,
    height: f32,
}

impl LinearScale {
    #[must_use]
    pub fn new(
        time_start: i64,
        time_end: i64,
        price_min: f64,
        price_max: f64,
        width: f32,
        height: f32,
    ) -> Self {
        Self {
            time_start,
            time_end,
            price_min,
            price_max,
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    fn time_span(&self) -> f64 {
        (self.time_end - self.time_start).max(1) as f64
    }

    fn price_span(&self) -> f64 {
        let span = self.price_max - self.price_min;
        if span <= 0.0 {
            1.0
        } else {
            span
        }
    }
}

impl CoordinateMapper for LinearScale {
    fn time_to_x(&self, time: i64) -> Option<f32> {
        if time < self.time_start || time > self.time_end {
            return None;
        }
        let frac = (time - self.time_start) as f64 / self.time_span();
        Some((frac * self.width as f64) as f32)
    }

    fn price_to_y(&self, price: f64) -> Option<f32> {
        if price < self.price_min || price > self.price_max {
            return None;
        }
        let frac = (self.price_max - price) / self.price_span();
        Some((frac * self.height as f64) as f32)
    }

    fn x_to_time(&self, x: f32) -> Option<i64> {
        if x < 0.0 || x > self.width {
            return None;
        }
        let frac = x as f64 / self.width as f64;
        Some(self.time_start + (frac * self.time_span()).round() as i64)
    }

    fn y_to_price(&self, y: f32) -> Option<f64> {
        if y < 0.0 || y > self.height {
            return None;
        }
        let frac = y as f64 / self.height as f64;
        Some(self.price_max - frac * self.price_span())
    }
}
