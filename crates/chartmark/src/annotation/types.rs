//! Annotation types for interactive chart markup.

use std::sync::atomic::{AtomicU64, Ordering};

use chartmark_core::DataPoint;

/// Global counter for generating unique annotation IDs.
static NEXT_ANNOTATION_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnnotationId(u64);

impl AnnotationId {
    /// Generate a new unique annotation ID.
    pub fn new() -> Self {
        Self(NEXT_ANNOTATION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for AnnotationId {
    fn default() -> Self {
        Self::new()
    }
}

/// How many anchors a kind requires before it is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    /// Freehand strokes grow while the pointer is down; at least one anchor.
    Unbounded,
}

/// The closed set of annotation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    TrendLine,
    HorizontalLine,
    Fibonacci,
    Rectangle,
    Text,
    Icon,
    Measure,
    Brush,
    ElliottWave,
    Pitchfork,
    LongPosition,
    ShortPosition,
}

impl AnnotationKind {
    pub fn arity(&self) -> Arity {
        match self {
            AnnotationKind::HorizontalLine | AnnotationKind::Text | AnnotationKind::Icon => {
                Arity::Fixed(1)
            }
            AnnotationKind::TrendLine
            | AnnotationKind::Fibonacci
            | AnnotationKind::Rectangle
            | AnnotationKind::Measure => Arity::Fixed(2),
            AnnotationKind::Pitchfork
            | AnnotationKind::LongPosition
            | AnnotationKind::ShortPosition => Arity::Fixed(3),
            AnnotationKind::ElliottWave => Arity::Fixed(5),
            AnnotationKind::Brush => Arity::Unbounded,
        }
    }

    /// Get the display name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationKind::TrendLine => "Trend Line",
            AnnotationKind::HorizontalLine => "Horizontal Line",
            AnnotationKind::Fibonacci => "Fibonacci",
            AnnotationKind::Rectangle => "Rectangle",
            AnnotationKind::Text => "Text",
            AnnotationKind::Icon => "Icon",
            AnnotationKind::Measure => "Measure",
            AnnotationKind::Brush => "Brush",
            AnnotationKind::ElliottWave => "Elliott Wave",
            AnnotationKind::Pitchfork => "Pitchfork",
            AnnotationKind::LongPosition => "Long Position",
            AnnotationKind::ShortPosition => "Short Position",
        }
    }

    /// Risk/reward position tools collect entry, take-profit and stop-loss.
    pub fn is_position(&self) -> bool {
        matches!(
            self,
            AnnotationKind::LongPosition | AnnotationKind::ShortPosition
        )
    }

    /// Get all kinds.
    pub fn all() -> &'static [AnnotationKind] {
        &[
            AnnotationKind::TrendLine,
            AnnotationKind::HorizontalLine,
            AnnotationKind::Fibonacci,
            AnnotationKind::Rectangle,
            AnnotationKind::Text,
            AnnotationKind::Icon,
            AnnotationKind::Measure,
            AnnotationKind::Brush,
            AnnotationKind::ElliottWave,
            AnnotationKind::Pitchfork,
            AnnotationKind::LongPosition,
            AnnotationKind::ShortPosition,
        ]
    }
}

/// Default color for annotations (blue).
pub const DEFAULT_COLOR: [f32; 4] = [0.16, 0.38, 1.0, 1.0];
/// Profit-side color for position tools (green).
pub const LONG_COLOR: [f32; 4] = [0.30, 0.69, 0.31, 1.0];
/// Loss-side color for position tools (red).
pub const SHORT_COLOR: [f32; 4] = [0.96, 0.26, 0.21, 1.0];

/// Visual style carried by an annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub color: [f32; 4],
    pub line_width: f32,
    pub text: Option<String>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR,
            line_width: 2.0,
            text: None,
        }
    }
}

impl Style {
    /// The default style for a kind.
    pub fn for_kind(kind: AnnotationKind) -> Self {
        match kind {
            AnnotationKind::LongPosition => Self {
                color: LONG_COLOR,
                line_width: 1.0,
                text: None,
            },
            AnnotationKind::ShortPosition => Self {
                color: SHORT_COLOR,
                line_width: 1.0,
                text: None,
            },
            AnnotationKind::Text => Self {
                text: Some("Text Label".to_string()),
                ..Self::default()
            },
            _ => Self::default(),
        }
    }
}

/// A piece of geometric markup anchored in data space.
#[derive(Debug, Clone)]
pub struct Annotation {
    pub id: AnnotationId,
    pub kind: AnnotationKind,
    pub anchors: Vec<DataPoint>,
    pub style: Style,
}

impl Annotation {
    pub fn new(kind: AnnotationKind, anchors: Vec<DataPoint>) -> Self {
        Self {
            id: AnnotationId::new(),
            kind,
            anchors,
            style: Style::for_kind(kind),
        }
    }

    /// Whether the anchor list satisfies the kind's arity.
    pub fn is_complete(&self) -> bool {
        match self.kind.arity() {
            Arity::Fixed(n) => self.anchors.len() == n,
            Arity::Unbounded => !self.anchors.is_empty(),
        }
    }

    /// Move every anchor by the given delta.
    pub fn translate(&mut self, d_time: i64, d_price: f64) {
        for anchor in &mut self.anchors {
            *anchor = anchor.translate(d_time, d_price);
        }
    }

    /// Get mutable anchor by index.
    pub fn anchor_mut(&mut self, index: usize) -> Option<&mut DataPoint> {
        self.anchors.get_mut(index)
    }
}

/// Retracement ratios rendered between a Fibonacci annotation's two anchors.
pub const FIB_LEVELS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];

/// (ratio, price) of each retracement level between two anchor prices.
pub fn fibonacci_levels(a: DataPoint, b: DataPoint) -> [(f64, f64); 7] {
    let diff = b.price - a.price;
    FIB_LEVELS.map(|level| (level, a.price + diff * level))
}

/// Reward-to-risk ratio of a position. Zero risk reads as 0.
pub fn risk_reward_ratio(entry: f64, take_profit: f64, stop_loss: f64) -> f64 {
    let risk = (entry - stop_loss).abs();
    let reward = (entry - take_profit).abs();
    if risk == 0.0 {
        0.0
    } else {
        reward / risk
    }
}
