//! Interactive annotation tools for chart markup.

mod controller;
mod hit;
mod snap;
mod store;
mod types;

pub use controller::{DragMode, InteractionState, ToolController};
pub use hit::{anchor_hit, hit_test, topmost_hit, ANCHOR_RADIUS, HIT_THRESHOLD};
pub use snap::snap_to_ohlc;
pub use store::AnnotationStore;
pub use types::{
    fibonacci_levels, risk_reward_ratio, Annotation, AnnotationId, AnnotationKind, Arity, Style,
    DEFAULT_COLOR, FIB_LEVELS, LONG_COLOR, SHORT_COLOR,
};
