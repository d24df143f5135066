//! Sizing, painting and hit testing of Treedo project trees.

mod debug;
mod error;
pub mod layout;
mod metrics;
mod paint;
mod palette;
mod text;

pub use debug::{format_tree, log_recorded_frame};
pub use error::LayoutError;
pub use layout::{LayoutEngine, NodeState, PointerContext};
pub use metrics::LayoutMetrics;
pub use palette::Palette;
pub use text::wrap_text;
