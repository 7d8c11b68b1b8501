//! Drawing geometry for the panel.
//!
//! Everything here is pure: the same samples and dimensions always produce
//! the same output, and nothing depends on the UI toolkit. `fan-widgets`
//! turns the result into canvas strokes.

pub mod sparkline;

pub use sparkline::{render, Point, SparklineDims, SparklinePath};
