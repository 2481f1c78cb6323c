//! Terminal output: bar geometry, colors and the progress line

pub mod progress;
pub mod theme;

pub use progress::ProgressRenderer;
pub use theme::{BarGeometry, DisplayColors, Palette, Theme};
