//! Colormap implementations for choropleth fills.

pub mod colormap;
pub mod step;

pub use colormap::Colormap;
pub use step::StepColormap;
