//! # choropleth
//!
//! Binning, color classification and legend generation for choropleth maps.
//!
//! A numeric column joined to boundary shapes is split into bins, each bin is
//! given a color from a ColorBrewer palette, and the same bins drive both the
//! fill of every shape and the legend.
//!
//! ## Architecture
//!
//! - **Classification**: percentile or equal-width bin boundaries ([`classify`])
//! - **Palettes**: catalog of color schemes keyed by name and size ([`palettes`])
//! - **Coloring**: step colormap from boundaries and colors ([`colormaps`])
//! - **Legend**: boundary/color pairs, exported as SVG or PNG ([`legend`])
//! - **Output**: merged inputs rendered as a Leaflet page ([`pipeline`], [`render`])

pub mod classify;
pub mod colormaps;
pub mod config;
pub mod data_loader;
pub mod error;
pub mod legend;
pub mod logging;
pub mod palettes;
pub mod pipeline;
pub mod render;

pub use classify::{compute_boundaries, BinBoundaries, BinType, NumericSample};
pub use colormaps::{Colormap, StepColormap};
pub use config::Config;
pub use error::{ChoroplethError, ErrorCategory, Result};
pub use legend::{build_legend, LegendFormat, LegendOrientation, LegendSpec};
pub use logging::{
    generate_request_id, init_tracing, log_classification_stats, log_error, log_operation_end,
    log_operation_start, log_timed_operation,
};
pub use palettes::{Color, ColorList, ColorSchemeCatalog};
pub use pipeline::{generate_map, prepare_map, MapOutput, PreparedMap};
