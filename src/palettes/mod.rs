//! Named color palettes.
//!
//! This module provides the palette catalog and the color type it resolves to.

pub mod catalog;
pub mod color;

pub use catalog::{palette_key, ColorList, ColorSchemeCatalog};
pub use color::Color;
