#![warn(missing_docs)]

//! Data model and parser for vector slicer path output.
//!
//! The upstream vector slicer emits each sliced pattern as a text file of
//! pixel-space path coordinates, grouped into layers. This crate reads that
//! format into [`Pattern`] / [`Layer`] / [`PrintPath`] values which the
//! `vslice-gcode` crate translates into printer instructions.
//!
//! # Example
//!
//! ```ignore
//! use vslice_pattern::Pattern;
//!
//! let pattern = Pattern::load("azimuthal_10_mm.csv")?;
//! println!("Layers: {}", pattern.layer_count());
//! println!("Pixel path width: {}", pattern.pixel_path_width);
//! ```

pub mod error;
pub mod layer;
pub mod path;
pub mod pattern;
pub mod read;

pub use error::{PatternError, Result};
pub use layer::Layer;
pub use path::{Bounds, PrintPath};
pub use pattern::Pattern;
pub use read::parse_pattern;

/// A point in 2D pixel or physical space.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = nalgebra::Vector2<f64>;
