//! Common types and utilities shared across the climate-maps crates.

pub mod bbox;
pub mod color;
pub mod error;
pub mod grid;
pub mod time;

pub use bbox::BoundingBox;
pub use color::Color;
pub use error::{MapError, MapResult};
pub use grid::{add_cyclic_point, Coordinates, FieldStats, ScalarField};
pub use time::{format_title, CfTimeAxis, TimeParseError, TimeUnit};
