//! NetCDF access for gridded climate data.
//!
//! Opens CF-style NetCDF files (reanalysis output, ocean-model grids) and
//! hands out one 2-D [`ScalarField`](map_common::ScalarField) per time step,
//! together with the matching [`Coordinates`](map_common::Coordinates) and
//! decoded time axis.
//!
//! Handles:
//! - 1-D (`lat`, `lon`) and 2-D (`nav_lat`, `nav_lon`) coordinates
//! - `scale_factor` / `add_offset` packing and `_FillValue` / `missing_value`
//! - Singleton vertical dimensions, squeezed away
//!
//! ```ignore
//! let dataset = Dataset::open("air.sig995.2019.nc")?;
//! let info = dataset.variable_info("air")?;
//! let coords = dataset.coordinates(&info)?;
//! let field = dataset.read_slice(&info, 0, None)?;
//! ```

pub mod axes;
mod dataset;
pub mod error;
pub mod native;
pub mod packing;

pub use axes::{DimInfo, DimRole, Selection, SlicePlan};
pub use dataset::{Dataset, VariableInfo};
pub use error::{NetCdfError, NetCdfResult};
pub use native::silence_hdf5_errors;
pub use packing::Packing;
