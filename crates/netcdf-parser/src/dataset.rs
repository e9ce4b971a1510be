//! Reading gridded climate variables from a NetCDF file.

use std::path::{Path, PathBuf};

use map_common::{CfTimeAxis, Coordinates, ScalarField};
use netcdf::Extent;
use tracing::{debug, info, warn};

use crate::axes::{dim_roles, plan_slice, DimInfo, DimRole, Selection, LAT_NAMES, LON_NAMES};
use crate::error::{NetCdfError, NetCdfResult};
use crate::native::{get_f64_attr, get_f64_list_attr, get_string_attr, silence_hdf5_errors};
use crate::packing::Packing;

const LAT_UNITS: [&str; 4] = ["degrees_north", "degree_north", "degrees_n", "degree_n"];
const LON_UNITS: [&str; 4] = ["degrees_east", "degree_east", "degrees_e", "degree_e"];

/// Metadata of one data variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableInfo {
    pub name: String,
    pub dims: Vec<DimInfo>,
    pub units: Option<String>,
    pub long_name: Option<String>,
    /// CF `coordinates` attribute, e.g. `"nav_lon nav_lat"`
    pub coordinates: Option<String>,
    pub packing: Packing,
}

impl VariableInfo {
    /// Number of time steps, 1 for variables without a time dimension.
    pub fn time_steps(&self) -> usize {
        let roles = dim_roles(&self.dims).unwrap_or_default();
        self.dims
            .iter()
            .zip(roles)
            .find(|(_, role)| *role == DimRole::Time)
            .map(|(d, _)| d.len)
            .unwrap_or(1)
    }

    /// Horizontal shape as (rows, cols).
    pub fn grid_shape(&self) -> Option<(usize, usize)> {
        let n = self.dims.len();
        (n >= 2).then(|| (self.dims[n - 2].len, self.dims[n - 1].len))
    }

    fn time_dim(&self) -> Option<&DimInfo> {
        let roles = dim_roles(&self.dims).ok()?;
        self.dims
            .iter()
            .zip(roles)
            .find(|(_, role)| *role == DimRole::Time)
            .map(|(d, _)| d)
    }

    /// The `units` attribute; its absence is an error.
    pub fn require_units(&self) -> NetCdfResult<&str> {
        self.units.as_deref().ok_or_else(|| {
            NetCdfError::MissingData(format!("variable '{}' has no units attribute", self.name))
        })
    }

    /// Colorbar label `"<long_name> (<units>)"`, the variable name standing
    /// in for a missing long name.
    pub fn default_label(&self) -> NetCdfResult<String> {
        let units = self.require_units()?;
        let name = self.long_name.as_deref().unwrap_or(&self.name);
        Ok(format!("{} ({})", name, units))
    }
}

/// An open NetCDF file.
pub struct Dataset {
    file: netcdf::File,
    path: PathBuf,
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset").field("path", &self.path).finish()
    }
}

impl Dataset {
    pub fn open(path: impl AsRef<Path>) -> NetCdfResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(NetCdfError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )));
        }

        // Silence HDF5's verbose stderr output for missing attributes
        silence_hdf5_errors();

        let file = netcdf::open(path)
            .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to open NetCDF: {}", e)))?;
        info!(
            path = %path.display(),
            variables = file.variables().count(),
            "Opened NetCDF dataset"
        );
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn variable_names(&self) -> Vec<String> {
        self.file.variables().map(|v| v.name()).collect()
    }

    fn nc_variable(&self, name: &str) -> NetCdfResult<netcdf::Variable<'_>> {
        self.file.variable(name).ok_or_else(|| {
            NetCdfError::MissingData(format!(
                "variable '{}' not found in {}",
                name,
                self.path.display()
            ))
        })
    }

    /// Dimensions, descriptive attributes and packing of `name`.
    pub fn variable_info(&self, name: &str) -> NetCdfResult<VariableInfo> {
        let var = self.nc_variable(name)?;
        let dims = dims_of(&var);

        let mut sentinels = Vec::new();
        sentinels.extend(get_f64_attr(&var, "_FillValue"));
        sentinels.extend(get_f64_list_attr(&var, "missing_value"));

        Ok(VariableInfo {
            name: name.to_string(),
            dims,
            units: get_string_attr(&var, "units"),
            long_name: get_string_attr(&var, "long_name"),
            coordinates: get_string_attr(&var, "coordinates"),
            packing: Packing {
                scale_factor: get_f64_attr(&var, "scale_factor").unwrap_or(1.0),
                add_offset: get_f64_attr(&var, "add_offset").unwrap_or(0.0),
                sentinels,
            },
        })
    }

    /// Longitude/latitude of the variable's horizontal grid.
    ///
    /// Looks at the `coordinates` attribute first, then at the usual names,
    /// then at any variable with `degrees_north`/`degrees_east` units.
    pub fn coordinates(&self, info: &VariableInfo) -> NetCdfResult<Coordinates> {
        let (rows, cols) = info.grid_shape().ok_or_else(|| {
            NetCdfError::InvalidFormat(format!("variable '{}' is not gridded", info.name))
        })?;
        let horizontal = &info.dims[info.dims.len() - 2..];

        let (lat_name, lat_dims) =
            self.find_coordinate(info, &LAT_NAMES, &LAT_UNITS, horizontal, &horizontal[0])?;
        let (lon_name, lon_dims) =
            self.find_coordinate(info, &LON_NAMES, &LON_UNITS, horizontal, &horizontal[1])?;

        let lat = self.read_all(&lat_name)?;
        let lon = self.read_all(&lon_name)?;
        debug!(lat = %lat_name, lon = %lon_name, rows, cols, "Resolved coordinates");

        match (lat_dims.len(), lon_dims.len()) {
            (1, 1) => Ok(Coordinates::regular(lon, lat)),
            (2, 2) => Coordinates::curvilinear(lon, lat, rows, cols)
                .map_err(|e| NetCdfError::InvalidFormat(e.to_string())),
            (a, b) => Err(NetCdfError::InvalidFormat(format!(
                "latitude '{}' is {}-D but longitude '{}' is {}-D",
                lat_name, a, lon_name, b
            ))),
        }
    }

    fn find_coordinate(
        &self,
        info: &VariableInfo,
        names: &[&str],
        units: &[&str],
        horizontal: &[DimInfo],
        axis_dim: &DimInfo,
    ) -> NetCdfResult<(String, Vec<DimInfo>)> {
        let mut candidates: Vec<String> = Vec::new();
        if let Some(attr) = &info.coordinates {
            candidates.extend(attr.split_whitespace().map(str::to_string));
        }
        candidates.extend(names.iter().map(|n| n.to_string()));
        candidates.extend(self.file.variables().map(|v| v.name()));

        for name in candidates {
            let Some(var) = self.file.variable(&name) else {
                continue;
            };
            let named = names.iter().any(|n| n.eq_ignore_ascii_case(&name));
            let has_units = get_string_attr(&var, "units")
                .map(|u| units.contains(&u.to_lowercase().as_str()))
                .unwrap_or(false);
            if !named && !has_units {
                continue;
            }

            let dims = dims_of(&var);
            let fits = match dims.as_slice() {
                [d] => d == axis_dim,
                [_, _] => dims == horizontal,
                _ => false,
            };
            if fits {
                return Ok((name, dims));
            }
        }

        Err(NetCdfError::MissingData(format!(
            "no {} coordinate matching variable '{}' (tried {})",
            names[0],
            info.name,
            names.join(", ")
        )))
    }

    /// The decoded time axis, `None` when the variable is static or the
    /// time coordinate carries no usable units.
    pub fn time_axis(&self, info: &VariableInfo) -> NetCdfResult<Option<CfTimeAxis>> {
        let Some(dim) = info.time_dim() else {
            return Ok(None);
        };
        let Some(var) = self.file.variable(&dim.name) else {
            warn!(dimension = %dim.name, "Time dimension has no coordinate variable");
            return Ok(None);
        };
        let Some(units) = get_string_attr(&var, "units") else {
            warn!(variable = %dim.name, "Time coordinate has no units attribute");
            return Ok(None);
        };

        let offsets = self.read_all(&dim.name)?;
        let axis = CfTimeAxis::parse(&units, offsets)
            .map_err(|e| NetCdfError::InvalidFormat(format!("{}: {}", dim.name, e)))?;
        Ok(Some(axis))
    }

    /// Read the 2-D slice of `info` at `time_index`, unpacked to physical
    /// values with missing data as NaN.
    pub fn read_slice(
        &self,
        info: &VariableInfo,
        time_index: usize,
        level_index: Option<usize>,
    ) -> NetCdfResult<ScalarField> {
        let plan = plan_slice(&info.dims, time_index, level_index)?;
        let var = self.nc_variable(&info.name)?;

        let raw = read_selected(&var, &plan.selections)?;
        if raw.len() != plan.rows * plan.cols {
            return Err(NetCdfError::InvalidFormat(format!(
                "read {} values for a {}x{} slice of '{}'",
                raw.len(),
                plan.rows,
                plan.cols,
                info.name
            )));
        }

        let values = info.packing.apply(&raw);
        debug!(
            variable = %info.name,
            time_index,
            rows = plan.rows,
            cols = plan.cols,
            "Read slice"
        );
        ScalarField::new(values, plan.rows, plan.cols)
            .map_err(|e| NetCdfError::InvalidFormat(e.to_string()))
    }

    fn read_all(&self, name: &str) -> NetCdfResult<Vec<f64>> {
        let var = self.nc_variable(name)?;
        let values: Vec<f64> = var.get_values(..)?;
        Ok(values)
    }
}

fn dims_of(var: &netcdf::Variable) -> Vec<DimInfo> {
    var.dimensions()
        .iter()
        .map(|d| DimInfo::new(d.name(), d.len()))
        .collect()
}

fn extent(selection: Selection) -> Extent {
    match selection {
        Selection::Index(i) => i.into(),
        Selection::All => (..).into(),
    }
}

/// Hyperslab read for up to five dimensions.
fn read_selected(var: &netcdf::Variable, selections: &[Selection]) -> NetCdfResult<Vec<f64>> {
    let values = match *selections {
        [a, b] => var.get_values::<f64, _>((extent(a), extent(b)))?,
        [a, b, c] => var.get_values::<f64, _>((extent(a), extent(b), extent(c)))?,
        [a, b, c, d] => {
            var.get_values::<f64, _>((extent(a), extent(b), extent(c), extent(d)))?
        }
        [a, b, c, d, e] => var.get_values::<f64, _>((
            extent(a),
            extent(b),
            extent(c),
            extent(d),
            extent(e),
        ))?,
        _ => {
            return Err(NetCdfError::InvalidFormat(format!(
                "unsupported number of dimensions: {}",
                selections.len()
            )))
        }
    };
    Ok(values)
}
