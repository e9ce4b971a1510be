//! Dimension roles and 2-D slice selection.
//!
//! Variables follow the CF ordering `(T, Z, Y, X)`: the last two dimensions
//! are the horizontal grid, a leading time dimension is picked by name, and
//! everything else is treated as a vertical (level) axis.

use crate::error::{NetCdfError, NetCdfResult};

/// Names recognised as the time dimension.
pub const TIME_NAMES: [&str; 4] = ["time", "t", "time_counter", "valid_time"];

/// Names recognised as latitude coordinates.
pub const LAT_NAMES: [&str; 4] = ["lat", "latitude", "nav_lat", "lat_rho"];

/// Names recognised as longitude coordinates.
pub const LON_NAMES: [&str; 4] = ["lon", "longitude", "nav_lon", "lon_rho"];

/// A named dimension and its length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimInfo {
    pub name: String,
    pub len: usize,
}

impl DimInfo {
    pub fn new(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            len,
        }
    }
}

/// What a dimension means for slicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimRole {
    Time,
    Level,
    Y,
    X,
}

pub fn is_time_name(name: &str) -> bool {
    TIME_NAMES.iter().any(|n| n.eq_ignore_ascii_case(name))
}

/// Role of every dimension of a variable.
pub fn dim_roles(dims: &[DimInfo]) -> NetCdfResult<Vec<DimRole>> {
    if dims.len() < 2 {
        return Err(NetCdfError::InvalidFormat(format!(
            "need at least two dimensions for a map, got {}",
            dims.len()
        )));
    }

    let horizontal = dims.len() - 2;
    let mut roles = Vec::with_capacity(dims.len());
    let mut seen_time = false;
    for dim in &dims[..horizontal] {
        if !seen_time && is_time_name(&dim.name) {
            seen_time = true;
            roles.push(DimRole::Time);
        } else {
            roles.push(DimRole::Level);
        }
    }
    roles.push(DimRole::Y);
    roles.push(DimRole::X);
    Ok(roles)
}

/// Per-dimension selection: one index or the whole axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Index(usize),
    All,
}

/// How to read one 2-D slice out of an N-D variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlicePlan {
    pub selections: Vec<Selection>,
    pub rows: usize,
    pub cols: usize,
}

/// Build the selection for `time_index` (and `level_index` when the
/// variable has a vertical axis with more than one level).
///
/// Singleton leading dimensions are squeezed to index 0.
pub fn plan_slice(
    dims: &[DimInfo],
    time_index: usize,
    level_index: Option<usize>,
) -> NetCdfResult<SlicePlan> {
    let roles = dim_roles(dims)?;

    let deep_levels: Vec<&DimInfo> = dims
        .iter()
        .zip(&roles)
        .filter(|(d, r)| **r == DimRole::Level && d.len > 1)
        .map(|(d, _)| d)
        .collect();
    if deep_levels.len() > 1 {
        let names: Vec<&str> = deep_levels.iter().map(|d| d.name.as_str()).collect();
        return Err(NetCdfError::InvalidSelection(format!(
            "more than one non-singleton vertical dimension: {}",
            names.join(", ")
        )));
    }

    let mut selections = Vec::with_capacity(dims.len());
    let mut has_time = false;
    for (dim, role) in dims.iter().zip(&roles) {
        let selection = match role {
            DimRole::Time => {
                has_time = true;
                if time_index >= dim.len {
                    return Err(NetCdfError::MissingData(format!(
                        "time index {} out of bounds ({} steps)",
                        time_index, dim.len
                    )));
                }
                Selection::Index(time_index)
            }
            DimRole::Level if dim.len <= 1 => Selection::Index(0),
            DimRole::Level => {
                let level = level_index.ok_or_else(|| {
                    NetCdfError::InvalidSelection(format!(
                        "dimension '{}' has {} levels, a level index is required",
                        dim.name, dim.len
                    ))
                })?;
                if level >= dim.len {
                    return Err(NetCdfError::InvalidSelection(format!(
                        "level index {} out of bounds for '{}' ({} levels)",
                        level, dim.name, dim.len
                    )));
                }
                Selection::Index(level)
            }
            DimRole::Y | DimRole::X => Selection::All,
        };
        selections.push(selection);
    }

    if !has_time && time_index > 0 {
        return Err(NetCdfError::MissingData(format!(
            "time index {} requested but the variable has no time dimension",
            time_index
        )));
    }

    let rows = dims[dims.len() - 2].len;
    let cols = dims[dims.len() - 1].len;
    if rows == 0 || cols == 0 {
        return Err(NetCdfError::InvalidFormat(format!(
            "empty horizontal grid {}x{}",
            rows, cols
        )));
    }

    Ok(SlicePlan {
        selections,
        rows,
        cols,
    })
}
