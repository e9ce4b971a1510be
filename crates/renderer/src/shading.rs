//! Field shading: flat cells (mesh) or interpolated bands (filled contour).
//!
//! Both styles collect geometry into one path per color band and fill each
//! band once, clipped to the map outline.

use map_common::{Coordinates, ScalarField};
use projection::normalize_longitude;
use tiny_skia::{FillRule, Mask, PathBuilder, Pixmap, Transform};

use crate::colormap::{Band, LevelColors};
use crate::options::ShadingStyle;
use crate::raster::{clip_to_band, push_polygon, solid_paint, unwrap_relative, ValuedPoint};
use crate::viewport::Viewport;

/// Number of cells or triangles that ended up shaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShadeStats {
    pub shaded: usize,
    pub skipped_nan: usize,
}

pub fn shade_field(
    pixmap: &mut Pixmap,
    style: ShadingStyle,
    field: &ScalarField,
    coords: &Coordinates,
    viewport: &Viewport,
    levels: &LevelColors,
    mask: Option<&Mask>,
) -> ShadeStats {
    let mut bands: Vec<PathBuilder> = (0..levels.band_count()).map(|_| PathBuilder::new()).collect();

    let stats = match style {
        ShadingStyle::Mesh => collect_mesh(&mut bands, field, coords, viewport, levels),
        ShadingStyle::FilledContour => {
            collect_filled_contour(&mut bands, field, coords, viewport, levels)
        }
    };

    for (index, pb) in bands.into_iter().enumerate() {
        let color = levels.band_color(levels.band_at(index));
        let paint = solid_paint(color, false);
        if let Some(path) = pb.finish() {
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), mask);
        }
    }

    tracing::debug!(
        style = ?style,
        shaded = stats.shaded,
        skipped_nan = stats.skipped_nan,
        "Shaded field"
    );
    stats
}

fn collect_mesh(
    bands: &mut [PathBuilder],
    field: &ScalarField,
    coords: &Coordinates,
    viewport: &Viewport,
    levels: &LevelColors,
) -> ShadeStats {
    let (rows, cols) = field.shape();
    let corners = CellCorners::new(coords);
    let mut stats = ShadeStats::default();

    for j in 0..rows {
        for i in 0..cols {
            let value = field.get(j, i).map(f64::from).unwrap_or(f64::NAN);
            let Some(band) = levels.classify(value) else {
                stats.skipped_nan += 1;
                continue;
            };
            let quad = [
                corners.get(j, i),
                corners.get(j, i + 1),
                corners.get(j + 1, i + 1),
                corners.get(j + 1, i),
            ];
            let ring = unwrap_relative(viewport, &quad);
            push_polygon(&mut bands[levels.band_index(band)], viewport, &ring);
            stats.shaded += 1;
        }
    }
    stats
}

fn collect_filled_contour(
    bands: &mut [PathBuilder],
    field: &ScalarField,
    coords: &Coordinates,
    viewport: &Viewport,
    levels: &LevelColors,
) -> ShadeStats {
    let (rows, cols) = field.shape();
    let mut stats = ShadeStats::default();
    if rows < 2 || cols < 2 {
        return stats;
    }

    let node = |j: usize, i: usize| {
        let (lon, lat) = coords.node(j, i);
        let v = field.get(j, i).map(f64::from).unwrap_or(f64::NAN);
        (lon, lat, v)
    };

    for j in 0..rows - 1 {
        for i in 0..cols - 1 {
            let a = node(j, i);
            let b = node(j, i + 1);
            let c = node(j + 1, i + 1);
            let d = node(j + 1, i);
            for tri in [[a, b, c], [a, c, d]] {
                if tri.iter().any(|p| p.2.is_nan()) {
                    stats.skipped_nan += 1;
                    continue;
                }
                push_triangle_bands(bands, viewport, levels, &tri);
                stats.shaded += 1;
            }
        }
    }
    stats
}

fn push_triangle_bands(
    bands: &mut [PathBuilder],
    viewport: &Viewport,
    levels: &LevelColors,
    tri: &[(f64, f64, f64); 3],
) {
    let geo: Vec<(f64, f64)> = tri.iter().map(|&(lon, lat, _)| (lon, lat)).collect();
    let rel = unwrap_relative(viewport, &geo);
    let polygon: Vec<ValuedPoint> = rel
        .iter()
        .zip(tri.iter())
        .map(|(&(x, y), &(_, _, v))| ValuedPoint::new(x, y, v))
        .collect();

    let (vmin, vmax) = polygon
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.v), hi.max(p.v)));
    let (Some(low_band), Some(high_band)) = (levels.classify(vmin), levels.classify(vmax)) else {
        return;
    };

    if low_band == high_band {
        push_polygon(&mut bands[levels.band_index(low_band)], viewport, &rel);
        return;
    }

    for index in levels.band_index(low_band)..=levels.band_index(high_band) {
        let band: Band = levels.band_at(index);
        let (lo, hi) = levels.band_interval(band);
        let piece = clip_to_band(&polygon, lo, hi);
        if piece.len() < 3 {
            continue;
        }
        let ring: Vec<(f64, f64)> = piece.iter().map(|p| (p.x, p.y)).collect();
        push_polygon(&mut bands[index], viewport, &ring);
    }
}

/// Cell corner positions, halfway between neighbouring grid nodes.
///
/// Corner (a, b) sits between nodes (a-1, b-1) and (a, b); nodes beyond
/// the grid edge are extrapolated linearly from the last two.
struct CellCorners {
    corners: Vec<(f64, f64)>,
    cols: usize,
}

impl CellCorners {
    fn new(coords: &Coordinates) -> Self {
        let (rows, cols) = coords.shape();
        let mut corners = Vec::with_capacity((rows + 1) * (cols + 1));

        for a in 0..=rows as isize {
            for b in 0..=cols as isize {
                let around = [
                    extended_node(coords, a - 1, b - 1),
                    extended_node(coords, a - 1, b),
                    extended_node(coords, a, b - 1),
                    extended_node(coords, a, b),
                ];
                let ref_lon = around[3].0;
                let (sum_lon, sum_lat) = around.iter().fold((0.0, 0.0), |(sl, sa), &(lon, lat)| {
                    (sl + ref_lon + normalize_longitude(lon - ref_lon), sa + lat)
                });
                corners.push((sum_lon / 4.0, (sum_lat / 4.0).clamp(-90.0, 90.0)));
            }
        }

        Self {
            corners,
            cols: cols + 1,
        }
    }

    fn get(&self, a: usize, b: usize) -> (f64, f64) {
        self.corners[a * self.cols + b]
    }
}

/// Node (j, i), extrapolated one step past each edge of the grid.
fn extended_node(coords: &Coordinates, j: isize, i: isize) -> (f64, f64) {
    let (rows, cols) = coords.shape();

    let along_i = |j: usize| -> (f64, f64) {
        if i < 0 {
            step_outside(coords.node(j, 0), (cols > 1).then(|| coords.node(j, 1)), -1.0, 0.0)
        } else if i as usize >= cols {
            step_outside(
                coords.node(j, cols - 1),
                (cols > 1).then(|| coords.node(j, cols - 2)),
                1.0,
                0.0,
            )
        } else {
            coords.node(j, i as usize)
        }
    };

    if j < 0 {
        let inner = (rows > 1).then(|| along_i(1));
        step_outside(along_i(0), inner, 0.0, -1.0)
    } else if j as usize >= rows {
        let inner = (rows > 1).then(|| along_i(rows - 2));
        step_outside(along_i(rows - 1), inner, 0.0, 1.0)
    } else {
        along_i(j as usize)
    }
}

/// Mirror `inner` through `edge`; without a neighbour step half a degree
/// in the given direction.
fn step_outside(edge: (f64, f64), inner: Option<(f64, f64)>, dlon: f64, dlat: f64) -> (f64, f64) {
    match inner {
        Some((lon, lat)) => {
            let lon = edge.0 + normalize_longitude(lon - edge.0);
            (2.0 * edge.0 - lon, 2.0 * edge.1 - lat)
        }
        None => (edge.0 + 0.5 * dlon, edge.1 + 0.5 * dlat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_corners_are_midpoints() {
        let coords = Coordinates::regular(vec![0.0, 10.0, 20.0], vec![-10.0, 0.0, 10.0]);
        let corners = CellCorners::new(&coords);
        assert_eq!(corners.get(0, 0), (-5.0, -15.0));
        assert_eq!(corners.get(1, 1), (5.0, -5.0));
        assert_eq!(corners.get(3, 3), (25.0, 15.0));
    }

    #[test]
    fn test_corner_latitudes_clamped_at_poles() {
        let coords = Coordinates::regular(vec![0.0, 90.0], vec![-90.0, 0.0, 90.0]);
        let corners = CellCorners::new(&coords);
        assert_eq!(corners.get(0, 0).1, -90.0);
        assert_eq!(corners.get(3, 0).1, 90.0);
    }

    #[test]
    fn test_corners_across_dateline() {
        let coords = Coordinates::regular(vec![170.0, 180.0, -170.0], vec![0.0, 10.0]);
        let corners = CellCorners::new(&coords);
        let (lon, _) = corners.get(1, 2);
        assert!((normalize_longitude(lon) - normalize_longitude(185.0)).abs() < 1e-9);
    }
}
