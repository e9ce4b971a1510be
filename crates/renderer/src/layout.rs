//! Figure layout: canvas size, map frame and colorbar placement.

use crate::options::RenderOptions;
use crate::viewport::PixelRect;

/// Fractions of the canvas available to the map frame.
const MAP_LEFT: f32 = 0.05;
const MAP_TOP: f32 = 0.08;
const MAP_WIDTH: f32 = 0.90;
const MAP_HEIGHT: f32 = 0.62;

/// Colorbar length relative to the map width.
const BAR_SHRINK: f32 = 0.75;
/// Colorbar length over thickness.
const BAR_ASPECT: f32 = 20.0;
/// Gap between map and colorbar, relative to the map height.
const BAR_PAD: f32 = 0.04;
/// Length of each end cap relative to the bar length.
const CAP_FRACTION: f32 = 0.05;

const TITLE_SIZE_PT: f32 = 16.0;
const GRID_LABEL_SIZE_PT: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureLayout {
    pub width: u32,
    pub height: u32,
    /// Map frame, aspect-correct for the projected bounds
    pub map: PixelRect,
    /// Colorbar body, without end caps
    pub colorbar: PixelRect,
    pub cap_length: f32,
    pub font_px: f32,
    pub title_px: f32,
    pub grid_label_px: f32,
}

impl FigureLayout {
    /// Lay out a figure whose map has the given width-over-height aspect.
    ///
    /// `labelled_edges` reserves room under the map for graticule labels.
    pub fn compute(options: &RenderOptions, aspect: f64, labelled_edges: bool) -> Self {
        let dpi = options.dpi as f32;
        let width = (options.figure_size.0 * dpi).round().max(1.0) as u32;
        let height = (options.figure_size.1 * dpi).round().max(1.0) as u32;
        let (w, h) = (width as f32, height as f32);

        let points_to_px = |pt: f32| pt * dpi / 72.0;
        let font_px = points_to_px(options.font_size);
        let grid_label_px = points_to_px(GRID_LABEL_SIZE_PT);
        let title_px = points_to_px(TITLE_SIZE_PT);

        let avail_w = w * MAP_WIDTH;
        let avail_h = h * MAP_HEIGHT;
        let aspect = aspect as f32;
        let (map_w, map_h) = if avail_w / avail_h > aspect {
            (avail_h * aspect, avail_h)
        } else {
            (avail_w, avail_w / aspect)
        };
        let map_x = w * MAP_LEFT + (avail_w - map_w) / 2.0;
        let map = PixelRect::new(map_x, h * MAP_TOP, map_w, map_h);

        let bar_len = map_w * BAR_SHRINK;
        let bar_thickness = bar_len / BAR_ASPECT;
        let mut pad = map_h * BAR_PAD;
        if labelled_edges {
            pad += grid_label_px * 1.5;
        }
        let colorbar = PixelRect::new(
            map.center_x() - bar_len / 2.0,
            map.bottom() + pad,
            bar_len,
            bar_thickness,
        );

        Self {
            width,
            height,
            map,
            colorbar,
            cap_length: bar_len * CAP_FRACTION,
            font_px,
            title_px,
            grid_label_px,
        }
    }
}
