//! Horizontal colorbar with under/over end caps.

use map_common::Color;
use tiny_skia::{FillRule, LineCap, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::colormap::LevelColors;
use crate::layout::FigureLayout;
use crate::levels::{format_tick, linspace};
use crate::raster::solid_paint;
use crate::text::{HAlign, Typeface, VAlign};

/// Tick values and their printed labels.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorbarTicks {
    pub values: Vec<f64>,
    pub labels: Vec<String>,
}

impl ColorbarTicks {
    /// `count` ticks spread evenly from the first to the last boundary.
    pub fn evenly_spaced(boundaries: &[f64], count: usize) -> Self {
        let (first, last) = match (boundaries.first(), boundaries.last()) {
            (Some(&f), Some(&l)) => (f, l),
            _ => return Self { values: Vec::new(), labels: Vec::new() },
        };
        let values = linspace(first, last, count);
        let labels = values.iter().map(|&v| format_tick(v)).collect();
        Self { values, labels }
    }
}

/// Fraction along the bar where `value` sits.
///
/// Bins have equal width on the bar, so the position is piecewise linear
/// in the boundaries.
pub fn bar_position(boundaries: &[f64], value: f64) -> f64 {
    let bins = boundaries.len().saturating_sub(1);
    if bins == 0 {
        return 0.0;
    }
    if value <= boundaries[0] {
        return 0.0;
    }
    if value >= boundaries[bins] {
        return 1.0;
    }
    let k = boundaries.partition_point(|&b| b <= value).saturating_sub(1).min(bins - 1);
    let within = (value - boundaries[k]) / (boundaries[k + 1] - boundaries[k]);
    (k as f64 + within) / bins as f64
}

pub fn draw_colorbar(
    pixmap: &mut Pixmap,
    layout: &FigureLayout,
    levels: &LevelColors,
    ticks: &ColorbarTicks,
    label: &str,
    typeface: &Typeface,
    line_width: f32,
) {
    let bar = layout.colorbar;
    let cap = layout.cap_length;
    let bins = levels.bin_count();
    let bin_width = bar.width / bins as f32;

    for (i, color) in levels.bin_colors().iter().enumerate() {
        let x0 = bar.x + i as f32 * bin_width;
        // Overlap neighbours by a pixel so rounding never leaves a gap
        let w = if i + 1 == bins { bin_width } else { bin_width + 1.0 };
        if let Some(rect) = Rect::from_xywh(x0, bar.y, w, bar.height) {
            pixmap.fill_rect(rect, &solid_paint(*color, false), Transform::identity(), None);
        }
    }

    let mid_y = bar.y + bar.height / 2.0;
    let under_cap = triangle((bar.x, bar.y), (bar.x, bar.bottom()), (bar.x - cap, mid_y));
    let over_cap = triangle(
        (bar.right(), bar.y),
        (bar.right(), bar.bottom()),
        (bar.right() + cap, mid_y),
    );
    for (path, color) in [(under_cap, levels.under()), (over_cap, levels.over())] {
        if let Some(path) = path {
            pixmap.fill_path(&path, &solid_paint(color, true), FillRule::Winding, Transform::identity(), None);
        }
    }

    // Outline around body and caps
    let mut pb = PathBuilder::new();
    pb.move_to(bar.x, bar.y);
    pb.line_to(bar.right(), bar.y);
    pb.line_to(bar.right() + cap, mid_y);
    pb.line_to(bar.right(), bar.bottom());
    pb.line_to(bar.x, bar.bottom());
    pb.line_to(bar.x - cap, mid_y);
    pb.close();
    let edge = Stroke {
        width: line_width,
        ..Stroke::default()
    };
    let black = solid_paint(Color::BLACK, true);
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &black, &edge, Transform::identity(), None);
    }

    let tick_len = layout.font_px * 0.35;
    let mut tick_pb = PathBuilder::new();
    for (value, text) in ticks.values.iter().zip(&ticks.labels) {
        let x = bar.x + (bar_position(levels.boundaries(), *value) as f32) * bar.width;
        tick_pb.move_to(x, bar.bottom());
        tick_pb.line_to(x, bar.bottom() + tick_len);
        typeface.draw(
            pixmap,
            text,
            x,
            bar.bottom() + tick_len + layout.font_px * 0.2,
            layout.font_px,
            Color::BLACK,
            HAlign::Center,
            VAlign::Top,
        );
    }
    if let Some(path) = tick_pb.finish() {
        let tick_stroke = Stroke {
            width: line_width,
            line_cap: LineCap::Butt,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &black, &tick_stroke, Transform::identity(), None);
    }

    typeface.draw(
        pixmap,
        label,
        bar.center_x(),
        bar.bottom() + tick_len + layout.font_px * 1.6,
        layout.font_px,
        Color::BLACK,
        HAlign::Center,
        VAlign::Top,
    );
}

fn triangle(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(a.0, a.1);
    pb.line_to(b.0, b.1);
    pb.line_to(c.0, c.1);
    pb.close();
    pb.finish()
}
