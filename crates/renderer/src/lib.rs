//! Climate map rendering.
//!
//! Turns a gridded scalar field into a finished map image:
//! - Shading as flat cells (mesh) or interpolated bands (filled contour)
//! - Robinson (global) or equirectangular (regional) projection
//! - Graticule, coastlines and land fill
//! - Horizontal colorbar with under/over caps
//!
//! [`MapRenderer`] holds everything reusable across frames; each call to
//! [`MapRenderer::render`] produces an independent [`RenderedMap`].

pub mod coastline;
pub mod colorbar;
pub mod colormap;
pub mod figure;
pub mod graticule;
pub mod layout;
pub mod levels;
pub mod options;
pub mod png;
pub mod raster;
pub mod shading;
pub mod text;
pub mod viewport;

pub use coastline::Coastlines;
pub use colormap::{Band, Colormap, ColormapSpec, LevelColors};
pub use figure::{live_figures, RenderedMap};
pub use options::{GraticuleSpacing, ProjectionMode, RenderOptions, ShadingStyle, ValueRange};
pub use text::Typeface;

use map_common::{BoundingBox, Color, Coordinates, MapError, MapResult, ScalarField};
use projection::MapProjection;
use tiny_skia::{FillRule, Mask, PathBuilder, Pixmap, Stroke, Transform};

use crate::colorbar::{draw_colorbar, ColorbarTicks};
use crate::graticule::{draw_graticule, GraticuleLines, LabelStyle};
use crate::layout::FigureLayout;
use crate::levels::MaxNLocator;
use crate::raster::solid_paint;
use crate::viewport::{ProjectedBounds, Viewport};

/// Points per outline edge when tracing the globe boundary.
const OUTLINE_SAMPLES: usize = 181;

/// Renders fields with a fixed set of options.
#[derive(Debug, Clone)]
pub struct MapRenderer {
    options: RenderOptions,
    colormap: Colormap,
    coastlines: Option<Coastlines>,
    typeface: Typeface,
}

impl MapRenderer {
    /// Validate `options` and resolve the colormap.
    pub fn new(options: RenderOptions) -> MapResult<Self> {
        options.validate()?;
        let colormap = Colormap::from_spec(&options.colormap)?;
        Ok(Self {
            options,
            colormap,
            coastlines: None,
            typeface: Typeface::bundled()?,
        })
    }

    pub fn with_coastlines(mut self, coastlines: Coastlines) -> Self {
        self.coastlines = Some(coastlines);
        self
    }

    pub fn with_typeface(mut self, typeface: Typeface) -> Self {
        self.typeface = typeface;
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Level boundaries this renderer would use for `field`.
    pub fn boundaries_for(&self, field: &ScalarField) -> MapResult<Vec<f64>> {
        let (min, max) = match self.options.value_range {
            ValueRange::Explicit { min, max } => (min, max),
            ValueRange::Auto => {
                let (lo, hi) = field.finite_range().ok_or_else(|| {
                    MapError::InvalidInput("field has no finite values".to_string())
                })?;
                (lo as f64, hi as f64)
            }
        };
        Ok(MaxNLocator::new(self.options.level_count).tick_values(min, max))
    }

    /// Render one map.
    pub fn render(&self, field: &ScalarField, coords: &Coordinates) -> MapResult<RenderedMap> {
        coords.check_congruent(field)?;
        if field.finite_range().is_none() {
            return Err(MapError::InvalidInput(
                "field has no finite values".to_string(),
            ));
        }

        let opts = &self.options;
        let boundaries = self.boundaries_for(field)?;
        let levels = LevelColors::new(&self.colormap, boundaries, opts.under_color, opts.over_color)?;

        let (projection, bounds, extent) = self.frame();
        let regional = !opts.is_global();
        let layout = FigureLayout::compute(opts, Viewport::aspect(bounds), regional);

        let mut pixmap = Pixmap::new(layout.width, layout.height).ok_or_else(|| {
            MapError::Render(format!(
                "cannot allocate a {}x{} canvas",
                layout.width, layout.height
            ))
        })?;
        let bg = opts.background;
        pixmap.fill(tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));

        let viewport = Viewport::new(projection, bounds, layout.map);
        let outline = self.map_outline(&viewport);
        let mask = outline.as_ref().and_then(|path| {
            let mut mask = Mask::new(layout.width, layout.height)?;
            mask.fill_path(path, FillRule::Winding, true, Transform::identity());
            Some(mask)
        });

        let line_px = opts.dpi as f32 / 72.0;

        let stats = shading::shade_field(
            &mut pixmap,
            opts.shading,
            field,
            coords,
            &viewport,
            &levels,
            mask.as_ref(),
        );

        if opts.land_fill || opts.coastlines {
            match &self.coastlines {
                Some(coast) => {
                    if opts.land_fill {
                        coast.draw_land(&mut pixmap, &viewport, coastline::LAND_COLOR, mask.as_ref());
                    }
                    if opts.coastlines {
                        coast.draw_outlines(
                            &mut pixmap,
                            &viewport,
                            coastline::LAND_COLOR,
                            line_px,
                            mask.as_ref(),
                        );
                    }
                }
                None => tracing::warn!("Coastlines requested but no coastline data loaded, skipping"),
            }
        }

        if opts.graticule {
            let lines = GraticuleLines::within(&extent, opts.effective_graticule_spacing());
            let labels = regional.then(|| LabelStyle {
                typeface: &self.typeface,
                size_px: layout.grid_label_px,
            });
            draw_graticule(&mut pixmap, &viewport, &extent, &lines, line_px, mask.as_ref(), labels);
        }

        if let Some(path) = &outline {
            let edge = if regional { Color::WHITE } else { graticule::GRID_COLOR };
            let stroke = Stroke {
                width: line_px,
                ..Stroke::default()
            };
            pixmap.stroke_path(path, &solid_paint(edge, true), &stroke, Transform::identity(), None);
        }

        let ticks = ColorbarTicks::evenly_spaced(levels.boundaries(), opts.bar_tick_count);
        draw_colorbar(&mut pixmap, &layout, &levels, &ticks, &opts.label, &self.typeface, line_px);

        tracing::debug!(
            width = layout.width,
            height = layout.height,
            projection = projection.name(),
            bins = levels.bin_count(),
            shaded = stats.shaded,
            "Rendered map"
        );

        Ok(RenderedMap::new(
            pixmap,
            viewport,
            extent,
            levels.boundaries().to_vec(),
            ticks,
            layout.colorbar,
            bg,
            self.typeface.clone(),
            layout.title_px,
        ))
    }

    /// Projection, projected bounds and geographic extent for the current mode.
    fn frame(&self) -> (MapProjection, ProjectedBounds, BoundingBox) {
        match self.options.projection {
            ProjectionMode::Global => {
                let center = self.options.central_longitude;
                let projection = MapProjection::robinson(center);
                let extent = BoundingBox::new(center - 180.0, -90.0, center + 180.0, 90.0);
                (projection, projection.globe_bounds(), extent)
            }
            ProjectionMode::Regional { bbox } => {
                let center = (bbox.min_x + bbox.max_x) / 2.0;
                let projection = MapProjection::plate_carree(center);
                let half = bbox.width() / 2.0;
                let bounds = (-half, bbox.min_y, half, bbox.max_y);
                (projection, bounds, bbox)
            }
        }
    }

    /// Closed outline of the visible map: the globe or the bbox rectangle.
    fn map_outline(&self, viewport: &Viewport) -> Option<tiny_skia::Path> {
        let mut pb = PathBuilder::new();
        if self.options.is_global() {
            let outline = viewport.projection().globe_outline(OUTLINE_SAMPLES);
            for (i, &(x, y)) in outline.iter().enumerate() {
                let (px, py) = viewport.projected_to_pixel(x, y);
                if i == 0 {
                    pb.move_to(px, py);
                } else {
                    pb.line_to(px, py);
                }
            }
            pb.close();
        } else {
            pb.push_rect(viewport.rect().to_skia()?);
        }
        pb.finish()
    }
}

/// Render a single map without keeping a renderer around.
pub fn render_map(
    field: &ScalarField,
    coords: &Coordinates,
    options: &RenderOptions,
) -> MapResult<RenderedMap> {
    MapRenderer::new(options.clone())?.render(field, coords)
}
