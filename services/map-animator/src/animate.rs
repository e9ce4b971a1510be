//! The per-time-step render loop.
//!
//! One [`MapRenderer`] is built up front and reused for every frame. Each
//! iteration reads a slice, renders it, titles it, crops it and writes it;
//! the figure is gone before the next iteration starts.

use std::fs;
use std::path::PathBuf;

use map_common::{add_cyclic_point, format_title, CfTimeAxis, Coordinates, MapError, MapResult};
use netcdf_parser::{Dataset, VariableInfo};
use renderer::{Coastlines, MapRenderer, Typeface};
use tracing::{debug, error, info, warn};

use crate::config::AnimatorConfig;
use crate::output::{frame_path, save_frame, SaveSettings};

/// Min/mean/max of the variable across every time step.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSummary {
    pub time_steps: usize,
    pub rows: usize,
    pub cols: usize,
    pub units: Option<String>,
    pub min: f32,
    pub mean: f64,
    pub max: f32,
    pub missing: usize,
}

/// A time step that could not be rendered or saved.
#[derive(Debug)]
pub struct FrameFailure {
    pub index: usize,
    pub error: MapError,
}

/// Outcome of a full run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<FrameFailure>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// An opened dataset plus everything needed to render its frames.
pub struct Animator {
    config: AnimatorConfig,
    dataset: Dataset,
    info: VariableInfo,
    coords: Coordinates,
    time_axis: Option<CfTimeAxis>,
    renderer: MapRenderer,
}

impl Animator {
    /// Open the dataset, resolve coordinates and build the renderer.
    pub fn prepare(config: AnimatorConfig) -> MapResult<Self> {
        config.validate()?;

        let dataset = Dataset::open(&config.input.path)?;
        let info = dataset.variable_info(&config.input.variable)?;
        let coords = dataset.coordinates(&info)?;
        let time_axis = dataset.time_axis(&info)?;
        if time_axis.is_none() && info.time_steps() > 1 {
            warn!(variable = %info.name, "No decodable time axis, titles will use step numbers");
        }

        if config.input.cyclic && !coords.is_regular() {
            debug!("Cyclic padding applies to regular grids only, skipping");
        }

        let options = config.render_options(|| Ok(info.default_label()?))?;
        let mut renderer = MapRenderer::new(options)?;
        if let Some(path) = &config.assets.coastline_file {
            renderer = renderer.with_coastlines(Coastlines::from_geojson_file(path)?);
        }
        if let Some(path) = &config.assets.font_file {
            renderer = renderer.with_typeface(Typeface::from_file(path)?);
        }

        fs::create_dir_all(&config.output.dir)?;

        info!(
            input = %config.input.path.display(),
            variable = %info.name,
            time_steps = info.time_steps(),
            regular = coords.is_regular(),
            output_dir = %config.output.dir.display(),
            "Animator ready"
        );

        Ok(Self {
            config,
            dataset,
            info,
            coords,
            time_axis,
            renderer,
        })
    }

    pub fn variable(&self) -> &VariableInfo {
        &self.info
    }

    /// Read every time step and log the variable's overall statistics.
    pub fn summarize(&self) -> MapResult<DataSummary> {
        let time_steps = self.info.time_steps();
        let (rows, cols) = self.coords.shape();

        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0f64;
        let mut valid = 0usize;
        let mut missing = 0usize;
        for index in 0..time_steps {
            let field = self
                .dataset
                .read_slice(&self.info, index, self.config.input.level_index)?;
            let stats = field.stats();
            if stats.valid_count > 0 {
                min = min.min(stats.min);
                max = max.max(stats.max);
                sum += stats.mean * stats.valid_count as f64;
            }
            valid += stats.valid_count;
            missing += stats.missing_count;
        }

        let summary = DataSummary {
            time_steps,
            rows,
            cols,
            units: self.info.units.clone(),
            min: if valid > 0 { min } else { f32::NAN },
            mean: if valid > 0 { sum / valid as f64 } else { f64::NAN },
            max: if valid > 0 { max } else { f32::NAN },
            missing,
        };
        info!(
            variable = %self.info.name,
            shape = ?(summary.time_steps, summary.rows, summary.cols),
            units = summary.units.as_deref().unwrap_or("-"),
            min = summary.min,
            mean = summary.mean,
            max = summary.max,
            missing = summary.missing,
            "Data summary"
        );
        Ok(summary)
    }

    /// Time indices this run will render.
    pub fn frame_indices(&self) -> Vec<usize> {
        self.config.frames.indices(self.info.time_steps())
    }

    /// Render and save every configured frame.
    ///
    /// A failing frame is logged and recorded; the loop carries on with the
    /// next one.
    pub fn run(&self) -> RunReport {
        let indices = self.frame_indices();
        info!(frames = indices.len(), "Rendering frames");

        let mut report = RunReport::default();
        for index in indices {
            match self.render_frame(index) {
                Ok(path) => report.written.push(path),
                Err(e) => {
                    error!(index, kind = e.kind(), error = %e, "Frame failed");
                    report.failed.push(FrameFailure { index, error: e });
                }
            }
        }

        info!(
            written = report.written.len(),
            failed = report.failed.len(),
            "Animation finished"
        );
        report
    }

    /// Render, title, crop and save one time step.
    pub fn render_frame(&self, index: usize) -> MapResult<PathBuf> {
        let field = self
            .dataset
            .read_slice(&self.info, index, self.config.input.level_index)?;

        let mut map = if self.config.input.cyclic && self.coords.is_regular() {
            let (field, coords) = add_cyclic_point(&field, &self.coords)?;
            self.renderer.render(&field, &coords)?
        } else {
            self.renderer.render(&field, &self.coords)?
        };
        map.draw_title(&self.title(index));
        let map = map.cropped_to_content();

        let output = &self.config.output;
        let path = frame_path(
            &output.dir,
            &output.base,
            output.index_offset,
            index,
            output.format,
        );
        let settings = SaveSettings {
            format: output.format,
            dpi: output.dpi,
            transparent: output.transparent,
            jpeg_quality: output.jpeg_quality,
        };
        let size = save_frame(map, &path, &settings)?;
        info!(index, path = %path.display(), size, "Wrote frame");
        Ok(path)
    }

    /// `YYYY-MM-DD HH:MM` of the step, or `step N` without a time axis.
    pub fn title(&self, index: usize) -> String {
        match self.time_axis.as_ref().and_then(|axis| axis.datetime(index)) {
            Some(time) => format_title(&time),
            None => {
                debug!(index, "No timestamp for step");
                format!("step {}", index)
            }
        }
    }
}
