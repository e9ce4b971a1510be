//! Animator configuration.
//!
//! Loaded from a YAML file (see `config/maps.yaml`) with `${VAR}` and
//! `${VAR:-default}` substitution, then patched by command-line overrides.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use map_common::{MapError, MapResult};
use renderer::RenderOptions;
use serde::{Deserialize, Serialize};

use crate::output::ImageFormat;

// ============================================================================
// Configuration types
// ============================================================================

/// Top-level animator configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub frames: FrameRange,
    pub assets: AssetConfig,
    /// Map appearance, shared by every frame
    pub render: RenderOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// NetCDF file to read
    pub path: PathBuf,
    /// Data variable to plot, e.g. `air`
    pub variable: String,
    /// Required when the variable has more than one vertical level
    pub level_index: Option<usize>,
    /// Repeat the first longitude column at +360 degrees (regular grids)
    pub cyclic: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            variable: String::new(),
            level_index: None,
            cyclic: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// File name stem; frames are written as `<base>.<offset+index>.<ext>`
    pub base: String,
    pub format: ImageFormat,
    /// Resolution of the saved image; also sets the canvas size
    pub dpi: u32,
    pub index_offset: usize,
    /// PNG only: background pixels become fully transparent
    pub transparent: bool,
    pub jpeg_quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            base: "map".to_string(),
            format: ImageFormat::Png,
            dpi: 200,
            index_offset: 100,
            transparent: false,
            jpeg_quality: 90,
        }
    }
}

/// Time steps to render: `start..end` every `stride` steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameRange {
    pub start: usize,
    /// Exclusive; `None` renders through the last time step
    pub end: Option<usize>,
    pub stride: usize,
}

impl Default for FrameRange {
    fn default() -> Self {
        Self {
            start: 0,
            end: None,
            stride: 1,
        }
    }
}

impl FrameRange {
    /// Time indices to render for a variable with `time_steps` steps.
    ///
    /// An explicit `end` is taken as given, so indices past the data show
    /// up as failed frames instead of being dropped silently.
    pub fn indices(&self, time_steps: usize) -> Vec<usize> {
        let range: Range<usize> = self.start..self.end.unwrap_or(time_steps);
        range.step_by(self.stride.max(1)).collect()
    }
}

/// Optional data files used by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// GeoJSON coastlines / land polygons
    pub coastline_file: Option<PathBuf>,
    /// TrueType font for titles and labels
    pub font_file: Option<PathBuf>,
}

/// Values given on the command line, applied on top of the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input: Option<PathBuf>,
    pub variable: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub start: Option<usize>,
    pub end: Option<usize>,
    pub stride: Option<usize>,
}

impl AnimatorConfig {
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(path) = overrides.input {
            self.input.path = path;
        }
        if let Some(variable) = overrides.variable {
            self.input.variable = variable;
        }
        if let Some(dir) = overrides.output_dir {
            self.output.dir = dir;
        }
        if let Some(start) = overrides.start {
            self.frames.start = start;
        }
        if overrides.end.is_some() {
            self.frames.end = overrides.end;
        }
        if let Some(stride) = overrides.stride {
            self.frames.stride = stride;
        }
    }

    pub fn validate(&self) -> MapResult<()> {
        if self.input.path.as_os_str().is_empty() {
            return Err(MapError::Config("input.path is not set".to_string()));
        }
        if self.input.variable.trim().is_empty() {
            return Err(MapError::Config("input.variable is not set".to_string()));
        }
        if self.output.base.is_empty() || self.output.base.contains(['/', '\\']) {
            return Err(MapError::Config(format!(
                "output.base must be a plain file name, got '{}'",
                self.output.base
            )));
        }
        if self.output.dpi == 0 {
            return Err(MapError::Config("output.dpi must be positive".to_string()));
        }
        if !(1..=100).contains(&self.output.jpeg_quality) {
            return Err(MapError::Config(format!(
                "output.jpeg_quality must be in 1..=100, got {}",
                self.output.jpeg_quality
            )));
        }
        if self.frames.stride == 0 {
            return Err(MapError::Config("frames.stride must be at least 1".to_string()));
        }
        if let Some(end) = self.frames.end {
            if end < self.frames.start {
                return Err(MapError::Config(format!(
                    "frames.end ({}) is before frames.start ({})",
                    end, self.frames.start
                )));
            }
        }
        Ok(())
    }

    /// Render options with the output resolution applied and the label
    /// filled in from `default_label` when the file leaves it empty.
    pub fn render_options(
        &self,
        default_label: impl FnOnce() -> MapResult<String>,
    ) -> MapResult<RenderOptions> {
        let mut options = self.render.clone();
        options.dpi = self.output.dpi;
        if options.label.is_empty() {
            options.label = default_label()?;
        }
        Ok(options)
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Read, expand and parse a YAML config file.
pub fn load_config(path: impl AsRef<Path>) -> MapResult<AnimatorConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    parse_config(&content)
        .map_err(|e| MapError::Config(format!("{}: {}", path.display(), e)))
}

/// Parse YAML content after environment variable expansion.
pub fn parse_config(content: &str) -> MapResult<AnimatorConfig> {
    let expanded = expand_env_vars(content)?;
    serde_yaml::from_str(&expanded).map_err(|e| MapError::Config(e.to_string()))
}

/// Expand `${VAR}` and `${VAR:-default}` references.
fn expand_env_vars(content: &str) -> MapResult<String> {
    let mut result = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or_else(|| {
            MapError::Config(format!("unclosed variable substitution: ${{{}", after))
        })?;
        result.push_str(&resolve_var_expr(&after[..end])?);
        rest = &after[end + 1..];
    }
    result.push_str(rest);
    Ok(result)
}

fn resolve_var_expr(expr: &str) -> MapResult<String> {
    match expr.split_once(":-") {
        Some((name, default)) => match std::env::var(name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        },
        None => std::env::var(expr.trim())
            .map_err(|_| MapError::Config(format!("environment variable {} not set", expr))),
    }
}

// ============================================================================
// Tests
// ============================================================================
