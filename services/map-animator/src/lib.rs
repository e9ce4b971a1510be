//! Climate map animator.
//!
//! Renders one map per time step of a NetCDF variable and writes the frames
//! as numbered image files, ready to be assembled into an animation.

pub mod animate;
pub mod config;
pub mod output;

pub use animate::{Animator, DataSummary, FrameFailure, RunReport};
pub use config::{load_config, parse_config, AnimatorConfig, ConfigOverrides, FrameRange};
pub use output::{frame_file_name, save_frame, ImageFormat, SaveSettings};
