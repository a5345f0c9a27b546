//! External video tooling.
//!
//! framecap never decodes video itself; every transform is an ffmpeg
//! invocation built here and run to completion.

pub mod command;
pub mod video;

pub use command::{resolve_ffmpeg, FfmpegCommand};
pub use video::{extract_frames, normalize_video, split_video};
