//! FFmpeg command builder and blocking runner.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{PipelineError, PipelineResult};

/// Builder for a single ffmpeg invocation.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input file path
    input: PathBuf,
    /// Output file path or pattern
    output: PathBuf,
    /// Arguments placed after -i
    output_args: Vec<String>,
}

impl FfmpegCommand {
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            output_args: Vec::new(),
        }
    }

    /// Add an output argument (after -i).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Add multiple output arguments.
    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set video filter.
    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-vf").output_arg(filter)
    }

    /// Set video codec.
    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:v").output_arg(codec)
    }

    /// Set CRF (quality).
    pub fn crf(self, crf: u8) -> Self {
        self.output_arg("-crf").output_arg(crf.to_string())
    }

    /// Set x264 preset.
    pub fn preset(self, preset: impl Into<String>) -> Self {
        self.output_arg("-preset").output_arg(preset)
    }

    /// Set output pixel format.
    pub fn pix_fmt(self, pix_fmt: impl Into<String>) -> Self {
        self.output_arg("-pix_fmt").output_arg(pix_fmt)
    }

    /// Drop audio streams.
    pub fn no_audio(self) -> Self {
        self.output_arg("-an")
    }

    /// Build the full argument list (without the program name).
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
        ];
        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().into_owned());
        args.extend(self.output_args.iter().cloned());
        args.push(self.output.to_string_lossy().into_owned());
        args
    }

    /// Run to completion, blocking until ffmpeg exits.
    pub fn run(&self, ffmpeg: &Path) -> PipelineResult<()> {
        let args = self.build_args();
        tracing::debug!("Running: {} {}", ffmpeg.display(), args.join(" "));

        let status = Command::new(ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => PipelineError::ToolNotFound {
                    tool: ffmpeg.display().to_string(),
                },
                _ => PipelineError::io(ffmpeg, e),
            })?;

        if !status.success() {
            return Err(PipelineError::ToolFailed {
                tool: "ffmpeg".to_string(),
                input: self.input.clone(),
                exit_code: status.code(),
            });
        }
        Ok(())
    }
}

/// Resolve the configured ffmpeg binary.
///
/// A bare name is searched on PATH; anything containing a path separator is
/// used as given but must exist.
pub fn resolve_ffmpeg(bin: &str) -> PipelineResult<PathBuf> {
    let path = Path::new(bin);
    if path.components().count() > 1 {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(PipelineError::ToolNotFound {
                tool: bin.to_string(),
            })
        };
    }
    which::which(bin).map_err(|_| PipelineError::ToolNotFound {
        tool: bin.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder() {
        let cmd = FfmpegCommand::new("in.mp4", "out.mp4")
            .video_filter("scale=1280:720:flags=lanczos,fps=16")
            .pix_fmt("yuv420p")
            .video_codec("libx264")
            .preset("slow")
            .crf(15)
            .no_audio();

        let args = cmd.build_args();
        assert_eq!(&args[..4], &["-y", "-hide_banner", "-loglevel", "error"]);
        let i = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[i + 1], "in.mp4");
        assert!(args.contains(&"-crf".to_string()));
        assert!(args.contains(&"15".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("out.mp4"));
    }

    #[test]
    fn test_resolve_missing_explicit_path() {
        let err = resolve_ffmpeg("/nonexistent/bin/ffmpeg").unwrap_err();
        assert!(matches!(err, PipelineError::ToolNotFound { .. }));
    }

    #[test]
    fn test_resolve_missing_bare_name() {
        let err = resolve_ffmpeg("framecap-no-such-tool").unwrap_err();
        assert!(matches!(err, PipelineError::ToolNotFound { .. }));
    }

    #[test]
    fn test_run_reports_missing_tool() {
        let cmd = FfmpegCommand::new("in.mp4", "out.mp4");
        let err = cmd.run(Path::new("/nonexistent/ffmpeg")).unwrap_err();
        assert!(matches!(err, PipelineError::ToolNotFound { .. }));
    }
}
