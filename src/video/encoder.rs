//! FFmpeg-based video encoding for raw video frames
//!
//! Frames are piped as raw RGB24 to FFmpeg's stdin.

use crate::processing::frame::Frame;
use crate::processing::pipeline::FrameSink;
use anyhow::{Context, Result};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::{self, JoinHandle};

#[cfg(unix)]
use std::os::unix::process::CommandExt;

/// FFmpeg video encoder that accepts raw RGB24 frames via stdin
pub struct VideoEncoder {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    stderr: JoinHandle<String>,
    output: PathBuf,
    width: u32,
    height: u32,
    frame_count: u64,
}

/// Output codec for a destination path: MJPEG for `.avi`, H.264 otherwise
pub fn codec_for_output(output: &Path) -> &'static [&'static str] {
    let is_avi = output
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("avi"));

    if is_avi {
        &["-c:v", "mjpeg", "-q:v", "3"]
    } else {
        &["-c:v", "libx264", "-preset", "fast", "-crf", "18", "-pix_fmt", "yuv420p"]
    }
}

impl VideoEncoder {
    /// Spawn a new FFmpeg encoder process
    ///
    /// # Arguments
    /// * `width` - Frame width in pixels
    /// * `height` - Frame height in pixels
    /// * `fps` - Frames per second of the source
    /// * `output` - Output file path (.avi or .mp4)
    pub fn new(width: u32, height: u32, fps: f64, output: &Path) -> Result<Self> {
        let mut cmd = Command::new("ffmpeg");
        cmd.args([
            // Only errors on stderr
            "-hide_banner",
            "-loglevel",
            "error",
            // Input format: raw video
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-s",
            &format!("{}x{}", width, height),
            "-framerate",
            &format!("{}", fps),
            // Read from stdin
            "-i",
            "pipe:0",
        ])
        .args(codec_for_output(output))
        // Overwrite output
        .arg("-y")
        .arg(output)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

        // Keep FFmpeg out of our process group so Ctrl+C reaches only us;
        // the encoder is finished by closing stdin.
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = cmd.spawn().context("Failed to start FFmpeg encoder")?;

        let stdin = child.stdin.take().context("Failed to get FFmpeg stdin")?;
        let stderr = child.stderr.take().context("Failed to get FFmpeg stderr")?;

        tracing::debug!(width, height, fps, output = %output.display(), "encoder started");

        Ok(Self {
            child,
            stdin: BufWriter::new(stdin),
            stderr: drain_in_background(stderr),
            output: output.to_path_buf(),
            width,
            height,
            frame_count: 0,
        })
    }

    /// Write a raw RGB24 frame to the encoder
    ///
    /// The frame data must be exactly `width * height * 3` bytes.
    pub fn write_raw(&mut self, frame_data: &[u8]) -> Result<()> {
        let expected_size = (self.width * self.height * 3) as usize;
        if frame_data.len() != expected_size {
            anyhow::bail!(
                "Frame size mismatch: expected {} bytes, got {}",
                expected_size,
                frame_data.len()
            );
        }

        self.stdin
            .write_all(frame_data)
            .context("Failed to write frame to FFmpeg")?;

        self.frame_count += 1;
        Ok(())
    }

    /// Get the number of frames written
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Finish encoding and wait for FFmpeg to complete
    pub fn finish(mut self) -> Result<PathBuf> {
        // Flush and close stdin to signal end of input
        self.stdin
            .flush()
            .context("Failed to flush frames to FFmpeg")?;
        drop(self.stdin);

        let status = self
            .child
            .wait()
            .context("Failed to wait for FFmpeg to finish")?;

        let error_output = self.stderr.join().unwrap_or_default();

        if !status.success() {
            if !error_output.trim().is_empty() {
                anyhow::bail!("FFmpeg encoding failed:\n{}", last_lines(&error_output, 5));
            }
            anyhow::bail!("FFmpeg encoding failed with status: {}", status);
        }

        tracing::debug!(frames = self.frame_count, "encoder finished");
        Ok(self.output)
    }
}

impl FrameSink for VideoEncoder {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        if frame.dimensions() != (self.width, self.height) {
            anyhow::bail!(
                "Frame is {}x{} but the encoder expects {}x{}",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            );
        }
        self.write_raw(frame.as_raw())
    }
}

/// Read `reader` to the end on a helper thread so the child never blocks on a full pipe
fn drain_in_background<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut bytes = Vec::new();
        let _ = reader.read_to_end(&mut bytes);
        String::from_utf8_lossy(&bytes).into_owned()
    })
}

/// The final `count` lines of `text`
fn last_lines(text: &str, count: usize) -> String {
    let lines: Vec<&str> = text.lines().rev().take(count).collect();
    lines.into_iter().rev().collect::<Vec<_>>().join("\n")
}

/// Check if FFmpeg is available
pub fn check_ffmpeg() -> Result<()> {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .context("FFmpeg not found. Please install it (e.g. apt install ffmpeg)")?;
    Ok(())
}
