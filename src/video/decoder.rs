//! Video decoding through FFmpeg: frames arrive as raw RGB24 on its stdout.

use crate::processing::frame::Frame;
use crate::processing::pipeline::FrameSource;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

#[cfg(unix)]
use std::os::unix::process::CommandExt;

/// Frame rate used when ffprobe reports nothing usable
pub const FALLBACK_FPS: f64 = 30.0;

/// Stream metadata of the first video stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

/// Parse ffprobe's `r_frame_rate` ("30000/1001" or "25")
pub fn parse_frame_rate(value: &str) -> Option<f64> {
    let value = value.trim();
    let fps = if let Some((num, den)) = value.split_once('/') {
        let num: f64 = num.trim().parse().ok()?;
        let den: f64 = den.trim().parse().ok()?;
        if den == 0.0 {
            return None;
        }
        num / den
    } else {
        value.parse().ok()?
    };

    (fps.is_finite() && fps > 0.0).then_some(fps)
}

/// Parse ffprobe csv output `width,height,r_frame_rate`
fn parse_probe_output(output: &str) -> Result<VideoInfo> {
    let line = output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .context("ffprobe reported no video stream")?;

    let mut fields = line.split(',');
    let width: u32 = fields
        .next()
        .and_then(|w| w.trim().parse().ok())
        .with_context(|| format!("Invalid width in ffprobe output {:?}", line))?;
    let height: u32 = fields
        .next()
        .and_then(|h| h.trim().parse().ok())
        .with_context(|| format!("Invalid height in ffprobe output {:?}", line))?;
    let fps = fields
        .next()
        .and_then(parse_frame_rate)
        .unwrap_or(FALLBACK_FPS);

    if width == 0 || height == 0 {
        anyhow::bail!("Video stream has no size ({}x{})", width, height);
    }

    Ok(VideoInfo { width, height, fps })
}

/// Get frame size and rate using ffprobe
pub fn probe_video(input: &Path) -> Result<VideoInfo> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,r_frame_rate",
            "-of",
            "csv=p=0",
        ])
        .arg(input)
        .output()
        .context("Failed to run ffprobe")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("ffprobe failed for {}: {}", input.display(), stderr.trim());
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout))
}

/// FFmpeg arguments decoding `input` to raw RGB24 on stdout.
///
/// Rotation metadata is ignored so decoded frames keep the probed
/// width and height.
fn decoder_args(input: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-v", "error", "-nostdin", "-noautorotate", "-i"]
        .iter()
        .map(OsString::from)
        .collect();
    args.push(input.as_os_str().to_os_string());
    args.extend(
        ["-f", "rawvideo", "-pix_fmt", "rgb24", "-"]
            .iter()
            .map(OsString::from),
    );
    args
}

/// Decoded frames from a video file, read sequentially
pub struct FfmpegSource {
    child: Child,
    reader: BufReader<ChildStdout>,
    info: VideoInfo,
    frame_buffer: Vec<u8>,
}

impl FfmpegSource {
    /// Probe `input` and start decoding it
    pub fn open(input: &Path) -> Result<Self> {
        let info = probe_video(input)?;

        let mut cmd = Command::new("ffmpeg");
        cmd.args(decoder_args(input))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        // Ctrl+C is handled by the pipeline; the decoder is stopped on drop
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = cmd.spawn().context("Failed to start FFmpeg decoder")?;
        let stdout = child
            .stdout
            .take()
            .context("Failed to get FFmpeg stdout")?;

        tracing::debug!(
            input = %input.display(),
            width = info.width,
            height = info.height,
            fps = info.fps,
            "decoder started"
        );

        let frame_size = (info.width * info.height * 3) as usize;
        Ok(Self {
            child,
            reader: BufReader::new(stdout),
            info,
            frame_buffer: vec![0u8; frame_size],
        })
    }

    pub fn info(&self) -> VideoInfo {
        self.info
    }
}

impl FrameSource for FfmpegSource {
    fn read_frame(&mut self) -> Result<Option<Frame>> {
        if !read_full_frame(&mut self.reader, &mut self.frame_buffer)? {
            return Ok(None);
        }

        let frame = Frame::from_raw(self.info.width, self.info.height, self.frame_buffer.clone())
            .context("Decoded frame has unexpected size")?;
        Ok(Some(frame))
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        // Stop decoding early if the pipeline quit before the end
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Fill `buffer` with exactly one frame.
///
/// Returns false on a clean end of stream (no bytes at a frame boundary);
/// a stream ending mid-frame is an error.
fn read_full_frame<R: Read>(reader: &mut R, buffer: &mut [u8]) -> Result<bool> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("Failed to read frame from FFmpeg"),
        }
    }

    if filled == 0 {
        return Ok(false);
    }
    if filled < buffer.len() {
        anyhow::bail!(
            "Truncated frame: got {} of {} bytes",
            filled,
            buffer.len()
        );
    }
    Ok(true)
}
