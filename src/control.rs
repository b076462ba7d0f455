//! Terminal control surface for the tracking pipeline.
//!
//! Commands are typed on stdin, one per line (`p` pause/resume, `a` add
//! objects while paused, `q` quit). Ctrl+C also quits. Regions are entered as
//! `x,y,w,h` lines, finished with an empty line or `done`.

use crate::processing::frame::{BoundingBox, Frame};
use crate::processing::pipeline::{ControlCommand, Controller};
use anyhow::{Context, Result};
use image::ImageFormat;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// How long a command poll may block
const POLL_TIMEOUT: Duration = Duration::from_millis(1);

/// Configuration for the terminal controller
pub struct ControlConfig {
    /// Read commands and region selections from stdin
    pub interactive: bool,
    /// Where to keep a snapshot of the latest composited frame
    pub preview: Option<PathBuf>,
    /// Minimum time between preview snapshots
    pub preview_interval: Duration,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            interactive: true,
            preview: None,
            preview_interval: Duration::from_millis(500),
        }
    }
}

/// Parse one command line
pub fn parse_command(line: &str) -> Option<ControlCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "q" | "quit" => Some(ControlCommand::Quit),
        "p" | "pause" | "resume" => Some(ControlCommand::TogglePause),
        "a" | "add" => Some(ControlCommand::AddObjects),
        _ => None,
    }
}

/// One line of region-selection input
#[derive(Debug, PartialEq, Eq)]
pub enum SelectionInput {
    Done,
    Region(BoundingBox),
}

pub fn parse_selection_line(line: &str) -> Result<SelectionInput> {
    let line = line.trim();
    if line.is_empty() || line.eq_ignore_ascii_case("done") {
        return Ok(SelectionInput::Done);
    }

    let bbox: BoundingBox = line.parse()?;
    if bbox.is_empty() {
        anyhow::bail!("Region {} has no area", bbox);
    }
    Ok(SelectionInput::Region(bbox))
}

pub struct TerminalController {
    lines: Option<Receiver<String>>,
    quit: Arc<AtomicBool>,
    preview: Option<PathBuf>,
    preview_interval: Duration,
    last_preview: Option<Instant>,
    progress: ProgressBar,
}

impl TerminalController {
    pub fn new(config: ControlConfig) -> Result<Self> {
        // Set up Ctrl+C handler
        let quit = Arc::new(AtomicBool::new(false));
        let q = quit.clone();
        ctrlc::set_handler(move || {
            q.store(true, Ordering::SeqCst);
        })
        .context("Failed to set Ctrl+C handler")?;

        let lines = config.interactive.then(spawn_stdin_reader);

        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} Processing... {pos} frames written ({elapsed_precise})")?,
        );

        Ok(Self {
            lines,
            quit,
            preview: config.preview,
            preview_interval: config.preview_interval,
            last_preview: None,
            progress,
        })
    }

    /// Print the key help for interactive runs
    pub fn print_help(&self) {
        if self.lines.is_some() {
            self.progress.suspend(|| {
                println!("Commands: p + Enter = pause/resume, a + Enter = add objects (while paused), q + Enter = quit");
            });
        }
    }

    pub fn finish(&self) {
        self.progress.finish_and_clear();
    }

    fn quit_requested(&self) -> bool {
        self.quit.load(Ordering::SeqCst)
    }

    fn save_preview(&mut self, frame: &Frame) {
        let Some(path) = self.preview.as_deref() else {
            return;
        };
        if let Some(last) = self.last_preview {
            if last.elapsed() < self.preview_interval {
                return;
            }
        }
        self.last_preview = Some(Instant::now());

        if let Err(e) = write_snapshot(frame, path) {
            tracing::warn!(error = %format!("{:#}", e), "failed to update preview");
        }
    }
}

/// Replace `path` atomically with a PNG of `frame`
fn write_snapshot(frame: &Frame, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    frame
        .write_to(&mut tmp, ImageFormat::Png)
        .context("Failed to encode preview")?;
    tmp.persist(path)
        .with_context(|| format!("Failed to write preview to {}", path.display()))?;
    Ok(())
}

/// Forward stdin lines to a channel from a background thread
fn spawn_stdin_reader() -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

impl Controller for TerminalController {
    fn poll_command(&mut self) -> Option<ControlCommand> {
        if self.quit_requested() {
            return Some(ControlCommand::Quit);
        }

        let lines = self.lines.as_ref()?;
        match lines.recv_timeout(POLL_TIMEOUT) {
            Ok(line) => {
                let command = parse_command(&line);
                match command {
                    Some(ControlCommand::TogglePause) => self.progress.suspend(|| println!("Toggled pause")),
                    None if !line.trim().is_empty() => {
                        self.progress
                            .suspend(|| eprintln!("Unknown command {:?} (use p, a or q)", line.trim()));
                    }
                    _ => {}
                }
                command
            }
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                tracing::debug!("stdin closed, interactive commands disabled");
                self.lines = None;
                None
            }
        }
    }

    fn select_regions(&mut self, frame: &Frame) -> Vec<BoundingBox> {
        let Some(lines) = self.lines.as_ref() else {
            return Vec::new();
        };

        let (width, height) = frame.dimensions();
        let progress = self.progress.clone();
        progress.suspend(|| {
            println!(
                "Enter regions to track on the {}x{} frame as x,y,w,h (one per line, empty line when done):",
                width, height
            );
        });

        let mut regions = Vec::new();
        loop {
            if self.quit.load(Ordering::SeqCst) {
                break;
            }
            let line = match lines.recv_timeout(Duration::from_millis(100)) {
                Ok(line) => line,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            };

            match parse_selection_line(&line) {
                Ok(SelectionInput::Done) => break,
                Ok(SelectionInput::Region(bbox)) if bbox.clip(width, height).is_none() => {
                    progress.suspend(|| eprintln!("Region {} lies outside the frame", bbox));
                }
                Ok(SelectionInput::Region(bbox)) => {
                    progress.suspend(|| println!("  added {}", bbox));
                    regions.push(bbox);
                }
                Err(e) => progress.suspend(|| eprintln!("Ignoring {:?}: {:#}", line.trim(), e)),
            }
        }

        tracing::info!(count = regions.len(), "regions selected");
        regions
    }

    fn show_frame(&mut self, frame: &Frame) {
        self.progress.inc(1);
        self.save_preview(frame);
    }
}
