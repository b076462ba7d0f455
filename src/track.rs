//! The `track` command: decode a video, run the tracking pipeline, encode the result.

use crate::control::{ControlConfig, TerminalController};
use crate::error::PipelineError;
use crate::processing::effects::RegionEffect;
use crate::processing::frame::BoundingBox;
use crate::processing::paths::PathHistory;
use crate::processing::pipeline::{FrameSink, RunSummary};
use crate::processing::tracker::{TemplateTrackerConfig, TemplateTrackerFactory};
use crate::processing::{Pipeline, PipelineConfig};
use crate::video::{check_ffmpeg, FfmpegSource, VideoEncoder};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Everything needed for one tracking run
pub struct TrackOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub regions: Vec<BoundingBox>,
    pub effect: RegionEffect,
    pub count_objects: bool,
    pub visualize_paths: bool,
    pub search_margin: u32,
    pub preview: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub interactive: bool,
}

#[derive(Debug, Serialize)]
pub struct ObjectPath {
    pub id: u32,
    pub points: Vec<(i32, i32)>,
}

/// JSON summary of a finished run
#[derive(Debug, Serialize)]
pub struct TrackReport {
    pub output: PathBuf,
    pub effect: String,
    pub frames_read: u64,
    pub frames_written: u64,
    pub objects_tracked: usize,
    pub quit_early: bool,
    pub paths: Vec<ObjectPath>,
}

impl TrackReport {
    pub fn new(output: &Path, effect: &RegionEffect, summary: &RunSummary) -> Self {
        Self {
            output: output.to_path_buf(),
            effect: effect.name().to_string(),
            frames_read: summary.frames_read,
            frames_written: summary.frames_written,
            objects_tracked: summary.objects_tracked,
            quit_early: summary.quit_requested,
            paths: object_paths(&summary.paths),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        Ok(())
    }
}

fn object_paths(paths: &PathHistory) -> Vec<ObjectPath> {
    paths
        .iter()
        .map(|(id, points)| ObjectPath {
            id,
            points: points.iter().copied().collect(),
        })
        .collect()
}

pub fn run(options: TrackOptions) -> Result<()> {
    check_ffmpeg()?;

    let mut source = FfmpegSource::open(&options.input).map_err(|e| {
        PipelineError::source_unavailable(format!("{}: {:#}", options.input.display(), e))
    })?;
    let info = source.info();

    println!("Tracking objects in: {}", options.input.display());
    println!("  Size: {}x{}", info.width, info.height);
    println!("  FPS: {:.2}", info.fps);
    println!("  Effect: {}", options.effect);

    let mut encoder = VideoEncoder::new(info.width, info.height, info.fps, &options.output)?;

    let mut controller = TerminalController::new(ControlConfig {
        interactive: options.interactive,
        preview: options.preview.clone(),
        ..ControlConfig::default()
    })?;
    controller.print_help();

    let factory = TemplateTrackerFactory {
        config: TemplateTrackerConfig {
            search_margin: options.search_margin,
            ..TemplateTrackerConfig::default()
        },
    };
    let pipeline = Pipeline::new(
        PipelineConfig {
            effect: options.effect,
            count_objects: options.count_objects,
            visualize_paths: options.visualize_paths,
            ..PipelineConfig::default()
        },
        factory,
    );

    let result = pipeline.run(
        &mut source,
        Some(&mut encoder as &mut dyn FrameSink),
        &mut controller,
        options.regions,
    );
    controller.finish();
    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            if e.is_setup_failure() {
                // Nothing was written; don't leave an empty video behind
                let _ = encoder.finish();
                let _ = std::fs::remove_file(&options.output);
            }
            return Err(e.into());
        }
    };

    let encoded = encoder.frame_count();
    let output = encoder.finish()?;
    tracing::debug!(frames = encoded, "video encoded");

    if summary.quit_requested {
        println!("\nStopped after {} frames.", summary.frames_written);
    }
    println!(
        "\nTracked {} object(s) over {} frames.",
        summary.objects_tracked, summary.frames_written
    );

    if let Some(report_path) = &options.report {
        TrackReport::new(&output, &options.effect, &summary).save(report_path)?;
        println!("  Report: {}", report_path.display());
    }

    println!("\nDone! Output saved to: {}", output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> RunSummary {
        let mut paths = PathHistory::new();
        paths.push(0, (5, 6));
        paths.push(0, (7, 8));
        paths.push(2, (1, 1));
        RunSummary {
            frames_read: 4,
            frames_written: 4,
            objects_tracked: 3,
            quit_requested: false,
            paths,
        }
    }

    #[test]
    fn test_report_collects_paths() {
        let report = TrackReport::new(
            Path::new("out.mp4"),
            &RegionEffect::Pixelate { block_size: 8 },
            &summary(),
        );
        assert_eq!(report.effect, "pixelate");
        assert_eq!(report.paths.len(), 2);
        assert_eq!(report.paths[0].id, 0);
        assert_eq!(report.paths[0].points, vec![(5, 6), (7, 8)]);
        assert_eq!(report.paths[1].id, 2);
    }

    #[test]
    fn test_report_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        TrackReport::new(Path::new("out.avi"), &RegionEffect::Sepia, &summary())
            .save(&path)
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["output"], "out.avi");
        assert_eq!(value["effect"], "sepia");
        assert_eq!(value["frames_written"], 4);
        assert_eq!(value["paths"][0]["points"][1][0], 7);
    }
}
