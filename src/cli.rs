use crate::editor::ImageEffect;
use crate::processing::effects::{RegionEffect, DEFAULT_BLOCK_SIZE, DEFAULT_BLUR_SIGMA};
use crate::processing::frame::BoundingBox;
use crate::processing::tracker::TemplateTrackerConfig;
use crate::track::TrackOptions;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "trackfx")]
#[command(about = "CLI object tracker that blurs, pixelates or tints tracked regions in a video")]
#[command(version)]
pub struct Cli {
    /// Log filter (e.g. "info" or "trackfx=debug"); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Track objects in a video and apply an effect to them
    Track(TrackArgs),

    /// Apply a filter to whole still images
    Image {
        /// Input image files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file, or a directory when several inputs are given
        #[arg(short, long)]
        output: PathBuf,

        /// Filter to apply
        #[arg(short, long, value_enum)]
        effect: ImageEffect,
    },
}

#[derive(Args)]
pub struct TrackArgs {
    /// Input video file
    pub input: PathBuf,

    /// Output video file (.avi is written as MJPEG, anything else as H.264)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Region to track on the first frame as x,y,w,h (repeatable).
    /// Without any, regions are asked for on stdin.
    #[arg(long = "roi", value_name = "X,Y,W,H", allow_hyphen_values = true)]
    pub regions: Vec<BoundingBox>,

    /// Effect applied to tracked regions
    #[arg(short, long, value_enum, default_value_t = EffectArg::Blur)]
    pub effect: EffectArg,

    /// Block size for the pixelate effect
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    pub block_size: u32,

    /// Draw the number of tracked objects
    #[arg(long)]
    pub count_objects: bool,

    /// Draw motion trails behind tracked objects
    #[arg(long)]
    pub visualize_paths: bool,

    /// How far (in pixels) a tracker searches around its last position
    #[arg(long, default_value_t = TemplateTrackerConfig::default().search_margin)]
    pub search_margin: u32,

    /// Keep a PNG snapshot of the latest output frame at this path
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// Write a JSON run report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Do not read commands from stdin
    #[arg(long)]
    pub no_interactive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EffectArg {
    Blur,
    Pixelate,
    Sepia,
}

impl EffectArg {
    pub fn to_effect(self, block_size: u32) -> RegionEffect {
        match self {
            EffectArg::Blur => RegionEffect::Blur {
                sigma: DEFAULT_BLUR_SIGMA,
            },
            EffectArg::Pixelate => RegionEffect::Pixelate { block_size },
            EffectArg::Sepia => RegionEffect::Sepia,
        }
    }
}

impl From<TrackArgs> for TrackOptions {
    fn from(args: TrackArgs) -> Self {
        Self {
            input: args.input,
            output: args.output,
            regions: args.regions,
            effect: args.effect.to_effect(args.block_size),
            count_objects: args.count_objects,
            visualize_paths: args.visualize_paths,
            search_margin: args.search_margin,
            preview: args.preview,
            report: args.report,
            interactive: !args.no_interactive,
        }
    }
}
