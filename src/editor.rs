//! Whole-image filters for still pictures.

use anyhow::{Context, Result};
use clap::ValueEnum;
use image::{imageops, DynamicImage, Rgb, RgbImage};
use imageproc::filter::Kernel;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};

const BOX_BLUR_SIZE: u32 = 5;
const BOX_KERNEL: [f32; 25] = [1.0 / 25.0; 25];
/// Sigma of a 15x15 Gaussian kernel when derived from its size
const GAUSSIAN_SIGMA: f32 = 2.6;
const SHARPEN_KERNEL: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];
const CANNY_LOW: f32 = 100.0;
const CANNY_HIGH: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageEffect {
    BoxBlur,
    GaussianBlur,
    Sharpen,
    EdgeDetection,
}

impl fmt::Display for ImageEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BoxBlur => "box blur",
            Self::GaussianBlur => "gaussian blur",
            Self::Sharpen => "sharpen",
            Self::EdgeDetection => "edge detection",
        };
        f.write_str(name)
    }
}

impl ImageEffect {
    /// Filter the whole image. Edge detection yields a grayscale image.
    pub fn apply(&self, image: &DynamicImage) -> DynamicImage {
        match self {
            Self::BoxBlur => DynamicImage::ImageRgb8(box_blur(&image.to_rgb8())),
            Self::GaussianBlur => {
                DynamicImage::ImageRgb8(imageops::blur(&image.to_rgb8(), GAUSSIAN_SIGMA))
            }
            Self::Sharpen => {
                DynamicImage::ImageRgb8(imageops::filter3x3(&image.to_rgb8(), &SHARPEN_KERNEL))
            }
            Self::EdgeDetection => DynamicImage::ImageLuma8(imageproc::edges::canny(
                &image.to_luma8(),
                CANNY_LOW,
                CANNY_HIGH,
            )),
        }
    }
}

/// 5x5 mean filter; pixels past the border repeat the edge
fn box_blur(image: &RgbImage) -> RgbImage {
    Kernel::new(&BOX_KERNEL, BOX_BLUR_SIZE, BOX_BLUR_SIZE).filter::<Rgb<u8>, _, Rgb<u8>>(
        image,
        |channel, sum: f32| *channel = sum.round().clamp(0.0, 255.0) as u8,
    )
}

/// Destination inside a batch output directory
fn batch_output_path(input: &Path, output: &Path) -> Result<PathBuf> {
    let name = input
        .file_name()
        .with_context(|| format!("Input has no file name: {}", input.display()))?;
    Ok(output.join(name))
}

fn process_one(input: &Path, destination: &Path, effect: ImageEffect) -> Result<PathBuf> {
    let image = image::open(input)
        .with_context(|| format!("Failed to load image: {}", input.display()))?;

    let processed = effect.apply(&image);
    processed
        .save(destination)
        .with_context(|| format!("Failed to save image: {}", destination.display()))?;

    tracing::debug!(input = %input.display(), output = %destination.display(), %effect, "image processed");
    Ok(destination.to_path_buf())
}

/// Filter every input.
///
/// With one input `output` is the destination file; with several it is a
/// directory and each result keeps its input's file name.
pub fn process_images(inputs: &[PathBuf], effect: ImageEffect, output: &Path) -> Result<Vec<PathBuf>> {
    match inputs {
        [] => anyhow::bail!("No input images given"),
        [input] => {
            let saved = process_one(input, output, effect)?;
            Ok(vec![saved])
        }
        _ => {
            std::fs::create_dir_all(output)
                .with_context(|| format!("Failed to create output directory: {}", output.display()))?;

            let pb = ProgressBar::new(inputs.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
                    .progress_chars("#>-"),
            );

            let results: Result<Vec<PathBuf>> = inputs
                .par_iter()
                .map(|input| {
                    let destination = batch_output_path(input, output)?;
                    let saved = process_one(input, &destination, effect);
                    pb.inc(1);
                    saved
                })
                .collect();

            pb.finish_and_clear();
            results
        }
    }
}
