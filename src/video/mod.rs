pub mod decoder;
pub mod encoder;

pub use decoder::FfmpegSource;
pub use encoder::{check_ffmpeg, VideoEncoder};
