pub mod effects;
pub mod frame;
pub mod overlay;
pub mod paths;
pub mod pipeline;
pub mod tracker;

// Re-export the main entry point
pub use pipeline::{Pipeline, PipelineConfig};
