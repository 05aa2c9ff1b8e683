pub mod builder;
pub mod config;
pub mod resolution;

pub use builder::PipelineBuilder;
pub use config::PipelineConfig;
pub use resolution::{InboundQuery, PipelineOutcome, ResolutionPipeline};
