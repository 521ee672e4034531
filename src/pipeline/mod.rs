//! Pipeline composition: stage traits, observers, and the runner.
//!
//! Stages implement [`traits::MapStage`] or [`traits::Combiner`]; the
//! [`runner::NGramPipeline`] wires the concrete stages together and executes
//! them over partitioned input with a combiner-tree reduction.

pub mod observer;
pub mod runner;
pub mod traits;

pub use runner::{reduce_parallel, reduce_sequential, NGramPipeline, PipelineConfig};
