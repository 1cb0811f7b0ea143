//! Core data model: build parameters and the error taxonomy.

pub mod error;
pub mod params;

pub use error::{PipelineError, PipelineResult};
pub use params::{Architecture, Configuration, ParameterSet, Platform};
