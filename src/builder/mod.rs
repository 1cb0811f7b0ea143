//! CMake build driver.
//!
//! Resolves the generator and toolchain for a parameter set, predicts where
//! the library will land, and runs the configure and build steps.

pub mod cmake;
pub mod events;
pub mod layout;
pub mod recipe;
pub mod toolchain;

pub use cmake::{BuildPlan, CMakeBuilder};
pub use events::{EventSink, NullSink, PipelineEvent};
pub use layout::{locate, BuildInfo};
pub use toolchain::{ResolvedToolchain, ToolchainResolver};
