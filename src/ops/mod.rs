//! High-level operations.
//!
//! This module contains the implementation of marl-export commands.

pub mod clean;
pub mod marl_build;
pub mod plan;

pub use clean::clean;
pub use marl_build::{build, BuildOptions, BuildResult};
pub use plan::{plan, PlanReport};
