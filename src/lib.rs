//! marl-export - builds the marl fiber library for one platform and
//! architecture and publishes it under the names downstream consumers expect.
//!
//! The pipeline runs in three stages: resolve the CMake generator and
//! toolchain, configure and build, then copy the library, headers and sources
//! into `build/export`.

pub mod builder;
pub mod core;
pub mod export;
pub mod ops;
pub mod util;

/// Test utilities for marl-export unit tests.
///
/// Provides a scripted CMake stand-in and a minimal repository fixture.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{Architecture, Configuration, ParameterSet, PipelineError, Platform};
pub use builder::BuildInfo;
pub use util::context::GlobalContext;
