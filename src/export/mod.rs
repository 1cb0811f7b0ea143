//! Artifact export.
//!
//! Two independent naming schemes copy the same built library: the
//! canonical platform/arch/config layout, and the aliased names the engine
//! integration layer expects.

pub mod alias;
pub mod canonical;
pub mod manifest;

pub use manifest::{EntryKind, ExportEntry, ExportManifest};
