//! Pipeline event types.
//!
//! Events are reported to an observer as the pipeline progresses. The CLI
//! renders them as status lines, or as one JSON object per line with
//! `--message-format=json`.
//!
//! The JSON schema should remain backwards compatible: new fields may be
//! added, existing ones should not be removed or renamed.

use std::path::PathBuf;

use serde::Serialize;

/// An event emitted by the build or export stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason")]
pub enum PipelineEvent {
    /// The configure step is about to run.
    #[serde(rename = "configure-started")]
    ConfigureStarted {
        generator: String,
        build_directory: PathBuf,
    },

    /// The build step is about to run.
    #[serde(rename = "build-started")]
    BuildStarted { config: String },

    /// The external tool finished and the artifact is in place.
    #[serde(rename = "build-finished")]
    BuildFinished { artifact: PathBuf },

    /// A file or tree was written to an export location.
    #[serde(rename = "exported")]
    Exported {
        scheme: String,
        destination: PathBuf,
    },

    /// Every requested stage completed.
    #[serde(rename = "pipeline-finished")]
    PipelineFinished { exported: usize, duration_ms: u64 },
}

/// Receives pipeline events.
pub trait EventSink {
    fn emit(&mut self, event: PipelineEvent);
}

impl<F: FnMut(PipelineEvent)> EventSink for F {
    fn emit(&mut self, event: PipelineEvent) {
        self(event)
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: PipelineEvent) {}
}
