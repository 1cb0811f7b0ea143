//! Implementation of `marl-export clean`.

use std::path::PathBuf;

use crate::core::PipelineResult;
use crate::util::context::GlobalContext;
use crate::util::fs::remove_dir_all_if_exists;

/// Remove `build/` (or only `build/export/`). Returns the directory that was
/// removed, or `None` if it did not exist.
pub fn clean(ctx: &GlobalContext, export_only: bool) -> PipelineResult<Option<PathBuf>> {
    let dir = if export_only {
        ctx.export_root()
    } else {
        ctx.build_root()
    };

    if remove_dir_all_if_exists(&dir)? {
        tracing::debug!("removed {}", dir.display());
        Ok(Some(dir))
    } else {
        Ok(None)
    }
}
