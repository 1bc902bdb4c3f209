use std::sync::Arc;

use super::types::PostAction;
use crate::git;
use crate::snapshot::Snapshot;

/// Stages the source files again so a formatter's rewrites land in the commit.
pub fn restage_source_files() -> PostAction {
    Arc::new(|snapshot: &Snapshot| {
        debug!("restaging {} source file(s)", snapshot.source_files.len());
        git::add(&snapshot.root, &snapshot.source_files)
    })
}
