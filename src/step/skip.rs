//! Canonical skip predicates. Each reads only the snapshot.

use std::sync::Arc;

use super::types::SkipPredicate;
use crate::snapshot::Snapshot;

pub fn no_source_files() -> SkipPredicate {
    Arc::new(|snapshot: &Snapshot| snapshot.source_files.is_empty())
}

pub fn no_production_source_files() -> SkipPredicate {
    Arc::new(|snapshot: &Snapshot| snapshot.production_source_files.is_empty())
}

/// Skips when the project manifest has no script called `name`.
pub fn no_command(name: &'static str) -> SkipPredicate {
    Arc::new(move |snapshot: &Snapshot| !snapshot.available_commands.contains(name))
}

pub fn no_test_files() -> SkipPredicate {
    Arc::new(|snapshot: &Snapshot| !snapshot.has_test_files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates_on_empty_snapshot() {
        let snapshot = Snapshot::default();
        assert!(no_source_files()(&snapshot));
        assert!(no_production_source_files()(&snapshot));
        assert!(no_command("build")(&snapshot));
        assert!(no_test_files()(&snapshot));
    }

    #[test]
    fn test_predicates_on_populated_snapshot() {
        let snapshot = Snapshot {
            source_files: vec![".husky/a.ts".into()],
            available_commands: ["build".to_string()].into_iter().collect(),
            has_test_files: true,
            ..Default::default()
        };
        assert!(!no_source_files()(&snapshot));
        assert!(no_production_source_files()(&snapshot));
        assert!(!no_command("build")(&snapshot));
        assert!(no_command("test")(&snapshot));
        assert!(!no_test_files()(&snapshot));
    }
}
