//! Per-file added/deleted line counts for staged changes.
//!
//! Purely informational: nothing here gates a step.

use console::Color;
use serde::Serialize;

use crate::message::Messages;
use crate::ui::{self, style};

/// A single file over this many added or deleted lines is highlighted.
const FILE_CHANGE_LIMIT: u64 = 50;
/// Total added plus deleted lines above which the commit is flagged.
const TOTAL_CHANGE_LIMIT: u64 = 200;
/// Number of files above which the commit is flagged.
const FILE_COUNT_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDiff {
    /// `None` for binary files, which git reports as `-`.
    pub added: Option<u64>,
    pub deleted: Option<u64>,
    pub filename: String,
}

impl FileDiff {
    fn many_added(&self) -> bool {
        self.added.is_some_and(|n| n > FILE_CHANGE_LIMIT)
    }

    fn many_deleted(&self) -> bool {
        self.deleted.is_some_and(|n| n > FILE_CHANGE_LIMIT)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffTotals {
    pub added: u64,
    pub deleted: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub files: Vec<FileDiff>,
    pub total: DiffTotals,
}

impl DiffStats {
    /// Parses `git diff --numstat -z --no-renames` output, one
    /// `added\tdeleted\tpath` record per NUL.
    pub fn parse(numstat: &str) -> Self {
        let files = numstat
            .split('\0')
            .filter(|l| !l.trim().is_empty())
            .filter_map(|line| {
                let mut parts = line.splitn(3, '\t');
                let added = parts.next()?;
                let deleted = parts.next()?;
                let filename = parts.next()?;
                Some(FileDiff {
                    added: added.parse().ok(),
                    deleted: deleted.parse().ok(),
                    filename: filename.to_string(),
                })
            })
            .collect::<Vec<_>>();
        let total = files.iter().fold(DiffTotals::default(), |acc, f| DiffTotals {
            added: acc.added + f.added.unwrap_or(0),
            deleted: acc.deleted + f.deleted.unwrap_or(0),
        });
        Self { files, total }
    }

    pub fn too_many_changes(&self) -> bool {
        self.total.added + self.total.deleted > TOTAL_CHANGE_LIMIT
            || self.files.len() > FILE_COUNT_LIMIT
    }

    /// Prints the staged file table followed by totals.
    pub fn report(&self, msgs: &Messages) {
        let mut out = vec![
            format!("\n{}", style::estyle(format!(" {} ", msgs.staged_files)).on_cyan()),
            format!(
                "\n{}\n",
                style::ecyan(format!("{}\t{}\t{}", msgs.added, msgs.deleted, msgs.filename))
            ),
        ];
        for file in &self.files {
            out.push(self.render_file(file, msgs));
        }
        out.push(format!(
            "\n{}: {}",
            msgs.total_added,
            style::egreen(self.total.added)
        ));
        out.push(format!(
            "{}: {}\n",
            msgs.total_deleted,
            style::ered(self.total.deleted)
        ));
        let out = out.join("\n");
        clx::progress::with_terminal_lock(|| eprintln!("{out}"));
        if self.too_many_changes() {
            ui::print_box(msgs.too_many_changes_label, Color::Yellow);
        }
    }

    fn render_file(&self, file: &FileDiff, msgs: &Messages) -> String {
        let count = |n: Option<u64>| n.map(|n| n.to_string()).unwrap_or_else(|| "-".into());
        let added = if file.many_added() {
            style::eyellow(count(file.added))
        } else {
            style::egreen(count(file.added))
        };
        let deleted = if file.many_deleted() {
            style::eyellow(count(file.deleted))
        } else {
            style::ered(count(file.deleted))
        };
        let many = file.many_added() || file.many_deleted();
        let filename = if many {
            style::eyellow(file.filename.as_str())
        } else {
            style::ecyan(file.filename.as_str())
        };
        let tag = if many { msgs.too_many_changes } else { "" };
        format!("{added}\t{deleted}\t{filename}\t{tag}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numstat() {
        let stats = DiffStats::parse("3\t1\tsrc/a.ts\x0010\t0\tsrc/b ts.ts\0-\t-\tlogo.png\0");
        assert_eq!(stats.files.len(), 3);
        assert_eq!(stats.files[1].filename, "src/b ts.ts");
        assert_eq!(stats.files[2].added, None);
        assert_eq!(stats.total, DiffTotals { added: 13, deleted: 1 });
    }

    #[test]
    fn test_parse_keeps_non_ascii_names() {
        let stats = DiffStats::parse("2\t0\tsrc/한글.ts\0");
        assert_eq!(stats.files[0].filename, "src/한글.ts");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(DiffStats::parse(""), DiffStats::default());
    }

    #[test]
    fn test_too_many_changes_by_lines() {
        let stats = DiffStats::parse("150\t51\tsrc/a.ts\0");
        assert!(stats.too_many_changes());
        let stats = DiffStats::parse("150\t50\tsrc/a.ts\0");
        assert!(!stats.too_many_changes());
    }

    #[test]
    fn test_too_many_changes_by_file_count() {
        let numstat = (0..21)
            .map(|i| format!("1\t0\tsrc/f{i}.ts"))
            .collect::<Vec<_>>()
            .join("\0");
        assert!(DiffStats::parse(&numstat).too_many_changes());
    }

    #[test]
    fn test_file_flagged_over_limit() {
        let stats = DiffStats::parse("51\t0\tsrc/a.ts\x0050\t50\tsrc/b.ts\0");
        assert!(stats.files[0].many_added());
        assert!(!stats.files[1].many_added());
        assert!(!stats.files[1].many_deleted());
    }
}
