//! The environment snapshot every step is evaluated against.
//!
//! It is collected once per invocation and shared behind an `Arc`, so steps
//! running concurrently all observe the same values.

use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use regex::Regex;

use crate::config::Config;
use crate::diff_stats::DiffStats;
use crate::error::Error;
use crate::message::Messages;
use crate::package_manager::PackageManager;
use crate::{Result, git, project};

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Working tree root; staged paths are relative to it
    pub root: PathBuf,
    /// Staged paths in git's order
    pub staged_files: Vec<String>,
    /// Staged paths with a recognized source extension
    pub source_files: Vec<String>,
    /// Source files that are not tooling (e.g. hook scripts)
    pub production_source_files: Vec<String>,
    pub branch: Option<String>,
    pub branch_is_safe: bool,
    pub package_manager: PackageManager,
    pub available_commands: IndexSet<String>,
    pub has_test_files: bool,
    pub diff_stats: DiffStats,
    /// Directories handed to the linter
    pub source_dirs: Vec<String>,
    pub verbose: bool,
}

impl Snapshot {
    /// Reads the repository at `root` and the project manifest.
    ///
    /// With nothing staged only the staged list is read, so an empty commit
    /// never touches the manifest or walks the tree.
    #[tracing::instrument(level = "info", name = "snapshot.collect", skip_all)]
    pub fn collect(config: &Config, root: &Path, msgs: &Messages) -> Result<Self> {
        let policy = BranchPolicy::new(&config.unsafe_branches)?;
        let staged_files = git::staged_files(root)?;
        if staged_files.is_empty() {
            debug!("snapshot: nothing staged");
            return Ok(Self::from_parts(root, vec![], config, SnapshotFacts::default()));
        }
        let diff_stats = DiffStats::parse(&git::staged_numstat(root)?);
        let branch = git::current_branch(root)?;
        let package_manager = match config.package_manager.or_else(|| PackageManager::detect(root)) {
            Some(pm) => pm,
            None => {
                warn!("{}", msgs.unknown_package_manager);
                PackageManager::default()
            }
        };
        if config.verbose {
            debug!("{}", msgs.package_manager_is(package_manager));
        }
        let available_commands = project::available_commands(root)?;
        let has_test_files = project::has_test_files(root, &config.source_extensions);
        let snapshot = Self::from_parts(
            root,
            staged_files,
            config,
            SnapshotFacts {
                branch_is_safe: policy.is_safe(branch.as_deref()),
                branch,
                package_manager,
                available_commands,
                has_test_files,
                diff_stats,
            },
        );
        debug!(
            "snapshot: {} staged, {} source, {} production, branch {:?} safe={}",
            snapshot.staged_files.len(),
            snapshot.source_files.len(),
            snapshot.production_source_files.len(),
            snapshot.branch,
            snapshot.branch_is_safe
        );
        Ok(snapshot)
    }

    fn from_parts(
        root: &Path,
        staged_files: Vec<String>,
        config: &Config,
        facts: SnapshotFacts,
    ) -> Self {
        let source_files = source_files(&staged_files, &config.source_extensions);
        let production_source_files =
            production_source_files(&source_files, &config.tooling_patterns);
        Self {
            root: root.to_path_buf(),
            staged_files,
            source_files,
            production_source_files,
            branch: facts.branch,
            branch_is_safe: facts.branch_is_safe,
            package_manager: facts.package_manager,
            available_commands: facts.available_commands,
            has_test_files: facts.has_test_files,
            diff_stats: facts.diff_stats,
            source_dirs: config.source_dirs.clone(),
            verbose: config.verbose,
        }
    }
}

#[derive(Default)]
struct SnapshotFacts {
    branch: Option<String>,
    branch_is_safe: bool,
    package_manager: PackageManager,
    available_commands: IndexSet<String>,
    has_test_files: bool,
    diff_stats: DiffStats,
}

pub fn source_files(staged: &[String], extensions: &[String]) -> Vec<String> {
    staged
        .iter()
        .filter(|f| extensions.iter().any(|ext| f.ends_with(ext.as_str())))
        .cloned()
        .collect()
}

pub fn production_source_files(source: &[String], tooling_patterns: &[String]) -> Vec<String> {
    source
        .iter()
        .filter(|f| !tooling_patterns.iter().any(|p| f.contains(p.as_str())))
        .cloned()
        .collect()
}

/// Unsafe branch patterns, each a regex matched against the whole branch
/// name or its last path segment.
#[derive(Debug)]
pub struct BranchPolicy {
    unsafe_branches: Vec<Regex>,
}

impl BranchPolicy {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let unsafe_branches = patterns
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|pattern| {
                Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
                    Error::InvalidBranchPattern {
                        pattern: pattern.clone(),
                        source,
                    }
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { unsafe_branches })
    }

    /// A detached HEAD has no branch and is considered safe.
    pub fn is_safe(&self, branch: Option<&str>) -> bool {
        let Some(branch) = branch else {
            return true;
        };
        let last = branch.rsplit('/').next().unwrap_or(branch);
        !self
            .unsafe_branches
            .iter()
            .any(|re| re.is_match(branch) || re.is_match(last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_source_files_preserve_order() {
        let staged = strings(&["b.tsx", "README.md", "a.ts", "lib.mts", "x.js"]);
        let exts = strings(&[".ts", ".tsx", ".mts", ".mtsx"]);
        assert_eq!(source_files(&staged, &exts), strings(&["b.tsx", "a.ts", "lib.mts"]));
    }

    #[test]
    fn test_production_source_files_exclude_tooling() {
        let source = strings(&[".husky/install.ts", "src/a.ts"]);
        assert_eq!(
            production_source_files(&source, &strings(&["husky"])),
            strings(&["src/a.ts"])
        );
    }

    #[test]
    fn test_branch_policy() {
        let policy = BranchPolicy::new(&strings(&["main", "master", "release-.*"])).unwrap();
        assert!(!policy.is_safe(Some("main")));
        assert!(!policy.is_safe(Some("release-1.2")));
        assert!(!policy.is_safe(Some("team/main")));
        assert!(policy.is_safe(Some("mainline")));
        assert!(policy.is_safe(Some("feature/login")));
        assert!(policy.is_safe(None));
    }

    #[test]
    fn test_branch_policy_ignores_blank_patterns() {
        let policy = BranchPolicy::new(&strings(&[""])).unwrap();
        assert!(policy.is_safe(Some("main")));
    }

    #[test]
    fn test_branch_policy_invalid_pattern() {
        let err = BranchPolicy::new(&strings(&["feat/("])).unwrap_err();
        assert!(err.to_string().contains("feat/("));
    }

    #[test]
    fn test_from_parts_classifies_files() {
        let config = Config::default();
        let snapshot = Snapshot::from_parts(
            Path::new("/repo"),
            strings(&["src/a.ts", "docs/x.md", ".husky/pre.ts"]),
            &config,
            SnapshotFacts {
                branch: Some("dev".into()),
                branch_is_safe: true,
                package_manager: PackageManager::Pnpm,
                available_commands: IndexSet::new(),
                has_test_files: false,
                diff_stats: DiffStats::default(),
            },
        );
        assert_eq!(snapshot.source_files, strings(&["src/a.ts", ".husky/pre.ts"]));
        assert_eq!(snapshot.production_source_files, strings(&["src/a.ts"]));
        assert_eq!(snapshot.source_dirs, config.source_dirs);
        assert_eq!(snapshot.root, PathBuf::from("/repo"));
    }

    #[test]
    fn test_collect_nothing_staged_skips_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        git2::Repository::init(tmp.path()).unwrap();
        std::fs::write(tmp.path().join("package.json"), "{ not json").unwrap();
        let msgs = crate::message::Locale::En.messages();

        let snapshot = Snapshot::collect(&Config::default(), tmp.path(), msgs).unwrap();
        assert!(snapshot.staged_files.is_empty());
        assert!(snapshot.available_commands.is_empty());
        assert_eq!(snapshot.root, tmp.path());
    }

    #[test]
    fn test_collect_non_ascii_source_file() {
        let tmp = tempfile::tempdir().unwrap();
        git2::Repository::init(tmp.path()).unwrap();
        std::fs::create_dir(tmp.path().join("src")).unwrap();
        std::fs::write(tmp.path().join("src/한글.ts"), "export {};\n").unwrap();
        std::fs::write(tmp.path().join("package.json"), "{}").unwrap();
        git::add(tmp.path(), &strings(&["src/한글.ts"])).unwrap();
        let msgs = crate::message::Locale::En.messages();

        let snapshot = Snapshot::collect(&Config::default(), tmp.path(), msgs).unwrap();
        assert_eq!(snapshot.source_files, strings(&["src/한글.ts"]));
        assert_eq!(snapshot.production_source_files, strings(&["src/한글.ts"]));
    }
}
