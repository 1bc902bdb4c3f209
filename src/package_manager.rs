use std::path::Path;

use serde::{Deserialize, Serialize};

/// The tool that runs project scripts.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

/// Lockfiles checked in priority order.
const LOCKFILES: &[(&str, PackageManager)] = &[
    ("bun.lockb", PackageManager::Bun),
    ("bun.lock", PackageManager::Bun),
    ("pnpm-lock.yaml", PackageManager::Pnpm),
    ("yarn.lock", PackageManager::Yarn),
    ("package-lock.json", PackageManager::Npm),
];

impl PackageManager {
    /// Detects the package manager from lockfiles in `root`.
    pub fn detect(root: &Path) -> Option<Self> {
        LOCKFILES
            .iter()
            .find(|(lockfile, _)| root.join(lockfile).is_file())
            .map(|(_, pm)| *pm)
    }

    /// The binary used to run package executables, e.g. `npx eslint`.
    /// yarn has no equivalent, so it borrows npx.
    pub fn executor(&self) -> &'static str {
        match self {
            PackageManager::Npm | PackageManager::Yarn => "npx",
            PackageManager::Pnpm => "pnpx",
            PackageManager::Bun => "bunx",
        }
    }
}
