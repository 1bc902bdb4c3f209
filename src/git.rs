use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::Result;
use crate::ui::style;
use eyre::{WrapErr, eyre};
use git2::Repository;

fn git_cmd<I, S>(args: I) -> xx::process::XXExpression
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let args = args.into_iter().map(|s| s.into()).collect::<Vec<_>>();
    xx::process::cmd("git", args).on_stderr_line(|line| {
        clx::progress::with_terminal_lock(|| eprintln!("{} {}", style::edim("git"), line))
    })
}

fn git_read<I, S>(args: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    Ok(git_cmd(args).read()?)
}

/// Returns the working tree root containing the current directory.
pub fn find_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    xx::file::find_up(&cwd, &[".git"])
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .ok_or_else(|| eyre!("No .git found in this or any parent directory"))
}

fn git_in(root: &Path) -> [OsString; 2] {
    ["-C".into(), root.into()]
}

/// Staged files in git's order, excluding deletions.
///
/// Paths are NUL-separated so git never quotes non-ASCII names.
#[tracing::instrument(level = "debug", name = "git.staged_files")]
pub fn staged_files(root: &Path) -> Result<Vec<String>> {
    let args = git_in(root).into_iter().chain(
        ["diff", "--cached", "--name-only", "--no-renames", "--diff-filter=d", "-z"]
            .map(OsString::from),
    );
    Ok(parse_name_only(&git_read(args)?))
}

/// Raw `--numstat -z` output for the index, parsed by [`crate::diff_stats`].
#[tracing::instrument(level = "debug", name = "git.numstat")]
pub fn staged_numstat(root: &Path) -> Result<String> {
    let args = git_in(root)
        .into_iter()
        .chain(["diff", "--cached", "--numstat", "--no-renames", "-z"].map(OsString::from));
    git_read(args)
}

/// Short name of the checked out branch, or `None` for a detached HEAD.
///
/// Reads the symbolic target of HEAD so an unborn branch still has a name.
pub fn current_branch(root: &Path) -> Result<Option<String>> {
    let repo = Repository::open(root).wrap_err("failed to open repository")?;
    let head = repo
        .find_reference("HEAD")
        .wrap_err("failed to read HEAD")?;
    Ok(head
        .symbolic_target()
        .map(|target| target.strip_prefix("refs/heads/").unwrap_or(target).to_string()))
}

/// Stages `files` again, used after a step rewrote them.
pub fn add(root: &Path, files: &[String]) -> Result<()> {
    if files.is_empty() {
        return Ok(());
    }
    let args = git_in(root)
        .into_iter()
        .chain(["add", "--"].map(OsString::from))
        .chain(files.iter().map(OsString::from));
    git_cmd(args)
        .run()
        .wrap_err_with(|| format!("failed to stage {} file(s)", files.len()))?;
    Ok(())
}

fn parse_name_only(out: &str) -> Vec<String> {
    out.split('\0')
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
