//! Child process execution for steps.

use std::future::Future;
use std::process::Stdio;
use std::sync::Arc;

use clx::progress::ProgressJob;
use ensembler::CmdLineRunner;

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    /// `sh -o errexit -c`
    Sh,
    /// `cmd.exe /C`
    Cmd,
}

impl Shell {
    pub fn detect() -> Self {
        if cfg!(windows) { Shell::Cmd } else { Shell::Sh }
    }

    pub fn runner(&self) -> CmdLineRunner {
        match self {
            Shell::Sh => CmdLineRunner::new("sh").arg("-o").arg("errexit").arg("-c"),
            Shell::Cmd => CmdLineRunner::new("cmd.exe").arg("/C"),
        }
    }
}

/// Where a child's output goes.
pub enum Output {
    /// Reported on the step's progress line.
    Progress(Arc<ProgressJob>),
    /// Streamed straight to the terminal.
    Inherit,
}

/// Runs a command line and reports its exit code.
///
/// `Ok(None)` means the process ended without an exit code (killed by a
/// signal). `Err` means it could not be started at all.
pub trait CommandExecutor: Send + Sync + 'static {
    fn execute(
        &self,
        command: &str,
        output: Output,
    ) -> impl Future<Output = Result<Option<i32>>> + Send;
}

#[derive(Debug, Clone)]
pub struct ShellExecutor {
    shell: Shell,
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self {
            shell: Shell::detect(),
        }
    }
}

impl CommandExecutor for ShellExecutor {
    async fn execute(&self, command: &str, output: Output) -> Result<Option<i32>> {
        let mut cmd = self.shell.runner().arg(command);
        cmd = match output {
            Output::Progress(pr) => cmd
                .with_pr(pr)
                .show_stderr_on_error(false)
                .stderr_to_progress(true),
            Output::Inherit => cmd
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit()),
        };
        match cmd.execute().await {
            Ok(result) => Ok(result.status.code()),
            Err(ensembler::Error::ScriptFailed(e)) => {
                trace!("{command}: {}", e.3.combined_output);
                Ok(e.3.status.code())
            }
            Err(err) => Err(err.into()),
        }
    }
}
