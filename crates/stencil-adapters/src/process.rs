//! Subprocess execution with per-command timeouts.
//!
//! std::process has no built-in wait-with-timeout, so the runner polls
//! `try_wait` on a short interval and kills the child when the deadline
//! passes. Output is captured from temp-piped handles after exit.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, instrument};

use stencil_core::application::ApplicationError;
use stencil_core::application::ports::{CommandOutput, CommandRunner, CommandSpec};
use stencil_core::error::StencilResult;

/// Poll interval while waiting for a child process.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Check that every required external tool is on PATH.
pub fn ensure_tools(tools: &'static [&'static str]) -> StencilResult<()> {
    for tool in tools {
        if which::which(tool).is_err() {
            return Err(ApplicationError::ToolMissing { tool }.into());
        }
    }
    Ok(())
}

/// Why `run_with_timeout` gave up on a child.
#[derive(Debug)]
pub(crate) enum WaitOutcome {
    SpawnFailed(std::io::Error),
    TimedOut(Duration),
}

pub(crate) fn wait_outcome_to_error(
    command: &str,
    outcome: WaitOutcome,
) -> stencil_core::error::StencilError {
    match outcome {
        WaitOutcome::SpawnFailed(e) => ApplicationError::CommandFailed {
            command: command.to_string(),
            exit_code: -1,
            stdout: String::new(),
            stderr: format!("failed to spawn: {e}"),
        }
        .into(),
        WaitOutcome::TimedOut(timeout) => ApplicationError::CommandTimeout {
            command: command.to_string(),
            timeout_secs: timeout.as_secs(),
        }
        .into(),
    }
}

/// Spawn and wait, killing the child once `timeout` elapses.
pub(crate) fn run_with_timeout(
    mut command: Command,
    timeout: Duration,
) -> Result<CommandOutput, WaitOutcome> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().map_err(WaitOutcome::SpawnFailed)?;

    // Drain pipes on background threads - a chatty child would otherwise
    // fill the pipe buffer and never exit.
    let stdout_reader = child.stdout.take().map(drain_to_string);
    let stderr_reader = child.stderr.take().map(drain_to_string);

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    // Best effort - the child may have exited in between.
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(WaitOutcome::TimedOut(timeout));
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => return Err(WaitOutcome::SpawnFailed(e)),
        }
    };

    let stdout = stdout_reader.map(collect_drained).unwrap_or_default();
    let stderr = stderr_reader.map(collect_drained).unwrap_or_default();

    Ok(CommandOutput {
        exit_code: status.code().unwrap_or(-1),
        stdout,
        stderr,
        interrupted: died_from_sigint(&status),
    })
}

fn drain_to_string<R: Read + Send + 'static>(mut handle: R) -> std::thread::JoinHandle<String> {
    std::thread::spawn(move || {
        let mut buffer = String::new();
        let _ = handle.read_to_string(&mut buffer);
        buffer
    })
}

fn collect_drained(handle: std::thread::JoinHandle<String>) -> String {
    handle.join().unwrap_or_default()
}

#[cfg(unix)]
fn died_from_sigint(status: &std::process::ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.signal() == Some(2) // SIGINT
}

#[cfg(not(unix))]
fn died_from_sigint(_status: &std::process::ExitStatus) -> bool {
    false
}

/// Production command runner using std::process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    #[instrument(skip_all, fields(command = %spec))]
    fn run(&self, spec: &CommandSpec, cwd: &Path) -> StencilResult<CommandOutput> {
        debug!(cwd = %cwd.display(), timeout_secs = spec.timeout.as_secs(), "Running command");

        let mut command = Command::new(&spec.program);
        command.args(&spec.args).current_dir(cwd);

        run_with_timeout(command, spec.timeout)
            .map_err(|outcome| wait_outcome_to_error(&spec.to_string(), outcome))
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;

    fn spec(program: &str, args: &[&str], timeout: Duration) -> CommandSpec {
        CommandSpec::new(program, args.iter().copied(), timeout)
    }

    #[test]
    fn captures_stdout_and_exit_code() {
        let runner = SystemRunner::new();
        let output = runner
            .run(
                &spec("sh", &["-c", "echo hello"], Duration::from_secs(5)),
                Path::new("."),
            )
            .unwrap();
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout.trim(), "hello");
        assert!(output.success());
    }

    #[test]
    fn nonzero_exit_is_reported_not_erred() {
        let runner = SystemRunner::new();
        let output = runner
            .run(
                &spec("sh", &["-c", "echo oops >&2; exit 3"], Duration::from_secs(5)),
                Path::new("."),
            )
            .unwrap();
        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stderr.trim(), "oops");
        assert!(!output.success());
    }

    #[test]
    fn timeout_kills_the_child() {
        let runner = SystemRunner::new();
        let err = runner
            .run(
                &spec("sleep", &["30"], Duration::from_millis(200)),
                Path::new("."),
            )
            .unwrap_err();
        assert!(err.to_string().contains("timed out"), "got: {err}");
    }

    #[test]
    fn missing_program_is_a_command_failure() {
        let runner = SystemRunner::new();
        let err = runner
            .run(
                &spec("definitely-not-a-real-binary", &[], Duration::from_secs(1)),
                Path::new("."),
            )
            .unwrap_err();
        assert!(err.to_string().contains("Command failed"), "got: {err}");
    }

    #[test]
    fn ensure_tools_accepts_sh() {
        ensure_tools(&["sh"]).unwrap();
    }

    #[test]
    fn ensure_tools_rejects_missing() {
        let err = ensure_tools(&["definitely-not-a-real-binary"]).unwrap_err();
        assert!(err.to_string().contains("Required tool not found"));
    }
}
