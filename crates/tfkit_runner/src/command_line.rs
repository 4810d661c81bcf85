//! Shell-based command runner.
//!
//! Commands are handed to the platform shell as a single argument, so quoting
//! inside the command string is interpreted by the shell and never re-split
//! here.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::config::CommandLineOptions;
use crate::error::{RunnerError, RunnerResult};
use crate::runner::{Executable, ProcessOutput};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs command strings through the shell in a fixed working directory.
#[derive(Debug, Clone)]
pub struct CommandLine {
    directory: PathBuf,
    options: CommandLineOptions,
}

impl CommandLine {
    /// Create a runner bound to `directory` with default options.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self::with_options(directory, CommandLineOptions::default())
    }

    pub fn with_options(directory: impl Into<PathBuf>, options: CommandLineOptions) -> Self {
        Self {
            directory: directory.into(),
            options,
        }
    }

    /// Working directory every command runs in.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn options(&self) -> &CommandLineOptions {
        &self.options
    }

    /// Check if dry-run mode is enabled.
    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }

    /// Format the shell invocation for logging.
    fn format_command(&self, command: &str) -> String {
        let mut cmd = self.options.shell.program.clone();
        for arg in &self.options.shell.args {
            cmd.push(' ');
            cmd.push_str(arg);
        }
        cmd.push_str(&format!(" \"{}\"", command));
        cmd
    }

    /// Run `command` and capture its output without judging the exit status.
    ///
    /// A zero `timeout` waits indefinitely. The timeout bounds the whole call:
    /// when it elapses before the child exits the child is killed, and when it
    /// elapses while a leftover process still holds the output pipes the
    /// readers are abandoned. Either way [`RunnerError::Timeout`] is returned.
    pub fn run(&self, command: &str, timeout: Duration) -> RunnerResult<ProcessOutput> {
        let shell_cmd = self.format_command(command);

        if self.options.dry_run {
            info!("[DRY-RUN] Would execute: {}", shell_cmd);
            let now = Utc::now();
            return Ok(ProcessOutput {
                exit_code: 0,
                stdout: format!("[DRY-RUN] {}", command),
                stderr: String::new(),
                started_at: now,
                finished_at: now,
                duration_ms: 0,
            });
        }

        let shell = &self.options.shell;
        let mut cmd = Command::new(&shell.program);
        cmd.args(shell.argv(command));
        cmd.current_dir(&self.directory);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        debug!("Executing in {:?}: {}", self.directory, shell_cmd);

        let started_at = Utc::now();
        let deadline = (!timeout.is_zero()).then(|| Instant::now() + timeout);
        let mut child = cmd.spawn().map_err(|e| {
            RunnerError::ExecutionFailed(format!("Failed to spawn {}: {}", shell.program, e))
        })?;

        // Both pipes are drained while the child runs so neither can fill up and stall it
        let stdout_rx = spawn_drain(child.stdout.take());
        let stderr_rx = spawn_drain(child.stderr.take());

        let status = wait_with_timeout(&mut child, timeout)?;

        let stdout = join_drain(&stdout_rx, "stdout", deadline, timeout)?;
        let stderr = join_drain(&stderr_rx, "stderr", deadline, timeout)?;

        let finished_at = Utc::now();
        let duration_ms = (finished_at - started_at).num_milliseconds().max(0) as u64;

        Ok(ProcessOutput {
            exit_code: status.code().unwrap_or(-1),
            stdout,
            stderr,
            started_at,
            finished_at,
            duration_ms,
        })
    }
}

impl Executable for CommandLine {
    fn execute(&self, command: &str) -> RunnerResult<String> {
        self.execute_with_timeout(command, self.options.default_timeout)
    }

    fn execute_with_timeout(&self, command: &str, timeout: Duration) -> RunnerResult<String> {
        let output = self.run(command, timeout)?;

        if output.success() {
            info!("Command completed successfully in {}ms", output.duration_ms);
            Ok(output.stdout)
        } else {
            error!(
                "Command failed with exit code {} after {}ms",
                output.exit_code, output.duration_ms
            );
            Err(RunnerError::NonZeroExit {
                code: output.exit_code,
                stderr: output.stderr,
            })
        }
    }
}

fn spawn_drain<R>(pipe: Option<R>) -> Receiver<io::Result<String>>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let read = match pipe {
            Some(mut pipe) => pipe.read_to_end(&mut buf).map(|_| ()),
            None => Ok(()),
        };
        // The receiver is gone once the caller gave up on this stream
        let _ = tx.send(read.map(|_| String::from_utf8_lossy(&buf).into_owned()));
    });
    rx
}

/// Collect a reader's output, giving up at `deadline`.
///
/// The shell may have exited while a background process it started still
/// holds the pipe; past the deadline the reader is left detached.
fn join_drain(
    rx: &Receiver<io::Result<String>>,
    stream: &str,
    deadline: Option<Instant>,
    timeout: Duration,
) -> RunnerResult<String> {
    let read = match deadline {
        None => rx.recv().map_err(|_| reader_lost(stream))?,
        Some(deadline) => {
            match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                Ok(read) => read,
                Err(RecvTimeoutError::Timeout) => {
                    warn!(
                        "{} still open after {}ms, abandoning reader",
                        stream,
                        timeout.as_millis()
                    );
                    return Err(RunnerError::Timeout(timeout));
                }
                Err(RecvTimeoutError::Disconnected) => return Err(reader_lost(stream)),
            }
        }
    };
    Ok(read?)
}

fn reader_lost(stream: &str) -> RunnerError {
    RunnerError::ExecutionFailed(format!("{} reader thread panicked", stream))
}

/// Wait for the child, killing it once `timeout` has elapsed.
///
/// Reader threads of a killed child are left detached: a grandchild that
/// inherited the pipes may keep them open past the kill.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> RunnerResult<ExitStatus> {
    if timeout.is_zero() {
        return child.wait().map_err(wait_error);
    }

    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                let elapsed = start.elapsed();
                if elapsed >= timeout {
                    warn!("Command exceeded {}ms, killing it", timeout.as_millis());
                    if let Err(e) = child.kill() {
                        if e.kind() != io::ErrorKind::InvalidInput {
                            return Err(RunnerError::ExecutionFailed(format!(
                                "Failed to kill timed-out process: {}",
                                e
                            )));
                        }
                    }
                    if let Err(e) = child.wait() {
                        warn!("Failed to reap timed-out process: {}", e);
                    }
                    return Err(RunnerError::Timeout(timeout));
                }
                thread::sleep(POLL_INTERVAL.min(timeout - elapsed));
            }
            Err(e) => return Err(wait_error(e)),
        }
    }
}

fn wait_error(e: io::Error) -> RunnerError {
    if e.kind() == io::ErrorKind::Interrupted {
        RunnerError::Interrupted(e.to_string())
    } else {
        RunnerError::ExecutionFailed(format!("Failed to wait for process: {}", e))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::Shell;
    use tempfile::tempdir;

    #[test]
    fn test_execute_captures_stdout() {
        let dir = tempdir().unwrap();
        let shell = CommandLine::new(dir.path());

        let output = shell.execute("echo hello && echo ignored >&2").unwrap();
        assert_eq!(output, "hello\n");
    }

    #[test]
    fn test_execute_runs_in_bound_directory() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("main.tf"), "").unwrap();
        let shell = CommandLine::new(dir.path());

        let output = shell.execute("ls").unwrap();
        assert!(output.contains("main.tf"));
    }

    #[test]
    fn test_non_zero_exit_carries_stderr() {
        let dir = tempdir().unwrap();
        let shell = CommandLine::new(dir.path());

        let err = shell
            .execute("echo partial; echo 'Error: boom' >&2; exit 3")
            .unwrap_err();

        match &err {
            RunnerError::NonZeroExit { code, stderr } => {
                assert_eq!(*code, 3);
                assert_eq!(stderr, "Error: boom\n");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains("Error: boom"));
    }

    #[test]
    fn test_run_reports_exit_code_without_failing() {
        let dir = tempdir().unwrap();
        let shell = CommandLine::new(dir.path());

        let output = shell.run("exit 4", Duration::from_secs(10)).unwrap();
        assert_eq!(output.exit_code, 4);
        assert!(!output.success());
        assert!(output.finished_at >= output.started_at);
    }

    #[test]
    fn test_timeout_kills_process() {
        let dir = tempdir().unwrap();
        let shell = CommandLine::new(dir.path());

        let start = Instant::now();
        let err = shell
            .execute_with_timeout("sleep 10", Duration::from_millis(200))
            .unwrap_err();

        assert!(matches!(err, RunnerError::Timeout(t) if t == Duration::from_millis(200)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_timeout_covers_background_process_holding_pipes() {
        let dir = tempdir().unwrap();
        let shell = CommandLine::new(dir.path());

        let start = Instant::now();
        let err = shell
            .execute_with_timeout("echo hi; sleep 4 &", Duration::from_millis(300))
            .unwrap_err();

        assert!(matches!(err, RunnerError::Timeout(t) if t == Duration::from_millis(300)));
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_zero_timeout_waits_for_pipes_to_close() {
        let dir = tempdir().unwrap();
        let shell = CommandLine::new(dir.path());

        let output = shell
            .execute_with_timeout("(sleep 0.3; echo late) &", Duration::ZERO)
            .unwrap();
        assert_eq!(output, "late\n");
    }

    #[test]
    fn test_read_failure_surfaces_as_io_error() {
        let (tx, rx) = mpsc::channel();
        tx.send(Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed")))
            .unwrap();

        let err = join_drain(&rx, "stdout", None, Duration::ZERO).unwrap_err();
        assert!(matches!(err, RunnerError::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
    }

    #[test]
    fn test_lost_reader_is_execution_failure() {
        let (tx, rx) = mpsc::channel::<io::Result<String>>();
        drop(tx);

        let deadline = Some(Instant::now() + Duration::from_secs(1));
        let err = join_drain(&rx, "stderr", deadline, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, RunnerError::ExecutionFailed(msg) if msg.contains("stderr")));
    }

    #[test]
    fn test_default_timeout_applies_to_execute() {
        let dir = tempdir().unwrap();
        let options = CommandLineOptions::new().default_timeout(Duration::from_millis(150));
        let shell = CommandLine::with_options(dir.path(), options);

        let err = shell.execute("sleep 10").unwrap_err();
        assert!(matches!(err, RunnerError::Timeout(_)));
    }

    #[test]
    fn test_verbose_streams_do_not_deadlock() {
        let dir = tempdir().unwrap();
        let shell = CommandLine::new(dir.path());

        let output = shell
            .execute_with_timeout(
                "for i in $(seq 1 20000); do echo out$i; echo err$i >&2; done",
                Duration::from_secs(60),
            )
            .unwrap();

        assert_eq!(output.lines().count(), 20000);
        assert!(output.ends_with("out20000\n"));
    }

    #[test]
    fn test_dry_run_does_not_spawn() {
        let dir = tempdir().unwrap();
        let shell = CommandLine::with_options(dir.path(), CommandLineOptions::new().dry_run());

        let output = shell.execute("touch created.txt").unwrap();
        assert_eq!(output, "[DRY-RUN] touch created.txt");
        assert!(!dir.path().join("created.txt").exists());
    }

    #[test]
    fn test_missing_shell_is_execution_failure() {
        let dir = tempdir().unwrap();
        let options = CommandLineOptions::new().shell(Shell::new("definitely-not-a-shell-xyz", ["-c"]));
        let shell = CommandLine::with_options(dir.path(), options);

        let err = shell.execute("echo hi").unwrap_err();
        assert!(matches!(err, RunnerError::ExecutionFailed(msg) if msg.contains("definitely-not-a-shell-xyz")));
    }
}
