//! Live launcher using `std::process::Command` and `tokio::process`.

use std::io::{self, Read};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use tokio::process::Child;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

use crate::options::LaunchOptions;
use crate::ports::launcher::{
    CommandSpec, ExitFuture, Launcher, OutputReader, ProcessHandle, ShellSyncFailure, SyncOutput,
};

/// Launcher that creates real child processes.
///
/// Shell strings run through `sh -c` on Unix and `cmd /d /s /c` on Windows.
/// The child's stdin is always null. Asynchronous launches must happen
/// inside a tokio runtime. A timeout kills the child on every launch path.
pub struct LiveLauncher;

impl Launcher for LiveLauncher {
    fn spawn(&self, command: &CommandSpec, options: &LaunchOptions) -> ProcessHandle {
        let mut cmd = tokio::process::Command::from(build_command(command, options));
        cmd.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => return ProcessHandle::failed(err),
        };
        debug!(pid = ?child.id(), command = %command.display(), "spawned process");

        let stdout = child.stdout.take().map(|out| Box::pin(out) as OutputReader);
        let stderr = child.stderr.take().map(|err| Box::pin(err) as OutputReader);
        let exit: ExitFuture = Box::pin(wait_for_exit(child, options.timeout()));
        ProcessHandle { stdout, stderr, exit }
    }

    fn run_sync(&self, command: &CommandSpec, options: &LaunchOptions) -> io::Result<SyncOutput> {
        let completed = run_to_completion(build_command(command, options), options.timeout())?;
        Ok(completed.output)
    }

    fn run_shell_sync(
        &self,
        command: &str,
        options: &LaunchOptions,
    ) -> Result<Vec<u8>, ShellSyncFailure> {
        let Completed { output, timed_out } =
            run_to_completion(build_command(&CommandSpec::shell(command), options), options.timeout())
                .map_err(ShellSyncFailure::start)?;

        if output.status == Some(0) {
            return Ok(output.stdout);
        }
        let source = match (output.status, timed_out) {
            (_, Some(limit)) => io::Error::new(
                io::ErrorKind::TimedOut,
                format!("command timed out after {limit:?}: {command}"),
            ),
            (Some(code), None) => io::Error::other(format!("command failed with exit code {code}: {command}")),
            (None, None) => io::Error::other(format!("command terminated by signal: {command}")),
        };
        Err(ShellSyncFailure { status: output.status, stdout: Some(output.stdout), stderr: Some(output.stderr), source })
    }
}

async fn wait_for_exit(mut child: Child, timeout: Option<Duration>) -> io::Result<Option<i32>> {
    let Some(limit) = timeout else {
        return Ok(child.wait().await?.code());
    };
    let waited = tokio::time::timeout(limit, child.wait()).await;
    match waited {
        Ok(status) => Ok(status?.code()),
        Err(_) => {
            warn!(pid = ?child.id(), ?limit, "process timed out, killing");
            Ok(killed_after_timeout(child.id(), child.kill().await))
        }
    }
}

/// A blocking run and, if it was cut short, the limit that elapsed.
struct Completed {
    output: SyncOutput,
    timed_out: Option<Duration>,
}

/// Runs `cmd` to completion on this thread, killing it once `timeout`
/// elapses. A killed child reports no status.
fn run_to_completion(mut cmd: Command, timeout: Option<Duration>) -> io::Result<Completed> {
    cmd.stdin(Stdio::null());
    let Some(limit) = timeout else {
        let output = cmd.output()?;
        let output = SyncOutput { stdout: output.stdout, stderr: output.stderr, status: output.status.code() };
        return Ok(Completed { output, timed_out: None });
    };

    let mut child = cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).spawn()?;
    debug!(pid = child.id(), ?limit, "spawned process (blocking)");
    let stdout = spawn_pipe_reader(child.stdout.take());
    let stderr = spawn_pipe_reader(child.stderr.take());

    let (status, timed_out) = match child.wait_timeout(limit)? {
        Some(status) => (status.code(), None),
        None => {
            warn!(pid = child.id(), ?limit, "process timed out, killing");
            let killed = match child.kill() {
                Err(err) if err.kind() != io::ErrorKind::InvalidInput => Err(err),
                _ => child.wait().map(drop),
            };
            (killed_after_timeout(Some(child.id()), killed), Some(limit))
        }
    };

    let output = SyncOutput { stdout: join_pipe_reader(stdout)?, stderr: join_pipe_reader(stderr)?, status };
    Ok(Completed { output, timed_out })
}

/// Status of a child stopped by its timeout. A failed kill is logged; the
/// process still counts as stopped without an exit code.
fn killed_after_timeout(pid: Option<u32>, killed: io::Result<()>) -> Option<i32> {
    if let Err(err) = killed {
        warn!(?pid, error = %err, "failed to kill timed-out process");
    }
    None
}

fn spawn_pipe_reader<R>(pipe: Option<R>) -> Option<thread::JoinHandle<io::Result<Vec<u8>>>>
where
    R: Read + Send + 'static,
{
    pipe.map(|mut reader| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            reader.read_to_end(&mut buf)?;
            Ok(buf)
        })
    })
}

fn join_pipe_reader(handle: Option<thread::JoinHandle<io::Result<Vec<u8>>>>) -> io::Result<Vec<u8>> {
    match handle {
        Some(handle) => handle.join().map_err(|_| io::Error::other("pipe reader panicked"))?,
        None => Ok(Vec::new()),
    }
}

fn build_command(command: &CommandSpec, options: &LaunchOptions) -> Command {
    let mut cmd = match command {
        CommandSpec::Argv { program, args } => {
            let mut cmd = Command::new(program);
            cmd.args(args);
            cmd
        }
        CommandSpec::Shell(line) => shell_command(line),
    };
    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }
    if options.env_clear {
        cmd.env_clear();
    }
    cmd.envs(&options.env);
    hide_window(&mut cmd, options.hide_window);
    cmd
}

#[cfg(unix)]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(line);
    cmd
}

#[cfg(windows)]
fn shell_command(line: &str) -> Command {
    use std::os::windows::process::CommandExt;

    let mut cmd = Command::new("cmd");
    cmd.args(["/d", "/s", "/c"]).raw_arg(format!("\"{line}\""));
    cmd
}

#[cfg(windows)]
fn hide_window(cmd: &mut Command, hide: bool) {
    use std::os::windows::process::CommandExt;

    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    if hide {
        cmd.creation_flags(CREATE_NO_WINDOW);
    }
}

#[cfg(not(windows))]
fn hide_window(_cmd: &mut Command, _hide: bool) {}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Instant;

    use tokio::io::AsyncReadExt;

    use super::*;

    fn sh(line: &str) -> CommandSpec {
        CommandSpec::shell(line)
    }

    #[test]
    fn run_sync_captures_everything() {
        let out = LiveLauncher
            .run_sync(
                &CommandSpec::argv("sh", ["-c", "printf out; printf err >&2; exit 3"]),
                &LaunchOptions::default(),
            )
            .unwrap();
        assert_eq!(out.stdout, b"out");
        assert_eq!(out.stderr, b"err");
        assert_eq!(out.status, Some(3));
    }

    #[test]
    fn run_sync_reports_missing_program() {
        let err = LiveLauncher
            .run_sync(
                &CommandSpec::argv("definitely-not-a-real-program-xyz", Vec::<String>::new()),
                &LaunchOptions::default(),
            )
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn shell_sync_success_returns_stdout_only() {
        let out = LiveLauncher
            .run_shell_sync("printf hello; printf world >&2", &LaunchOptions::default())
            .unwrap();
        assert_eq!(out, b"hello");
    }

    #[test]
    fn shell_sync_non_zero_carries_all_fields() {
        let failure = LiveLauncher
            .run_shell_sync("printf hello; printf world >&2; exit 1", &LaunchOptions::default())
            .unwrap_err();
        assert_eq!(failure.status, Some(1));
        assert_eq!(failure.stdout.as_deref(), Some(&b"hello"[..]));
        assert_eq!(failure.stderr.as_deref(), Some(&b"world"[..]));
    }

    #[test]
    fn applies_cwd_and_env() {
        let dir = tempfile::tempdir().unwrap();
        let options = LaunchOptions {
            cwd: Some(dir.path().to_path_buf()),
            env: [("GREETING".to_string(), "hi".to_string())].into_iter().collect(),
            ..LaunchOptions::default()
        };
        let out = LiveLauncher.run_shell_sync("printf \"$GREETING\"; pwd", &options).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("hi"));
        let expected = dir.path().canonicalize().unwrap();
        let reported = std::path::PathBuf::from(text.trim_start_matches("hi").trim());
        assert_eq!(reported.canonicalize().unwrap(), expected);
    }

    #[tokio::test]
    async fn spawn_pipes_both_streams() {
        let handle = LiveLauncher.spawn(&sh("printf a; printf b >&2; exit 5"), &LaunchOptions::default());
        let mut stdout = handle.stdout.unwrap();
        let mut stderr = handle.stderr.unwrap();
        let mut out = Vec::new();
        let mut err = Vec::new();
        stdout.read_to_end(&mut out).await.unwrap();
        stderr.read_to_end(&mut err).await.unwrap();

        assert_eq!(out, b"a");
        assert_eq!(err, b"b");
        assert_eq!(handle.exit.await.unwrap(), Some(5));
    }

    #[tokio::test]
    async fn spawn_failure_surfaces_on_exit() {
        let handle = LiveLauncher.spawn(
            &CommandSpec::argv("definitely-not-a-real-program-xyz", Vec::<String>::new()),
            &LaunchOptions::default(),
        );
        assert!(handle.stdout.is_none());
        assert_eq!(handle.exit.await.unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn run_sync_timeout_kills_the_child() {
        let options = LaunchOptions { timeout_ms: Some(100), ..LaunchOptions::default() };
        let started = Instant::now();
        let out = LiveLauncher.run_sync(&CommandSpec::argv("sleep", ["2"]), &options).unwrap();
        assert_eq!(out.status, None);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn run_sync_within_timeout_keeps_output() {
        let options = LaunchOptions { timeout_ms: Some(5_000), ..LaunchOptions::default() };
        let out = LiveLauncher
            .run_sync(&CommandSpec::argv("sh", ["-c", "printf out; printf err >&2; exit 2"]), &options)
            .unwrap();
        assert_eq!(out.stdout, b"out");
        assert_eq!(out.stderr, b"err");
        assert_eq!(out.status, Some(2));
    }

    #[test]
    fn shell_sync_timeout_reports_no_status() {
        let options = LaunchOptions { timeout_ms: Some(100), ..LaunchOptions::default() };
        let failure = LiveLauncher.run_shell_sync("exec sleep 2", &options).unwrap_err();
        assert_eq!(failure.status, None);
        assert_eq!(failure.source.kind(), io::ErrorKind::TimedOut);
    }

    #[test]
    fn failed_kill_still_counts_as_stopped() {
        let killed = Err(io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(killed_after_timeout(Some(42), killed), None);
        assert_eq!(killed_after_timeout(None, Ok(())), None);
    }

    #[tokio::test]
    async fn timeout_kills_the_child() {
        let options = LaunchOptions { timeout_ms: Some(50), ..LaunchOptions::default() };
        let handle = LiveLauncher.spawn(&CommandSpec::argv("sleep", ["5"]), &options);
        assert_eq!(handle.exit.await.unwrap(), None);
    }
}
