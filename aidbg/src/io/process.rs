//! Child process execution with a timeout and bounded output.

use std::io::{ErrorKind, Read, Write};
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument, warn};
use wait_timeout::ChildExt;

/// Captured child process output.
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub stdout_truncated: usize,
    pub stderr_truncated: usize,
    pub timed_out: bool,
}

impl ProcessOutput {
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Last `max_lines` non-empty lines of stderr, for error messages.
    pub fn stderr_tail(&self, max_lines: usize) -> String {
        let text = String::from_utf8_lossy(&self.stderr);
        let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        let start = lines.len().saturating_sub(max_lines);
        lines[start..].join("\n")
    }
}

/// Run `cmd` to completion or until `timeout`, feeding `stdin` if given.
///
/// Stdin is written and stdout/stderr are drained on their own threads, so
/// `timeout` bounds the whole exchange even when the child never reads its
/// input. At most `output_limit_bytes` of each stream are kept. The child is
/// killed and reaped on every error path after spawn.
#[instrument(skip_all, fields(timeout_secs = timeout.as_secs(), output_limit_bytes))]
pub fn run_with_timeout(
    mut cmd: Command,
    stdin: Option<&[u8]>,
    timeout: Duration,
    output_limit_bytes: usize,
) -> Result<ProcessOutput> {
    if stdin.is_some() {
        cmd.stdin(Stdio::piped());
    } else {
        cmd.stdin(Stdio::null());
    }
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

    debug!("spawning child process");
    let mut child = cmd.spawn().context("spawn command")?;

    let pipes = take_pipes(&mut child, stdin.is_some());
    let (child_stdin, stdout, stderr) = match pipes {
        Ok(pipes) => pipes,
        Err(err) => {
            reap(&mut child);
            return Err(err);
        }
    };

    let stdin_handle = child_stdin.zip(stdin).map(|(pipe, input)| {
        let input = input.to_vec();
        thread::spawn(move || write_input(pipe, &input))
    });
    let stdout_handle = thread::spawn(move || read_limited(stdout, output_limit_bytes));
    let stderr_handle = thread::spawn(move || read_limited(stderr, output_limit_bytes));

    let mut timed_out = false;
    let status = match child.wait_timeout(timeout).context("wait for command") {
        Ok(Some(status)) => status,
        Ok(None) => {
            warn!(timeout_secs = timeout.as_secs(), "command timed out, killing");
            timed_out = true;
            if let Err(err) = child.kill() {
                debug!(err = %err, "kill after timeout failed");
            }
            child.wait().context("wait command after kill")?
        }
        Err(err) => {
            reap(&mut child);
            return Err(err);
        }
    };

    if let Some(handle) = stdin_handle {
        match handle.join() {
            Ok(result) => result?,
            Err(_) => return Err(anyhow!("stdin writer thread panicked")),
        }
    }
    let (stdout, stdout_truncated) = join_reader(stdout_handle).context("join stdout")?;
    let (stderr, stderr_truncated) = join_reader(stderr_handle).context("join stderr")?;
    if stdout_truncated > 0 || stderr_truncated > 0 {
        warn!(stdout_truncated, stderr_truncated, "output truncated");
    }

    debug!(exit_code = ?status.code(), timed_out, "command finished");
    Ok(ProcessOutput {
        status,
        stdout,
        stderr,
        stdout_truncated,
        stderr_truncated,
        timed_out,
    })
}

/// True when `err` bottoms out in "program not found".
pub fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<std::io::Error>())
        .any(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
}

fn take_pipes(
    child: &mut Child,
    want_stdin: bool,
) -> Result<(Option<ChildStdin>, ChildStdout, ChildStderr)> {
    let child_stdin = if want_stdin {
        Some(
            child
                .stdin
                .take()
                .ok_or_else(|| anyhow!("stdin was not piped"))?,
        )
    } else {
        None
    };
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;
    Ok((child_stdin, stdout, stderr))
}

/// Kill and wait for a child we are abandoning.
fn reap(child: &mut Child) {
    if let Err(err) = child.kill() {
        debug!(err = %err, "kill failed");
    }
    if let Err(err) = child.wait() {
        warn!(err = %err, "failed to reap child process");
    }
}

/// Feed `input` to the child. A child that exits without reading it all is not an error.
fn write_input(mut pipe: ChildStdin, input: &[u8]) -> Result<()> {
    match pipe.write_all(input) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::BrokenPipe => {
            debug!("child closed stdin before reading all input");
            Ok(())
        }
        Err(err) => Err(err).context("write stdin"),
    }
}

fn join_reader(handle: thread::JoinHandle<Result<(Vec<u8>, usize)>>) -> Result<(Vec<u8>, usize)> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("output reader thread panicked")),
    }
}

fn read_limited<R: Read>(mut reader: R, limit: usize) -> Result<(Vec<u8>, usize)> {
    let mut buf = Vec::new();
    let mut truncated = 0usize;
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk).context("read output")?;
        if n == 0 {
            break;
        }
        let keep = n.min(limit.saturating_sub(buf.len()));
        buf.extend_from_slice(&chunk[..keep]);
        truncated += n - keep;
    }

    Ok((buf, truncated))
}
