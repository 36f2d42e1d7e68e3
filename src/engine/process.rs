//! Child process execution with stderr capture.

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Result, ValidatorError};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Raw result of a finished child process
#[derive(Debug)]
pub struct Captured {
    pub status: ExitStatus,
    pub stderr: Vec<u8>,
}

/// Run `command` to completion and return everything it wrote to stderr.
///
/// Stdin and stdout are not used. With a `timeout`, a child still running
/// at the deadline is killed and `Timeout` is returned; the same deadline
/// bounds stderr collection, which a leftover grandchild can hold open. A
/// program that cannot be found maps to `RuntimeNotFound`.
pub fn run_capturing_stderr(mut command: Command, timeout: Option<Duration>) -> Result<Captured> {
    let program = command.get_program().to_string_lossy().into_owned();

    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ValidatorError::RuntimeNotFound {
                runtime: program.clone(),
            },
            _ => ValidatorError::launch(&program, e),
        })?;

    // Drain stderr on its own thread so a chatty child never blocks on a
    // full pipe while we wait for it.
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| ValidatorError::launch(&program, io::Error::other("stderr not captured")))?;
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = tx.send(stderr.read_to_end(&mut buf).map(|_| buf));
    });

    let reader_gone =
        || ValidatorError::launch(&program, io::Error::other("stderr reader stopped"));

    let (status, received) = match timeout {
        Some(limit) => {
            let deadline = Instant::now() + limit;
            let status = wait_with_deadline(&mut child, &program, deadline, limit)?;
            let remaining = deadline.saturating_duration_since(Instant::now());
            let received = match rx.recv_timeout(remaining) {
                Ok(received) => received,
                Err(RecvTimeoutError::Timeout) => {
                    log::warn!(
                        "{} exited but its stderr was still open after {:?}",
                        program,
                        limit
                    );
                    return Err(ValidatorError::Timeout { after: limit });
                }
                Err(RecvTimeoutError::Disconnected) => return Err(reader_gone()),
            };
            (status, received)
        }
        None => {
            let status = child
                .wait()
                .map_err(|e| ValidatorError::launch(&program, e))?;
            (status, rx.recv().map_err(|_| reader_gone())?)
        }
    };

    let stderr = received.map_err(|e| ValidatorError::launch(&program, e))?;
    Ok(Captured { status, stderr })
}

fn wait_with_deadline(
    child: &mut Child,
    program: &str,
    deadline: Instant,
    limit: Duration,
) -> Result<ExitStatus> {
    loop {
        if let Some(status) = child
            .try_wait()
            .map_err(|e| ValidatorError::launch(program, e))?
        {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            log::warn!("{} still running after {:?}, killing it", program, limit);
            if let Err(e) = child.kill() {
                log::warn!("Failed to kill {}: {}", program, e);
            }
            if let Err(e) = child.wait() {
                log::warn!("Failed to reap {}: {}", program, e);
            }
            return Err(ValidatorError::Timeout { after: limit });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Command {
        let mut command = Command::new("/bin/sh");
        command.arg("-c").arg(script);
        command
    }

    #[test]
    fn test_captures_stderr_not_stdout() {
        let captured = run_capturing_stderr(sh("echo out; echo err >&2"), None).unwrap();
        assert_eq!(String::from_utf8(captured.stderr).unwrap(), "err\n");
    }

    #[test]
    fn test_nonzero_exit_is_not_an_error() {
        let captured = run_capturing_stderr(sh("echo bad >&2; exit 1"), None).unwrap();
        assert!(!captured.status.success());
        assert_eq!(captured.stderr, b"bad\n");
    }

    #[test]
    fn test_missing_program_is_runtime_not_found() {
        let err = run_capturing_stderr(Command::new("/nonexistent/java"), None).unwrap_err();
        match err {
            ValidatorError::RuntimeNotFound { runtime } => assert_eq!(runtime, "/nonexistent/java"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_timeout_kills_child() {
        let started = Instant::now();
        let err = run_capturing_stderr(sh("exec sleep 10"), Some(Duration::from_millis(200)))
            .unwrap_err();
        assert!(matches!(err, ValidatorError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_timeout_covers_stderr_held_by_grandchild() {
        let started = Instant::now();
        let err = run_capturing_stderr(
            sh("sleep 6 & echo x >&2"),
            Some(Duration::from_millis(300)),
        )
        .unwrap_err();
        assert!(matches!(err, ValidatorError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_finishes_within_timeout() {
        let captured = run_capturing_stderr(sh("echo quick >&2"), Some(Duration::from_secs(10))).unwrap();
        assert_eq!(captured.stderr, b"quick\n");
    }
}
