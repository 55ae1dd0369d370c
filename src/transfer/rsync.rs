use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};

use log::{debug, warn};

use crate::error::{CollectorError, CollectorResult};
use crate::transfer::{TransferInvocation, TransferOutput, TransferProvider};

type StdoutReader = JoinHandle<io::Result<Vec<u8>>>;

/// Runs transfer commands as child processes.
///
/// Both pipes are drained before the child is waited on: stdout on a helper
/// thread, stderr on the calling thread until EOF. A child that fills either
/// pipe buffer can therefore never block forever.
#[derive(Debug, Default, Clone, Copy)]
pub struct RsyncProvider;

impl RsyncProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TransferProvider for RsyncProvider {
    fn run(&self, invocation: &TransferInvocation) -> CollectorResult<TransferOutput> {
        let mut child = Command::new(invocation.program())
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                CollectorError::Transfer(format!("failed to start {}: {}", invocation.program(), e))
            })?;

        let stdout_reader = spawn_stdout_reader(&mut child)?;
        let drained = match child.stderr.take() {
            Some(pipe) => drain(&mut child, stdout_reader, pipe),
            None => drain(&mut child, stdout_reader, io::empty()),
        };
        let (stdout, stderr) = drained.map_err(|e| {
            CollectorError::Transfer(format!(
                "failed to read output of {}: {}",
                invocation.program(),
                e
            ))
        })?;

        let status = child.wait().map_err(|e| {
            CollectorError::Transfer(format!("failed to wait for {}: {}", invocation.program(), e))
        })?;
        debug!("{} exited with {}", invocation.program(), status);

        Ok(TransferOutput {
            stdout,
            stderr,
            success: status.success(),
        })
    }
}

fn spawn_stdout_reader(child: &mut Child) -> CollectorResult<Option<StdoutReader>> {
    let Some(mut stdout) = child.stdout.take() else {
        return Ok(None);
    };
    thread::Builder::new()
        .name("transfer-stdout".to_string())
        .spawn(move || {
            let mut buf = Vec::new();
            stdout.read_to_end(&mut buf).map(|_| buf)
        })
        .map(Some)
        .map_err(|e| {
            let _ = child.kill();
            let _ = child.wait();
            CollectorError::Transfer(format!("failed to spawn reader thread: {}", e))
        })
}

fn join_reader(handle: StdoutReader) -> io::Result<Vec<u8>> {
    handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::new(io::ErrorKind::Other, "stdout reader panicked")))
}

/// Read stderr to EOF, then collect stdout from the reader thread.
///
/// On a read error the child is killed before anything else is joined, so
/// the stdout thread sees EOF instead of waiting for the child to finish.
fn drain<R: Read>(
    child: &mut Child,
    stdout_reader: Option<StdoutReader>,
    mut stderr_pipe: R,
) -> io::Result<(Vec<u8>, Vec<u8>)> {
    let mut stderr = Vec::new();
    if let Err(e) = stderr_pipe.read_to_end(&mut stderr) {
        warn!("Reading stderr of child {} failed, killing it: {}", child.id(), e);
        let _ = child.kill();
        if let Some(handle) = stdout_reader {
            let _ = join_reader(handle);
        }
        let _ = child.wait();
        return Err(e);
    }

    let stdout = match stdout_reader {
        Some(handle) => join_reader(handle),
        None => Ok(Vec::new()),
    };
    match stdout {
        Ok(stdout) => Ok((stdout, stderr)),
        Err(e) => {
            warn!("Reading stdout of child {} failed, killing it: {}", child.id(), e);
            let _ = child.kill();
            let _ = child.wait();
            Err(e)
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    struct BrokenPipe;

    impl Read for BrokenPipe {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    fn sh(script: &str) -> TransferInvocation {
        TransferInvocation::Shell {
            shell: "sh".to_string(),
            script: script.to_string(),
        }
    }

    #[test]
    fn test_captures_both_streams() {
        let output = RsyncProvider::new()
            .run(&sh("echo out; echo err 1>&2"))
            .unwrap();
        assert!(output.success);
        assert_eq!(output.stdout, b"out\n");
        assert_eq!(output.stderr, b"err\n");
    }

    #[test]
    fn test_large_output_does_not_deadlock() {
        // Well past the default 64KiB pipe buffer on both streams.
        let output = RsyncProvider::new()
            .run(&sh(
                "head -c 300000 /dev/zero; head -c 300000 /dev/zero 1>&2",
            ))
            .unwrap();
        assert!(output.success);
        assert_eq!(output.stdout.len(), 300000);
        assert_eq!(output.stderr.len(), 300000);
    }

    #[test]
    fn test_non_zero_exit_is_reported() {
        let output = RsyncProvider::new().run(&sh("exit 3")).unwrap();
        assert!(!output.success);
    }

    #[test]
    fn test_missing_program_is_error() {
        let invocation = TransferInvocation::Direct {
            program: "/nonexistent/rsync".to_string(),
            args: vec![],
        };
        assert!(matches!(
            RsyncProvider::new().run(&invocation),
            Err(CollectorError::Transfer(_))
        ));
    }

    #[test]
    fn test_stderr_error_kills_child_before_joining_stdout() {
        let mut child = Command::new("sleep")
            .arg("30")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();
        let reader = spawn_stdout_reader(&mut child).unwrap();

        let started = Instant::now();
        let err = drain(&mut child, reader, BrokenPipe).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(child.try_wait().unwrap().is_some());
    }
}
