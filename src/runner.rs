use crate::interrupt::InterruptSource;
use crate::types::{ExecutionResult, RunOutcome};
use crate::{Result, ScanError};
use log::{debug, warn};
use std::io;
use std::process::Stdio;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::{Child, Command};

const CHUNK_SIZE: usize = 4096;

/// Runs one tool at a time as a child process.
///
/// Standard output is piped and forwarded to the sink chunk by chunk as it
/// arrives; standard error is inherited from the parent. When capture is on,
/// the same bytes are also kept for persistence.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    /// Run `argv` to completion or until `interrupt` fires.
    ///
    /// Any process that launches and exits counts as a success, whatever its
    /// exit code. Only a launch failure is returned as an error.
    pub async fn execute<W, I>(
        &self,
        tool_name: &str,
        argv: &[String],
        capture: bool,
        sink: &mut W,
        interrupt: &mut I,
    ) -> Result<RunOutcome>
    where
        W: AsyncWrite + Unpin,
        I: InterruptSource + ?Sized,
    {
        let mut child = spawn(tool_name, argv)?;
        let mut stdout = child.stdout.take().ok_or_else(|| ScanError::Launch {
            tool: tool_name.to_string(),
            source: io::Error::new(io::ErrorKind::Other, "stdout was not captured"),
        })?;

        let mut captured = Vec::new();
        let mut buf = [0u8; CHUNK_SIZE];
        let mut sink_open = true;
        let mut cancel = interrupt.interrupted();

        loop {
            tokio::select! {
                biased;
                _ = &mut cancel => {
                    terminate(&mut child, tool_name).await;
                    return Ok(RunOutcome::Interrupted);
                }
                read = stdout.read(&mut buf) => match read {
                    Ok(0) => break,
                    Ok(n) => {
                        let chunk = &buf[..n];
                        if sink_open {
                            if let Err(e) = forward(sink, chunk).await {
                                warn!("Unable to stream output of {}: {}", tool_name, e);
                                sink_open = false;
                            }
                        }
                        if capture {
                            captured.extend_from_slice(chunk);
                        }
                    }
                    Err(e) => {
                        warn!("Failed reading output of {}: {}", tool_name, e);
                        break;
                    }
                },
            }
        }

        let status = tokio::select! {
            biased;
            _ = &mut cancel => {
                terminate(&mut child, tool_name).await;
                return Ok(RunOutcome::Interrupted);
            }
            status = child.wait() => status.map_err(|source| ScanError::Launch {
                tool: tool_name.to_string(),
                source,
            })?,
        };

        if !status.success() {
            warn!("{} exited with {}", tool_name, status);
        }
        debug!("{} finished, {} bytes captured", tool_name, captured.len());

        Ok(RunOutcome::Finished(ExecutionResult {
            tool_name: tool_name.to_string(),
            exit_succeeded: true,
            exit_code: status.code(),
            captured_output: capture.then_some(captured),
        }))
    }
}

fn spawn(tool_name: &str, argv: &[String]) -> Result<Child> {
    let (program, args) = argv.split_first().ok_or_else(|| ScanError::Launch {
        tool: tool_name.to_string(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "empty command line"),
    })?;

    debug!("Spawning {} {:?}", program, args);
    Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ScanError::Launch {
            tool: tool_name.to_string(),
            source,
        })
}

async fn forward<W: AsyncWrite + Unpin>(sink: &mut W, chunk: &[u8]) -> io::Result<()> {
    sink.write_all(chunk).await?;
    sink.flush().await
}

async fn terminate(child: &mut Child, tool_name: &str) {
    // The child usually already got SIGINT from the terminal
    if let Err(e) = child.kill().await {
        debug!("Killing {} failed: {}", tool_name, e);
    }
}
