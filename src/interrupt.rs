use crate::types::Decision;
use crate::Result;
use async_trait::async_trait;
use colored::*;
use log::warn;
use std::io::{BufRead, Write};

/// Something that completes when the operator asks to stop the running tool.
///
/// Called once per wait; the returned future may be dropped unfinished. A
/// request made while nobody is waiting should complete the next wait.
#[async_trait]
pub trait InterruptSource: Send {
    async fn interrupted(&mut self);
}

/// Ctrl-C on the controlling terminal.
///
/// The listener is installed once, so a Ctrl-C pressed while nothing is
/// waiting is delivered to the next wait instead of being lost.
#[derive(Debug)]
pub struct CtrlC {
    #[cfg(unix)]
    listener: Option<tokio::signal::unix::Signal>,
}

impl CtrlC {
    /// Must be called from inside the runtime
    #[cfg(unix)]
    pub fn new() -> Self {
        use tokio::signal::unix::{signal, SignalKind};

        let listener = match signal(SignalKind::interrupt()) {
            Ok(listener) => Some(listener),
            Err(e) => {
                warn!("Unable to listen for Ctrl-C: {}", e);
                None
            }
        };
        Self { listener }
    }

    #[cfg(not(unix))]
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for CtrlC {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InterruptSource for CtrlC {
    async fn interrupted(&mut self) {
        #[cfg(unix)]
        {
            if let Some(listener) = self.listener.as_mut() {
                if listener.recv().await.is_some() {
                    return;
                }
            }
        }
        #[cfg(not(unix))]
        {
            match tokio::signal::ctrl_c().await {
                Ok(()) => return,
                Err(e) => warn!("Unable to listen for Ctrl-C: {}", e),
            }
        }
        std::future::pending::<()>().await
    }
}

/// Never fires
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInterrupt;

#[async_trait]
impl InterruptSource for NoInterrupt {
    async fn interrupted(&mut self) {
        std::future::pending::<()>().await;
    }
}

/// Map one line of operator input to a decision. `None` means ask again.
pub fn interpret(answer: &str) -> Option<Decision> {
    match answer.trim().to_lowercase().as_str() {
        "" | "c" => Some(Decision::Continue),
        "a" => Some(Decision::Abort),
        _ => None,
    }
}

/// Asks the operator what to do after a tool was killed.
///
/// Reads from any `BufRead` so the prompt can be driven by canned input.
pub struct InterruptHandler<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InterruptHandler<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Block until the operator answers. End of input counts as abort.
    pub fn on_interrupt(&mut self, tool_name: &str) -> Result<Decision> {
        let killed = format!("{} has been killed!", tool_name);
        writeln!(self.output, "\n{}\n", killed.yellow())?;

        loop {
            write!(self.output, "Continue (c) or Abort (a) remaining processes?  c/a ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                warn!("No more operator input, aborting");
                writeln!(self.output, "\nAborting all processes!  Goodbye\n")?;
                return Ok(Decision::Abort);
            }

            match interpret(&line) {
                Some(Decision::Continue) => {
                    writeln!(self.output, "\nContinuing\n")?;
                    return Ok(Decision::Continue);
                }
                Some(Decision::Abort) => {
                    writeln!(self.output, "\nAborting all processes!  Goodbye\n")?;
                    return Ok(Decision::Abort);
                }
                None => {
                    let retry = "I don't know what you mean, try again!";
                    writeln!(self.output, "\n{}\n", retry.yellow())?;
                }
            }
        }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}
