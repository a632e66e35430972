use crate::config::RunConfig;
use crate::display::DisplayManager;
use crate::interrupt::{InterruptHandler, InterruptSource};
use crate::output::OutputStore;
use crate::runner::ProcessRunner;
use crate::target;
use crate::tools::ToolRegistry;
use crate::types::{Decision, ExecutionResult, RunOutcome, TargetDescriptor};
use crate::utils::time::elapsed_since;
use crate::{Result, ScanError};
use log::{debug, info, warn};
use std::io::{self, BufRead, Write};
use std::time::Instant;
use tokio::io::AsyncWrite;

/// Where the batch currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    ParsingTarget,
    ResolvingHost,
    RunningTool,
    AwaitingDecision,
    NextTarget,
    Done,
    Aborted,
}

/// Walks the run queue target by target and tool by tool. Only one child
/// process is ever alive at a time.
pub struct BatchDispatcher<R, W> {
    config: RunConfig,
    registry: ToolRegistry,
    runner: ProcessRunner,
    /// Lent to the blocking prompt while it waits for an answer
    interrupts: Option<InterruptHandler<R, W>>,
    store: Option<OutputStore>,
    display: DisplayManager,
    state: DispatchState,
}

impl<R, W> BatchDispatcher<R, W>
where
    R: BufRead + Send + 'static,
    W: Write + Send + 'static,
{
    pub fn new(
        config: RunConfig,
        interrupts: InterruptHandler<R, W>,
        display: DisplayManager,
    ) -> Self {
        let registry = ToolRegistry::with_binaries(config.binaries.clone());
        let store = config.output_dir.clone().map(OutputStore::new);

        Self {
            config,
            registry,
            runner: ProcessRunner::new(),
            interrupts: Some(interrupts),
            store,
            display,
            state: DispatchState::Idle,
        }
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    fn transition(&mut self, next: DispatchState) {
        debug!("{:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Run the whole batch. Tool output is streamed to `sink`.
    ///
    /// Returns an error only for the fatal cases: a malformed or unresolvable
    /// target, an interruption outside a tool, or an operator abort.
    pub async fn run<O, I>(&mut self, sink: &mut O, signal: &mut I) -> Result<()>
    where
        O: AsyncWrite + Unpin,
        I: InterruptSource + ?Sized,
    {
        let started = Instant::now();
        let mut queue = std::mem::take(&mut self.config.queue);
        info!("Starting batch of {} targets", queue.len());

        while let Some(raw) = queue.pop_front() {
            if let Err(e) = self.process_target(&raw, sink, signal).await {
                self.transition(DispatchState::Aborted);
                return Err(e);
            }
            self.transition(DispatchState::NextTarget);
        }

        self.transition(DispatchState::Done);
        let elapsed = elapsed_since(started);
        self.display.print_success(&format!("All processes finished! ({})", elapsed));
        Ok(())
    }

    async fn process_target<O, I>(&mut self, raw: &str, sink: &mut O, signal: &mut I) -> Result<()>
    where
        O: AsyncWrite + Unpin,
        I: InterruptSource + ?Sized,
    {
        self.transition(DispatchState::ParsingTarget);
        let descriptor = match target::parse(raw) {
            Ok(descriptor) => descriptor,
            Err(e) if e.is_recoverable() => {
                self.display.print_error(&e.to_string());
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        self.display.print_section_header(&format!("Target: {}", descriptor));

        self.transition(DispatchState::ResolvingHost);
        tokio::select! {
            biased;
            _ = signal.interrupted() => return Err(ScanError::Interrupted),
            resolved = target::resolve(&descriptor.hostname) => resolved?,
        }

        let applicable = self
            .registry
            .applicable_tools(&self.config.requested_tools, &descriptor);
        for tool in &applicable.tls_skipped {
            self.display.print_warning(&format!(
                "{} will be skipped because https is not in use!",
                tool
            ));
        }
        for tool in &applicable.unknown {
            warn!("Unknown tool {} requested", tool);
            self.display
                .print_warning(&format!("I don't know what to do with {}. I'll skip it!", tool));
        }

        for tool in &applicable.tools {
            self.run_tool(tool, &descriptor, sink, signal).await?;
        }

        pending_interrupt(signal).await
    }

    async fn run_tool<O, I>(
        &mut self,
        tool: &str,
        descriptor: &TargetDescriptor,
        sink: &mut O,
        signal: &mut I,
    ) -> Result<()>
    where
        O: AsyncWrite + Unpin,
        I: InterruptSource + ?Sized,
    {
        // Ctrl-C between tools ends the batch like any interruption outside a tool
        pending_interrupt(signal).await?;

        let proxy = self.config.proxy.as_deref();
        let Some(argv) = self.registry.build(tool, descriptor, proxy) else {
            return Ok(());
        };

        self.transition(DispatchState::RunningTool);
        self.display.print_command(&argv);

        let capture = self.store.is_some();
        let result = match self.runner.execute(tool, &argv, capture, sink, signal).await {
            Ok(RunOutcome::Finished(result)) => result,
            Ok(RunOutcome::Interrupted) => return self.await_decision(tool, signal).await,
            Err(e) => {
                self.display
                    .print_warning(&format!("{}! I will continue with the next process", e));
                ExecutionResult::failed(tool)
            }
        };

        self.persist(descriptor, result).await;
        Ok(())
    }

    /// Ask the operator whether to go on. A second interruption while the
    /// prompt is waiting ends the batch.
    async fn await_decision<I>(&mut self, tool: &str, signal: &mut I) -> Result<()>
    where
        I: InterruptSource + ?Sized,
    {
        self.transition(DispatchState::AwaitingDecision);
        let mut handler = self.interrupts.take().ok_or(ScanError::Interrupted)?;

        let tool_name = tool.to_string();
        let prompt = tokio::task::spawn_blocking(move || {
            let decision = handler.on_interrupt(&tool_name);
            (handler, decision)
        });

        let decision = tokio::select! {
            biased;
            _ = signal.interrupted() => return Err(ScanError::Interrupted),
            joined = prompt => {
                let (handler, decision) =
                    joined.map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
                self.interrupts = Some(handler);
                decision?
            }
        };

        match decision {
            Decision::Continue => {
                self.transition(DispatchState::RunningTool);
                Ok(())
            }
            Decision::Abort => Err(ScanError::Aborted),
        }
    }

    async fn persist(&self, descriptor: &TargetDescriptor, result: ExecutionResult) {
        if !result.exit_succeeded {
            return;
        }

        if let (Some(store), Some(output)) = (&self.store, result.captured_output.as_deref()) {
            if let Err(e) = store.write(&descriptor.hostname, &result.tool_name, output).await {
                self.display.print_warning(&format!("{}, no output will be written!", e));
            }
        }

        self.display.print_success(&format!("{} ran successfully!", result.tool_name));
    }
}

/// `Err(Interrupted)` if an interruption is already waiting, without blocking
async fn pending_interrupt<I>(signal: &mut I) -> Result<()>
where
    I: InterruptSource + ?Sized,
{
    tokio::select! {
        biased;
        _ = signal.interrupted() => Err(ScanError::Interrupted),
        _ = std::future::ready(()) => Ok(()),
    }
}
