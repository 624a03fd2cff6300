// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{DEBUG_TERM_INPUT_SHOW_PIPELINE, DISABLE_BRACKETED_PASTE,
            DISABLE_FOCUS_REPORTING, ENABLE_BRACKETED_PASTE, ENABLE_FOCUS_REPORTING,
            EventBus, EventDecoder, EventStream, InputCloser, InputSource, ListenerExit,
            OutputDevice, PumpExit, QUERY_BACKGROUND_COLOR, QUERY_WINDOW_SIZE,
            RawModeGuard, ReleaseOutcome, SessionConfig, SignalSource, SignalStopper,
            TerminalDevice, TerminalHandle, TerminalQueries, TerminalSessionError,
            run_input_pump, run_signal_listener};
use std::{fmt::Debug,
          sync::Arc,
          time::{Duration, Instant}};
use tokio::{runtime::{Handle, RuntimeFlavor},
            task::JoinHandle};

/// Everything a [`TerminalSession`] talks to. [`TerminalSession::start`] builds this for
/// the real terminal. Tests build it with [`SessionIoExt::new_mock`].
///
/// [`SessionIoExt::new_mock`]: crate::SessionIoExt::new_mock
#[allow(missing_debug_implementations)]
pub struct SessionIo<D: TerminalDevice> {
    pub device: Arc<D>,
    pub input: InputSource,
    pub input_closer: InputCloser,
    pub signals: SignalSource,
    pub signal_stopper: SignalStopper,
    pub output: OutputDevice,
}

/// What [`TerminalSession::shutdown`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownReport {
    /// Teardown ran. Tasks that didn't end cleanly are listed, they didn't stop the
    /// teardown.
    Completed { failed_tasks: Vec<FailedTask> },
    /// An earlier call already did the teardown. Nothing was done.
    AlreadyShutDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailedTask {
    pub name: &'static str,
    pub reason: TaskFailureReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFailureReason {
    Panicked,
    Cancelled,
    /// Didn't finish within [`SessionConfig::join_timeout`], so it was aborted.
    TimedOut,
}

/// How long an aborted task gets to unwind before raw mode is released anyway.
const ABORT_GRACE_PERIOD: Duration = Duration::from_millis(100);

const INPUT_PUMP_TASK: &str = "input pump";
const SIGNAL_LISTENER_TASK: &str = "signal listener";

trait RawModeRelease: Send {
    fn release(&mut self) -> Result<ReleaseOutcome, TerminalSessionError>;
}

impl<D: TerminalDevice> RawModeRelease for RawModeGuard<D> {
    fn release(&mut self) -> Result<ReleaseOutcome, TerminalSessionError> {
        RawModeGuard::release(self)
    }
}

/// Owns the terminal for as long as it lives: raw mode, the two pipeline tasks, the two
/// helper threads (through their closers), and the event bus.
///
/// See the [crate documentation] for the pipeline, and for a usage example.
///
/// Teardown runs in this order, from [`Self::shutdown`] or else from [`Drop`]:
/// 1. Stop the signal source, close the input source, close the bus.
/// 2. Join the tasks ([`Drop`] aborts them instead).
/// 3. Write the disable codes for what was enabled.
/// 4. Release raw mode.
///
/// [crate documentation]: crate
#[allow(missing_debug_implementations)]
pub struct TerminalSession {
    config: SessionConfig,
    raw_mode: Option<Box<dyn RawModeRelease>>,
    bus: Arc<EventBus>,
    event_stream: Option<EventStream>,
    input_closer: InputCloser,
    signal_stopper: SignalStopper,
    input_pump: Option<JoinHandle<PumpExit>>,
    signal_listener: Option<JoinHandle<ListenerExit>>,
    output: OutputDevice,
    handle: TerminalHandle,
    is_shut_down: bool,
}

impl TerminalSession {
    /// Start a session on the process's `stdin` / `stdout`, forwarding `SIGWINCH` plus
    /// [`SessionConfig::extra_signals`].
    ///
    /// # Errors
    ///
    /// - [`TerminalSessionError::NotATty`] if `stdin` isn't a terminal.
    /// - [`TerminalSessionError::SessionAlreadyCaptured`] if another session is running.
    /// - [`TerminalSessionError::SystemCallFailed`] if the terminal attributes can't be
    ///   read or written.
    /// - [`TerminalSessionError::SpawnFailed`] if a helper thread can't be started.
    ///
    /// On error, the terminal is left as it was.
    ///
    /// # Panics
    ///
    /// If called outside of a tokio runtime.
    #[cfg(unix)]
    pub fn start(config: SessionConfig) -> Result<Self, TerminalSessionError> {
        let io = Self::os_session_io(&config)?;
        Self::start_with(config, io)
    }

    /// Start a session on the given devices and sources. On error, `io`'s sources are
    /// closed.
    ///
    /// # Errors
    ///
    /// See [`Self::start`], minus [`TerminalSessionError::SpawnFailed`].
    ///
    /// # Panics
    ///
    /// If called outside of a tokio runtime.
    pub fn start_with<D: TerminalDevice>(
        config: SessionConfig,
        io: SessionIo<D>,
    ) -> Result<Self, TerminalSessionError> {
        let (mut session, event_stream) = Self::launch(config, io)?;
        session.event_stream = Some(event_stream);
        Ok(session)
    }

    /// Start a session, run `body`, and shut the session down, even if `body` returned
    /// early with an error of its own. Returns what `body` returned.
    ///
    /// # Errors
    ///
    /// See [`Self::start`] and [`Self::shutdown`].
    #[cfg(unix)]
    pub async fn run_scoped<T>(
        config: SessionConfig,
        body: impl AsyncFnOnce(TerminalHandle, EventStream) -> T,
    ) -> Result<T, TerminalSessionError> {
        let io = Self::os_session_io(&config)?;
        Self::run_scoped_with(config, io, body).await
    }

    /// Like [`Self::run_scoped`], on the given devices and sources.
    ///
    /// # Errors
    ///
    /// See [`Self::start_with`] and [`Self::shutdown`].
    pub async fn run_scoped_with<D: TerminalDevice, T>(
        config: SessionConfig,
        io: SessionIo<D>,
        body: impl AsyncFnOnce(TerminalHandle, EventStream) -> T,
    ) -> Result<T, TerminalSessionError> {
        let (mut session, event_stream) = Self::launch(config, io)?;
        let result = body(session.handle(), event_stream).await;
        session.shutdown().await?;
        Ok(result)
    }

    /// The only consumer of the event stream. Returns `None` after the first call.
    pub fn take_event_stream(&mut self) -> Option<EventStream> { self.event_stream.take() }

    #[must_use]
    pub fn handle(&self) -> TerminalHandle { self.handle.clone() }

    #[must_use]
    pub fn config(&self) -> &SessionConfig { &self.config }

    #[must_use]
    pub fn is_shut_down(&self) -> bool { self.is_shut_down }

    /// Tear the session down (see [`TerminalSession`] for the order). Safe to call
    /// more than once, and after a task has failed.
    ///
    /// # Errors
    ///
    /// Returns [`TerminalSessionError::SystemCallFailed`] if the original terminal
    /// attributes can't be written back. Everything else was torn down by then.
    pub async fn shutdown(&mut self) -> Result<ShutdownReport, TerminalSessionError> {
        if self.is_shut_down {
            return Ok(ShutdownReport::AlreadyShutDown);
        }
        self.is_shut_down = true;

        DEBUG_TERM_INPUT_SHOW_PIPELINE.then(|| {
            tracing::debug!(message = "TerminalSession::shutdown -> start");
        });

        self.close_sources();

        let join_timeout = self.config.join_timeout;
        let mut failed_tasks = vec![];
        if let Some(task) = self.signal_listener.take()
            && let Some(failed) = join_task(SIGNAL_LISTENER_TASK, task, join_timeout).await
        {
            failed_tasks.push(failed);
        }
        if let Some(task) = self.input_pump.take()
            && let Some(failed) = join_task(INPUT_PUMP_TASK, task, join_timeout).await
        {
            failed_tasks.push(failed);
        }

        write_disable_sequences(&self.config, &self.output);
        self.release_raw_mode()?;

        DEBUG_TERM_INPUT_SHOW_PIPELINE.then(|| {
            tracing::debug!(message = "TerminalSession::shutdown -> done", ?failed_tasks);
        });

        Ok(ShutdownReport::Completed { failed_tasks })
    }
}

impl TerminalSession {
    #[cfg(unix)]
    fn os_session_io(
        config: &SessionConfig,
    ) -> Result<SessionIo<crate::StdinTerminal>, TerminalSessionError> {
        let device = Arc::new(crate::StdinTerminal);

        // Checked here as well as in `RawModeGuard::acquire`, so that no helper thread is
        // started for a pipe.
        if !device.is_terminal() {
            return Err(TerminalSessionError::NotATty);
        }

        let (input, input_closer) = crate::spawn_stdin_reader()?;
        let (signals, signal_stopper) =
            crate::spawn_os_signal_source(&config.extra_signals).inspect_err(|_| {
                input_closer.close();
            })?;

        Ok(SessionIo {
            device,
            input,
            input_closer,
            signals,
            signal_stopper,
            output: OutputDevice::new_stdout(),
        })
    }

    fn launch<D: TerminalDevice>(
        config: SessionConfig,
        io: SessionIo<D>,
    ) -> Result<(Self, EventStream), TerminalSessionError> {
        let SessionIo {
            device,
            input,
            input_closer,
            signals,
            signal_stopper,
            output,
        } = io;

        let raw_mode = match RawModeGuard::acquire(device) {
            Ok(raw_mode) => raw_mode,
            Err(error) => {
                input_closer.close();
                signal_stopper.stop();
                return Err(error);
            }
        };

        let (bus, event_stream) = EventBus::new();
        let bus = Arc::new(bus);
        let queries = Arc::new(TerminalQueries::new());

        let probe_device = raw_mode.device().clone();
        let handle = TerminalHandle::new(
            queries.clone(),
            output.clone(),
            Arc::new(move || probe_device.window_size()),
            &config,
        );

        let decoder = EventDecoder::new(input).with_esc_timeout(config.esc_timeout);
        let input_pump = tokio::spawn(run_input_pump(decoder, bus.clone(), queries.clone()));
        let signal_listener = tokio::spawn(run_signal_listener(
            signals,
            bus.clone(),
            output.clone(),
            queries,
            config.size_detection,
        ));

        // Both tasks are listening before any query goes out.
        write_enable_sequences(&config, &output);

        DEBUG_TERM_INPUT_SHOW_PIPELINE.then(|| {
            tracing::debug!(message = "TerminalSession::launch -> running", ?config);
        });

        let session = Self {
            config,
            raw_mode: Some(Box::new(raw_mode)),
            bus,
            event_stream: None,
            input_closer,
            signal_stopper,
            input_pump: Some(input_pump),
            signal_listener: Some(signal_listener),
            output,
            handle,
            is_shut_down: false,
        };

        Ok((session, event_stream))
    }

    fn close_sources(&self) {
        self.signal_stopper.stop();
        self.input_closer.close();
        self.bus.close();
    }

    fn release_raw_mode(&mut self) -> Result<(), TerminalSessionError> {
        match self.raw_mode.take() {
            Some(mut raw_mode) => raw_mode.release().map(|_outcome| ()),
            None => Ok(()),
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if self.is_shut_down {
            return;
        }
        self.is_shut_down = true;

        tracing::debug!(message = "TerminalSession::drop -> shutdown was never called");

        self.close_sources();
        if let Some(task) = self.signal_listener.take() {
            abort_and_wait_blocking(SIGNAL_LISTENER_TASK, &task);
        }
        if let Some(task) = self.input_pump.take() {
            abort_and_wait_blocking(INPUT_PUMP_TASK, &task);
        }
        write_disable_sequences(&self.config, &self.output);

        if let Err(error) = self.release_raw_mode() {
            tracing::warn!(
                message = "TerminalSession::drop -> failed to restore terminal attributes",
                ?error
            );
        }
    }
}

/// Order: paste, focus, then the queries, whose answers arrive as events.
fn write_enable_sequences(config: &SessionConfig, output: &OutputDevice) {
    if config.bracketed_paste {
        output.write_control_sequence("enable bracketed paste", ENABLE_BRACKETED_PASTE);
    }
    if config.focus_detection {
        output.write_control_sequence("enable focus reporting", ENABLE_FOCUS_REPORTING);
    }
    if config.size_detection {
        output.write_control_sequence("window size query", QUERY_WINDOW_SIZE);
    }
    if config.background_color_detection {
        output.write_control_sequence("background color query", QUERY_BACKGROUND_COLOR);
    }
}

/// Reverse of [`write_enable_sequences`]. Queries have nothing to undo.
fn write_disable_sequences(config: &SessionConfig, output: &OutputDevice) {
    if config.focus_detection {
        output.write_control_sequence("disable focus reporting", DISABLE_FOCUS_REPORTING);
    }
    if config.bracketed_paste {
        output.write_control_sequence("disable bracketed paste", DISABLE_BRACKETED_PASTE);
    }
}

async fn join_task<T: Debug>(
    name: &'static str,
    mut task: JoinHandle<T>,
    join_timeout: Duration,
) -> Option<FailedTask> {
    let reason = match tokio::time::timeout(join_timeout, &mut task).await {
        Ok(Ok(exit)) => {
            DEBUG_TERM_INPUT_SHOW_PIPELINE.then(|| {
                tracing::debug!(message = "TerminalSession -> task joined", name, ?exit);
            });
            return None;
        }
        Ok(Err(join_error)) if join_error.is_panic() => TaskFailureReason::Panicked,
        Ok(Err(_cancelled)) => TaskFailureReason::Cancelled,
        Err(_elapsed) => {
            abort_and_wait(name, &mut task).await;
            TaskFailureReason::TimedOut
        }
    };

    tracing::warn!(message = "TerminalSession -> task failed", name, ?reason);
    Some(FailedTask { name, reason })
}

/// `abort` only takes effect at the task's next `.await`. Until then it may still be
/// writing to the terminal.
async fn abort_and_wait<T>(name: &'static str, task: &mut JoinHandle<T>) {
    task.abort();
    if tokio::time::timeout(ABORT_GRACE_PERIOD, task).await.is_err() {
        tracing::warn!(message = "TerminalSession -> aborted task still running", name);
    }
}

/// Like [`abort_and_wait`], for [`Drop`].
fn abort_and_wait_blocking<T>(name: &'static str, task: &JoinHandle<T>) {
    task.abort();

    // Only another worker thread can be polling the task right now.
    let is_multi_thread = Handle::try_current()
        .is_ok_and(|it| it.runtime_flavor() == RuntimeFlavor::MultiThread);
    if !is_multi_thread {
        return;
    }

    let deadline = Instant::now() + ABORT_GRACE_PERIOD;
    while !task.is_finished() {
        if Instant::now() >= deadline {
            tracing::warn!(message = "TerminalSession -> aborted task still running", name);
            return;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
}
