// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{DEBUG_TERM_INPUT_SHOW_PIPELINE, EventBus, InputEvent, OutputDevice,
            QUERY_WINDOW_SIZE, SignalKind, SignalSource, TerminalQueries};
use std::sync::Arc;

/// Why [`run_signal_listener`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerExit {
    Stopped,
    /// Every sender is gone.
    SourceEnded,
    BusClosed,
}

/// Publish every signal from `source` as [`InputEvent::Signal`].
///
/// On [`SignalKind::WindowChanged`] with `is_size_detection_enabled`, the size query is
/// re-armed and sent to the terminal before the signal is published, so the report
/// that follows the signal answers the new query.
pub async fn run_signal_listener(
    mut source: SignalSource,
    bus: Arc<EventBus>,
    output: OutputDevice,
    queries: Arc<TerminalQueries>,
    is_size_detection_enabled: bool,
) -> ListenerExit {
    let exit = loop {
        let Some(signal) = source.recv().await else {
            break if source.is_stopped() {
                ListenerExit::Stopped
            } else {
                ListenerExit::SourceEnded
            };
        };

        if signal == SignalKind::WindowChanged && is_size_detection_enabled {
            queries.rearm_size();
            output.write_control_sequence("window size query", QUERY_WINDOW_SIZE);
        }

        if bus.publish(InputEvent::Signal(signal)).is_err() {
            break ListenerExit::BusClosed;
        }
    };

    DEBUG_TERM_INPUT_SHOW_PIPELINE.then(|| {
        tracing::debug!(message = "run_signal_listener -> exit", ?exit);
    });

    exit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OutputDeviceExt, Size};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_resize_requeries_size_when_enabled() {
        let (bus, mut stream) = EventBus::new();
        let (output, stdout_mock) = OutputDevice::new_mock();
        let queries = Arc::new(TerminalQueries::new());
        queries.record_size(Size { rows: 24, columns: 80 });
        let (source, sender, _stopper) = SignalSource::channel();

        let listener = tokio::spawn(run_signal_listener(
            source,
            Arc::new(bus),
            output,
            queries.clone(),
            true,
        ));

        assert!(sender.send(SignalKind::WindowChanged).await);
        assert_eq!(
            stream.next().await,
            Some(InputEvent::Signal(SignalKind::WindowChanged))
        );
        assert_eq!(stdout_mock.count(QUERY_WINDOW_SIZE), 1);
        assert_eq!(queries.current_size(), None);
        assert_eq!(queries.last_reported_size(), Some(Size { rows: 24, columns: 80 }));

        drop(sender);
        assert_eq!(listener.await.unwrap(), ListenerExit::SourceEnded);
    }

    #[tokio::test]
    async fn test_other_signals_and_disabled_size_detection_write_nothing() {
        let (bus, mut stream) = EventBus::new();
        let (output, stdout_mock) = OutputDevice::new_mock();
        let (source, sender, stopper) = SignalSource::channel();

        let listener = tokio::spawn(run_signal_listener(
            source,
            Arc::new(bus),
            output,
            Arc::new(TerminalQueries::new()),
            false,
        ));

        sender.send(SignalKind::WindowChanged).await;
        sender.send(SignalKind::Other(10)).await;
        assert_eq!(
            stream.next().await,
            Some(InputEvent::Signal(SignalKind::WindowChanged))
        );
        assert_eq!(
            stream.next().await,
            Some(InputEvent::Signal(SignalKind::Other(10)))
        );
        assert!(stdout_mock.get_copy_of_buffer().is_empty());

        stopper.stop();
        assert_eq!(listener.await.unwrap(), ListenerExit::Stopped);
    }

    #[tokio::test]
    async fn test_closed_bus_stops_the_listener() {
        let (bus, _stream) = EventBus::new();
        bus.close();
        let (output, _stdout_mock) = OutputDevice::new_mock();
        let (source, sender, _stopper) = SignalSource::channel();
        sender.send(SignalKind::Other(1)).await;

        let exit = run_signal_listener(
            source,
            Arc::new(bus),
            output,
            Arc::new(TerminalQueries::new()),
            false,
        )
        .await;
        assert_eq!(exit, ListenerExit::BusClosed);
    }
}
