// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{ByteSource, DEBUG_TERM_INPUT_SHOW_PIPELINE, EventBus, EventDecoder, InputEvent,
            TerminalQueries};
use std::sync::Arc;

/// Why [`run_input_pump`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpExitReason {
    /// The byte source was closed or exhausted.
    InputEnded,
    /// Nobody is listening anymore.
    BusClosed,
}

/// Summary of an input pump run, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpExit {
    pub reason: PumpExitReason,
    pub forwarded_event_count: usize,
    /// Bytes that the decoder swallowed without producing an event (for example an
    /// unterminated OSC reply).
    pub absorbed_byte_count: usize,
}

/// Pull events out of `decoder` and publish them, until the input ends or the bus is
/// closed.
///
/// Window size and background color reports are recorded in `queries` before they are
/// published, so a consumer that sees the event and then asks the [`TerminalHandle`]
/// gets the same answer.
///
/// [`TerminalHandle`]: crate::TerminalHandle
pub async fn run_input_pump<S: ByteSource>(
    mut decoder: EventDecoder<S>,
    bus: Arc<EventBus>,
    queries: Arc<TerminalQueries>,
) -> PumpExit {
    let mut forwarded_event_count = 0;

    let reason = loop {
        let Some(event) = decoder.next_event().await else {
            break PumpExitReason::InputEnded;
        };

        match &event {
            InputEvent::WindowSize(size) => queries.record_size(*size),
            InputEvent::BackgroundColor(color) => {
                queries.record_background_color(*color);
            }
            _ => {}
        }

        if bus.publish(event).is_err() {
            break PumpExitReason::BusClosed;
        }
        forwarded_event_count += 1;
    };

    let exit = PumpExit {
        reason,
        forwarded_event_count,
        absorbed_byte_count: decoder.absorbed_byte_count(),
    };

    DEBUG_TERM_INPUT_SHOW_PIPELINE.then(|| {
        tracing::debug!(message = "run_input_pump -> exit", ?exit);
    });

    exit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InputSource, KeyCode, Rgb16, Size};
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;

    #[tokio::test]
    async fn test_reports_are_recorded_then_forwarded() {
        let (bus, mut stream) = EventBus::new();
        let queries = Arc::new(TerminalQueries::new());
        let bytes = b"a\x1b[40;120R\x1b]11;rgb:0000/0000/0000\x1b\\b".to_vec();

        let exit = run_input_pump(
            EventDecoder::new(VecDeque::from(bytes)),
            Arc::new(bus),
            queries.clone(),
        )
        .await;

        assert_eq!(
            exit,
            PumpExit {
                reason: PumpExitReason::InputEnded,
                forwarded_event_count: 4,
                absorbed_byte_count: 0,
            }
        );
        assert_eq!(queries.current_size(), Some(Size { rows: 40, columns: 120 }));
        assert_eq!(queries.background_color(), Some(Rgb16::new(0, 0, 0)));

        assert_eq!(stream.try_next(), Some(KeyCode::Char('a').into()));
        assert_eq!(
            stream.try_next(),
            Some(InputEvent::WindowSize(Size { rows: 40, columns: 120 }))
        );
        assert_eq!(
            stream.try_next(),
            Some(InputEvent::BackgroundColor(Rgb16::new(0, 0, 0)))
        );
        assert_eq!(stream.try_next(), Some(KeyCode::Char('b').into()));
    }

    #[tokio::test]
    async fn test_closed_bus_stops_the_pump() {
        let (bus, _stream) = EventBus::new();
        bus.close();
        let (source, feeder, _closer) = InputSource::channel();
        feeder.send(b"xyz".as_slice());

        let exit = run_input_pump(
            EventDecoder::new(source),
            Arc::new(bus),
            Arc::new(TerminalQueries::new()),
        )
        .await;
        assert_eq!(exit.reason, PumpExitReason::BusClosed);
        assert_eq!(exit.forwarded_event_count, 0);
    }

    #[tokio::test]
    async fn test_close_ends_a_waiting_pump() {
        let (bus, mut stream) = EventBus::new();
        let (source, feeder, closer) = InputSource::channel();
        let pump = tokio::spawn(run_input_pump(
            EventDecoder::new(source),
            Arc::new(bus),
            Arc::new(TerminalQueries::new()),
        ));

        feeder.send(b"q".as_slice());
        assert_eq!(stream.next().await, Some(KeyCode::Char('q').into()));

        closer.close();
        let exit = pump.await.unwrap();
        assert_eq!(exit.reason, PumpExitReason::InputEnded);
        assert_eq!(exit.forwarded_event_count, 1);
    }
}
