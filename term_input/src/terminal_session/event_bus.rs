// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{DEBUG_TERM_INPUT_SHOW_PIPELINE, InputEvent};
use std::{pin::Pin,
          sync::{Mutex as StdMutex, PoisonError},
          task::{Context, Poll}};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// Returned by [`EventBus::publish`] once the bus is closed, or once the
/// [`EventStream`] was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
#[error("the event bus is closed")]
#[diagnostic(code(term_input::session::bus_closed))]
pub struct BusClosed;

/// Multi producer, single consumer queue of [`InputEvent`]s. The input pump and the
/// signal listener both publish into it. The consumer reads from the [`EventStream`].
///
/// Every event is delivered at most once, in the order in which [`Self::publish`] was
/// called. After [`Self::close`], publishing fails and the stream ends once it has
/// yielded the events that were already queued.
#[derive(Debug)]
pub struct EventBus {
    sender: StdMutex<Option<UnboundedSender<InputEvent>>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> (EventBus, EventStream) {
        let (sender, receiver) = unbounded_channel();
        let bus = EventBus {
            sender: StdMutex::new(Some(sender)),
        };
        (bus, EventStream { receiver })
    }

    /// # Errors
    ///
    /// Returns [`BusClosed`] if the bus was closed or the stream was dropped. The event
    /// is discarded.
    pub fn publish(&self, event: InputEvent) -> Result<(), BusClosed> {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(sender) = sender.as_ref() else {
            return Err(BusClosed);
        };

        DEBUG_TERM_INPUT_SHOW_PIPELINE.then(|| {
            tracing::trace!(message = "EventBus::publish", ?event);
        });

        sender.send(event).map_err(|_| BusClosed)
    }

    /// Idempotent. Returns `true` if this call closed the bus.
    pub fn close(&self) -> bool {
        let was_open = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some();

        if was_open {
            DEBUG_TERM_INPUT_SHOW_PIPELINE.then(|| {
                tracing::debug!(message = "EventBus::close");
            });
        }

        was_open
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_none_or(UnboundedSender::is_closed)
    }
}

/// The consuming end of the [`EventBus`]. Also a [`futures_core::Stream`].
#[derive(Debug)]
pub struct EventStream {
    receiver: UnboundedReceiver<InputEvent>,
}

impl EventStream {
    /// Returns `None` once the bus is closed and every queued event was yielded.
    pub async fn next(&mut self) -> Option<InputEvent> { self.receiver.recv().await }

    /// Doesn't wait. Returns `None` if nothing is queued right now.
    pub fn try_next(&mut self) -> Option<InputEvent> { self.receiver.try_recv().ok() }
}

impl futures_core::Stream for EventStream {
    type Item = InputEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KeyCode, SignalKind};
    use futures_util::StreamExt;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_publish_order_is_preserved() {
        let (bus, mut stream) = EventBus::new();
        bus.publish(KeyCode::Char('a').into()).unwrap();
        bus.publish(InputEvent::Signal(SignalKind::WindowChanged)).unwrap();
        bus.publish(KeyCode::Char('b').into()).unwrap();

        assert_eq!(stream.next().await, Some(KeyCode::Char('a').into()));
        assert_eq!(
            stream.next().await,
            Some(InputEvent::Signal(SignalKind::WindowChanged))
        );
        assert_eq!(stream.try_next(), Some(KeyCode::Char('b').into()));
        assert_eq!(stream.try_next(), None);
    }

    #[tokio::test]
    async fn test_close_drains_then_ends() {
        let (bus, mut stream) = EventBus::new();
        bus.publish(KeyCode::Enter.into()).unwrap();

        assert!(bus.close());
        assert!(!bus.close());
        assert!(bus.is_closed());
        assert_eq!(bus.publish(KeyCode::Tab.into()), Err(BusClosed));

        assert_eq!(stream.next().await, Some(KeyCode::Enter.into()));
        assert_eq!(stream.next().await, None);
        assert_eq!(stream.next().await, None);
    }

    #[test]
    fn test_dropped_stream_closes_bus() {
        let (bus, stream) = EventBus::new();
        drop(stream);
        assert!(bus.is_closed());
        assert_eq!(bus.publish(KeyCode::Tab.into()), Err(BusClosed));
    }

    #[tokio::test]
    async fn test_two_publishers_interleave_without_loss() {
        let (bus, stream) = EventBus::new();
        let bus = Arc::new(bus);

        let publishers = ['x', 'y'].map(|ch| {
            let bus = bus.clone();
            tokio::spawn(async move {
                for _ in 0..100 {
                    bus.publish(KeyCode::Char(ch).into()).unwrap();
                    tokio::task::yield_now().await;
                }
            })
        });
        for publisher in publishers {
            publisher.await.unwrap();
        }
        bus.close();

        let events: Vec<InputEvent> = stream.collect().await;
        assert_eq!(events.len(), 200);
        let count_of = |ch| {
            events
                .iter()
                .filter(|it| **it == InputEvent::from(KeyCode::Char(ch)))
                .count()
        };
        assert_eq!(count_of('x'), 100);
        assert_eq!(count_of('y'), 100);
    }
}
