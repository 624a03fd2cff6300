// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{InputFeeder, InputSource, OutputDevice, OutputDeviceExt, SessionIo,
            SignalSender, SignalSource, StdoutMock, TerminalDevice};
use std::sync::Arc;

/// The other ends of a mock [`SessionIo`]: push input bytes, raise signals, and look at
/// what the session wrote.
#[derive(Debug, Clone)]
pub struct SessionIoMock {
    pub feeder: InputFeeder,
    pub signal_sender: SignalSender,
    pub stdout_mock: StdoutMock,
}

pub trait SessionIoExt<D: TerminalDevice> {
    fn new_mock(device: Arc<D>) -> (SessionIo<D>, SessionIoMock);
}

impl<D: TerminalDevice> SessionIoExt<D> for SessionIo<D> {
    fn new_mock(device: Arc<D>) -> (SessionIo<D>, SessionIoMock) {
        let (input, feeder, input_closer) = InputSource::channel();
        let (signals, signal_sender, signal_stopper) = SignalSource::channel();
        let (output, stdout_mock) = OutputDevice::new_mock();
        let this = SessionIo {
            device,
            input,
            input_closer,
            signals,
            signal_stopper,
            output,
        };
        let mock = SessionIoMock {
            feeder,
            signal_sender,
            stdout_mock,
        };
        (this, mock)
    }
}

#[cfg(test)]
mod tests {
    use super::SessionIoExt;
    use crate::{ByteSource, FakeTerminal, SessionIo, SignalKind};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_mock_ends_are_connected() {
        let (mut io, mock) = SessionIo::new_mock(Arc::new(FakeTerminal::new()));

        mock.feeder.send(b"k".as_slice());
        assert_eq!(io.input.next_byte().await, Some(b'k'));

        mock.signal_sender.send(SignalKind::WindowChanged).await;
        assert_eq!(io.signals.recv().await, Some(SignalKind::WindowChanged));

        io.output.write_bytes(b"out").unwrap();
        assert_eq!(mock.stdout_mock.get_copy_of_buffer_as_string(), "out");
        assert!(io.output.is_mock);
    }
}
