// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{OutputDevice, StdoutMock};
use std::sync::{Arc, Mutex as StdMutex};

pub trait OutputDeviceExt {
    fn new_mock() -> (OutputDevice, StdoutMock);
}

impl OutputDeviceExt for OutputDevice {
    fn new_mock() -> (OutputDevice, StdoutMock) {
        let stdout_mock = StdoutMock::default();
        let this = OutputDevice {
            resource: Arc::new(StdMutex::new(stdout_mock.clone())),
            is_mock: true,
        };
        (this, stdout_mock)
    }
}

#[cfg(test)]
mod tests {
    use super::OutputDeviceExt;
    use crate::OutputDevice;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mock_output_device() {
        let (device, mock) = OutputDevice::new_mock();
        device.write_bytes(b"Hello, world!\r\n").unwrap();
        assert_eq!(mock.get_copy_of_buffer_as_string(), "Hello, world!\r\n");
        assert!(device.is_mock);
    }
}
