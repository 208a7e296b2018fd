// mouse_sim/src/serial.rs

use crate::error::Result;
use mouse_core::error::LinkError;
use mouse_core::link::LinkTransport;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::fmt;
use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

/// UART link to the robot's microcontroller (8N1, no flow control).
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    path: String,
}

impl SerialTransport {
    /// Opens `path` with a short read timeout so polling never stalls a tick.
    pub fn open(path: &str, baud_rate: u32, timeout: Duration) -> Result<Self> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(timeout)
            .open()?;

        tracing::info!("Opened serial port {} at {} baud", path, baud_rate);
        Ok(Self {
            port,
            path: path.to_string(),
        })
    }
}

impl fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialTransport")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl LinkTransport for SerialTransport {
    fn write_frame(&mut self, frame: &[u8]) -> std::result::Result<(), LinkError> {
        self.port.write_all(frame)?;
        Ok(())
    }

    fn read_available(&mut self, buffer: &mut Vec<u8>) -> std::result::Result<usize, LinkError> {
        let pending = self
            .port
            .bytes_to_read()
            .map_err(|e| LinkError::Transport(e.to_string()))? as usize;
        if pending == 0 {
            return Ok(0);
        }

        let start = buffer.len();
        buffer.resize(start + pending, 0);
        match self.port.read(&mut buffer[start..]) {
            Ok(n) => {
                buffer.truncate(start + n);
                Ok(n)
            }
            Err(e) if e.kind() == ErrorKind::TimedOut => {
                buffer.truncate(start);
                Ok(0)
            }
            Err(e) => {
                buffer.truncate(start);
                Err(e.into())
            }
        }
    }
}
