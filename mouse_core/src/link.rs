// mouse_core/src/link.rs

//! Byte framing for driving the robot from external hardware.
//!
//! Each tick the simulator sends the two sensor responses as a 3-byte frame
//! `[left, right, 0]`, with each response mapped to `1..=255`. The hardware
//! answers with zero-terminated frames carrying two wheel-speed bytes centred
//! on 128.

use crate::controller::{SteeringController, WheelCommand};
use crate::error::LinkError;
use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard};

pub const FRAME_TERMINATOR: u8 = 0;

fn encode_response(signal: f64) -> u8 {
    ((signal * 254.0).floor() + 1.0).clamp(0.0, 255.0) as u8
}

/// Encodes one tick's sensor responses, terminator included.
pub fn encode_command(left_response: f64, right_response: f64) -> [u8; 3] {
    [
        encode_response(left_response),
        encode_response(right_response),
        FRAME_TERMINATOR,
    ]
}

/// Maps a received speed byte onto roughly [-1, 1].
pub fn decode_speed(byte: u8) -> f64 {
    (f64::from(byte) - 128.0) / 127.0
}

/// Reassembles wheel commands from a byte stream that may arrive in pieces.
#[derive(Debug, Clone, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Bytes still waiting for a terminator.
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Consumes buffered frames and returns the most recent command.
    ///
    /// Frames are only cut while at least three bytes are buffered. A chunk
    /// without a terminator swallows the whole buffer. Chunks that are not
    /// exactly two bytes long are dropped.
    pub fn drain(&mut self) -> Option<WheelCommand> {
        let mut latest = None;
        while self.buffer.len() >= 3 {
            let (frame, rest) = match self.buffer.iter().position(|&b| b == FRAME_TERMINATOR) {
                Some(split) => (self.buffer[..split].to_vec(), self.buffer[split + 1..].to_vec()),
                None => (std::mem::take(&mut self.buffer), Vec::new()),
            };
            self.buffer = rest;

            if let [left, right] = frame.as_slice() {
                latest = Some(WheelCommand::new(decode_speed(*left), decode_speed(*right)));
            }
        }
        latest
    }
}

/// A byte pipe to the hardware.
pub trait LinkTransport: Debug + Send {
    /// Sends one complete frame, blocking until it is handed to the OS.
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), LinkError>;

    /// Appends whatever bytes are ready without waiting and returns how many
    /// were appended. Having nothing to read is `Ok(0)`.
    fn read_available(&mut self, buffer: &mut Vec<u8>) -> Result<usize, LinkError>;
}

/// Steering delegated to a device on the other end of a `LinkTransport`.
#[derive(Debug)]
pub struct HardwareController<T: LinkTransport> {
    transport: T,
    decoder: FrameDecoder,
    scratch: Vec<u8>,
}

impl<T: LinkTransport> HardwareController<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            decoder: FrameDecoder::new(),
            scratch: Vec::new(),
        }
    }

    fn exchange(
        &mut self,
        left_response: f64,
        right_response: f64,
    ) -> Result<Option<WheelCommand>, LinkError> {
        self.transport
            .write_frame(&encode_command(left_response, right_response))?;
        self.scratch.clear();
        self.transport.read_available(&mut self.scratch)?;
        self.decoder.push(&self.scratch);
        Ok(self.decoder.drain())
    }
}

impl<T: LinkTransport> SteeringController for HardwareController<T> {
    fn name(&self) -> &str {
        "hardware-link"
    }

    fn update(&mut self, left_response: f64, right_response: f64) -> WheelCommand {
        match self.exchange(left_response, right_response) {
            Ok(Some(command)) => command,
            // Nothing complete arrived this tick.
            Ok(None) => WheelCommand::STOP,
            Err(e) => {
                tracing::warn!("Hardware link exchange failed: {e}");
                WheelCommand::STOP
            }
        }
    }

    fn reset(&mut self) {
        self.decoder.clear();
    }
}

// --- In-memory transport ---

#[derive(Debug, Default)]
struct MemoryLinkInner {
    incoming: Vec<u8>,
    written: Vec<u8>,
    fail_writes: bool,
}

/// Loopback transport for tests and dry runs. Clones share the same buffers,
/// so a test can keep one handle while the controller owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    inner: Arc<Mutex<MemoryLinkInner>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryLinkInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queues bytes for the next `read_available`.
    pub fn inject(&self, bytes: &[u8]) {
        self.lock().incoming.extend_from_slice(bytes);
    }

    /// Everything written so far.
    pub fn written(&self) -> Vec<u8> {
        self.lock().written.clone()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }
}

impl LinkTransport for MemoryTransport {
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(LinkError::Transport("link is down".to_string()));
        }
        inner.written.extend_from_slice(frame);
        Ok(())
    }

    fn read_available(&mut self, buffer: &mut Vec<u8>) -> Result<usize, LinkError> {
        let mut inner = self.lock();
        let count = inner.incoming.len();
        buffer.append(&mut inner.incoming);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_encode_command() {
        assert_eq!(encode_command(0.0, 1.0), [1, 255, 0]);
        assert_eq!(encode_command(0.5, 0.25), [128, 64, 0]);
        // Out-of-range responses saturate.
        assert_eq!(encode_command(-3.0, 7.0), [0, 255, 0]);
    }

    #[test]
    fn test_decode_speed() {
        assert_eq!(decode_speed(128), 0.0);
        assert_eq!(decode_speed(255), 1.0);
        assert_abs_diff_eq!(decode_speed(1), -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(decode_speed(0), -128.0 / 127.0, epsilon = 1e-12);
    }

    #[test]
    fn test_decoder_keeps_last_command() {
        let mut decoder = FrameDecoder::new();
        decoder.push(&[255, 128, 0, 128, 255, 0]);
        let command = decoder.drain().unwrap();
        assert_eq!(command, WheelCommand::new(0.0, 1.0));
        assert!(decoder.pending().is_empty());
    }

    #[test]
    fn test_decoder_reassembles_fragments() {
        let mut decoder = FrameDecoder::new();
        decoder.push(&[255]);
        assert_eq!(decoder.drain(), None);
        decoder.push(&[1]);
        assert_eq!(decoder.drain(), None);
        decoder.push(&[0]);
        assert_eq!(decoder.drain(), Some(WheelCommand::new(1.0, decode_speed(1))));
    }

    #[test]
    fn test_decoder_short_tail_waits_for_more() {
        let mut decoder = FrameDecoder::new();
        // A full frame followed by a 2-byte fragment: the fragment stays buffered.
        decoder.push(&[128, 128, 0, 200, 50]);
        assert_eq!(decoder.drain(), Some(WheelCommand::STOP));
        assert_eq!(decoder.pending(), &[200, 50]);

        decoder.push(&[0]);
        let command = decoder.drain().unwrap();
        assert_abs_diff_eq!(command.left, 72.0 / 127.0, epsilon = 1e-12);
        assert_abs_diff_eq!(command.right, -78.0 / 127.0, epsilon = 1e-12);
    }

    #[test]
    fn test_decoder_drops_malformed_chunks() {
        let mut decoder = FrameDecoder::new();
        decoder.push(&[1, 2, 3, 0, 0, 9, 9, 9]);
        // [1,2,3] is too long, [] is empty, [9,9,9] has no terminator and is swallowed.
        assert_eq!(decoder.drain(), None);
        assert!(decoder.pending().is_empty());
    }

    #[test]
    fn test_hardware_controller_round_trip() {
        let link = MemoryTransport::new();
        let mut controller = HardwareController::new(link.clone());

        link.inject(&[255, 1, 0]);
        let command = controller.update(0.5, 0.0);
        assert_eq!(link.written(), vec![128, 1, 0]);
        assert_eq!(command.left, 1.0);
        assert_abs_diff_eq!(command.right, -1.0, epsilon = 1e-12);

        // Silence on the wire is a stop, not an error.
        assert_eq!(controller.update(0.5, 0.0), WheelCommand::STOP);
        assert_eq!(link.written().len(), 6);
    }

    #[test]
    fn test_hardware_controller_stops_on_transport_error() {
        let link = MemoryTransport::new();
        let mut controller = HardwareController::new(link.clone());
        link.set_fail_writes(true);
        link.inject(&[255, 255, 0]);
        assert_eq!(controller.update(0.2, 0.2), WheelCommand::STOP);
    }

    #[test]
    fn test_reset_discards_partial_frames() {
        let link = MemoryTransport::new();
        let mut controller = HardwareController::new(link.clone());
        link.inject(&[200, 200]);
        controller.update(0.0, 0.0);
        controller.reset();

        link.inject(&[0]);
        // Only the lone terminator is buffered now: fewer than three bytes.
        assert_eq!(controller.update(0.0, 0.0), WheelCommand::STOP);
    }
}
