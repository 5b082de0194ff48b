use std::thread;
use std::time::{Duration, Instant};

use bytes::Bytes;
use lanvakt_core::SamplingWindow;
use pcap::{Capture, Device};
use tracing::{debug, trace};

use crate::adapter::{CaptureAdapter, CaptureError, CaptureOutcome};
use crate::frame::Frame;

/// Idle poll interval of the non-blocking read loop.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Live capture on a network interface through libpcap.
///
/// Each query opens a fresh handle, compiles the filter into it and reads
/// until the window closes or `frame_limit` frames were collected.
#[derive(Debug, Clone)]
pub struct PcapCapture {
    promiscuous: bool,
    snaplen: i32,
    frame_limit: usize,
}

impl PcapCapture {
    pub fn new(promiscuous: bool, snaplen: i32, frame_limit: usize) -> Self {
        Self {
            promiscuous,
            snaplen,
            frame_limit: frame_limit.max(1),
        }
    }

    /// Names of all devices libpcap can open.
    pub fn device_names() -> Result<Vec<String>, CaptureError> {
        Device::list()
            .map(|devices| devices.into_iter().map(|d| d.name).collect())
            .map_err(|e| CaptureError::Read(e.to_string()))
    }

    fn open(&self, interface: &str) -> Result<Capture<pcap::Active>, CaptureError> {
        let unavailable = |reason: String| CaptureError::InterfaceUnavailable {
            interface: interface.to_string(),
            reason,
        };

        // List available devices and select the one matching the interface name.
        let device = Device::list()
            .map_err(|e| unavailable(e.to_string()))?
            .into_iter()
            .find(|d| d.name == interface)
            .ok_or_else(|| unavailable("no such device".into()))?;

        Capture::from_device(device)
            .map_err(|e| unavailable(e.to_string()))?
            .promisc(self.promiscuous)
            .snaplen(self.snaplen)
            .immediate_mode(true)
            .open()
            .and_then(|cap| cap.setnonblock())
            .map_err(|e| unavailable(e.to_string()))
    }
}

impl Default for PcapCapture {
    fn default() -> Self {
        Self::new(true, 65535, 1)
    }
}

impl CaptureAdapter for PcapCapture {
    fn capture(
        &self,
        filter: &str,
        window: &SamplingWindow,
    ) -> Result<CaptureOutcome, CaptureError> {
        let mut cap = self.open(&window.interface)?;
        cap.filter(filter, true)
            .map_err(|e| CaptureError::FilterInvalid {
                filter: filter.to_string(),
                reason: e.to_string(),
            })?;

        let deadline = Instant::now() + window.timeout;
        let mut frames = Vec::new();

        while frames.len() < self.frame_limit && Instant::now() < deadline {
            match cap.next_packet() {
                Ok(packet) => {
                    trace!("Captured frame: {} bytes", packet.data.len());
                    frames.push(Frame::new(Bytes::copy_from_slice(packet.data)));
                }
                Err(pcap::Error::TimeoutExpired) => {
                    // Nothing buffered right now.
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => return Err(CaptureError::Read(e.to_string())),
            }
        }

        debug!(
            interface = %window.interface,
            filter,
            frames = frames.len(),
            "Capture query finished"
        );
        Ok(CaptureOutcome { frames })
    }
}
