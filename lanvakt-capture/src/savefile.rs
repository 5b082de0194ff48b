use std::path::{Path, PathBuf};

use bytes::Bytes;
use lanvakt_core::SamplingWindow;
use pcap::Capture;
use tracing::debug;

use crate::adapter::{CaptureAdapter, CaptureError, CaptureOutcome};
use crate::frame::Frame;

/// Replays a recorded `.pcap` trace instead of sampling an interface.
///
/// Every query re-reads the whole file with the query's filter applied, so
/// the cascade sees the same traffic for each rule. The window timeout does
/// not apply; the window's interface only appears in logs.
#[derive(Debug, Clone)]
pub struct SavefileCapture {
    path: PathBuf,
    frame_limit: usize,
}

impl SavefileCapture {
    pub fn new<P: AsRef<Path>>(path: P, frame_limit: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            frame_limit: frame_limit.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CaptureAdapter for SavefileCapture {
    fn capture(
        &self,
        filter: &str,
        window: &SamplingWindow,
    ) -> Result<CaptureOutcome, CaptureError> {
        let mut cap =
            Capture::from_file(&self.path).map_err(|e| CaptureError::InterfaceUnavailable {
                interface: self.path.display().to_string(),
                reason: e.to_string(),
            })?;
        cap.filter(filter, true)
            .map_err(|e| CaptureError::FilterInvalid {
                filter: filter.to_string(),
                reason: e.to_string(),
            })?;

        let mut frames = Vec::new();
        while frames.len() < self.frame_limit {
            match cap.next_packet() {
                Ok(packet) => frames.push(Frame::new(Bytes::copy_from_slice(packet.data))),
                Err(pcap::Error::NoMorePackets) => break,
                Err(e) => return Err(CaptureError::Read(e.to_string())),
            }
        }

        debug!(
            file = %self.path.display(),
            label = %window.interface,
            filter,
            frames = frames.len(),
            "Savefile query finished"
        );
        Ok(CaptureOutcome { frames })
    }
}
