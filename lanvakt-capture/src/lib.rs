//! lanvakt‑capture
//!
//! Provides the capture interface the classification engine samples through.
//! A query is a packet-filter expression plus a sampling window; the answer is
//! the set of frames that matched during that window.
//!
//! Implementations:
//! - `live`: pcap on a network interface
//! - `savefile`: pcap on a recorded trace
//! - `mock`: scripted answers for tests

pub mod adapter;
pub mod frame;
pub mod host;
pub mod live;
pub mod mock;
pub mod savefile;

pub use adapter::{CaptureAdapter, CaptureError, CaptureOutcome};
pub use frame::Frame;
pub use host::hardware_address;
pub use live::PcapCapture;
pub use mock::ScriptedCapture;
pub use savefile::SavefileCapture;
