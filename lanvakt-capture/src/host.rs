use pnet::datalink::{self, NetworkInterface};
use tracing::debug;

use crate::adapter::CaptureError;

/// Reads the hardware address of `interface` from the operating system.
/// Whether the address is usable as a host identity is up to the caller.
pub fn hardware_address(interface: &str) -> Result<[u8; 6], CaptureError> {
    address_from(&datalink::interfaces(), interface)
}

fn address_from(
    interfaces: &[NetworkInterface],
    interface: &str,
) -> Result<[u8; 6], CaptureError> {
    let unavailable = |reason: &str| CaptureError::InterfaceUnavailable {
        interface: interface.to_string(),
        reason: reason.to_string(),
    };

    let iface = interfaces
        .iter()
        .find(|i| i.name == interface)
        .ok_or_else(|| unavailable("no such interface"))?;
    let mac = iface
        .mac
        .ok_or_else(|| unavailable("interface has no hardware address"))?;

    debug!(interface, %mac, "Read hardware address");
    Ok(mac.octets())
}
