//! Captured frame type.

use bytes::Bytes;
use pnet::util::MacAddr;

const ETHERNET_HEADER_LEN: usize = 14;
const VLAN_TAG_LEN: usize = 4;
const ETHERTYPE_VLAN: u16 = 0x8100;

/// A captured link-layer frame.
///
/// Only addressing metadata is ever read from it: hardware addresses,
/// EtherType and an optional 802.1Q tag. Payloads are never interpreted.
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Bytes,
}

impl Frame {
    /// Creates a new Frame from raw data.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Frame { data: data.into() }
    }

    pub fn destination(&self) -> Option<MacAddr> {
        self.mac_at(0)
    }

    pub fn source(&self) -> Option<MacAddr> {
        self.mac_at(6)
    }

    /// EtherType of the encapsulated protocol, looking past one VLAN tag.
    pub fn ether_type(&self) -> Option<u16> {
        match self.outer_ether_type()? {
            ETHERTYPE_VLAN => self.u16_at(ETHERNET_HEADER_LEN + 2),
            other => Some(other),
        }
    }

    /// 802.1Q VLAN identifier, when the frame is tagged.
    pub fn vlan_id(&self) -> Option<u16> {
        if self.outer_ether_type()? != ETHERTYPE_VLAN {
            return None;
        }
        if self.data.len() < ETHERNET_HEADER_LEN + VLAN_TAG_LEN {
            return None;
        }
        self.u16_at(ETHERNET_HEADER_LEN).map(|tci| tci & 0x0fff)
    }

    /// One-line addressing summary for logs.
    pub fn summary(&self) -> String {
        let mac = |m: Option<MacAddr>| m.map_or_else(|| "?".to_string(), |m| m.to_string());
        let mut line = format!(
            "{} -> {} type {}",
            mac(self.source()),
            mac(self.destination()),
            self.ether_type()
                .map_or_else(|| "?".to_string(), |t| format!("0x{t:04x}"))
        );
        if let Some(vlan) = self.vlan_id() {
            line.push_str(&format!(" vlan {vlan}"));
        }
        line
    }

    fn outer_ether_type(&self) -> Option<u16> {
        self.u16_at(12)
    }

    fn mac_at(&self, offset: usize) -> Option<MacAddr> {
        let b = self.data.get(offset..offset + 6)?;
        Some(MacAddr::new(b[0], b[1], b[2], b[3], b[4], b[5]))
    }

    fn u16_at(&self, offset: usize) -> Option<u16> {
        let b = self.data.get(offset..offset + 2)?;
        Some(u16::from_be_bytes([b[0], b[1]]))
    }
}
