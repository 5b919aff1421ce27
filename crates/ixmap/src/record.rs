//! The (address, label) pairs that make up the map.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which address field of a segment a record came from.
///
/// This names the column, not a parsed address: the text is never validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::Ipv4 => f.write_str("ipv4"),
            AddressFamily::Ipv6 => f.write_str("ipv6"),
        }
    }
}

/// One exchange address paired with the exchange name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IxRecord {
    /// Peering address as it appears on the page, trimmed.
    pub address: String,
    /// Exchange name, entity-decoded and trimmed.
    pub label: String,
    pub family: AddressFamily,
}

impl IxRecord {
    pub fn new(address: impl Into<String>, label: impl Into<String>, family: AddressFamily) -> Self {
        Self {
            address: address.into(),
            label: label.into(),
            family,
        }
    }
}

/// Renders the output line without its trailing newline.
impl fmt::Display for IxRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.address, self.label)
    }
}
