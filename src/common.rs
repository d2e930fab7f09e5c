//! Address-family dispatch shared by the tagged entry points.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::error::CryptoPanError;

/// The address families the anonymizer understands.
///
/// Typed callers cannot name any other family; layers that dispatch from
/// strings (configuration files, record rewriters) go through [`FromStr`]
/// and get [`CryptoPanError::InvalidFamily`] for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// IPv4, 4 bytes in network byte order.
    V4,
    /// IPv6, 16 bytes in network byte order.
    V6,
}

impl Family {
    /// Width of an address of this family in bytes.
    pub const fn width(self) -> usize {
        match self {
            Family::V4 => 4,
            Family::V6 => 16,
        }
    }

    /// The family of a parsed address value.
    pub const fn of(ip: &IpAddr) -> Family {
        match ip {
            IpAddr::V4(_) => Family::V4,
            IpAddr::V6(_) => Family::V6,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::V4 => f.write_str("ipv4"),
            Family::V6 => f.write_str("ipv6"),
        }
    }
}

impl FromStr for Family {
    type Err = CryptoPanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "4" | "v4" | "ipv4" | "inet" => Ok(Family::V4),
            "6" | "v6" | "ipv6" | "inet6" => Ok(Family::V6),
            _ => Err(CryptoPanError::InvalidFamily),
        }
    }
}
