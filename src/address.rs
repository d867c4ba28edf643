//! Single addresses and CIDR blocks.
//!
//! [`AddressSpace`] wraps an [`IpNet`] and provides the containment, covering
//! and ordering operations the aggregator and the selection reducer rely on.
//! Equality, hashing and ordering all follow the canonical form: the network
//! address with host bits cleared, then the prefix length.

use ipnet::IpNet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::IpAddr;
use std::str::FromStr;

use crate::error::IpaggError;
use crate::policy::PrefixPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// Address width in bits.
    pub fn bits(self) -> u8 {
        match self {
            IpVersion::V4 => 32,
            IpVersion::V6 => 128,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            IpVersion::V4 => 4,
            IpVersion::V6 => 6,
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IPv{}", self.number())
    }
}

/// A single IP address or a CIDR range.
#[derive(Debug, Clone, Copy)]
pub struct AddressSpace {
    /// Canonical network (host bits cleared).
    net: IpNet,
    /// Network as written, host bits kept.
    written: IpNet,
}

impl AddressSpace {
    pub fn from_net(net: IpNet) -> Self {
        Self {
            net: net.trunc(),
            written: net,
        }
    }

    pub fn from_addr(addr: IpAddr) -> Self {
        Self::from_net(IpNet::from(addr))
    }

    /// Parse an address or CIDR string.
    ///
    /// A plain address becomes a /32 (IPv4) or /128 (IPv6) network, which is
    /// treated as a bare address rather than a range.
    ///
    /// # Examples
    /// ```
    /// use ipagg::address::AddressSpace;
    /// assert!(AddressSpace::parse("192.168.1.1").is_ok());
    /// assert!(AddressSpace::parse("2001:db8::/32").is_ok());
    /// assert!(AddressSpace::parse("example-user").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, IpaggError> {
        let trimmed = input.trim();
        if trimmed.contains('/') {
            trimmed
                .parse::<IpNet>()
                .map(Self::from_net)
                .map_err(|_| IpaggError::InvalidAddress(input.to_string()))
        } else {
            trimmed
                .parse::<IpAddr>()
                .map(Self::from_addr)
                .map_err(|_| IpaggError::InvalidAddress(input.to_string()))
        }
    }

    pub fn version(&self) -> IpVersion {
        match self.net {
            IpNet::V4(_) => IpVersion::V4,
            IpNet::V6(_) => IpVersion::V6,
        }
    }

    pub fn prefix_len(&self) -> u8 {
        self.net.prefix_len()
    }

    /// True for CIDR blocks, false for bare addresses.
    pub fn is_range(&self) -> bool {
        self.net.prefix_len() < self.net.max_prefix_len()
    }

    /// Stable form used for deduplication, ordering and equality.
    pub fn canonical_string(&self) -> String {
        if self.is_range() {
            self.net.to_string()
        } else {
            self.net.addr().to_string()
        }
    }

    /// The form as written, for display only.
    pub fn display_string(&self) -> String {
        if self.written.prefix_len() < self.written.max_prefix_len() {
            self.written.to_string()
        } else {
            self.written.addr().to_string()
        }
    }

    /// First and last address of a range; `None` for bare addresses.
    pub fn boundary_addresses(&self) -> Option<(IpAddr, IpAddr)> {
        self.is_range()
            .then(|| (self.net.network(), self.net.broadcast()))
    }

    /// Check whether `other` lies within this range or address.
    ///
    /// With `exclude_equivalent`, a canonically identical `other` does not match.
    pub fn contains(&self, other: &AddressSpace, exclude_equivalent: bool) -> bool {
        if exclude_equivalent && self == other {
            return false;
        }
        self.net.contains(&other.net)
    }

    pub fn is_within(&self, other: &AddressSpace, exclude_equivalent: bool) -> bool {
        other.contains(self, exclude_equivalent)
    }

    /// Smallest range containing both operands, if its prefix length is allowed
    /// by `policy` for this address's version.
    ///
    /// Returns `None` for operands of different versions.
    pub fn common_covering_range(
        &self,
        other: &AddressSpace,
        policy: &PrefixPolicy,
    ) -> Option<AddressSpace> {
        let shared = match (self.net, other.net) {
            (IpNet::V4(a), IpNet::V4(b)) => {
                let diff = u32::from(a.network()) ^ u32::from(b.network());
                diff.leading_zeros() as u8
            }
            (IpNet::V6(a), IpNet::V6(b)) => {
                let diff = u128::from(a.network()) ^ u128::from(b.network());
                diff.leading_zeros() as u8
            }
            _ => return None,
        };
        let prefix_len = shared
            .min(self.net.prefix_len())
            .min(other.net.prefix_len());

        if !policy.window(self.version()).allows(prefix_len) {
            return None;
        }
        IpNet::new(self.net.network(), prefix_len)
            .ok()
            .map(Self::from_net)
    }

    /// The range of the given prefix length containing this address.
    pub fn range_at_prefix(&self, prefix_len: u8) -> Result<AddressSpace, IpaggError> {
        IpNet::new(self.net.network(), prefix_len)
            .map(Self::from_net)
            .map_err(|_| IpaggError::InvalidPrefix {
                prefix: prefix_len,
                version: self.version().number(),
            })
    }
}

impl PartialEq for AddressSpace {
    fn eq(&self, other: &Self) -> bool {
        self.net == other.net
    }
}

impl Eq for AddressSpace {}

impl Hash for AddressSpace {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.net.hash(state);
    }
}

impl PartialOrd for AddressSpace {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AddressSpace {
    /// IPv4 before IPv6, then numeric network address, then prefix length.
    fn cmp(&self, other: &Self) -> Ordering {
        self.net.cmp(&other.net)
    }
}

impl fmt::Display for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_string())
    }
}

impl FromStr for AddressSpace {
    type Err = IpaggError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<IpAddr> for AddressSpace {
    fn from(addr: IpAddr) -> Self {
        Self::from_addr(addr)
    }
}

impl From<IpNet> for AddressSpace {
    fn from(net: IpNet) -> Self {
        Self::from_net(net)
    }
}

impl Serialize for AddressSpace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AddressSpace {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
