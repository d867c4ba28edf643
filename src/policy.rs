//! Prefix-length windows bounding how far addresses may be generalized.

use serde::{Deserialize, Serialize};

use crate::address::IpVersion;
use crate::error::IpaggError;

/// Inclusive range of prefix lengths a generalized range may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixWindow {
    pub min_prefix: u8,
    pub max_prefix: u8,
}

impl PrefixWindow {
    pub const fn new(min_prefix: u8, max_prefix: u8) -> Self {
        Self {
            min_prefix,
            max_prefix,
        }
    }

    /// Check whether a prefix length falls inside the window.
    pub fn allows(&self, prefix_len: u8) -> bool {
        (self.min_prefix..=self.max_prefix).contains(&prefix_len)
    }
}

/// One window per IP version, selected at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefixPolicy {
    pub ipv4: PrefixWindow,
    pub ipv6: PrefixWindow,
}

impl Default for PrefixPolicy {
    fn default() -> Self {
        Self {
            ipv4: PrefixWindow::new(16, 31),
            ipv6: PrefixWindow::new(19, 63),
        }
    }
}

impl PrefixPolicy {
    pub fn window(&self, version: IpVersion) -> PrefixWindow {
        match version {
            IpVersion::V4 => self.ipv4,
            IpVersion::V6 => self.ipv6,
        }
    }

    /// Reject windows that are inverted or exceed the address width.
    pub fn validate(&self) -> Result<(), IpaggError> {
        for (version, window) in [(IpVersion::V4, self.ipv4), (IpVersion::V6, self.ipv6)] {
            if window.min_prefix > window.max_prefix {
                return Err(IpaggError::Config(format!(
                    "IPv{} window is inverted: min_prefix {} > max_prefix {}",
                    version.number(),
                    window.min_prefix,
                    window.max_prefix
                )));
            }
            if window.max_prefix > version.bits() {
                return Err(IpaggError::InvalidPrefix {
                    prefix: window.max_prefix,
                    version: version.number(),
                });
            }
        }
        Ok(())
    }
}
