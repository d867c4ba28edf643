//! Per-address usage records fed to the aggregator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::address::AddressSpace;
use crate::error::IpaggError;

/// Activity observed from a single address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct UsageRecord {
    #[serde(rename = "ip")]
    address: AddressSpace,
    users: BTreeSet<String>,
    action_count: u64,
    all_action_count: u64,
}

/// Input form of a record, before the address is checked.
#[derive(Debug, Deserialize)]
struct RawRecord {
    ip: AddressSpace,
    #[serde(default)]
    users: BTreeSet<String>,
    #[serde(default)]
    action_count: u64,
    #[serde(default)]
    all_action_count: u64,
}

impl TryFrom<RawRecord> for UsageRecord {
    type Error = IpaggError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        UsageRecord::new(raw.ip, raw.users, raw.action_count, raw.all_action_count)
    }
}

impl UsageRecord {
    /// Build a record; the address must not be a range.
    pub fn new<I, S>(
        address: AddressSpace,
        users: I,
        action_count: u64,
        all_action_count: u64,
    ) -> Result<Self, IpaggError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if address.is_range() {
            return Err(IpaggError::RangeNotAddress(address.canonical_string()));
        }
        Ok(Self {
            address,
            users: users.into_iter().map(Into::into).collect(),
            action_count,
            all_action_count,
        })
    }

    pub fn address(&self) -> &AddressSpace {
        &self.address
    }

    pub fn users(&self) -> &BTreeSet<String> {
        &self.users
    }

    pub fn action_count(&self) -> u64 {
        self.action_count
    }

    pub fn all_action_count(&self) -> u64 {
        self.all_action_count
    }
}
