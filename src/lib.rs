//! # ipagg - IP range aggregation and selection reduction
//!
//! Summarizes large sets of per-address activity records into a minimal,
//! hierarchical set of covering CIDR ranges, and trims user-chosen selections
//! of accounts, addresses and ranges before a bulk action is taken on them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         ipagg                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: aggregate, reduce, categorize, init       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml)                                        │
//! │    └── Prefix windows, temporary-account prefix, output     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Aggregator                                                 │
//! │    ├── Level building under a prefix-length policy          │
//! │    └── Overflow recovery from earlier levels                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Targets                                                    │
//! │    ├── reduce: drop entries covered by a selected range     │
//! │    └── categorize: accounts / temporary / IP relationships  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Address space (ipnet)                                      │
//! │    └── Containment, common covering range, total order      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```
//! use ipagg::aggregator::RangeAggregator;
//! use ipagg::records::UsageRecord;
//!
//! let records: Vec<UsageRecord> = ["10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.0.4"]
//!     .iter()
//!     .map(|ip| UsageRecord::new(ip.parse().unwrap(), ["alice"], 1, 1).unwrap())
//!     .collect();
//!
//! let result = RangeAggregator::default().aggregate(&records).unwrap();
//! let top = result.most_general().unwrap();
//! assert_eq!(top.ranges[0].range.canonical_string(), "10.0.0.0/29");
//! assert_eq!(top.ranges[0].action_count, 4);
//! ```
//!
//! The engine performs no I/O and keeps no state between calls; every
//! operation is a pure computation over its arguments.
//!
//! ## Modules
//!
//! - [`address`] - Addresses and CIDR ranges, containment and covering
//! - [`aggregator`] - Hierarchical range aggregation of usage records
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and validation
//! - [`error`] - Library error type
//! - [`policy`] - Prefix-length windows
//! - [`records`] - Usage records
//! - [`sets`] - Index set predicates
//! - [`targets`] - Selection reduction and categorization
//! - [`utils`] - Display helpers

pub mod address;
pub mod aggregator;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
mod overflow;
pub mod policy;
pub mod records;
pub mod sets;
pub mod targets;
pub mod utils;

pub use address::{AddressSpace, IpVersion};
pub use aggregator::{AggregationResult, RangeAggregator};
pub use config::Config;
pub use error::IpaggError;
pub use policy::{PrefixPolicy, PrefixWindow};
pub use records::UsageRecord;
