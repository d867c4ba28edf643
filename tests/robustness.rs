//! Robustness tests for edge cases and unusual input.

use ipagg::address::AddressSpace;
use ipagg::aggregator::RangeAggregator;
use ipagg::records::UsageRecord;
use ipagg::targets::{categorize, reduce};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Test address parsing edge cases
#[test]
fn test_address_parsing_edge_cases() {
    // Valid edge cases
    assert!(AddressSpace::parse("0.0.0.0").is_ok());
    assert!(AddressSpace::parse("255.255.255.255").is_ok());
    assert!(AddressSpace::parse("::").is_ok());
    assert!(AddressSpace::parse("::1").is_ok());
    assert!(AddressSpace::parse(" 10.0.0.1 ").is_ok());

    // Invalid cases - should fail gracefully
    assert!(AddressSpace::parse("256.0.0.0").is_err());
    assert!(AddressSpace::parse("-1.0.0.0").is_err());
    assert!(AddressSpace::parse("1.2.3").is_err());
    assert!(AddressSpace::parse("1.2.3.4.5").is_err());
    assert!(AddressSpace::parse("").is_err());
    assert!(AddressSpace::parse("hello").is_err());
}

/// Test CIDR parsing edge cases
#[test]
fn test_cidr_parsing_edge_cases() {
    assert!(AddressSpace::parse("0.0.0.0/0").unwrap().is_range());
    assert!(!AddressSpace::parse("0.0.0.0/32").unwrap().is_range());
    assert!(AddressSpace::parse("::/0").unwrap().is_range());
    assert!(!AddressSpace::parse("::/128").unwrap().is_range());

    assert!(AddressSpace::parse("192.168.1.1/33").is_err());
    assert!(AddressSpace::parse("192.168.1.1/-1").is_err());
    assert!(AddressSpace::parse("192.168.1.1/").is_err());
    assert!(AddressSpace::parse("/24").is_err());
}

/// Test Unicode handling in selections
#[test]
fn test_unicode_handling() {
    let selected = ["Ünïcödé", "日本語ユーザー", "10.0.0.0/8", "１０.０.０.１"];
    let reduced = reduce(&selected);
    assert_eq!(reduced.len(), 4);

    let categorized = categorize(&selected, |name: &str| name.starts_with('~'));
    assert_eq!(categorized.ip_entries.len(), 1);
    assert_eq!(categorized.users.len(), 3);
}

/// Test that a large flat selection reduces to its broadest range
#[test]
fn test_large_selection() {
    let mut selected: Vec<String> = (0..2_000u32)
        .map(|i| Ipv4Addr::from(0x0A00_0000 + i).to_string())
        .collect();
    selected.push("10.0.0.0/16".to_string());
    let reduced = reduce(&selected);
    assert_eq!(reduced, vec!["10.0.0.0/16"]);
}

/// Test aggregation over a few hundred addresses terminates with full coverage at the top
#[test]
fn test_large_aggregation() {
    let records: Vec<UsageRecord> = (0..300u32)
        .map(|i| {
            let ip = IpAddr::V4(Ipv4Addr::from(0xC0A8_0000 + i * 3));
            UsageRecord::new(AddressSpace::from(ip), ["user"], 1, 1).unwrap()
        })
        .collect();
    let result = RangeAggregator::default().aggregate(&records).unwrap();
    assert!(result.levels.len() > 1);
    assert!(result.levels.len() <= 1 + 32);
    assert_eq!(result.levels[0].len(), 300);
}

/// Test IPv6 records far apart never merge beyond the policy window
#[test]
fn test_ipv6_outside_window() {
    let records: Vec<UsageRecord> = ["2001:db8::1", "3fff::1"]
        .iter()
        .map(|ip| {
            let ip: Ipv6Addr = ip.parse().unwrap();
            UsageRecord::new(AddressSpace::from(IpAddr::V6(ip)), ["u"], 1, 1).unwrap()
        })
        .collect();
    let result = RangeAggregator::default().aggregate(&records).unwrap();
    // level 0 and the /64 grouping only
    assert_eq!(result.levels.len(), 2);
    assert_eq!(result.levels[1].len(), 2);
}
