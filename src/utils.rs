//! Display helpers shared by the command implementations.
//!
//! - [`format_count`] - Format counts with K/M suffix (1.5K, 2.3M)
//! - [`format_count_with_separator`] - Format counts with thousands separator (1,234,567)
//! - [`truncate`] - Truncate strings with ellipsis
//! - [`summarize_names`] - Join a bounded number of names with a "+N more" tail

/// Format a count with K/M suffix for compact display.
///
/// # Examples
/// ```
/// use ipagg::utils::format_count;
/// assert_eq!(format_count(500), "500");
/// assert_eq!(format_count(1500), "1.5K");
/// assert_eq!(format_count(1_500_000), "1.5M");
/// ```
pub fn format_count(count: usize) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

/// Format a number with thousands separators (commas).
///
/// # Examples
/// ```
/// use ipagg::utils::format_count_with_separator;
/// assert_eq!(format_count_with_separator(1000), "1,000");
/// assert_eq!(format_count_with_separator(1234567), "1,234,567");
/// ```
pub fn format_count_with_separator(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Truncate a string to a maximum number of characters, adding "..." if truncated.
///
/// # Examples
/// ```
/// use ipagg::utils::truncate;
/// assert_eq!(truncate("short", 10), "short");
/// assert_eq!(truncate("this is long", 10), "this is...");
/// ```
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

/// Join up to `max` names, noting how many were left out.
///
/// # Examples
/// ```
/// use ipagg::utils::summarize_names;
/// assert_eq!(summarize_names(["a", "b", "c"], 2), "a, b (+1 more)");
/// ```
pub fn summarize_names<I, S>(names: I, max: usize) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut shown = Vec::new();
    let mut hidden = 0usize;
    for name in names {
        if shown.len() < max {
            shown.push(truncate(name.as_ref(), 32));
        } else {
            hidden += 1;
        }
    }
    if hidden == 0 {
        shown.join(", ")
    } else {
        format!("{} (+{} more)", shown.join(", "), hidden)
    }
}
