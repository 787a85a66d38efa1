//! Range parser for variable value specifications.
//!
//! A specification is a comma-separated list of tokens. A token of the form
//! `<start>-<end>` (ASCII digits on both sides) expands to every integer in
//! the inclusive range; anything else is taken literally.
//!
//! ```text
//! 1-3,a,5-6   ->  ["1", "2", "3", "a", "5", "6"]
//! 3-          ->  ["3-"]
//! ```

use crate::error::{BatchError, Result};
use regex::Regex;
use std::sync::LazyLock;

static NUMERIC_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)-([0-9]+)$").expect("numeric range pattern is valid")
});

/// Parse a value specification into its ordered list of values.
///
/// An empty specification yields no values. Descending ranges and ranges
/// whose bounds do not fit in a `u64` are rejected rather than silently
/// producing nothing.
pub fn parse_range(spec: &str) -> Result<Vec<String>> {
    if spec.is_empty() {
        return Ok(Vec::new());
    }

    let mut values = Vec::new();
    for token in spec.split(',') {
        match NUMERIC_RANGE.captures(token) {
            Some(caps) => {
                let start = parse_bound(token, &caps[1])?;
                let end = parse_bound(token, &caps[2])?;
                if start > end {
                    return Err(BatchError::invalid_range(
                        token,
                        format!("range start {start} is greater than end {end}"),
                    ));
                }
                values.extend((start..=end).map(|n| n.to_string()));
            }
            None => values.push(token.to_string()),
        }
    }

    Ok(values)
}

fn parse_bound(token: &str, digits: &str) -> Result<u64> {
    digits
        .parse::<u64>()
        .map_err(|e| BatchError::invalid_range(token, format!("bound '{digits}': {e}")))
}
