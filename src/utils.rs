use alloy::primitives::utils::{UnitsError, parse_ether};
use alloy::primitives::{Address, B256, U256};
use chrono::Utc;

/// Truncate a B256 hash to "0xabcd...ef12" format
pub fn truncate_hash(hash: &B256) -> String {
    truncate(format!("{hash}"))
}

/// Truncate an address to "0xabcd...ef12" format
pub fn truncate_address(addr: &Address) -> String {
    truncate(format!("{addr}"))
}

fn truncate(s: String) -> String {
    if s.len() > 14 {
        format!("{}...{}", &s[..6], &s[s.len() - 4..])
    } else {
        s
    }
}

/// Convert a human ETH amount to wei. An empty field counts as zero.
pub fn parse_amount(text: &str) -> Result<U256, UnitsError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(U256::ZERO);
    }
    parse_ether(text)
}

/// Format a U256 wei value as ETH with reasonable precision
pub fn format_eth(wei: U256) -> String {
    let eth_str = format_u256_as_decimal(wei, 18);
    format!("{eth_str} ETH")
}

/// Format a U256 value as decimal with given decimals
pub fn format_u256_as_decimal(value: U256, decimals: u8) -> String {
    if value.is_zero() {
        return "0.0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = value / divisor;
    let remainder = value % divisor;

    if remainder.is_zero() {
        return format!("{whole}.0");
    }

    let remainder_str = format!("{remainder}");
    let padded = format!("{:0>width$}", remainder_str, width = decimals as usize);
    let trimmed = padded.trim_end_matches('0');

    // Limit to 6 decimal places
    let decimals_shown = trimmed.len().min(6);
    format!("{whole}.{}", &trimmed[..decimals_shown])
}

/// Format a number with comma separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a Unix timestamp as "Xm ago", "Xh ago", etc.
pub fn format_time_ago(timestamp: u64) -> String {
    format_time_ago_from(timestamp, Utc::now().timestamp().max(0) as u64)
}

fn format_time_ago_from(timestamp: u64, now: u64) -> String {
    if timestamp > now {
        return "just now".to_string();
    }
    let diff = now - timestamp;
    if diff < 60 {
        format!("{diff}s ago")
    } else if diff < 3600 {
        format!("{}m ago", diff / 60)
    } else if diff < 86400 {
        format!("{}h ago", diff / 3600)
    } else {
        format!("{}d ago", diff / 86400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_address() {
        let addr: Address = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".parse().unwrap();
        assert_eq!(truncate_address(&addr), "0xd8dA...6045");
    }

    #[test]
    fn test_truncate_hash() {
        let hash = B256::repeat_byte(0xab);
        assert_eq!(truncate_hash(&hash), "0xabab...abab");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(
            parse_amount("0.01").unwrap(),
            U256::from(10_000_000_000_000_000u64)
        );
        assert_eq!(
            parse_amount("1").unwrap(),
            U256::from(1_000_000_000_000_000_000u64)
        );
    }

    #[test]
    fn test_parse_amount_empty_is_zero() {
        assert_eq!(parse_amount("").unwrap(), U256::ZERO);
        assert_eq!(parse_amount("   ").unwrap(), U256::ZERO);
    }

    #[test]
    fn test_parse_amount_malformed() {
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("1.2.3").is_err());
    }

    #[test]
    fn test_format_eth() {
        assert_eq!(format_eth(U256::ZERO), "0.0 ETH");
        assert_eq!(
            format_eth(U256::from(1_500_000_000_000_000_000u64)),
            "1.5 ETH"
        );
        assert_eq!(format_eth(U256::from(10_000_000_000_000_000u64)), "0.01 ETH");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(19234567), "19,234,567");
    }

    #[test]
    fn test_format_time_ago() {
        assert_eq!(format_time_ago_from(100, 130), "30s ago");
        assert_eq!(format_time_ago_from(0, 7200), "2h ago");
        assert_eq!(format_time_ago_from(0, 3 * 86400), "3d ago");
        assert_eq!(format_time_ago_from(200, 100), "just now");
    }
}
