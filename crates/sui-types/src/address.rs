//! Address normalization utilities.
//!
//! Sui addresses are 32-byte values, but registry and GraphQL responses use
//! several textual forms:
//! - Short form: "0x2"
//! - Full form: "0x0000000000000000000000000000000000000000000000000000000000000002"
//! - Without prefix: "2"

use move_core_types::account_address::AccountAddress;

/// Normalize an address to lowercase with 0x prefix and full 64 hex characters.
///
/// # Examples
///
/// ```
/// use sui_mvr_types::address::normalize_address;
///
/// assert_eq!(
///     normalize_address("0x2"),
///     "0x0000000000000000000000000000000000000000000000000000000000000002"
/// );
/// ```
pub fn normalize_address(addr: &str) -> String {
    let addr = addr.trim();
    let hex = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr)
        .to_lowercase();
    if hex.len() < 64 {
        format!("0x{:0>64}", hex)
    } else {
        format!("0x{}", hex)
    }
}

/// Normalize an address, returning None if it's not a valid 32-byte hex address.
///
/// ```
/// use sui_mvr_types::address::normalize_address_checked;
///
/// assert!(normalize_address_checked("0xabc").is_some());
/// assert_eq!(normalize_address_checked("demo@pkg"), None);
/// ```
pub fn normalize_address_checked(addr: &str) -> Option<String> {
    let normalized = normalize_address(addr);
    parse_address(&normalized)?;
    Some(normalized)
}

/// Parse a hex address (short or full form) into an AccountAddress.
pub fn parse_address(addr: &str) -> Option<AccountAddress> {
    let addr = addr.trim();
    let hex = addr.strip_prefix("0x").or_else(|| addr.strip_prefix("0X"))?;
    if hex.is_empty() || hex.len() > 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    AccountAddress::from_hex_literal(&normalize_address(addr)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address() {
        assert_eq!(
            normalize_address("0xABC"),
            "0x0000000000000000000000000000000000000000000000000000000000000abc"
        );
        assert_eq!(
            normalize_address("abc"),
            "0x0000000000000000000000000000000000000000000000000000000000000abc"
        );
    }

    #[test]
    fn test_parse_address_requires_hex_prefix() {
        assert!(parse_address("0x2").is_some());
        assert!(parse_address("2").is_none());
        assert!(parse_address("0x").is_none());
        assert!(parse_address("0xnft@sample").is_none());
        assert!(parse_address(&format!("0x{}", "f".repeat(65))).is_none());
    }
}
