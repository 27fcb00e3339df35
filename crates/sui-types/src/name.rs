//! Symbolic package names of the form `<app>@<org>[/<version>]`.
//!
//! A symbolic name stands in for an on-chain package address. The org label
//! is a SuiNS name (`<org>.sui`), the app label is registered under it.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};

/// Delimiter between the app label and the org label.
pub const NAME_DELIMITER: char = '@';

/// Top-level domain every org label lives under.
pub const ORG_TLD: &str = "sui";

/// Whether a string contains a symbolic reference anywhere.
pub fn has_symbolic_name(s: &str) -> bool {
    s.contains(NAME_DELIMITER)
}

/// A parsed `<app>@<org>[/<version>]` name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolicName {
    pub app: String,
    pub org: String,
    pub version: Option<u64>,
}

impl SymbolicName {
    /// Domain labels of the org as stored in registry keys (TLD first).
    pub fn org_labels(&self) -> Vec<String> {
        vec![ORG_TLD.to_string(), self.org.clone()]
    }

    /// The name without its version suffix.
    pub fn unversioned(&self) -> String {
        format!("{}{}{}", self.app, NAME_DELIMITER, self.org)
    }
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

impl FromStr for SymbolicName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (base, version) = match s.split_once('/') {
            Some((base, v)) => {
                let version = v
                    .parse::<u64>()
                    .map_err(|_| anyhow!("invalid version '{}' in name '{}'", v, s))?;
                if version == 0 {
                    return Err(anyhow!("version must be positive in name '{}'", s));
                }
                (base, Some(version))
            }
            None => (s, None),
        };

        let (app, org) = base
            .split_once(NAME_DELIMITER)
            .ok_or_else(|| anyhow!("name '{}' is missing '{}'", s, NAME_DELIMITER))?;

        if !is_valid_label(app) || !is_valid_label(org) {
            return Err(anyhow!("invalid name '{}'", s));
        }

        Ok(Self {
            app: app.to_string(),
            org: org.to_string(),
            version,
        })
    }
}

impl fmt::Display for SymbolicName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.app, NAME_DELIMITER, self.org)?;
        if let Some(version) = self.version {
            write!(f, "/{}", version)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_name() {
        let name: SymbolicName = "nft@sample".parse().unwrap();
        assert_eq!(name.app, "nft");
        assert_eq!(name.org, "sample");
        assert_eq!(name.version, None);
        assert_eq!(name.org_labels(), vec!["sui", "sample"]);
        assert_eq!(name.to_string(), "nft@sample");
    }

    #[test]
    fn test_parse_versioned_name() {
        let name: SymbolicName = "nft-demo@pkg/3".parse().unwrap();
        assert_eq!(name.version, Some(3));
        assert_eq!(name.unversioned(), "nft-demo@pkg");
        assert_eq!(name.to_string(), "nft-demo@pkg/3");
    }

    #[test]
    fn test_reject_malformed_names() {
        for bad in ["nft", "@sample", "nft@", "Nft@sample", "nft@sample/0", "nft@sample/x", "-a@b"] {
            assert!(bad.parse::<SymbolicName>().is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn test_has_symbolic_name() {
        assert!(has_symbolic_name("a@b::m::T"));
        assert!(!has_symbolic_name("0x2::sui::SUI"));
    }
}
