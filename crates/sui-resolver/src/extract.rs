//! Name extraction.
//!
//! Scans a transaction for symbolic references: package names used as the
//! package of a move call, and type strings that mention a name anywhere,
//! including inside nested generics.

use std::collections::BTreeSet;

use serde::Serialize;
use sui_mvr_types::{has_symbolic_name, Command, TransactionData};

/// Symbolic references found in a transaction. Sets keep iteration order stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedNames {
    /// Names used as a move-call package.
    pub packages: BTreeSet<String>,
    /// Whole type-argument strings containing at least one name.
    pub types: BTreeSet<String>,
}

impl ExtractedNames {
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.types.is_empty()
    }

    /// Package names plus every name nested inside the collected types.
    pub fn all_package_names(&self) -> BTreeSet<String> {
        let mut names = self.packages.clone();
        for type_name in &self.types {
            names.extend(names_in_type(type_name));
        }
        names
    }
}

/// The symbolic name heading a `::`-delimited target or package field, if any.
pub fn package_name(target: &str) -> Option<&str> {
    let head = target.split("::").next()?;
    has_symbolic_name(head).then_some(head)
}

/// Every distinct name inside a type string.
///
/// Each generic level (split on `<`) and each parameter (split on `,` and `>`)
/// is examined; the scope prefix before the first `::` is a name when it
/// carries the delimiter.
///
/// ```
/// use sui_resolver::extract::names_in_type;
///
/// let names = names_in_type("0x2::demo::Pair<a@b::m::T, c@d::m::U<a@b::m::V>>");
/// assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["a@b", "c@d"]);
/// ```
pub fn names_in_type(type_name: &str) -> BTreeSet<String> {
    type_name
        .split('<')
        .flat_map(|level| level.split(|c: char| c == ',' || c == '>'))
        .filter_map(|segment| package_name(segment.trim()))
        .map(str::to_string)
        .collect()
}

/// Scan every command for package and type references. Pure, no side effects.
pub fn extract_names(tx: &TransactionData) -> ExtractedNames {
    fn visit_type(type_name: &str, found: &mut ExtractedNames) {
        if has_symbolic_name(type_name) {
            found.types.insert(type_name.to_string());
        }
    }

    let mut found = ExtractedNames::default();

    for command in &tx.commands {
        match command {
            Command::MoveCall(call) => {
                if let Some(name) = package_name(&call.package) {
                    found.packages.insert(name.to_string());
                }
                for type_arg in &call.type_arguments {
                    visit_type(type_arg, &mut found);
                }
            }
            Command::MakeMoveVec {
                type_arg: Some(type_arg),
                ..
            } => visit_type(type_arg, &mut found),
            _ => {}
        }
    }

    tracing::trace!(
        packages = found.packages.len(),
        types = found.types.len(),
        "extracted symbolic names"
    );
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use sui_mvr_types::{Argument, MoveCall};

    fn call(target: &str, type_args: &[&str]) -> Command {
        Command::MoveCall(
            MoveCall::from_target(target)
                .unwrap()
                .with_type_arguments(type_args.iter().copied()),
        )
    }

    #[test]
    fn test_package_name_requires_delimiter_in_head() {
        assert_eq!(package_name("nft@sample::demo::new_nft"), Some("nft@sample"));
        assert_eq!(package_name("nft@sample/2"), Some("nft@sample/2"));
        assert_eq!(package_name("0x2::coin::zero"), None);
        assert_eq!(package_name("0x2::a@b::f"), None);
    }

    #[test]
    fn test_nested_type_names_deduplicated() {
        let names =
            names_in_type("first@demo::demo::NestedDemoWitness<first@demo::demo::DemoWitness>");
        assert_eq!(names.len(), 1);
        assert!(names.contains("first@demo"));
    }

    #[test]
    fn test_multiple_generic_parameters_all_found() {
        let names = names_in_type("Pair<a@b::T, c@d::U>");
        assert_eq!(
            names.into_iter().collect::<Vec<_>>(),
            vec!["a@b".to_string(), "c@d".to_string()]
        );
    }

    #[test]
    fn test_no_false_positives_from_addresses() {
        assert!(names_in_type("0x2::coin::Coin<0x2::sui::SUI>").is_empty());
        assert!(names_in_type("vector<u8>").is_empty());
    }

    #[test]
    fn test_extract_from_transaction() {
        let mut tx = TransactionData::new();
        tx.add_command(call("nft@sample::demo::new_nft", &[]));
        tx.add_command(call("nft@sample::demo::burn", &["0x2::sui::SUI"]));
        tx.add_command(call(
            "0x2::coin::zero",
            &["first@demo::demo::NestedDemoWitness<first@demo::demo::DemoWitness>"],
        ));
        tx.add_command(Command::MakeMoveVec {
            type_arg: Some("vec@demo::v::Item".to_string()),
            elements: vec![Argument::Input(0)],
        });

        let found = extract_names(&tx);
        assert_eq!(found.packages.len(), 1);
        assert!(found.packages.contains("nft@sample"));
        assert_eq!(found.types.len(), 2);
        assert_eq!(
            found.all_package_names().into_iter().collect::<Vec<_>>(),
            vec!["first@demo", "nft@sample", "vec@demo"]
        );
    }

    #[test]
    fn test_concrete_transaction_is_empty() {
        let mut tx = TransactionData::new();
        tx.add_command(call("0x2::coin::zero", &["0x2::sui::SUI"]));
        assert!(extract_names(&tx).is_empty());
    }
}
