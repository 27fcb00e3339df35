//! Transaction rewriting.
//!
//! Replaces symbolic names in move-call packages and type arguments with the
//! values from a [`ResolutionMap`]. Every reference is checked before the
//! first field is touched, so a failed rewrite leaves the transaction as it was.

use anyhow::Result;
use sui_mvr_types::{has_symbolic_name, Command, TransactionData};

use crate::error::ResolutionError;
use crate::extract::{names_in_type, package_name};
use crate::resolution::ResolutionMap;

/// Replace every occurrence of each name, in the order given.
///
/// Plain substring replacement; callers pass [`ResolutionMap::name_substitutions`]
/// so longer names are consumed before any name they contain.
pub fn substitute_names(input: &str, substitutions: &[(&str, &str)]) -> String {
    substitutions
        .iter()
        .fold(input.to_string(), |acc, &(name, value)| {
            if acc.contains(name) {
                acc.replace(name, value)
            } else {
                acc
            }
        })
}

/// Rewrite a type string: a whole-type entry wins, otherwise nested names
/// are substituted.
fn rewrite_type(type_name: &str, resolved: &ResolutionMap, subs: &[(&str, &str)]) -> String {
    match resolved.get(type_name) {
        Some(repr) => repr.to_string(),
        None => substitute_names(type_name, subs),
    }
}

fn check_type(type_name: &str, resolved: &ResolutionMap) -> Result<()> {
    if !has_symbolic_name(type_name) || resolved.contains(type_name) {
        return Ok(());
    }
    match names_in_type(type_name)
        .into_iter()
        .find(|name| !resolved.contains(name))
    {
        Some(name) => Err(ResolutionError::UnresolvedName { name }.into()),
        None => Ok(()),
    }
}

fn check_package(package: &str, resolved: &ResolutionMap) -> Result<()> {
    match package_name(package) {
        Some(name) if !resolved.contains(name) => Err(ResolutionError::UnresolvedName {
            name: name.to_string(),
        }
        .into()),
        _ => Ok(()),
    }
}

/// Verify that every symbolic reference in `tx` has an entry in `resolved`.
pub fn check_resolvable(tx: &TransactionData, resolved: &ResolutionMap) -> Result<()> {
    for command in &tx.commands {
        match command {
            Command::MoveCall(call) => {
                check_package(&call.package, resolved)?;
                for type_arg in &call.type_arguments {
                    check_type(type_arg, resolved)?;
                }
            }
            Command::MakeMoveVec {
                type_arg: Some(type_arg),
                ..
            } => check_type(type_arg, resolved)?,
            _ => {}
        }
    }
    Ok(())
}

/// Rewrite `tx` in place. Fails before mutating anything if a reference is missing.
pub fn rewrite_transaction(tx: &mut TransactionData, resolved: &ResolutionMap) -> Result<()> {
    check_resolvable(tx, resolved)?;

    let subs = resolved.name_substitutions();
    let mut rewritten = 0usize;

    for command in tx.commands.iter_mut() {
        match command {
            Command::MoveCall(call) => {
                if let Some(name) = package_name(&call.package) {
                    if let Some(address) = resolved.get(name) {
                        let replaced = call.package.replace(name, address);
                        call.package = replaced;
                        rewritten += 1;
                    }
                }
                for type_arg in call.type_arguments.iter_mut() {
                    if has_symbolic_name(type_arg) {
                        *type_arg = rewrite_type(type_arg, resolved, &subs);
                        rewritten += 1;
                    }
                }
            }
            Command::MakeMoveVec {
                type_arg: Some(type_arg),
                ..
            } if has_symbolic_name(type_arg) => {
                *type_arg = rewrite_type(type_arg, resolved, &subs);
                rewritten += 1;
            }
            _ => {}
        }
    }

    tracing::debug!(fields = rewritten, "rewrote symbolic references");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::resolution_error;
    use crate::extract::extract_names;
    use sui_mvr_types::MoveCall;

    fn tx_with(calls: Vec<MoveCall>) -> TransactionData {
        let mut tx = TransactionData::new();
        for call in calls {
            tx.add_command(Command::MoveCall(call));
        }
        tx
    }

    fn map(entries: &[(&str, &str)]) -> ResolutionMap {
        entries.iter().copied().collect()
    }

    const ADDR: &str = "0xabc0000000000000000000000000000000000000000000000000000000000ef";

    #[test]
    fn test_rewrite_call_target() {
        let mut tx = tx_with(vec![MoveCall::from_target("nft@sample::demo::new_nft").unwrap()]);
        rewrite_transaction(&mut tx, &map(&[("nft@sample", ADDR)])).unwrap();

        let call = tx.move_calls().next().unwrap();
        assert_eq!(call.target(), format!("{}::demo::new_nft", ADDR));
    }

    #[test]
    fn test_rewrite_nested_type_argument() {
        let type_arg = "first@demo::demo::NestedDemoWitness<first@demo::demo::DemoWitness>";
        let mut tx = tx_with(vec![MoveCall::from_target("0x2::demo::wrap")
            .unwrap()
            .with_type_arguments([type_arg])]);

        let names = extract_names(&tx).all_package_names();
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["first@demo"]);

        rewrite_transaction(&mut tx, &map(&[("first@demo", "0x2")])).unwrap();
        assert_eq!(
            tx.move_calls().next().unwrap().type_arguments[0],
            "0x2::demo::NestedDemoWitness<0x2::demo::DemoWitness>"
        );
    }

    #[test]
    fn test_whole_type_entry_takes_precedence() {
        let mut tx = tx_with(vec![MoveCall::from_target("0x2::demo::wrap")
            .unwrap()
            .with_type_arguments(["coin@demo::coin::COIN"])]);
        rewrite_transaction(
            &mut tx,
            &map(&[("coin@demo::coin::COIN", "0x5::coin::COIN")]),
        )
        .unwrap();
        assert_eq!(
            tx.move_calls().next().unwrap().type_arguments[0],
            "0x5::coin::COIN"
        );
    }

    #[test]
    fn test_identity_map_is_idempotent() {
        let mut tx = tx_with(vec![
            MoveCall::from_target("nft@sample::demo::new_nft")
                .unwrap()
                .with_type_arguments(["Pair<a@b::m::T, xa@b::m::U<a@b::m::V>>", "u64"]),
            MoveCall::from_target("0x2::coin::zero").unwrap(),
        ]);
        let original = tx.clone();

        let identity: ResolutionMap = extract_names(&tx)
            .all_package_names()
            .into_iter()
            .map(|n| (n.clone(), n))
            .collect();
        rewrite_transaction(&mut tx, &identity).unwrap();
        assert_eq!(tx, original);
    }

    #[test]
    fn test_longest_name_substituted_first() {
        let resolved = map(&[("a@b", "0x1"), ("xa@b", "0x2")]);
        let out = substitute_names("xa@b::m::T", &resolved.name_substitutions());
        assert_eq!(out, "0x2::m::T");

        let out = substitute_names("Pair<xa@b::m::T, a@b::m::U>", &resolved.name_substitutions());
        assert_eq!(out, "Pair<0x2::m::T, 0x1::m::U>");
    }

    #[test]
    fn test_every_occurrence_replaced() {
        let out = substitute_names("a@b::m::T<a@b::m::U, a@b::m::V>", &[("a@b", "0x9")]);
        assert_eq!(out, "0x9::m::T<0x9::m::U, 0x9::m::V>");
    }

    #[test]
    fn test_missing_name_fails_without_mutation() {
        let mut tx = tx_with(vec![
            MoveCall::from_target("known@org::m::f").unwrap(),
            MoveCall::from_target("0x2::m::f")
                .unwrap()
                .with_type_arguments(["known@org::m::T<unknown@org::m::U>"]),
        ]);
        let original = tx.clone();

        let err = rewrite_transaction(&mut tx, &map(&[("known@org", "0x1")])).unwrap_err();
        assert_eq!(
            resolution_error(&err),
            Some(&ResolutionError::UnresolvedName {
                name: "unknown@org".to_string()
            })
        );
        assert_eq!(tx, original);
    }

    #[test]
    fn test_missing_package_name_reported() {
        let mut tx = tx_with(vec![MoveCall::from_target("nft@sample::demo::new_nft").unwrap()]);
        let err = rewrite_transaction(&mut tx, &ResolutionMap::new()).unwrap_err();
        assert!(err.to_string().contains("nft@sample"));
    }

    #[test]
    fn test_make_move_vec_type_rewritten() {
        let mut tx = TransactionData::new();
        tx.add_command(Command::MakeMoveVec {
            type_arg: Some("vec@demo::v::Item".to_string()),
            elements: vec![],
        });
        rewrite_transaction(&mut tx, &map(&[("vec@demo", "0x7")])).unwrap();
        assert_eq!(
            tx.commands[0],
            Command::MakeMoveVec {
                type_arg: Some("0x7::v::Item".to_string()),
                elements: vec![],
            }
        );
    }
}
