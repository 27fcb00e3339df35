//! Type string parsing utilities.
//!
//! Concrete Move type strings (`0x2::coin::Coin<0x2::sui::SUI>`) parse into
//! `TypeTag`s; strings that still carry symbolic names do not.

use move_core_types::identifier::Identifier;
use move_core_types::language_storage::{StructTag, TypeTag};

use crate::address::parse_address;

/// Parse a concrete Move type string into a TypeTag.
///
/// Supports primitives, `vector<T>` and struct types with type arguments.
/// Returns `None` for anything with a non-hex address (e.g. a symbolic name).
///
/// ```
/// use sui_mvr_types::parse_type_tag;
///
/// assert!(parse_type_tag("0x2::coin::Coin<0x2::sui::SUI>").is_some());
/// assert!(parse_type_tag("coin@demo::coin::Coin").is_none());
/// ```
pub fn parse_type_tag(type_str: &str) -> Option<TypeTag> {
    let type_str = type_str.trim();

    match type_str {
        "bool" => return Some(TypeTag::Bool),
        "u8" => return Some(TypeTag::U8),
        "u16" => return Some(TypeTag::U16),
        "u32" => return Some(TypeTag::U32),
        "u64" => return Some(TypeTag::U64),
        "u128" => return Some(TypeTag::U128),
        "u256" => return Some(TypeTag::U256),
        "address" => return Some(TypeTag::Address),
        "signer" => return Some(TypeTag::Signer),
        _ => {}
    }

    if let Some(inner) = type_str
        .strip_prefix("vector<")
        .and_then(|s| s.strip_suffix('>'))
    {
        return Some(TypeTag::Vector(Box::new(parse_type_tag(inner)?)));
    }

    let (base, type_params) = match type_str.find('<') {
        Some(pos) => {
            let inner = type_str[pos..].strip_prefix('<')?.strip_suffix('>')?;
            let params = split_type_params(inner)
                .into_iter()
                .map(parse_type_tag)
                .collect::<Option<Vec<_>>>()?;
            if params.is_empty() {
                return None;
            }
            (&type_str[..pos], params)
        }
        None => (type_str, Vec::new()),
    };

    let [address, module, name] = base.split("::").collect::<Vec<_>>()[..] else {
        return None;
    };

    Some(TypeTag::Struct(Box::new(StructTag {
        address: parse_address(address)?,
        module: Identifier::new(module).ok()?,
        name: Identifier::new(name).ok()?,
        type_params,
    })))
}

/// Split type parameters respecting nested angle brackets.
///
/// Given "A, B<C, D>, E", returns ["A", "B<C, D>", "E"] by tracking bracket depth.
pub fn split_type_params(s: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth -= 1,
            ',' if depth == 0 => {
                result.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    let last = s[start..].trim();
    if !last.is_empty() {
        result.push(last);
    }

    result
}
