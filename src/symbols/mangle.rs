use crate::ast::types::ValueType;

use super::namespace::{NamespaceId, NamespaceTable};

/// Mangled name of a function: `_`, then each enclosing namespace name
/// (outermost first) followed by `_`, then the bare name, `Z`, and `Z` plus
/// the type id of every argument.
///
/// # Example
///
/// `fn add(a: int32, b: int32)` in namespace `math` mangles to
/// `_math_addZZiZi`; `fn main()` at the root to `_mainZ`.
pub fn mangle_function(
    namespaces: &NamespaceTable,
    namespace: NamespaceId,
    name: &str,
    arg_types: &[ValueType],
) -> String {
    let mut mangled = String::from("_");

    for segment in namespaces.path(namespace) {
        mangled.push_str(segment);
        mangled.push('_');
    }

    mangled.push_str(name);
    mangled.push('Z');
    mangled.push_str(&mangle_arguments(arg_types));
    mangled
}

pub fn mangle_arguments(arg_types: &[ValueType]) -> String {
    arg_types
        .iter()
        .map(|arg_type| format!("Z{}", arg_type.get_mangled_name()))
        .collect()
}
