//! Whether an action's `variables` parameter may be omitted.

use gqlreq_syntax::VariableDefinition;

/// Returns true when a caller can invoke the operation without variables:
/// no variables are declared, or every declared variable is nullable or
/// has a default value.
pub fn is_optional(variables: &[VariableDefinition]) -> bool {
    variables
        .iter()
        .all(|var| !var.ty.is_non_null() || var.default_value.is_some())
}
