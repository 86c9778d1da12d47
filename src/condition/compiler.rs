//! Clause compiler: one condition row in, one SQL fragment out
//!
//! Pure function of the row and the attribute catalog. Incomplete rows,
//! unrecognized operators and malformed identifiers all compile to an empty
//! string and are dropped by the assembler; nothing here raises.

use crate::catalog::AttributeCatalog;
use crate::condition::model::{Condition, ConditionBody};
use crate::condition::templates::template_for;
use once_cell::sync::Lazy;
use regex::Regex;

/// Identifiers land in the SQL text unquoted, so they must look like column
/// names. Dots allowed for qualified references.
static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.]*$").expect("identifier pattern"));

pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Compile one condition into its SQL fragment, with no surrounding connective
pub fn compile_condition(catalog: &AttributeCatalog, condition: &Condition) -> String {
    if !condition.is_complete() {
        return String::new();
    }

    match &condition.body {
        ConditionBody::Segment { tag } => {
            if !is_valid_identifier(tag) {
                return String::new();
            }
            format!("{} = 1", tag)
        }
        ConditionBody::Attribute {
            attribute,
            operator,
            value,
        } => {
            if !is_valid_identifier(attribute) {
                return String::new();
            }
            let semantic_type = catalog.semantic_type_of(attribute);
            match template_for(semantic_type, operator) {
                Some(template) => template(attribute, value),
                None => String::new(),
            }
        }
    }
}
