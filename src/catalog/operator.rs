//! Operator catalog: the five fixed operator sets, one per semantic type

use crate::catalog::attribute::SemanticType;

/// One legal operator, as offered to the condition UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorDefinition {
    pub key: &'static str,
    pub display_label: &'static str,
}

const fn op(key: &'static str, display_label: &'static str) -> OperatorDefinition {
    OperatorDefinition { key, display_label }
}

pub const STRING_OPERATORS: &[OperatorDefinition] = &[
    op("equals", "equals"),
    op("not_equals", "does not equal"),
    op("contains", "contains"),
    op("not_contains", "does not contain"),
    op("starts_with", "starts with"),
    op("ends_with", "ends with"),
    op("like", "matches pattern"),
    op("regex", "matches regex"),
    op("in", "is one of"),
    op("not_in", "is not one of"),
    op("is_null", "is null"),
    op("is_not_null", "is not null"),
];

pub const NUMBER_OPERATORS: &[OperatorDefinition] = &[
    op("equals", "equals"),
    op("not_equals", "does not equal"),
    op("greater_than", "greater than"),
    op("greater_than_or_equal", "greater than or equal"),
    op("less_than", "less than"),
    op("less_than_or_equal", "less than or equal"),
    op("between", "between"),
    op("in", "is one of"),
    op("not_in", "is not one of"),
    op("is_null", "is null"),
    op("is_not_null", "is not null"),
];

pub const DATE_OPERATORS: &[OperatorDefinition] = &[
    op("equals", "on"),
    op("not_equals", "not on"),
    op("before", "before"),
    op("after", "after"),
    op("between", "between"),
    op("in_last_days", "in the last N days"),
    op("in_last_weeks", "in the last N weeks"),
    op("in_last_months", "in the last N months"),
    op("in_last_years", "in the last N years"),
    op("is_null", "is null"),
    op("is_not_null", "is not null"),
];

pub const BOOLEAN_OPERATORS: &[OperatorDefinition] = &[
    op("equals", "is"),
    op("not_equals", "is not"),
    op("is_null", "is null"),
    op("is_not_null", "is not null"),
];

pub const ARRAY_OPERATORS: &[OperatorDefinition] = &[
    op("contains", "contains"),
    op("not_contains", "does not contain"),
    op("contains_all", "contains all of"),
    op("contains_any", "contains any of"),
    op("array_length_equals", "length equals"),
    op("array_length_greater_than", "length greater than"),
    op("array_length_less_than", "length less than"),
    op("is_empty", "is empty"),
    op("is_not_empty", "is not empty"),
];

/// Ordered operator set for a semantic type
pub fn operators_for(semantic_type: SemanticType) -> &'static [OperatorDefinition] {
    match semantic_type {
        SemanticType::String => STRING_OPERATORS,
        SemanticType::Number => NUMBER_OPERATORS,
        SemanticType::Date => DATE_OPERATORS,
        SemanticType::Boolean => BOOLEAN_OPERATORS,
        SemanticType::Array => ARRAY_OPERATORS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_sets_selected_by_type() {
        assert_eq!(operators_for(SemanticType::String), STRING_OPERATORS);
        assert_eq!(operators_for(SemanticType::Number), NUMBER_OPERATORS);
        assert_eq!(operators_for(SemanticType::Date), DATE_OPERATORS);
        assert_eq!(operators_for(SemanticType::Boolean), BOOLEAN_OPERATORS);
        assert_eq!(operators_for(SemanticType::Array), ARRAY_OPERATORS);
    }

    #[test]
    fn test_operator_keys_unique_per_set() {
        for set in [
            STRING_OPERATORS,
            NUMBER_OPERATORS,
            DATE_OPERATORS,
            BOOLEAN_OPERATORS,
            ARRAY_OPERATORS,
        ] {
            for (i, a) in set.iter().enumerate() {
                for b in &set[i + 1..] {
                    assert_ne!(a.key, b.key);
                }
            }
        }
    }
}
