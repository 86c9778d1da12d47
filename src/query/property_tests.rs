//! Property tests for the query assembler

use proptest::prelude::*;

use crate::catalog::{operators_for, AttributeCatalog};
use crate::condition::{Condition, LogicalConnective};
use crate::query::assembler::{build_count_query, build_user_query, COHORT_TABLE};

// ═══════════════════════════════════════════════════════════════════════════
// Strategy generators for property tests
// ═══════════════════════════════════════════════════════════════════════════

fn attribute_key_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("USER_TYPE"),
        Just("PAID_LISTINGS_COUNT"),
        Just("SIGNUP_DATE"),
        Just("IS_BLOCK"),
        Just("VERTICALS_LISTED_IN"),
    ]
}

fn connective_strategy() -> impl Strategy<Value = LogicalConnective> {
    prop_oneof![Just(LogicalConnective::And), Just(LogicalConnective::Or)]
}

/// One complete attribute row with a legal operator for its type
fn complete_condition_strategy() -> impl Strategy<Value = Condition> {
    (attribute_key_strategy(), any::<prop::sample::Index>(), "[a-z]{3,8}").prop_map(
        |(key, op_index, value)| {
            let catalog = AttributeCatalog::builtin();
            let ops = operators_for(catalog.semantic_type_of(key));
            let op = ops[op_index.index(ops.len())];
            Condition::attribute(0, key, op.key, &value)
        },
    )
}

/// A row that cannot contribute a fragment
fn invalid_condition_strategy() -> impl Strategy<Value = Condition> {
    prop_oneof![
        Just(Condition::attribute(0, "", "", "")),
        Just(Condition::attribute(0, "USER_TYPE", "", "x")),
        Just(Condition::attribute(0, "USER_TYPE", "sounds_like", "x")),
        Just(Condition::segment(0, "")),
    ]
}

fn condition_list_strategy() -> impl Strategy<Value = Vec<Condition>> {
    prop::collection::vec(
        (
            prop_oneof![
                3 => complete_condition_strategy(),
                1 => invalid_condition_strategy(),
            ],
            connective_strategy(),
        ),
        0..=6,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (mut cond, conn))| {
                cond.id = i as u64 + 1;
                cond.connective = if i == 0 { None } else { Some(conn) };
                cond
            })
            .collect()
    })
}

fn catalog() -> AttributeCatalog {
    AttributeCatalog::builtin()
}

// ═══════════════════════════════════════════════════════════════════════════
// Property Tests
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    /// Assembly is deterministic for any condition list
    #[test]
    fn prop_assembly_is_deterministic(conditions in condition_list_strategy()) {
        let catalog = catalog();
        prop_assert_eq!(
            build_user_query(&catalog, &conditions),
            build_user_query(&catalog, &conditions)
        );
        prop_assert_eq!(
            build_count_query(&catalog, &conditions),
            build_count_query(&catalog, &conditions)
        );
    }

    /// Row-fetch and count queries differ only in their SELECT line
    #[test]
    fn prop_projections_share_where_clause(conditions in condition_list_strategy()) {
        let catalog = catalog();
        let rows = build_user_query(&catalog, &conditions);
        let count = build_count_query(&catalog, &conditions);

        prop_assert_eq!(
            rows.split_once('\n').map(|(_, rest)| rest),
            count.split_once('\n').map(|(_, rest)| rest)
        );
        let rows_prefix = format!("SELECT USER_ID FROM {}", COHORT_TABLE);
        let count_prefix = format!("SELECT COUNT(*) FROM {}", COHORT_TABLE);
        prop_assert!(rows.starts_with(&rows_prefix), "unexpected prefix: {}", rows);
        prop_assert!(count.starts_with(&count_prefix), "unexpected prefix: {}", count);
    }

    /// A list with no valid rows assembles to the bare SELECT
    #[test]
    fn prop_invalid_only_lists_have_no_where(
        conditions in prop::collection::vec(invalid_condition_strategy(), 0..=5)
    ) {
        let catalog = catalog();
        let sql = build_user_query(&catalog, &conditions);
        prop_assert_eq!(sql, format!("SELECT USER_ID FROM {}", COHORT_TABLE));
    }

    /// A single-row list never carries a connective in its WHERE clause
    #[test]
    fn prop_single_condition_has_no_connective(cond in complete_condition_strategy()) {
        let catalog = catalog();
        let sql = build_user_query(&catalog, std::slice::from_ref(&cond));
        for line in sql.lines().skip(1) {
            prop_assert!(
                !line.starts_with("  AND ") && !line.starts_with("  OR "),
                "unexpected connective line: {:?}",
                line
            );
        }
    }

    /// Every WHERE line after the first starts with an indented connective
    #[test]
    fn prop_continuation_lines_carry_connectives(conditions in condition_list_strategy()) {
        let catalog = catalog();
        let sql = build_user_query(&catalog, &conditions);
        if let Some((_, clause)) = sql.split_once("\nWHERE ") {
            for line in clause.lines().skip(1) {
                prop_assert!(
                    line.starts_with("  AND ") || line.starts_with("  OR "),
                    "continuation line missing connective: {:?}",
                    line
                );
            }
        }
    }
}
