//! Query assembler: compiled fragments joined under one WHERE clause
//!
//! Both projections (row fetch and COUNT(*)) share the same clause builder, so
//! their WHERE text is byte-identical by construction.

use crate::catalog::AttributeCatalog;
use crate::condition::cache::get_or_compile;
use crate::condition::{Condition, LogicalConnective};

/// The user segmentation table every cohort query reads from
pub const COHORT_TABLE: &str = "DBT_CORE_PROD_DATABASE.OPERATIONS.USER_SEGMENTATION_PROJECT_V4";

/// Projection for the row-fetch form
pub const ID_COLUMN: &str = "USER_ID";

/// Projection for the sizing form
pub const COUNT_PROJECTION: &str = "COUNT(*)";

/// WHERE clause body for a condition list, `None` when no row compiles to a
/// non-empty fragment
pub fn where_clause(catalog: &AttributeCatalog, conditions: &[Condition]) -> Option<String> {
    let mut lines: Vec<String> = Vec::with_capacity(conditions.len());

    for condition in conditions {
        if !condition.is_complete() {
            continue;
        }
        let fragment = get_or_compile(catalog, condition);
        if fragment.is_empty() {
            continue;
        }
        if lines.is_empty() {
            lines.push(fragment);
        } else {
            let connective = condition.connective.unwrap_or(LogicalConnective::And);
            lines.push(format!("  {} {}", connective.as_sql(), fragment));
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn build_query(projection: &str, catalog: &AttributeCatalog, conditions: &[Condition]) -> String {
    match where_clause(catalog, conditions) {
        Some(clause) => format!(
            "SELECT {} FROM {}\nWHERE {}",
            projection, COHORT_TABLE, clause
        ),
        None => format!("SELECT {} FROM {}", projection, COHORT_TABLE),
    }
}

/// Row-fetch query: `SELECT USER_ID FROM … [WHERE …]`
pub fn build_user_query(catalog: &AttributeCatalog, conditions: &[Condition]) -> String {
    build_query(ID_COLUMN, catalog, conditions)
}

/// Sizing query: `SELECT COUNT(*) FROM … [WHERE …]`
pub fn build_count_query(catalog: &AttributeCatalog, conditions: &[Condition]) -> String {
    build_query(COUNT_PROJECTION, catalog, conditions)
}

/// Number of rows that contribute a fragment to the WHERE clause
pub fn active_condition_count(catalog: &AttributeCatalog, conditions: &[Condition]) -> usize {
    conditions
        .iter()
        .filter(|c| c.is_complete() && !get_or_compile(catalog, c).is_empty())
        .count()
}
