//! CohortPreview - compiled-query handle for the Python-Rust boundary
//!
//! Holds both query strings in Rust heap memory so the host application can
//! display the SQL and row accounting without re-walking the condition list.

use pyo3::prelude::*;

use crate::catalog::AttributeCatalog;
use crate::condition::Condition;
use crate::query::assembler::{active_condition_count, build_count_query, build_user_query};

/// Compiled view of one condition list
#[pyclass]
pub struct CohortPreview {
    sql: String,
    count_sql: String,
    active_conditions: usize,
    dropped_conditions: usize,
}

impl CohortPreview {
    pub fn build(catalog: &AttributeCatalog, conditions: &[Condition]) -> Self {
        let active = active_condition_count(catalog, conditions);
        Self {
            sql: build_user_query(catalog, conditions),
            count_sql: build_count_query(catalog, conditions),
            active_conditions: active,
            dropped_conditions: conditions.len() - active,
        }
    }
}

#[pymethods]
impl CohortPreview {
    /// Row-fetch query string
    #[getter]
    fn sql(&self) -> &str {
        &self.sql
    }

    /// COUNT(*) query string sharing the same WHERE clause
    #[getter]
    fn count_sql(&self) -> &str {
        &self.count_sql
    }

    /// Rows that contributed a fragment to the WHERE clause
    #[getter]
    fn active_conditions(&self) -> usize {
        self.active_conditions
    }

    /// Rows excluded as incomplete or unrecognized
    #[getter]
    fn dropped_conditions(&self) -> usize {
        self.dropped_conditions
    }

    fn __repr__(&self) -> String {
        format!(
            "CohortPreview(active={}, dropped={})",
            self.active_conditions, self.dropped_conditions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::LogicalConnective;

    #[test]
    fn test_preview_accounting() {
        let catalog = AttributeCatalog::builtin();
        let conditions = vec![
            Condition::attribute(1, "USER_TYPE", "equals", "seller"),
            Condition::attribute(2, "", "", "").with_connective(LogicalConnective::And),
        ];
        let preview = CohortPreview::build(&catalog, &conditions);
        assert_eq!(preview.active_conditions, 1);
        assert_eq!(preview.dropped_conditions, 1);
        assert!(preview.sql.contains("WHERE USER_TYPE = 'seller'"));
        assert!(preview.count_sql.starts_with("SELECT COUNT(*)"));
    }
}
