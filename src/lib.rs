//! Cohort Compiler Core - condition-to-SQL compiler for the CDP admin backend
//!
//! This crate compiles audience condition lists into Snowflake queries against
//! the user segmentation table, with Python bindings via PyO3.

use pyo3::prelude::*;

pub mod catalog;
pub mod condition;
pub mod error;
pub mod executor;
pub mod query;

use crate::catalog::{AttributeCatalog, SegmentCatalog};
use crate::condition::cache::clear_cache;
use crate::error::CohortError;
use crate::executor::{ExecutionOutcome, SqlEndpointClient};
use crate::query::CohortPreview;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::sync::Arc;

// ============================================================================
// Cached Catalog
// ============================================================================

/// Cached reference data containing attributes and segment tags
struct CachedCatalog {
    attributes: AttributeCatalog,
    segments: SegmentCatalog,
}

/// Global cached catalog
static CACHED_CATALOG: OnceCell<Arc<RwLock<CachedCatalog>>> = OnceCell::new();

fn cached_catalog() -> PyResult<Arc<RwLock<CachedCatalog>>> {
    CACHED_CATALOG
        .get()
        .cloned()
        .ok_or_else(|| CohortError::CatalogNotInitialized.into())
}

// ============================================================================
// Python Functions
// ============================================================================

/// Initialize the reference-data catalogs (call once at startup)
///
/// This caches attributes and segment tags in Rust memory, eliminating the
/// need to deserialize them on every compile call. Passing `None` for either
/// argument falls back to the built-in attribute catalog / an empty segment
/// catalog.
///
/// # Arguments
/// * `attributes` - Optional list of attribute dicts/objects (key, display_label, semantic_type)
/// * `segment_tags` - Optional list of segment-tag dicts/objects (name, description, user_count)
#[pyfunction]
#[pyo3(signature = (attributes=None, segment_tags=None))]
fn init_catalog(
    attributes: Option<&Bound<'_, PyAny>>,
    segment_tags: Option<&Bound<'_, PyAny>>,
) -> PyResult<()> {
    let attributes = match attributes {
        Some(list) => AttributeCatalog::new(catalog::deserialize_attributes(list)?),
        None => AttributeCatalog::builtin(),
    };
    let segments = match segment_tags {
        Some(list) => SegmentCatalog::new(catalog::deserialize_segment_tags(list)?),
        None => SegmentCatalog::default(),
    };

    let cached = CachedCatalog {
        attributes,
        segments,
    };

    // Fragments compiled against the previous catalog are stale
    clear_cache();

    // If already initialized, update the catalog
    if let Some(existing) = CACHED_CATALOG.get() {
        let mut guard = existing.write();
        *guard = cached;
    } else {
        let _ = CACHED_CATALOG.set(Arc::new(RwLock::new(cached)));
    }

    Ok(())
}

/// Check if the catalog is initialized
#[pyfunction]
fn is_catalog_initialized() -> bool {
    CACHED_CATALOG.get().is_some()
}

/// Operator choices for one attribute as (key, display_label) pairs
///
/// An unknown attribute key falls back to the string operator set, matching
/// the compiler's lenient typing.
///
/// # Raises
/// RuntimeError if `init_catalog` was not called first
#[pyfunction]
fn attribute_operators(attribute_key: &str) -> PyResult<Vec<(String, String)>> {
    let catalog_arc = cached_catalog()?;
    let catalog = catalog_arc.read();

    let semantic_type = catalog.attributes.semantic_type_of(attribute_key);
    Ok(catalog::operators_for(semantic_type)
        .iter()
        .map(|op| (op.key.to_string(), op.display_label.to_string()))
        .collect())
}

/// Segment tags as (name, description, user_count) tuples
///
/// # Raises
/// RuntimeError if `init_catalog` was not called first
#[pyfunction]
fn segment_tags() -> PyResult<Vec<(String, String, i64)>> {
    let catalog_arc = cached_catalog()?;
    let catalog = catalog_arc.read();

    Ok(catalog
        .segments
        .iter()
        .map(|tag| (tag.name.clone(), tag.description.clone(), tag.user_count))
        .collect())
}

/// Compile a condition list into the row-fetch query
///
/// # Arguments
/// * `conditions` - List of condition dicts/objects (kind, attribute, operator, value, connective)
///
/// # Raises
/// RuntimeError if `init_catalog` was not called first
#[pyfunction]
fn build_user_query(conditions: &Bound<'_, PyAny>) -> PyResult<String> {
    let conditions = catalog::deserialize_conditions(conditions)?;
    let catalog_arc = cached_catalog()?;
    let catalog = catalog_arc.read();
    Ok(query::build_user_query(&catalog.attributes, &conditions))
}

/// Compile a condition list into the COUNT(*) sizing query
///
/// # Raises
/// RuntimeError if `init_catalog` was not called first
#[pyfunction]
fn build_count_query(conditions: &Bound<'_, PyAny>) -> PyResult<String> {
    let conditions = catalog::deserialize_conditions(conditions)?;
    let catalog_arc = cached_catalog()?;
    let catalog = catalog_arc.read();
    Ok(query::build_count_query(&catalog.attributes, &conditions))
}

/// Compile a condition list into both query forms plus row accounting
///
/// # Returns
/// A CohortPreview object with sql, count_sql, active_conditions and
/// dropped_conditions
///
/// # Raises
/// RuntimeError if `init_catalog` was not called first
#[pyfunction]
fn preview_cohort(conditions: &Bound<'_, PyAny>) -> PyResult<CohortPreview> {
    let conditions = catalog::deserialize_conditions(conditions)?;
    let catalog_arc = cached_catalog()?;
    let catalog = catalog_arc.read();
    Ok(CohortPreview::build(&catalog.attributes, &conditions))
}

/// Execute a compiled query against the SQL endpoint asynchronously
///
/// The request runs on Tokio's runtime; Python's asyncio event loop stays
/// responsive while the endpoint works.
///
/// # Arguments
/// * `py` - Python interpreter token
/// * `endpoint` - Base URL of the admin backend, e.g. "http://localhost:5000"
/// * `query` - A compiled query string from build_user_query / build_count_query
///
/// # Returns
/// A Python awaitable that resolves to an ExecutionOutcome object
///
/// # Example (Python)
/// ```python
/// outcome = await execute_cohort("http://localhost:5000", sql)
/// print(outcome.row_count)
/// ```
#[pyfunction]
fn execute_cohort<'py>(
    py: Python<'py>,
    endpoint: String,
    query: String,
) -> PyResult<Bound<'py, PyAny>> {
    pyo3_async_runtimes::tokio::future_into_py(py, async move {
        let client = SqlEndpointClient::new(endpoint)?;
        let response = client.execute(&query).await?;
        Ok(ExecutionOutcome::from_response(response))
    })
}

// ============================================================================
// Python Module Definition
// ============================================================================

/// Python module definition
#[pymodule]
fn cohort_compiler_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(init_catalog, m)?)?;
    m.add_function(wrap_pyfunction!(is_catalog_initialized, m)?)?;
    m.add_function(wrap_pyfunction!(attribute_operators, m)?)?;
    m.add_function(wrap_pyfunction!(segment_tags, m)?)?;
    m.add_function(wrap_pyfunction!(build_user_query, m)?)?;
    m.add_function(wrap_pyfunction!(build_count_query, m)?)?;
    m.add_function(wrap_pyfunction!(preview_cohort, m)?)?;
    m.add_function(wrap_pyfunction!(execute_cohort, m)?)?;
    m.add_class::<CohortPreview>()?;
    m.add_class::<ExecutionOutcome>()?;
    Ok(())
}
