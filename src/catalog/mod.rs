//! Catalog module: reference data and its boundary deserialization
//!
//! Attributes and segment tags arrive either as Python dicts/objects (host
//! application already fetched them) or as the JSON payloads served by the
//! reference-data endpoints. Condition rows cross the same boundary.

mod attribute;
mod operator;
mod segment;

pub use attribute::*;
pub use operator::*;
pub use segment::*;

use crate::condition::{Condition, ConditionBody, LogicalConnective};
use crate::error::{CohortError, Result};
use pyo3::types::{PyAnyMethods, PyDict, PyDictMethods, PyList, PyListMethods};
use pyo3::Bound;

/// Helper to get attribute from either dict or object
fn get_attr<'py>(
    obj: &Bound<'py, pyo3::PyAny>,
    name: &str,
) -> pyo3::PyResult<Bound<'py, pyo3::PyAny>> {
    if let Ok(dict) = obj.downcast::<PyDict>() {
        dict.get_item(name)?
            .ok_or_else(|| pyo3::exceptions::PyKeyError::new_err(name.to_string()))
    } else {
        obj.getattr(name)
    }
}

/// Helper to get optional attribute from either dict or object
fn get_attr_opt<'py>(
    obj: &Bound<'py, pyo3::PyAny>,
    name: &str,
) -> Option<Bound<'py, pyo3::PyAny>> {
    if let Ok(dict) = obj.downcast::<PyDict>() {
        dict.get_item(name).ok().flatten()
    } else {
        obj.getattr(name).ok()
    }
}

fn opt_string(obj: &Bound<'_, pyo3::PyAny>, name: &str) -> Option<String> {
    get_attr_opt(obj, name).and_then(|v| v.extract().ok())
}

/// Deserialize the attribute catalog from a Python list of dicts/objects
pub fn deserialize_attributes(list: &Bound<'_, pyo3::PyAny>) -> pyo3::PyResult<Vec<Attribute>> {
    let list: Bound<'_, PyList> = list.extract()?;
    let mut attributes = Vec::with_capacity(list.len());

    for item in list.iter() {
        let key: String = get_attr(&item, "key")?.extract()?;
        // Support both "display_label" and "label" field names
        let display_label = opt_string(&item, "display_label")
            .or_else(|| opt_string(&item, "label"))
            .unwrap_or_else(|| key.clone());
        // Support both "semantic_type" and "type" field names
        let semantic_type = opt_string(&item, "semantic_type")
            .or_else(|| opt_string(&item, "type"))
            .map(|s| SemanticType::parse(&s))
            .unwrap_or(SemanticType::String);

        attributes.push(Attribute {
            key,
            display_label,
            semantic_type,
        });
    }

    Ok(attributes)
}

/// Deserialize segment tags from a Python list of dicts/objects
pub fn deserialize_segment_tags(list: &Bound<'_, pyo3::PyAny>) -> pyo3::PyResult<Vec<SegmentTag>> {
    let list: Bound<'_, PyList> = list.extract()?;
    let mut tags = Vec::with_capacity(list.len());

    for item in list.iter() {
        let name: String = get_attr(&item, "name")?.extract()?;
        let description = opt_string(&item, "description").unwrap_or_default();
        let user_count: i64 = get_attr_opt(&item, "user_count")
            .or_else(|| get_attr_opt(&item, "userCount"))
            .and_then(|v| v.extract().ok())
            .unwrap_or(0);

        tags.push(SegmentTag {
            name,
            description,
            user_count,
        });
    }

    Ok(tags)
}

/// Deserialize condition rows from a Python list of dicts/objects.
///
/// Rows are structurally strict (an unknown `kind` is an error) but never
/// validated against the operator catalog; leniency about operator keys
/// belongs to the compiler.
pub fn deserialize_conditions(list: &Bound<'_, pyo3::PyAny>) -> pyo3::PyResult<Vec<Condition>> {
    let list: Bound<'_, PyList> = list.extract()?;
    let mut conditions = Vec::with_capacity(list.len());

    for (index, item) in list.iter().enumerate() {
        let kind = opt_string(&item, "kind").unwrap_or_else(|| "attribute".to_string());

        let body = match kind.as_str() {
            "attribute" => ConditionBody::Attribute {
                // Support both snake_case and camelCase field names
                attribute: opt_string(&item, "attribute")
                    .or_else(|| opt_string(&item, "attribute_key"))
                    .or_else(|| opt_string(&item, "attributeKey"))
                    .unwrap_or_default(),
                operator: opt_string(&item, "operator")
                    .or_else(|| opt_string(&item, "operator_key"))
                    .or_else(|| opt_string(&item, "operatorKey"))
                    .unwrap_or_default(),
                value: opt_string(&item, "value").unwrap_or_default(),
            },
            "segment" => ConditionBody::Segment {
                tag: opt_string(&item, "segment")
                    .or_else(|| opt_string(&item, "segment_tag"))
                    .or_else(|| opt_string(&item, "segmentTagName"))
                    .or_else(|| opt_string(&item, "tag"))
                    .unwrap_or_default(),
            },
            other => {
                return Err(CohortError::InvalidCondition(format!(
                    "unknown condition kind: {}",
                    other
                ))
                .into())
            }
        };

        let id: u64 = get_attr_opt(&item, "id")
            .and_then(|v| v.extract().ok())
            .unwrap_or(index as u64 + 1);

        // The first row never carries a connective
        let connective = if index == 0 {
            None
        } else {
            Some(
                opt_string(&item, "connective")
                    .or_else(|| opt_string(&item, "logical_connective"))
                    .or_else(|| opt_string(&item, "logicalConnective"))
                    .map(|s| LogicalConnective::parse(&s))
                    .unwrap_or(LogicalConnective::And),
            )
        };

        conditions.push(Condition {
            id,
            connective,
            body,
        });
    }

    Ok(conditions)
}

/// Parse the attribute reference-data payload
pub fn attributes_from_json(payload: &str) -> Result<Vec<Attribute>> {
    serde_json::from_str(payload).map_err(|e| CohortError::DeserializationError(e.to_string()))
}

/// Parse the segment-tag reference-data payload
pub fn segment_tags_from_json(payload: &str) -> Result<Vec<SegmentTag>> {
    serde_json::from_str(payload).map_err(|e| CohortError::DeserializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_from_json() {
        let payload = r#"[
            {"key": "USER_TYPE", "display_label": "User type", "semantic_type": "string"},
            {"key": "PAID_LISTINGS_COUNT", "display_label": "Paid listings", "semantic_type": "number"}
        ]"#;
        let attrs = attributes_from_json(payload).unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[1].semantic_type, SemanticType::Number);
    }

    #[test]
    fn test_attributes_from_json_rejects_garbage() {
        assert!(attributes_from_json("not json").is_err());
    }

    #[test]
    fn test_attributes_from_json_tolerates_unknown_semantic_type() {
        let payload = r#"[{"key": "SESSION_UUID", "display_label": "Session UUID", "semantic_type": "uuid"}]"#;
        let attrs = attributes_from_json(payload).unwrap();
        assert_eq!(attrs[0].semantic_type, SemanticType::String);
    }

    #[test]
    fn test_segment_tags_from_json() {
        let payload = r#"[{"name": "is_high_value", "description": "High value", "user_count": 42}]"#;
        let tags = segment_tags_from_json(payload).unwrap();
        assert_eq!(tags[0].user_count, 42);
    }
}
