//! Operator template registry
//!
//! Maps `(semantic type, operator key)` to a template function producing the
//! SQL fragment for one condition. Built once at startup; an operator key
//! missing from the registry is the documented lenient-failure path (the
//! condition compiles to an empty string and is dropped).

use crate::catalog::SemanticType;
use ahash::AHashMap;
use once_cell::sync::Lazy;
use smallvec::SmallVec;

/// Template: (column, raw user value) -> SQL fragment
pub type TemplateFn = fn(&str, &str) -> String;

/// Double embedded single quotes so a quoted literal cannot break out
pub(crate) fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

pub(crate) fn quote_literal(value: &str) -> String {
    format!("'{}'", escape_literal(value))
}

/// Split a comma-separated value into trimmed, non-empty parts
pub(crate) fn split_list(value: &str) -> SmallVec<[&str; 4]> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

fn truthy_bit(value: &str) -> &'static str {
    let v = value.trim();
    if v.eq_ignore_ascii_case("true") || v == "1" {
        "1"
    } else {
        "0"
    }
}

// ───────────────────────────────────────────────────────────────────────────
// String templates
// ───────────────────────────────────────────────────────────────────────────

fn eq_quoted(col: &str, v: &str) -> String {
    format!("{} = {}", col, quote_literal(v))
}

fn neq_quoted(col: &str, v: &str) -> String {
    format!("{} != {}", col, quote_literal(v))
}

fn like_contains(col: &str, v: &str) -> String {
    format!("{} LIKE '%{}%'", col, escape_literal(v))
}

fn not_like_contains(col: &str, v: &str) -> String {
    format!("{} NOT LIKE '%{}%'", col, escape_literal(v))
}

fn like_starts_with(col: &str, v: &str) -> String {
    format!("{} LIKE '{}%'", col, escape_literal(v))
}

fn like_ends_with(col: &str, v: &str) -> String {
    format!("{} LIKE '%{}'", col, escape_literal(v))
}

fn like_pattern(col: &str, v: &str) -> String {
    format!("{} LIKE '{}'", col, escape_literal(v))
}

fn regexp_like(col: &str, v: &str) -> String {
    format!("REGEXP_LIKE({}, '{}')", col, escape_literal(v))
}

fn in_quoted(col: &str, v: &str) -> String {
    let parts = split_list(v);
    if parts.is_empty() {
        return String::new();
    }
    let members: Vec<String> = parts.iter().map(|p| quote_literal(p)).collect();
    format!("{} IN ({})", col, members.join(", "))
}

fn not_in_quoted(col: &str, v: &str) -> String {
    let parts = split_list(v);
    if parts.is_empty() {
        return String::new();
    }
    let members: Vec<String> = parts.iter().map(|p| quote_literal(p)).collect();
    format!("{} NOT IN ({})", col, members.join(", "))
}

// ───────────────────────────────────────────────────────────────────────────
// Raw-value templates (number and date semantics)
// ───────────────────────────────────────────────────────────────────────────

fn eq_raw(col: &str, v: &str) -> String {
    format!("{} = {}", col, v.trim())
}

fn neq_raw(col: &str, v: &str) -> String {
    format!("{} != {}", col, v.trim())
}

fn greater_than(col: &str, v: &str) -> String {
    format!("{} > {}", col, v.trim())
}

fn greater_than_or_equal(col: &str, v: &str) -> String {
    format!("{} >= {}", col, v.trim())
}

fn less_than(col: &str, v: &str) -> String {
    format!("{} < {}", col, v.trim())
}

fn less_than_or_equal(col: &str, v: &str) -> String {
    format!("{} <= {}", col, v.trim())
}

fn between_raw(col: &str, v: &str) -> String {
    let parts = split_list(v);
    if parts.len() < 2 {
        return String::new();
    }
    format!("{} BETWEEN {} AND {}", col, parts[0], parts[1])
}

fn in_raw(col: &str, v: &str) -> String {
    let parts = split_list(v);
    if parts.is_empty() {
        return String::new();
    }
    format!("{} IN ({})", col, parts.join(", "))
}

fn not_in_raw(col: &str, v: &str) -> String {
    let parts = split_list(v);
    if parts.is_empty() {
        return String::new();
    }
    format!("{} NOT IN ({})", col, parts.join(", "))
}

fn in_last(col: &str, v: &str, unit: &str) -> String {
    format!(
        "{} >= CURRENT_DATE - INTERVAL '{} {}'",
        col,
        v.trim(),
        unit
    )
}

fn in_last_days(col: &str, v: &str) -> String {
    in_last(col, v, "DAY")
}

fn in_last_weeks(col: &str, v: &str) -> String {
    in_last(col, v, "WEEK")
}

fn in_last_months(col: &str, v: &str) -> String {
    in_last(col, v, "MONTH")
}

fn in_last_years(col: &str, v: &str) -> String {
    in_last(col, v, "YEAR")
}

// ───────────────────────────────────────────────────────────────────────────
// Boolean templates (truthy value maps to the 1/0 flag columns)
// ───────────────────────────────────────────────────────────────────────────

fn eq_boolean(col: &str, v: &str) -> String {
    format!("{} = {}", col, truthy_bit(v))
}

fn neq_boolean(col: &str, v: &str) -> String {
    format!("{} != {}", col, truthy_bit(v))
}

// ───────────────────────────────────────────────────────────────────────────
// Array templates
// ───────────────────────────────────────────────────────────────────────────

fn array_contains(col: &str, v: &str) -> String {
    format!("ARRAY_CONTAINS({}, {})", col, quote_literal(v.trim()))
}

fn array_not_contains(col: &str, v: &str) -> String {
    format!("NOT ARRAY_CONTAINS({}, {})", col, quote_literal(v.trim()))
}

fn array_contains_all(col: &str, v: &str) -> String {
    let parts = split_list(v);
    if parts.is_empty() {
        return String::new();
    }
    let members: Vec<String> = parts.iter().map(|p| array_contains(col, p)).collect();
    members.join(" AND ")
}

fn array_contains_any(col: &str, v: &str) -> String {
    let parts = split_list(v);
    if parts.is_empty() {
        return String::new();
    }
    let members: Vec<String> = parts.iter().map(|p| array_contains(col, p)).collect();
    if members.len() == 1 {
        members.into_iter().next().unwrap_or_default()
    } else {
        format!("({})", members.join(" OR "))
    }
}

fn array_length_equals(col: &str, v: &str) -> String {
    format!("ARRAY_SIZE({}) = {}", col, v.trim())
}

fn array_length_greater_than(col: &str, v: &str) -> String {
    format!("ARRAY_SIZE({}) > {}", col, v.trim())
}

fn array_length_less_than(col: &str, v: &str) -> String {
    format!("ARRAY_SIZE({}) < {}", col, v.trim())
}

fn array_is_empty(col: &str, _v: &str) -> String {
    format!("ARRAY_SIZE({}) = 0", col)
}

fn array_is_not_empty(col: &str, _v: &str) -> String {
    format!("ARRAY_SIZE({}) > 0", col)
}

// ───────────────────────────────────────────────────────────────────────────
// Null checks (value is never read)
// ───────────────────────────────────────────────────────────────────────────

fn is_null(col: &str, _v: &str) -> String {
    format!("{} IS NULL", col)
}

fn is_not_null(col: &str, _v: &str) -> String {
    format!("{} IS NOT NULL", col)
}

// ───────────────────────────────────────────────────────────────────────────
// Registry
// ───────────────────────────────────────────────────────────────────────────

struct TemplateRegistry {
    string: AHashMap<&'static str, TemplateFn>,
    number: AHashMap<&'static str, TemplateFn>,
    date: AHashMap<&'static str, TemplateFn>,
    boolean: AHashMap<&'static str, TemplateFn>,
    array: AHashMap<&'static str, TemplateFn>,
}

fn set(entries: &[(&'static str, TemplateFn)]) -> AHashMap<&'static str, TemplateFn> {
    entries.iter().copied().collect()
}

impl TemplateRegistry {
    fn build() -> Self {
        Self {
            string: set(&[
                ("equals", eq_quoted),
                ("not_equals", neq_quoted),
                ("contains", like_contains),
                ("not_contains", not_like_contains),
                ("starts_with", like_starts_with),
                ("ends_with", like_ends_with),
                ("like", like_pattern),
                ("regex", regexp_like),
                ("in", in_quoted),
                ("not_in", not_in_quoted),
                ("is_null", is_null),
                ("is_not_null", is_not_null),
            ]),
            number: set(&[
                ("equals", eq_raw),
                ("not_equals", neq_raw),
                ("greater_than", greater_than),
                ("greater_than_or_equal", greater_than_or_equal),
                ("less_than", less_than),
                ("less_than_or_equal", less_than_or_equal),
                ("between", between_raw),
                ("in", in_raw),
                ("not_in", not_in_raw),
                ("is_null", is_null),
                ("is_not_null", is_not_null),
            ]),
            date: set(&[
                ("equals", eq_raw),
                ("not_equals", neq_raw),
                ("before", less_than),
                ("after", greater_than),
                ("between", between_raw),
                ("in_last_days", in_last_days),
                ("in_last_weeks", in_last_weeks),
                ("in_last_months", in_last_months),
                ("in_last_years", in_last_years),
                ("is_null", is_null),
                ("is_not_null", is_not_null),
            ]),
            boolean: set(&[
                ("equals", eq_boolean),
                ("not_equals", neq_boolean),
                ("is_null", is_null),
                ("is_not_null", is_not_null),
            ]),
            array: set(&[
                ("contains", array_contains),
                ("not_contains", array_not_contains),
                ("contains_all", array_contains_all),
                ("contains_any", array_contains_any),
                ("array_length_equals", array_length_equals),
                ("array_length_greater_than", array_length_greater_than),
                ("array_length_less_than", array_length_less_than),
                ("is_empty", array_is_empty),
                ("is_not_empty", array_is_not_empty),
            ]),
        }
    }
}

static REGISTRY: Lazy<TemplateRegistry> = Lazy::new(TemplateRegistry::build);

/// Template for a `(semantic type, operator key)` pair, if the pair is legal
pub fn template_for(semantic_type: SemanticType, operator: &str) -> Option<TemplateFn> {
    let registry = match semantic_type {
        SemanticType::String => &REGISTRY.string,
        SemanticType::Number => &REGISTRY.number,
        SemanticType::Date => &REGISTRY.date,
        SemanticType::Boolean => &REGISTRY.boolean,
        SemanticType::Array => &REGISTRY.array,
    };
    registry.get(operator).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::operators_for;

    #[test]
    fn test_every_cataloged_operator_has_a_template() {
        for semantic_type in [
            SemanticType::String,
            SemanticType::Number,
            SemanticType::Date,
            SemanticType::Boolean,
            SemanticType::Array,
        ] {
            for op in operators_for(semantic_type) {
                assert!(
                    template_for(semantic_type, op.key).is_some(),
                    "missing template for ({:?}, {})",
                    semantic_type,
                    op.key
                );
            }
        }
    }

    #[test]
    fn test_unknown_operator_has_no_template() {
        assert!(template_for(SemanticType::String, "sounds_like").is_none());
        assert!(template_for(SemanticType::Number, "contains").is_none());
    }

    #[test]
    fn test_string_equals_quotes_and_escapes() {
        let t = template_for(SemanticType::String, "equals").unwrap();
        assert_eq!(t("USER_TYPE", "seller"), "USER_TYPE = 'seller'");
        assert_eq!(t("USER_CITY", "O'Fallon"), "USER_CITY = 'O''Fallon'");
    }

    #[test]
    fn test_pattern_operators_place_wildcards() {
        let contains = template_for(SemanticType::String, "contains").unwrap();
        let starts = template_for(SemanticType::String, "starts_with").unwrap();
        let ends = template_for(SemanticType::String, "ends_with").unwrap();
        assert_eq!(contains("USER_EMAIL", "gmail"), "USER_EMAIL LIKE '%gmail%'");
        assert_eq!(starts("USER_EMAIL", "admin"), "USER_EMAIL LIKE 'admin%'");
        assert_eq!(ends("USER_EMAIL", ".io"), "USER_EMAIL LIKE '%.io'");
    }

    #[test]
    fn test_regex_operator() {
        let t = template_for(SemanticType::String, "regex").unwrap();
        assert_eq!(
            t("USER_EMAIL", "^.+@ex\\.com$"),
            "REGEXP_LIKE(USER_EMAIL, '^.+@ex\\.com$')"
        );
    }

    #[test]
    fn test_in_list_quoting_by_type() {
        let quoted = template_for(SemanticType::String, "in").unwrap();
        assert_eq!(
            quoted("USER_TYPE", "seller, buyer"),
            "USER_TYPE IN ('seller', 'buyer')"
        );

        let raw = template_for(SemanticType::Number, "in").unwrap();
        assert_eq!(
            raw("PAID_LISTINGS_COUNT", "1, 2, 3"),
            "PAID_LISTINGS_COUNT IN (1, 2, 3)"
        );
    }

    #[test]
    fn test_between_requires_two_parts() {
        let t = template_for(SemanticType::Number, "between").unwrap();
        assert_eq!(t("TOTAL_SPEND", "10, 100"), "TOTAL_SPEND BETWEEN 10 AND 100");
        assert_eq!(t("TOTAL_SPEND", "10"), "");
        assert_eq!(t("TOTAL_SPEND", ""), "");
    }

    #[test]
    fn test_boolean_truthy_mapping() {
        let eq = template_for(SemanticType::Boolean, "equals").unwrap();
        assert_eq!(eq("IS_BLOCK", "true"), "IS_BLOCK = 1");
        assert_eq!(eq("IS_BLOCK", "1"), "IS_BLOCK = 1");
        assert_eq!(eq("IS_BLOCK", "false"), "IS_BLOCK = 0");
        assert_eq!(eq("IS_BLOCK", "anything"), "IS_BLOCK = 0");
    }

    #[test]
    fn test_array_contains_all_and_any() {
        let all = template_for(SemanticType::Array, "contains_all").unwrap();
        assert_eq!(
            all("VERTICALS_LISTED_IN", "cars, electronics"),
            "ARRAY_CONTAINS(VERTICALS_LISTED_IN, 'cars') AND ARRAY_CONTAINS(VERTICALS_LISTED_IN, 'electronics')"
        );

        let any = template_for(SemanticType::Array, "contains_any").unwrap();
        assert_eq!(
            any("VERTICALS_LISTED_IN", "cars, electronics"),
            "(ARRAY_CONTAINS(VERTICALS_LISTED_IN, 'cars') OR ARRAY_CONTAINS(VERTICALS_LISTED_IN, 'electronics'))"
        );
        assert_eq!(
            any("VERTICALS_LISTED_IN", "cars"),
            "ARRAY_CONTAINS(VERTICALS_LISTED_IN, 'cars')"
        );
    }

    #[test]
    fn test_array_size_operators() {
        let empty = template_for(SemanticType::Array, "is_empty").unwrap();
        let not_empty = template_for(SemanticType::Array, "is_not_empty").unwrap();
        assert_eq!(empty("DEVICE_IDS", "ignored"), "ARRAY_SIZE(DEVICE_IDS) = 0");
        assert_eq!(not_empty("DEVICE_IDS", ""), "ARRAY_SIZE(DEVICE_IDS) > 0");
    }

    #[test]
    fn test_date_relative_windows() {
        let days = template_for(SemanticType::Date, "in_last_days").unwrap();
        assert_eq!(
            days("LAST_ACTIVE_DATE", "30"),
            "LAST_ACTIVE_DATE >= CURRENT_DATE - INTERVAL '30 DAY'"
        );
        let months = template_for(SemanticType::Date, "in_last_months").unwrap();
        assert_eq!(
            months("SIGNUP_DATE", "6"),
            "SIGNUP_DATE >= CURRENT_DATE - INTERVAL '6 MONTH'"
        );
    }

    #[test]
    fn test_null_checks_ignore_value() {
        let t = template_for(SemanticType::Boolean, "is_not_null").unwrap();
        assert_eq!(t("IS_BLOCK", "true"), "IS_BLOCK IS NOT NULL");
    }
}
