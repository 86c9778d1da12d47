//! Compiled-fragment cache
//!
//! The editing UI recompiles every row on each keystroke; only one row actually
//! changed, so the others are served from this cache. Keyed by the row's
//! semantic fingerprint (catalog-resolved type included), so a catalog swap
//! cannot serve a stale fragment.

use crate::catalog::AttributeCatalog;
use crate::condition::compiler;
use crate::condition::model::{Condition, ConditionBody};
use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

static FRAGMENT_CACHE: Lazy<RwLock<AHashMap<String, String>>> = Lazy::new(|| {
    let map = AHashMap::with_capacity(256);
    RwLock::new(map)
});

/// Every keystroke mints a new fingerprint, so the cache is flushed wholesale
/// once it fills rather than growing without bound
const FRAGMENT_CACHE_MAX: usize = 4096;

/// Unit separator keeps field boundaries unambiguous in the key
const SEP: char = '\u{1f}';

fn fingerprint(catalog: &AttributeCatalog, condition: &Condition) -> String {
    match &condition.body {
        ConditionBody::Attribute {
            attribute,
            operator,
            value,
        } => {
            let semantic_type = catalog.semantic_type_of(attribute);
            format!(
                "a{SEP}{:?}{SEP}{}{SEP}{}{SEP}{}",
                semantic_type, attribute, operator, value
            )
        }
        ConditionBody::Segment { tag } => format!("s{SEP}{}", tag),
    }
}

/// Compile a condition, using the cache for repeated rows
pub fn get_or_compile(catalog: &AttributeCatalog, condition: &Condition) -> String {
    let key = fingerprint(catalog, condition);

    // Fast path: check read lock first
    {
        let cache = FRAGMENT_CACHE.read();
        if let Some(fragment) = cache.get(&key) {
            return fragment.clone();
        }
    }

    // Slow path: compile and cache
    let fragment = compiler::compile_condition(catalog, condition);

    {
        let mut cache = FRAGMENT_CACHE.write();
        if cache.len() >= FRAGMENT_CACHE_MAX {
            cache.clear();
        }
        cache.insert(key, fragment.clone());
    }

    fragment
}

/// Clear the fragment cache (catalog re-init, tests)
pub fn clear_cache() {
    let mut cache = FRAGMENT_CACHE.write();
    cache.clear();
}

/// Get cache statistics
#[allow(dead_code)]
pub fn cache_size() -> usize {
    let cache = FRAGMENT_CACHE.read();
    cache.len()
}
