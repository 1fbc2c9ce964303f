//! Session-lifetime response cache, one store per query family.
//!
//! The cache lives as long as the session service, storing parsed server
//! payloads keyed by the canonical fingerprint of the request parameters.
//! This avoids a round trip when users flip back to a view they already saw.
//!
//! # Cache Key Structure
//! - [`CacheKey`]: sorted-JSON rendering of the request's [`ParameterSet`]
//!
//! # Cache Value Structure
//! - [`Payload`]: the parsed JSON result, shared and never mutated once stored
//!
//! Stores are only ever emptied wholesale. Keys carry no server-side version,
//! so anything that changes the dataset must clear every store.
//!
//! [`ParameterSet`]: crate::params::ParameterSet

use crate::config::INITIAL_STORE_CAPACITY;
use crate::params::CacheKey;
use log::debug;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Parsed server result as held by the cache.
pub type Payload = Rc<Value>;

/// Independent query categories, each with its own store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryFamily {
    Scatterplot,
    Barplot,
    GeneSet,
}

impl QueryFamily {
    pub const ALL: [QueryFamily; 3] = [QueryFamily::Scatterplot, QueryFamily::Barplot, QueryFamily::GeneSet];

    pub fn name(self) -> &'static str {
        match self {
            QueryFamily::Scatterplot => "scatterplots",
            QueryFamily::Barplot => "barplots",
            QueryFamily::GeneSet => "gene_sets",
        }
    }

    fn index(self) -> usize {
        match self {
            QueryFamily::Scatterplot => 0,
            QueryFamily::Barplot => 1,
            QueryFamily::GeneSet => 2,
        }
    }
}

impl fmt::Display for QueryFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug)]
struct FamilyStore {
    entries: HashMap<CacheKey, Payload>,
    // Bumped on every clear.
    generation: u64,
}

impl FamilyStore {
    fn new() -> Self {
        Self {
            entries: HashMap::with_capacity(INITIAL_STORE_CAPACITY),
            generation: 0,
        }
    }
}

/// Keyed stores for the scatterplot, bar-plot and gene-set families.
///
/// Interior mutability keeps the API on `&self`; the session runs on a single
/// event loop and no borrow is ever held across an await.
#[derive(Debug)]
pub struct RequestCache {
    stores: [RefCell<FamilyStore>; 3],
}

impl Default for RequestCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestCache {
    pub fn new() -> Self {
        Self {
            stores: [
                RefCell::new(FamilyStore::new()),
                RefCell::new(FamilyStore::new()),
                RefCell::new(FamilyStore::new()),
            ],
        }
    }

    fn store_for(&self, family: QueryFamily) -> &RefCell<FamilyStore> {
        &self.stores[family.index()]
    }

    pub fn lookup(&self, family: QueryFamily, key: &CacheKey) -> Option<Payload> {
        let hit = self.store_for(family).borrow().entries.get(key).cloned();
        if hit.is_some() {
            debug!("{} cache hit: {}", family, key);
        }
        hit
    }

    pub fn contains(&self, family: QueryFamily, key: &CacheKey) -> bool {
        self.store_for(family).borrow().entries.contains_key(key)
    }

    /// Insert or overwrite the entry for `key`.
    pub fn store(&self, family: QueryFamily, key: CacheKey, payload: Payload) {
        debug!("{} cache store: {}", family, key);
        self.store_for(family).borrow_mut().entries.insert(key, payload);
    }

    /// Current generation of a family store, for use with [`Self::store_if_current`].
    pub fn generation(&self, family: QueryFamily) -> u64 {
        self.store_for(family).borrow().generation
    }

    /// Store only if the family has not been cleared since `generation` was read.
    ///
    /// Returns whether the entry was written.
    pub fn store_if_current(&self, family: QueryFamily, key: CacheKey, generation: u64, payload: Payload) -> bool {
        let mut store = self.store_for(family).borrow_mut();
        if store.generation != generation {
            debug!("{} cache cleared while request was in flight, not storing {}", family, key);
            return false;
        }
        debug!("{} cache store: {}", family, key);
        store.entries.insert(key, payload);
        true
    }

    pub fn len(&self, family: QueryFamily) -> usize {
        self.store_for(family).borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        QueryFamily::ALL.iter().all(|&family| self.len(family) == 0)
    }

    pub fn clear(&self, family: QueryFamily) {
        let mut store = self.store_for(family).borrow_mut();
        debug!("clearing {} cache ({} entries)", family, store.entries.len());
        store.entries.clear();
        store.generation = store.generation.wrapping_add(1);
    }

    pub fn clear_all(&self) {
        for family in QueryFamily::ALL {
            self.clear(family);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterSet;
    use serde_json::json;

    fn key(scatter_type: &str) -> CacheKey {
        ParameterSet::new().with("scatter_type", scatter_type).canonicalize()
    }

    #[test]
    fn store_then_lookup_returns_entry() {
        let cache = RequestCache::new();
        let entry: Payload = Rc::new(json!({"data": [], "layout": {}}));
        cache.store(QueryFamily::Scatterplot, key("Means"), entry.clone());
        assert_eq!(cache.lookup(QueryFamily::Scatterplot, &key("Means")), Some(entry));
    }

    #[test]
    fn families_are_independent() {
        let cache = RequestCache::new();
        cache.store(QueryFamily::Scatterplot, key("Means"), Rc::new(json!(1)));
        assert!(cache.lookup(QueryFamily::Barplot, &key("Means")).is_none());
        assert!(cache.lookup(QueryFamily::GeneSet, &key("Means")).is_none());
    }

    #[test]
    fn store_overwrites() {
        let cache = RequestCache::new();
        cache.store(QueryFamily::Barplot, key("Means"), Rc::new(json!(1)));
        cache.store(QueryFamily::Barplot, key("Means"), Rc::new(json!(2)));
        assert_eq!(cache.len(QueryFamily::Barplot), 1);
        assert_eq!(*cache.lookup(QueryFamily::Barplot, &key("Means")).unwrap(), json!(2));
    }

    #[test]
    fn clear_only_touches_one_family() {
        let cache = RequestCache::new();
        cache.store(QueryFamily::Scatterplot, key("Means"), Rc::new(json!(1)));
        cache.store(QueryFamily::GeneSet, key("Means"), Rc::new(json!(1)));
        cache.clear(QueryFamily::Scatterplot);
        assert!(!cache.contains(QueryFamily::Scatterplot, &key("Means")));
        assert!(cache.contains(QueryFamily::GeneSet, &key("Means")));
    }

    #[test]
    fn clear_all_empties_everything() {
        let cache = RequestCache::new();
        for family in QueryFamily::ALL {
            cache.store(family, key("Cells"), Rc::new(json!(null)));
        }
        cache.clear_all();
        assert!(cache.is_empty());
    }

    #[test]
    fn stale_generation_is_not_stored() {
        let cache = RequestCache::new();
        let generation = cache.generation(QueryFamily::Scatterplot);
        cache.clear_all();
        let written = cache.store_if_current(QueryFamily::Scatterplot, key("Means"), generation, Rc::new(json!(1)));
        assert!(!written);
        assert!(cache.lookup(QueryFamily::Scatterplot, &key("Means")).is_none());

        let generation = cache.generation(QueryFamily::Scatterplot);
        assert!(cache.store_if_current(QueryFamily::Scatterplot, key("Means"), generation, Rc::new(json!(1))));
    }
}
