use crate::bins::BinIndex;
use crate::error::Result;
use crate::tfidf::TfidfTable;
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Lazily built, per-user bin indexes over a fixed TF-IDF table.
///
/// An index is built the first time its user is requested and then shared
/// read-only for the life of the cache. The source table never changes, so
/// a cached index is never stale.
///
/// Lookups of an already-built index take only a read lock. Two threads
/// racing on a cold user may both build; the first insert wins and both
/// get the same `Arc`.
pub struct IndexCache {
    source: TfidfTable,
    built: RwLock<AHashMap<String, Arc<BinIndex>>>,
}

impl IndexCache {
    pub fn new(source: TfidfTable) -> Self {
        let capacity = source.len();
        Self {
            source,
            built: RwLock::new(AHashMap::with_capacity(capacity)),
        }
    }

    /// The user's index, building it on first use.
    pub fn get(&self, user: &str) -> Result<Arc<BinIndex>> {
        if let Some(index) = self.built.read().get(user) {
            return Ok(Arc::clone(index));
        }

        let index = Arc::new(BinIndex::build(self.source.get(user)?)?);
        tracing::debug!(
            user,
            bins = index.num_bins(),
            words = index.num_words(),
            "bin index built"
        );

        let mut built = self.built.write();
        let entry = built.entry(user.to_string()).or_insert(index);
        Ok(Arc::clone(entry))
    }

    /// Build every user's index up front. Returns the number of users.
    pub fn warm(&self) -> Result<usize> {
        for user in self.source.users() {
            self.get(user)?;
        }
        Ok(self.source.len())
    }

    pub fn table(&self) -> &TfidfTable {
        &self.source
    }

    /// Number of indexes built so far.
    pub fn built(&self) -> usize {
        self.built.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SynthError;
    use std::thread;

    fn table() -> TfidfTable {
        TfidfTable::from_matrix(
            vec!["u1".to_string(), "u2".to_string()],
            [
                ("alpha", vec![0.1, 0.0]),
                ("beta", vec![0.1, 0.3]),
                ("gamma", vec![0.2, 0.3]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn builds_lazily_and_reuses() {
        let cache = IndexCache::new(table());
        assert_eq!(cache.built(), 0);

        let first = cache.get("u1").unwrap();
        assert_eq!(cache.built(), 1);
        assert_eq!(first.ladder(), &[0.1, 0.2]);

        let second = cache.get("u1").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn warm_builds_everyone() {
        let cache = IndexCache::new(table());
        assert_eq!(cache.warm().unwrap(), 2);
        assert_eq!(cache.built(), 2);
        assert_eq!(cache.get("u2").unwrap().bin(0.3).unwrap().words(), &["beta", "gamma"]);
    }

    #[test]
    fn unknown_user_propagates() {
        let cache = IndexCache::new(table());
        assert_eq!(cache.get("u3").unwrap_err(), SynthError::unknown_user("u3"));
        assert_eq!(cache.built(), 0);
    }

    #[test]
    fn concurrent_readers_share_one_index() {
        let cache = Arc::new(IndexCache::new(table()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.get("u2").unwrap())
            })
            .collect();
        let indexes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(cache.built(), 1);
        let kept = cache.get("u2").unwrap();
        assert!(indexes.iter().all(|i| Arc::ptr_eq(i, &kept)));
    }

    #[test]
    fn is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IndexCache>();
    }
}
