//! Bounded worker pool over an injected single-key fetch capability.
//!
//! The pool only bounds parallelism and isolates failures. No retries,
//! no backoff, no per-request timeout beyond whatever the capability
//! itself enforces.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Mutex;
use std::thread;

use partsync_core::model::{ProductKey, ProductRecord, RetrievalOutcome};

use crate::error::FetchError;

/// The injected fetch capability: given a key, produce a record or
/// fail. Implementations must be shareable across worker threads.
pub trait Fetch: Sync {
    fn fetch_one(&self, key: &ProductKey) -> Result<ProductRecord, FetchError>;
}

/// Fetch every unique key with at most `concurrency` requests in
/// flight, returning exactly one outcome per unique key.
///
/// Duplicate keys are collapsed before dispatch. A failed fetch is
/// recorded as that key's outcome and never affects the others. The
/// call blocks until all outcomes are recorded; there is no
/// partial-result mode.
pub fn fetch_all(
    keys: &[ProductKey],
    fetcher: &dyn Fetch,
    concurrency: usize,
) -> BTreeMap<ProductKey, RetrievalOutcome> {
    let unique: BTreeSet<ProductKey> = keys.iter().cloned().collect();
    if unique.is_empty() {
        return BTreeMap::new();
    }

    let workers = concurrency.max(1).min(unique.len());
    let queue: Mutex<VecDeque<ProductKey>> = Mutex::new(unique.into_iter().collect());
    let results: Mutex<BTreeMap<ProductKey, RetrievalOutcome>> = Mutex::new(BTreeMap::new());

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let next = queue.lock().expect("fetch queue poisoned").pop_front();
                let Some(key) = next else { break };

                let outcome = match fetcher.fetch_one(&key) {
                    Ok(record) => RetrievalOutcome::Retrieved(record),
                    Err(e) => RetrievalOutcome::Failed(e.to_string()),
                };

                // Write-once per key: each key is popped by exactly one
                // worker, so no cross-worker ordering is needed.
                results
                    .lock()
                    .expect("fetch results poisoned")
                    .insert(key, outcome);
            });
        }
    });

    results.into_inner().expect("fetch results poisoned")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn key(n: usize) -> ProductKey {
        ProductKey::parse(&format!("A2V{n:08}")).unwrap()
    }

    /// Fake capability that tracks the number of simultaneously active
    /// fetches and fails every key ending in an odd digit.
    struct FakeFetch {
        active: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    impl FakeFetch {
        fn new() -> Self {
            Self {
                active: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Fetch for FakeFetch {
        fn fetch_one(&self, key: &ProductKey) -> Result<ProductRecord, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(5));
            self.active.fetch_sub(1, Ordering::SeqCst);

            let odd = key.as_str().ends_with(['1', '3', '5', '7', '9']);
            if odd {
                Err(FetchError::Upstream("synthetic failure".into()))
            } else {
                Ok(ProductRecord { key: key.to_string(), ..Default::default() })
            }
        }
    }

    #[test]
    fn one_outcome_per_unique_key_with_failures_isolated() {
        let keys: Vec<ProductKey> = (0..20).map(key).collect();
        let fetcher = FakeFetch::new();
        let outcomes = fetch_all(&keys, &fetcher, 4);

        assert_eq!(outcomes.len(), 20);
        let failed = outcomes.values().filter(|o| o.record().is_none()).count();
        assert_eq!(failed, 10);
        for (k, outcome) in &outcomes {
            if let RetrievalOutcome::Retrieved(record) = outcome {
                assert_eq!(record.key, k.to_string());
            }
        }
    }

    #[test]
    fn concurrency_is_bounded() {
        let keys: Vec<ProductKey> = (0..24).map(key).collect();
        let fetcher = FakeFetch::new();
        fetch_all(&keys, &fetcher, 3);
        assert!(
            fetcher.peak.load(Ordering::SeqCst) <= 3,
            "peak in-flight {} exceeded bound",
            fetcher.peak.load(Ordering::SeqCst),
        );
    }

    #[test]
    fn duplicate_keys_fetched_once() {
        let mut keys: Vec<ProductKey> = (0..6).map(key).collect();
        keys.extend((0..6).map(key));
        keys.extend((0..3).map(key));

        let fetcher = FakeFetch::new();
        let outcomes = fetch_all(&keys, &fetcher, 8);

        assert_eq!(outcomes.len(), 6);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn empty_input_yields_empty_map() {
        let fetcher = FakeFetch::new();
        assert!(fetch_all(&[], &fetcher, 4).is_empty());
    }

    #[test]
    fn zero_concurrency_clamps_to_one() {
        let keys: Vec<ProductKey> = (0..4).map(key).collect();
        let fetcher = FakeFetch::new();
        let outcomes = fetch_all(&keys, &fetcher, 0);
        assert_eq!(outcomes.len(), 4);
        assert_eq!(fetcher.peak.load(Ordering::SeqCst), 1);
    }
}
