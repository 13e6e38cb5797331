use std::{
	collections::HashMap,
	future::Future,
	sync::{Arc, Mutex},
	time::{Duration, Instant},
};

use tokio::sync::Mutex as AsyncMutex;

/// Async TTL cache with per-key compute coalescing: at most one caller
/// computes a given key at a time, and concurrent callers for that key all
/// observe the single stored result. The entry map and the lock registry
/// have separate lock scopes; the compute itself runs outside both, so
/// unrelated keys never serialize against each other.
pub struct TtlCache<V> {
	entries: Mutex<HashMap<String, (Instant, V)>>,
	locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl<V> TtlCache<V>
where
	V: Clone,
{
	pub fn new() -> Self {
		Self { entries: Mutex::new(HashMap::new()), locks: Mutex::new(HashMap::new()) }
	}

	/// Returns the cached value if present and unexpired. Expired entries
	/// are evicted lazily on read.
	pub fn get(&self, key: &str) -> Option<V> {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		match entries.get(key) {
			Some((expiry, value)) if *expiry > Instant::now() => Some(value.clone()),
			Some(_) => {
				entries.remove(key);

				None
			},
			None => None,
		}
	}

	/// Fast path returns the cached value. Otherwise callers for the same
	/// key serialize on a per-key lock, re-check under it, and the first
	/// one through runs `compute` and stores the result for `ttl`. A failed
	/// compute is handed to its caller verbatim and nothing is cached, so
	/// the next caller re-attempts instead of seeing a poisoned entry.
	pub async fn get_or_compute<F, Fut, E>(
		&self,
		key: &str,
		ttl: Duration,
		compute: F,
	) -> Result<V, E>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<V, E>>,
	{
		if let Some(value) = self.get(key) {
			return Ok(value);
		}

		let lock = {
			let mut locks = self.locks.lock().unwrap_or_else(|err| err.into_inner());

			locks.entry(key.to_string()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
		};
		let result = {
			let _guard = lock.lock().await;

			match self.get(key) {
				Some(value) => Ok(value),
				None => {
					let started = Instant::now();

					match compute().await {
						Ok(value) => {
							tracing::debug!(
								key,
								elapsed_ms = started.elapsed().as_millis() as u64,
								"Cache compute finished."
							);
							self.entries
								.lock()
								.unwrap_or_else(|err| err.into_inner())
								.insert(key.to_string(), (Instant::now() + ttl, value.clone()));

							Ok(value)
						},
						Err(err) => Err(err),
					}
				},
			}
		};

		self.release_lock(key, lock);

		result
	}

	/// Removes an entry immediately, regardless of expiry.
	pub fn invalidate(&self, key: &str) {
		self.entries.lock().unwrap_or_else(|err| err.into_inner()).remove(key);
	}

	/// Drops the registry entry once no other caller holds the per-key
	/// lock. New callers clone under the registry lock, so the count check
	/// here cannot race with them.
	fn release_lock(&self, key: &str, lock: Arc<AsyncMutex<()>>) {
		let mut locks = self.locks.lock().unwrap_or_else(|err| err.into_inner());

		drop(lock);

		if locks.get(key).map(|existing| Arc::strong_count(existing) == 1).unwrap_or(false) {
			locks.remove(key);
		}
	}
}

impl<V> Default for TtlCache<V>
where
	V: Clone,
{
	fn default() -> Self {
		Self::new()
	}
}
