use std::{
	sync::Arc,
	time::{Duration, Instant},
};

use dashmap::DashMap;

/// Page cache configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
	/// How long a cached page stays valid.
	pub page_ttl: Duration,
}

impl Default for CacheConfig {
	fn default() -> Self {
		Self {
			page_ttl: Duration::from_secs(20),
		}
	}
}

impl CacheConfig {
	/// Reads the TTL from `CACHE_TTL_SECS`, falling back to the default.
	pub fn from_env() -> Self {
		std::env::var("CACHE_TTL_SECS")
			.ok()
			.and_then(|ttl| ttl.parse().ok())
			.map_or_else(Self::default, |secs| Self {
				page_ttl: Duration::from_secs(secs),
			})
	}
}

#[derive(Debug)]
struct Entry {
	body: String,
	stored_at: Instant,
}

/// A TTL-bound cache of rendered page bodies, keyed by page identity.
///
/// Entries expire after [`CacheConfig::page_ttl`]; content mutations
/// elsewhere in the application do not invalidate them, so a freshly
/// created post only shows up once the entry expires or the cache is
/// cleared explicitly.
#[derive(Clone)]
pub struct PageCache {
	entries: Arc<DashMap<String, Entry>>,
	config: CacheConfig,
}

impl PageCache {
	pub fn new(config: CacheConfig) -> Self {
		Self {
			entries: Arc::new(DashMap::new()),
			config,
		}
	}

	/// Returns the cached body for `key`, dropping it if it has expired.
	pub fn get(&self, key: &str) -> Option<String> {
		let entry = self.entries.get(key)?;

		if entry.stored_at.elapsed() >= self.config.page_ttl {
			drop(entry);
			self.entries.remove(key);
			tracing::debug!(key, "cache entry expired");

			return None;
		}

		tracing::debug!(key, "cache hit");

		Some(entry.body.clone())
	}

	pub fn put(&self, key: impl Into<String>, body: String) {
		let key = key.into();

		tracing::debug!(key = %key, bytes = body.len(), "cache store");

		self.entries.insert(
			key,
			Entry {
				body,
				stored_at: Instant::now(),
			},
		);
	}

	/// Drops every cached page at once.
	pub fn clear(&self) {
		self.entries.clear();
	}
}
