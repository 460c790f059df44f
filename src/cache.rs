use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// In-memory TTL cache keyed by string. Values are typed per cache instance;
/// expired entries are dropped on read.
pub struct Cache<V> {
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V: Clone> Cache<V> {
    pub fn new() -> Self {
        Cache {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().unwrap();

        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key.into(),
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Removes every entry whose key starts with `prefix`. An empty prefix
    /// clears the whole cache.
    pub fn invalidate(&self, prefix: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|key, _| !key.starts_with(prefix));
    }
}

impl<V: Clone> Default for Cache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_value_before_expiry() {
        let cache = Cache::new();
        cache.set("items:active", vec![1, 2, 3], Duration::from_secs(60));

        assert_eq!(cache.get("items:active"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn get_drops_expired_entries() {
        let cache = Cache::new();
        cache.set("items:active", 1, Duration::from_millis(10));

        std::thread::sleep(Duration::from_millis(25));
        assert_eq!(cache.get("items:active"), None);
    }

    #[test]
    fn missing_key_is_none() {
        let cache: Cache<i32> = Cache::new();
        assert_eq!(cache.get("nope"), None);
    }

    #[test]
    fn invalidate_removes_matching_prefix_only() {
        let cache = Cache::new();
        cache.set("items:active", 1, Duration::from_secs(60));
        cache.set("items:all", 2, Duration::from_secs(60));
        cache.set("bills:recent", 3, Duration::from_secs(60));

        cache.invalidate("items:");

        assert_eq!(cache.get("items:active"), None);
        assert_eq!(cache.get("items:all"), None);
        assert_eq!(cache.get("bills:recent"), Some(3));
    }

    #[test]
    fn invalidate_with_empty_prefix_clears_everything() {
        let cache = Cache::new();
        cache.set("items:active", 1, Duration::from_secs(60));
        cache.set("bills:recent", 2, Duration::from_secs(60));

        cache.invalidate("");

        assert_eq!(cache.get("items:active"), None);
        assert_eq!(cache.get("bills:recent"), None);
    }
}
