//! In-memory entity cache shared by the resources
//!
//! A cache is *fresh* after a full list has been loaded into it. Mutations
//! call [`EntityCache::invalidate`], so the next read goes back to the API.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::error::BudgetwiseError;

pub struct EntityCache<K, V> {
    entries: RwLock<HashMap<K, V>>,
    fresh: AtomicBool,
}

impl<K, V> Default for EntityCache<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            fresh: AtomicBool::new(false),
        }
    }
}

impl<K, V> EntityCache<K, V>
where
    K: Eq + Hash + Copy,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fresh(&self) -> bool {
        self.fresh.load(Ordering::Acquire)
    }

    /// Every cached value, if the cache holds a complete list
    pub fn all(&self) -> Result<Option<Vec<V>>, BudgetwiseError> {
        if !self.is_fresh() {
            return Ok(None);
        }
        let entries = self
            .entries
            .read()
            .map_err(|e| BudgetwiseError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(Some(entries.values().cloned().collect()))
    }

    pub fn get(&self, key: K) -> Result<Option<V>, BudgetwiseError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| BudgetwiseError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(entries.get(&key).cloned())
    }

    /// Replace the contents with a complete list and mark the cache fresh
    pub fn fill(
        &self,
        values: impl IntoIterator<Item = V>,
        key_of: impl Fn(&V) -> K,
    ) -> Result<(), BudgetwiseError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| BudgetwiseError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        entries.clear();
        for value in values {
            entries.insert(key_of(&value), value);
        }
        self.fresh.store(true, Ordering::Release);
        Ok(())
    }

    /// Cache a single fetched value without making the list fresh
    pub fn put(&self, key: K, value: V) -> Result<(), BudgetwiseError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| BudgetwiseError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        entries.insert(key, value);
        Ok(())
    }

    /// Drop everything so the next read refetches
    pub fn invalidate(&self) -> Result<(), BudgetwiseError> {
        self.fresh.store(false, Ordering::Release);
        let mut entries = self
            .entries
            .write()
            .map_err(|e| BudgetwiseError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        entries.clear();
        Ok(())
    }
}
