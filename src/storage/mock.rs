//! In-memory storage for tests, with failure injection and call counters.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::storage::{ObjectStorage, StorageError, StorageResult};

#[derive(Default)]
pub struct MockStorage {
    objects: Mutex<BTreeMap<String, Bytes>>,
    failing_puts: Mutex<Vec<String>>,
    failing_presigns: Mutex<Vec<String>>,
    presign_delays: Mutex<HashMap<String, Duration>>,
    fail_deletes: Mutex<bool>,
    pub put_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub delete_batch_calls: AtomicUsize,
    pub read_url_calls: AtomicUsize,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every put whose key contains `fragment` fail.
    pub fn fail_put_on(&self, fragment: &str) {
        self.failing_puts.lock().unwrap().push(fragment.to_string());
    }

    /// Make every presign whose key contains `fragment` fail.
    pub fn fail_presign_on(&self, fragment: &str) {
        self.failing_presigns.lock().unwrap().push(fragment.to_string());
    }

    pub fn fail_deletes(&self) {
        *self.fail_deletes.lock().unwrap() = true;
    }

    /// Delay presigning `key` by `delay`.
    pub fn delay_presign(&self, key: &str, delay: Duration) {
        self.presign_delays.lock().unwrap().insert(key.to_string(), delay);
    }

    pub fn insert(&self, key: &str, data: &'static [u8]) {
        self.objects.lock().unwrap().insert(key.to_string(), Bytes::from_static(data));
    }

    pub fn has(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn matches(list: &Mutex<Vec<String>>, key: &str) -> bool {
        list.lock().unwrap().iter().any(|fragment| key.contains(fragment.as_str()))
    }

    pub fn signed(key: &str) -> String {
        format!("https://storage.test/{key}?signature=test")
    }
}

#[async_trait]
impl ObjectStorage for MockStorage {
    async fn put(&self, key: &str, _content_type: &str, data: Bytes) -> StorageResult<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        if Self::matches(&self.failing_puts, key) {
            return Err(StorageError::UploadFailed(format!("injected failure for {key}")));
        }
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_deletes.lock().unwrap() {
            return Err(StorageError::DeleteFailed(key.to_string()));
        }
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    async fn delete_batch(&self, keys: &[String]) -> StorageResult<()> {
        if keys.is_empty() {
            return Ok(());
        }
        self.delete_batch_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_deletes.lock().unwrap() {
            return Err(StorageError::DeleteFailed(keys.join(",")));
        }
        let mut objects = self.objects.lock().unwrap();
        for key in keys {
            objects.remove(key);
        }
        Ok(())
    }

    async fn list_keys(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let directory = format!("{}/", prefix.trim_end_matches('/'));
        Ok(self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|key| key.starts_with(&directory))
            .cloned()
            .collect())
    }

    async fn read_url(&self, key: &str, _expires_in: Duration) -> StorageResult<String> {
        self.read_url_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.presign_delays.lock().unwrap().get(key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if Self::matches(&self.failing_presigns, key) {
            return Err(StorageError::PresignFailed(key.to_string()));
        }
        Ok(Self::signed(key))
    }
}
