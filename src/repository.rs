//! Phone → address records over a [`KvStore`].
//!
//! Records are flattened to one key per phone: `<prefix>:<E.164 phone>`,
//! with the address stored as UTF-8 bytes. The repository holds no locks;
//! uniqueness comes from the backend's atomic conditional set.

use crate::phone::CanonicalPhone;
use crate::store::{KvStore, StoreError, StoreResult};
use std::sync::Arc;

/// Namespace used when none is configured.
pub const DEFAULT_KEY_PREFIX: &str = "phone";

#[derive(Clone)]
pub struct PhoneRepository {
    store: Arc<dyn KvStore>,
    prefix: String,
}

impl PhoneRepository {
    pub fn new(store: Arc<dyn KvStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Builds the store key for a phone.
    ///
    /// Canonical phones never contain `:`, so distinct phones never share a key.
    pub fn key(&self, phone: &CanonicalPhone) -> String {
        format!("{}:{}", self.prefix, phone)
    }

    /// Address stored for `phone`, or `None` if there is no record.
    pub async fn get(&self, phone: &CanonicalPhone) -> StoreResult<Option<String>> {
        match self.store.get(&self.key(phone)).await? {
            Some(raw) => String::from_utf8(raw)
                .map(Some)
                .map_err(|e| StoreError::Decode(e.to_string())),
            None => Ok(None),
        }
    }

    /// Creates the record only if the phone is not stored yet.
    ///
    /// Returns `false` if the phone already existed; the stored address is left as is.
    pub async fn create(&self, phone: &CanonicalPhone, address: &str) -> StoreResult<bool> {
        self.store
            .set_if_absent(&self.key(phone), address.as_bytes())
            .await
    }

    /// Replaces the address of an existing record.
    ///
    /// Returns `false` if the phone is not stored. The existence check and the
    /// write are two separate calls: a delete landing between them is undone
    /// by the write, recreating the record with the new address.
    pub async fn update(&self, phone: &CanonicalPhone, address: &str) -> StoreResult<bool> {
        let key = self.key(phone);
        if !self.store.exists(&key).await? {
            return Ok(false);
        }

        self.store.set(&key, address.as_bytes()).await?;
        Ok(true)
    }

    /// Removes the record. Returns `false` if there was nothing to remove.
    pub async fn delete(&self, phone: &CanonicalPhone) -> StoreResult<bool> {
        let deleted = self.store.delete(&self.key(phone)).await?;
        Ok(deleted > 0)
    }

    /// Checks that the backend answers.
    pub async fn ping(&self) -> StoreResult<()> {
        self.store.ping().await
    }
}
