use crate::models::PhoneRecord;
use crate::phone::CanonicalPhone;
use crate::repository::PhoneRepository;
use crate::store::StoreResult;

/// Phone → address operations consumed by the HTTP handlers.
///
/// Phones arrive already normalized; nothing here re-normalizes or knows
/// which backend sits behind the repository. "Not found" and "already
/// exists" are reported as `false`/`None`, never as errors.
#[derive(Clone)]
pub struct PhoneService {
    repository: PhoneRepository,
}

impl PhoneService {
    pub fn new(repository: PhoneRepository) -> Self {
        Self { repository }
    }

    /// Record for `phone`, or `None` if absent.
    pub async fn get_by_phone(&self, phone: &CanonicalPhone) -> StoreResult<Option<PhoneRecord>> {
        let address = self.repository.get(phone).await?;
        Ok(address.map(|address| PhoneRecord {
            phone: phone.clone(),
            address,
        }))
    }

    /// Creates the record. `false` means the phone is already taken.
    pub async fn create(&self, record: &PhoneRecord) -> StoreResult<bool> {
        self.repository
            .create(&record.phone, &record.address)
            .await
    }

    /// Replaces the address. `false` means the phone is not stored.
    pub async fn update(&self, phone: &CanonicalPhone, address: &str) -> StoreResult<bool> {
        self.repository.update(phone, address).await
    }

    /// Removes the record. `false` means the phone is not stored.
    pub async fn delete(&self, phone: &CanonicalPhone) -> StoreResult<bool> {
        self.repository.delete(phone).await
    }

    pub async fn ping(&self) -> StoreResult<()> {
        self.repository.ping().await
    }
}
