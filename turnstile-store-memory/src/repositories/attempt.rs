use async_trait::async_trait;
use dashmap::DashMap;
use turnstile_core::{
    Error, LoginAttemptRecord, repositories::LoginAttemptRepository,
};

/// Attempt records keyed by hex SHA-256 of the normalized email.
#[derive(Default)]
pub struct MemoryLoginAttemptRepository {
    records: DashMap<String, LoginAttemptRecord>,
}

impl MemoryLoginAttemptRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoginAttemptRepository for MemoryLoginAttemptRepository {
    async fn get(&self, email_key: &str) -> Result<Option<LoginAttemptRecord>, Error> {
        Ok(self.records.get(email_key).map(|r| r.clone()))
    }

    async fn upsert(&self, record: &LoginAttemptRecord) -> Result<(), Error> {
        // Whole-document replace, same as the document store's merge unit.
        self.records.insert(record.key(), record.clone());
        Ok(())
    }

    async fn delete(&self, email_key: &str) -> Result<(), Error> {
        self.records.remove(email_key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turnstile_core::crypto::email_key;

    #[tokio::test]
    async fn test_round_trip_by_hashed_key() {
        let repo = MemoryLoginAttemptRepository::new();
        let mut record = LoginAttemptRecord::new("fan@club.example".to_string());
        record.fail_count = 3;

        repo.upsert(&record).await.unwrap();

        let key = email_key("fan@club.example");
        let loaded = repo.get(&key).await.unwrap().unwrap();
        assert_eq!(loaded, record);

        // Raw address is not a key.
        assert!(repo.get("fan@club.example").await.unwrap().is_none());

        repo.delete(&key).await.unwrap();
        assert!(repo.get(&key).await.unwrap().is_none());
    }
}
