use async_trait::async_trait;
use dashmap::DashMap;
use turnstile_core::{
    Error, NewProfile, Role, UserId, UserProfile,
    error::StorageError,
    repositories::UserRepository,
};

/// Profiles keyed by user id, with an email index for lookup.
#[derive(Default)]
pub struct MemoryUserRepository {
    profiles: DashMap<String, UserProfile>,
    by_email: DashMap<String, String>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, profile: &NewProfile) -> Result<UserProfile, Error> {
        if self.by_email.contains_key(&profile.email) {
            return Err(StorageError::Database(
                "profile already exists for email".to_string(),
            )
            .into());
        }

        let built = UserProfile::builder()
            .id(profile.id.clone())
            .email(profile.email.clone())
            .display_name(profile.display_name.clone())
            .build()?;
        self.by_email
            .insert(built.email.clone(), built.id.as_str().to_string());
        self.profiles
            .insert(built.id.as_str().to_string(), built.clone());
        Ok(built)
    }

    async fn get(&self, id: &UserId) -> Result<Option<UserProfile>, Error> {
        Ok(self.profiles.get(id.as_str()).map(|p| p.clone()))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<UserProfile>, Error> {
        match self.by_email.get(email) {
            Some(id) => Ok(self.profiles.get(id.value()).map(|p| p.clone())),
            None => Ok(None),
        }
    }

    async fn set_role(&self, id: &UserId, role: Role) -> Result<(), Error> {
        match self.profiles.get_mut(id.as_str()) {
            Some(mut profile) => {
                profile.role = role;
                Ok(())
            }
            None => Err(StorageError::NotFound.into()),
        }
    }

    async fn any_super_admin(&self) -> Result<bool, Error> {
        Ok(self
            .profiles
            .iter()
            .any(|p| p.role == Role::SuperAdmin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_lookup() {
        let repo = MemoryUserRepository::new();
        let created = repo
            .create(&NewProfile::new("coach@club.example".to_string()))
            .await
            .unwrap();
        assert_eq!(created.role, Role::User);

        let by_id = repo.get(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "coach@club.example");

        let by_email = repo.get_by_email("coach@club.example").await.unwrap();
        assert!(by_email.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = MemoryUserRepository::new();
        repo.create(&NewProfile::new("coach@club.example".to_string()))
            .await
            .unwrap();
        let err = repo
            .create(&NewProfile::new("coach@club.example".to_string()))
            .await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn test_set_role_and_super_admin_scan() {
        let repo = MemoryUserRepository::new();
        let profile = repo
            .create(&NewProfile::new("owner@club.example".to_string()))
            .await
            .unwrap();
        assert!(!repo.any_super_admin().await.unwrap());

        repo.set_role(&profile.id, Role::SuperAdmin).await.unwrap();
        assert!(repo.any_super_admin().await.unwrap());

        let err = repo.set_role(&UserId::new_random(), Role::Admin).await;
        assert!(err.is_err());
    }
}
