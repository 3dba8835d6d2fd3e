use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::database::models::{User, UserSummary};
use crate::services::ServiceError;
use crate::store::{IdentityStore, StoreError};

pub struct AuthService<I> {
    identities: I,
}

impl<I: IdentityStore> AuthService<I> {
    pub fn new(identities: I) -> Self {
        Self { identities }
    }

    /// Creates an account. Username and email are globally unique;
    /// collisions surface as `UserExists` whether caught by the
    /// pre-check or by the database constraint.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserSummary, ServiceError> {
        if username.trim().is_empty() {
            return Err(ServiceError::MissingField("username"));
        }
        if email.trim().is_empty() {
            return Err(ServiceError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(ServiceError::MissingField("password"));
        }

        if self
            .identities
            .by_username_or_email(username, email)
            .await?
            .is_some()
        {
            return Err(ServiceError::UserExists);
        }

        let hash = bcrypt::hash(password, config::config().security.bcrypt_cost)?;

        match self.identities.create(username, email, &hash).await {
            Ok(user) => Ok(UserSummary::from(&user)),
            Err(StoreError::Conflict) => Err(ServiceError::UserExists),
            Err(e) => Err(e.into()),
        }
    }

    /// Verifies credentials and issues a JWT. Unknown usernames and
    /// wrong passwords are indistinguishable to the caller.
    pub async fn login(&self, username: &str, password: &str) -> Result<(String, User), ServiceError> {
        let user = self
            .identities
            .by_username(username)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !bcrypt::verify(password, &user.password_hash)? {
            return Err(ServiceError::InvalidCredentials);
        }

        let token = generate_jwt(Claims::new(user.username.clone(), user.user_id))?;
        Ok((token, user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemIdentities {
        users: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl IdentityStore for MemIdentities {
        async fn by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.username == username)
                .cloned())
        }

        async fn by_username_or_email(
            &self,
            username: &str,
            email: &str,
        ) -> Result<Option<User>, StoreError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.username == username || u.email == email)
                .cloned())
        }

        async fn create(
            &self,
            username: &str,
            email: &str,
            password_hash: &str,
        ) -> Result<User, StoreError> {
            let mut users = self.users.lock().unwrap();
            let user = User {
                user_id: users.len() as i32 + 1,
                username: username.to_string(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                created_at: Utc::now(),
            };
            users.push(user.clone());
            Ok(user)
        }
    }

    #[tokio::test]
    async fn register_then_login_round_trips() {
        let svc = AuthService::new(MemIdentities::default());
        let summary = svc
            .register("alice", "alice@example.com", "hunter2")
            .await
            .unwrap();
        assert_eq!(summary.username, "alice");

        let (token, user) = svc.login("alice", "hunter2").await.unwrap();
        assert!(!token.is_empty());
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let svc = AuthService::new(MemIdentities::default());
        svc.register("alice", "alice@example.com", "pw").await.unwrap();
        let err = svc
            .register("alice", "other@example.com", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::UserExists));
    }

    #[tokio::test]
    async fn wrong_password_looks_like_unknown_user() {
        let svc = AuthService::new(MemIdentities::default());
        svc.register("alice", "alice@example.com", "pw").await.unwrap();

        let wrong = svc.login("alice", "nope").await.unwrap_err();
        let unknown = svc.login("nobody", "pw").await.unwrap_err();
        assert!(matches!(wrong, ServiceError::InvalidCredentials));
        assert!(matches!(unknown, ServiceError::InvalidCredentials));
    }

    #[tokio::test]
    async fn blank_fields_are_rejected() {
        let svc = AuthService::new(MemIdentities::default());
        let err = svc.register("", "a@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingField("username")));
        let err = svc.register("a", "a@example.com", "").await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingField("password")));
    }
}
