use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::token::TokenManager;
use crate::db::{NewUser, UserStore};
use crate::error::{AppError, AuthError, DatabaseError};
use crate::Result;

#[derive(Debug, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Result of a successful login.
#[derive(Debug)]
pub struct LoginOutcome {
    pub message: String,
    pub token: String,
}

pub struct CredentialService {
    store: Arc<dyn UserStore>,
    tokens: Arc<TokenManager>,
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("Missing {}", field)));
    }
    Ok(())
}

impl CredentialService {
    pub fn new(store: Arc<dyn UserStore>, tokens: Arc<TokenManager>) -> Self {
        Self { store, tokens }
    }

    pub async fn register(&self, candidate: &Registration) -> Result<String> {
        require("username", &candidate.username)?;
        require("password", &candidate.password)?;
        require("email", &candidate.email)?;

        if self.store.find_by_username(&candidate.username).await?.is_some() {
            return Err(AppError::Conflict("User name already taken".into()));
        }

        let new_user = NewUser {
            username: candidate.username.clone(),
            password_hash: hash_password(&candidate.password)?,
            email: candidate.email.clone(),
        };

        // The unique index still catches a registration racing past the check above.
        match self.store.create_user(&new_user).await {
            Ok(user) => {
                info!("Registered user {} ({})", user.username, user.id);
                Ok(format!("User {} successfully registered", user.username))
            }
            Err(AppError::Database(DatabaseError::Duplicate)) => {
                Err(AppError::Conflict("User name already taken".into()))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome> {
        require("username", &credentials.username)?;
        require("password", &credentials.password)?;

        let user = self
            .store
            .find_by_username(&credentials.username)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(credentials.username.clone()))?;

        if !verify_password(&credentials.password, &user.password_hash) {
            warn!("Incorrect password for user {}", user.username);
            return Err(AuthError::IncorrectPassword(user.username).into());
        }

        let token = self.tokens.issue(&user)?;
        info!("Issued token for user {} ({})", user.username, user.id);

        Ok(LoginOutcome {
            message: "login successful".to_string(),
            token,
        })
    }
}

/// Hash a password using Argon2id with a fresh random salt.
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::TokenConfig;
    use crate::db::MemoryStore;
    use chrono::Duration;

    fn service() -> (CredentialService, Arc<TokenManager>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let tokens = Arc::new(TokenManager::new(TokenConfig {
            secret: "test_secret".into(),
            ttl: Duration::days(1),
        }));
        (CredentialService::new(store.clone(), tokens.clone()), tokens, store)
    }

    fn alice() -> Registration {
        Registration {
            username: "alice".into(),
            password: "pw1".into(),
            email: "a@x.com".into(),
        }
    }

    #[test]
    fn test_hash_is_salted_and_verifiable() {
        let first = hash_password("pw1").unwrap();
        let second = hash_password("pw1").unwrap();
        assert_ne!(first, "pw1");
        assert_ne!(first, second);
        assert!(verify_password("pw1", &first));
        assert!(!verify_password("pw2", &first));
        assert!(!verify_password("pw1", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn test_register_once() {
        let (service, _, store) = service();
        let msg = service.register(&alice()).await.unwrap();
        assert_eq!(msg, "User alice successfully registered");

        let err = service.register(&alice()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.len().await, 1);

        let stored = store.find_by_username("alice").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "pw1");
    }

    #[tokio::test]
    async fn test_register_requires_all_fields() {
        let (service, _, store) = service();
        for candidate in [
            Registration { username: String::new(), ..alice() },
            Registration { password: String::new(), ..alice() },
            Registration { email: "   ".into(), ..alice() },
        ] {
            let err = service.register(&candidate).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_login_issues_decodable_token() {
        let (service, tokens, store) = service();
        service.register(&alice()).await.unwrap();

        let outcome = service
            .login(&Credentials { username: "alice".into(), password: "pw1".into() })
            .await
            .unwrap();
        assert_eq!(outcome.message, "login successful");

        let user = store.find_by_username("alice").await.unwrap().unwrap();
        let claims = tokens.verify(&outcome.token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
    }

    #[tokio::test]
    async fn test_login_failures() {
        let (service, _, _) = service();
        service.register(&alice()).await.unwrap();

        let err = service
            .login(&Credentials { username: "alice".into(), password: "wrong".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::IncorrectPassword(_))));
        assert_eq!(err.to_string(), "Incorrect password for user alice");

        let err = service
            .login(&Credentials { username: "bob".into(), password: "pw1".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::UserNotFound(_))));
        assert_eq!(err.to_string(), "Unable to find user bob");
    }
}
