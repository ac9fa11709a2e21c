use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::Credential;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::CredentialStore;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<CS>
where
    CS: CredentialStore,
{
    store: Arc<CS>,
    password_hasher: auth::PasswordHasher,
}

impl<CS> UserService<CS>
where
    CS: CredentialStore,
{
    /// Create a new user service backed by `store`.
    pub fn new(store: Arc<CS>) -> Self {
        Self {
            store,
            password_hasher: auth::PasswordHasher::new(),
        }
    }
}

#[async_trait]
impl<CS> UserServicePort for UserService<CS>
where
    CS: CredentialStore,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let password_hash = self.password_hasher.hash(&command.password)?;

        let user = NewUser {
            username: command.username,
            email: command.email,
            password_hash,
        };

        let created_user = self.store.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User created");

        Ok(created_user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn get_credential(&self, username: &Username) -> Result<Credential, UserError> {
        self.store
            .find_by_username(username)
            .await?
            .ok_or(UserError::NotFoundByUsername(username.to_string()))
    }

    async fn check_ready(&self) -> Result<(), UserError> {
        self.store.ping().await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::EmailAddress;

    mock! {
        pub TestStore {}

        #[async_trait]
        impl CredentialStore for TestStore {
            async fn create(&self, user: NewUser) -> Result<User, UserError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<Credential>, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn ping(&self) -> Result<(), UserError>;
        }
    }

    fn test_user(id: i64) -> User {
        User {
            id: UserId(id),
            username: Username::new("testuser".to_string()).unwrap(),
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let mut store = MockTestStore::new();

        store
            .expect_create()
            .withf(|user| {
                user.username.as_str() == "testuser"
                    && user.email.as_str() == "test@example.com"
                    && user.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|user| {
                Ok(User {
                    id: UserId(1),
                    username: user.username,
                    email: user.email,
                    password_hash: user.password_hash,
                    created_at: Utc::now(),
                })
            });

        let service = UserService::new(Arc::new(store));

        let command = CreateUserCommand::new(
            Username::new("testuser".to_string()).unwrap(),
            EmailAddress::new("test@example.com".to_string()).unwrap(),
            "password123".to_string(),
        );

        let user = service.create_user(command).await.unwrap();
        assert_eq!(user.id, UserId(1));
        // Password is hashed with real Argon2
        assert!(user.password_hash.starts_with("$argon2"));
        assert_ne!(user.password_hash, "password123");
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username() {
        let mut store = MockTestStore::new();

        store.expect_create().times(1).returning(|user| {
            Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ))
        });

        let service = UserService::new(Arc::new(store));

        let command = CreateUserCommand::new(
            Username::new("testuser".to_string()).unwrap(),
            EmailAddress::new("test2@example.com".to_string()).unwrap(),
            "password456".to_string(),
        );

        let result = service.create_user(command).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::UsernameAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_get_user_success() {
        let mut store = MockTestStore::new();

        let returned_user = test_user(1);
        store
            .expect_find_by_id()
            .withf(|id| *id == UserId(1))
            .times(1)
            .returning(move |_| Ok(Some(returned_user.clone())));

        let service = UserService::new(Arc::new(store));

        let user = service.get_user(&UserId(1)).await.unwrap();
        assert_eq!(user.id, UserId(1));
        assert_eq!(user.username.as_str(), "testuser");
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut store = MockTestStore::new();

        store.expect_find_by_id().times(1).returning(|_| Ok(None));

        let service = UserService::new(Arc::new(store));

        let result = service.get_user(&UserId(99)).await;
        assert!(matches!(result.unwrap_err(), UserError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_user_store_error() {
        let mut store = MockTestStore::new();

        store
            .expect_find_by_id()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("connection reset".to_string())));

        let service = UserService::new(Arc::new(store));

        let result = service.get_user(&UserId(1)).await;
        assert!(matches!(result.unwrap_err(), UserError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn test_get_credential_success() {
        let mut store = MockTestStore::new();

        store
            .expect_find_by_username()
            .withf(|u| u.as_str() == "ahmed")
            .times(1)
            .returning(|u| {
                Ok(Some(Credential {
                    user_id: UserId(1),
                    username: u.clone(),
                    password_hash: "$argon2id$test_hash".to_string(),
                }))
            });

        let service = UserService::new(Arc::new(store));

        let username = Username::new("ahmed".to_string()).unwrap();
        let credential = service.get_credential(&username).await.unwrap();
        assert_eq!(credential.user_id, UserId(1));
        assert_eq!(credential.username, username);
    }

    #[tokio::test]
    async fn test_get_credential_not_found() {
        let mut store = MockTestStore::new();

        store
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(store));

        let username = Username::new("nonexistent".to_string()).unwrap();
        let result = service.get_credential(&username).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::NotFoundByUsername(_)
        ));
    }

    #[tokio::test]
    async fn test_check_ready_propagates_store_error() {
        let mut store = MockTestStore::new();

        store
            .expect_ping()
            .times(1)
            .returning(|| Err(UserError::DatabaseError("unreachable".to_string())));

        let service = UserService::new(Arc::new(store));

        assert!(service.check_ready().await.is_err());
    }
}
