#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;

use account_service::domain::user::models::Credential;
use account_service::domain::user::models::EmailAddress;
use account_service::domain::user::models::NewUser;
use account_service::domain::user::models::User;
use account_service::domain::user::models::UserId;
use account_service::domain::user::models::Username;
use account_service::domain::user::ports::CredentialStore;
use account_service::domain::user::service::UserService;
use account_service::inbound::http::middleware::audit::AuditSink;
use account_service::inbound::http::router::create_router;
use account_service::user::errors::UserError;
use async_trait::async_trait;
use auth::Authenticator;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;
use mockall::mock;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

mock! {
    pub Store {}

    #[async_trait]
    impl CredentialStore for Store {
        async fn create(&self, user: NewUser) -> Result<User, UserError>;
        async fn find_by_username(&self, username: &Username) -> Result<Option<Credential>, UserError>;
        async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
        async fn ping(&self) -> Result<(), UserError>;
    }
}

/// Audit sink that keeps every emitted line for inspection.
#[derive(Default)]
pub struct CapturingAuditSink {
    lines: Mutex<Vec<String>>,
}

impl CapturingAuditSink {
    pub fn records(&self) -> Vec<serde_json::Value> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .map(|line| serde_json::from_str(line).expect("Audit line is not JSON"))
            .collect()
    }
}

impl AuditSink for CapturingAuditSink {
    fn emit(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

/// Test application that spawns a real server over a mocked credential store
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
    pub audit: Arc<CapturingAuditSink>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn(store: MockStore) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = test_authenticator();
        let audit = Arc::new(CapturingAuditSink::default());
        let user_service = Arc::new(UserService::new(Arc::new(store)));

        let app = create_router(user_service, Arc::clone(&authenticator), audit.clone());

        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Server failed");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            authenticator,
            audit,
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Issue a token the running server will accept.
    pub fn token_for(&self, user_id: i64, username: &str) -> String {
        self.authenticator
            .generate_token(user_id, username)
            .expect("Failed to generate token")
    }
}

pub fn test_authenticator() -> Arc<Authenticator> {
    Arc::new(Authenticator::new(TEST_SECRET, Duration::hours(24)).expect("Invalid test key"))
}

/// Stored record for `ahmed` / `secret123`.
pub fn ahmed() -> User {
    let password_hash = test_authenticator()
        .hash_password("secret123")
        .expect("Failed to hash password");

    User {
        id: UserId(1),
        username: Username::new("ahmed".to_string()).unwrap(),
        email: EmailAddress::new("ahmed@example.com".to_string()).unwrap(),
        password_hash,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn credential_of(user: &User) -> Credential {
    Credential {
        user_id: user.id,
        username: user.username.clone(),
        password_hash: user.password_hash.clone(),
    }
}
