//! Common Test Utilities
//!
//! Shared helpers and fixtures for the storage tests.

#![allow(dead_code)]

use std::sync::Arc;

use fake::faker::internet::en::{Password, SafeEmail};
use fake::Fake;

use warbler::application::dto::SignupRequest;
use warbler::application::services::{AuthService, CredentialHasher};
use warbler::config::HashingSettings;
use warbler::domain::{Message, NewMessage, User, UserRepository, MessageRepository};
use warbler::infrastructure::database::{Session, UnitOfWork};
use warbler::infrastructure::memory::{MemorySession, MemoryStore};

/// Argon2 parameters small enough to keep tests fast.
pub fn cheap_hashing() -> HashingSettings {
    HashingSettings {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    }
}

pub fn auth_service() -> AuthService {
    let hasher = CredentialHasher::new(&cheap_hashing()).expect("valid hashing parameters");
    AuthService::new(Arc::new(hasher))
}

/// A username that no other test will pick.
pub fn unique_name(prefix: &str) -> String {
    format!("{}_{}", prefix, &uuid::Uuid::new_v4().simple().to_string()[..12])
}

/// A signup request with a unique username and random email and password.
pub fn fake_signup(prefix: &str) -> SignupRequest {
    let username = unique_name(prefix);
    let email: String = SafeEmail().fake();
    let password: String = Password(8..20).fake();
    SignupRequest::new(
        username.clone(),
        format!("{}.{}", username, email),
        password,
        None,
    )
}

/// Test fixture: a fresh in-memory store with an open session.
pub struct TestStore {
    pub store: MemoryStore,
    pub auth: AuthService,
}

impl TestStore {
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
            auth: auth_service(),
        }
    }

    pub async fn session(&self) -> MemorySession {
        self.store.begin().await.expect("begin session")
    }

    /// Sign up `name` with password `pw123` in `session`.
    pub async fn signup(&self, session: &mut MemorySession, name: &str) -> User {
        self.auth
            .signup(
                session,
                SignupRequest::new(name, format!("{}@example.com", name), "pw123", None),
            )
            .await
            .expect("signup")
    }

    /// Sign up users in their own committed session.
    pub async fn committed_users(&self, names: &[&str]) -> Vec<User> {
        let mut session = self.session().await;
        let mut users = Vec::with_capacity(names.len());
        for name in names {
            users.push(self.signup(&mut session, name).await);
        }
        session.commit().await.expect("commit");
        users
    }
}

pub async fn post(session: &mut MemorySession, user: &User, text: &str) -> Message {
    session
        .insert_message(&NewMessage::new(user.id, text))
        .await
        .expect("insert message")
}

pub async fn reload_user(session: &mut MemorySession, user: &User) -> Option<User> {
    session.find_user(user.id).await.expect("find user")
}
