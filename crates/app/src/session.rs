//! Session
//!
//! The signed-in identity is an explicit value handed to every page at
//! construction. It is created by [`login`], persisted through a
//! [`SessionStore`] and removed by [`logout`].

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use larder::prelude::{BranchId, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::api::{
    AccountsApi, ApiError,
    models::{LoginRequest, LoginResponse},
};

/// Errors loading, saving or creating a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session file could not be read or written.
    #[error("session file error")]
    Io(#[from] io::Error),

    /// The session file is not valid JSON.
    #[error("session file is malformed")]
    Format(#[from] serde_json::Error),

    /// The login response carried no token.
    #[error("login response did not include an access token")]
    MissingToken,

    /// The login request failed.
    #[error("login failed")]
    Login(#[source] ApiError),

    /// A session store lock was poisoned.
    #[error("session store is unavailable")]
    Poisoned,
}

/// Account role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Role {
    /// Orders food.
    #[default]
    Buyer,
    /// Runs a branch.
    Seller,
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("seller") {
            Self::Seller
        } else {
            Self::Buyer
        }
    }
}

impl From<Role> for &'static str {
    fn from(role: Role) -> Self {
        match role {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
        }
    }
}

/// The signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    token: String,
    role: Role,
    user_id: Option<UserId>,
    branch_id: Option<BranchId>,
}

impl Session {
    /// Build a session from a login response.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingToken`] when the token is blank.
    pub fn from_login(response: LoginResponse) -> Result<Self, SessionError> {
        if response.access_token.trim().is_empty() {
            return Err(SessionError::MissingToken);
        }

        Ok(Self {
            token: response.access_token,
            role: Role::from(response.role),
            user_id: response.user_id,
            branch_id: response.branch_id,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn branch_id(&self) -> Option<BranchId> {
        self.branch_id
    }
}

/// Where the session lives between runs.
pub trait SessionStore: Send + Sync {
    /// The stored session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn load(&self) -> Result<Option<Session>, SessionError>;

    /// Replace the stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn save(&self, session: &Session) -> Result<(), SessionError>;

    /// Forget the stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Session kept as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        fs::write(&self.path, serde_json::to_vec_pretty(session)?)?;

        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Err(error) if error.kind() != io::ErrorKind::NotFound => Err(error.into()),
            _ => Ok(()),
        }
    }
}

/// In-process session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        Ok(self
            .session
            .lock()
            .map_err(|_poisoned| SessionError::Poisoned)?
            .clone())
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        *self
            .session
            .lock()
            .map_err(|_poisoned| SessionError::Poisoned)? = Some(session.clone());

        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self
            .session
            .lock()
            .map_err(|_poisoned| SessionError::Poisoned)? = None;

        Ok(())
    }
}

/// Sign in and persist the resulting session.
///
/// # Errors
///
/// Returns [`SessionError::Login`] when the server rejects the credentials, or
/// a store error when the session cannot be persisted.
pub async fn login(
    accounts: &dyn AccountsApi,
    store: &dyn SessionStore,
    email: &str,
    password: &str,
) -> Result<Session, SessionError> {
    let response = accounts
        .login(LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        })
        .await
        .map_err(SessionError::Login)?;

    let session = Session::from_login(response)?;

    store.save(&session)?;

    info!(role = ?session.role(), user_id = ?session.user_id(), "signed in");

    Ok(session)
}

/// Forget the persisted session.
///
/// # Errors
///
/// Returns an error if the store cannot be cleared.
pub fn logout(store: &dyn SessionStore) -> Result<(), SessionError> {
    store.clear()?;

    info!("signed out");

    Ok(())
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use testresult::TestResult;

    use crate::api::MockAccountsApi;

    use super::*;

    fn seller_login() -> LoginResponse {
        LoginResponse {
            access_token: "token-1".to_string(),
            role: "seller".to_string(),
            branch_id: Some(BranchId::new(4)),
            user_id: Some(UserId::new(2)),
        }
    }

    #[tokio::test]
    async fn login_persists_session() -> TestResult {
        let mut accounts = MockAccountsApi::new();

        accounts
            .expect_login()
            .once()
            .withf(|credentials| {
                credentials.email == "seller@example.com" && credentials.password == "secret"
            })
            .return_once(|_| Ok(seller_login()));

        accounts.expect_list_addresses().never();
        accounts.expect_save_address().never();

        let store = MemorySessionStore::default();
        let session = login(&accounts, &store, " seller@example.com ", "secret").await?;

        assert_eq!(session.role(), Role::Seller);
        assert_eq!(session.branch_id(), Some(BranchId::new(4)));
        assert_eq!(store.load()?, Some(session));

        Ok(())
    }

    #[tokio::test]
    async fn rejected_login_stores_nothing() -> TestResult {
        let mut accounts = MockAccountsApi::new();

        accounts.expect_login().once().return_once(|_| {
            Err(ApiError::Status {
                status: StatusCode::UNAUTHORIZED,
                detail: Some("Incorrect email or password".to_string()),
            })
        });

        let store = MemorySessionStore::default();
        let result = login(&accounts, &store, "a@example.com", "wrong").await;

        assert!(matches!(result, Err(SessionError::Login(_))));
        assert_eq!(store.load()?, None);

        Ok(())
    }

    #[test]
    fn blank_token_is_rejected() {
        let response = LoginResponse {
            access_token: " ".to_string(),
            ..seller_login()
        };

        assert!(matches!(
            Session::from_login(response),
            Err(SessionError::MissingToken)
        ));
    }

    #[test]
    fn file_store_round_trip_and_logout() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = FileSessionStore::new(dir.path().join("session.json"));

        assert_eq!(store.load()?, None);

        let session = Session::from_login(seller_login())?;
        store.save(&session)?;

        assert_eq!(store.load()?, Some(session));

        logout(&store)?;

        assert_eq!(store.load()?, None);

        // Clearing twice is fine.
        logout(&store)?;

        Ok(())
    }

    #[test]
    fn unknown_roles_are_buyers() {
        assert_eq!(Role::from("admin".to_string()), Role::Buyer);
        assert_eq!(Role::from("Seller".to_string()), Role::Seller);
    }
}
