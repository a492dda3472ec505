//! Operator credentials and login state.
//!
//! A single operator account is stored as `{username, password_hash,
//! created_at}` under [`CREDENTIALS_KEY`]. The login flag under
//! [`LOGIN_FLAG_KEY`] holds the Discord user id of whoever logged in last.

use crate::{
    core::store::{CREDENTIALS_KEY, LOGIN_FLAG_KEY, Store},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, instrument, warn};

/// Minimum username length after trimming
pub const MIN_USERNAME_LEN: usize = 3;
/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 6;

const INVALID_LOGIN: &str = "Invalid username or password";

/// Stored operator credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCredentials {
    /// Operator username
    pub username: String,
    /// Lowercase hex SHA-256 of the password
    pub password_hash: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Hex-encoded SHA-256 digest of a password.
#[must_use]
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn credentials_error(message: &str) -> Error {
    Error::Credentials {
        message: message.to_string(),
    }
}

/// Loads the stored credentials, if an account has been set up.
pub async fn load_credentials(store: &Store) -> Result<Option<AdminCredentials>> {
    store
        .get(CREDENTIALS_KEY)
        .await?
        .map(|blob| serde_json::from_str(&blob).map_err(Error::from))
        .transpose()
}

/// Whether an operator account exists yet.
pub async fn credentials_exist(store: &Store) -> Result<bool> {
    Ok(store.get(CREDENTIALS_KEY).await?.is_some())
}

/// First-time setup: validates and stores the operator account, then logs
/// `operator_id` in.
#[instrument(skip(store, password, confirm_password))]
pub async fn setup_admin(
    store: &Store,
    username: &str,
    password: &str,
    confirm_password: &str,
    operator_id: &str,
    now: DateTime<Utc>,
) -> Result<AdminCredentials> {
    if credentials_exist(store).await? {
        return Err(credentials_error(
            "An admin account already exists. Use login instead.",
        ));
    }

    let username = username.trim();
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(credentials_error(
            "Username must be at least 3 characters long.",
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(credentials_error(
            "Password must be at least 6 characters long.",
        ));
    }
    if password != confirm_password {
        return Err(credentials_error("Passwords do not match."));
    }

    let credentials = AdminCredentials {
        username: username.to_string(),
        password_hash: hash_password(password),
        created_at: now,
    };
    store
        .set(CREDENTIALS_KEY, &serde_json::to_string(&credentials)?)
        .await?;
    store.set(LOGIN_FLAG_KEY, operator_id).await?;
    info!("Admin account '{}' created", credentials.username);
    Ok(credentials)
}

/// Checks a username/password pair against the stored account.
pub async fn verify_credentials(store: &Store, username: &str, password: &str) -> Result<bool> {
    let Some(stored) = load_credentials(store).await? else {
        return Ok(false);
    };
    Ok(stored.username == username.trim() && stored.password_hash == hash_password(password))
}

/// Logs `operator_id` in if the credentials match.
///
/// Failure never says which field was wrong.
#[instrument(skip(store, password))]
pub async fn login(store: &Store, username: &str, password: &str, operator_id: &str) -> Result<()> {
    if !verify_credentials(store, username, password).await? {
        warn!("Failed admin login attempt by {}", operator_id);
        return Err(credentials_error(INVALID_LOGIN));
    }
    store.set(LOGIN_FLAG_KEY, operator_id).await?;
    info!("Operator {} logged in", operator_id);
    Ok(())
}

/// Clears the login flag. Only the logged-in operator can end the session.
#[instrument(skip(store))]
pub async fn logout(store: &Store, operator_id: &str) -> Result<()> {
    if !is_logged_in(store, operator_id).await? {
        warn!("Logout refused for {}: not the logged-in operator", operator_id);
        return Err(credentials_error("You are not logged in."));
    }
    store.remove(LOGIN_FLAG_KEY).await?;
    info!("Operator {} logged out", operator_id);
    Ok(())
}

/// Whether `operator_id` is the currently logged-in operator.
pub async fn is_logged_in(store: &Store, operator_id: &str) -> Result<bool> {
    Ok(store.get(LOGIN_FLAG_KEY).await?.as_deref() == Some(operator_id))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_store;

    #[test]
    fn test_hash_password_is_sha256_hex() {
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_setup_then_login_logout() -> Result<()> {
        let store = setup_test_store().await?;
        let now = Utc::now();

        assert!(!credentials_exist(&store).await?);
        let creds = setup_admin(&store, "  admin ", "secret1", "secret1", "111", now).await?;
        assert_eq!(creds.username, "admin");
        assert!(is_logged_in(&store, "111").await?);

        logout(&store, "111").await?;
        assert!(!is_logged_in(&store, "111").await?);

        login(&store, "admin", "secret1", "222").await?;
        assert!(is_logged_in(&store, "222").await?);
        assert!(!is_logged_in(&store, "111").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_setup_validation() -> Result<()> {
        let store = setup_test_store().await?;
        let now = Utc::now();

        let short_user = setup_admin(&store, "ab", "secret1", "secret1", "1", now).await;
        assert!(matches!(short_user, Err(Error::Credentials { .. })));

        let short_pass = setup_admin(&store, "admin", "12345", "12345", "1", now).await;
        assert!(matches!(short_pass, Err(Error::Credentials { .. })));

        let mismatch = setup_admin(&store, "admin", "secret1", "secret2", "1", now).await;
        assert!(matches!(mismatch, Err(Error::Credentials { .. })));

        assert!(!credentials_exist(&store).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_setup_only_once() -> Result<()> {
        let store = setup_test_store().await?;
        setup_admin(&store, "admin", "secret1", "secret1", "1", Utc::now()).await?;
        let again = setup_admin(&store, "other", "secret2", "secret2", "2", Utc::now()).await;
        assert!(again.is_err());
        assert_eq!(load_credentials(&store).await?.map(|c| c.username), Some("admin".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn test_login_failure_is_generic() -> Result<()> {
        let store = setup_test_store().await?;
        setup_admin(&store, "admin", "secret1", "secret1", "1", Utc::now()).await?;
        logout(&store, "1").await?;

        for (user, pass) in [("admin", "wrong!!"), ("nobody", "secret1")] {
            let err = login(&store, user, pass, "9").await.unwrap_err();
            assert_eq!(err.to_string(), "Invalid username or password");
        }
        assert!(!is_logged_in(&store, "9").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_only_logged_in_operator_can_log_out() -> Result<()> {
        let store = setup_test_store().await?;
        setup_admin(&store, "admin", "secret1", "secret1", "111", Utc::now()).await?;

        let intruder = logout(&store, "999").await;
        assert!(matches!(intruder, Err(Error::Credentials { .. })));
        assert!(is_logged_in(&store, "111").await?);

        logout(&store, "111").await?;
        assert!(!is_logged_in(&store, "111").await?);

        // A second logout has no session to end
        assert!(logout(&store, "111").await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_credentials_stored_as_camel_case_json() -> Result<()> {
        let store = setup_test_store().await?;
        setup_admin(&store, "admin", "secret1", "secret1", "1", Utc::now()).await?;
        let blob = store.get(CREDENTIALS_KEY).await?.unwrap_or_default();
        assert!(blob.contains("\"passwordHash\""));
        assert!(blob.contains("\"createdAt\""));
        assert!(!blob.contains("secret1"));
        Ok(())
    }
}
