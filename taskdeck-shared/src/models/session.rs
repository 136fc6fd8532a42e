/// Session-token list operations
///
/// Each row is one active session for a user. The list only ever grows
/// (signup/login) or shrinks (logout removes the presented token, logout-all
/// clears the list). The auth layer checks membership here on every request,
/// which is what makes revocation take effect immediately even though the
/// signed tokens themselves stay cryptographically valid until expiry.
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::token::{sign_session_token, TokenError};

/// One stored session token.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionToken {
    /// Issue-order row id
    pub id: i64,

    /// Owning user
    pub user_id: Uuid,

    /// The opaque signed token string
    pub token: String,

    /// When the session was opened
    pub created_at: DateTime<Utc>,
}

/// Error type for session issuance
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Token signing failed
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Database failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl SessionToken {
    /// Signs a fresh token for `user_id` and appends it to the list.
    ///
    /// # Returns
    ///
    /// The newly issued token string
    pub async fn issue(pool: &PgPool, user_id: Uuid, secret: &str) -> Result<String, SessionError> {
        let token = sign_session_token(user_id, secret)?;

        sqlx::query("INSERT INTO session_tokens (user_id, token) VALUES ($1, $2)")
            .bind(user_id)
            .bind(&token)
            .execute(pool)
            .await?;

        Ok(token)
    }

    /// Checks whether `token` is in the user's stored list.
    pub async fn exists(pool: &PgPool, user_id: Uuid, token: &str) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM session_tokens WHERE user_id = $1 AND token = $2)",
        )
        .bind(user_id)
        .bind(token)
        .fetch_one(pool)
        .await?;

        Ok(row.0)
    }

    /// Removes exactly the presented token; other sessions stay valid.
    pub async fn revoke(pool: &PgPool, user_id: Uuid, token: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM session_tokens WHERE user_id = $1 AND token = $2")
            .bind(user_id)
            .bind(token)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Clears the entire list, invalidating every session for the user.
    pub async fn revoke_all(pool: &PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM session_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Lists a user's tokens in issue order.
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, SessionToken>(
            "SELECT id, user_id, token, created_at FROM session_tokens WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
