//! Refresh token bookkeeping. Each issued refresh token is recorded by
//! its jti; rotation flips `revoked` so a superseded token can never be
//! redeemed twice.

use super::{Database, DatabaseError, Result};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshTokenRow {
    pub id: i64,
    pub jti: String,
    pub user_id: i64,
    pub expires_at: String,
    pub revoked: bool,
}

impl Database {
    pub async fn insert_refresh_token(
        &self,
        jti: &str,
        user_id: i64,
        expires_at: &str,
    ) -> Result<()> {
        sqlx::query("INSERT INTO refresh_tokens (jti, user_id, expires_at) VALUES (?, ?, ?)")
            .bind(jti)
            .bind(user_id)
            .bind(expires_at)
            .execute(&**self)
            .await?;
        Ok(())
    }

    pub async fn get_refresh_token(&self, jti: &str) -> Result<RefreshTokenRow> {
        sqlx::query_as::<_, RefreshTokenRow>("SELECT * FROM refresh_tokens WHERE jti = ?")
            .bind(jti)
            .fetch_one(&**self)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    DatabaseError::NotFound("refresh token is not known".to_string())
                }
                e => e.into(),
            })
    }

    pub async fn revoke_refresh_token(&self, jti: &str) -> Result<()> {
        sqlx::query("UPDATE refresh_tokens SET revoked = 1 WHERE jti = ?")
            .bind(jti)
            .execute(&**self)
            .await?;
        Ok(())
    }

    /// Housekeeping: drop rows whose expiry is in the past.
    pub async fn purge_expired_refresh_tokens(&self, now: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < ?")
            .bind(now)
            .execute(&**self)
            .await?;
        Ok(result.rows_affected())
    }
}
