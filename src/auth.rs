//! Bearer-token authentication: HS256 access/refresh JWT pairs, refresh
//! rotation with jti blacklisting, and the axum middleware guarding every
//! CRUD route.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::database::users::UserRow;
use crate::database::{Database, DatabaseError};
use crate::error::ApiError;
use crate::identity;
use crate::web::AppState;

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken(String),
    ExpiredToken,
    WrongTokenKind,
    RevokedToken,
    InvalidCredentials,
    InactiveUser,
    Internal(String),
    Database(DatabaseError),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "missing bearer token"),
            AuthError::InvalidToken(msg) => write!(f, "invalid token: {}", msg),
            AuthError::ExpiredToken => write!(f, "token has expired"),
            AuthError::WrongTokenKind => write!(f, "wrong token kind for this operation"),
            AuthError::RevokedToken => write!(f, "refresh token has been revoked"),
            AuthError::InvalidCredentials => write!(f, "invalid username or password"),
            AuthError::InactiveUser => write!(f, "user account is inactive"),
            AuthError::Internal(msg) => write!(f, "token error: {}", msg),
            AuthError::Database(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<DatabaseError> for AuthError {
    fn from(err: DatabaseError) -> Self {
        AuthError::Database(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    pub username: String,
    pub is_superuser: bool,
    pub kind: TokenKind,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Authenticated caller, attached to the request by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub is_superuser: bool,
}

#[derive(Clone)]
pub struct AuthService {
    secret: String,
    access_ttl: i64,
    refresh_ttl: i64,
}

impl AuthService {
    pub fn new(config: &Config) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
        }
    }

    fn claims(&self, user: &UserRow, kind: TokenKind, ttl: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: user.id,
            username: user.username.clone(),
            is_superuser: user.is_superuser,
            kind,
            jti: Uuid::now_v7().to_string(),
            iat: now,
            exp: now + ttl,
        }
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(e.to_string()))
    }

    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken(e.to_string()),
        })
    }

    /// Issue an access/refresh pair and record the refresh jti.
    pub async fn issue_pair(&self, db: &Database, user: &UserRow) -> Result<TokenPair, AuthError> {
        let access = self.encode(&self.claims(user, TokenKind::Access, self.access_ttl))?;

        let refresh_claims = self.claims(user, TokenKind::Refresh, self.refresh_ttl);
        let expires_at = chrono::DateTime::from_timestamp(refresh_claims.exp, 0)
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        db.insert_refresh_token(&refresh_claims.jti, user.id, &expires_at)
            .await?;
        let refresh = self.encode(&refresh_claims)?;

        Ok(TokenPair { access, refresh })
    }

    /// Password login. Unknown usernames and wrong passwords are the same
    /// error, so the endpoint cannot be used to probe for accounts.
    pub async fn login(
        &self,
        db: &Database,
        username: &str,
        password: &str,
    ) -> Result<TokenPair, AuthError> {
        let user = match db.get_user_by_username(username).await {
            Ok(user) => user,
            Err(DatabaseError::NotFound(_)) => return Err(AuthError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        if !identity::verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(AuthError::InactiveUser);
        }

        db.touch_last_login(user.id).await?;
        self.issue_pair(db, &user).await
    }

    /// Rotate a refresh token: the presented jti is revoked and a fresh
    /// pair is issued. A rotated (blacklisted) token can never be reused.
    pub async fn refresh(&self, db: &Database, token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.decode(token)?;
        if claims.kind != TokenKind::Refresh {
            return Err(AuthError::WrongTokenKind);
        }

        let record = match db.get_refresh_token(&claims.jti).await {
            Ok(record) => record,
            Err(DatabaseError::NotFound(_)) => {
                return Err(AuthError::InvalidToken("unknown refresh token".to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        if record.revoked {
            return Err(AuthError::RevokedToken);
        }

        db.revoke_refresh_token(&claims.jti).await?;

        let user = match db.get_user_by_id(claims.sub).await {
            Ok(user) => user,
            Err(DatabaseError::NotFound(_)) => {
                return Err(AuthError::InvalidToken("unknown subject".to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        if !user.is_active {
            return Err(AuthError::InactiveUser);
        }

        self.issue_pair(db, &user).await
    }
}

/// Middleware for every CRUD route: decodes the bearer token and attaches
/// the caller as an [`AuthUser`] extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;
    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingToken)?;

    let claims = state.auth.decode(token)?;
    if claims.kind != TokenKind::Access {
        return Err(AuthError::WrongTokenKind.into());
    }

    let user = state
        .db
        .get_user_by_id(claims.sub)
        .await
        .map_err(|_| AuthError::InvalidToken("unknown subject".to_string()))?;
    if !user.is_active {
        return Err(AuthError::InactiveUser.into());
    }

    req.extensions_mut().insert(AuthUser {
        id: user.id,
        username: user.username,
        is_superuser: user.is_superuser,
    });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserPayload;

    fn service() -> AuthService {
        AuthService {
            secret: "test-secret".to_string(),
            access_ttl: 3600,
            refresh_ttl: 7200,
        }
    }

    fn user_payload(username: &str) -> UserPayload {
        UserPayload {
            username: Some(username.to_string()),
            name: Some("Ivan".to_string()),
            surname: Some("Ivanov".to_string()),
            middle_name: None,
            phone: Some("+79123456789".to_string()),
            email: Some(format!("{}@example.com", username)),
            password: Some("correct horse".to_string()),
            is_superuser: None,
            is_active: None,
        }
    }

    async fn setup() -> (Database, UserRow) {
        let db = Database::in_memory().await.unwrap();
        let user = identity::create_user(&db, &user_payload("ivanov"))
            .await
            .unwrap();
        (db, user)
    }

    #[tokio::test]
    async fn access_token_round_trip() {
        let (_db, user) = setup().await;
        let auth = service();
        let token = auth
            .encode(&auth.claims(&user, TokenKind::Access, 3600))
            .unwrap();
        let claims = auth.decode(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "ivanov");
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let (_db, user) = setup().await;
        let auth = service();
        let token = auth
            .encode(&auth.claims(&user, TokenKind::Access, -3600))
            .unwrap();
        assert!(matches!(
            auth.decode(&token).unwrap_err(),
            AuthError::ExpiredToken
        ));
    }

    #[tokio::test]
    async fn tampered_token_is_rejected() {
        let (_db, user) = setup().await;
        let auth = service();
        let token = auth
            .encode(&auth.claims(&user, TokenKind::Access, 3600))
            .unwrap();
        let other = AuthService {
            secret: "other-secret".to_string(),
            ..service()
        };
        assert!(matches!(
            other.decode(&token).unwrap_err(),
            AuthError::InvalidToken(_)
        ));
    }

    #[tokio::test]
    async fn login_checks_credentials_and_stamps_last_login() {
        let (db, user) = setup().await;
        let auth = service();

        assert!(matches!(
            auth.login(&db, "ivanov", "wrong horse").await.unwrap_err(),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(
            auth.login(&db, "nobody", "correct horse").await.unwrap_err(),
            AuthError::InvalidCredentials
        ));

        auth.login(&db, "ivanov", "correct horse").await.unwrap();
        let reloaded = db.get_user_by_id(user.id).await.unwrap();
        assert!(reloaded.last_login.is_some());
    }

    #[tokio::test]
    async fn refresh_rotation_blacklists_the_old_token() {
        let (db, _user) = setup().await;
        let auth = service();

        let pair = auth.login(&db, "ivanov", "correct horse").await.unwrap();
        let rotated = auth.refresh(&db, &pair.refresh).await.unwrap();
        assert_ne!(pair.refresh, rotated.refresh);

        // reusing the rotated-out token must fail
        assert!(matches!(
            auth.refresh(&db, &pair.refresh).await.unwrap_err(),
            AuthError::RevokedToken
        ));

        // the newly issued one still works
        auth.refresh(&db, &rotated.refresh).await.unwrap();
    }

    #[tokio::test]
    async fn access_token_cannot_be_used_as_refresh() {
        let (db, _user) = setup().await;
        let auth = service();
        let pair = auth.login(&db, "ivanov", "correct horse").await.unwrap();
        assert!(matches!(
            auth.refresh(&db, &pair.access).await.unwrap_err(),
            AuthError::WrongTokenKind
        ));
    }
}
