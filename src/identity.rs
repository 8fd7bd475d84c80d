//! Identity Manager
//!
//! Factory functions for user records. All the mandatory-field and format
//! checks happen here, before anything touches the database, and this is
//! the only module that hashes or verifies passwords.

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};

use crate::database::users::{NewUser, UserRow, UserUpdate};
use crate::database::{Database, DatabaseError};
use crate::models::UserPayload;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug)]
pub enum IdentityError {
    MissingField(&'static str),
    InvalidField {
        field: &'static str,
        reason: String,
    },
    Hash(String),
    Database(DatabaseError),
}

impl std::fmt::Display for IdentityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentityError::MissingField(field) => {
                write!(f, "User must have a {}", field)
            }
            IdentityError::InvalidField { field, reason } => {
                write!(f, "Invalid {}: {}", field, reason)
            }
            IdentityError::Hash(msg) => write!(f, "Password hashing error: {}", msg),
            IdentityError::Database(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for IdentityError {}

impl From<DatabaseError> for IdentityError {
    fn from(err: DatabaseError) -> Self {
        IdentityError::Database(err)
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;

/// Create a regular user. Fails field-by-field if username, name, surname,
/// phone, email or password is missing or malformed.
pub async fn create_user(db: &Database, payload: &UserPayload) -> Result<UserRow> {
    let user = build_new_user(payload)?;
    Ok(db.insert_user(&user).await?)
}

/// Privileged variant of [`create_user`]: same guards, then the superuser
/// flag is set on the persisted record.
pub async fn create_superuser(db: &Database, payload: &UserPayload) -> Result<UserRow> {
    let user = create_user(db, payload).await?;
    Ok(db.set_superuser(user.id).await?)
}

/// Full-replace update. The password is the one exception: omitted means
/// "keep the stored hash".
pub async fn update_user(db: &Database, id: i64, payload: &UserPayload) -> Result<UserRow> {
    let update = UserUpdate {
        username: require(&payload.username, "username")?,
        name: require(&payload.name, "name")?,
        surname: require(&payload.surname, "surname")?,
        middle_name: payload.middle_name.clone(),
        phone: valid_phone(require(&payload.phone, "phone")?)?,
        email: valid_email(require(&payload.email, "email")?)?,
        password_hash: match payload.password.as_deref() {
            Some(password) => Some(hash_password(checked_password(password)?)?),
            None => None,
        },
        is_active: payload.is_active.unwrap_or(true),
    };
    Ok(db.update_user(id, &update).await?)
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| IdentityError::Hash(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

fn build_new_user(payload: &UserPayload) -> Result<NewUser> {
    let password = match payload.password.as_deref() {
        Some(password) if !password.is_empty() => checked_password(password)?,
        _ => return Err(IdentityError::MissingField("password")),
    };

    Ok(NewUser {
        username: require(&payload.username, "username")?,
        name: require(&payload.name, "name")?,
        surname: require(&payload.surname, "surname")?,
        middle_name: payload.middle_name.clone(),
        phone: valid_phone(require(&payload.phone, "phone")?)?,
        email: valid_email(require(&payload.email, "email")?)?,
        password_hash: hash_password(password)?,
        is_superuser: false,
        is_active: payload.is_active.unwrap_or(true),
    })
}

fn require(value: &Option<String>, field: &'static str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(IdentityError::MissingField(field)),
    }
}

fn checked_password(password: &str) -> Result<&str> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(IdentityError::InvalidField {
            field: "password",
            reason: format!("must be at least {} characters", MIN_PASSWORD_LEN),
        });
    }
    Ok(password)
}

/// Structural phone check: optional leading `+`, separators tolerated,
/// 10 to 15 digits total.
fn valid_phone(phone: String) -> Result<String> {
    let trimmed = phone.trim();
    let rest = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: String = rest
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(IdentityError::InvalidField {
            field: "phone",
            reason: "must contain only digits and separators".to_string(),
        });
    }
    if !(10..=15).contains(&digits.chars().count()) {
        return Err(IdentityError::InvalidField {
            field: "phone",
            reason: "must contain 10 to 15 digits".to_string(),
        });
    }
    Ok(phone)
}

fn valid_email(email: String) -> Result<String> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(IdentityError::InvalidField {
            field: "email",
            reason: "must be a valid email address".to_string(),
        });
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserPayload;

    fn payload() -> UserPayload {
        UserPayload {
            username: Some("ivanov".to_string()),
            name: Some("Ivan".to_string()),
            surname: Some("Ivanov".to_string()),
            middle_name: None,
            phone: Some("+7 912 345-67-89".to_string()),
            email: Some("ivanov@example.com".to_string()),
            password: Some("correct horse".to_string()),
            is_superuser: None,
            is_active: None,
        }
    }

    #[test]
    fn password_hash_is_not_plaintext_and_verifies() {
        let hash = hash_password("correct horse").unwrap();
        assert_ne!(hash, "correct horse");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn each_mandatory_field_is_enforced() {
        for field in ["username", "name", "surname", "phone", "email"] {
            let mut p = payload();
            match field {
                "username" => p.username = None,
                "name" => p.name = Some("   ".to_string()),
                "surname" => p.surname = None,
                "phone" => p.phone = Some(String::new()),
                "email" => p.email = None,
                _ => unreachable!(),
            }
            let err = build_new_user(&p).unwrap_err();
            match err {
                IdentityError::MissingField(missing) => assert_eq!(missing, field),
                other => panic!("expected MissingField, got {:?}", other),
            }
        }
    }

    #[test]
    fn missing_password_is_rejected() {
        let mut p = payload();
        p.password = None;
        assert!(matches!(
            build_new_user(&p).unwrap_err(),
            IdentityError::MissingField("password")
        ));
    }

    #[test]
    fn short_password_is_rejected() {
        let mut p = payload();
        p.password = Some("short".to_string());
        assert!(matches!(
            build_new_user(&p).unwrap_err(),
            IdentityError::InvalidField { field: "password", .. }
        ));
    }

    #[test]
    fn phone_validation() {
        assert!(valid_phone("+7 (912) 345-67-89".to_string()).is_ok());
        assert!(valid_phone("89123456789".to_string()).is_ok());
        assert!(valid_phone("12345".to_string()).is_err());
        assert!(valid_phone("not a phone".to_string()).is_err());
        assert!(valid_phone("+7912345678901234".to_string()).is_err());
    }

    #[test]
    fn email_validation() {
        assert!(valid_email("user@example.com".to_string()).is_ok());
        assert!(valid_email("user@localhost".to_string()).is_ok());
        assert!(valid_email("userexample.com".to_string()).is_err());
        assert!(valid_email("@example.com".to_string()).is_err());
        assert!(valid_email("user@".to_string()).is_err());
        assert!(valid_email("user name@example.com".to_string()).is_err());
    }

    #[tokio::test]
    async fn create_user_persists_hashed_password() {
        let db = crate::database::Database::in_memory().await.unwrap();
        let user = create_user(&db, &payload()).await.unwrap();
        assert!(!user.is_superuser);
        assert_ne!(user.password_hash, "correct horse");
        assert!(verify_password("correct horse", &user.password_hash));
    }

    #[tokio::test]
    async fn create_superuser_elevates_flag() {
        let db = crate::database::Database::in_memory().await.unwrap();
        let user = create_superuser(&db, &payload()).await.unwrap();
        assert!(user.is_superuser);
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let db = crate::database::Database::in_memory().await.unwrap();
        create_user(&db, &payload()).await.unwrap();
        let err = create_user(&db, &payload()).await.unwrap_err();
        assert!(matches!(
            err,
            IdentityError::Database(DatabaseError::Conflict(_))
        ));
    }
}
