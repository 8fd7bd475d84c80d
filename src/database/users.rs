use chrono::Utc;

use super::query::FilterSpec;
use super::{Database, DatabaseError, Result};

pub const USERS: FilterSpec = FilterSpec {
    table: "users",
    columns: &[
        "id",
        "username",
        "name",
        "surname",
        "middle_name",
        "phone",
        "email",
        "is_superuser",
        "is_active",
        "date_joined",
        "last_login",
    ],
    search: &["username", "name", "surname", "middle_name", "phone", "email"],
};

/// Database row for users table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub surname: String,
    pub middle_name: Option<String>,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub date_joined: String,
    pub last_login: Option<String>,
    pub is_superuser: bool,
    pub is_active: bool,
}

/// A validated user ready to be persisted. Built by the identity module,
/// which is the only place passwords get hashed.
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub surname: String,
    pub middle_name: Option<String>,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub is_superuser: bool,
    pub is_active: bool,
}

#[derive(Debug)]
pub struct UserUpdate {
    pub username: String,
    pub name: String,
    pub surname: String,
    pub middle_name: Option<String>,
    pub phone: String,
    pub email: String,
    /// `None` keeps the stored hash.
    pub password_hash: Option<String>,
    pub is_active: bool,
}

impl Database {
    pub async fn insert_user(&self, user: &NewUser) -> Result<UserRow> {
        let result = sqlx::query(
            r#"
            INSERT INTO users
                (username, name, surname, middle_name, phone, email,
                 password_hash, date_joined, is_superuser, is_active)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.surname)
        .bind(&user.middle_name)
        .bind(&user.phone)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(Utc::now().to_rfc3339())
        .bind(user.is_superuser)
        .bind(user.is_active)
        .execute(&**self)
        .await?;

        self.get_user_by_id(result.last_insert_rowid()).await
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<UserRow> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(&**self)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    DatabaseError::NotFound(format!("User with id {} not found", id))
                }
                e => e.into(),
            })
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<UserRow> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&**self)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    DatabaseError::NotFound(format!("User '{}' not found", username))
                }
                e => e.into(),
            })
    }

    pub async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<UserRow> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = ?,
                name = ?,
                surname = ?,
                middle_name = ?,
                phone = ?,
                email = ?,
                password_hash = COALESCE(?, password_hash),
                is_active = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.username)
        .bind(&update.name)
        .bind(&update.surname)
        .bind(&update.middle_name)
        .bind(&update.phone)
        .bind(&update.email)
        .bind(&update.password_hash)
        .bind(update.is_active)
        .bind(id)
        .execute(&**self)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "User with id {} not found",
                id
            )));
        }
        self.get_user_by_id(id).await
    }

    pub async fn set_superuser(&self, id: i64) -> Result<UserRow> {
        sqlx::query("UPDATE users SET is_superuser = 1 WHERE id = ?")
            .bind(id)
            .execute(&**self)
            .await?;
        self.get_user_by_id(id).await
    }

    pub async fn touch_last_login(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(Utc::now().to_rfc3339())
            .bind(id)
            .execute(&**self)
            .await?;
        Ok(())
    }

    pub async fn delete_user(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&**self)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "User with id {} not found",
                id
            )));
        }
        Ok(())
    }

    pub async fn count_users(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&**self)
            .await?;
        Ok(count)
    }
}
