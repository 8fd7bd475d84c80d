use super::query::FilterSpec;
use super::{Database, DatabaseError, Result};

pub const GROUPS: FilterSpec = FilterSpec {
    table: "groups",
    columns: &["id", "name", "is_active"],
    search: &["name"],
};

pub const USER_GROUPS: FilterSpec = FilterSpec {
    table: "user_groups",
    columns: &["id", "user_id", "group_id"],
    search: &[],
};

/// Database row for groups table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroupRow {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
}

/// Database row for the user <-> group join table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserGroupRow {
    pub id: i64,
    pub user_id: i64,
    pub group_id: i64,
}

impl Database {
    // ========== Group Operations ==========

    pub async fn create_group(&self, name: &str, is_active: bool) -> Result<GroupRow> {
        let result = sqlx::query("INSERT INTO groups (name, is_active) VALUES (?, ?)")
            .bind(name)
            .bind(is_active)
            .execute(&**self)
            .await?;

        self.get_group(result.last_insert_rowid()).await
    }

    pub async fn get_group(&self, id: i64) -> Result<GroupRow> {
        sqlx::query_as::<_, GroupRow>("SELECT * FROM groups WHERE id = ?")
            .bind(id)
            .fetch_one(&**self)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    DatabaseError::NotFound(format!("Group with id {} not found", id))
                }
                e => e.into(),
            })
    }

    pub async fn update_group(&self, id: i64, name: &str, is_active: bool) -> Result<GroupRow> {
        let result = sqlx::query("UPDATE groups SET name = ?, is_active = ? WHERE id = ?")
            .bind(name)
            .bind(is_active)
            .bind(id)
            .execute(&**self)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "Group with id {} not found",
                id
            )));
        }
        self.get_group(id).await
    }

    pub async fn delete_group(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM groups WHERE id = ?")
            .bind(id)
            .execute(&**self)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "Group with id {} not found",
                id
            )));
        }
        Ok(())
    }

    // ========== UserGroup Operations ==========

    pub async fn create_user_group(&self, user_id: i64, group_id: i64) -> Result<UserGroupRow> {
        let result = sqlx::query("INSERT INTO user_groups (user_id, group_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(group_id)
            .execute(&**self)
            .await?;

        self.get_user_group(result.last_insert_rowid()).await
    }

    pub async fn get_user_group(&self, id: i64) -> Result<UserGroupRow> {
        sqlx::query_as::<_, UserGroupRow>("SELECT * FROM user_groups WHERE id = ?")
            .bind(id)
            .fetch_one(&**self)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    DatabaseError::NotFound(format!("UserGroup with id {} not found", id))
                }
                e => e.into(),
            })
    }

    pub async fn update_user_group(
        &self,
        id: i64,
        user_id: i64,
        group_id: i64,
    ) -> Result<UserGroupRow> {
        let result = sqlx::query("UPDATE user_groups SET user_id = ?, group_id = ? WHERE id = ?")
            .bind(user_id)
            .bind(group_id)
            .bind(id)
            .execute(&**self)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "UserGroup with id {} not found",
                id
            )));
        }
        self.get_user_group(id).await
    }

    pub async fn delete_user_group(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM user_groups WHERE id = ?")
            .bind(id)
            .execute(&**self)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "UserGroup with id {} not found",
                id
            )));
        }
        Ok(())
    }
}
