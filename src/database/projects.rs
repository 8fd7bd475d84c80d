use super::query::FilterSpec;
use super::{Database, DatabaseError, Result};

pub const PROJECTS: FilterSpec = FilterSpec {
    table: "projects",
    columns: &[
        "id",
        "name",
        "deadline",
        "is_check",
        "is_finished",
        "infosystem_id",
        "group_rp_id",
        "group_work_id",
    ],
    search: &["name"],
};

pub const CHECKLISTS: FilterSpec = FilterSpec {
    table: "checklists",
    columns: &["id", "name", "is_check", "project_id"],
    search: &["name"],
};

/// Database row for projects table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: i64,
    pub name: String,
    pub deadline: String,
    pub is_check: bool,
    pub is_finished: bool,
    pub infosystem_id: i64,
    pub group_rp_id: i64,
    pub group_work_id: i64,
}

/// Database row for checklists table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChecklistRow {
    pub id: i64,
    pub name: String,
    pub is_check: bool,
    pub project_id: i64,
}

/// Column values for a project write. `deadline` is already validated as
/// an ISO date by the caller.
#[derive(Debug)]
pub struct ProjectFields {
    pub name: String,
    pub deadline: String,
    pub is_check: bool,
    pub is_finished: bool,
    pub infosystem_id: i64,
    pub group_rp_id: i64,
    pub group_work_id: i64,
}

impl Database {
    // ========== Project Operations ==========

    pub async fn create_project(&self, fields: &ProjectFields) -> Result<ProjectRow> {
        let result = sqlx::query(
            r#"
            INSERT INTO projects
                (name, deadline, is_check, is_finished,
                 infosystem_id, group_rp_id, group_work_id)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.deadline)
        .bind(fields.is_check)
        .bind(fields.is_finished)
        .bind(fields.infosystem_id)
        .bind(fields.group_rp_id)
        .bind(fields.group_work_id)
        .execute(&**self)
        .await?;

        self.get_project(result.last_insert_rowid()).await
    }

    pub async fn get_project(&self, id: i64) -> Result<ProjectRow> {
        sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE id = ?")
            .bind(id)
            .fetch_one(&**self)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    DatabaseError::NotFound(format!("Project with id {} not found", id))
                }
                e => e.into(),
            })
    }

    pub async fn update_project(&self, id: i64, fields: &ProjectFields) -> Result<ProjectRow> {
        let result = sqlx::query(
            r#"
            UPDATE projects
            SET name = ?, deadline = ?, is_check = ?, is_finished = ?,
                infosystem_id = ?, group_rp_id = ?, group_work_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.deadline)
        .bind(fields.is_check)
        .bind(fields.is_finished)
        .bind(fields.infosystem_id)
        .bind(fields.group_rp_id)
        .bind(fields.group_work_id)
        .bind(id)
        .execute(&**self)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "Project with id {} not found",
                id
            )));
        }
        self.get_project(id).await
    }

    pub async fn delete_project(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&**self)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "Project with id {} not found",
                id
            )));
        }
        Ok(())
    }

    // ========== Checklist Operations ==========

    pub async fn create_checklist(
        &self,
        name: &str,
        is_check: bool,
        project_id: i64,
    ) -> Result<ChecklistRow> {
        let result =
            sqlx::query("INSERT INTO checklists (name, is_check, project_id) VALUES (?, ?, ?)")
                .bind(name)
                .bind(is_check)
                .bind(project_id)
                .execute(&**self)
                .await?;

        self.get_checklist(result.last_insert_rowid()).await
    }

    pub async fn get_checklist(&self, id: i64) -> Result<ChecklistRow> {
        sqlx::query_as::<_, ChecklistRow>("SELECT * FROM checklists WHERE id = ?")
            .bind(id)
            .fetch_one(&**self)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    DatabaseError::NotFound(format!("Checklist with id {} not found", id))
                }
                e => e.into(),
            })
    }

    pub async fn update_checklist(
        &self,
        id: i64,
        name: &str,
        is_check: bool,
        project_id: i64,
    ) -> Result<ChecklistRow> {
        let result = sqlx::query(
            "UPDATE checklists SET name = ?, is_check = ?, project_id = ? WHERE id = ?",
        )
        .bind(name)
        .bind(is_check)
        .bind(project_id)
        .bind(id)
        .execute(&**self)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "Checklist with id {} not found",
                id
            )));
        }
        self.get_checklist(id).await
    }

    pub async fn delete_checklist(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM checklists WHERE id = ?")
            .bind(id)
            .execute(&**self)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "Checklist with id {} not found",
                id
            )));
        }
        Ok(())
    }
}
