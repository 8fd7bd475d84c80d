//! Asset catalog: organizations, objects of informatization, information
//! systems and the places attached to them.

use super::query::FilterSpec;
use super::{Database, DatabaseError, Result};

pub const ORGANIZATIONS: FilterSpec = FilterSpec {
    table: "organizations",
    columns: &["id", "name", "address", "group_id"],
    search: &["name", "address"],
};

pub const OBJECTS: FilterSpec = FilterSpec {
    table: "objects",
    columns: &["id", "name", "contact", "group_id", "organization_id"],
    search: &["name", "contact"],
};

pub const INFOSYSTEMS: FilterSpec = FilterSpec {
    table: "infosystems",
    columns: &[
        "id", "name", "address", "type", "clss", "clss_info", "level", "level_info", "contact",
        "object_id",
    ],
    search: &["name", "address", "clss", "level", "contact"],
};

pub const PLACES: FilterSpec = FilterSpec {
    table: "places",
    columns: &["id", "name", "address", "is_active", "infosystem_id"],
    search: &["name", "address"],
};

/// Database row for organizations table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrganizationRow {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub group_id: i64,
}

/// Database row for objects table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ObjectRow {
    pub id: i64,
    pub name: String,
    pub contact: Option<String>,
    pub group_id: i64,
    pub organization_id: i64,
}

/// Database row for infosystems table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InfosystemRow {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub clss: Option<String>,
    pub clss_info: Option<String>,
    pub level: Option<String>,
    pub level_info: Option<String>,
    pub contact: Option<String>,
    pub object_id: i64,
}

/// Database row for places table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlaceRow {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub is_active: bool,
    pub infosystem_id: i64,
}

/// Column values for an infosystem write. The `kind` string has already
/// been validated against the type enum by the caller; the CHECK
/// constraint is the backstop.
#[derive(Debug)]
pub struct InfosystemFields {
    pub name: String,
    pub address: Option<String>,
    pub kind: String,
    pub clss: Option<String>,
    pub clss_info: Option<String>,
    pub level: Option<String>,
    pub level_info: Option<String>,
    pub contact: Option<String>,
    pub object_id: i64,
}

impl Database {
    // ========== Organization Operations ==========

    pub async fn create_organization(
        &self,
        name: &str,
        address: Option<&str>,
        group_id: i64,
    ) -> Result<OrganizationRow> {
        let result =
            sqlx::query("INSERT INTO organizations (name, address, group_id) VALUES (?, ?, ?)")
                .bind(name)
                .bind(address)
                .bind(group_id)
                .execute(&**self)
                .await?;

        self.get_organization(result.last_insert_rowid()).await
    }

    pub async fn get_organization(&self, id: i64) -> Result<OrganizationRow> {
        sqlx::query_as::<_, OrganizationRow>("SELECT * FROM organizations WHERE id = ?")
            .bind(id)
            .fetch_one(&**self)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    DatabaseError::NotFound(format!("Organization with id {} not found", id))
                }
                e => e.into(),
            })
    }

    pub async fn update_organization(
        &self,
        id: i64,
        name: &str,
        address: Option<&str>,
        group_id: i64,
    ) -> Result<OrganizationRow> {
        let result = sqlx::query(
            "UPDATE organizations SET name = ?, address = ?, group_id = ? WHERE id = ?",
        )
        .bind(name)
        .bind(address)
        .bind(group_id)
        .bind(id)
        .execute(&**self)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "Organization with id {} not found",
                id
            )));
        }
        self.get_organization(id).await
    }

    pub async fn delete_organization(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = ?")
            .bind(id)
            .execute(&**self)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "Organization with id {} not found",
                id
            )));
        }
        Ok(())
    }

    // ========== Object Operations ==========

    pub async fn create_object(
        &self,
        name: &str,
        contact: Option<&str>,
        group_id: i64,
        organization_id: i64,
    ) -> Result<ObjectRow> {
        let result = sqlx::query(
            "INSERT INTO objects (name, contact, group_id, organization_id) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(contact)
        .bind(group_id)
        .bind(organization_id)
        .execute(&**self)
        .await?;

        self.get_object(result.last_insert_rowid()).await
    }

    pub async fn get_object(&self, id: i64) -> Result<ObjectRow> {
        sqlx::query_as::<_, ObjectRow>("SELECT * FROM objects WHERE id = ?")
            .bind(id)
            .fetch_one(&**self)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    DatabaseError::NotFound(format!("Object with id {} not found", id))
                }
                e => e.into(),
            })
    }

    pub async fn update_object(
        &self,
        id: i64,
        name: &str,
        contact: Option<&str>,
        group_id: i64,
        organization_id: i64,
    ) -> Result<ObjectRow> {
        let result = sqlx::query(
            "UPDATE objects SET name = ?, contact = ?, group_id = ?, organization_id = ? WHERE id = ?",
        )
        .bind(name)
        .bind(contact)
        .bind(group_id)
        .bind(organization_id)
        .bind(id)
        .execute(&**self)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "Object with id {} not found",
                id
            )));
        }
        self.get_object(id).await
    }

    pub async fn delete_object(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM objects WHERE id = ?")
            .bind(id)
            .execute(&**self)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "Object with id {} not found",
                id
            )));
        }
        Ok(())
    }

    // ========== Infosystem Operations ==========

    pub async fn create_infosystem(&self, fields: &InfosystemFields) -> Result<InfosystemRow> {
        let result = sqlx::query(
            r#"
            INSERT INTO infosystems
                (name, address, type, clss, clss_info, level, level_info, contact, object_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.address)
        .bind(&fields.kind)
        .bind(&fields.clss)
        .bind(&fields.clss_info)
        .bind(&fields.level)
        .bind(&fields.level_info)
        .bind(&fields.contact)
        .bind(fields.object_id)
        .execute(&**self)
        .await?;

        self.get_infosystem(result.last_insert_rowid()).await
    }

    pub async fn get_infosystem(&self, id: i64) -> Result<InfosystemRow> {
        sqlx::query_as::<_, InfosystemRow>("SELECT * FROM infosystems WHERE id = ?")
            .bind(id)
            .fetch_one(&**self)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    DatabaseError::NotFound(format!("Infosystem with id {} not found", id))
                }
                e => e.into(),
            })
    }

    pub async fn update_infosystem(
        &self,
        id: i64,
        fields: &InfosystemFields,
    ) -> Result<InfosystemRow> {
        let result = sqlx::query(
            r#"
            UPDATE infosystems
            SET name = ?, address = ?, type = ?, clss = ?, clss_info = ?,
                level = ?, level_info = ?, contact = ?, object_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.address)
        .bind(&fields.kind)
        .bind(&fields.clss)
        .bind(&fields.clss_info)
        .bind(&fields.level)
        .bind(&fields.level_info)
        .bind(&fields.contact)
        .bind(fields.object_id)
        .bind(id)
        .execute(&**self)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "Infosystem with id {} not found",
                id
            )));
        }
        self.get_infosystem(id).await
    }

    pub async fn delete_infosystem(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM infosystems WHERE id = ?")
            .bind(id)
            .execute(&**self)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "Infosystem with id {} not found",
                id
            )));
        }
        Ok(())
    }

    // ========== Place Operations ==========

    pub async fn create_place(
        &self,
        name: &str,
        address: Option<&str>,
        is_active: bool,
        infosystem_id: i64,
    ) -> Result<PlaceRow> {
        let result = sqlx::query(
            "INSERT INTO places (name, address, is_active, infosystem_id) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(address)
        .bind(is_active)
        .bind(infosystem_id)
        .execute(&**self)
        .await?;

        self.get_place(result.last_insert_rowid()).await
    }

    pub async fn get_place(&self, id: i64) -> Result<PlaceRow> {
        sqlx::query_as::<_, PlaceRow>("SELECT * FROM places WHERE id = ?")
            .bind(id)
            .fetch_one(&**self)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    DatabaseError::NotFound(format!("Place with id {} not found", id))
                }
                e => e.into(),
            })
    }

    pub async fn update_place(
        &self,
        id: i64,
        name: &str,
        address: Option<&str>,
        is_active: bool,
        infosystem_id: i64,
    ) -> Result<PlaceRow> {
        let result = sqlx::query(
            "UPDATE places SET name = ?, address = ?, is_active = ?, infosystem_id = ? WHERE id = ?",
        )
        .bind(name)
        .bind(address)
        .bind(is_active)
        .bind(infosystem_id)
        .bind(id)
        .execute(&**self)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "Place with id {} not found",
                id
            )));
        }
        self.get_place(id).await
    }

    pub async fn delete_place(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM places WHERE id = ?")
            .bind(id)
            .execute(&**self)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "Place with id {} not found",
                id
            )));
        }
        Ok(())
    }
}
