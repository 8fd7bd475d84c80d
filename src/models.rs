//! Domain Models
//!
//! API-facing entities and request payloads. Database rows live next to
//! their queries; everything here is what goes over the wire.

use serde::{Deserialize, Serialize};

use crate::database::catalog::{InfosystemRow, ObjectRow, OrganizationRow, PlaceRow};
use crate::database::groups::{GroupRow, UserGroupRow};
use crate::database::projects::{ChecklistRow, ProjectRow};
use crate::database::users::UserRow;

/// Information system classification. GIS is a state information system,
/// ISPDN a personal-data information system; a system can be registered
/// as both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfosystemType {
    #[serde(rename = "GIS")]
    Gis,
    #[serde(rename = "ISPDN")]
    Ispdn,
    #[serde(rename = "GIS_ISPDN")]
    GisIspdn,
}

impl InfosystemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfosystemType::Gis => "GIS",
            InfosystemType::Ispdn => "ISPDN",
            InfosystemType::GisIspdn => "GIS_ISPDN",
        }
    }
}

impl std::fmt::Display for InfosystemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InfosystemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GIS" => Ok(InfosystemType::Gis),
            "ISPDN" => Ok(InfosystemType::Ispdn),
            "GIS_ISPDN" => Ok(InfosystemType::GisIspdn),
            _ => Err(format!(
                "invalid infosystem type '{}', expected GIS, ISPDN or GIS_ISPDN",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub surname: String,
    pub middle_name: Option<String>,
    pub phone: String,
    pub email: String,
    pub date_joined: String,
    pub last_login: Option<String>,
    pub is_superuser: bool,
    pub is_active: bool,
}

impl From<UserRow> for User {
    // The password hash stays on the row, never in a response.
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            name: row.name,
            surname: row.surname,
            middle_name: row.middle_name,
            phone: row.phone,
            email: row.email,
            date_joined: row.date_joined,
            last_login: row.last_login,
            is_superuser: row.is_superuser,
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserGroup {
    pub id: i64,
    pub user_id: i64,
    pub group_id: i64,
}

impl From<UserGroupRow> for UserGroup {
    fn from(row: UserGroupRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            group_id: row.group_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub group_id: i64,
}

impl From<OrganizationRow> for Organization {
    fn from(row: OrganizationRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            group_id: row.group_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjectEntity {
    pub id: i64,
    pub name: String,
    pub contact: Option<String>,
    pub group_id: i64,
    pub organization_id: i64,
}

impl From<ObjectRow> for ObjectEntity {
    fn from(row: ObjectRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            contact: row.contact,
            group_id: row.group_id,
            organization_id: row.organization_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Infosystem {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub kind: InfosystemType,
    pub clss: Option<String>,
    pub clss_info: Option<String>,
    pub level: Option<String>,
    pub level_info: Option<String>,
    pub contact: Option<String>,
    pub object_id: i64,
}

impl From<InfosystemRow> for Infosystem {
    fn from(row: InfosystemRow) -> Self {
        // The CHECK constraint keeps the column inside the enum; a parse
        // failure means the table was edited outside the application.
        let kind = row.kind.parse().unwrap_or_else(|reason: String| {
            debug_assert!(false, "stored infosystem type rejected: {}", reason);
            InfosystemType::Gis
        });
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            kind,
            clss: row.clss,
            clss_info: row.clss_info,
            level: row.level,
            level_info: row.level_info,
            contact: row.contact,
            object_id: row.object_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Place {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub is_active: bool,
    pub infosystem_id: i64,
}

impl From<PlaceRow> for Place {
    fn from(row: PlaceRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            is_active: row.is_active,
            infosystem_id: row.infosystem_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub deadline: String,
    pub is_check: bool,
    pub is_finished: bool,
    pub infosystem_id: i64,
    pub group_rp_id: i64,
    pub group_work_id: i64,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            deadline: row.deadline,
            is_check: row.is_check,
            is_finished: row.is_finished,
            infosystem_id: row.infosystem_id,
            group_rp_id: row.group_rp_id,
            group_work_id: row.group_work_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Checklist {
    pub id: i64,
    pub name: String,
    pub is_check: bool,
    pub project_id: i64,
}

impl From<ChecklistRow> for Checklist {
    fn from(row: ChecklistRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            is_check: row.is_check,
            project_id: row.project_id,
        }
    }
}

// Request payloads. Writes are PUT-as-full-replace, so create and update
// share a payload type per entity.

/// Identity fields are optional at the serde level so the identity module
/// can report which mandatory field is missing.
#[derive(Debug, Deserialize)]
pub struct UserPayload {
    pub username: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub middle_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_superuser: Option<bool>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct GroupPayload {
    pub name: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UserGroupPayload {
    pub user_id: i64,
    pub group_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct OrganizationPayload {
    pub name: String,
    pub address: Option<String>,
    pub group_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ObjectPayload {
    pub name: String,
    pub contact: Option<String>,
    pub group_id: i64,
    pub organization_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct InfosystemPayload {
    pub name: String,
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub clss: Option<String>,
    pub clss_info: Option<String>,
    pub level: Option<String>,
    pub level_info: Option<String>,
    pub contact: Option<String>,
    pub object_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct PlacePayload {
    pub name: String,
    pub address: Option<String>,
    pub is_active: Option<bool>,
    pub infosystem_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ProjectPayload {
    pub name: String,
    pub deadline: String,
    pub is_check: Option<bool>,
    pub is_finished: Option<bool>,
    pub infosystem_id: i64,
    pub group_rp_id: i64,
    pub group_work_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ChecklistPayload {
    pub name: String,
    pub is_check: Option<bool>,
    pub project_id: i64,
}
