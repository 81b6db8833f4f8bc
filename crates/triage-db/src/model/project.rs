use diesel::{pg::Pg, prelude::*};
use serde::{Deserialize, Serialize};

use crate::db::{enums::Role, schema};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable, Serialize, Deserialize,
)]
#[diesel(table_name = schema::project)]
#[diesel(check_for_backend(Pg))]
pub struct Project {
    pub id: uuid::Uuid,
    /// Short uppercase identifier, immutable after creation.
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub created_by: uuid::Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::project)]
pub struct NewProject {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub created_by: uuid::Uuid,
}

/// The mutable fields of a project. `description: None` clears it.
#[derive(Debug, Clone, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = schema::project)]
#[diesel(treat_none_as_null = true)]
pub struct ProjectChangeset {
    pub name: String,
    pub description: Option<String>,
}

/// A project together with the role the requesting user holds in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectWithRole {
    #[serde(flatten)]
    pub project: Project,
    pub role: Role,
}
