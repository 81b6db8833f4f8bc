use crate::db::{enums::Role, schema};
use diesel::{pg::Pg, prelude::*};
use serde::{Deserialize, Serialize};

/// Binds one user to one project with exactly one role.
///
/// At most one row exists per `(project_id, user_id)`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable, Serialize, Deserialize,
)]
#[diesel(table_name = schema::project_membership)]
#[diesel(check_for_backend(Pg))]
pub struct Membership {
    pub id: uuid::Uuid,
    pub project_id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub role: Role,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Insertable)]
#[diesel(table_name = schema::project_membership)]
pub struct NewMembership {
    pub project_id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub role: Role,
}
