use diesel::{pg::Pg, prelude::*};
use serde::{Deserialize, Serialize};

use crate::db::{enums::CommentVisibility, schema};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable, Serialize, Deserialize,
)]
#[diesel(table_name = schema::ticket_comment)]
#[diesel(check_for_backend(Pg))]
pub struct Comment {
    pub id: uuid::Uuid,
    pub ticket_id: uuid::Uuid,
    pub author_id: uuid::Uuid,
    pub body: String,
    pub visibility: CommentVisibility,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = schema::ticket_comment)]
pub struct NewComment {
    pub ticket_id: uuid::Uuid,
    pub author_id: uuid::Uuid,
    pub body: String,
    pub visibility: CommentVisibility,
}
