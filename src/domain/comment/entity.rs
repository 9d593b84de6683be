use chrono::{DateTime, Utc};
use serde::Serialize;

use super::values::{Body, CommentId};
use crate::domain::profile::Profile;
use crate::domain::user::UserId;

/// A comment on an article, as shown to a particular viewer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: Body,
    #[serde(skip)]
    pub author_id: UserId,
    pub author: Profile,
}

impl Comment {
    pub fn is_written_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }
}
