use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};
use serde::{Deserialize, Serialize};

use spark_shared::errors::{AppError, AppResult};

use crate::schema::{pictures, swipes, users};

// --- User ---

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Serialize)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub location: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, Deserialize)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub name: String,
    pub age: i32,
    pub location: String,
    pub email: String,
}

// --- Picture ---

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Associations, Serialize)]
#[diesel(belongs_to(User))]
#[diesel(table_name = pictures)]
pub struct Picture {
    pub id: i64,
    pub user_id: i64,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = pictures)]
pub struct NewPicture<'a> {
    pub user_id: i64,
    pub image_url: &'a str,
}

/// A user as the feed shows it: profile fields plus pictures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub pictures: Vec<Picture>,
}

// --- Swipe ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeAction {
    Like,
    Dislike,
}

impl SwipeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeAction::Like => "like",
            SwipeAction::Dislike => "dislike",
        }
    }
}

impl std::fmt::Display for SwipeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SwipeAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(SwipeAction::Like),
            "dislike" => Ok(SwipeAction::Dislike),
            _ => Err(AppError::invalid_argument(format!("unknown swipe action: {s}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Swipe {
    pub id: i64,
    pub user_id: i64,
    pub target_user_id: i64,
    pub action: SwipeAction,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row shape of `swipes`; `action` is stored as text.
#[derive(Debug, Queryable)]
#[diesel(table_name = swipes)]
pub struct SwipeRow {
    pub id: i64,
    pub user_id: i64,
    pub target_user_id: i64,
    pub action: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SwipeRow> for Swipe {
    type Error = AppError;

    fn try_from(row: SwipeRow) -> AppResult<Self> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            target_user_id: row.target_user_id,
            action: row.action.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewSwipe {
    pub actor_id: i64,
    pub target_id: i64,
    pub action: SwipeAction,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = swipes)]
pub struct NewSwipeRow {
    pub user_id: i64,
    pub target_user_id: i64,
    pub action: &'static str,
}

impl From<NewSwipe> for NewSwipeRow {
    fn from(swipe: NewSwipe) -> Self {
        Self {
            user_id: swipe.actor_id,
            target_user_id: swipe.target_id,
            action: swipe.action.as_str(),
        }
    }
}

/// A like decision joined with the person who was liked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LikedPerson {
    #[serde(flatten)]
    pub swipe: Swipe,
    pub target_user: UserProfile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, QueryableByName)]
pub struct PopularTarget {
    #[diesel(sql_type = BigInt)]
    pub user_id: i64,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = BigInt)]
    pub like_count: i64,
}
