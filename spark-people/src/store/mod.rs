//! Persistence seams for swipes and the user directory.
//!
//! Both traits are synchronous: the Postgres implementation runs diesel on the
//! calling task, like every other handler in this service.

pub mod memory;
pub mod postgres;

use std::collections::BTreeSet;

use spark_shared::errors::AppResult;
use spark_shared::types::pagination::{PageRequest, Paginated};

use crate::models::{LikedPerson, NewSwipe, NewUser, PopularTarget, Swipe, User, UserProfile};

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub trait SwipeStore: Send + Sync {
    /// Persist one decision. At most one swipe may exist per ordered
    /// (actor, target) pair; a second attempt fails with `DuplicateDecision`
    /// no matter how the two calls interleave.
    fn record_decision(&self, swipe: NewSwipe) -> AppResult<Swipe>;

    /// Every target the actor has decided on, either action.
    fn excluded_targets(&self, actor_id: i64) -> AppResult<BTreeSet<i64>>;

    /// The actor's likes, newest first, with the liked person attached.
    fn liked_targets(&self, actor_id: i64, page: &PageRequest) -> AppResult<Paginated<LikedPerson>>;

    /// Users whose received like count is strictly greater than `min_likes`,
    /// ordered by user id.
    fn popular_targets(&self, min_likes: i64) -> AppResult<Vec<PopularTarget>>;
}

pub trait UserDirectory: Send + Sync {
    fn find_user(&self, id: i64) -> AppResult<Option<User>>;

    /// Users not in `excluded`, ascending by id, with pictures, plus the
    /// number of eligible users across all pages.
    fn candidates(&self, excluded: &BTreeSet<i64>, page: &PageRequest) -> AppResult<(Vec<UserProfile>, u64)>;

    /// Provisioning hook for seeding; the feed never writes users.
    fn insert_user(&self, user: NewUser, picture_urls: &[String]) -> AppResult<UserProfile>;

    fn user_count(&self) -> AppResult<u64>;

    fn ping(&self) -> AppResult<()>;
}

/// The `(limit, offset)` pair SQL expects for `page`. `None` means the page
/// starts past any row a table can hold, so it is empty. The limit saturates.
pub(crate) fn sql_window(page: &PageRequest) -> Option<(i64, i64)> {
    let offset = i64::try_from(page.offset()).ok()?;
    let limit = i64::try_from(page.limit()).unwrap_or(i64::MAX);
    Some((limit, offset))
}
