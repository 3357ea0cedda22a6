use std::collections::{BTreeSet, HashMap};

use diesel::dsl::not;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::BigInt;

use spark_shared::clients::db::DbPool;
use spark_shared::errors::{AppError, AppResult, ErrorCode};
use spark_shared::types::pagination::{PageRequest, Paginated};

use crate::models::{
    LikedPerson, NewPicture, NewSwipe, NewSwipeRow, NewUser, Picture, PopularTarget, Swipe,
    SwipeAction, SwipeRow, User, UserProfile,
};
use crate::schema::{pictures, swipes, users};
use crate::store::{sql_window, SwipeStore, UserDirectory};

type PgPooled = PooledConnection<ConnectionManager<PgConnection>>;

pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> AppResult<PgPooled> {
        self.pool.get().map_err(|e| AppError::internal(e.to_string()))
    }
}

/// Maps constraint violations on `swipes` to domain errors. The unique index
/// on (user_id, target_user_id) is what makes concurrent duplicates lose.
fn map_insert_error(err: DieselError) -> AppError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            AppError::new(ErrorCode::DuplicateDecision, "Already swiped this person")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            AppError::new(ErrorCode::UserNotFound, format!("user not found: {}", info.message()))
        }
        other => AppError::Database(other),
    }
}

/// Loads pictures for `users` in one query and pairs them up, keeping the
/// order of `users`.
fn attach_pictures(conn: &mut PgConnection, users: Vec<User>) -> AppResult<Vec<UserProfile>> {
    let pictures = Picture::belonging_to(&users)
        .order(pictures::id.asc())
        .load::<Picture>(conn)?
        .grouped_by(&users);

    Ok(users
        .into_iter()
        .zip(pictures)
        .map(|(user, pictures)| UserProfile { user, pictures })
        .collect())
}

impl SwipeStore for PgStore {
    fn record_decision(&self, swipe: NewSwipe) -> AppResult<Swipe> {
        let mut conn = self.conn()?;

        let row = diesel::insert_into(swipes::table)
            .values(&NewSwipeRow::from(swipe))
            .get_result::<SwipeRow>(&mut conn)
            .map_err(map_insert_error)?;

        Swipe::try_from(row)
    }

    fn excluded_targets(&self, actor_id: i64) -> AppResult<BTreeSet<i64>> {
        let mut conn = self.conn()?;

        let targets = swipes::table
            .filter(swipes::user_id.eq(actor_id))
            .select(swipes::target_user_id)
            .load::<i64>(&mut conn)?;

        Ok(targets.into_iter().collect())
    }

    fn liked_targets(&self, actor_id: i64, page: &PageRequest) -> AppResult<Paginated<LikedPerson>> {
        let mut conn = self.conn()?;
        let like = SwipeAction::Like.as_str();

        let total: i64 = swipes::table
            .filter(swipes::user_id.eq(actor_id))
            .filter(swipes::action.eq(like))
            .count()
            .get_result(&mut conn)?;

        let Some((limit, offset)) = sql_window(page) else {
            return Ok(Paginated::new(vec![], total as u64, page));
        };

        let rows = swipes::table
            .filter(swipes::user_id.eq(actor_id))
            .filter(swipes::action.eq(like))
            .order((swipes::created_at.desc(), swipes::id.desc()))
            .limit(limit)
            .offset(offset)
            .load::<SwipeRow>(&mut conn)?;

        let target_ids: Vec<i64> = rows.iter().map(|r| r.target_user_id).collect();
        let targets = users::table
            .filter(users::id.eq_any(&target_ids))
            .load::<User>(&mut conn)?;
        let mut profiles: HashMap<i64, UserProfile> = attach_pictures(&mut conn, targets)?
            .into_iter()
            .map(|p| (p.user.id, p))
            .collect();

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            // A target deleted between the two reads cascades its swipe away too.
            let Some(target_user) = profiles.remove(&row.target_user_id) else {
                continue;
            };
            items.push(LikedPerson { swipe: Swipe::try_from(row)?, target_user });
        }

        Ok(Paginated::new(items, total as u64, page))
    }

    fn popular_targets(&self, min_likes: i64) -> AppResult<Vec<PopularTarget>> {
        let mut conn = self.conn()?;

        let popular = diesel::sql_query(
            "SELECT s.target_user_id AS user_id, u.name AS name, COUNT(*) AS like_count \
             FROM swipes s \
             JOIN users u ON u.id = s.target_user_id \
             WHERE s.action = 'like' \
             GROUP BY s.target_user_id, u.name \
             HAVING COUNT(*) > $1 \
             ORDER BY s.target_user_id"
        )
        .bind::<BigInt, _>(min_likes)
        .load::<PopularTarget>(&mut conn)?;

        Ok(popular)
    }
}

impl UserDirectory for PgStore {
    fn find_user(&self, id: i64) -> AppResult<Option<User>> {
        let mut conn = self.conn()?;
        Ok(users::table.find(id).first::<User>(&mut conn).optional()?)
    }

    fn candidates(&self, excluded: &BTreeSet<i64>, page: &PageRequest) -> AppResult<(Vec<UserProfile>, u64)> {
        let mut conn = self.conn()?;
        let excluded: Vec<i64> = excluded.iter().copied().collect();

        let total: i64 = users::table
            .filter(not(users::id.eq_any(&excluded)))
            .count()
            .get_result(&mut conn)?;

        let Some((limit, offset)) = sql_window(page) else {
            return Ok((vec![], total as u64));
        };

        let rows = users::table
            .filter(not(users::id.eq_any(&excluded)))
            .order(users::id.asc())
            .limit(limit)
            .offset(offset)
            .load::<User>(&mut conn)?;

        Ok((attach_pictures(&mut conn, rows)?, total as u64))
    }

    fn insert_user(&self, user: NewUser, picture_urls: &[String]) -> AppResult<UserProfile> {
        let mut conn = self.conn()?;

        conn.transaction::<_, AppError, _>(|conn| {
            let user = diesel::insert_into(users::table)
                .values(&user)
                .get_result::<User>(conn)?;

            if picture_urls.is_empty() {
                return Ok(UserProfile { user, pictures: vec![] });
            }

            let new_pictures: Vec<NewPicture<'_>> = picture_urls
                .iter()
                .map(|url| NewPicture { user_id: user.id, image_url: url })
                .collect();
            let pictures = diesel::insert_into(pictures::table)
                .values(&new_pictures)
                .get_results::<Picture>(conn)?;

            Ok(UserProfile { user, pictures })
        })
    }

    fn user_count(&self) -> AppResult<u64> {
        let mut conn = self.conn()?;
        let count: i64 = users::table.count().get_result(&mut conn)?;
        Ok(count as u64)
    }

    fn ping(&self) -> AppResult<()> {
        let mut conn = self.conn()?;
        diesel::sql_query("SELECT 1").execute(&mut conn)?;
        Ok(())
    }
}
