use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use spark_shared::errors::{AppError, AppResult, ErrorCode};
use spark_shared::types::pagination::{PageRequest, Paginated};

use crate::models::{
    LikedPerson, NewSwipe, NewUser, Picture, PopularTarget, Swipe, SwipeAction, User, UserProfile,
};
use crate::store::{SwipeStore, UserDirectory};

/// In-process store used by tests and the `memory` storage backend.
///
/// All tables sit behind one lock, so check-then-insert on the swipe pair is
/// atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    pictures: BTreeMap<i64, Vec<Picture>>,
    swipes: Vec<Swipe>,
    pairs: HashMap<(i64, i64), i64>,
    next_user_id: i64,
    next_picture_id: i64,
    next_swipe_id: i64,
}

impl Tables {
    fn profile(&self, user: &User) -> UserProfile {
        UserProfile {
            user: user.clone(),
            pictures: self.pictures.get(&user.id).cloned().unwrap_or_default(),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> AppResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| AppError::internal("memory store lock poisoned"))
    }
}

impl SwipeStore for MemoryStore {
    fn record_decision(&self, swipe: NewSwipe) -> AppResult<Swipe> {
        let mut tables = self.tables()?;

        // Mirrors the foreign keys on `swipes`.
        for id in [swipe.actor_id, swipe.target_id] {
            if !tables.users.contains_key(&id) {
                return Err(AppError::new(ErrorCode::UserNotFound, format!("user {id} not found")));
            }
        }

        let pair = (swipe.actor_id, swipe.target_id);
        if tables.pairs.contains_key(&pair) {
            return Err(AppError::new(ErrorCode::DuplicateDecision, "Already swiped this person"));
        }

        tables.next_swipe_id += 1;
        let now = Utc::now();
        let record = Swipe {
            id: tables.next_swipe_id,
            user_id: swipe.actor_id,
            target_user_id: swipe.target_id,
            action: swipe.action,
            created_at: now,
            updated_at: now,
        };
        tables.pairs.insert(pair, record.id);
        tables.swipes.push(record.clone());

        Ok(record)
    }

    fn excluded_targets(&self, actor_id: i64) -> AppResult<BTreeSet<i64>> {
        let tables = self.tables()?;
        Ok(tables
            .swipes
            .iter()
            .filter(|s| s.user_id == actor_id)
            .map(|s| s.target_user_id)
            .collect())
    }

    fn liked_targets(&self, actor_id: i64, page: &PageRequest) -> AppResult<Paginated<LikedPerson>> {
        let tables = self.tables()?;

        let mut likes: Vec<&Swipe> = tables
            .swipes
            .iter()
            .filter(|s| s.user_id == actor_id && s.action == SwipeAction::Like)
            .collect();
        likes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = likes.len() as u64;
        let items = likes
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
            .filter_map(|s| {
                tables.users.get(&s.target_user_id).map(|target| LikedPerson {
                    swipe: s.clone(),
                    target_user: tables.profile(target),
                })
            })
            .collect();

        Ok(Paginated::new(items, total, page))
    }

    fn popular_targets(&self, min_likes: i64) -> AppResult<Vec<PopularTarget>> {
        let tables = self.tables()?;

        let mut counts: BTreeMap<i64, i64> = BTreeMap::new();
        for swipe in tables.swipes.iter().filter(|s| s.action == SwipeAction::Like) {
            *counts.entry(swipe.target_user_id).or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .filter(|(_, count)| *count > min_likes)
            .filter_map(|(user_id, like_count)| {
                tables.users.get(&user_id).map(|user| PopularTarget {
                    user_id,
                    name: user.name.clone(),
                    like_count,
                })
            })
            .collect())
    }
}

impl UserDirectory for MemoryStore {
    fn find_user(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.tables()?.users.get(&id).cloned())
    }

    fn candidates(&self, excluded: &BTreeSet<i64>, page: &PageRequest) -> AppResult<(Vec<UserProfile>, u64)> {
        let tables = self.tables()?;

        // BTreeMap iteration is already ascending by id.
        let eligible: Vec<&User> = tables
            .users
            .values()
            .filter(|u| !excluded.contains(&u.id))
            .collect();

        let total = eligible.len() as u64;
        let items = eligible
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
            .map(|u| tables.profile(u))
            .collect();

        Ok((items, total))
    }

    fn insert_user(&self, user: NewUser, picture_urls: &[String]) -> AppResult<UserProfile> {
        let mut tables = self.tables()?;

        if tables.users.values().any(|u| u.email == user.email) {
            return Err(AppError::bad_request(format!("email {} already registered", user.email)));
        }

        tables.next_user_id += 1;
        let now = Utc::now();
        let record = User {
            id: tables.next_user_id,
            name: user.name,
            age: user.age,
            location: user.location,
            email: user.email,
            created_at: now,
            updated_at: now,
        };

        let mut pictures = Vec::with_capacity(picture_urls.len());
        for url in picture_urls {
            tables.next_picture_id += 1;
            pictures.push(Picture {
                id: tables.next_picture_id,
                user_id: record.id,
                image_url: url.clone(),
                created_at: now,
                updated_at: now,
            });
        }

        tables.users.insert(record.id, record.clone());
        tables.pictures.insert(record.id, pictures.clone());

        Ok(UserProfile { user: record, pictures })
    }

    fn user_count(&self) -> AppResult<u64> {
        Ok(self.tables()?.users.len() as u64)
    }

    fn ping(&self) -> AppResult<()> {
        self.tables().map(|_| ())
    }
}
