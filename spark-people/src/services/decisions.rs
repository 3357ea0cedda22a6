use std::sync::Arc;

use metrics::counter;

use spark_shared::errors::{AppError, AppResult, ErrorCode};
use spark_shared::types::pagination::{PageRequest, Paginated};

use crate::models::{LikedPerson, NewSwipe, PopularTarget, Swipe, SwipeAction};
use crate::store::{SwipeStore, UserDirectory};

#[derive(Clone)]
pub struct DecisionService {
    swipes: Arc<dyn SwipeStore>,
    directory: Arc<dyn UserDirectory>,
}

impl DecisionService {
    pub fn new(swipes: Arc<dyn SwipeStore>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { swipes, directory }
    }

    /// Records a like or dislike. Both users must exist and may not be the
    /// same person. A repeated decision on the same pair fails with
    /// `DuplicateDecision`; callers treat that as an expected outcome.
    pub fn decide(&self, actor_id: i64, target_id: i64, action: SwipeAction) -> AppResult<Swipe> {
        if actor_id == target_id {
            return Err(AppError::new(ErrorCode::CannotSwipeSelf, "cannot swipe on yourself"));
        }

        self.require_user(actor_id)?;
        self.require_user(target_id)?;

        match self.swipes.record_decision(NewSwipe { actor_id, target_id, action }) {
            Ok(swipe) => {
                counter!("swipes_recorded_total", "action" => action.as_str()).increment(1);
                tracing::info!(
                    swipe_id = swipe.id,
                    actor_id = actor_id,
                    target_id = target_id,
                    action = %action,
                    "swipe recorded"
                );
                Ok(swipe)
            }
            Err(err) if err.is(ErrorCode::DuplicateDecision) => {
                counter!("swipes_duplicate_total").increment(1);
                tracing::info!(
                    actor_id = actor_id,
                    target_id = target_id,
                    action = %action,
                    "duplicate swipe rejected"
                );
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    pub fn liked(&self, actor_id: i64, page: PageRequest) -> AppResult<Paginated<LikedPerson>> {
        let page = page.checked()?;
        self.swipes.liked_targets(actor_id, &page)
    }

    pub fn popular(&self, min_likes: i64) -> AppResult<Vec<PopularTarget>> {
        if min_likes < 0 {
            return Err(AppError::invalid_argument("min_likes must not be negative"));
        }
        self.swipes.popular_targets(min_likes)
    }

    fn require_user(&self, id: i64) -> AppResult<()> {
        match self.directory.find_user(id)? {
            Some(_) => Ok(()),
            None => Err(AppError::with_details(
                ErrorCode::UserNotFound,
                format!("user {id} not found"),
                serde_json::json!({ "user_id": id }),
            )),
        }
    }
}
