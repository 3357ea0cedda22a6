use std::sync::Arc;

use spark_shared::errors::AppResult;
use spark_shared::types::pagination::{PageRequest, Paginated};

use crate::models::UserProfile;
use crate::store::{SwipeStore, UserDirectory};

/// Paginated candidate lists: everyone except the actor and the people the
/// actor already swiped on.
///
/// Candidates are ordered by ascending user id. The order carries no meaning
/// beyond keeping pages stable and non-overlapping.
#[derive(Clone)]
pub struct RecommendationFeed {
    swipes: Arc<dyn SwipeStore>,
    directory: Arc<dyn UserDirectory>,
}

impl RecommendationFeed {
    pub fn new(swipes: Arc<dyn SwipeStore>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { swipes, directory }
    }

    /// The actor is not required to exist; an unknown actor sees everyone.
    pub fn recommend(&self, actor_id: i64, page: PageRequest) -> AppResult<Paginated<UserProfile>> {
        let page = page.checked()?;

        let mut excluded = self.swipes.excluded_targets(actor_id)?;
        excluded.insert(actor_id);

        let (items, total) = self.directory.candidates(&excluded, &page)?;

        tracing::debug!(
            actor_id = actor_id,
            excluded = excluded.len(),
            returned = items.len(),
            total = total,
            page = page.page,
            "recommendations computed"
        );

        Ok(Paginated::new(items, total, &page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewSwipe, SwipeAction};
    use crate::store::MemoryStore;
    use crate::testing::store_with_users;
    use spark_shared::ErrorCode;
    use std::collections::BTreeSet;

    fn feed(store: &Arc<MemoryStore>) -> RecommendationFeed {
        RecommendationFeed::new(store.clone(), store.clone())
    }

    fn swipe(store: &MemoryStore, actor_id: i64, target_id: i64, action: SwipeAction) {
        store.record_decision(NewSwipe { actor_id, target_id, action }).unwrap();
    }

    fn ids(page: &Paginated<UserProfile>) -> Vec<i64> {
        page.data.iter().map(|p| p.user.id).collect()
    }

    #[test]
    fn excludes_self_and_swiped_people() {
        let store = store_with_users(5);
        swipe(&store, 1, 2, SwipeAction::Like);
        swipe(&store, 1, 3, SwipeAction::Dislike);

        assert_eq!(store.excluded_targets(1).unwrap(), BTreeSet::from([2, 3]));

        let page = feed(&store).recommend(1, PageRequest::new(1, 10).unwrap()).unwrap();
        assert_eq!(ids(&page), vec![4, 5]);
        assert_eq!(page.total, 2);
        assert_eq!(page.data[0].pictures.len(), 1);
    }

    #[test]
    fn unknown_actor_sees_everyone() {
        let store = store_with_users(3);
        let page = feed(&store).recommend(42, PageRequest::new(1, 10).unwrap()).unwrap();
        assert_eq!(ids(&page), vec![1, 2, 3]);
    }

    #[test]
    fn pages_are_exhaustive_and_disjoint() {
        let store = store_with_users(23);
        for target in [4, 9, 10, 17] {
            swipe(&store, 2, target, SwipeAction::Dislike);
        }
        swipe(&store, 2, 20, SwipeAction::Like);

        let feed = feed(&store);
        let mut seen = Vec::new();
        for page in 1.. {
            let result = feed.recommend(2, PageRequest::new(page, 4).unwrap()).unwrap();
            if result.data.is_empty() {
                break;
            }
            seen.extend(ids(&result));
        }

        let expected: Vec<i64> = (1..=23)
            .filter(|id| ![2, 4, 9, 10, 17, 20].contains(id))
            .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn never_returns_excluded_for_any_page_size() {
        let store = store_with_users(12);
        for target in [1, 5, 6, 11] {
            swipe(&store, 3, target, SwipeAction::Like);
        }
        let excluded = store.excluded_targets(3).unwrap();
        let feed = feed(&store);

        for per_page in 1..=12 {
            for page in 1..=13 {
                let result = feed.recommend(3, PageRequest::new(page, per_page).unwrap()).unwrap();
                for id in ids(&result) {
                    assert_ne!(id, 3);
                    assert!(!excluded.contains(&id));
                }
            }
        }
    }

    #[test]
    fn new_swipe_is_visible_to_next_page_request() {
        let store = store_with_users(3);
        let feed = feed(&store);
        assert_eq!(ids(&feed.recommend(1, PageRequest::default()).unwrap()), vec![2, 3]);

        swipe(&store, 1, 2, SwipeAction::Dislike);
        assert_eq!(ids(&feed.recommend(1, PageRequest::default()).unwrap()), vec![3]);
    }

    #[test]
    fn malformed_pagination_is_invalid_argument() {
        let store = store_with_users(3);
        let bad = PageRequest { page: 0, per_page: 10 };
        let err = feed(&store).recommend(1, bad).unwrap_err();
        assert!(err.is(ErrorCode::ValidationError));
    }

    #[test]
    fn page_size_above_hundred_is_served() {
        let store = store_with_users(3);
        let page = feed(&store).recommend(1, PageRequest { page: 1, per_page: 150 }).unwrap();
        assert_eq!(ids(&page), vec![2, 3]);
        assert_eq!(page.per_page, 150);
        assert_eq!(page.last_page, 1);
    }
}
