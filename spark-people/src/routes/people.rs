use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;

use spark_shared::errors::{AppError, AppResult};
use spark_shared::middleware::{Actor, ValidatedQuery};
use spark_shared::types::{ApiResponse, PageRequest, Paginated};

use crate::models::{LikedPerson, Swipe, SwipeAction, UserProfile};
use crate::AppState;

/// GET /people/recommended?user_id=&page=&per_page=
pub async fn recommended(
    Actor(actor_id): Actor,
    State(state): State<Arc<AppState>>,
    ValidatedQuery(page): ValidatedQuery<PageRequest>,
) -> AppResult<Json<ApiResponse<Paginated<UserProfile>>>> {
    let people = state.feed.recommend(actor_id, page)?;
    Ok(Json(ApiResponse::ok(people)))
}

/// POST /people/:id/like?user_id=
pub async fn like(
    Actor(actor_id): Actor,
    State(state): State<Arc<AppState>>,
    target: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<ApiResponse<Swipe>>> {
    let swipe = state.decisions.decide(actor_id, target_id(target)?, SwipeAction::Like)?;
    Ok(Json(ApiResponse::ok_with_message(swipe, "Person liked successfully")))
}

/// POST /people/:id/dislike?user_id=
pub async fn dislike(
    Actor(actor_id): Actor,
    State(state): State<Arc<AppState>>,
    target: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<ApiResponse<Swipe>>> {
    let swipe = state.decisions.decide(actor_id, target_id(target)?, SwipeAction::Dislike)?;
    Ok(Json(ApiResponse::ok_with_message(swipe, "Person disliked successfully")))
}

/// GET /people/liked?user_id=&page=&per_page=
pub async fn liked(
    Actor(actor_id): Actor,
    State(state): State<Arc<AppState>>,
    ValidatedQuery(page): ValidatedQuery<PageRequest>,
) -> AppResult<Json<ApiResponse<Paginated<LikedPerson>>>> {
    let liked = state.decisions.liked(actor_id, page)?;
    Ok(Json(ApiResponse::ok(liked)))
}

fn target_id(path: Result<Path<i64>, PathRejection>) -> AppResult<i64> {
    path.map(|Path(id)| id)
        .map_err(|e| AppError::invalid_argument(format!("invalid person id: {}", e.body_text())))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::testing::store_with_users;
    use crate::AppState;

    fn app(users: i64) -> Router {
        let store = store_with_users(users);
        let state = AppState::new(AppConfig::default(), store.clone(), store, None);
        crate::router(Arc::new(state))
    }

    async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn ids(page: &Value) -> Vec<i64> {
        page["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_i64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn swipes_shape_the_feed() {
        let app = app(5);

        let (status, body) = send(&app, Method::POST, "/people/2/like?user_id=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Person liked successfully");
        assert_eq!(body["data"]["action"], "like");

        let (status, body) = send(&app, Method::POST, "/people/3/dislike?user_id=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Person disliked successfully");

        let (status, body) = send(&app, Method::GET, "/people/recommended?user_id=1&per_page=10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body["data"]), vec![4, 5]);
        assert_eq!(body["data"]["total"], 2);
        assert_eq!(body["data"]["current_page"], 1);
        assert!(!body["data"]["data"][0]["pictures"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn repeated_swipe_is_400_with_message() {
        let app = app(3);
        send(&app, Method::POST, "/people/2/like?user_id=1").await;

        let (status, body) = send(&app, Method::POST, "/people/2/dislike?user_id=1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Already swiped this person");
    }

    #[tokio::test]
    async fn liked_list_includes_target_with_pictures() {
        let app = app(4);
        send(&app, Method::POST, "/people/2/like?user_id=1").await;
        send(&app, Method::POST, "/people/3/dislike?user_id=1").await;
        send(&app, Method::POST, "/people/4/like?user_id=1").await;

        let (status, body) = send(&app, Method::GET, "/people/liked?user_id=1").await;
        assert_eq!(status, StatusCode::OK);
        let liked = body["data"]["data"].as_array().unwrap();
        assert_eq!(liked.len(), 2);
        assert_eq!(liked[0]["target_user"]["id"], 4);
        assert_eq!(liked[1]["target_user"]["id"], 2);
        assert_eq!(
            liked[1]["target_user"]["pictures"][0]["image_url"],
            "https://i.pravatar.cc/300?img=2"
        );
    }

    #[tokio::test]
    async fn actor_is_mandatory() {
        let app = app(2);
        let (status, body) = send(&app, Method::GET, "/people/recommended").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "E0002");

        let (status, _) = send(&app, Method::POST, "/people/2/like").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn bad_pagination_is_rejected() {
        let app = app(2);
        let (status, _) = send(&app, Method::GET, "/people/recommended?user_id=1&per_page=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::GET, "/people/liked?user_id=1&page=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn large_page_sizes_and_far_pages_are_served() {
        let app = app(3);
        let (status, body) = send(&app, Method::GET, "/people/recommended?user_id=1&per_page=150").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body["data"]), vec![2, 3]);

        let (status, body) = send(
            &app,
            Method::GET,
            "/people/liked?user_id=1&page=100000000000000000&per_page=100",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_target_is_404() {
        let app = app(2);
        let (status, body) = send(&app, Method::POST, "/people/99/like?user_id=1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "E2001");
    }

    #[tokio::test]
    async fn non_numeric_target_is_rejected() {
        let app = app(2);
        let (status, body) = send(&app, Method::POST, "/people/abc/like?user_id=1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn popular_endpoint_defaults_to_configured_threshold() {
        let app = app(60);
        for actor in 10..=60 {
            send(&app, Method::POST, &format!("/people/9/like?user_id={actor}")).await;
        }

        let (status, body) = send(&app, Method::GET, "/internal/popular").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["user_id"], 9);
        assert_eq!(body["data"][0]["name"], "User 9");
        assert_eq!(body["data"][0]["like_count"], 51);

        let (_, body) = send(&app, Method::GET, "/internal/popular?min_likes=51").await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn health_reports_storage() {
        let app = app(0);
        let (status, body) = send(&app, Method::GET, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["checks"][0]["name"], "storage");
    }
}
