use axum::{
    Json, Router, middleware,
    response::IntoResponse,
    routing::{get, post},
};

use forum_types::api::Envelope;

use crate::identity::require_username;
use crate::state::AppState;
use crate::{comments, messages, posts, stats, subreddits, users};

/// Every forum route. Routes that act on behalf of a user sit behind the
/// `Username` header check.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/register", post(users::register))
        .route("/api/users", get(users::list_users))
        .route("/api/users/{username}", get(users::get_user))
        .route("/api/subreddits/{name}", get(subreddits::get_subreddit))
        .route("/api/posts/{post_id}", get(posts::get_post))
        .route("/api/posts/{post_id}/comments", get(comments::get_comments))
        .route("/api/stats", get(stats::get_stats))
        .with_state(state.clone());

    let identified_routes = Router::new()
        .route("/api/subreddits", post(subreddits::create_subreddit))
        .route("/api/subreddits/{name}/join", post(subreddits::join_subreddit))
        .route("/api/subreddits/{name}/leave", post(subreddits::leave_subreddit))
        .route("/api/posts", post(posts::create_post))
        .route("/api/posts", get(posts::get_feed))
        .route("/api/posts/{post_id}/vote", post(posts::vote_post))
        .route("/api/posts/{post_id}/comments", post(comments::add_comment))
        .route("/api/messages", post(messages::send_message))
        .route("/api/messages", get(messages::get_messages))
        .route("/api/messages/{message_id}/reply", post(messages::reply_to_message))
        .layer(middleware::from_fn(require_username))
        .with_state(state);

    Router::new().merge(public_routes).merge(identified_routes)
}

async fn health() -> impl IntoResponse {
    Json(Envelope::ok("ok"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use forum_engine::Engine;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::state::AppStateInner;

    fn app() -> Router {
        create_router(AppStateInner::new(Arc::new(Engine::new()), 5))
    }

    async fn call(
        app: &Router,
        method: &str,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            req = req.header("Username", user);
        }
        let body = match body {
            Some(json) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&json).unwrap())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn register(app: &Router, username: &str) {
        let (status, _) = call(
            app,
            "POST",
            "/api/register",
            None,
            Some(json!({ "username": username, "password": "pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let (status, body) = call(&app(), "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn registration_rules() {
        let app = app();
        register(&app, "alice").await;

        let (status, body) = call(
            &app,
            "POST",
            "/api/register",
            None,
            Some(json!({ "username": "alice", "password": "pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Failed to register user: user already exists: alice");

        let (status, _) = call(
            &app,
            "POST",
            "/api/register",
            None,
            Some(json!({ "username": "  ", "password": "pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(&app, "POST", "/api/register", None, Some(json!({ "password": "pw" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["username"], "user1");

        let (_, body) = call(&app, "GET", "/api/users", None, None).await;
        let names: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["username"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["alice", "user1"]);
    }

    #[tokio::test]
    async fn subreddit_post_vote_and_feed() {
        let app = app();
        register(&app, "alice").await;
        register(&app, "bob").await;

        let (status, _) = call(
            &app,
            "POST",
            "/api/subreddits",
            Some("alice"),
            Some(json!({ "name": "science", "description": "Science stuff" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = call(&app, "POST", "/api/subreddits/science/join", Some("bob"), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(
            &app,
            "POST",
            "/api/posts",
            Some("alice"),
            Some(json!({ "title": "Hello", "content": "World", "subreddit": "science" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let post_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            "POST",
            &format!("/api/posts/{post_id}/vote"),
            Some("bob"),
            Some(json!({ "upvote": true })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["votes"], 2);

        let (_, body) = call(&app, "GET", "/api/users/alice", None, None).await;
        assert_eq!(body["data"]["karma"], 1);

        let (status, body) = call(&app, "GET", "/api/posts", Some("bob"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["title"], "Hello");

        let (_, body) = call(&app, "GET", "/api/subreddits/science", None, None).await;
        assert_eq!(body["data"]["members"], json!(["bob"]));
        assert_eq!(body["data"]["posts"], json!([post_id]));

        let (status, _) = call(&app, "POST", "/api/subreddits/science/leave", Some("bob"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = call(&app, "GET", "/api/posts", Some("bob"), None).await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn nested_comments_build_a_tree() {
        let app = app();
        register(&app, "alice").await;
        call(&app, "POST", "/api/subreddits", Some("alice"), Some(json!({ "name": "science" }))).await;
        let (_, body) = call(
            &app,
            "POST",
            "/api/posts",
            Some("alice"),
            Some(json!({ "title": "T", "content": "C", "subreddit": "science" })),
        )
        .await;
        let post_id = body["data"]["id"].as_str().unwrap().to_string();
        let comments_uri = format!("/api/posts/{post_id}/comments");

        let (status, body) = call(&app, "POST", &comments_uri, Some("alice"), Some(json!({ "content": "root" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        let root_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            "POST",
            &comments_uri,
            Some("alice"),
            Some(json!({ "content": "child", "parent_id": root_id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let child_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            "POST",
            &comments_uri,
            Some("alice"),
            Some(json!({ "content": "orphan", "parent_id": "not-a-uuid" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["message"],
            "Failed to add comment: parent comment not found: not-a-uuid"
        );

        let (status, body) = call(&app, "GET", &comments_uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        let tree = body["data"].as_array().unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0]["content"], "root");
        assert_eq!(tree[0]["children"][0]["content"], "child");
        assert_eq!(tree[0]["children"][0]["id"], child_id);
        assert_eq!(tree[0]["children"][0]["votes"], 0);

        let (_, body) = call(&app, "GET", &format!("/api/posts/{post_id}"), None, None).await;
        assert_eq!(body["data"]["comment_count"], 2);
    }

    #[tokio::test]
    async fn comments_have_no_vote_route() {
        let app = app();
        let uri = format!(
            "/api/posts/{}/comments/{}/vote",
            uuid::Uuid::new_v4(),
            uuid::Uuid::new_v4()
        );
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Username", "alice")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"upvote":true}"#))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn direct_messages_and_stats() {
        let app = app();
        register(&app, "alice").await;
        register(&app, "bob").await;

        let (status, body) = call(
            &app,
            "POST",
            "/api/messages",
            Some("alice"),
            Some(json!({ "to": "bob", "content": "hi" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let message_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            "POST",
            &format!("/api/messages/{message_id}/reply"),
            Some("bob"),
            Some(json!({ "content": "hello" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["to"], "alice");

        let (_, body) = call(&app, "GET", "/api/messages", Some("bob"), None).await;
        let inbox = body["data"].as_array().unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0]["replies"][0]["content"], "hello");

        let (status, _) = call(
            &app,
            "POST",
            "/api/messages",
            Some("alice"),
            Some(json!({ "to": "nobody", "content": "hi" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = call(&app, "GET", "/api/stats", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total_users"], 2);
        assert_eq!(body["data"]["total_direct_messages"], 1);
    }

    #[tokio::test]
    async fn malformed_requests_are_bad_requests() {
        let app = app();
        register(&app, "alice").await;

        let (status, body) = call(&app, "GET", "/api/posts", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Username header is required");

        let (status, body) = call(
            &app,
            "POST",
            "/api/subreddits",
            Some("alice"),
            Some(json!({ "description": "no name" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");

        let (status, _) = call(&app, "GET", "/api/posts/12345", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &app,
            "GET",
            &format!("/api/posts/{}", uuid::Uuid::new_v4()),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(
            &app,
            "POST",
            "/api/subreddits",
            Some("alice"),
            Some(json!({ "name": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
