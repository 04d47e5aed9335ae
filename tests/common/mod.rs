#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use blogcrate::{
    AppConfig, AppState, CrudRepository,
    domain::{Comment, Post, PostStatus},
    repository::schema::create_tables,
    router,
};
use chrono::{DateTime, FixedOffset};
use futures::{TryStreamExt, stream::BoxStream};
use sea_orm::{Database, DatabaseConnection, DbErr};
use serde_json::Value;
use tower::ServiceExt;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    create_tables(&db).await?;
    Ok(db)
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    router(AppState::new(db, AppConfig::default()))
}

/// `2024-01-01T{hour}:00:00Z`
pub fn at(hour: u32) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(&format!("2024-01-01T{hour:02}:00:00+00:00")).unwrap()
}

pub async fn collect<T>(stream: BoxStream<'_, Result<T, DbErr>>) -> Vec<T> {
    stream.try_collect().await.expect("query failed")
}

pub async fn save_status(db: &DatabaseConnection, status: &str) -> PostStatus {
    PostStatus::save(db, PostStatus::new(status)).await.unwrap()
}

pub async fn save_post(db: &DatabaseConnection, post: Post) -> Post {
    Post::save(db, post).await.unwrap()
}

pub async fn save_comment(db: &DatabaseConnection, comment: Comment) -> Comment {
    Comment::save(db, comment).await.unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
