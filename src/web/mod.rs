//! REST surface: one set of generic handlers instantiated per resource.
//!
//! | Method | Path | |
//! |---|---|---|
//! | `GET` | `/api/{res}` | criteria, paging and sort parameters; `X-Total-Count` and `Link` headers |
//! | `GET` | `/api/{res}/count` | count matching criteria |
//! | `GET` | `/api/{res}/{id}` | one entity or 404 |
//! | `POST` | `/api/{res}` | create; body must not carry an id |
//! | `PUT` | `/api/{res}/{id}` | full update |
//! | `PATCH` | `/api/{res}/{id}` | merge present fields |
//! | `DELETE` | `/api/{res}/{id}` | idempotent delete |

pub mod headers;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
    routing::get,
};
use futures::TryStreamExt;
use sea_orm::DatabaseConnection;
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::config::AppConfig;
use crate::domain::{Comment, MergePatch, Post, PostStatus};
use crate::errors::ApiError;
use crate::filtering::{Page, pagination_headers, parse_criteria};
use crate::repository::CrudRepository;
use crate::service::EntityService;
use headers::{Alert, entity_alert_headers};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    #[must_use]
    pub fn service<R: CrudRepository + MergePatch>(&self) -> EntityService<R> {
        EntityService::new(self.db.clone())
    }
}

/// A repository type exposed over HTTP under `BASE_PATH`.
pub trait RestResource: CrudRepository + MergePatch + Serialize + DeserializeOwned {
    const BASE_PATH: &'static str;
}

impl RestResource for Post {
    const BASE_PATH: &'static str = "/api/posts";
}

impl RestResource for Comment {
    const BASE_PATH: &'static str = "/api/comments";
}

impl RestResource for PostStatus {
    const BASE_PATH: &'static str = "/api/post-statuses";
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(resource_routes::<Post>())
        .merge(resource_routes::<Comment>())
        .merge(resource_routes::<PostStatus>())
        .with_state(state)
}

fn resource_routes<R: RestResource>() -> Router<AppState> {
    Router::new()
        .route(R::BASE_PATH, get(list::<R>).post(create::<R>))
        .route(&format!("{}/count", R::BASE_PATH), get(count::<R>))
        .route(
            &format!("{}/{{id}}", R::BASE_PATH),
            get(get_one::<R>)
                .put(update::<R>)
                .patch(partial_update::<R>)
                .delete(delete::<R>),
        )
}

async fn create<R: RestResource>(
    State(state): State<AppState>,
    body: Result<Json<R>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(entity) = body?;
    debug!(entity = R::ENTITY_NAME, ?entity, "REST request to save");
    if entity.id().is_some() {
        return Err(ApiError::bad_request(
            format!("A new {} cannot already have an ID", R::ENTITY_NAME),
            R::ENTITY_NAME,
            "idexists",
        ));
    }

    let saved = state.service::<R>().save(entity).await?;
    let id = saved.id().map(|id| id.to_string()).unwrap_or_default();

    let mut headers = entity_alert_headers(&state.config.application_name, Alert::Created, R::ENTITY_NAME, &id);
    let location = HeaderValue::from_str(&format!("{}/{id}", R::BASE_PATH))
        .map_err(|e| ApiError::internal("Failed to build Location header", Some(e.to_string())))?;
    headers.insert(LOCATION, location);

    Ok((StatusCode::CREATED, headers, Json(saved)).into_response())
}

/// Reject a body whose id is missing, differs from the path, or names no row.
async fn check_update_target<R: RestResource>(
    state: &AppState,
    path_id: i64,
    body_id: Option<i64>,
) -> Result<(), ApiError> {
    let Some(body_id) = body_id else {
        return Err(ApiError::bad_request("Invalid id", R::ENTITY_NAME, "idnull"));
    };
    if body_id != path_id {
        return Err(ApiError::bad_request("Invalid ID", R::ENTITY_NAME, "idinvalid"));
    }
    if !state.service::<R>().exists(path_id).await? {
        return Err(ApiError::bad_request("Entity not found", R::ENTITY_NAME, "idnotfound"));
    }
    Ok(())
}

async fn update<R: RestResource>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<R>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(entity) = body?;
    debug!(entity = R::ENTITY_NAME, id, ?entity, "REST request to update");
    check_update_target::<R>(&state, id, entity.id()).await?;

    let saved = state.service::<R>().update(entity).await?;
    let headers = entity_alert_headers(&state.config.application_name, Alert::Updated, R::ENTITY_NAME, &id.to_string());
    Ok((headers, Json(saved)).into_response())
}

async fn partial_update<R: RestResource>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<R::Patch>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(patch) = body?;
    debug!(entity = R::ENTITY_NAME, id, ?patch, "REST request to partially update");
    check_update_target::<R>(&state, id, R::patch_id(&patch)).await?;

    let saved = state
        .service::<R>()
        .partial_update(id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found(R::ENTITY_NAME, Some(id.to_string())))?;
    let headers = entity_alert_headers(&state.config.application_name, Alert::Updated, R::ENTITY_NAME, &id.to_string());
    Ok((headers, Json(saved)).into_response())
}

async fn list<R: RestResource>(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let service = state.service::<R>();

    if let Some((_, name)) = params.iter().find(|(key, _)| key == "filter") {
        if let Some(stream) = service.find_by_named_filter(name) {
            let items: Vec<R> = stream.try_collect().await?;
            return Ok(Json(items).into_response());
        }
    }

    let criteria: R::Criteria = parse_criteria(&params)?;
    let page = Page::from_params(&params, state.config.default_page_size, state.config.max_page_size)?;
    debug!(entity = R::ENTITY_NAME, ?criteria, ?page, "REST request to get by criteria");

    // Counts by streaming the unpaged joined rows, then fetches the page on the same connection.
    let total = service.count_by_criteria(Some(&criteria)).await?;
    let items: Vec<R> = service
        .find_by_criteria(Some(&criteria), Some(&page))
        .try_collect()
        .await?;

    let headers = pagination_headers(R::BASE_PATH, &params, &page, total);
    Ok((headers, Json(items)).into_response())
}

async fn count<R: RestResource>(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<u64>, ApiError> {
    let criteria: R::Criteria = parse_criteria(&params)?;
    debug!(entity = R::ENTITY_NAME, ?criteria, "REST request to count by criteria");
    Ok(Json(state.service::<R>().count_by_criteria(Some(&criteria)).await?))
}

async fn get_one<R: RestResource>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<R>, ApiError> {
    debug!(entity = R::ENTITY_NAME, id, "REST request to get");
    state
        .service::<R>()
        .find_one(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(R::ENTITY_NAME, Some(id.to_string())))
}

async fn delete<R: RestResource>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    debug!(entity = R::ENTITY_NAME, id, "REST request to delete");
    state.service::<R>().delete(id).await?;
    let headers = entity_alert_headers(&state.config.application_name, Alert::Deleted, R::ENTITY_NAME, &id.to_string());
    Ok((StatusCode::NO_CONTENT, headers).into_response())
}
