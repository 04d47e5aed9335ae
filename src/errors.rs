//! # Error Handling for the REST Surface
//!
//! Repository and service code returns `sea_orm::DbErr`; handlers convert it
//! into [`ApiError`], which picks the HTTP status, sends a sanitized JSON body
//! and logs internal details with `tracing`.
//!
//! ```rust,ignore
//! async fn get_one(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Post>, ApiError> {
//!     let post = state.service::<Post>()
//!         .find_one(id)
//!         .await?
//!         .ok_or_else(|| ApiError::not_found("post", Some(id.to_string())))?;
//!     Ok(Json(post))
//! }
//! ```

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

use crate::filtering::ParamError;

/// API error type with automatic logging and sanitized responses
#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found
    NotFound {
        /// Entity name, e.g. `post`
        resource: String,
        id: Option<String>,
    },

    /// 400 Bad Request, with a machine-readable key such as `idnull`
    BadRequest {
        message: String,
        entity: String,
        key: String,
    },

    /// 422 Unprocessable Entity - body could not be read as the entity
    ValidationFailed { errors: Vec<String> },

    /// 500 Internal Server Error - details logged, not exposed
    Database { message: String, internal: DbErr },

    /// 500 Internal Server Error
    Internal {
        message: String,
        internal: Option<String>,
    },
}

impl ApiError {
    pub fn not_found(resource: impl Into<String>, id: Option<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id,
        }
    }

    /// ```rust,ignore
    /// return Err(ApiError::bad_request("A new post cannot already have an ID", "post", "idexists"));
    /// ```
    pub fn bad_request(
        message: impl Into<String>,
        entity: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self::BadRequest {
            message: message.into(),
            entity: entity.into(),
            key: key.into(),
        }
    }

    #[must_use]
    pub fn validation_failed(errors: Vec<String>) -> Self {
        Self::ValidationFailed { errors }
    }

    #[must_use]
    pub fn database(err: DbErr) -> Self {
        Self::Database {
            message: "A database error occurred".to_string(),
            internal: err,
        }
    }

    pub fn internal(message: impl Into<String>, internal: Option<String>) -> Self {
        Self::Internal {
            message: message.into(),
            internal,
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::NotFound { resource, id } => match id {
                Some(id) => format!("{resource} with ID '{id}' not found"),
                None => format!("{resource} not found"),
            },
            Self::ValidationFailed { errors } => {
                if errors.len() == 1 {
                    errors[0].clone()
                } else {
                    format!("Validation failed: {}", errors.join(", "))
                }
            }
            Self::BadRequest { message, .. }
            | Self::Database { message, .. }
            | Self::Internal { message, .. } => message.clone(),
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::Internal {
                internal: Some(details),
                ..
            } => {
                tracing::error!(details = %details, "Internal error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

/// Error response sent to users (sanitized)
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let response = match &self {
            Self::ValidationFailed { errors } => ErrorResponse {
                error: "Validation failed".to_string(),
                entity_name: None,
                error_key: None,
                details: Some(errors.clone()),
            },
            Self::BadRequest { message, entity, key } => ErrorResponse {
                error: message.clone(),
                entity_name: Some(entity.clone()),
                error_key: Some(key.clone()),
                details: None,
            },
            _ => ErrorResponse {
                error: self.user_message(),
                entity_name: None,
                error_key: None,
                details: None,
            },
        };

        (status, Json(response)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

/// `RecordNotFound` and `RecordNotUpdated` become 404; every other `DbErr` is a
/// logged 500.
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match &err {
            DbErr::RecordNotFound(msg) => {
                let resource = msg.split_whitespace().next().unwrap_or("Resource");
                Self::not_found(resource, None)
            }
            DbErr::RecordNotUpdated => Self::not_found("Resource", None),
            _ => Self::database(err),
        }
    }
}

impl From<ParamError> for ApiError {
    fn from(err: ParamError) -> Self {
        Self::BadRequest {
            message: err.to_string(),
            entity: "query".to_string(),
            key: "invalidparameter".to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation_failed(vec![rejection.body_text()])
    }
}
