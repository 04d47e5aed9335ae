//! # blogcrate
//!
//! Criteria-filtered CRUD backend for posts, comments and post statuses.
//!
//! The core is a generic query path: per-entity [`Criteria`](filtering::Criteria)
//! are compiled into a `sea_orm::Condition` through a column map, applied to a
//! single left-joined `SELECT`, and the rows are streamed back through
//! [`RowMapper`](repository::RowMapper) implementations.
//!
//! ```rust,ignore
//! use blogcrate::domain::{Post, PostCriteria};
//! use blogcrate::filtering::{Page, StringFilter};
//! use blogcrate::repository::CrudRepository;
//! use futures::TryStreamExt;
//!
//! let criteria = PostCriteria {
//!     title: Some(StringFilter::new().with_contains("Rust")),
//!     ..Default::default()
//! };
//! let posts: Vec<Post> = Post::find_by_criteria(&db, Some(&criteria), Some(&Page::new(0, 20)))
//!     .try_collect()
//!     .await?;
//! ```

pub mod config;
pub mod domain;
pub mod entity;
pub mod errors;
pub mod filtering;
pub mod logging;
pub mod repository;
pub mod service;
pub mod web;

pub use crate::config::AppConfig;
pub use errors::ApiError;
pub use repository::{CrudRepository, RowMapper};
pub use web::{AppState, router};
