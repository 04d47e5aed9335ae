//! Blog domain types and their relationship rules.
//!
//! Identity is the database id: two values are equal only when both carry the
//! same `Some(id)`. Relationships are kept consistent by paired setters, so a
//! post's `post_status_id` always tracks the status it holds and the status
//! records the post it belongs to.

use std::fmt;

use serde::de::DeserializeOwned;

mod comment;
pub mod criteria;
mod post;
mod post_status;

pub use comment::{Comment, CommentPatch};
pub use criteria::{CommentCriteria, PostCriteria, PostStatusCriteria};
pub use post::{Post, PostPatch};
pub use post_status::{PostStatus, PostStatusPatch};

/// Partial update support: only fields present in the patch are copied.
pub trait MergePatch {
    type Patch: DeserializeOwned + fmt::Debug + Send + Sync + 'static;

    /// Identity carried by the patch body, checked against the request path.
    fn patch_id(patch: &Self::Patch) -> Option<i64>;

    fn merge(&mut self, patch: Self::Patch);
}
