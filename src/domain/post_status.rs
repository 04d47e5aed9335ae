use serde::{Deserialize, Serialize};

use super::{MergePatch, Post};

/// Lifecycle status that at most one post points at.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostStatus {
    #[serde(default)]
    id: Option<i64>,
    pub status: String,
    /// Identity of the post holding this status. Not persisted.
    #[serde(skip)]
    pub(super) post: Option<i64>,
}

impl PostStatus {
    #[must_use]
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            id: None,
            status: status.into(),
            post: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    /// Identity of the post this status is attached to, if any.
    #[must_use]
    pub fn post(&self) -> Option<i64> {
        self.post
    }

    /// Attach this status to `post`, returning the status it previously held.
    ///
    /// Counterpart of [`Post::set_post_status`]; both sides are updated.
    pub fn link_post(self, post: &mut Post) -> Option<PostStatus> {
        post.set_post_status(Some(self))
    }
}

impl PartialEq for PostStatus {
    fn eq(&self, other: &Self) -> bool {
        self.id.is_some() && self.id == other.id
    }
}

/// Fields a partial update may change.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostStatusPatch {
    pub id: Option<i64>,
    pub status: Option<String>,
}

impl MergePatch for PostStatus {
    type Patch = PostStatusPatch;

    fn patch_id(patch: &PostStatusPatch) -> Option<i64> {
        patch.id
    }

    fn merge(&mut self, patch: PostStatusPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}
