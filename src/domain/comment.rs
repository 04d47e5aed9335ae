use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::{MergePatch, Post};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CommentRepr")]
pub struct Comment {
    id: Option<i64>,
    pub content: String,
    pub create_time: DateTime<FixedOffset>,
    post_id: Option<i64>,
    post: Option<Box<Post>>,
}

/// Wire shape; conversion routes an embedded post through [`Comment::set_post`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentRepr {
    #[serde(default)]
    id: Option<i64>,
    content: String,
    create_time: DateTime<FixedOffset>,
    #[serde(default)]
    post_id: Option<i64>,
    #[serde(default)]
    post: Option<Post>,
}

impl From<CommentRepr> for Comment {
    fn from(repr: CommentRepr) -> Self {
        let mut comment = Self {
            id: repr.id,
            content: repr.content,
            create_time: repr.create_time,
            post_id: repr.post_id,
            post: None,
        };
        if repr.post.is_some() {
            comment.set_post(repr.post);
        }
        comment
    }
}

impl Comment {
    #[must_use]
    pub fn new(content: impl Into<String>, create_time: DateTime<FixedOffset>) -> Self {
        Self {
            id: None,
            content: content.into(),
            create_time,
            post_id: None,
            post: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_post(mut self, post: Post) -> Self {
        self.set_post(Some(post));
        self
    }

    #[must_use]
    pub fn with_post_id(mut self, post_id: i64) -> Self {
        self.post_id = Some(post_id);
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    #[must_use]
    pub fn post(&self) -> Option<&Post> {
        self.post.as_deref()
    }

    #[must_use]
    pub fn post_id(&self) -> Option<i64> {
        self.post_id
    }

    /// Set the raw foreign key without touching the embedded post.
    pub fn set_post_id(&mut self, post_id: Option<i64>) {
        self.post_id = post_id;
    }

    /// Replace the embedded post; `post_id` follows its identity.
    pub fn set_post(&mut self, post: Option<Post>) {
        self.post_id = post.as_ref().and_then(Post::id);
        self.post = post.map(Box::new);
    }

    /// Owned by a post's comment list: keyed by `post_id`, no embedded copy.
    pub(super) fn attach_to(mut self, post_id: Option<i64>) -> Self {
        self.post = None;
        self.post_id = post_id;
        self
    }

    pub(super) fn detach(self) -> Self {
        self.attach_to(None)
    }
}

impl PartialEq for Comment {
    fn eq(&self, other: &Self) -> bool {
        self.id.is_some() && self.id == other.id
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPatch {
    pub id: Option<i64>,
    pub content: Option<String>,
    pub create_time: Option<DateTime<FixedOffset>>,
}

impl MergePatch for Comment {
    type Patch = CommentPatch;

    fn patch_id(patch: &CommentPatch) -> Option<i64> {
        patch.id
    }

    fn merge(&mut self, patch: CommentPatch) {
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(create_time) = patch.create_time {
            self.create_time = create_time;
        }
    }
}
