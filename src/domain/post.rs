use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::{Comment, MergePatch, PostStatus};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PostRepr")]
pub struct Post {
    id: Option<i64>,
    pub title: String,
    pub content: Option<String>,
    pub create_time: DateTime<FixedOffset>,
    pub update_time: DateTime<FixedOffset>,
    post_status_id: Option<i64>,
    post_status: Option<PostStatus>,
    comments: Vec<Comment>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostRepr {
    #[serde(default)]
    id: Option<i64>,
    title: String,
    #[serde(default)]
    content: Option<String>,
    create_time: DateTime<FixedOffset>,
    update_time: DateTime<FixedOffset>,
    #[serde(default)]
    post_status_id: Option<i64>,
    #[serde(default)]
    post_status: Option<PostStatus>,
    #[serde(default)]
    comments: Vec<Comment>,
}

impl From<PostRepr> for Post {
    fn from(repr: PostRepr) -> Self {
        let mut post = Self {
            id: repr.id,
            title: repr.title,
            content: repr.content,
            create_time: repr.create_time,
            update_time: repr.update_time,
            post_status_id: repr.post_status_id,
            post_status: None,
            comments: Vec::new(),
        };
        if repr.post_status.is_some() {
            post.set_post_status(repr.post_status);
        }
        post.set_comments(repr.comments);
        post
    }
}

impl Post {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        create_time: DateTime<FixedOffset>,
        update_time: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: None,
            create_time,
            update_time,
            post_status_id: None,
            post_status: None,
            comments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.set_id(Some(id));
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn with_post_status(mut self, status: PostStatus) -> Self {
        self.set_post_status(Some(status));
        self
    }

    #[must_use]
    pub fn with_post_status_id(mut self, post_status_id: i64) -> Self {
        self.post_status_id = Some(post_status_id);
        self
    }

    #[must_use]
    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.set_comments(comments);
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Set the identity and propagate it to the held status and comments.
    pub fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
        if let Some(status) = &mut self.post_status {
            status.post = id;
        }
        for comment in &mut self.comments {
            comment.set_post_id(id);
        }
    }

    #[must_use]
    pub fn post_status(&self) -> Option<&PostStatus> {
        self.post_status.as_ref()
    }

    #[must_use]
    pub fn post_status_id(&self) -> Option<i64> {
        self.post_status_id
    }

    /// Set the raw foreign key without touching the held status.
    pub fn set_post_status_id(&mut self, post_status_id: Option<i64>) {
        self.post_status_id = post_status_id;
    }

    /// Replace the held status and return the previous one, detached.
    ///
    /// `post_status_id` follows the new status identity and the new status
    /// records this post as its owner.
    pub fn set_post_status(&mut self, status: Option<PostStatus>) -> Option<PostStatus> {
        let previous = self.post_status.take().map(|mut old| {
            old.post = None;
            old
        });
        self.post_status_id = status.as_ref().and_then(PostStatus::id);
        self.post_status = status.map(|mut new| {
            new.post = self.id;
            new
        });
        previous
    }

    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Replace the comment list, returning the old comments detached.
    pub fn set_comments(&mut self, comments: Vec<Comment>) -> Vec<Comment> {
        let detached = std::mem::take(&mut self.comments)
            .into_iter()
            .map(Comment::detach)
            .collect();
        self.comments = comments
            .into_iter()
            .map(|comment| comment.attach_to(self.id))
            .collect();
        detached
    }

    pub fn add_comment(&mut self, comment: Comment) -> &mut Self {
        self.comments.push(comment.attach_to(self.id));
        self
    }

    /// Remove the comment with identity `comment_id`, returning it detached.
    pub fn remove_comment(&mut self, comment_id: i64) -> Option<Comment> {
        let index = self
            .comments
            .iter()
            .position(|comment| comment.id() == Some(comment_id))?;
        Some(self.comments.remove(index).detach())
    }
}

impl PartialEq for Post {
    fn eq(&self, other: &Self) -> bool {
        self.id.is_some() && self.id == other.id
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub create_time: Option<DateTime<FixedOffset>>,
    pub update_time: Option<DateTime<FixedOffset>>,
}

impl MergePatch for Post {
    type Patch = PostPatch;

    fn patch_id(patch: &PostPatch) -> Option<i64> {
        patch.id
    }

    fn merge(&mut self, patch: PostPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = Some(content);
        }
        if let Some(create_time) = patch.create_time {
            self.create_time = create_time;
        }
        if let Some(update_time) = patch.update_time {
            self.update_time = update_time;
        }
    }
}
