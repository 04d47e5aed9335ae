//! Entity services: logging wrappers over [`CrudRepository`] plus partial update.

use std::marker::PhantomData;

use futures::stream::BoxStream;
use sea_orm::{DatabaseConnection, DbErr};
use tracing::debug;

use crate::domain::{Comment, MergePatch, Post, PostStatus};
use crate::filtering::Page;
use crate::repository::CrudRepository;

pub struct EntityService<R> {
    db: DatabaseConnection,
    _entity: PhantomData<fn() -> R>,
}

pub type PostService = EntityService<Post>;
pub type CommentService = EntityService<Comment>;
pub type PostStatusService = EntityService<PostStatus>;

impl<R> Clone for EntityService<R> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _entity: PhantomData,
        }
    }
}

impl<R: CrudRepository + MergePatch> EntityService<R> {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    /// Insert a new entity.
    ///
    /// # Errors
    ///
    /// Propagates database failures.
    pub async fn save(&self, entity: R) -> Result<R, DbErr> {
        debug!(entity = R::ENTITY_NAME, ?entity, "Request to save");
        R::save(&self.db, entity).await
    }

    /// Overwrite a stored entity.
    ///
    /// # Errors
    ///
    /// Fails with [`DbErr::RecordNotUpdated`] when no row has the entity's id.
    pub async fn update(&self, entity: R) -> Result<R, DbErr> {
        debug!(entity = R::ENTITY_NAME, ?entity, "Request to update");
        R::save(&self.db, entity).await
    }

    /// Merge the present fields of `patch` into the stored entity.
    ///
    /// Returns `Ok(None)` when no entity has `id`.
    ///
    /// # Errors
    ///
    /// Propagates database failures.
    pub async fn partial_update(&self, id: i64, patch: R::Patch) -> Result<Option<R>, DbErr> {
        debug!(entity = R::ENTITY_NAME, id, ?patch, "Request to partially update");
        let Some(mut existing) = R::find_by_id(&self.db, id).await? else {
            return Ok(None);
        };
        existing.merge(patch);
        R::save(&self.db, existing).await.map(Some)
    }

    pub fn find_by_criteria<'a>(
        &'a self,
        criteria: Option<&R::Criteria>,
        page: Option<&Page>,
    ) -> BoxStream<'a, Result<R, DbErr>> {
        debug!(entity = R::ENTITY_NAME, ?criteria, ?page, "Request to get all by criteria");
        R::find_by_criteria(&self.db, criteria, page)
    }

    /// # Errors
    ///
    /// Propagates database failures.
    pub async fn count_by_criteria(&self, criteria: Option<&R::Criteria>) -> Result<u64, DbErr> {
        debug!(entity = R::ENTITY_NAME, ?criteria, "Request to count by criteria");
        R::count_by_criteria(&self.db, criteria).await
    }

    /// # Errors
    ///
    /// Propagates database failures.
    pub async fn count_all(&self) -> Result<u64, DbErr> {
        R::count_all(&self.db).await
    }

    /// # Errors
    ///
    /// Propagates database failures.
    pub async fn find_one(&self, id: i64) -> Result<Option<R>, DbErr> {
        debug!(entity = R::ENTITY_NAME, id, "Request to get");
        R::find_by_id(&self.db, id).await
    }

    /// # Errors
    ///
    /// Propagates database failures.
    pub async fn exists(&self, id: i64) -> Result<bool, DbErr> {
        R::exists_by_id(&self.db, id).await
    }

    /// Named list filter, e.g. `post-is-null`. `None` when the name is unknown.
    pub fn find_by_named_filter<'a>(&'a self, name: &str) -> Option<BoxStream<'a, Result<R, DbErr>>> {
        debug!(entity = R::ENTITY_NAME, name, "Request to get by named filter");
        R::named_filter(&self.db, name)
    }

    /// # Errors
    ///
    /// Propagates database failures.
    pub async fn delete(&self, id: i64) -> Result<(), DbErr> {
        debug!(entity = R::ENTITY_NAME, id, "Request to delete");
        R::delete_by_id(&self.db, id).await
    }
}
