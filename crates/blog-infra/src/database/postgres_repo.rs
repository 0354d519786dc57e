//! PostgreSQL post store.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryOrder, Select, Set,
    TransactionTrait,
};

use blog_core::domain::{BlogPost, NewPost, PostId, PostUpdate};
use blog_core::error::RepoError;
use blog_core::ports::PostRepository;

use super::entity::post::{self, Entity as PostEntity, new_active_model};
use super::postgres_base::{PostgresBaseRepository, repo_error};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// Oldest first; the id breaks ties between posts created in the same microsecond.
fn in_list_order() -> Select<PostEntity> {
    PostEntity::find()
        .order_by_asc(post::Column::Created)
        .order_by_asc(post::Column::Id)
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, post: NewPost) -> Result<BlogPost, RepoError> {
        let model = new_active_model(post)
            .insert(&self.db)
            .await
            .map_err(repo_error)?;

        tracing::debug!(post_id = %model.id, "Inserted post");
        Ok(model.into())
    }

    async fn insert_many(&self, posts: Vec<NewPost>) -> Result<Vec<BlogPost>, RepoError> {
        let txn = self.db.begin().await.map_err(repo_error)?;

        let mut stored = Vec::with_capacity(posts.len());
        for post in posts {
            let model = new_active_model(post)
                .insert(&txn)
                .await
                .map_err(repo_error)?;
            stored.push(model.into());
        }

        txn.commit().await.map_err(repo_error)?;
        tracing::debug!(count = stored.len(), "Inserted post batch");
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<BlogPost>, RepoError> {
        let result = in_list_order().all(&self.db).await.map_err(repo_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_one(&self) -> Result<Option<BlogPost>, RepoError> {
        let result = in_list_order().one(&self.db).await.map_err(repo_error)?;

        Ok(result.map(Into::into))
    }

    async fn count(&self) -> Result<u64, RepoError> {
        PostEntity::find().count(&self.db).await.map_err(repo_error)
    }

    async fn update(&self, id: PostId, changes: PostUpdate) -> Result<BlogPost, RepoError> {
        let existing = PostEntity::find_by_id(id.as_uuid())
            .one(&self.db)
            .await
            .map_err(repo_error)?
            .ok_or(RepoError::NotFound)?;

        if changes.is_empty() {
            return Ok(existing.into());
        }

        let mut active = existing.into_active_model();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }

        let model = active.update(&self.db).await.map_err(repo_error)?;
        Ok(model.into())
    }

    async fn drop_all(&self) -> Result<(), RepoError> {
        let result = PostEntity::delete_many()
            .exec(&self.db)
            .await
            .map_err(repo_error)?;

        tracing::debug!(removed = result.rows_affected, "Dropped all posts");
        Ok(())
    }
}
