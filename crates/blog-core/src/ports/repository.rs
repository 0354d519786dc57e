use async_trait::async_trait;

use crate::domain::{BlogPost, NewPost, PostId, PostUpdate};
use crate::error::RepoError;

/// Generic repository trait for operations addressed by primary key.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID. Returns `RepoError::NotFound` if nothing was deleted.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post store.
///
/// Identifiers and creation timestamps are assigned by the store on insertion.
/// `list` and `find_one` share one stable ordering (oldest first, then by id),
/// so repeated reads without writes return identical results.
#[async_trait]
pub trait PostRepository: BaseRepository<BlogPost, PostId> {
    /// Insert a single post.
    async fn insert(&self, post: NewPost) -> Result<BlogPost, RepoError>;

    /// Insert several posts; returns after every insert is acknowledged.
    async fn insert_many(&self, posts: Vec<NewPost>) -> Result<Vec<BlogPost>, RepoError>;

    /// All posts.
    async fn list(&self) -> Result<Vec<BlogPost>, RepoError>;

    /// The first post in list order, if any.
    async fn find_one(&self) -> Result<Option<BlogPost>, RepoError>;

    async fn count(&self) -> Result<u64, RepoError>;

    /// Apply `changes` and return the updated post.
    async fn update(&self, id: PostId, changes: PostUpdate) -> Result<BlogPost, RepoError>;

    /// Remove every post.
    async fn drop_all(&self) -> Result<(), RepoError>;
}
