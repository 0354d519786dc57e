//! In-memory post store - used when no database is configured.

use async_trait::async_trait;
use tokio::sync::RwLock;

use blog_core::domain::{BlogPost, NewPost, PostId, PostUpdate};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository};

/// Post store backed by a `Vec` behind an async `RwLock`.
///
/// Posts are kept in insertion order, which is also creation order.
/// Note: Data is lost on process restart.
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<BlogPost>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<BlogPost, PostId> for InMemoryPostRepository {
    async fn find_by_id(&self, id: PostId) -> Result<Option<BlogPost>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn delete(&self, id: PostId) -> Result<(), RepoError> {
        let mut posts = self.posts.write().await;
        let index = posts
            .iter()
            .position(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;
        posts.remove(index);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: NewPost) -> Result<BlogPost, RepoError> {
        let stored = BlogPost::from_new(PostId::generate(), post);
        self.posts.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn insert_many(&self, posts: Vec<NewPost>) -> Result<Vec<BlogPost>, RepoError> {
        let stored: Vec<BlogPost> = posts
            .into_iter()
            .map(|post| BlogPost::from_new(PostId::generate(), post))
            .collect();

        // Single write lock so readers never observe a partial batch.
        self.posts.write().await.extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<BlogPost>, RepoError> {
        Ok(self.posts.read().await.clone())
    }

    async fn find_one(&self) -> Result<Option<BlogPost>, RepoError> {
        Ok(self.posts.read().await.first().cloned())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.posts.read().await.len() as u64)
    }

    async fn update(&self, id: PostId, changes: PostUpdate) -> Result<BlogPost, RepoError> {
        let mut posts = self.posts.write().await;
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;
        post.apply(changes);
        Ok(post.clone())
    }

    async fn drop_all(&self) -> Result<(), RepoError> {
        self.posts.write().await.clear();
        Ok(())
    }
}
