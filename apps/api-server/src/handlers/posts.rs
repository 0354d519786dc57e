//! Post CRUD handlers.

use actix_web::{HttpResponse, web};

use blog_core::DomainError;
use blog_core::domain::{Author, BlogPost, NewPost, PostId, PostUpdate};
use blog_shared::dto::{CreatePostRequest, PostResponse, UpdatePostRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn post_response(post: BlogPost) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        author: post.author.full_name(),
        title: post.title,
        content: post.content,
        created: post.created,
    }
}

/// GET /posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    tracing::debug!(count = posts.len(), "Listing posts");

    let body: Vec<PostResponse> = posts.into_iter().map(post_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound {
            entity_type: "BlogPost",
            id,
        })?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// POST /posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let new_post = NewPost::new(
        Author::new(req.author.first_name, req.author.last_name),
        req.title,
        req.content,
    );
    new_post.validate()?;

    let post = state.posts.insert(new_post).await?;
    tracing::info!(post_id = %post.id, "Created post");

    Ok(HttpResponse::Created().json(post_response(post)))
}

/// PUT /posts/{id}
///
/// The body must repeat the path id. Only `title` and `content` are applied.
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    let body_id = req
        .id
        .as_deref()
        .and_then(|raw| raw.parse::<PostId>().ok());
    if body_id != Some(id) {
        return Err(AppError::BadRequest(format!(
            "Request path id ({}) and request body id ({}) must match",
            id,
            req.id.as_deref().unwrap_or("missing")
        )));
    }

    let changes = PostUpdate {
        title: req.title,
        content: req.content,
    };
    changes.validate()?;

    state
        .posts
        .update(id, changes)
        .await
        .map_err(|e| e.into_domain(id))?;
    tracing::info!(post_id = %id, "Updated post");

    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    state
        .posts
        .delete(id)
        .await
        .map_err(|e| e.into_domain(id))?;
    tracing::info!(post_id = %id, "Deleted post");

    Ok(HttpResponse::NoContent().finish())
}
