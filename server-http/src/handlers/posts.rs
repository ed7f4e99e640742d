use crate::api::{CreatePostRequest, ListPostsResponse, PostResponse, UpdatePostRequest};
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::{validate_create_post, validate_update_post};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bulletin::{Job, Post};
use shared::Error;
use tracing::{info, warn};

/// POST /posts - Create a post and queue the author's thank-you email
pub async fn create_post(
    State(state): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    validate_create_post(&req)?;

    if state.users.find_by_id(&req.user_id).await?.is_none() {
        return Err(Error::Validation(format!("Unknown user '{}'", req.user_id)).into());
    }

    let post = state.posts.create(Post::new(req.content, req.user_id)).await?;
    info!("CREATE_POST: id={}, user_id={}", post.id, post.user_id);

    // The post is stored either way; a lost email is not a request failure
    if let Err(e) = state.jobs.enqueue(Job::ThankYou {
        post_id: post.id.clone(),
    }) {
        warn!("Could not queue thank-you email for post {}: {}", post.id, e);
    }

    Ok((StatusCode::CREATED, Json(post.into())))
}

/// GET /posts
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<ListPostsResponse>, ApiError> {
    let posts = state.posts.list_all().await?;
    Ok(Json(ListPostsResponse {
        posts: posts.into_iter().map(Into::into).collect(),
    }))
}

/// GET /posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state.posts.find_by_id(&id).await?.ok_or(Error::NotFound)?;
    Ok(Json(post.into()))
}

/// PUT /posts/{id}
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    validate_update_post(&req)?;

    let mut post = state.posts.find_by_id(&id).await?.ok_or(Error::NotFound)?;
    post.set_content(req.content);
    let post = state.posts.update(post).await?;

    info!("UPDATE_POST: id={}", post.id);
    Ok(Json(post.into()))
}

/// DELETE /posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.posts.delete(&id).await?;
    info!("DELETE_POST: id={}", id);
    Ok(StatusCode::NO_CONTENT)
}
