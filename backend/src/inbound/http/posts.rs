//! Feed handlers: posts, likes, and comments.
//!
//! ```text
//! POST /api/posts {"text":"Hello"}
//! GET /api/posts
//! GET /api/posts/user/{userId}
//! PUT /api/posts/{id}/like
//! POST /api/posts/{id}/comment {"text":"Welcome"}
//! DELETE /api/posts/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::Error;
use crate::domain::post::PostId;
use crate::domain::services::PostView;
use crate::domain::user::UserId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Identity;
use crate::inbound::http::state::HttpState;

/// Body for `POST /api/posts`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub text: String,
}

/// Body for `POST /api/posts/{id}/comment`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub text: String,
}

/// Publish a post to the feed. Verified alumni only.
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<CreatePostRequest>,
) -> ApiResult<HttpResponse> {
    let view = state
        .posts
        .create(identity.user(), &payload.text)
        .await?;
    Ok(HttpResponse::Created().json(view))
}

/// The full feed, newest first.
#[utoipa::path(
    get,
    path = "/api/posts",
    responses(
        (status = 200, description = "Feed", body = [PostView]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Account pending verification", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listPosts"
)]
#[get("/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<Vec<PostView>>> {
    let feed = state.posts.list(identity.user()).await?;
    Ok(web::Json(feed))
}

/// One author's posts, newest first.
#[utoipa::path(
    get,
    path = "/api/posts/user/{userId}",
    params(("userId" = UserId, Path, description = "Author id")),
    responses(
        (status = 200, description = "Author's posts", body = [PostView]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Account pending verification", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listPostsByUser"
)]
#[get("/posts/user/{user_id}")]
pub async fn list_posts_by_user(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<UserId>,
) -> ApiResult<web::Json<Vec<PostView>>> {
    let posts = state
        .posts
        .list_by_user(identity.user(), path.into_inner())
        .await?;
    Ok(web::Json(posts))
}

/// Toggle the actor's like on a post.
#[utoipa::path(
    put,
    path = "/api/posts/{id}/like",
    params(("id" = PostId, Path, description = "Post id")),
    responses(
        (status = 200, description = "Updated post", body = PostView),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Account pending verification", body = Error),
        (status = 404, description = "Post not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "togglePostLike"
)]
#[put("/posts/{id}/like")]
pub async fn toggle_like(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<PostId>,
) -> ApiResult<web::Json<PostView>> {
    let view = state
        .posts
        .toggle_like(identity.user(), path.into_inner())
        .await?;
    Ok(web::Json(view))
}

/// Prepend a comment to a post.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/comment",
    params(("id" = PostId, Path, description = "Post id")),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Updated post", body = PostView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Account pending verification", body = Error),
        (status = 404, description = "Post not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "addPostComment"
)]
#[post("/posts/{id}/comment")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<PostId>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<web::Json<PostView>> {
    let view = state
        .posts
        .add_comment(identity.user(), path.into_inner(), &payload.text)
        .await?;
    Ok(web::Json(view))
}

/// Delete a post. Owners always may; an Institute Admin may delete any.
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = PostId, Path, description = "Post id")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Account pending verification", body = Error),
        (status = 404, description = "Post not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<PostId>,
) -> ApiResult<HttpResponse> {
    state
        .posts
        .delete(identity.user(), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
