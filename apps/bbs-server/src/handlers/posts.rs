//! Post log handlers.

use actix_web::{HttpResponse, web};

use bbs_shared::dto::{ListPostsResponse, PostItem, WritePostRequest, WritePostResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/listPosts - newest 100 posts, newest first.
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state
        .posts
        .list()
        .await?
        .into_iter()
        .map(|entry| PostItem {
            post: entry.content,
            created_at: entry.created_at,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ListPostsResponse { posts }))
}

/// POST /api/writePost
///
/// `newPost` is optional and stored as given.
pub async fn write_post(
    state: web::Data<AppState>,
    body: web::Json<WritePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let record = state.posts.append(req.new_post).await?;
    tracing::debug!(created_at = record.created_at, "Post appended");

    Ok(HttpResponse::Ok().json(WritePostResponse::success()))
}
