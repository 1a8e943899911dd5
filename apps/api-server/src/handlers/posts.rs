//! Post handlers.
//!
//! Request bodies are read leniently: a body that is not valid JSON is
//! treated as absent, and fields fall back to query parameters.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use serde_json::Value;

use masterblog_core::validation::{FieldSource, PostFields, SortQuery, comment_text, parse_post_id};
use masterblog_shared::dto::{MessageResponse, PostMessageResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

type QueryParams = web::Query<HashMap<String, String>>;

fn field_source(query: QueryParams, body: &[u8]) -> FieldSource {
    let body = serde_json::from_slice::<Value>(body).ok();
    FieldSource::new(body, query.into_inner())
}

/// GET /api/posts?sort=<field>&direction=<asc|desc>
pub async fn list_posts(
    state: web::Data<AppState>,
    query: QueryParams,
) -> AppResult<HttpResponse> {
    let sort = SortQuery::from_source(&FieldSource::from_query(query.into_inner()));
    let posts = state.posts.list(&sort).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    query: QueryParams,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let fields = PostFields::from_source(&field_source(query, &body));
    let post = state.posts.create(fields).await?;
    Ok(HttpResponse::Created().json(PostMessageResponse::new("Post created successfully", post)))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: QueryParams,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let fields = PostFields::from_source(&field_source(query, &body));
    let post = state.posts.update(id, fields).await?;
    Ok(HttpResponse::Ok().json(PostMessageResponse::new("Post updated successfully", post)))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    state.posts.delete(id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Post {id} has been deleted successfully."
    ))))
}

/// GET /api/posts/search?title=&content=&author=&date=
pub async fn search_posts(
    state: web::Data<AppState>,
    query: QueryParams,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let criteria = PostFields::from_source(&field_source(query, &body));
    let posts = state.posts.search(&criteria).await;
    Ok(HttpResponse::Ok().json(posts))
}

/// POST /api/posts/{id}/like
pub async fn like_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let post = state.posts.like(id).await?;
    Ok(HttpResponse::Ok().json(PostMessageResponse::new("Post liked successfully", post)))
}

/// POST /api/posts/{id}/comment
pub async fn comment_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let source = FieldSource::new(serde_json::from_slice(&body).ok(), HashMap::new());
    let text = comment_text(&source);
    let post = state.posts.comment(id, text.as_deref()).await?;
    Ok(HttpResponse::Ok().json(PostMessageResponse::new("Comment added successfully", post)))
}
