use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::db::models::PostDetail;
use crate::db::posts;
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/posts", get(list).post(create))
        .route(
            "/api/posts/{id}",
            get(get_one).put(update).delete(remove),
        )
}

#[derive(Deserialize)]
struct CreatePostRequest {
    title: String,
    post_text: String,
}

#[derive(Deserialize)]
struct UpdatePostRequest {
    title: Option<String>,
    post_text: Option<String>,
}

async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<PostDetail>>> {
    let conn = state.db.get()?;
    Ok(Json(posts::feed(&conn)?))
}

async fn get_one(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let conn = state.db.get()?;
    let post = posts::find_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("No post found with this id".into()))?;
    Ok(Json(post).into_response())
}

/// POST /api/posts — the author is always the session user.
async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CreatePostRequest>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let post = posts::create(&conn, &user.id, &req.title, &req.post_text)?;
    Ok(Json(post).into_response())
}

async fn update(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdatePostRequest>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let changed = posts::update(
        &conn,
        &id,
        &posts::PostUpdate {
            title: req.title,
            post_text: req.post_text,
        },
    )?;

    if changed == 0 {
        return Err(AppError::NotFound("No post found with this id".into()));
    }
    Ok(Json(json!({ "updated": changed })).into_response())
}

async fn remove(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let deleted = posts::delete(&conn, &id)?;
    if deleted == 0 {
        return Err(AppError::NotFound("No post found with this id".into()));
    }
    Ok(Json(json!({ "deleted": deleted })).into_response())
}
