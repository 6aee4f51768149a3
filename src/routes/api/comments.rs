use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::db::comments;
use crate::db::models::Comment;
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/comments", get(list).post(create))
        .route("/api/comments/{id}", axum::routing::delete(remove))
}

/// A client supplies the post and the text; the commenter is always the
/// session user, whatever the body says.
#[derive(Deserialize)]
struct CreateCommentRequest {
    post_id: String,
    comment_text: String,
}

async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Comment>>> {
    let conn = state.db.get()?;
    Ok(Json(comments::list(&conn)?))
}

async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CreateCommentRequest>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let comment = comments::create(&conn, &req.post_id, &user.id, &req.comment_text)?;
    Ok(Json(comment).into_response())
}

async fn remove(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let deleted = comments::delete(&conn, &id)?;
    if deleted == 0 {
        return Err(AppError::NotFound("No comment found with this id".into()));
    }
    Ok(Json(json!({ "deleted": deleted })).into_response())
}
