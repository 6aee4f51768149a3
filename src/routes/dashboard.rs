use askama::Template;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;

use crate::db::models::{PostDetail, UserDetail};
use crate::db::{posts, users};
use crate::error::{AppError, AppResult};
use crate::extractors::MaybeUser;
use crate::routes::home::Html;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/dashboard/edit/{id}", get(edit_post))
        .route("/dashboard/edituser", get(edit_user))
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    posts: Vec<PostDetail>,
}

#[derive(Template)]
#[template(path = "edit_post.html")]
struct EditPostTemplate {
    post: PostDetail,
}

#[derive(Template)]
#[template(path = "edit_user.html")]
struct EditUserTemplate {
    user: UserDetail,
}

/// Page routes redirect anonymous visitors to the login form rather than
/// answering 401 the way the API does.

async fn dashboard(State(state): State<AppState>, maybe_user: MaybeUser) -> AppResult<Response> {
    let Some(user) = maybe_user.0 else {
        return Ok(Redirect::to("/login").into_response());
    };

    let conn = state.db.get()?;
    let posts = posts::list_for_user(&conn, &user.id)?;

    Ok(Html(DashboardTemplate { posts }).into_response())
}

async fn edit_post(
    State(state): State<AppState>,
    maybe_user: MaybeUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    if maybe_user.0.is_none() {
        return Ok(Redirect::to("/login").into_response());
    }

    let conn = state.db.get()?;
    let post = posts::find_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("No post found with this id".into()))?;

    Ok(Html(EditPostTemplate { post }).into_response())
}

async fn edit_user(State(state): State<AppState>, maybe_user: MaybeUser) -> AppResult<Response> {
    let Some(current) = maybe_user.0 else {
        return Ok(Redirect::to("/login").into_response());
    };

    let conn = state.db.get()?;
    let user = users::find_by_id(&conn, &current.id)?
        .ok_or_else(|| AppError::NotFound("No user found with this id".into()))?;

    Ok(Html(EditUserTemplate { user }).into_response())
}
