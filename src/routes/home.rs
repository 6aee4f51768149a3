use askama::Template;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;

use crate::db::models::PostDetail;
use crate::db::posts;
use crate::error::{AppError, AppResult};
use crate::extractors::MaybeUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/post/{id}", get(single_post))
        .route("/login", get(login_page))
        .route("/signup", get(signup_page))
}

#[derive(Template)]
#[template(path = "homepage.html")]
pub struct HomepageTemplate {
    pub posts: Vec<PostDetail>,
    pub logged_in: bool,
}

#[derive(Template)]
#[template(path = "single_post.html")]
pub struct SinglePostTemplate {
    pub post: PostDetail,
    pub logged_in: bool,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate;

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupTemplate;

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

/// The home feed: every post, most recent first.
async fn index(State(state): State<AppState>, maybe_user: MaybeUser) -> AppResult<Response> {
    let conn = state.db.get()?;
    let posts = posts::feed(&conn)?;

    Ok(Html(HomepageTemplate {
        posts,
        logged_in: maybe_user.0.is_some(),
    })
    .into_response())
}

async fn single_post(
    State(state): State<AppState>,
    maybe_user: MaybeUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let post = posts::find_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("No post found with this id".into()))?;

    Ok(Html(SinglePostTemplate {
        post,
        logged_in: maybe_user.0.is_some(),
    })
    .into_response())
}

/// Already-authenticated visitors go back to the feed instead of the form.
async fn login_page(maybe_user: MaybeUser) -> Response {
    if maybe_user.0.is_some() {
        return Redirect::to("/").into_response();
    }
    Html(LoginTemplate).into_response()
}

async fn signup_page(maybe_user: MaybeUser) -> Response {
    if maybe_user.0.is_some() {
        return Redirect::to("/").into_response();
    }
    Html(SignupTemplate).into_response()
}
