use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use rusqlite::params;

use crate::error::AppError;
use crate::state::AppState;

/// The currently authenticated user, resolved from the session cookie.
/// Carries the session token so logout can destroy the right session.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub session_token: String,
}

/// The auth gate for API routes: rejects with 401 unless the cookie
/// resolves to a logged-in session whose user still exists. Read-only;
/// never touches session state.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = cookie_value(parts, &state.config.auth.cookie_name)
            .ok_or(AppError::Unauthorized)?
            .to_string();

        let conn = state.db.get()?;
        // Joining against users drops sessions whose user has since been
        // deleted: a dangling session is treated as unauthenticated.
        conn.query_row(
            "SELECT u.id, u.username FROM sessions s \
             JOIN users u ON u.id = s.user_id \
             WHERE s.token = ?1 AND s.logged_in = 1",
            params![token],
            |row| {
                Ok(CurrentUser {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    session_token: token.clone(),
                })
            },
        )
        .map_err(|_| AppError::Unauthorized)
    }
}

/// Optional variant for page routes: yields None instead of 401 so the
/// handler can render the anonymous view or redirect to the login form.
pub struct MaybeUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(MaybeUser(Some(user))),
            Err(_) => Ok(MaybeUser(None)),
        }
    }
}

fn cookie_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == name {
                Some(val)
            } else {
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_cookie(value: &str) -> Parts {
        let (parts, _) = Request::builder()
            .header(header::COOKIE, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn cookie_value_finds_named_cookie() {
        let parts = parts_with_cookie("other=1; ramble_session=abc123; more=2");
        assert_eq!(cookie_value(&parts, "ramble_session"), Some("abc123"));
    }

    #[test]
    fn cookie_value_missing_is_none() {
        let parts = parts_with_cookie("other=1");
        assert_eq!(cookie_value(&parts, "ramble_session"), None);
    }
}
