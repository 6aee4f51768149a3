use rand::Rng;
use rusqlite::{params, OptionalExtension};

use crate::error::AppResult;
use crate::state::DbPool;

/// What a session token resolves to: who is acting, and whether the
/// session is still live. This is the authoritative source of the current
/// actor for every gated request.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub user_id: String,
    pub username: String,
    pub logged_in: bool,
}

/// Establish an authenticated session for a user. Returns the opaque
/// token the client carries in its cookie.
pub fn create(pool: &DbPool, user_id: &str, username: &str) -> AppResult<String> {
    let conn = pool.get()?;
    let token = generate_token();

    conn.execute(
        "INSERT INTO sessions (token, user_id, username, logged_in) VALUES (?1, ?2, ?3, 1)",
        params![token, user_id, username],
    )?;

    Ok(token)
}

/// Look up a session by token. Read-only: the gate must never mutate
/// session state.
pub fn get(pool: &DbPool, token: &str) -> AppResult<Option<SessionData>> {
    let conn = pool.get()?;
    let session = conn
        .query_row(
            "SELECT user_id, username, logged_in FROM sessions WHERE token = ?1",
            params![token],
            |row| {
                Ok(SessionData {
                    user_id: row.get(0)?,
                    username: row.get(1)?,
                    logged_in: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(session)
}

/// Destroy a session at logout. Returns whether a session existed.
pub fn destroy(pool: &DbPool, token: &str) -> AppResult<bool> {
    let conn = pool.get()?;
    let deleted = conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
    Ok(deleted > 0)
}

/// Cryptographically random 32-byte hex token.
fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{test_pool, users};

    #[test]
    fn generate_token_is_64_hex_chars() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generate_token_is_unique() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn create_get_destroy_round_trip() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let user = users::create(&conn, "alice", "alice@example.com", "hash").unwrap();
        drop(conn);

        let token = create(&pool, &user.id, &user.username).unwrap();
        let session = get(&pool, &token).unwrap().unwrap();
        assert_eq!(session.user_id, user.id);
        assert_eq!(session.username, "alice");
        assert!(session.logged_in);

        assert!(destroy(&pool, &token).unwrap());
        assert!(get(&pool, &token).unwrap().is_none());
        assert!(!destroy(&pool, &token).unwrap());
    }

    #[test]
    fn get_unknown_token_is_none() {
        let pool = test_pool();
        assert!(get(&pool, "deadbeef").unwrap().is_none());
    }
}
