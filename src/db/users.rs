use rusqlite::{params, Connection, OptionalExtension};

use crate::db::models::{CommentWithPost, PostSummary, UserAuth, UserDetail, UserSummary};

/// Fields a client is allowed to change on a user. Anything else in the
/// request body is ignored. `password` arrives pre-hashed from the handler.
#[derive(Debug, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

pub fn list(conn: &Connection) -> Result<Vec<UserSummary>, rusqlite::Error> {
    let mut stmt =
        conn.prepare("SELECT id, username, email, created_at FROM users ORDER BY username")?;
    let rows = stmt.query_map([], |row| {
        Ok(UserSummary {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            created_at: row.get(3)?,
        })
    })?;
    rows.collect()
}

pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<UserDetail>, rusqlite::Error> {
    let user = conn
        .query_row(
            "SELECT id, username, email, created_at FROM users WHERE id = ?1",
            params![id],
            |row| {
                Ok(UserSummary {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    email: row.get(2)?,
                    created_at: row.get(3)?,
                })
            },
        )
        .optional()?;

    let Some(user) = user else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(
        "SELECT id, title, post_text, created_at FROM posts WHERE user_id = ?1",
    )?;
    let posts: Vec<PostSummary> = stmt
        .query_map(params![id], |row| {
            Ok(PostSummary {
                id: row.get(0)?,
                title: row.get(1)?,
                post_text: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?
        .collect::<Result<_, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT c.id, c.comment_text, c.post_id, c.user_id, c.created_at, p.title
         FROM comments c JOIN posts p ON p.id = c.post_id
         WHERE c.user_id = ?1",
    )?;
    let comments: Vec<CommentWithPost> = stmt
        .query_map(params![id], |row| {
            Ok(CommentWithPost {
                id: row.get(0)?,
                comment_text: row.get(1)?,
                post_id: row.get(2)?,
                user_id: row.get(3)?,
                created_at: row.get(4)?,
                post_title: row.get(5)?,
            })
        })?
        .collect::<Result<_, _>>()?;

    Ok(Some(UserDetail {
        id: user.id,
        username: user.username,
        email: user.email,
        created_at: user.created_at,
        posts,
        comments,
    }))
}

pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<UserAuth>, rusqlite::Error> {
    conn.query_row(
        "SELECT id, username, email, password_hash, created_at FROM users WHERE email = ?1",
        params![email],
        |row| {
            Ok(UserAuth {
                id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                password_hash: row.get(3)?,
                created_at: row.get(4)?,
            })
        },
    )
    .optional()
}

pub fn create(
    conn: &Connection,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<UserSummary, rusqlite::Error> {
    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO users (id, username, email, password_hash) VALUES (?1, ?2, ?3, ?4)",
        params![id, username, email, password_hash],
    )?;

    conn.query_row(
        "SELECT id, username, email, created_at FROM users WHERE id = ?1",
        params![id],
        |row| {
            Ok(UserSummary {
                id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                created_at: row.get(3)?,
            })
        },
    )
}

/// Applies only the allowlisted fields; absent fields keep their value.
/// Returns the number of rows changed (zero means no such user).
pub fn update(conn: &Connection, id: &str, update: &UserUpdate) -> Result<usize, rusqlite::Error> {
    conn.execute(
        "UPDATE users SET
            username = COALESCE(?2, username),
            email = COALESCE(?3, email),
            password_hash = COALESCE(?4, password_hash)
         WHERE id = ?1",
        params![id, update.username, update.email, update.password_hash],
    )
}

pub fn delete(conn: &Connection, id: &str) -> Result<usize, rusqlite::Error> {
    conn.execute("DELETE FROM users WHERE id = ?1", params![id])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{comments, posts, test_pool};

    #[test]
    fn create_then_list_returns_user() {
        let pool = test_pool();
        let conn = pool.get().unwrap();

        let created = create(&conn, "alice", "alice@example.com", "hash").unwrap();
        let all = list(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, created.id);
        assert_eq!(all[0].username, "alice");
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let pool = test_pool();
        let conn = pool.get().unwrap();

        create(&conn, "alice", "alice@example.com", "hash").unwrap();
        let err = create(&conn, "alice", "other@example.com", "hash");
        assert!(err.is_err());
    }

    #[test]
    fn find_by_id_includes_posts_and_comments() {
        let pool = test_pool();
        let conn = pool.get().unwrap();

        let user = create(&conn, "alice", "alice@example.com", "hash").unwrap();
        let post = posts::create(&conn, &user.id, "First post", "hello world").unwrap();
        comments::create(&conn, &post.id, &user.id, "nice one").unwrap();

        let detail = find_by_id(&conn, &user.id).unwrap().unwrap();
        assert_eq!(detail.posts.len(), 1);
        assert_eq!(detail.posts[0].title, "First post");
        assert_eq!(detail.comments.len(), 1);
        assert_eq!(detail.comments[0].post_title, "First post");
    }

    #[test]
    fn find_by_id_missing_returns_none() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        assert!(find_by_id(&conn, "nope").unwrap().is_none());
    }

    #[test]
    fn find_by_email_returns_hash_for_login() {
        let pool = test_pool();
        let conn = pool.get().unwrap();

        create(&conn, "alice", "alice@example.com", "the-hash").unwrap();
        let auth = find_by_email(&conn, "alice@example.com").unwrap().unwrap();
        assert_eq!(auth.password_hash, "the-hash");
        assert!(find_by_email(&conn, "bob@example.com").unwrap().is_none());
    }

    #[test]
    fn update_applies_only_present_fields() {
        let pool = test_pool();
        let conn = pool.get().unwrap();

        let user = create(&conn, "alice", "alice@example.com", "hash").unwrap();
        let changed = update(
            &conn,
            &user.id,
            &UserUpdate {
                email: Some("new@example.com".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(changed, 1);

        let auth = find_by_email(&conn, "new@example.com").unwrap().unwrap();
        assert_eq!(auth.username, "alice");
        assert_eq!(auth.password_hash, "hash");
    }

    #[test]
    fn update_missing_user_changes_zero_rows() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let changed = update(
            &conn,
            "nope",
            &UserUpdate {
                username: Some("ghost".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(changed, 0);
    }

    #[test]
    fn delete_cascades_to_posts_and_comments() {
        let pool = test_pool();
        let conn = pool.get().unwrap();

        let user = create(&conn, "alice", "alice@example.com", "hash").unwrap();
        let post = posts::create(&conn, &user.id, "t", "b").unwrap();
        comments::create(&conn, &post.id, &user.id, "c").unwrap();

        assert_eq!(delete(&conn, &user.id).unwrap(), 1);
        let post_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM posts", [], |r| r.get(0))
            .unwrap();
        let comment_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM comments", [], |r| r.get(0))
            .unwrap();
        assert_eq!(post_count, 0);
        assert_eq!(comment_count, 0);
    }

    #[test]
    fn delete_missing_user_changes_zero_rows() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        assert_eq!(delete(&conn, "nope").unwrap(), 0);
    }
}
