use rusqlite::{params, Connection};

use crate::db::models::Comment;

pub fn list(conn: &Connection) -> Result<Vec<Comment>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT id, comment_text, post_id, user_id, created_at FROM comments",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Comment {
            id: row.get(0)?,
            comment_text: row.get(1)?,
            post_id: row.get(2)?,
            user_id: row.get(3)?,
            created_at: row.get(4)?,
        })
    })?;
    rows.collect()
}

/// `user_id` is always the session's user, never client input.
pub fn create(
    conn: &Connection,
    post_id: &str,
    user_id: &str,
    comment_text: &str,
) -> Result<Comment, rusqlite::Error> {
    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO comments (id, post_id, user_id, comment_text) VALUES (?1, ?2, ?3, ?4)",
        params![id, post_id, user_id, comment_text],
    )?;

    conn.query_row(
        "SELECT id, comment_text, post_id, user_id, created_at FROM comments WHERE id = ?1",
        params![id],
        |row| {
            Ok(Comment {
                id: row.get(0)?,
                comment_text: row.get(1)?,
                post_id: row.get(2)?,
                user_id: row.get(3)?,
                created_at: row.get(4)?,
            })
        },
    )
}

pub fn delete(conn: &Connection, id: &str) -> Result<usize, rusqlite::Error> {
    conn.execute("DELETE FROM comments WHERE id = ?1", params![id])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{posts, test_pool, users};

    #[test]
    fn create_and_list_round_trip() {
        let pool = test_pool();
        let conn = pool.get().unwrap();

        let user = users::create(&conn, "alice", "alice@example.com", "hash").unwrap();
        let post = posts::create(&conn, &user.id, "t", "b").unwrap();

        let comment = create(&conn, &post.id, &user.id, "hello").unwrap();
        assert_eq!(comment.user_id, user.id);
        assert_eq!(comment.post_id, post.id);

        let all = list(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].comment_text, "hello");
    }

    #[test]
    fn create_with_unknown_post_fails() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let user = users::create(&conn, "alice", "alice@example.com", "hash").unwrap();

        let result = create(&conn, "no-such-post", &user.id, "hello");
        assert!(result.is_err());
    }

    #[test]
    fn delete_missing_comment_changes_zero_rows() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        assert_eq!(delete(&conn, "nope").unwrap(), 0);
    }
}
