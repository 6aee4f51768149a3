use rusqlite::{params, Connection, OptionalExtension};

use crate::db::models::{CommentDetail, PostDetail, PostSummary};

#[derive(Debug, Default)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub post_text: Option<String>,
}

/// Home feed: every post, most recent first, with its author and comments.
/// The id tiebreak keeps ordering stable when timestamps collide (v7 ids
/// sort by creation time).
pub fn feed(conn: &Connection) -> Result<Vec<PostDetail>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.title, p.post_text, p.created_at, u.username
         FROM posts p JOIN users u ON u.id = p.user_id
         ORDER BY p.created_at DESC, p.id DESC",
    )?;
    let posts: Vec<(PostSummary, String)> = stmt
        .query_map([], |row| {
            Ok((
                PostSummary {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    post_text: row.get(2)?,
                    created_at: row.get(3)?,
                },
                row.get(4)?,
            ))
        })?
        .collect::<Result<_, _>>()?;

    posts
        .into_iter()
        .map(|(post, username)| {
            let comments = comments_for_post(conn, &post.id)?;
            Ok(PostDetail {
                id: post.id,
                title: post.title,
                post_text: post.post_text,
                created_at: post.created_at,
                username,
                comments,
            })
        })
        .collect()
}

/// The posts belonging to one user, for the dashboard.
pub fn list_for_user(conn: &Connection, user_id: &str) -> Result<Vec<PostDetail>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.title, p.post_text, p.created_at, u.username
         FROM posts p JOIN users u ON u.id = p.user_id
         WHERE p.user_id = ?1
         ORDER BY p.created_at DESC, p.id DESC",
    )?;
    let posts: Vec<(PostSummary, String)> = stmt
        .query_map(params![user_id], |row| {
            Ok((
                PostSummary {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    post_text: row.get(2)?,
                    created_at: row.get(3)?,
                },
                row.get(4)?,
            ))
        })?
        .collect::<Result<_, _>>()?;

    posts
        .into_iter()
        .map(|(post, username)| {
            let comments = comments_for_post(conn, &post.id)?;
            Ok(PostDetail {
                id: post.id,
                title: post.title,
                post_text: post.post_text,
                created_at: post.created_at,
                username,
                comments,
            })
        })
        .collect()
}

pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<PostDetail>, rusqlite::Error> {
    let post = conn
        .query_row(
            "SELECT p.id, p.title, p.post_text, p.created_at, u.username
             FROM posts p JOIN users u ON u.id = p.user_id
             WHERE p.id = ?1",
            params![id],
            |row| {
                Ok((
                    PostSummary {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        post_text: row.get(2)?,
                        created_at: row.get(3)?,
                    },
                    row.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?;

    let Some((post, username)) = post else {
        return Ok(None);
    };

    let comments = comments_for_post(conn, &post.id)?;
    Ok(Some(PostDetail {
        id: post.id,
        title: post.title,
        post_text: post.post_text,
        created_at: post.created_at,
        username,
        comments,
    }))
}

pub fn create(
    conn: &Connection,
    user_id: &str,
    title: &str,
    post_text: &str,
) -> Result<PostSummary, rusqlite::Error> {
    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO posts (id, user_id, title, post_text) VALUES (?1, ?2, ?3, ?4)",
        params![id, user_id, title, post_text],
    )?;

    conn.query_row(
        "SELECT id, title, post_text, created_at FROM posts WHERE id = ?1",
        params![id],
        |row| {
            Ok(PostSummary {
                id: row.get(0)?,
                title: row.get(1)?,
                post_text: row.get(2)?,
                created_at: row.get(3)?,
            })
        },
    )
}

pub fn update(conn: &Connection, id: &str, update: &PostUpdate) -> Result<usize, rusqlite::Error> {
    conn.execute(
        "UPDATE posts SET
            title = COALESCE(?2, title),
            post_text = COALESCE(?3, post_text)
         WHERE id = ?1",
        params![id, update.title, update.post_text],
    )
}

pub fn delete(conn: &Connection, id: &str) -> Result<usize, rusqlite::Error> {
    conn.execute("DELETE FROM posts WHERE id = ?1", params![id])
}

fn comments_for_post(conn: &Connection, post_id: &str) -> Result<Vec<CommentDetail>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.comment_text, c.post_id, c.user_id, u.username, c.created_at
         FROM comments c JOIN users u ON u.id = c.user_id
         WHERE c.post_id = ?1
         ORDER BY c.created_at, c.id",
    )?;
    let rows = stmt.query_map(params![post_id], |row| {
        Ok(CommentDetail {
            id: row.get(0)?,
            comment_text: row.get(1)?,
            post_id: row.get(2)?,
            user_id: row.get(3)?,
            username: row.get(4)?,
            created_at: row.get(5)?,
        })
    })?;
    rows.collect()
}
