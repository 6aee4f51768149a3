use serde::Serialize;

/// Projection of a user row for list responses. There is deliberately no
/// password field on any serialized user type.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

/// Single-user detail: the summary plus the user's posts and the comments
/// they have left (each comment carrying the title of the post it is on).
#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
    pub posts: Vec<PostSummary>,
    pub comments: Vec<CommentWithPost>,
}

/// Internal-only row used by the login flow. Never serialized.
#[derive(Debug, Clone)]
pub struct UserAuth {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub post_text: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub id: String,
    pub title: String,
    pub post_text: String,
    pub created_at: String,
    pub username: String,
    pub comments: Vec<CommentDetail>,
}

/// A bare comment row, as returned by the comment list endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: String,
    pub comment_text: String,
    pub post_id: String,
    pub user_id: String,
    pub created_at: String,
}

/// A comment with its author's username, for post views.
#[derive(Debug, Clone, Serialize)]
pub struct CommentDetail {
    pub id: String,
    pub comment_text: String,
    pub post_id: String,
    pub user_id: String,
    pub username: String,
    pub created_at: String,
}

/// A comment with the title of the post it belongs to, for user detail.
#[derive(Debug, Clone, Serialize)]
pub struct CommentWithPost {
    pub id: String,
    pub comment_text: String,
    pub post_id: String,
    pub user_id: String,
    pub created_at: String,
    pub post_title: String,
}
