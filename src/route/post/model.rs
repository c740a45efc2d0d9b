pub use crate::route::model::Paginate;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::route::group;

/// Columns selected for a [`PostView`], shared by every listing query.
pub(crate) const POST_VIEW: &str = r#"
	SELECT p.id, p.text, u.username AS author, g.slug AS "group", p.image,
		(SELECT COUNT(*) FROM comment c WHERE c.post_id = p.id) AS comment_count,
		p.created_at
	FROM post p
	JOIN "user" u ON u.id = p.author_id
	LEFT JOIN "group" g ON g.id = p.group_id
"#;

/// A single post, created by a user.
#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Post {
	/// The unique identifier of the post.
	pub id: Uuid,
	/// The user that created the post.
	pub author_id: Uuid,
	/// The group the post is filed under, if any.
	pub group_id: Option<Uuid>,
	/// The text of the post.
	pub text: String,
	/// Path to the post's image, if any.
	pub image: Option<String>,
	/// The creation time of the post.
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A post as shown on listing and detail pages.
#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
pub struct PostView {
	pub id: Uuid,
	pub text: String,
	/// The author's username.
	pub author: String,
	/// Slug of the group the post is filed under, if any.
	pub group: Option<String>,
	pub image: Option<String>,
	pub comment_count: i64,
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A comment on a post.
#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Comment {
	pub id: Uuid,
	pub post_id: Uuid,
	/// The comment author's username.
	pub author: String,
	pub text: String,
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Everything the post detail page shows.
#[derive(Debug, Serialize, JsonSchema)]
pub struct PostDetail {
	pub post: PostView,
	pub comments: Vec<Comment>,
}

/// Data backing the post creation and edit form.
#[derive(Debug, Serialize, JsonSchema)]
pub struct PostForm {
	/// Groups the post can be filed under.
	pub groups: Vec<group::model::Group>,
	/// The post being edited; absent when creating a new one.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub post: Option<Post>,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct CreatePostInput {
	/// The text of the post.
	#[validate(length(min = 1, max = 4096))]
	pub text: String,
	/// The group the post is filed under.
	pub group_id: Option<Uuid>,
	/// Path to the post's image.
	#[validate(length(max = 512))]
	pub image: Option<String>,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct UpdatePostInput {
	#[validate(length(min = 1, max = 4096))]
	pub text: Option<String>,
	pub group_id: Option<Uuid>,
	#[validate(length(max = 512))]
	pub image: Option<String>,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct CreateCommentInput {
	/// The text of the comment.
	#[validate(length(min = 1, max = 2048))]
	pub text: String,
}
