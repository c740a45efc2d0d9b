use schemars::JsonSchema;
use serde::Serialize;
use uuid::Uuid;

use crate::route::post;

/// A group posts can be filed under.
#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Group {
	pub id: Uuid,
	pub title: String,
	/// The unique slug the group's page lives under.
	pub slug: String,
	pub description: String,
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A group together with its posts.
#[derive(Debug, Serialize, JsonSchema)]
pub struct GroupPage {
	pub group: Group,
	pub posts: Vec<post::model::PostView>,
}
