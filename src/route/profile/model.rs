use schemars::JsonSchema;
use serde::Serialize;

use crate::route::post;

/// The public face of an author.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Author {
	pub username: String,
	pub first_name: String,
	pub last_name: String,
	pub posts_count: i64,
}

/// An author's profile page.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ProfilePage {
	pub author: Author,
	/// Whether the viewer follows this author. Always `false` for
	/// anonymous visitors.
	pub following: bool,
	pub posts: Vec<post::model::PostView>,
}
