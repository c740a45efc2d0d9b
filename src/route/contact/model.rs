use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A stored contact-form submission.
#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Contact {
	pub id: Uuid,
	pub name: String,
	pub email: String,
	pub subject: String,
	pub body: String,
	pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct ContactInput {
	#[validate(length(min = 1, max = 128))]
	pub name: String,
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 1, max = 256))]
	pub subject: String,
	#[validate(length(min = 1, max = 8192))]
	pub body: String,
}
