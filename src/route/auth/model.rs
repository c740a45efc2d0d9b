use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

fn validate_username(username: &str) -> Result<(), ValidationError> {
	if username
		.chars()
		.any(|c| !c.is_alphanumeric() && !matches!(c, '_' | '-' | '.'))
	{
		return Err(ValidationError::new(
			"username must be alphanumeric, `_`, `-` or `.`",
		));
	}

	Ok(())
}

/// A single user.
#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
pub struct User {
	/// The unique identifier of the user.
	pub id: Uuid,
	/// The user's primary email address, used for logging in.
	#[serde(skip_serializing)]
	pub email: String,
	/// argon2, salted with `id`.
	#[serde(skip_serializing)]
	pub password: Vec<u8>,
	/// The username that is displayed to the public.
	pub username: String,
	pub first_name: String,
	pub last_name: String,
	/// The creation time of the user.
	pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Session {
	/// The session id.
	#[serde(rename = "session_id")]
	pub id: Uuid,
	/// The user that owns the session.
	#[serde(skip)]
	pub user_id: Uuid,
	/// The creation time of the session.
	pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct SignupInput {
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 8, max = 128))]
	pub password: String,
	/// The username that is displayed to the public.
	#[validate(length(min = 3, max = 32), custom(function = "validate_username"))]
	pub username: String,
	#[validate(length(max = 64))]
	#[serde(default)]
	pub first_name: String,
	#[validate(length(max = 64))]
	#[serde(default)]
	pub last_name: String,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct LoginInput {
	#[validate(length(min = 1))]
	pub username: String,
	#[validate(length(min = 8, max = 128))]
	pub password: String,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct NextInput {
	/// Where to send the browser after a successful login.
	pub next: Option<String>,
}

/// Payload backing the login form.
#[derive(Debug, Serialize, JsonSchema)]
pub struct LoginForm {
	pub fields: &'static [&'static str],
	#[serde(skip_serializing_if = "Option::is_none")]
	pub next: Option<String>,
}
