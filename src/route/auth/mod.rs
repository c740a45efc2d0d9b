use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

/// An error that can occur during authentication.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid username or password")]
	InvalidUsernameOrPassword,
	#[error("password validation error")]
	Argon(#[from] argon2::Error),
	#[error("username already taken")]
	UsernameTaken,
	#[error("email already taken")]
	EmailTaken,
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/signup/", post_with(signup, signup_docs))
		.api_route(
			"/login/",
			get_with(login_form, login_form_docs).post_with(login, login_docs),
		)
		.api_route("/logout/", get_with(logout, logout_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::InvalidUsernameOrPassword => StatusCode::UNAUTHORIZED,
			Self::Argon(..) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::UsernameTaken | Self::EmailTaken => StatusCode::CONFLICT,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		vec![error::Message {
			content: self.to_string().into(),
			field: None,
			details: None,
		}]
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_signup_flow(pool: Database) {
		let app = app(pool);

		let response = app
			.post("/auth/signup/")
			.json(&json!({
				"email": "john@smith.com",
				"username": "john",
				"password": "hunter2hunter",
				"first_name": "John",
				"last_name": "Smith",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		assert!(response
			.header("set-cookie")
			.to_str()
			.unwrap()
			.contains("session="));

		let response = app
			.post("/auth/login/")
			.json(&json!({
				"username": "john",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		assert!(response
			.header("set-cookie")
			.to_str()
			.unwrap()
			.contains("session="));

		// The session cookie now opens protected pages.
		let response = app.get("/create/").await;

		assert_eq!(response.status_code(), 200);
	}

	#[sqlx::test]
	async fn test_login_with_wrong_password(pool: Database) {
		let app = app(pool.clone());

		signup(&app, "john").await;

		let response = app
			.post("/auth/login/")
			.json(&json!({
				"username": "john",
				"password": "not-the-password",
			}))
			.await;

		assert_eq!(response.status_code(), 401);
	}

	#[sqlx::test]
	async fn test_signup_with_taken_username(pool: Database) {
		let app = app(pool);

		signup(&app, "john").await;

		let response = app
			.post("/auth/signup/")
			.json(&json!({
				"email": "john@elsewhere.com",
				"username": "john",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 409);
	}

	#[sqlx::test]
	async fn test_login_redirects_to_next(pool: Database) {
		let app = app(pool);

		signup(&app, "john").await;

		let response = app
			.post("/auth/login/")
			.add_query_param("next", "/create/")
			.json(&json!({
				"username": "john",
				"password": "correct-horse",
			}))
			.await;

		assert_eq!(response.status_code(), 302);
		assert_eq!(response.header("location").to_str().unwrap(), "/create/");
	}

	#[sqlx::test]
	async fn test_logout_clears_session(pool: Database) {
		let app = app(pool);

		signup(&app, "john").await;

		let response = app.get("/auth/logout/").await;

		assert_eq!(response.status_code(), 204);

		// Back to anonymous: protected pages bounce to the login form.
		let response = app.get("/create/").await;

		assert_eq!(response.status_code(), 302);
	}
}
