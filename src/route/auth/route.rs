use aide::transform::TransformOperation;
use argon2::Argon2;
use axum::{
	extract::State,
	http::{header, StatusCode},
	response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
	extract::{Json, Query, Session},
	openapi::tag,
	session, AppState, Database,
};

use super::{model, Error, RouteError};

pub const KEY_LENGTH: usize = 32;

/// Hashes a password with Argon2, using the user's id as a salt.
/// Since this is only used for logging in and creating a new password,
/// the scope of this function can remain in here with no issues.
fn hash_password(
	hasher: &Argon2,
	password: &str,
	id: &Uuid,
) -> Result<[u8; KEY_LENGTH], argon2::Error> {
	let mut hash = [0; KEY_LENGTH];

	hasher.hash_password_into(password.as_bytes(), id.as_bytes(), &mut hash)?;
	Ok(hash)
}

/// Only same-site paths are safe redirect targets.
fn is_local(next: &str) -> bool {
	next.starts_with('/') && !next.starts_with("//")
}

pub fn signup_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Register account")
		.description("Registers a new account, returning an associated session cookie.")
		.tag(tag::AUTH)
}

/// Registers a new account, returning an associated session cookie.
pub async fn signup(
	State(state): State<AppState>,
	Json(auth): Json<model::SignupInput>,
) -> Result<Response, RouteError> {
	let user_id = Uuid::new_v4();
	let hashed = hash_password(&state.hasher, &auth.password, &user_id).map_err(Error::Argon)?;

	let mut tx = state.database.begin().await?;

	sqlx::query(
		r#"
			INSERT INTO "user" (id, email, username, password, first_name, last_name)
			VALUES ($1, $2, $3, $4, $5, $6)
		"#,
	)
	.bind(user_id)
	.bind(&auth.email)
	.bind(&auth.username)
	.bind(&hashed[..])
	.bind(&auth.first_name)
	.bind(&auth.last_name)
	.execute(&mut *tx)
	.await
	.map_err(|e| match e {
		sqlx::Error::Database(ref d) => match d.constraint() {
			Some("user_email_key") => Error::EmailTaken.into(),
			Some("user_username_key") => Error::UsernameTaken.into(),
			_ => RouteError::from(e),
		},
		e => RouteError::from(e),
	})?;

	let session = sqlx::query_as::<_, model::Session>(
		"INSERT INTO session (user_id) VALUES ($1) RETURNING *",
	)
	.bind(user_id)
	.fetch_one(&mut *tx)
	.await?;

	tx.commit().await?;

	let cookie = session::create_cookie(session.id);

	Ok(([(header::SET_COOKIE, cookie.to_string())], Json(session)).into_response())
}

pub fn login_form_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Login form")
		.description("Returns the fields the login form expects, echoing back the `next` target.")
		.tag(tag::AUTH)
}

/// Returns the login form payload. Anonymous visitors bounced off a
/// protected page land here with `?next=` set to where they came from.
pub async fn login_form(Query(query): Query<model::NextInput>) -> Json<model::LoginForm> {
	Json(model::LoginForm {
		fields: &["username", "password"],
		next: query.next.filter(|next| is_local(next)),
	})
}

pub fn login_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Log in")
		.description(
			"Logs in to an account, returning an associated session cookie. \
			When `?next=` names a local path, responds with a redirect to it instead.",
		)
		.tag(tag::AUTH)
}

/// Logs in to an account, returning an associated session cookie.
pub async fn login(
	State(state): State<AppState>,
	Query(query): Query<model::NextInput>,
	Json(auth): Json<model::LoginInput>,
) -> Result<Response, RouteError> {
	let user = sqlx::query_as::<_, model::User>(r#"SELECT * FROM "user" WHERE username = $1"#)
		.bind(&auth.username)
		.fetch_optional(&state.database)
		.await?;

	let Some(user) = user else {
		return Err(Error::InvalidUsernameOrPassword.into());
	};

	let hashed = hash_password(&state.hasher, &auth.password, &user.id).map_err(Error::Argon)?;

	if user.password != hashed {
		return Err(Error::InvalidUsernameOrPassword.into());
	}

	let session = sqlx::query_as::<_, model::Session>(
		"INSERT INTO session (user_id) VALUES ($1) RETURNING *",
	)
	.bind(user.id)
	.fetch_one(&state.database)
	.await?;

	let cookie = session::create_cookie(session.id);

	// Send the browser back to where it was bounced from, if anywhere.
	let body = match query.next.as_deref().filter(|next| is_local(next)) {
		Some(next) => crate::route::found(next),
		None => Json(session).into_response(),
	};

	Ok(([(header::SET_COOKIE, cookie.to_string())], body).into_response())
}

pub fn logout_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Log out")
		.description("Logs out of the authenticated account and clears the session cookie.")
		.tag(tag::AUTH)
}

/// Logs out of the authenticated account.
pub async fn logout(
	State(database): State<Database>,
	session: Session,
) -> Result<Response, RouteError> {
	sqlx::query("DELETE FROM session WHERE id = $1")
		.bind(session.id)
		.execute(&database)
		.await?;

	// Clear the session cookie
	Ok((
		[(header::SET_COOKIE, session::clear_cookie().to_string())],
		StatusCode::NO_CONTENT,
	)
		.into_response())
}
