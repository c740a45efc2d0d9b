use aide::OperationInput;
use axum::{
	body::Body,
	extract::{FromRef, FromRequestParts},
	http::{header, request, Response, StatusCode},
	response::IntoResponse,
	Json,
};
use uuid::Uuid;

use crate::{
	error::ErrorResponse,
	openapi::SECURITY_SCHEME_SESSION,
	route::auth,
	session, Database,
};

/// Extracts the session and related user from the request.
///
/// Anonymous visitors are not rejected with a `401`: they are bounced to the
/// login page with the originally requested path in `?next=`, so they land
/// back where they started once logged in.
///
/// ```rust
/// async fn route(session: Session) {
///   println!("{:?}", session.user);
/// }
/// ```
#[derive(Debug)]
pub struct Session {
	pub id: Uuid,
	pub user: auth::model::User,
}

/// Why a session could not be extracted.
///
/// A missing, unparseable or stale cookie all collapse into
/// [`SessionRejection::Unauthenticated`]; the visitor is treated as anonymous
/// rather than shown an error.
#[derive(Debug, thiserror::Error)]
pub enum SessionRejection {
	#[error("not authenticated")]
	Unauthenticated { next: String },
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

impl IntoResponse for SessionRejection {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::Unauthenticated { next } => {
				crate::route::found(&format!("/auth/login/?next={next}"))
			}
			Self::Database(error) => {
				tracing::error!(%error, "failed to load session");

				(
					StatusCode::INTERNAL_SERVER_ERROR,
					Json(ErrorResponse {
						success: false,
						errors: Vec::new(),
					}),
				)
					.into_response()
			}
		}
	}
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	Database: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = SessionRejection;

	/// Extracts the session from the request using the session cookie.
	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let unauthenticated = SessionRejection::Unauthenticated {
			next: parts.uri.path().to_owned(),
		};

		let cookies = parts
			.headers
			.get_all(header::COOKIE)
			.into_iter()
			.filter_map(|value| value.to_str().ok());

		let Some(session_id) = cookies
			.flat_map(cookie::Cookie::split_parse)
			.filter_map(Result::ok)
			.find(|cookie| cookie.name() == session::COOKIE_NAME)
		else {
			return Err(unauthenticated);
		};

		let Ok(session_id) = Uuid::parse_str(session_id.value()) else {
			return Err(unauthenticated);
		};

		let database = Database::from_ref(state);
		let user = sqlx::query_as::<_, auth::model::User>(
			r#"SELECT * FROM "user" WHERE id = (SELECT user_id FROM session WHERE id = $1)"#,
		)
		.bind(session_id)
		.fetch_optional(&database)
		.await?;

		let Some(user) = user else {
			return Err(unauthenticated);
		};

		Ok(Session {
			id: session_id,
			user,
		})
	}
}

impl OperationInput for Session {
	/// Operation input for the session extractor.
	///
	/// This adds a session cookie requirement to the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.extend([[
			(SECURITY_SCHEME_SESSION.to_string(), Vec::new()),
		]
		.into_iter()
		.collect()]);
	}
}
