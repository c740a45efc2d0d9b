pub mod auth;
pub mod contact;
pub mod docs;
pub mod follow;
pub mod group;
pub mod model;
pub mod post;
pub mod profile;

use axum::{
	http::{header, StatusCode},
	response::{IntoResponse, Response},
};

use crate::error::{ErrorResponse, Message};

/// A `302 Found` redirect, the status the login and follow flows use.
pub fn found(location: &str) -> Response {
	(
		StatusCode::FOUND,
		[(header::LOCATION, location.to_owned())],
	)
		.into_response()
}

/// Fallback for paths no route matches.
pub async fn not_found() -> Response {
	(
		StatusCode::NOT_FOUND,
		axum::Json(ErrorResponse {
			success: false,
			errors: vec![Message {
				content: "page not found".into(),
				field: None,
				details: None,
			}],
		}),
	)
		.into_response()
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_unknown_path_is_404(pool: Database) {
		let app = app(pool);

		let response = app.get("/unexist_page/").await;

		assert_eq!(response.status_code(), 404);
	}
}
