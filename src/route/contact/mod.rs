use aide::axum::{routing::post_with, ApiRouter};

use crate::{error, AppState};

pub mod model;
pub mod route;

/// Contact submissions have no failure modes of their own; everything that
/// can go wrong is validation or the database.
pub type RouteError = error::RouteError<std::convert::Infallible>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route("/contact/", post_with(submit, submit_docs))
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_contact_submission_is_stored(pool: Database) {
		let app = app(pool.clone());

		let response = app
			.post("/contact/")
			.json(&json!({
				"name": "John Smith",
				"email": "john@smith.com",
				"subject": "Hello",
				"body": "Just saying hi.",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contact")
			.fetch_one(&pool)
			.await
			.unwrap();

		assert_eq!(count, 1);
	}

	#[sqlx::test]
	async fn test_contact_rejects_invalid_email(pool: Database) {
		let app = app(pool);

		let response = app
			.post("/contact/")
			.json(&json!({
				"name": "John Smith",
				"email": "not-an-email",
				"subject": "Hello",
				"body": "Just saying hi.",
			}))
			.await;

		assert_eq!(response.status_code(), 400);
	}
}
