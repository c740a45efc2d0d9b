use std::borrow::Cow;

use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;
use serde_json::json;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown group {0}")]
	UnknownGroup(String),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route("/group/:slug/", get_with(get_group, get_group_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownGroup(..) => StatusCode::NOT_FOUND,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownGroup(slug) => vec![error::Message {
				content: "unknown_group".into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("slug".into(), json!(slug));
					map
				})),
			}],
		}
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_group_page_lists_only_its_posts(pool: Database) {
		let app = app(pool.clone());

		let author = user(&pool, "auth").await;
		let cooking = group(&pool, "Cooking", "cooking").await;

		group(&pool, "Hiking", "hiking").await;

		post(&pool, author, "stew", Some(cooking)).await;
		post(&pool, author, "ungrouped", None).await;

		let response = app.get("/group/cooking/").await;

		assert_eq!(response.status_code(), 200);

		let page = response.json::<serde_json::Value>();

		assert_eq!(page["group"]["title"], "Cooking");
		assert_eq!(page["posts"].as_array().unwrap().len(), 1);
		assert_eq!(page["posts"][0]["text"], "stew");

		// The post never leaks into another group's page.
		let response = app.get("/group/hiking/").await;
		let page = response.json::<serde_json::Value>();

		assert!(page["posts"].as_array().unwrap().is_empty());
	}

	#[sqlx::test]
	async fn test_unknown_group_is_404(pool: Database) {
		let app = app(pool);

		let response = app.get("/group/nope/").await;

		assert_eq!(response.status_code(), 404);
	}
}
