use std::borrow::Cow;

use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(Uuid),
	#[error("unknown group {0}")]
	UnknownGroup(Uuid),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/", get_with(index, index_docs))
		.api_route("/posts/:id/", get_with(get_post, get_post_docs))
		.api_route(
			"/create/",
			get_with(create_form, create_form_docs).post_with(create_post, create_post_docs),
		)
		.api_route(
			"/posts/:id/edit/",
			get_with(edit_form, edit_form_docs).post_with(update_post, update_post_docs),
		)
		.api_route("/posts/:id/comment/", post_with(add_comment, add_comment_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) => StatusCode::NOT_FOUND,
			Self::UnknownGroup(..) => StatusCode::BAD_REQUEST,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownPost(post) => vec![error::Message {
				content: "unknown_post".into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("post".into(), json!(post));
					map
				})),
			}],
			Self::UnknownGroup(group) => vec![error::Message {
				content: "unknown_group".into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("group".into(), json!(group));
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
	async fn test_index_lists_posts_newest_first(pool: Database) {
		let app = app(pool.clone());

		let author = user(&pool, "auth").await;
		post(&pool, author, "first", None).await;
		post(&pool, author, "second", None).await;

		let response = app.get("/").await;

		assert_eq!(response.status_code(), 200);

		let posts = response.json::<serde_json::Value>();
		let posts = posts.as_array().unwrap();

		assert_eq!(posts.len(), 2);
		assert_eq!(posts[0]["author"], "auth");
	}

	#[sqlx::test]
	async fn test_index_pagination(pool: Database) {
		let app = app(pool.clone());

		let author = user(&pool, "auth").await;

		for i in 0..13 {
			post(&pool, author, &format!("post {i}"), None).await;
		}

		let response = app.get("/").await;

		assert_eq!(
			response.json::<serde_json::Value>().as_array().unwrap().len(),
			10,
		);

		let response = app.get("/").add_query_param("page", 2).await;

		assert_eq!(
			response.json::<serde_json::Value>().as_array().unwrap().len(),
			3,
		);
	}

	#[sqlx::test]
	async fn test_index_is_cached_until_cleared(pool: Database) {
		let state = state(pool.clone());
		let app = server(state.clone());

		let author = user(&pool, "auth").await;
		post(&pool, author, "already there", None).await;

		let before = app.get("/").await.text();

		post(&pool, author, "brand new", None).await;

		// Still the cached body, byte for byte.
		let stale = app.get("/").await.text();

		assert_eq!(before, stale);

		state.cache.clear();

		let fresh = app.get("/").await.text();

		assert_ne!(stale, fresh);
		assert!(fresh.contains("brand new"));
	}

	#[sqlx::test]
	async fn test_create_requires_login(pool: Database) {
		let app = app(pool);

		let response = app.get("/create/").await;

		assert_eq!(response.status_code(), 302);
		assert_eq!(
			response.header("location").to_str().unwrap(),
			"/auth/login/?next=/create/",
		);
	}

	#[sqlx::test]
	async fn test_create_post(pool: Database) {
		let app = app(pool.clone());

		signup(&app, "auth").await;

		let cooking = group(&pool, "Cooking", "cooking").await;

		let response = app
			.post("/create/")
			.json(&json!({
				"text": "my first post",
				"group_id": cooking,
				"image": "posts/small.gif",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		let post = response.json::<serde_json::Value>();

		assert_eq!(post["text"], "my first post");
		assert_eq!(post["image"], "posts/small.gif");

		// And it shows up on its group's page.
		let response = app.get("/group/cooking/").await;
		let page = response.json::<serde_json::Value>();

		assert_eq!(page["posts"].as_array().unwrap().len(), 1);
	}

	#[sqlx::test]
	async fn test_create_post_with_unknown_group(pool: Database) {
		let app = app(pool);

		signup(&app, "auth").await;

		let response = app
			.post("/create/")
			.json(&json!({
				"text": "orphan",
				"group_id": Uuid::new_v4(),
			}))
			.await;

		assert_eq!(response.status_code(), 400);
	}

	#[sqlx::test]
	async fn test_edit_own_post(pool: Database) {
		let app = app(pool.clone());

		signup(&app, "auth").await;

		let author = user_id(&pool, "auth").await;
		let post = post(&pool, author, "draft", None).await;

		let response = app
			.post(&format!("/posts/{post}/edit/"))
			.json(&json!({ "text": "final" }))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["text"], "final");
	}

	#[sqlx::test]
	async fn test_edit_someone_elses_post_redirects(pool: Database) {
		let state = state(pool.clone());
		let intruder = server(state.clone());

		let author = user(&pool, "author").await;
		let post = post(&pool, author, "hands off", None).await;

		signup(&intruder, "intruder").await;

		let response = intruder
			.post(&format!("/posts/{post}/edit/"))
			.json(&json!({ "text": "mine now" }))
			.await;

		assert_eq!(response.status_code(), 302);
		assert_eq!(
			response.header("location").to_str().unwrap(),
			format!("/posts/{post}/"),
		);

		// Unchanged.
		let text = sqlx::query_scalar::<_, String>("SELECT text FROM post WHERE id = $1")
			.bind(post)
			.fetch_one(&pool)
			.await
			.unwrap();

		assert_eq!(text, "hands off");
	}

	#[sqlx::test]
	async fn test_post_detail_with_comments(pool: Database) {
		let app = app(pool.clone());

		signup(&app, "auth").await;

		let author = user_id(&pool, "auth").await;
		let group_id = group(&pool, "Cooking", "cooking").await;
		let post = post(&pool, author, "dinner", Some(group_id)).await;

		let response = app
			.post(&format!("/posts/{post}/comment/"))
			.json(&json!({ "text": "looks tasty" }))
			.await;

		assert_eq!(response.status_code(), 200);

		let response = app.get(&format!("/posts/{post}/")).await;

		assert_eq!(response.status_code(), 200);

		let detail = response.json::<serde_json::Value>();

		assert_eq!(detail["post"]["text"], "dinner");
		assert_eq!(detail["post"]["author"], "auth");
		assert_eq!(detail["post"]["group"], "cooking");
		assert_eq!(detail["post"]["comment_count"], 1);
		assert_eq!(detail["comments"][0]["text"], "looks tasty");
		assert_eq!(detail["comments"][0]["author"], "auth");
	}

	#[sqlx::test]
	async fn test_comment_requires_login(pool: Database) {
		let app = app(pool.clone());

		let author = user(&pool, "auth").await;
		let post = post(&pool, author, "quiet", None).await;

		let response = app
			.post(&format!("/posts/{post}/comment/"))
			.json(&json!({ "text": "anonymous noise" }))
			.await;

		assert_eq!(response.status_code(), 302);
		assert_eq!(
			response.header("location").to_str().unwrap(),
			format!("/auth/login/?next=/posts/{post}/comment/"),
		);
	}

	#[sqlx::test]
	async fn test_unknown_post_is_404(pool: Database) {
		let app = app(pool);

		let response = app.get(&format!("/posts/{}/", Uuid::new_v4())).await;

		assert_eq!(response.status_code(), 404);
	}
}
