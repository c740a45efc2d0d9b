use aide::transform::TransformOperation;
use axum::{
	extract::{Path, State},
	response::Response,
};
use uuid::Uuid;

use crate::{
	extract::{Json, Query, Session},
	openapi::tag,
	route::post,
	Database,
};

use super::{graph, Error, RouteError};

async fn author_id(database: &Database, username: &str) -> sqlx::Result<Option<Uuid>> {
	sqlx::query_scalar::<_, Uuid>(r#"SELECT id FROM "user" WHERE username = $1"#)
		.bind(username)
		.fetch_optional(database)
		.await
}

pub fn feed_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Personalized feed")
		.description(
			"Returns a paginated listing of posts by authors the logged-in user \
			follows, newest first.",
		)
		.tag(tag::FOLLOW)
}

/// Returns posts by authors the logged-in user follows, newest first.
pub async fn feed(
	State(database): State<Database>,
	session: Session,
	Query(paginate): Query<post::model::Paginate>,
) -> Result<Json<Vec<post::model::PostView>>, RouteError> {
	let posts = sqlx::query_as::<_, post::model::PostView>(&format!(
		"{} WHERE p.author_id IN (SELECT author_id FROM follow WHERE user_id = $1) \
		ORDER BY p.created_at DESC LIMIT $2 OFFSET $3",
		post::model::POST_VIEW,
	))
	.bind(session.user.id)
	.bind(paginate.limit())
	.bind(paginate.offset())
	.fetch_all(&database)
	.await?;

	Ok(Json(posts))
}

pub fn follow_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Follow author")
		.description(
			"Starts following the author and returns to their profile. \
			Following yourself, or someone you already follow, changes nothing.",
		)
		.tag(tag::FOLLOW)
}

/// Starts following the author, then returns to their profile.
pub async fn follow(
	State(database): State<Database>,
	session: Session,
	Path(username): Path<String>,
) -> Result<Response, RouteError> {
	let author = author_id(&database, &username)
		.await?
		.ok_or_else(|| Error::UnknownUser(username.clone()))?;

	if graph::follow(&database, session.user.id, author).await? {
		tracing::debug!(follower = %session.user.username, author = %username, "new follow");
	}

	Ok(crate::route::found(&format!("/profile/{username}/")))
}

pub fn unfollow_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Unfollow author")
		.description(
			"Stops following the author and returns to their profile. \
			Unfollowing someone you don't follow changes nothing.",
		)
		.tag(tag::FOLLOW)
}

/// Stops following the author, then returns to their profile.
pub async fn unfollow(
	State(database): State<Database>,
	session: Session,
	Path(username): Path<String>,
) -> Result<Response, RouteError> {
	let author = author_id(&database, &username)
		.await?
		.ok_or_else(|| Error::UnknownUser(username.clone()))?;

	if graph::unfollow(&database, session.user.id, author).await? {
		tracing::debug!(follower = %session.user.username, author = %username, "unfollowed");
	}

	Ok(crate::route::found(&format!("/profile/{username}/")))
}
