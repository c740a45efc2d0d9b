use aide::transform::TransformOperation;
use axum::extract::{Path, State};

use crate::{
	extract::{Json, Query, Session},
	openapi::tag,
	route::{auth, follow, post},
	Database,
};

use super::{model, Error, RouteError};

pub fn get_profile_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Author profile")
		.description(
			"Returns an author, a paginated listing of their posts, and whether \
			the viewer follows them.",
		)
		.tag(tag::PROFILE)
}

/// Returns an author's profile page.
pub async fn get_profile(
	State(database): State<Database>,
	viewer: Option<Session>,
	Path(username): Path<String>,
	Query(paginate): Query<post::model::Paginate>,
) -> Result<Json<model::ProfilePage>, RouteError> {
	let user = sqlx::query_as::<_, auth::model::User>(
		r#"SELECT * FROM "user" WHERE username = $1"#,
	)
	.bind(&username)
	.fetch_optional(&database)
	.await?
	.ok_or_else(|| Error::UnknownUser(username))?;

	let posts = sqlx::query_as::<_, post::model::PostView>(&format!(
		"{} WHERE p.author_id = $1 ORDER BY p.created_at DESC LIMIT $2 OFFSET $3",
		post::model::POST_VIEW,
	))
	.bind(user.id)
	.bind(paginate.limit())
	.bind(paginate.offset())
	.fetch_all(&database)
	.await?;

	let posts_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM post WHERE author_id = $1")
		.bind(user.id)
		.fetch_one(&database)
		.await?;

	let following = match viewer {
		Some(viewer) => follow::graph::is_following(&database, viewer.user.id, user.id).await?,
		None => false,
	};

	Ok(Json(model::ProfilePage {
		author: model::Author {
			username: user.username,
			first_name: user.first_name,
			last_name: user.last_name,
			posts_count,
		},
		following,
		posts,
	}))
}
