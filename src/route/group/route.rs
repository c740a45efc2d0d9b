use aide::transform::TransformOperation;
use axum::extract::{Path, State};

use crate::{
	extract::{Json, Query},
	openapi::tag,
	route::post,
	Database,
};

use super::{model, Error, RouteError};

pub fn get_group_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Group page")
		.description("Returns a group and a paginated listing of its posts, newest first.")
		.tag(tag::GROUP)
}

/// Returns a group and its posts, newest first.
pub async fn get_group(
	State(database): State<Database>,
	Path(slug): Path<String>,
	Query(paginate): Query<post::model::Paginate>,
) -> Result<Json<model::GroupPage>, RouteError> {
	let group = sqlx::query_as::<_, model::Group>(r#"SELECT * FROM "group" WHERE slug = $1"#)
		.bind(&slug)
		.fetch_optional(&database)
		.await?
		.ok_or_else(|| Error::UnknownGroup(slug))?;

	let posts = sqlx::query_as::<_, post::model::PostView>(&format!(
		"{} WHERE p.group_id = $1 ORDER BY p.created_at DESC LIMIT $2 OFFSET $3",
		post::model::POST_VIEW,
	))
	.bind(group.id)
	.bind(paginate.limit())
	.bind(paginate.offset())
	.fetch_all(&database)
	.await?;

	Ok(Json(model::GroupPage { group, posts }))
}
