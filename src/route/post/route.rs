use aide::transform::TransformOperation;
use axum::{
	extract::{Path, State},
	http::header,
	response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
	error::AppError,
	extract::{Json, Query, Session},
	openapi::tag,
	route::group,
	AppState, Database,
};

use super::{model, Error, RouteError};

fn json_body(body: String) -> Response {
	([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

pub fn index_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Index")
		.description(
			"Returns a paginated listing of all posts, newest first. \
			The rendered page is cached for a short period, so very recent posts may be missing.",
		)
		.tag(tag::POST)
}

/// Returns a paginated listing of all posts, newest first.
///
/// The serialized body is cached under the page identity and served verbatim
/// until the entry expires, so two requests within the window are
/// byte-identical even if posts were created in between.
pub async fn index(
	State(state): State<AppState>,
	Query(paginate): Query<model::Paginate>,
) -> Result<Response, RouteError> {
	let key = format!("index:page={}:size={}", paginate.page, paginate.size);

	if let Some(body) = state.cache.get(&key) {
		return Ok(json_body(body));
	}

	let posts = sqlx::query_as::<_, model::PostView>(&format!(
		"{} ORDER BY p.created_at DESC LIMIT $1 OFFSET $2",
		model::POST_VIEW,
	))
	.bind(paginate.limit())
	.bind(paginate.offset())
	.fetch_all(&state.database)
	.await?;

	let body = serde_json::to_string(&posts).map_err(AppError::from)?;

	state.cache.put(key, body.clone());

	Ok(json_body(body))
}

pub fn get_post_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Get single post")
		.description("Returns a single post by its unique id, along with its comments.")
		.tag(tag::POST)
}

/// Returns a single post by its unique id, along with its comments.
pub async fn get_post(
	State(database): State<Database>,
	Path(post_id): Path<Uuid>,
) -> Result<Json<model::PostDetail>, RouteError> {
	let post = sqlx::query_as::<_, model::PostView>(&format!(
		"{} WHERE p.id = $1",
		model::POST_VIEW,
	))
	.bind(post_id)
	.fetch_optional(&database)
	.await?
	.ok_or(Error::UnknownPost(post_id))?;

	let comments = sqlx::query_as::<_, model::Comment>(
		r#"
			SELECT c.id, c.post_id, u.username AS author, c.text, c.created_at
			FROM comment c
			JOIN "user" u ON u.id = c.author_id
			WHERE c.post_id = $1
			ORDER BY c.created_at
		"#,
	)
	.bind(post_id)
	.fetch_all(&database)
	.await?;

	Ok(Json(model::PostDetail { post, comments }))
}

pub fn create_form_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Post creation form")
		.description("Returns the data backing the post creation form: the available groups.")
		.tag(tag::POST)
}

/// Returns the data backing the post creation form.
pub async fn create_form(
	State(database): State<Database>,
	_session: Session,
) -> Result<Json<model::PostForm>, RouteError> {
	let groups =
		sqlx::query_as::<_, group::model::Group>(r#"SELECT * FROM "group" ORDER BY title"#)
			.fetch_all(&database)
			.await?;

	Ok(Json(model::PostForm { groups, post: None }))
}

pub fn create_post_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Create post")
		.description("Creates a new post authored by the logged-in user.")
		.tag(tag::POST)
}

/// Creates a new post.
pub async fn create_post(
	State(database): State<Database>,
	session: Session,
	Json(input): Json<model::CreatePostInput>,
) -> Result<Json<model::Post>, RouteError> {
	let post = sqlx::query_as::<_, model::Post>(
		r#"
			INSERT INTO post (author_id, group_id, text, image)
			VALUES ($1, $2, $3, $4)
			RETURNING *
		"#,
	)
	.bind(session.user.id)
	.bind(input.group_id)
	.bind(&input.text)
	.bind(&input.image)
	.fetch_one(&database)
	.await
	.map_err(|e| match e {
		sqlx::Error::Database(ref d) if d.constraint() == Some("post_group_id_fkey") => {
			input.group_id.map_or_else(|| RouteError::from(e), |group| Error::UnknownGroup(group).into())
		}
		e => RouteError::from(e),
	})?;

	Ok(Json(post))
}

pub fn edit_form_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Post edit form")
		.description(
			"Returns the data backing the edit form for a post. \
			Anyone but the author is sent back to the post's detail page.",
		)
		.tag(tag::POST)
}

/// Returns the data backing the edit form for a post.
pub async fn edit_form(
	State(database): State<Database>,
	session: Session,
	Path(post_id): Path<Uuid>,
) -> Result<Response, RouteError> {
	let post = sqlx::query_as::<_, model::Post>("SELECT * FROM post WHERE id = $1")
		.bind(post_id)
		.fetch_optional(&database)
		.await?
		.ok_or(Error::UnknownPost(post_id))?;

	if post.author_id != session.user.id {
		return Ok(crate::route::found(&format!("/posts/{post_id}/")));
	}

	let groups =
		sqlx::query_as::<_, group::model::Group>(r#"SELECT * FROM "group" ORDER BY title"#)
			.fetch_all(&database)
			.await?;

	Ok(Json(model::PostForm {
		groups,
		post: Some(post),
	})
	.into_response())
}

pub fn update_post_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Update post")
		.description(
			"Updates an existing post. \
			Anyone but the author is sent back to the post's detail page.",
		)
		.tag(tag::POST)
}

/// Updates an existing post by its unique id.
pub async fn update_post(
	State(database): State<Database>,
	session: Session,
	Path(post_id): Path<Uuid>,
	Json(input): Json<model::UpdatePostInput>,
) -> Result<Response, RouteError> {
	let post = sqlx::query_as::<_, model::Post>("SELECT * FROM post WHERE id = $1")
		.bind(post_id)
		.fetch_optional(&database)
		.await?
		.ok_or(Error::UnknownPost(post_id))?;

	if post.author_id != session.user.id {
		return Ok(crate::route::found(&format!("/posts/{post_id}/")));
	}

	let post = sqlx::query_as::<_, model::Post>(
		r#"
			UPDATE post
			SET text = COALESCE($1, text),
				group_id = COALESCE($2, group_id),
				image = COALESCE($3, image)
			WHERE id = $4
			RETURNING *
		"#,
	)
	.bind(&input.text)
	.bind(input.group_id)
	.bind(&input.image)
	.bind(post_id)
	.fetch_one(&database)
	.await?;

	Ok(Json(post).into_response())
}

pub fn add_comment_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Add comment")
		.description("Adds a comment to a post as the logged-in user.")
		.tag(tag::POST)
}

/// Adds a comment to a post.
pub async fn add_comment(
	State(database): State<Database>,
	session: Session,
	Path(post_id): Path<Uuid>,
	Json(input): Json<model::CreateCommentInput>,
) -> Result<Json<model::Comment>, RouteError> {
	let (id, created_at) = sqlx::query_as::<_, (Uuid, chrono::DateTime<chrono::Utc>)>(
		"INSERT INTO comment (post_id, author_id, text) VALUES ($1, $2, $3) RETURNING id, created_at",
	)
	.bind(post_id)
	.bind(session.user.id)
	.bind(&input.text)
	.fetch_one(&database)
	.await
	.map_err(|e| match e {
		sqlx::Error::Database(ref d) if d.constraint() == Some("comment_post_id_fkey") => {
			Error::UnknownPost(post_id).into()
		}
		e => RouteError::from(e),
	})?;

	Ok(Json(model::Comment {
		id,
		post_id,
		author: session.user.username,
		text: input.text,
		created_at,
	}))
}
