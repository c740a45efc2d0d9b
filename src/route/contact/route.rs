use aide::transform::TransformOperation;
use axum::extract::State;

use crate::{extract::Json, openapi::tag, Database};

use super::{model, RouteError};

pub fn submit_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Contact the site")
		.description("Stores a contact-form submission. Nobody is notified; the record is kept.")
		.tag(tag::CONTACT)
}

/// Stores a contact-form submission.
pub async fn submit(
	State(database): State<Database>,
	Json(input): Json<model::ContactInput>,
) -> Result<Json<model::Contact>, RouteError> {
	let contact = sqlx::query_as::<_, model::Contact>(
		r#"
			INSERT INTO contact (name, email, subject, body)
			VALUES ($1, $2, $3, $4)
			RETURNING *
		"#,
	)
	.bind(&input.name)
	.bind(&input.email)
	.bind(&input.subject)
	.bind(&input.body)
	.fetch_one(&database)
	.await?;

	Ok(Json(contact))
}
