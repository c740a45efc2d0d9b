use std::borrow::Cow;

use axum::{
	body::Body,
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use axum_jsonschema::JsonSchemaRejection;
use schemars::JsonSchema;
use serde::Serialize;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single error message presented to the client.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'e> {
	pub content: Cow<'e, str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'e, str>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Cow<'e, Map>>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse<'e> {
	pub success: bool,
	pub errors: Vec<Message<'e>>,
}

/// Maps a route-specific error onto a status code and client messages.
///
/// The [`std::fmt::Display`] output is logged rather than sent, so it may
/// contain details the client should not see; [`ErrorShape::errors`] is what
/// goes over the wire.
pub trait ErrorShape: std::error::Error + 'static {
	fn status(&self) -> StatusCode;
	fn errors(&self) -> Vec<Message<'_>>;

	fn into_response(&self) -> Response<Body> {
		(
			self.status(),
			Json(ErrorResponse {
				success: false,
				errors: self.errors(),
			}),
		)
			.into_response()
	}
}

impl ErrorShape for std::convert::Infallible {
	fn status(&self) -> StatusCode {
		match *self {}
	}

	fn errors(&self) -> Vec<Message<'_>> {
		match *self {}
	}
}

/// An error produced outside of route logic: extraction, validation or
/// serialization of request and response bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error")]
	Validation(validator::ValidationErrors),
	#[error("json body rejected")]
	Json(JsonSchemaRejection),
	#[error("query error: {0}")]
	Query(#[from] axum::extract::rejection::QueryRejection),
	#[error("serialization error: {0}")]
	Serialize(#[from] serde_json::Error),
}

impl From<validator::ValidationErrors> for AppError {
	fn from(errors: validator::ValidationErrors) -> Self {
		Self::Validation(errors)
	}
}

impl From<JsonSchemaRejection> for AppError {
	fn from(rejection: JsonSchemaRejection) -> Self {
		Self::Json(rejection)
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::Validation(errors) => (
				StatusCode::BAD_REQUEST,
				Json(ErrorResponse {
					success: false,
					errors: errors
						.field_errors()
						.into_iter()
						.flat_map(|(field, errors)| {
							errors.iter().map(move |error| Message {
								content: error
									.message
									.clone()
									.unwrap_or_else(|| error.code.clone()),
								field: Some(field.into()),
								details: None,
							})
						})
						.collect(),
				}),
			)
				.into_response(),
			Self::Json(rejection) => {
				let content = match rejection {
					JsonSchemaRejection::Json(..) => "invalid json body",
					JsonSchemaRejection::Serde(..) => "malformed json body",
					JsonSchemaRejection::Schema(..) => "json body does not match the schema",
				};

				(
					StatusCode::BAD_REQUEST,
					Json(ErrorResponse {
						success: false,
						errors: vec![Message {
							content: content.into(),
							field: None,
							details: None,
						}],
					}),
				)
					.into_response()
			}
			Self::Query(rejection) => (
				StatusCode::BAD_REQUEST,
				Json(ErrorResponse {
					success: false,
					errors: vec![Message {
						content: rejection.to_string().into(),
						field: None,
						details: None,
					}],
				}),
			)
				.into_response(),
			Self::Serialize(error) => {
				tracing::error!(%error, "failed to serialize response body");

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

impl aide::OperationOutput for AppError {
	type Inner = ErrorResponse<'static>;
}

/// Error type for route handlers: the route's own error, an extraction
/// error, or a database failure.
#[derive(Debug, thiserror::Error)]
pub enum RouteError<E>
where
	E: ErrorShape,
{
	#[error(transparent)]
	Route(E),
	#[error(transparent)]
	App(#[from] AppError),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

impl<E: ErrorShape> From<E> for RouteError<E> {
	fn from(error: E) -> Self {
		Self::Route(error)
	}
}

impl<E: ErrorShape> IntoResponse for RouteError<E> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::Route(error) => error.into_response(),
			Self::App(error) => error.into_response(),
			Self::Database(error) => {
				tracing::error!(%error, "database error");

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

impl<E: ErrorShape> aide::OperationOutput for RouteError<E> {
	type Inner = ErrorResponse<'static>;
}
