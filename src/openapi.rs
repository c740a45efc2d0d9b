use std::borrow::Cow;

use aide::{
	openapi::{ApiKeyLocation, SecurityScheme, Tag},
	transform::TransformOpenApi,
};

use crate::{error, extract::Json, session};

pub const SECURITY_SCHEME_SESSION: &str = "Session";

pub mod tag {
	pub const AUTH: &str = "Auth";
	pub const POST: &str = "Post";
	pub const GROUP: &str = "Group";
	pub const PROFILE: &str = "Profile";
	pub const FOLLOW: &str = "Follow";
	pub const CONTACT: &str = "Contact";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Yatube Open API")
		.summary("A blog-style social network")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::AUTH.into(),
			description: Some("Registration and sessions".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::POST.into(),
			description: Some("Posts and comments".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::GROUP.into(),
			description: Some("Group pages".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::PROFILE.into(),
			description: Some("Author profiles".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::FOLLOW.into(),
			description: Some("The follow graph and the personalized feed".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::CONTACT.into(),
			description: Some("Contact form submissions".into()),
			..Default::default()
		})
		.security_scheme(
			SECURITY_SCHEME_SESSION,
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Cookie,
				name: session::COOKIE_NAME.into(),
				description: Some("A user session cookie".into()),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<error::Message>, _>(|res| {
			res.example(error::Message {
				content: "error message".into(),
				field: Some("optional field".into()),
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("key".into(), serde_json::json!("value"));
					map
				})),
			})
		})
}
