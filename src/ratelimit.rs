use std::{sync::Arc, time::Duration};

use axum::{
	body::Body,
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use governor::{
	clock::QuantaInstant,
	middleware::{RateLimitingMiddleware, StateInformationMiddleware},
};
use tower_governor::{
	governor::{GovernorConfig, GovernorConfigBuilder},
	key_extractor::{KeyExtractor, PeerIpKeyExtractor},
	GovernorError,
};

use crate::error::{ErrorResponse, Message};

/// Shared per-ip limiter for the whole router.
pub fn default() -> Arc<GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>> {
	Arc::new(
		GovernorConfigBuilder::default()
			.per_second(10)
			.burst_size(50)
			.use_headers()
			.error_handler(error_handler)
			.finish()
			.unwrap(),
	)
}

fn error_handler(error: GovernorError) -> Response<Body> {
	let (status, content) = match error {
		GovernorError::TooManyRequests { .. } => {
			(StatusCode::TOO_MANY_REQUESTS, "too many requests".to_owned())
		}
		GovernorError::UnableToExtractKey => (
			StatusCode::INTERNAL_SERVER_ERROR,
			"unable to identify client".to_owned(),
		),
		GovernorError::Other { code, msg, .. } => {
			(code, msg.unwrap_or_else(|| "rate limit error".to_owned()))
		}
	};

	(
		status,
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

/// Periodically drops limiter state for clients that have not been seen
/// recently, bounding the keyed storage.
pub fn cleanup_old_limits<T, M>(configs: &[&Arc<GovernorConfig<T, M>>])
where
	T: KeyExtractor,
	<T as KeyExtractor>::Key: Send + Sync + 'static,
	M: RateLimitingMiddleware<QuantaInstant> + Send + Sync + 'static,
{
	let limiters = configs
		.iter()
		.map(|config| config.limiter().clone())
		.collect::<Vec<_>>();
	let interval = Duration::from_secs(60);

	std::thread::spawn(move || loop {
		std::thread::sleep(interval);

		for limiter in &limiters {
			tracing::debug!("rate limiting storage size: {}", limiter.len());

			limiter.retain_recent();
		}
	});
}
