#![warn(clippy::pedantic)]

mod cache;
mod error;
mod extract;
mod openapi;
mod ratelimit;
mod route;
mod session;

use std::sync::Arc;

use aide::openapi::OpenApi;
use argon2::Argon2;
use axum::{Extension, Router};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use cache::{CacheConfig, PageCache};

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as the database connection pool, the hash configuration (expensive to
/// create per request) and the page cache.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub hasher: Argon2<'static>,
	pub cache: PageCache,
}

/// Builds the application router over the given state.
pub fn app(state: State) -> Router {
	let mut api = OpenApi::default();

	aide::axum::ApiRouter::new()
		.nest("/auth", route::auth::routes())
		.merge(route::post::routes())
		.merge(route::group::routes())
		.merge(route::profile::routes())
		.merge(route::follow::routes())
		.merge(route::contact::routes())
		.nest("/docs", route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.fallback(route::not_found)
		.layer(Extension(Arc::new(api)))
		.with_state(state)
}

#[tokio::main]
async fn main() {
	dotenvy::dotenv().ok();

	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with(tracing_subscriber::fmt::layer().with_ansi(true))
		.init();

	let state = State {
		database: Database::connect(
			&std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
		)
		.await
		.expect("failed to connect to database"),
		hasher: Argon2::default(),
		cache: PageCache::new(CacheConfig::from_env()),
	};

	sqlx::migrate!()
		.run(&state.database)
		.await
		.expect("failed to run migrations");

	let limiter = ratelimit::default();

	ratelimit::cleanup_old_limits(&[&limiter]);

	let app = app(state)
		.layer(
			tower::ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(CompressionLayer::new()),
		)
		.layer(tower_governor::GovernorLayer { config: limiter });

	let port = std::env::var("PORT").map_or_else(
		|_| 3000,
		|port| port.parse().expect("PORT must be a number"),
	);

	let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on port {}", port);

	axum::serve(
		listener,
		app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
	)
	.await
	.unwrap();
}
