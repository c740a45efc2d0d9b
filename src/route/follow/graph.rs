//! Persistence operations on the follow graph.
//!
//! Every operation is idempotent: repeating a follow or unfollow leaves the
//! graph unchanged, and a user can never follow themselves. The `follow`
//! table backs the self-follow and uniqueness invariants with CHECK and
//! UNIQUE constraints, so concurrent writers cannot slip past them either.

use uuid::Uuid;

use crate::Database;

/// Records that `user` follows `author`.
///
/// Self-follows and repeated follows are silently ignored. Returns whether a
/// new relation was inserted.
pub async fn follow(database: &Database, user: Uuid, author: Uuid) -> sqlx::Result<bool> {
	if user == author {
		return Ok(false);
	}

	let inserted = sqlx::query(
		r#"
			INSERT INTO follow (user_id, author_id)
			VALUES ($1, $2)
			ON CONFLICT (user_id, author_id) DO NOTHING
		"#,
	)
	.bind(user)
	.bind(author)
	.execute(database)
	.await?
	.rows_affected();

	Ok(inserted > 0)
}

/// Removes the relation if present. Returns whether a relation was removed.
pub async fn unfollow(database: &Database, user: Uuid, author: Uuid) -> sqlx::Result<bool> {
	let removed = sqlx::query("DELETE FROM follow WHERE user_id = $1 AND author_id = $2")
		.bind(user)
		.bind(author)
		.execute(database)
		.await?
		.rows_affected();

	Ok(removed > 0)
}

/// Whether `user` currently follows `author`.
pub async fn is_following(database: &Database, user: Uuid, author: Uuid) -> sqlx::Result<bool> {
	sqlx::query_scalar::<_, bool>(
		"SELECT EXISTS (SELECT 1 FROM follow WHERE user_id = $1 AND author_id = $2)",
	)
	.bind(user)
	.bind(author)
	.fetch_one(database)
	.await
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_follow_is_idempotent(pool: Database) {
		let follower = user(&pool, "follower").await;
		let author = user(&pool, "author").await;

		assert!(super::follow(&pool, follower, author).await.unwrap());
		assert!(!super::follow(&pool, follower, author).await.unwrap());

		assert!(super::is_following(&pool, follower, author).await.unwrap());
	}

	#[sqlx::test]
	async fn test_self_follow_is_rejected(pool: Database) {
		let narcissus = user(&pool, "narcissus").await;

		assert!(!super::follow(&pool, narcissus, narcissus).await.unwrap());
		assert!(!super::is_following(&pool, narcissus, narcissus).await.unwrap());
	}

	#[sqlx::test]
	async fn test_unfollow_is_idempotent(pool: Database) {
		let follower = user(&pool, "follower").await;
		let author = user(&pool, "author").await;

		super::follow(&pool, follower, author).await.unwrap();

		assert!(super::unfollow(&pool, follower, author).await.unwrap());
		assert!(!super::unfollow(&pool, follower, author).await.unwrap());

		assert!(!super::is_following(&pool, follower, author).await.unwrap());
	}
}
