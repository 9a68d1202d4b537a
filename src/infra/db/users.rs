use async_trait::async_trait;
use sqlx::QueryBuilder;
use time::OffsetDateTime;

use super::{SqliteRepositories, util::map_sqlx_error};
use crate::application::repos::{RepoError, UsersRepo};
use crate::domain::entities::UserRecord;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password_digest: String,
    created_at: OffsetDateTime,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            password_digest: row.password_digest,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UsersRepo for SqliteRepositories {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password_digest, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(UserRecord::from))
    }

    async fn list_by_ids(&self, ids: &[i64]) -> Result<Vec<UserRecord>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::new(
            "SELECT id, name, email, password_digest, created_at FROM users WHERE id IN (",
        );
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let rows = qb
            .build_query_as::<UserRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(UserRecord::from).collect())
    }
}
