use super::map_sqlx;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::user::{DirectoryEntry, Role, UserDirectory};
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

#[derive(Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DirectoryRow {
    id: String,
    role: String,
    email: Option<String>,
    display_name: Option<String>,
}

impl TryFrom<DirectoryRow> for DirectoryEntry {
    type Error = DomainError;

    fn try_from(row: DirectoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            uid: row.id,
            role: row.role.parse::<Role>()?,
            email: row.email,
            display_name: row.display_name,
        })
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_by_uid(&self, uid: &str) -> DomainResult<Option<DirectoryEntry>> {
        let row = sqlx::query_as::<_, DirectoryRow>(
            "SELECT id, role, email, display_name FROM users WHERE id = $1",
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(DirectoryEntry::try_from).transpose()
    }
}
