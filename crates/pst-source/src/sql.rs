//! sqlx-backed statement source.

use crate::{SourceError, StatementSource};
use async_trait::async_trait;
use pst_engine::Snapshot;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Column, Executor, Row};

/// Postgres implementation of [`StatementSource`].
///
/// Contract with the query file: every projected column must be text
/// (the feed renders currency server-side with grouping separators, so
/// the engine sees exactly what the report should show), and `$1` is
/// the lower-bound statement date.
pub struct SqlSource {
    pool: PgPool,
}

impl SqlSource {
    /// Connect to the statements database.
    ///
    /// A single connection is plenty: the job runs one query per day.
    pub async fn connect(database_url: &str) -> Result<SqlSource, SourceError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .map_err(|e| SourceError::Connect(e.to_string()))?;
        Ok(SqlSource { pool })
    }
}

#[async_trait]
impl StatementSource for SqlSource {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn fetch(&self, query: &str, since: &str) -> Result<Snapshot, SourceError> {
        // Describe first so the header is correct even for a result set
        // with zero rows (a quiet day still writes a valid snapshot).
        let described = self
            .pool
            .describe(query)
            .await
            .map_err(|e| SourceError::Query(e.to_string()))?;
        let header: Vec<String> = described
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let fetched = sqlx::query(query)
            .bind(since)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SourceError::Query(e.to_string()))?;

        let mut rows = Vec::with_capacity(fetched.len());
        for (idx, row) in fetched.iter().enumerate() {
            let mut fields = Vec::with_capacity(header.len());
            for (col_idx, column) in row.columns().iter().enumerate() {
                let value: Option<String> =
                    row.try_get(col_idx).map_err(|_| SourceError::Decode {
                        row: idx + 1,
                        column: column.name().to_string(),
                    })?;
                fields.push(value.unwrap_or_default());
            }
            rows.push(fields);
        }

        Ok(Snapshot::new(header, rows))
    }
}
