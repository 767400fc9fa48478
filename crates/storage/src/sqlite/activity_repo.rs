use assess_core::model::{ActivityKind, ActivityRecord};
use async_trait::async_trait;
use sqlx::Row;

use super::{SqliteRepository, conn, ser};
use crate::repository::{ActivityRepository, StorageError};

fn map_activity_row(row: &sqlx::sqlite::SqliteRow) -> Result<ActivityRecord, StorageError> {
    let kind: String = row.try_get("kind").map_err(ser)?;
    let score: i64 = row.try_get("score").map_err(ser)?;
    let score = u8::try_from(score)
        .map_err(|_| StorageError::Serialization(format!("invalid score: {score}")))?;
    Ok(ActivityRecord::new(
        ActivityKind::parse(&kind),
        row.try_get::<String, _>("language").map_err(ser)?,
        score,
        row.try_get("recorded_at").map_err(ser)?,
    ))
}

#[async_trait]
impl ActivityRepository for SqliteRepository {
    async fn append_activity(&self, record: &ActivityRecord) -> Result<i64, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO activity_log (kind, language, score, recorded_at)
                VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(record.kind.as_str())
        .bind(&record.language)
        .bind(i64::from(record.score))
        .bind(record.timestamp)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(res.last_insert_rowid())
    }

    async fn list_recent_activities(&self, limit: u32) -> Result<Vec<ActivityRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT kind, language, score, recorded_at
                FROM activity_log
                ORDER BY recorded_at DESC, id DESC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows.iter().rev() {
            out.push(map_activity_row(row)?);
        }
        Ok(out)
    }
}
