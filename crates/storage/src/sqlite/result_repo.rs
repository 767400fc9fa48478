use assess_core::model::{NewStoredResult, ResultId, StoredResult};
use async_trait::async_trait;
use sqlx::Row;

use super::{SqliteRepository, conn, ser};
use crate::repository::{ResultRepository, StorageError};

#[async_trait]
impl ResultRepository for SqliteRepository {
    async fn save_result(&self, result: &NewStoredResult) -> Result<ResultId, StorageError> {
        let config_json = serde_json::to_string(&result.config).map_err(ser)?;
        let result_json = serde_json::to_string(&result.result).map_err(ser)?;

        let res = sqlx::query(
            r"
                INSERT INTO assessment_results (
                    language, score, config_json, result_json, completed_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(&result.config.language)
        .bind(i64::from(result.result.score()))
        .bind(config_json)
        .bind(result_json)
        .bind(result.completed_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(ResultId::new(res.last_insert_rowid()))
    }

    async fn get_result(&self, id: ResultId) -> Result<Option<StoredResult>, StorageError> {
        let Some(row) = sqlx::query(
            r"
                SELECT config_json, result_json, completed_at
                FROM assessment_results
                WHERE id = ?1
            ",
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?
        else {
            return Ok(None);
        };

        let config_json: String = row.try_get("config_json").map_err(ser)?;
        let result_json: String = row.try_get("result_json").map_err(ser)?;
        Ok(Some(StoredResult {
            id,
            config: serde_json::from_str(&config_json).map_err(ser)?,
            result: serde_json::from_str(&result_json).map_err(ser)?,
            completed_at: row.try_get("completed_at").map_err(ser)?,
        }))
    }
}
