// src/repositories/receipts.rs

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;
use crate::error::ApiResult;
use crate::models::{ReceiptRequest, ReceiptRow};
use crate::reference::{next_reference, ReferenceKind};
use super::lines::{replace_lines, LineTable};
use super::{search_operations, CrudRepository, OperationFilter};

pub struct ReceiptRepository;

impl ReceiptRepository {
    pub async fn search(&self, pool: &SqlitePool, filter: &OperationFilter) -> ApiResult<Vec<ReceiptRow>> {
        search_operations(pool, self.table_name(), filter).await
    }

    /// Inserts the document and its line items in one transaction. A
    /// `reference` that is already taken fails on the unique index.
    pub(crate) async fn insert_with_reference(
        &self,
        pool: &SqlitePool,
        reference: &str,
        data: &ReceiptRequest,
    ) -> ApiResult<ReceiptRow> {
        let mut tx = pool.begin().await?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO receipts (
                id, reference, from_party, to_warehouse_id, contact, scheduled_date,
                status, source_doc, responsible_person, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(reference)
        .bind(data.from_party())
        .bind(&data.to)
        .bind(&data.contact)
        .bind(data.scheduled_date)
        .bind(data.status)
        .bind(&data.source_doc)
        .bind(&data.responsible_person)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        replace_lines(&mut *tx, LineTable::Receipt, &id, &data.products).await?;

        let created: ReceiptRow = sqlx::query_as("SELECT * FROM receipts WHERE id = ?")
            .bind(&id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }
}

#[async_trait]
impl CrudRepository<ReceiptRow, ReceiptRequest> for ReceiptRepository {
    fn table_name(&self) -> &'static str {
        "receipts"
    }

    /// Assigns the next `WH/IN/NNNNN` reference. A reference that is already
    /// taken fails the insert on the unique index.
    async fn create(&self, pool: &SqlitePool, data: &ReceiptRequest) -> ApiResult<ReceiptRow> {
        let reference = {
            let mut conn = pool.acquire().await?;
            next_reference(&mut conn, ReferenceKind::Receipt).await?
        };

        self.insert_with_reference(pool, &reference, data).await
    }

    /// Replaces every field and all line items; the reference is kept.
    async fn update(
        &self,
        pool: &SqlitePool,
        id: &str,
        data: &ReceiptRequest,
    ) -> ApiResult<Option<ReceiptRow>> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE receipts
            SET from_party = ?, to_warehouse_id = ?, contact = ?, scheduled_date = ?,
                status = ?, source_doc = ?, responsible_person = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(data.from_party())
        .bind(&data.to)
        .bind(&data.contact)
        .bind(data.scheduled_date)
        .bind(data.status)
        .bind(&data.source_doc)
        .bind(&data.responsible_person)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        replace_lines(&mut *tx, LineTable::Receipt, id, &data.products).await?;

        let updated: ReceiptRow = sqlx::query_as("SELECT * FROM receipts WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, ResponseError};
    use tempfile::TempDir;
    use crate::db::test_file_pool;
    use crate::error::ApiError;

    fn request(contact: &str) -> ReceiptRequest {
        serde_json::from_value(serde_json::json!({ "contact": contact, "scheduledDate": "2024-05-01" })).unwrap()
    }

    #[actix_rt::test]
    async fn test_racing_creates_collide_on_the_unique_index() {
        let dir = TempDir::new().unwrap();
        let pool = test_file_pool(dir.path(), 2).await;

        // The slower request reads the count first and keeps its connection.
        let mut slow = pool.acquire().await.unwrap();
        let reference = next_reference(&mut slow, ReferenceKind::Receipt).await.unwrap();
        assert_eq!(reference, "WH/IN/00001");

        let winner = ReceiptRepository.create(&pool, &request("Fast")).await.unwrap();
        assert_eq!(winner.reference, "WH/IN/00001");

        let err = ReceiptRepository
            .insert_with_reference(&pool, &reference, &request("Slow"))
            .await
            .unwrap_err();
        drop(slow);

        assert!(matches!(err, ApiError::BadRequest(_)), "unexpected error: {:?}", err);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("Duplicate key"));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM receipts")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
