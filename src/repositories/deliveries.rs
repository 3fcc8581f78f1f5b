// src/repositories/deliveries.rs

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;
use crate::error::ApiResult;
use crate::models::{DeliveryRequest, DeliveryRow};
use crate::reference::{next_reference, ReferenceKind};
use super::lines::{replace_lines, LineTable};
use super::{search_operations, CrudRepository, OperationFilter};

pub struct DeliveryRepository;

impl DeliveryRepository {
    pub async fn search(&self, pool: &SqlitePool, filter: &OperationFilter) -> ApiResult<Vec<DeliveryRow>> {
        search_operations(pool, self.table_name(), filter).await
    }

    /// Inserts the document and its line items in one transaction. A
    /// `reference` that is already taken fails on the unique index.
    pub(crate) async fn insert_with_reference(
        &self,
        pool: &SqlitePool,
        reference: &str,
        data: &DeliveryRequest,
    ) -> ApiResult<DeliveryRow> {
        let mut tx = pool.begin().await?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO deliveries (
                id, reference, from_warehouse_id, to_party, contact, scheduled_date, status,
                delivery_address, responsible_person, operation_type, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(reference)
        .bind(&data.from)
        .bind(data.to_party())
        .bind(&data.contact)
        .bind(data.scheduled_date)
        .bind(data.status)
        .bind(&data.delivery_address)
        .bind(&data.responsible_person)
        .bind(&data.operation_type)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        replace_lines(&mut *tx, LineTable::Delivery, &id, &data.products).await?;

        let created: DeliveryRow = sqlx::query_as("SELECT * FROM deliveries WHERE id = ?")
            .bind(&id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }
}

#[async_trait]
impl CrudRepository<DeliveryRow, DeliveryRequest> for DeliveryRepository {
    fn table_name(&self) -> &'static str {
        "deliveries"
    }

    async fn create(&self, pool: &SqlitePool, data: &DeliveryRequest) -> ApiResult<DeliveryRow> {
        let reference = {
            let mut conn = pool.acquire().await?;
            next_reference(&mut conn, ReferenceKind::Delivery).await?
        };

        self.insert_with_reference(pool, &reference, data).await
    }

    async fn update(
        &self,
        pool: &SqlitePool,
        id: &str,
        data: &DeliveryRequest,
    ) -> ApiResult<Option<DeliveryRow>> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE deliveries
            SET from_warehouse_id = ?, to_party = ?, contact = ?, scheduled_date = ?, status = ?,
                delivery_address = ?, responsible_person = ?, operation_type = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&data.from)
        .bind(data.to_party())
        .bind(&data.contact)
        .bind(data.scheduled_date)
        .bind(data.status)
        .bind(&data.delivery_address)
        .bind(&data.responsible_person)
        .bind(&data.operation_type)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        replace_lines(&mut *tx, LineTable::Delivery, id, &data.products).await?;

        let updated: DeliveryRow = sqlx::query_as("SELECT * FROM deliveries WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }
}
