// src/repositories/stocks.rs

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;
use crate::error::ApiResult;
use crate::models::{Stock, StockRequest};
use super::CrudRepository;

pub struct StockRepository;

#[async_trait]
impl CrudRepository<Stock, StockRequest> for StockRepository {
    fn table_name(&self) -> &'static str {
        "stocks"
    }

    async fn create(&self, pool: &SqlitePool, data: &StockRequest) -> ApiResult<Stock> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO stocks (id, product, per_unit_cost, on_hand, free_to_use, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&data.product)
        .bind(data.per_unit_cost)
        .bind(data.on_hand)
        .bind(data.free_to_use)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        let created: Stock = sqlx::query_as("SELECT * FROM stocks WHERE id = ?")
            .bind(&id)
            .fetch_one(pool)
            .await?;

        Ok(created)
    }

    /// Writes the submitted quantities verbatim; nothing is derived.
    async fn update(
        &self,
        pool: &SqlitePool,
        id: &str,
        data: &StockRequest,
    ) -> ApiResult<Option<Stock>> {
        let result = sqlx::query(
            r#"
            UPDATE stocks
            SET product = ?, per_unit_cost = ?, on_hand = ?, free_to_use = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&data.product)
        .bind(data.per_unit_cost)
        .bind(data.on_hand)
        .bind(data.free_to_use)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(pool, id).await
    }
}
