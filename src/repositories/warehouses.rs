// src/repositories/warehouses.rs

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;
use crate::error::ApiResult;
use crate::models::{Warehouse, WarehouseRequest};
use super::CrudRepository;

pub struct WarehouseRepository;

#[async_trait]
impl CrudRepository<Warehouse, WarehouseRequest> for WarehouseRepository {
    fn table_name(&self) -> &'static str {
        "warehouses"
    }

    async fn create(&self, pool: &SqlitePool, data: &WarehouseRequest) -> ApiResult<Warehouse> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO warehouses (id, name, short_code, address, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&data.name)
        .bind(&data.short_code)
        .bind(&data.address)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        let created: Warehouse = sqlx::query_as("SELECT * FROM warehouses WHERE id = ?")
            .bind(&id)
            .fetch_one(pool)
            .await?;

        Ok(created)
    }

    async fn update(
        &self,
        pool: &SqlitePool,
        id: &str,
        data: &WarehouseRequest,
    ) -> ApiResult<Option<Warehouse>> {
        let result = sqlx::query(
            r#"
            UPDATE warehouses
            SET name = ?, short_code = ?, address = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&data.name)
        .bind(&data.short_code)
        .bind(&data.address)
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
