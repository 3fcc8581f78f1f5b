// src/repositories/locations.rs

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;
use crate::error::ApiResult;
use crate::models::{LocationRequest, LocationRow};
use super::CrudRepository;

pub struct LocationRepository;

impl LocationRepository {
    /// Locations whose warehouse reference equals `warehouse_id`, whether or
    /// not that warehouse still exists.
    pub async fn list_by_warehouse(
        &self,
        pool: &SqlitePool,
        warehouse_id: &str,
    ) -> ApiResult<Vec<LocationRow>> {
        let rows: Vec<LocationRow> = sqlx::query_as(
            "SELECT * FROM locations WHERE warehouse_id = ? ORDER BY rowid ASC",
        )
        .bind(warehouse_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl CrudRepository<LocationRow, LocationRequest> for LocationRepository {
    fn table_name(&self) -> &'static str {
        "locations"
    }

    async fn create(&self, pool: &SqlitePool, data: &LocationRequest) -> ApiResult<LocationRow> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO locations (id, name, short_code, warehouse_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&data.name)
        .bind(&data.short_code)
        .bind(&data.warehouse)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        let created: LocationRow = sqlx::query_as("SELECT * FROM locations WHERE id = ?")
            .bind(&id)
            .fetch_one(pool)
            .await?;

        Ok(created)
    }

    async fn update(
        &self,
        pool: &SqlitePool,
        id: &str,
        data: &LocationRequest,
    ) -> ApiResult<Option<LocationRow>> {
        let result = sqlx::query(
            r#"
            UPDATE locations
            SET name = ?, short_code = ?, warehouse_id = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&data.name)
        .bind(&data.short_code)
        .bind(&data.warehouse)
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
