// src/repositories/products.rs

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;
use crate::error::ApiResult;
use crate::models::{Product, ProductRequest};
use super::CrudRepository;

pub struct ProductRepository;

#[async_trait]
impl CrudRepository<Product, ProductRequest> for ProductRepository {
    fn table_name(&self) -> &'static str {
        "products"
    }

    async fn create(&self, pool: &SqlitePool, data: &ProductRequest) -> ApiResult<Product> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO products (id, name, sku, category, unit_of_measure, per_unit_cost, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&data.name)
        .bind(&data.sku)
        .bind(&data.category)
        .bind(&data.unit_of_measure)
        .bind(data.per_unit_cost)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        let created: Product = sqlx::query_as("SELECT * FROM products WHERE id = ?")
            .bind(&id)
            .fetch_one(pool)
            .await?;

        Ok(created)
    }

    async fn update(
        &self,
        pool: &SqlitePool,
        id: &str,
        data: &ProductRequest,
    ) -> ApiResult<Option<Product>> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, sku = ?, category = ?, unit_of_measure = ?, per_unit_cost = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&data.name)
        .bind(&data.sku)
        .bind(&data.category)
        .bind(&data.unit_of_measure)
        .bind(data.per_unit_cost)
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
