// src/repositories/mod.rs
//! Database access for every document type.

pub mod deliveries;
pub mod lines;
pub mod locations;
pub mod populate;
pub mod products;
pub mod receipts;
pub mod stocks;
pub mod warehouses;

pub use deliveries::DeliveryRepository;
pub use locations::LocationRepository;
pub use products::ProductRepository;
pub use receipts::ReceiptRepository;
pub use stocks::StockRepository;
pub use warehouses::WarehouseRepository;

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;
use crate::error::ApiResult;
use crate::models::OrderStatus;

/// Basic CRUD over one table. Updates take the same body as creates and
/// replace every writable column.
#[async_trait]
pub trait CrudRepository<T, Dto>: Send + Sync
where
    T: Send + Unpin + 'static + for<'r> sqlx::FromRow<'r, SqliteRow>,
    Dto: Sync + 'static,
{
    /// Table backing this repository.
    fn table_name(&self) -> &'static str;

    fn id_field(&self) -> &'static str {
        "id"
    }

    /// All rows in insertion order.
    async fn list(&self, pool: &SqlitePool) -> ApiResult<Vec<T>> {
        let query = format!("SELECT * FROM {} ORDER BY rowid ASC", self.table_name());

        let rows = sqlx::query_as::<_, T>(&query)
            .fetch_all(pool)
            .await?;

        Ok(rows)
    }

    async fn get_by_id(&self, pool: &SqlitePool, id: &str) -> ApiResult<Option<T>> {
        let query = format!(
            "SELECT * FROM {} WHERE {} = ?",
            self.table_name(),
            self.id_field()
        );

        let result = sqlx::query_as::<_, T>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(result)
    }

    async fn create(&self, pool: &SqlitePool, data: &Dto) -> ApiResult<T>;

    /// `None` when no row has this id.
    async fn update(&self, pool: &SqlitePool, id: &str, data: &Dto) -> ApiResult<Option<T>>;

    /// Returns whether a row was removed. Nothing referencing the row is touched.
    async fn delete(&self, pool: &SqlitePool, id: &str) -> ApiResult<bool> {
        let query = format!(
            "DELETE FROM {} WHERE {} = ?",
            self.table_name(),
            self.id_field()
        );

        let result = sqlx::query(&query)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ==================== OPERATION FILTERS ====================

/// List filter shared by receipts and deliveries.
#[derive(Debug, Default, Clone)]
pub struct OperationFilter {
    /// Case-insensitive substring of `reference` or `contact`.
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
}

pub(crate) async fn search_operations<T>(
    pool: &SqlitePool,
    table: &str,
    filter: &OperationFilter,
) -> ApiResult<Vec<T>>
where
    T: Send + Unpin + for<'r> sqlx::FromRow<'r, SqliteRow>,
{
    let mut sql = format!("SELECT * FROM {} WHERE 1 = 1", table);
    let mut params: Vec<String> = Vec::new();

    if let Some(ref search) = filter.search {
        let pattern = like_pattern(search);
        sql.push_str(
            " AND (LOWER(reference) LIKE LOWER(?) ESCAPE '\\' OR LOWER(contact) LIKE LOWER(?) ESCAPE '\\')",
        );
        params.push(pattern.clone());
        params.push(pattern);
    }

    if let Some(status) = filter.status {
        sql.push_str(" AND status = ?");
        params.push(status.to_string());
    }

    sql.push_str(" ORDER BY rowid ASC");

    let mut query = sqlx::query_as::<_, T>(&sql);
    for param in &params {
        query = query.bind(param);
    }

    Ok(query.fetch_all(pool).await?)
}

/// `%term%` with LIKE wildcards in the term escaped.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
