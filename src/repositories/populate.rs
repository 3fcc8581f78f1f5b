// src/repositories/populate.rs
//! Expands stored ids into the referenced documents. A reference whose target
//! has been deleted expands to `None`.

use std::collections::{BTreeSet, HashMap};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;
use crate::error::ApiResult;
use crate::models::{
    Delivery, DeliveryRow, Document, LineItem, LineItemRow, Location, LocationRow, Product,
    Receipt, ReceiptRow, Warehouse,
};
use super::lines::{load_lines, LineTable, ID_CHUNK_SIZE};

/// Fetches the rows of `table` whose id is in `ids`, keyed by id. Missing ids
/// are simply absent from the map.
pub async fn fetch_by_ids<'a, T, I>(
    pool: &SqlitePool,
    table: &str,
    ids: I,
) -> ApiResult<HashMap<String, T>>
where
    T: Document + Send + Unpin + for<'r> sqlx::FromRow<'r, SqliteRow>,
    I: IntoIterator<Item = &'a str>,
{
    let unique: Vec<&str> = ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
    let mut found = HashMap::with_capacity(unique.len());

    for chunk in unique.chunks(ID_CHUNK_SIZE) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let sql = format!("SELECT * FROM {} WHERE id IN ({})", table, placeholders);

        let mut query = sqlx::query_as::<_, T>(&sql);
        for id in chunk {
            query = query.bind(*id);
        }

        for row in query.fetch_all(pool).await? {
            found.insert(row.id().to_string(), row);
        }
    }

    Ok(found)
}

pub async fn expand_locations(pool: &SqlitePool, rows: Vec<LocationRow>) -> ApiResult<Vec<Location>> {
    let warehouses: HashMap<String, Warehouse> = fetch_by_ids(
        pool,
        "warehouses",
        rows.iter().map(|row| row.warehouse_id.as_str()),
    )
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let warehouse = warehouses.get(&row.warehouse_id).cloned();
            Location::from_row(row, warehouse)
        })
        .collect())
}

pub async fn expand_location(pool: &SqlitePool, row: LocationRow) -> ApiResult<Location> {
    let mut expanded = expand_locations(pool, vec![row]).await?;
    expanded
        .pop()
        .ok_or_else(|| crate::error::ApiError::internal("location expansion returned nothing"))
}

/// Line items of each document plus every product they mention.
struct ExpandedLines {
    lines: HashMap<String, Vec<LineItemRow>>,
    products: HashMap<String, Product>,
}

impl ExpandedLines {
    async fn load(pool: &SqlitePool, table: LineTable, document_ids: &[String]) -> ApiResult<Self> {
        let lines = load_lines(pool, table, document_ids).await?;
        let products = fetch_by_ids(
            pool,
            "products",
            lines
                .values()
                .flatten()
                .filter_map(|line| line.product_id.as_deref()),
        )
        .await?;

        Ok(Self { lines, products })
    }

    fn take(&mut self, document_id: &str) -> Vec<LineItem> {
        self.lines
            .remove(document_id)
            .unwrap_or_default()
            .into_iter()
            .map(|line| LineItem {
                product: line
                    .product_id
                    .as_ref()
                    .and_then(|id| self.products.get(id).cloned()),
                quantity: line.quantity,
            })
            .collect()
    }
}

pub async fn expand_receipts(pool: &SqlitePool, rows: Vec<ReceiptRow>) -> ApiResult<Vec<Receipt>> {
    let ids: Vec<String> = rows.iter().map(|row| row.id.clone()).collect();
    let mut lines = ExpandedLines::load(pool, LineTable::Receipt, &ids).await?;
    let warehouses: HashMap<String, Warehouse> = fetch_by_ids(
        pool,
        "warehouses",
        rows.iter().filter_map(|row| row.to_warehouse_id.as_deref()),
    )
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let to = row
                .to_warehouse_id
                .as_ref()
                .and_then(|id| warehouses.get(id).cloned());
            let products = lines.take(&row.id);
            Receipt::from_row(row, to, products)
        })
        .collect())
}

pub async fn expand_deliveries(pool: &SqlitePool, rows: Vec<DeliveryRow>) -> ApiResult<Vec<Delivery>> {
    let ids: Vec<String> = rows.iter().map(|row| row.id.clone()).collect();
    let mut lines = ExpandedLines::load(pool, LineTable::Delivery, &ids).await?;
    let warehouses: HashMap<String, Warehouse> = fetch_by_ids(
        pool,
        "warehouses",
        rows.iter().filter_map(|row| row.from_warehouse_id.as_deref()),
    )
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let from = row
                .from_warehouse_id
                .as_ref()
                .and_then(|id| warehouses.get(id).cloned());
            let products = lines.take(&row.id);
            Delivery::from_row(row, from, products)
        })
        .collect())
}

pub async fn expand_receipt(pool: &SqlitePool, row: ReceiptRow) -> ApiResult<Receipt> {
    let mut expanded = expand_receipts(pool, vec![row]).await?;
    expanded
        .pop()
        .ok_or_else(|| crate::error::ApiError::internal("receipt expansion returned nothing"))
}

pub async fn expand_delivery(pool: &SqlitePool, row: DeliveryRow) -> ApiResult<Delivery> {
    let mut expanded = expand_deliveries(pool, vec![row]).await?;
    expanded
        .pop()
        .ok_or_else(|| crate::error::ApiError::internal("delivery expansion returned nothing"))
}
