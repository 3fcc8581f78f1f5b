// src/repositories/lines.rs
//! Line items of receipts and deliveries. Each document owns its rows, which
//! are rewritten wholesale on every save.

use std::collections::HashMap;
use sqlx::{SqliteConnection, SqlitePool};
use crate::error::ApiResult;
use crate::models::{LineItemRequest, LineItemRow};

/// Placeholder count per `IN (...)` query.
pub(crate) const ID_CHUNK_SIZE: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTable {
    Receipt,
    Delivery,
}

impl LineTable {
    pub fn table_name(&self) -> &'static str {
        match self {
            LineTable::Receipt => "receipt_lines",
            LineTable::Delivery => "delivery_lines",
        }
    }
}

pub async fn replace_lines(
    conn: &mut SqliteConnection,
    table: LineTable,
    document_id: &str,
    items: &[LineItemRequest],
) -> Result<(), sqlx::Error> {
    let delete = format!("DELETE FROM {} WHERE document_id = ?", table.table_name());
    sqlx::query(&delete)
        .bind(document_id)
        .execute(&mut *conn)
        .await?;

    let insert = format!(
        "INSERT INTO {} (document_id, position, product_id, quantity) VALUES (?, ?, ?, ?)",
        table.table_name()
    );
    for (position, item) in items.iter().enumerate() {
        sqlx::query(&insert)
            .bind(document_id)
            .bind(position as i64)
            .bind(&item.product)
            .bind(item.quantity)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// Line items grouped by document id, each group in submission order.
pub async fn load_lines(
    pool: &SqlitePool,
    table: LineTable,
    document_ids: &[String],
) -> ApiResult<HashMap<String, Vec<LineItemRow>>> {
    let mut grouped: HashMap<String, Vec<LineItemRow>> = HashMap::new();

    for chunk in document_ids.chunks(ID_CHUNK_SIZE) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let sql = format!(
            "SELECT document_id, position, product_id, quantity FROM {} \
             WHERE document_id IN ({}) ORDER BY document_id, position",
            table.table_name(),
            placeholders
        );

        let mut query = sqlx::query_as::<_, LineItemRow>(&sql);
        for id in chunk {
            query = query.bind(id);
        }

        for row in query.fetch_all(pool).await? {
            grouped.entry(row.document_id.clone()).or_default().push(row);
        }
    }

    Ok(grouped)
}
