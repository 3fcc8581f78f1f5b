// src/reference.rs
//! Human-readable references for receipts (`WH/IN/00001`) and deliveries
//! (`WH/OUT/00001`).
//!
//! The sequence number is the current row count plus one. Nothing reserves
//! it: two concurrent creations can compute the same value, and after a
//! deletion the next value can equal one that is still in use. In both cases
//! the UNIQUE index on `reference` rejects the insert.

use sqlx::SqliteConnection;

pub const REFERENCE_WIDTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Receipt,
    Delivery,
}

impl ReferenceKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            ReferenceKind::Receipt => "WH/IN",
            ReferenceKind::Delivery => "WH/OUT",
        }
    }

    fn table_name(&self) -> &'static str {
        match self {
            ReferenceKind::Receipt => "receipts",
            ReferenceKind::Delivery => "deliveries",
        }
    }
}

/// Zero-pads to five digits; longer numbers are kept whole.
pub fn format_reference(kind: ReferenceKind, sequence: i64) -> String {
    format!("{}/{:0width$}", kind.prefix(), sequence, width = REFERENCE_WIDTH)
}

pub async fn next_reference(
    conn: &mut SqliteConnection,
    kind: ReferenceKind,
) -> Result<String, sqlx::Error> {
    let query = format!("SELECT COUNT(*) FROM {}", kind.table_name());
    let count: i64 = sqlx::query_scalar(&query).fetch_one(conn).await?;

    Ok(format_reference(kind, count + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[test]
    fn test_format_reference() {
        assert_eq!(format_reference(ReferenceKind::Receipt, 1), "WH/IN/00001");
        assert_eq!(format_reference(ReferenceKind::Delivery, 42), "WH/OUT/00042");
        assert_eq!(format_reference(ReferenceKind::Receipt, 99999), "WH/IN/99999");
        assert_eq!(format_reference(ReferenceKind::Receipt, 123456), "WH/IN/123456");
    }

    #[actix_rt::test]
    async fn test_next_reference_follows_row_count() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        assert_eq!(
            next_reference(&mut conn, ReferenceKind::Receipt).await.unwrap(),
            "WH/IN/00001"
        );

        sqlx::query(
            "INSERT INTO receipts (id, reference, contact, scheduled_date, created_at, updated_at)
             VALUES ('r1', 'WH/IN/00001', 'Acme', '2024-01-01T00:00:00Z',
                     '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
        .execute(&mut *conn)
        .await
        .unwrap();

        assert_eq!(
            next_reference(&mut conn, ReferenceKind::Receipt).await.unwrap(),
            "WH/IN/00002"
        );
        // Deliveries count their own table only.
        assert_eq!(
            next_reference(&mut conn, ReferenceKind::Delivery).await.unwrap(),
            "WH/OUT/00001"
        );
    }
}
