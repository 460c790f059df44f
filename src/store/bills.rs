use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::Store;
use crate::error::AppError;
use crate::models::{Bill, BillItem, BillLinePayload, BillPayload};

const BILL_COLUMNS: &str = "id, customer_name AS customer, total_amount, created_at, updated_at";

struct ResolvedLine {
    item_id: String,
    item_name: String,
    unit: String,
    quantity: i32,
    unit_price: f64,
    base_selling_price: f64,
}

impl Store {
    /// Composes and persists a bill in one transaction. Any line failing to
    /// resolve aborts the whole bill; no partial bill is ever visible.
    pub async fn create_bill(&self, input: BillPayload) -> Result<Bill, AppError> {
        let mut tx = self.pool.begin().await?;

        let (lines, total) = resolve_lines(&mut tx, &input.items).await?;

        let insert = format!(
            "INSERT INTO bills (customer_name, total_amount) VALUES ($1, $2) \
             RETURNING {BILL_COLUMNS}"
        );
        let mut bill = sqlx::query_as::<_, Bill>(&insert)
            .bind(&input.customer)
            .bind(total)
            .fetch_one(&mut *tx)
            .await?;

        bill.items = insert_lines(&mut tx, bill.id, lines).await?;

        tx.commit().await?;

        Ok(bill)
    }

    pub async fn list_bills(&self, limit: i64, offset: i64) -> Result<Vec<Bill>, AppError> {
        let limit = if limit <= 0 { 50 } else { limit };

        let query = format!(
            "SELECT {BILL_COLUMNS} FROM bills ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        let bills = sqlx::query_as::<_, Bill>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(bills)
    }

    /// Rehydrates header and lines. The catalog is joined only to backfill
    /// the display unit; snapshot fields come from the lines themselves.
    pub async fn get_bill(&self, bill_id: Uuid) -> Result<Bill, AppError> {
        let query = format!("SELECT {BILL_COLUMNS} FROM bills WHERE id = $1");
        let mut bill = sqlx::query_as::<_, Bill>(&query)
            .bind(bill_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("bill not found".to_string()))?;

        bill.items = sqlx::query_as::<_, BillItem>(
            "SELECT bi.id, bi.bill_id, bi.item_id, bi.item_name, \
             COALESCE(i.unit, 'pcs') AS unit, \
             bi.quantity, bi.unit_price, bi.base_selling_price \
             FROM bill_items bi \
             LEFT JOIN items i ON bi.item_id = i.item_id \
             WHERE bi.bill_id = $1 \
             ORDER BY bi.item_name",
        )
        .bind(bill_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bill)
    }

    /// Re-composes an existing bill: old lines are dropped and the new ones
    /// resolved under the same rules as creation, all in one transaction.
    pub async fn update_bill(&self, bill_id: Uuid, input: BillPayload) -> Result<Bill, AppError> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM bills WHERE id = $1")
            .bind(bill_id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Err(AppError::NotFound("bill not found".to_string()));
        }

        let (lines, total) = resolve_lines(&mut tx, &input.items).await?;

        sqlx::query("DELETE FROM bill_items WHERE bill_id = $1")
            .bind(bill_id)
            .execute(&mut *tx)
            .await?;

        let update = format!(
            "UPDATE bills SET customer_name = $2, total_amount = $3, updated_at = now() \
             WHERE id = $1 RETURNING {BILL_COLUMNS}"
        );
        let mut bill = sqlx::query_as::<_, Bill>(&update)
            .bind(bill_id)
            .bind(&input.customer)
            .bind(total)
            .fetch_one(&mut *tx)
            .await?;

        bill.items = insert_lines(&mut tx, bill.id, lines).await?;

        tx.commit().await?;

        Ok(bill)
    }

    pub async fn delete_bill(&self, bill_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM bills WHERE id = $1")
            .bind(bill_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("bill not found".to_string()));
        }
        Ok(())
    }
}

/// Resolves each requested line against the live catalog, snapshotting the
/// current selling price. The caller-supplied unit price, when present,
/// overrides what is charged but never what is recorded as the base price.
async fn resolve_lines(
    tx: &mut Transaction<'_, Postgres>,
    lines: &[BillLinePayload],
) -> Result<(Vec<ResolvedLine>, f64), AppError> {
    if lines.is_empty() {
        return Err(AppError::Validation("bill items are required".to_string()));
    }

    let mut resolved = Vec::with_capacity(lines.len());
    let mut total = 0.0;

    for line in lines {
        if line.quantity <= 0 {
            return Err(AppError::Validation(
                "quantity must be positive".to_string(),
            ));
        }

        let row: Option<(String, String, f64, String)> = sqlx::query_as(
            "SELECT item_id, name, selling_price, unit FROM items \
             WHERE item_id = $1 AND deleted_at IS NULL",
        )
        .bind(&line.item_id)
        .fetch_optional(&mut **tx)
        .await?;

        let (item_id, item_name, selling_price, unit) = row.ok_or_else(|| {
            AppError::NotFound(format!("item {} not found", line.item_id))
        })?;

        let unit_price = line.unit_price.unwrap_or(selling_price);
        total += unit_price * f64::from(line.quantity);

        resolved.push(ResolvedLine {
            item_id,
            item_name,
            unit,
            quantity: line.quantity,
            unit_price,
            base_selling_price: selling_price,
        });
    }

    Ok((resolved, total))
}

async fn insert_lines(
    tx: &mut Transaction<'_, Postgres>,
    bill_id: Uuid,
    lines: Vec<ResolvedLine>,
) -> Result<Vec<BillItem>, AppError> {
    let mut items = Vec::with_capacity(lines.len());

    for line in lines {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO bill_items (bill_id, item_id, item_name, quantity, unit_price, base_selling_price) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(bill_id)
        .bind(&line.item_id)
        .bind(&line.item_name)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line.base_selling_price)
        .fetch_one(&mut **tx)
        .await?;

        items.push(BillItem {
            id,
            bill_id,
            item_id: line.item_id,
            item_name: line.item_name,
            unit: line.unit,
            quantity: line.quantity,
            unit_price: line.unit_price,
            base_selling_price: line.base_selling_price,
        });
    }

    Ok(items)
}
