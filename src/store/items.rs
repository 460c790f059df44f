use std::collections::HashSet;

use sqlx::{Postgres, Transaction};

use super::{Store, ITEM_ID_LOCK_KEY, RESTORE_WINDOW};
use crate::error::AppError;
use crate::models::{Item, ItemPayload};

const ITEM_COLUMNS: &str = "item_id, name, arabic_name, buying_price, selling_price, \
     purchase_percentage, sell_percentage, is_wire_box, unit, created_at, updated_at, deleted_at";

impl Store {
    pub async fn list_items(
        &self,
        include_deleted: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Item>, AppError> {
        let query = if include_deleted {
            format!("SELECT {ITEM_COLUMNS} FROM items ORDER BY name LIMIT $1 OFFSET $2")
        } else {
            format!(
                "SELECT {ITEM_COLUMNS} FROM items WHERE deleted_at IS NULL \
                 ORDER BY name LIMIT $1 OFFSET $2"
            )
        };

        let items = sqlx::query_as::<_, Item>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Returns the row whether live or soft-deleted.
    pub async fn get_item(&self, item_id: &str) -> Result<Item, AppError> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM items WHERE item_id = $1");

        sqlx::query_as::<_, Item>(&query)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("item not found".to_string()))
    }

    /// Creates a catalog item. When the payload carries no identifier one is
    /// allocated under the advisory lock, atomically with the insert. Rows
    /// past the restore window are purged in the same transaction so their
    /// numbers become reusable between scheduled sweeps.
    pub async fn create_item(&self, input: ItemPayload) -> Result<Item, AppError> {
        let input = input.normalized()?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(ITEM_ID_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM items WHERE deleted_at < now() - $1::interval")
            .bind(RESTORE_WINDOW)
            .execute(&mut *tx)
            .await?;

        let item_id = match input.item_id {
            Some(ref id) => id.clone(),
            None => next_item_id(&mut tx).await?,
        };

        let insert = format!(
            "INSERT INTO items (item_id, name, arabic_name, buying_price, selling_price, \
             purchase_percentage, sell_percentage, is_wire_box, unit) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {ITEM_COLUMNS}"
        );
        let item = sqlx::query_as::<_, Item>(&insert)
            .bind(&item_id)
            .bind(&input.name)
            .bind(&input.arabic_name)
            .bind(input.buying_price)
            .bind(input.selling_price)
            .bind(input.purchase_percentage)
            .bind(input.sell_percentage)
            .bind(input.is_wire_box)
            .bind(&input.unit)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(item)
    }

    /// Updates a live item; soft-deleted rows are not updatable.
    pub async fn update_item(&self, item_id: &str, input: ItemPayload) -> Result<Item, AppError> {
        let input = input.normalized()?;

        let update = format!(
            "UPDATE items SET name = $2, arabic_name = $3, buying_price = $4, \
             selling_price = $5, purchase_percentage = $6, sell_percentage = $7, \
             is_wire_box = $8, unit = $9, updated_at = now() \
             WHERE item_id = $1 AND deleted_at IS NULL \
             RETURNING {ITEM_COLUMNS}"
        );

        sqlx::query_as::<_, Item>(&update)
            .bind(item_id)
            .bind(&input.name)
            .bind(&input.arabic_name)
            .bind(input.buying_price)
            .bind(input.selling_price)
            .bind(input.purchase_percentage)
            .bind(input.sell_percentage)
            .bind(input.is_wire_box)
            .bind(&input.unit)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("item not found".to_string()))
    }

    /// Marks a live item deleted. A second delete of the same item fails.
    pub async fn soft_delete_item(&self, item_id: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE items SET deleted_at = now(), updated_at = now() \
             WHERE item_id = $1 AND deleted_at IS NULL",
        )
        .bind(item_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("item not found".to_string()));
        }
        Ok(())
    }

    /// Brings a soft-deleted item back, but only inside the restore window.
    /// The conflict deliberately does not distinguish "already live",
    /// "not found" and "window expired".
    pub async fn restore_item(&self, item_id: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE items SET deleted_at = NULL, updated_at = now() \
             WHERE item_id = $1 AND deleted_at >= now() - $2::interval",
        )
        .bind(item_id)
        .bind(RESTORE_WINDOW)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(
                "restore window expired or item not found".to_string(),
            ));
        }
        Ok(())
    }

    /// Permanently removes rows past the restore window. Idempotent.
    pub async fn cleanup_deleted_items(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM items WHERE deleted_at < now() - $1::interval")
            .bind(RESTORE_WINDOW)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Computes the next reusable identifier. Occupied numbers are those of rows
/// that are live or still inside the restore window; numbers freed by the
/// purge above are handed out again. Must run under the advisory lock.
async fn next_item_id(tx: &mut Transaction<'_, Postgres>) -> Result<String, AppError> {
    let occupied: Vec<i32> = sqlx::query_scalar(
        "SELECT CAST(SUBSTRING(item_id FROM 5) AS INT) FROM items \
         WHERE item_id ~ '^ITEM[0-9]{3}$' \
         AND (deleted_at IS NULL OR deleted_at >= now() - $1::interval)",
    )
    .bind(RESTORE_WINDOW)
    .fetch_all(&mut **tx)
    .await
    .map_err(|err| AppError::Allocation(err.to_string()))?;

    Ok(format_item_id(first_free_number(&occupied)))
}

/// First-fit scan: smallest positive integer not in the occupied set.
fn first_free_number(occupied: &[i32]) -> i32 {
    let taken: HashSet<i32> = occupied.iter().copied().collect();

    let mut candidate = 1;
    while taken.contains(&candidate) {
        candidate += 1;
    }
    candidate
}

/// Formats as ITEM plus a zero-padded 3-digit number. Numbers above 999
/// simply grow past three digits; such identifiers fall outside the
/// occupied-set predicate, which is accepted behavior.
fn format_item_id(number: i32) -> String {
    format!("ITEM{:03}", number)
}
