use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: Uuid,
    pub customer: Option<String>,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub items: Vec<BillItem>,
}

/// A line snapshotted at bill-creation time. Pricing and name fields are
/// frozen; only `unit` is a display label backfilled from the catalog on
/// read (falling back to "pcs" once the item is gone).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BillItem {
    pub id: Uuid,
    pub bill_id: Uuid,
    pub item_id: String,
    pub item_name: String,
    pub unit: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub base_selling_price: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillLinePayload {
    pub item_id: String,
    pub quantity: i32,
    #[serde(default)]
    pub unit_price: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillPayload {
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub items: Vec<BillLinePayload>,
}
