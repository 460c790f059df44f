use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub item_id: String,
    pub name: String,
    pub arabic_name: String,
    pub buying_price: Option<f64>,
    pub selling_price: f64,
    pub purchase_percentage: Option<f64>,
    pub sell_percentage: Option<f64>,
    pub is_wire_box: bool,
    pub unit: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Create/update payload. `selling_price` may be omitted for wire/box items,
/// it is derived during normalization.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub arabic_name: String,
    #[serde(default)]
    pub buying_price: Option<f64>,
    #[serde(default)]
    pub selling_price: f64,
    #[serde(default)]
    pub purchase_percentage: Option<f64>,
    #[serde(default)]
    pub sell_percentage: Option<f64>,
    #[serde(default)]
    pub is_wire_box: bool,
    #[serde(default)]
    pub unit: String,
}

impl ItemPayload {
    /// Applies the pricing-mode rules and returns the payload ready for
    /// persistence. A blank `item_id` becomes `None`, which asks the store
    /// to allocate one.
    pub fn normalized(mut self) -> Result<Self, AppError> {
        self.item_id = match self.item_id {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(validate_item_id(trimmed)?)
                }
            }
            None => None,
        };

        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".to_string()));
        }
        if self.arabic_name.trim().is_empty() {
            return Err(AppError::Validation("arabicName is required".to_string()));
        }

        if self.is_wire_box {
            // Wire/Box mode: buying_price is the base/reference price and the
            // selling price is derived from the sell discount percentage.
            let base = match self.buying_price {
                Some(price) if price > 0.0 => price,
                _ => {
                    return Err(AppError::Validation(
                        "buyingPrice (base purchase price) is required for Wire/Box items"
                            .to_string(),
                    ))
                }
            };
            if !matches!(self.purchase_percentage, Some(p) if (0.0..=100.0).contains(&p)) {
                return Err(AppError::Validation(
                    "purchasePercentage must be between 0 and 100".to_string(),
                ));
            }
            let sell_percentage = match self.sell_percentage {
                Some(p) if (0.0..=100.0).contains(&p) => p,
                _ => {
                    return Err(AppError::Validation(
                        "sellPercentage must be between 0 and 100".to_string(),
                    ))
                }
            };
            self.selling_price = base * (1.0 - sell_percentage / 100.0);
        } else {
            // Normal mode: both prices entered directly, percentages cleared.
            if !matches!(self.buying_price, Some(price) if price > 0.0) {
                return Err(AppError::Validation(
                    "buyingPrice is required and must be positive".to_string(),
                ));
            }
            if self.selling_price <= 0.0 {
                return Err(AppError::Validation(
                    "sellingPrice must be positive".to_string(),
                ));
            }
            self.purchase_percentage = None;
            self.sell_percentage = None;
        }

        let unit = self.unit.trim();
        self.unit = if unit.is_empty() {
            "pcs".to_string()
        } else {
            unit.to_string()
        };

        Ok(self)
    }
}

fn validate_item_id(item_id: &str) -> Result<String, AppError> {
    if item_id.len() > 100 {
        return Err(AppError::Validation(
            "itemId must be at most 100 characters".to_string(),
        ));
    }
    if !item_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::Validation(
            "itemId must contain only letters and numbers".to_string(),
        ));
    }
    Ok(item_id.to_string())
}
