pub mod bill;
pub mod item;

pub use bill::{Bill, BillItem, BillLinePayload, BillPayload};
pub use item::{Item, ItemPayload};
