mod bills;
mod items;

use crate::database::Database;

/// Fixed advisory-lock key serializing item identifier allocation with the
/// insert that consumes it. Held for the lifetime of the transaction.
pub(crate) const ITEM_ID_LOCK_KEY: i64 = 421987;

/// How long a soft-deleted item stays restorable. While inside this window
/// its identifier also stays reserved against reallocation.
pub(crate) const RESTORE_WINDOW: &str = "24 hours";

#[derive(Clone)]
pub struct Store {
    pub(crate) pool: Database,
}

impl Store {
    pub fn new(pool: Database) -> Self {
        Store { pool }
    }
}
