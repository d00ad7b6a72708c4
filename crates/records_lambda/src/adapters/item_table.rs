use records_core::contract::Item;

use super::StoreError;

/// Result of a delete guarded by an existence condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    PreconditionFailed,
}

/// Key-value table keyed by the `id` attribute.
pub trait ItemTable {
    fn table_name(&self) -> &str;

    fn get_item(&self, key: &Item) -> Result<Option<Item>, StoreError>;

    /// Creates or overwrites the item with the same primary key.
    fn put_item(&self, item: &Item) -> Result<(), StoreError>;

    /// Deletes the item only if it currently exists. A failed existence
    /// check is reported as `DeleteOutcome::PreconditionFailed`; every other
    /// failure is an error.
    fn delete_item_if_exists(&self, key: &Item) -> Result<DeleteOutcome, StoreError>;
}
