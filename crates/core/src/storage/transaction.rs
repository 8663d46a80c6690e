use serde::Serialize;

use crate::keys::Keys;

use super::types::{item_keys, to_item, Item};
use super::{Result, StoreError};

/// Upper bound on the number of operations in one transaction.
pub const MAX_TRANSACTION_ITEMS: usize = 100;

/// An all-or-nothing batch of writes.
///
/// Creates fail the whole transaction if their key already exists; puts are
/// unconditional; deletes remove whatever is at the key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    creates: Vec<Item>,
    puts: Vec<Item>,
    deletes: Vec<Keys>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a create-only write of `value`.
    pub fn create<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        self.creates.push(to_item(value)?);
        Ok(self)
    }

    /// Adds an unconditional write of `value`.
    pub fn put<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        self.puts.push(to_item(value)?);
        Ok(self)
    }

    pub fn delete(mut self, keys: Keys) -> Self {
        self.deletes.push(keys);
        self
    }

    pub fn creates(&self) -> &[Item] {
        &self.creates
    }

    pub fn puts(&self) -> &[Item] {
        &self.puts
    }

    pub fn deletes(&self) -> &[Keys] {
        &self.deletes
    }

    pub fn len(&self) -> usize {
        self.creates.len() + self.puts.len() + self.deletes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks the transaction can be submitted: it has between one and
    /// [`MAX_TRANSACTION_ITEMS`] operations and every written item has
    /// well-formed keys.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(StoreError::InvalidData(
                "transaction must contain at least one operation".to_string(),
            ));
        }

        if self.len() > MAX_TRANSACTION_ITEMS {
            return Err(StoreError::InvalidData(format!(
                "transaction has {} operations, at most {MAX_TRANSACTION_ITEMS} are allowed",
                self.len()
            )));
        }

        for item in self.creates.iter().chain(&self.puts) {
            item_keys(item)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{DonorKey, LpaKey};
    use serde_json::json;

    #[test]
    fn test_empty_transaction_is_invalid() {
        let err = Transaction::new().validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid data: transaction must contain at least one operation"
        );
    }

    #[test]
    fn test_transaction_collects_operations() {
        let tx = Transaction::new()
            .create(&json!({"PK": "LPA#a", "SK": "DONOR#a"}))
            .unwrap()
            .put(&json!({"PK": "LPA#b", "SK": "DONOR#b"}))
            .unwrap()
            .delete(Keys::new(LpaKey::new("c"), DonorKey::new("c")));

        assert_eq!(tx.len(), 3);
        assert_eq!(tx.creates().len(), 1);
        assert_eq!(tx.puts().len(), 1);
        assert_eq!(tx.deletes().len(), 1);
        assert!(tx.validate().is_ok());
    }

    #[test]
    fn test_transaction_rejects_items_without_valid_keys() {
        let tx = Transaction::new()
            .put(&json!({"PK": "LPA#a", "SK": "NOPE#a"}))
            .unwrap();
        assert!(matches!(tx.validate(), Err(StoreError::MalformedKey(_))));
    }

    #[test]
    fn test_transaction_rejects_too_many_operations() {
        let tx = (0..=MAX_TRANSACTION_ITEMS).fold(Transaction::new(), |tx, i| {
            tx.delete(Keys::new(LpaKey::new(i.to_string()), DonorKey::new("d")))
        });
        assert!(tx.validate().is_err());
    }
}
