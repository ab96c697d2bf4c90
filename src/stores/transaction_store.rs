use crate::db::kv_store::KeyValueStore;
use crate::db::repository::TRANSACTIONS_KEY;
use crate::error::Error;
use crate::models::transaction::{Transaction, TransactionDraft};
use crate::stores::collection::{PersistedCollection, new_id};

/// Owns every budget transaction of the session.
///
/// Records are kept most-recent-first, in the order they were added.
pub struct TransactionStore<S: KeyValueStore> {
    collection: PersistedCollection<Transaction, S>,
}

impl<S: KeyValueStore> TransactionStore<S> {
    pub fn load(store: S) -> Self {
        Self {
            collection: PersistedCollection::load(store, TRANSACTIONS_KEY),
        }
    }

    pub fn list(&self) -> &[Transaction] {
        self.collection.records()
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.list().iter().find(|t| t.id == id)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.collection.unsaved()
    }

    /// Validates `draft` and stores it as a new transaction.
    ///
    /// Nothing changes and nothing is saved when the draft is rejected.
    pub fn add(&mut self, draft: TransactionDraft) -> Result<Transaction, Error> {
        let amount = draft.validate()?;
        let id = self.fresh_id();
        let transaction = Transaction::new(
            id,
            draft.date,
            draft.description,
            amount,
            draft.transaction_type,
            draft.category,
        );

        tracing::info!(
            "Adding {} transaction {} for {}",
            transaction.transaction_type,
            transaction.id,
            transaction.amount
        );
        self.collection
            .mutate(|records| records.insert(0, transaction.clone()));
        Ok(transaction)
    }

    /// Stores a batch of drafts, all or nothing, with a single save.
    ///
    /// The first draft of the batch ends up first in the list.
    pub fn add_all(&mut self, drafts: Vec<TransactionDraft>) -> Result<usize, Error> {
        let mut transactions: Vec<Transaction> = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let amount = draft.validate()?;
            let id = new_id(|candidate| {
                self.get(candidate).is_some() || transactions.iter().any(|t| t.id == candidate)
            });
            transactions.push(Transaction::new(
                id,
                draft.date,
                draft.description,
                amount,
                draft.transaction_type,
                draft.category,
            ));
        }

        let count = transactions.len();
        if count > 0 {
            self.collection.mutate(|records| {
                transactions.append(records);
                *records = transactions;
            });
            tracing::info!("Added {count} transactions");
        }
        Ok(count)
    }

    /// Deletes the transaction with `id`. Unknown ids are ignored.
    pub fn remove(&mut self, id: &str) {
        let removed = self.collection.mutate(|records| {
            let before = records.len();
            records.retain(|t| t.id != id);
            before != records.len()
        });

        if removed {
            tracing::info!("Removed transaction {id}");
        } else {
            tracing::warn!("No transaction with id {id} to remove");
        }
    }

    fn fresh_id(&self) -> String {
        new_id(|candidate| self.get(candidate).is_some())
    }
}
