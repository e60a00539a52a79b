use crate::transaction::{TransactionOutput, Utxo};
use std::collections::HashMap;

/// The current set of confirmed, unspent transaction outputs, indexed by the
/// transaction that created them and their position within it.
///
/// The pool does not verify that its keys correspond to outputs some
/// transaction actually produced; callers establish that by construction.
/// Each round snapshots the committed pool via `Clone`, so mutations of the
/// working copy never reach the caller's pool.
#[derive(Debug, Clone, Default)]
pub struct UtxoPool {
    utxos: HashMap<Utxo, TransactionOutput>,
}

impl UtxoPool {
    pub fn new() -> Self {
        Self {
            utxos: HashMap::new(),
        }
    }

    pub fn contains(&self, utxo: &Utxo) -> bool {
        self.utxos.contains_key(utxo)
    }

    /// The output claimable through `utxo`, or `None` if it is not in the pool.
    pub fn get(&self, utxo: &Utxo) -> Option<&TransactionOutput> {
        self.utxos.get(utxo)
    }

    /// Inserts or overwrites the entry for `utxo`.
    pub fn add(&mut self, utxo: Utxo, output: TransactionOutput) {
        self.utxos.insert(utxo, output);
    }

    /// Removes the entry for `utxo`. No-op if it is absent.
    pub fn remove(&mut self, utxo: &Utxo) {
        self.utxos.remove(utxo);
    }

    pub fn utxos(&self) -> impl Iterator<Item = (&Utxo, &TransactionOutput)> {
        self.utxos.iter()
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }
}
