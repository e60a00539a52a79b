use crate::crypto::CryptoError;
use crate::transaction::{OutputIndex, Transaction, Utxo};
use crate::utxo_pool::UtxoPool;
use crate::validation::{TransactionValidator, TxValidity};

/// The round boundary of the ledger: holds the working UTXO pool, answers ad
/// hoc validity checks against it, and settles one batch of candidate
/// transactions per round, advancing the pool in place.
pub struct Ledger {
    utxo_pool: UtxoPool,
}

impl Ledger {
    /// Snapshots the caller's committed pool. The ledger owns the copy
    /// exclusively, so the caller's pool is never touched by settlement.
    pub fn new(utxo_pool: &UtxoPool) -> Self {
        Self {
            utxo_pool: utxo_pool.clone(),
        }
    }

    /// The current committed pool: the seeded pool plus the effects of every
    /// round settled so far.
    pub fn utxo_pool(&self) -> &UtxoPool {
        &self.utxo_pool
    }

    /// Whether `tx` could spend from the current pool. A `CryptoError` means
    /// the pool holds a malformed key and is a data bug, not a rejection.
    pub fn check_validity(&self, tx: &Transaction) -> Result<bool, CryptoError> {
        Ok(TransactionValidator::validate(tx, &self.utxo_pool)?.is_valid())
    }

    /// Settles one round: selects a mutually consistent subset of `candidates`
    /// greedily and applies it to the pool. Returns the accepted transactions
    /// in acceptance order.
    ///
    /// The algorithm repeats full passes over the remaining candidates,
    /// validating each against the pool as already mutated this round, until a
    /// pass accepts nothing. A transaction spending an output created earlier
    /// in the same batch becomes valid once its producer is accepted, so
    /// same-round dependency chains resolve without an explicit dependency
    /// graph. Conflicting claims resolve first-writer-wins in encounter
    /// order; cyclic dependencies never resolve and are left unaccepted.
    pub fn settle_round(
        &mut self,
        candidates: Vec<Transaction>,
    ) -> Result<Vec<Transaction>, CryptoError> {
        let mut remaining = candidates;
        let mut accepted = vec![];
        loop {
            let mut accepted_this_pass = false;
            let mut next_remaining = Vec::with_capacity(remaining.len());
            let mut rejections = vec![];
            for tx in remaining {
                match TransactionValidator::validate(&tx, &self.utxo_pool)? {
                    TxValidity::Valid => {
                        Self::apply(&mut self.utxo_pool, &tx);
                        accepted.push(tx);
                        accepted_this_pass = true;
                    }
                    TxValidity::Invalid(reason) => {
                        rejections.push((*tx.id(), reason));
                        next_remaining.push(tx);
                    }
                }
            }
            remaining = next_remaining;
            if !accepted_this_pass {
                // The fixed point: whatever this pass rejected stays rejected,
                // so these are the final reasons worth reporting.
                for (id, reason) in rejections {
                    eprintln!("Rejecting transaction: {}: {}", id, reason);
                }
                break;
            }
        }
        Ok(accepted)
    }

    /// Applies an already-validated transaction to the pool as one atomic
    /// step: all claimed UTXOs leave, one entry per output enters under the
    /// transaction's own identity.
    fn apply(utxo_pool: &mut UtxoPool, tx: &Transaction) {
        for input in tx.inputs() {
            utxo_pool.remove(input.utxo());
        }
        for (index, output) in tx.outputs().iter().enumerate() {
            let utxo = Utxo::new(*tx.id(), OutputIndex::new(index as u32));
            utxo_pool.add(utxo, output.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coin::Coin;
    use crate::crypto::public_key;
    use crate::hash::Sha256;
    use crate::transaction::{OutputIndex, TransactionId, TransactionOutput};
    use ed25519_dalek::SigningKey;

    fn key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    /// Seeds a pool with one output per (amount, owner) pair, all attributed
    /// to a synthetic mint transaction identity.
    fn seeded_pool(outputs: &[(f64, &SigningKey)]) -> (UtxoPool, Vec<Utxo>) {
        let mint_id = TransactionId::new(Sha256::digest(b"mint"));
        let mut pool = UtxoPool::new();
        let mut utxos = vec![];
        for (index, (amount, owner)) in outputs.iter().enumerate() {
            let utxo = Utxo::new(mint_id, OutputIndex::new(index as u32));
            pool.add(
                utxo,
                TransactionOutput::new(Coin::new(*amount), public_key(owner)),
            );
            utxos.push(utxo);
        }
        (pool, utxos)
    }

    fn spend(
        claims: &[(Utxo, &SigningKey)],
        amount: f64,
        recipient: &SigningKey,
    ) -> Transaction {
        Transaction::signed(
            claims,
            vec![TransactionOutput::new(
                Coin::new(amount),
                public_key(recipient),
            )],
        )
        .unwrap()
    }

    #[test]
    fn single_valid_transaction_is_accepted() {
        let scrooge = key(1);
        let alice = key(2);
        let (pool, utxos) = seeded_pool(&[(10.0, &scrooge)]);
        let mut ledger = Ledger::new(&pool);

        let tx = spend(&[(utxos[0], &scrooge)], 5.0, &alice);
        assert_eq!(ledger.check_validity(&tx), Ok(true));

        let accepted = ledger.settle_round(vec![tx.clone()]).unwrap();
        assert_eq!(accepted, vec![tx.clone()]);

        // The claimed UTXO is spent; the transaction's own output replaced it.
        assert!(!ledger.utxo_pool().contains(&utxos[0]));
        let created = Utxo::new(*tx.id(), OutputIndex::new(0));
        assert_eq!(
            ledger.utxo_pool().get(&created).unwrap().amount(),
            Coin::new(5.0)
        );
        assert_eq!(ledger.utxo_pool().len(), 1);

        // The caller's pool is untouched.
        assert!(pool.contains(&utxos[0]));
    }

    #[test]
    fn invalid_transaction_leaves_the_pool_untouched() {
        let scrooge = key(1);
        let alice = key(2);
        let (pool, utxos) = seeded_pool(&[(10.0, &scrooge)]);
        let mut ledger = Ledger::new(&pool);

        // Overspends: 20 > 10.
        let tx = spend(&[(utxos[0], &scrooge)], 20.0, &alice);
        let accepted = ledger.settle_round(vec![tx]).unwrap();
        assert!(accepted.is_empty());
        assert!(ledger.utxo_pool().contains(&utxos[0]));
        assert_eq!(ledger.utxo_pool().len(), 1);
    }

    #[test]
    fn same_round_dependency_resolves_in_either_order() {
        for flip in &[false, true] {
            let scrooge = key(1);
            let alice = key(2);
            let bob = key(3);
            let (pool, utxos) = seeded_pool(&[(10.0, &scrooge)]);
            let mut ledger = Ledger::new(&pool);

            // tx_b spends the output tx_a creates in the same round.
            let tx_a = spend(&[(utxos[0], &scrooge)], 8.0, &alice);
            let tx_b = spend(
                &[(Utxo::new(*tx_a.id(), OutputIndex::new(0)), &alice)],
                7.0,
                &bob,
            );

            let batch = if *flip {
                vec![tx_b.clone(), tx_a.clone()]
            } else {
                vec![tx_a.clone(), tx_b.clone()]
            };
            let accepted = ledger.settle_round(batch).unwrap();
            // The producer is always accepted before its consumer.
            assert_eq!(accepted, vec![tx_a.clone(), tx_b.clone()]);
        }
    }

    #[test]
    fn double_spend_within_a_batch_accepts_the_first_encountered() {
        let scrooge = key(1);
        let alice = key(2);
        let bob = key(3);
        let (pool, utxos) = seeded_pool(&[(10.0, &scrooge)]);
        let mut ledger = Ledger::new(&pool);

        let to_alice = spend(&[(utxos[0], &scrooge)], 10.0, &alice);
        let to_bob = spend(&[(utxos[0], &scrooge)], 10.0, &bob);

        let accepted = ledger
            .settle_round(vec![to_bob.clone(), to_alice.clone()])
            .unwrap();
        assert_eq!(accepted, vec![to_bob]);
    }

    #[test]
    fn cyclic_dependencies_are_never_accepted() {
        let alice = key(2);
        let bob = key(3);
        let (pool, _) = seeded_pool(&[]);
        let mut ledger = Ledger::new(&pool);

        // Two transactions spending outputs only the other one creates.
        // Neither UTXO can ever enter the pool, so the fixed point is reached
        // after a single pass with zero acceptances.
        let phantom_a = Utxo::new(
            TransactionId::new(Sha256::digest(b"phantom-a")),
            OutputIndex::new(0),
        );
        let phantom_b = Utxo::new(
            TransactionId::new(Sha256::digest(b"phantom-b")),
            OutputIndex::new(0),
        );
        let tx_a = spend(&[(phantom_b, &bob)], 1.0, &alice);
        let tx_b = spend(&[(phantom_a, &alice)], 1.0, &bob);

        let accepted = ledger.settle_round(vec![tx_a, tx_b]).unwrap();
        assert!(accepted.is_empty());
        assert!(ledger.utxo_pool().is_empty());
    }

    #[test]
    fn duplicate_submission_is_accepted_once() {
        let scrooge = key(1);
        let alice = key(2);
        let (pool, utxos) = seeded_pool(&[(10.0, &scrooge)]);
        let mut ledger = Ledger::new(&pool);

        let tx = spend(&[(utxos[0], &scrooge)], 10.0, &alice);
        let accepted = ledger.settle_round(vec![tx.clone(), tx.clone()]).unwrap();
        assert_eq!(accepted, vec![tx]);
    }

    #[test]
    fn pool_advances_across_rounds() {
        let scrooge = key(1);
        let alice = key(2);
        let bob = key(3);
        let (pool, utxos) = seeded_pool(&[(10.0, &scrooge)]);
        let mut ledger = Ledger::new(&pool);

        let tx_a = spend(&[(utxos[0], &scrooge)], 8.0, &alice);
        assert_eq!(ledger.settle_round(vec![tx_a.clone()]).unwrap().len(), 1);

        // A second round can spend what the first round created, and a replay
        // of the first round's claim is rejected.
        let tx_b = spend(
            &[(Utxo::new(*tx_a.id(), OutputIndex::new(0)), &alice)],
            7.0,
            &bob,
        );
        let replay = spend(&[(utxos[0], &scrooge)], 8.0, &alice);
        let accepted = ledger.settle_round(vec![replay, tx_b.clone()]).unwrap();
        assert_eq!(accepted, vec![tx_b]);
    }

    #[test]
    fn fan_out_then_gather() {
        let scrooge = key(1);
        let alice = key(2);
        let bob = key(3);
        let (pool, utxos) = seeded_pool(&[(4.0, &scrooge), (6.0, &scrooge)]);
        let mut ledger = Ledger::new(&pool);

        // Alice gathers both of scrooge's outputs, then pays bob from the
        // gathered output, all in one batch submitted consumer-first.
        let gather = Transaction::signed(
            &[(utxos[0], &scrooge), (utxos[1], &scrooge)],
            vec![TransactionOutput::new(Coin::new(10.0), public_key(&alice))],
        )
        .unwrap();
        let pay = spend(
            &[(Utxo::new(*gather.id(), OutputIndex::new(0)), &alice)],
            9.5,
            &bob,
        );

        let accepted = ledger.settle_round(vec![pay.clone(), gather.clone()]).unwrap();
        assert_eq!(accepted, vec![gather, pay.clone()]);
        assert_eq!(ledger.utxo_pool().len(), 1);
        assert_eq!(
            ledger
                .utxo_pool()
                .get(&Utxo::new(*pay.id(), OutputIndex::new(0)))
                .unwrap()
                .amount(),
            Coin::new(9.5)
        );
    }
}
