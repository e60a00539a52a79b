use crate::coin::Coin;
use crate::crypto::{verify_signature, CryptoError};
use crate::transaction::{Transaction, Utxo};
use crate::utxo_pool::UtxoPool;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// The reason a transaction was rejected. Diagnostics only: callers of the
/// public predicate see a plain accept/reject outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// An input claims a UTXO that is not in the pool.
    ClaimNotFound(Utxo),
    /// Two inputs of the same transaction claim the same UTXO.
    DuplicateClaim(Utxo),
    /// The signature on an input does not verify against the claimed output's key.
    InvalidSignature { input_index: usize },
    /// An output's value is not strictly greater than zero.
    NonPositiveOutput { output_index: usize, amount: Coin },
    /// The claimed inputs are worth less than the declared outputs.
    InsufficientInputs { input_total: Coin, output_total: Coin },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::ClaimNotFound(utxo) => {
                write!(f, "No UTXO found in the pool for claim: {}", utxo)
            }
            ValidationError::DuplicateClaim(utxo) => {
                write!(f, "UTXO: {} is claimed more than once", utxo)
            }
            ValidationError::InvalidSignature { input_index } => {
                write!(f, "Signature is invalid for input: {}", input_index)
            }
            ValidationError::NonPositiveOutput {
                output_index,
                amount,
            } => write!(
                f,
                "Output: {} has a non-positive value: {}",
                output_index, amount
            ),
            ValidationError::InsufficientInputs {
                input_total,
                output_total,
            } => write!(
                f,
                "Inputs are worth: {} but outputs declare: {}",
                input_total, output_total
            ),
        }
    }
}

/// The outcome of validating one transaction against a pool snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum TxValidity {
    Valid,
    Invalid(ValidationError),
}

impl TxValidity {
    pub fn is_valid(&self) -> bool {
        matches!(self, TxValidity::Valid)
    }
}

/// Decides whether a single finalized transaction may spend from the given pool.
/// The check never mutates the pool.
pub struct TransactionValidator;

impl TransactionValidator {
    /// A transaction is valid iff every claimed UTXO is in the pool, every
    /// input's signature verifies against the claimed output's key, no UTXO
    /// is claimed twice, every output value is strictly positive, and the
    /// claimed inputs are worth at least the declared outputs. Equal sums are
    /// allowed (zero fee); a zero-valued output is not.
    ///
    /// A malformed key on a pool output is a data bug, not a rejection, and
    /// surfaces as `CryptoError`.
    pub fn validate(tx: &Transaction, pool: &UtxoPool) -> Result<TxValidity, CryptoError> {
        let input_total = match Self::claimed_input_total(tx, pool)? {
            Ok(total) => total,
            Err(reason) => return Ok(TxValidity::Invalid(reason)),
        };
        let output_total = match Self::declared_output_total(tx) {
            Ok(total) => total,
            Err(reason) => return Ok(TxValidity::Invalid(reason)),
        };
        if input_total < output_total {
            return Ok(TxValidity::Invalid(ValidationError::InsufficientInputs {
                input_total,
                output_total,
            }));
        }
        Ok(TxValidity::Valid)
    }

    /// Sums the claimed outputs' values, checking claim existence, claim
    /// uniqueness, and signature validity along the way.
    fn claimed_input_total(
        tx: &Transaction,
        pool: &UtxoPool,
    ) -> Result<Result<Coin, ValidationError>, CryptoError> {
        let mut claimed = HashSet::new();
        let mut input_total = Coin::zero();
        for (input_index, input) in tx.inputs().iter().enumerate() {
            let utxo = input.utxo();
            let output = match pool.get(utxo) {
                Some(output) => output,
                None => return Ok(Err(ValidationError::ClaimNotFound(*utxo))),
            };
            if !claimed.insert(*utxo) {
                return Ok(Err(ValidationError::DuplicateClaim(*utxo)));
            }
            let message = match tx.data_to_sign(input_index) {
                Ok(message) => message,
                // A transaction that cannot be canonically encoded cannot
                // have been signed either.
                Err(_) => return Ok(Err(ValidationError::InvalidSignature { input_index })),
            };
            if !verify_signature(output.recipient(), &message, input.signature())? {
                return Ok(Err(ValidationError::InvalidSignature { input_index }));
            }
            input_total = input_total + output.amount();
        }
        Ok(Ok(input_total))
    }

    /// Sums the declared outputs' values, rejecting any non-positive value.
    fn declared_output_total(tx: &Transaction) -> Result<Coin, ValidationError> {
        let mut output_total = Coin::zero();
        for (output_index, output) in tx.outputs().iter().enumerate() {
            if !output.amount().is_positive() {
                return Err(ValidationError::NonPositiveOutput {
                    output_index,
                    amount: output.amount(),
                });
            }
            output_total = output_total + output.amount();
        }
        Ok(output_total)
    }
}
