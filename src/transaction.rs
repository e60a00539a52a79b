use crate::coin::Coin;
use crate::crypto;
use crate::hash::Sha256;
use crate::public_key::PublicKey;
use ed25519_dalek::SigningKey;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A double SHA-256 hash of the transaction's canonical encoding.
#[derive(Debug, Hash, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct TransactionId(Sha256);

impl TransactionId {
    pub fn new(data: Sha256) -> Self {
        Self(data)
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The index of a transaction output.
#[derive(Debug, Hash, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct OutputIndex(u32);

impl OutputIndex {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }
}

impl Display for OutputIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A reference to a single spendable output: the transaction that created it
/// and the output's position within that transaction.
#[derive(Debug, Hash, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct Utxo {
    transaction_id: TransactionId,
    output_index: OutputIndex,
}

impl Utxo {
    pub fn new(transaction_id: TransactionId, output_index: OutputIndex) -> Self {
        Self {
            transaction_id,
            output_index,
        }
    }

    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    pub fn output_index(&self) -> &OutputIndex {
        &self.output_index
    }
}

impl Display for Utxo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.transaction_id, self.output_index)
    }
}

/// Claims one prior output and proves ownership of it with a signature by the
/// key recorded on that output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    utxo: Utxo,
    signature: Vec<u8>,
}

impl TransactionInput {
    pub fn new(utxo: Utxo, signature: Vec<u8>) -> Self {
        Self { utxo, signature }
    }

    pub fn utxo(&self) -> &Utxo {
        &self.utxo
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionOutput {
    amount: Coin,
    recipient: PublicKey,
}

impl TransactionOutput {
    pub fn new(amount: Coin, recipient: PublicKey) -> Self {
        Self { amount, recipient }
    }

    pub fn amount(&self) -> Coin {
        self.amount
    }

    pub fn recipient(&self) -> &PublicKey {
        &self.recipient
    }
}

impl Display for TransactionOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.amount, self.recipient)
    }
}

/// A finalized transaction. The identity is computed over the full contents
/// at construction time and the contents cannot change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
}

impl Transaction {
    pub fn new(
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
    ) -> Result<Self, String> {
        let id = Self::hash_transaction_data(&inputs, &outputs)?;
        Ok(Self {
            id,
            inputs,
            outputs,
        })
    }

    /// Builds a transaction spending `claims` into `outputs`, signing each
    /// input with the key paired with it.
    pub fn signed(
        claims: &[(Utxo, &SigningKey)],
        outputs: Vec<TransactionOutput>,
    ) -> Result<Self, String> {
        let claimed = claims.iter().map(|(utxo, _)| *utxo).collect::<Vec<Utxo>>();
        let mut inputs = Vec::with_capacity(claims.len());
        for (input_index, (utxo, key)) in claims.iter().enumerate() {
            let message = data_to_sign(input_index, &claimed, &outputs)?;
            inputs.push(TransactionInput::new(*utxo, crypto::sign(key, &message)));
        }
        Self::new(inputs, outputs)
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn inputs(&self) -> &Vec<TransactionInput> {
        &self.inputs
    }

    pub fn outputs(&self) -> &Vec<TransactionOutput> {
        &self.outputs
    }

    pub fn claimed_utxos(&self) -> Vec<Utxo> {
        self.inputs
            .iter()
            .map(|input| *input.utxo())
            .collect::<Vec<Utxo>>()
    }

    /// The byte content that must have been signed for the input at `input_index`.
    pub fn data_to_sign(&self, input_index: usize) -> Result<Vec<u8>, String> {
        data_to_sign(input_index, &self.claimed_utxos(), &self.outputs)
    }

    fn hash_transaction_data(
        inputs: &Vec<TransactionInput>,
        outputs: &Vec<TransactionOutput>,
    ) -> Result<TransactionId, String> {
        let encoded = bincode::serialize(&(inputs, outputs)).map_err(|e| e.to_string())?;
        let first_hash = Sha256::digest(&encoded);
        let second_hash = Sha256::digest(first_hash.as_slice());
        Ok(TransactionId(second_hash))
    }
}

impl Display for Transaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// The canonical encoding of everything the input at `input_index` commits to:
/// its own position, every claimed UTXO reference, and every output.
/// Signatures are excluded so that signing is not circular.
pub fn data_to_sign(
    input_index: usize,
    claimed: &[Utxo],
    outputs: &[TransactionOutput],
) -> Result<Vec<u8>, String> {
    bincode::serialize(&(input_index as u64, claimed, outputs)).map_err(|e| e.to_string())
}
