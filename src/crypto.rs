use crate::public_key::PublicKey;
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A failure of the signature capability itself, as opposed to a signature
/// that simply does not verify. A key that does not decode as a curve point
/// comes from the UTXO pool, i.e. from the caller's own data, so it indicates
/// a bug rather than an adversarial transaction and must not be collapsed
/// into an "invalid signature" outcome.
#[derive(Debug, Eq, PartialEq)]
pub enum CryptoError {
    MalformedKey(String),
}

impl Display for CryptoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CryptoError::MalformedKey(message) => {
                write!(f, "Malformed public key: {}", message)
            }
        }
    }
}

impl Error for CryptoError {}

/// Checks that `signature` is a valid signature of `message` under the key `owner`.
/// Deterministic and side-effect free.
///
/// A signature blob of the wrong shape is carried by the transaction being
/// validated, so it is an ordinary verification failure, not an error.
pub fn verify_signature(
    owner: &PublicKey,
    message: &[u8],
    signature: &[u8],
) -> Result<bool, CryptoError> {
    let verifying_key = VerifyingKey::from_bytes(owner.as_bytes())
        .map_err(|e| CryptoError::MalformedKey(e.to_string()))?;
    let signature = match Signature::from_slice(signature) {
        Ok(signature) => signature,
        Err(_) => return Ok(false),
    };
    Ok(verifying_key.verify_strict(message, &signature).is_ok())
}

/// Signs `message` with `key` and returns the raw signature bytes.
pub fn sign(key: &SigningKey, message: &[u8]) -> Vec<u8> {
    key.sign(message).to_bytes().to_vec()
}

/// The public counterpart of `key`, in the ledger's key representation.
pub fn public_key(key: &SigningKey) -> PublicKey {
    PublicKey::from_raw(key.verifying_key().to_bytes())
}
