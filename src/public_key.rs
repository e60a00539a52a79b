use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

const PUBLIC_KEY_BYTE_COUNT: usize = 32;

/// The raw bytes of an Ed25519 verifying key, identifying the owner of an output.
/// Decoding into an actual curve point is deferred until signature verification.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct PublicKey([u8; PUBLIC_KEY_BYTE_COUNT]);

impl PublicKey {
    pub const fn from_raw(raw_bytes: [u8; PUBLIC_KEY_BYTE_COUNT]) -> Self {
        Self(raw_bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_BYTE_COUNT] {
        &self.0
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}
