pub mod coin;
pub mod commands;
pub mod crypto;
pub mod hash;
pub mod ledger;
pub mod public_key;
pub mod transaction;
pub mod utxo_pool;
pub mod validation;

pub use self::{
    coin::*, crypto::*, hash::*, ledger::*, public_key::*, transaction::*, utxo_pool::*,
    validation::*,
};
