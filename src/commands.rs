use crate::coin::Coin;
use crate::crypto::public_key;
use crate::ledger::Ledger;
use crate::transaction::{OutputIndex, Transaction, TransactionOutput, Utxo};
use crate::utxo_pool::UtxoPool;
use clap::{App, Arg, ArgMatches};
use ed25519_dalek::SigningKey;
use std::error::Error;

struct DemoCliOptions {
    amount: f64,
}

impl DemoCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            amount: matches.value_of("amount").unwrap().parse::<f64>()?,
        })
    }
}

pub fn demo_command() -> App<'static> {
    App::new("demo")
        .version("0.1")
        .about("Settles one example round: a mint output spent through a same-round chain.")
        .arg(
            Arg::new("amount")
                .short('a')
                .long("amount")
                .value_name("COINS")
                .about("Value of the minted output that seeds the pool.")
                .takes_value(true)
                .default_value("10"),
        )
}

pub fn run_demo_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = DemoCliOptions::parse(matches)?;

    // Deterministic demo keys.
    let scrooge = SigningKey::from_bytes(&[1u8; 32]);
    let alice = SigningKey::from_bytes(&[2u8; 32]);
    let bob = SigningKey::from_bytes(&[3u8; 32]);

    // The pool is seeded externally: a mint has no inputs, so it can never
    // pass validation itself and its outputs enter the pool by construction.
    let mint = Transaction::new(
        vec![],
        vec![TransactionOutput::new(
            Coin::new(options.amount),
            public_key(&scrooge),
        )],
    )?;
    let minted = Utxo::new(*mint.id(), OutputIndex::new(0));
    let mut pool = UtxoPool::new();
    pool.add(minted, mint.outputs()[0].clone());
    println!("Seeded pool with {}: {}", minted, mint.outputs()[0]);

    // Scrooge pays alice; alice pays bob from the output created in the same
    // round; a second spend of the mint output loses to the first.
    let to_alice = Transaction::signed(
        &[(minted, &scrooge)],
        vec![TransactionOutput::new(
            Coin::new(options.amount / 2.0),
            public_key(&alice),
        )],
    )?;
    let to_bob = Transaction::signed(
        &[(Utxo::new(*to_alice.id(), OutputIndex::new(0)), &alice)],
        vec![TransactionOutput::new(
            Coin::new(options.amount / 4.0),
            public_key(&bob),
        )],
    )?;
    let double_spend = Transaction::signed(
        &[(minted, &scrooge)],
        vec![TransactionOutput::new(
            Coin::new(options.amount),
            public_key(&bob),
        )],
    )?;

    let mut ledger = Ledger::new(&pool);
    // Submitted consumer-first to show the fixed point resolving the chain.
    let accepted = ledger.settle_round(vec![to_bob, to_alice, double_spend])?;

    println!("Accepted {} transaction(s):", accepted.len());
    for tx in &accepted {
        println!("  {}", tx.id());
    }
    println!("Pool after the round:");
    for (utxo, output) in ledger.utxo_pool().utxos() {
        println!("  {} -> {}", utxo, output);
    }
    Ok(())
}
