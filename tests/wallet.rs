// SPDX short identifier: Unlicense

use std::path::PathBuf;

use tempfile::TempDir;

use veilwallet::{
    common::*,
    block::Block,
    database::DB,
    keys::{KeyPair, PublicAddress},
    pedersen::Commitment,
    transactions::{
        decrypt_mask,
        Decoy,
        Decoys,
        Input,
        Standard,
        Timelock,
        Transaction
    },
    txrecords::Direction,
    wallet::Wallet
};

const NET_PREFIX: u8 = 1;

fn generate_decoys(num_mixins: usize) -> Decoys {
    let mut decoys: Decoys = Vec::new();
    for _ in 0..num_mixins {
        let pub_key = random_point();
        decoys.push(Decoy{
            commitment: random_point(),
            pub_key,
            offset: encode_point(&pub_key)[..5].to_vec()
        });
    }
    return decoys
}

fn make_wallet(dir: &TempDir, seed: &[u8]) -> (Wallet, PathBuf) {
    let db = DB::new(&dir.path().join("db")).unwrap();
    let seed_file = dir.path().join("seed.dat");
    let wallet = Wallet::load_from_seed(seed, NET_PREFIX, db, "password", &seed_file).unwrap();
    return (wallet, seed_file)
}

///the literal test seed: "this is the users seed", zero-padded to 64 bytes
fn users_seed() -> [u8; 64] {
    let mut seed = [0u8; 64];
    seed[..22].copy_from_slice(b"this is the users seed");
    return seed
}

///A funding transaction with outputs only; nothing to sign.
fn faucet_standard(addr: &PublicAddress, amount: u64) -> Transaction {
    let mut standard = Standard::new(NET_PREFIX, 0).unwrap();
    standard.add_output(addr, amount).unwrap();

    let mut tx = Transaction::Standard(standard);
    tx.prove(generate_decoys).unwrap();
    return tx
}

fn faucet_timelock(addr: &PublicAddress, amount: u64, lock: u64) -> Transaction {
    let mut timelock = Timelock::new(NET_PREFIX, 0, lock).unwrap();
    timelock.standard.add_output(addr, amount).unwrap();

    let mut tx = Transaction::Timelock(timelock);
    tx.prove(generate_decoys).unwrap();
    return tx
}

#[test]
fn send_and_detect() {
    let dir = TempDir::new().unwrap();
    let seed = users_seed();
    let (wallet, _) = make_wallet(&dir, &seed);

    //fund the wallet
    let mut blk = Block::new(0);
    blk.add_tx(faucet_standard(&wallet.public_address(), 500));
    let (spent, received) = wallet.check_wire_block(&blk).unwrap();
    assert_eq!((spent, received), (0, 1));
    assert_eq!(wallet.balance().unwrap(), (500, 0));

    //two outputs of 10 to our own address, fee 20
    let mut tx = wallet.new_standard_tx(20).unwrap();
    let addr = wallet.public_address();
    tx.standard_mut().add_output(&addr, 10).unwrap();
    tx.standard_mut().add_output(&addr, 10).unwrap();

    wallet.sign(&mut tx, generate_decoys).unwrap();

    assert!(!tx.standard().inputs.is_empty());
    assert!(!tx.standard().outputs.is_empty());

    //every input verifies
    tx.verify().unwrap();
    let msg = tx.hash().unwrap();
    for input in &tx.standard().inputs {
        input.verify(&msg).unwrap();
    }

    //the rangeproof verifies against the output commitments
    let commitments: Vec<Commitment> = tx.standard().outputs.iter()
        .map(|output| output.commitment)
        .collect();
    tx.standard().range_proof.as_ref().unwrap()
        .verify(&commitments).unwrap();

    //the sender's own keys detect every output (all go back to us)
    let keys = KeyPair::new(&seed).unwrap();
    let standard = tx.standard();
    for output in &standard.outputs {
        let one_time = keys
            .did_receive_tx(&standard.big_r, &output.dest, output.index)
            .expect("output should be ours");
        assert_eq!(&one_time * G, output.dest.to_point());
    }

    //the transaction balances: inputs - outputs - fee*H == 0
    assert!(Commitment::is_balanced(
        standard.inputs.iter().map(|input| input.pseudo_commitment).collect(),
        standard.outputs.iter().map(|output| output.commitment).collect(),
        20
    ));
}

#[test]
fn double_spend_detection() {
    let dir = TempDir::new().unwrap();
    let seed = [21u8; 64];
    let (wallet, _) = make_wallet(&dir, &seed);

    //block 0: receive an output of 100
    let faucet = faucet_standard(&wallet.public_address(), 100);
    let mut blk = Block::new(0);
    blk.add_tx(faucet.clone());
    let (_, received) = wallet.check_wire_block(&blk).unwrap();
    assert_eq!(received, 1);
    assert_eq!(wallet.balance().unwrap(), (100, 0));

    //craft the spend of that output from the receiver's keys
    let keys = KeyPair::new(&seed).unwrap();
    let standard = faucet.standard();
    let output = &standard.outputs[0];
    let priv_key = keys
        .did_receive_tx(&standard.big_r, &output.dest, output.index)
        .unwrap();
    let mask = decrypt_mask(&output.encrypted_mask, &standard.big_r, output.index, keys.private_view());

    let other_addr = KeyPair::new(&[99u8; 64]).unwrap()
        .public_key().public_address(NET_PREFIX);
    let mut spend = Standard::new(NET_PREFIX, 0).unwrap();
    spend.add_output(&other_addr, 100).unwrap();
    spend.add_input(Input::new(100, mask, priv_key)).unwrap();

    let mut spend_tx = Transaction::Standard(spend);
    spend_tx.prove(generate_decoys).unwrap();

    //block 1: the spend is detected and the UTXO disappears
    let mut blk = Block::new(1);
    blk.add_tx(spend_tx.clone());
    let (spent, _) = wallet.check_wire_block(&blk).unwrap();
    assert_eq!(spent, 1);
    assert_eq!(wallet.balance().unwrap(), (0, 0));

    //block 2: the same key image again is a no-op,
    //because the cache entry is gone
    let mut blk = Block::new(2);
    blk.add_tx(spend_tx);
    let (spent, _) = wallet.check_wire_block(&blk).unwrap();
    assert_eq!(spent, 0);
}

#[test]
fn timelock_unlock() {
    let dir = TempDir::new().unwrap();
    let seed = [22u8; 64];
    let (wallet, _) = make_wallet(&dir, &seed);

    //block 0: a locked deposit of 100, unlocking at height 3
    let mut blk = Block::new(0);
    blk.add_tx(faucet_timelock(&wallet.public_address(), 100, 3));
    wallet.check_wire_block(&blk).unwrap();

    assert_eq!(wallet.balance().unwrap(), (0, 100));

    //locked funds cannot be selected
    let mut tx = wallet.new_standard_tx(0).unwrap();
    let addr = wallet.public_address();
    tx.standard_mut().add_output(&addr, 10).unwrap();
    assert!(matches!(
        wallet.sign(&mut tx, generate_decoys),
        Err(WalletError::Store(StoreError::InsufficientFunds))
    ));

    //advance the chain past the unlock height
    for height in 1..=3 {
        wallet.check_wire_block(&Block::new(height)).unwrap();
    }
    assert_eq!(wallet.balance().unwrap(), (100, 0));

    //now the deposit is spendable
    let mut tx = wallet.new_standard_tx(0).unwrap();
    tx.standard_mut().add_output(&addr, 10).unwrap();
    wallet.sign(&mut tx, generate_decoys).unwrap();
}

#[test]
fn height_gating() {
    let dir = TempDir::new().unwrap();
    let (wallet, _) = make_wallet(&dir, &[23u8; 64]);

    for height in 0..5 {
        wallet.check_wire_block(&Block::new(height)).unwrap();
    }
    assert_eq!(wallet.saved_height().unwrap(), 5);

    //a block two heights ahead must be rejected, never reordered
    assert!(matches!(
        wallet.check_wire_block(&Block::new(7)),
        Err(WalletError::HeightMismatch{ expected: 5, got: 7 })
    ));

    //and so must a replay of an already processed height
    assert!(matches!(
        wallet.check_wire_block(&Block::new(3)),
        Err(WalletError::HeightMismatch{ .. })
    ));
}

#[test]
fn coinbase_rewards_are_plaintext() {
    let dir = TempDir::new().unwrap();
    let seed = [24u8; 64];
    let (wallet, _) = make_wallet(&dir, &seed);

    let mut coinbase = wallet.new_coinbase_tx();
    if let Transaction::Coinbase(ref mut cb) = coinbase {
        cb.add_reward(&wallet.public_address(), 50).unwrap();
    }

    let mut blk = Block::new(0);
    blk.add_tx(coinbase);
    let (_, received) = wallet.check_wire_block(&blk).unwrap();

    assert_eq!(received, 1);
    assert_eq!(wallet.balance().unwrap(), (50, 0));
}

#[test]
fn stake_locks_only_its_first_output() {
    let dir = TempDir::new().unwrap();
    let seed = [27u8; 64];
    let (wallet, _) = make_wallet(&dir, &seed);

    //block 0: fund with 300
    let mut blk = Block::new(0);
    blk.add_tx(faucet_standard(&wallet.public_address(), 300));
    wallet.check_wire_block(&blk).unwrap();

    //stake 100 for 10 blocks; sign adds the change output after it
    let mut stake = wallet.new_stake_tx(0, 10, 100).unwrap();
    wallet.sign(&mut stake, generate_decoys).unwrap();
    assert!(!stake.should_encrypt_values());

    //block 1: the stake output locks, the change does not
    let mut blk = Block::new(1);
    blk.add_tx(stake);
    let (_, received) = wallet.check_wire_block(&blk).unwrap();
    assert_eq!(received, 2);

    let (unlocked, locked) = wallet.balance().unwrap();
    assert_eq!(locked, 100);
    assert_eq!(unlocked, 200);

    //the lock expires at height 1 + 10
    for height in 2..=11 {
        wallet.check_wire_block(&Block::new(height)).unwrap();
    }
    assert_eq!(wallet.balance().unwrap(), (300, 0));
}

#[test]
fn history_records() {
    let dir = TempDir::new().unwrap();
    let seed = [25u8; 64];
    let (wallet, _) = make_wallet(&dir, &seed);

    let mut blk = Block::new(0);
    blk.add_tx(faucet_standard(&wallet.public_address(), 300));
    wallet.check_wire_block(&blk).unwrap();

    let records = wallet.tx_history().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].direction, Direction::In);
    assert_eq!(records[0].amount, 300);
    assert_eq!(records[0].height, 0);

    //unconfirmed transactions show up in the unconfirmed balance
    let pending = faucet_standard(&wallet.public_address(), 70);
    assert_eq!(wallet.unconfirmed_balance(&[pending]), 70);
}

#[test]
fn wallet_reopens_from_seed_file() {
    let dir = TempDir::new().unwrap();
    let seed = [26u8; 64];
    let (wallet, seed_file) = make_wallet(&dir, &seed);
    let address = wallet.public_address();
    drop(wallet);

    //a second wallet may not overwrite the seed file
    let db = DB::new(&dir.path().join("db2")).unwrap();
    assert!(matches!(
        Wallet::load_from_seed(&seed, NET_PREFIX, db, "password", &seed_file),
        Err(WalletError::SeedFileExists)
    ));

    //reopening from the encrypted file restores the same keys
    let db = DB::new(&dir.path().join("db3")).unwrap();
    let reopened = Wallet::load_from_file(NET_PREFIX, db, "password", &seed_file).unwrap();
    assert_eq!(reopened.public_address().as_str(), address.as_str());

    //consensus keys are deterministic from the seed too
    assert_eq!(reopened.consensus_keys().bls_public.len(), 96);
}

#[test]
fn short_seed_rejected() {
    let dir = TempDir::new().unwrap();
    let db = DB::new(&dir.path().join("db")).unwrap();

    assert!(matches!(
        Wallet::load_from_seed(&[0u8; 32], NET_PREFIX, db, "password", &dir.path().join("seed.dat")),
        Err(WalletError::SeedTooShort)
    ));
}
