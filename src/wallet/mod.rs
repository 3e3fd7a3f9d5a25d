/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//!The wallet: chain tracking, UTXO bookkeeping, and transaction signing.
//!
//!Blocks must be fed strictly in height order. Scanning a block detects
//!spends of our outputs (by key image), detects receipts (by stealth
//!address), and advances the wallet height, which doubles as the
//!crash-recovery delimiter: a partially applied block is simply re-scanned.

mod seed;
mod consensus;

pub use consensus::ConsensusKeys;

use std::path::Path;

use rand::{thread_rng, Rng};
use tracing::{debug, info};

use crate::internal_common::*;
use crate::block::Block;
use crate::database::DB;
use crate::keys::{KeyPair, PublicAddress, PublicKey};
use crate::mlsag::calculate_key_image;
use crate::transactions::{
    decrypt_amount,
    decrypt_mask,
    Bid,
    Coinbase,
    Decoys,
    Stake,
    Standard,
    Timelock,
    Transaction
};
use crate::txrecords::{Direction, TxRecord};

///A single wallet instance over its private store.
pub struct Wallet {
    db: DB,
    net_prefix: u8,
    key_pair: KeyPair,
    consensus_keys: ConsensusKeys

} impl Wallet {
    ///Create a wallet from fresh randomness.
    ///Seeds that cannot produce consensus keys are redrawn.
    pub fn new(net_prefix: u8, db: DB, password: &str, file: &Path) -> Result<Self, WalletError> {
        let mut seed = [0u8; 64];
        loop {
            thread_rng().fill(&mut seed[..]);
            if ConsensusKeys::generate(&seed).is_ok() {
                break
            }
        }

        return Self::load_from_seed(&seed, net_prefix, db, password, file)
    }

    ///Create a wallet from a known seed of at least 64 bytes,
    ///writing the encrypted seed file.
    pub fn load_from_seed(
        seed: &[u8], net_prefix: u8, db: DB, password: &str, file: &Path
    ) -> Result<Self, WalletError> {
        if seed.len() < 64 {
            return Err(WalletError::SeedTooShort)
        }

        seed::save_seed(seed, password, file)?;
        return Self::from_seed_internal(seed, net_prefix, db)
    }

    ///Reopen a wallet from its encrypted seed file.
    pub fn load_from_file(
        net_prefix: u8, db: DB, password: &str, file: &Path
    ) -> Result<Self, WalletError> {
        let seed = seed::fetch_seed(password, file)?;
        return Self::from_seed_internal(&seed, net_prefix, db)
    }

    fn from_seed_internal(seed: &[u8], net_prefix: u8, db: DB) -> Result<Self, WalletError> {
        let consensus_keys = ConsensusKeys::generate(seed)?;
        let key_pair = KeyPair::new(seed)?;

        let wallet = Self{ db, net_prefix, key_pair, consensus_keys };

        //a fresh store starts tracking at height zero
        match wallet.db.get_wallet_height() {
            Ok(_) => (),
            Err(StoreError::NotFound) => wallet.db.update_wallet_height(0)?,
            Err(e) => return Err(e.into())
        }

        return Ok(wallet)
    }

    pub fn new_standard_tx(&self, fee: i64) -> Result<Transaction, TxError> {
        return Ok(Transaction::Standard(Standard::new(self.net_prefix, fee)?))
    }

    pub fn new_timelock_tx(&self, fee: i64, lock: u64) -> Result<Transaction, TxError> {
        return Ok(Transaction::Timelock(Timelock::new(self.net_prefix, fee, lock)?))
    }

    ///Build a bid transaction sending `amount` back to this wallet,
    ///locked for `lock` blocks.
    pub fn new_bid_tx(&self, fee: i64, lock: u64, amount: u64) -> Result<Transaction, TxError> {
        //auxiliary bytes are deterministic from the spend key and the
        //number of bids this wallet has made
        let m = self.bid_m(0);
        let mut bid = Bid::new(self.net_prefix, fee, lock, m)?;

        let own_addr = self.public_address();
        bid.timelock.standard.add_output(&own_addr, amount)?;

        return Ok(Transaction::Bid(bid))
    }

    ///Build a stake transaction sending `amount` back to this wallet,
    ///locked for `lock` blocks and carrying the BLS public key.
    pub fn new_stake_tx(&self, fee: i64, lock: u64, amount: u64) -> Result<Transaction, TxError> {
        let mut stake = Stake::new(
            self.net_prefix, fee, lock, self.consensus_keys.bls_public.clone())?;

        let own_addr = self.public_address();
        stake.timelock.standard.add_output(&own_addr, amount)?;

        return Ok(Transaction::Stake(stake))
    }

    pub fn new_coinbase_tx(&self) -> Transaction {
        return Transaction::Coinbase(Coinbase::new(self.net_prefix))
    }

    ///Scan one confirmed block.
    ///
    ///The block must sit exactly at the wallet's height; anything else is
    ///a `HeightMismatch` so the caller can never reorder history.
    ///Returns how many of our outputs were spent and received.
    pub fn check_wire_block(&self, blk: &Block) -> Result<(u64, u64), WalletError> {
        let wallet_height = self.saved_height()?;
        if blk.header.height != wallet_height {
            return Err(WalletError::HeightMismatch{
                expected: wallet_height,
                got: blk.header.height
            })
        }

        let spent_count = self.check_block_spent(blk)?;
        let received_count = self.check_block_received(blk)?;

        self.update_wallet_height(blk.header.height + 1)?;

        self.db.update_locked_inputs(
            &self.key_pair.private_spend().to_bytes(), blk.header.height)?;

        info!(
            height = blk.header.height,
            spent = spent_count,
            received = received_count,
            "processed block"
        );
        return Ok((spent_count, received_count))
    }

    ///Detect spends of our outputs: any input whose key image sits in the
    ///cache consumes one of our UTXOs.
    fn check_block_spent(&self, blk: &Block) -> Result<u64, WalletError> {
        let mut spent_count: u64 = 0;

        for tx in &blk.txs {
            let mut tx_spent: u64 = 0;

            for input in &tx.standard().inputs {
                let key_image = encode_point(&input.key_image);

                let pub_key = match self.db.get_pub_key(&key_image) {
                    Ok(pub_key) => pub_key,
                    //a miss just means the input is not ours
                    Err(StoreError::NotFound) => continue,
                    Err(e) => return Err(e.into())
                };

                debug!(height = blk.header.height, "detected spent output");
                self.db.remove_input(&pub_key, &key_image)?;
                tx_spent += 1;
            }

            if tx_spent > 0 && !tx.standard().outputs.is_empty() {
                self.db.put_tx_record(tx, Direction::Out, self.key_pair.private_view())?;
            }
            spent_count += tx_spent;
        }

        return Ok(spent_count)
    }

    ///Detect receipts: any output whose stealth address resolves against
    ///our view key becomes a stored UTXO plus a cached key image.
    fn check_block_received(&self, blk: &Block) -> Result<u64, WalletError> {
        let priv_view = self.key_pair.private_view().to_owned();
        let priv_spend_bytes = self.key_pair.private_spend().to_bytes();

        let mut received_count: u64 = 0;

        for tx in &blk.txs {
            let standard = tx.standard();
            let mut tx_received: u64 = 0;

            for output in &standard.outputs {
                let priv_key = match self.key_pair.did_receive_tx(
                    &standard.big_r, &output.dest, output.index
                ) {
                    Some(priv_key) => priv_key,
                    None => continue
                };

                let (amount, mask) = match tx.should_encrypt_values() {
                    true => (
                        decrypt_amount(&output.encrypted_amount, &standard.big_r, output.index, &priv_view),
                        decrypt_mask(&output.encrypted_mask, &standard.big_r, output.index, &priv_view)
                    ),
                    false => (output.encrypted_amount, output.encrypted_mask)
                };

                //only the first output takes the lock, so change
                //added after the real outputs is never frozen
                let unlock_height = match output.index == 0 && tx.lock_time() > 0 {
                    true => blk.header.height + tx.lock_time(),
                    false => 0
                };

                debug!(
                    height = blk.header.height,
                    index = output.index,
                    unlock_height,
                    "detected received output"
                );

                //the record nonce is the block height: re-scanning the
                //same block overwrites instead of duplicating
                self.db.put_input(
                    &priv_spend_bytes,
                    &output.dest.to_point(),
                    amount,
                    mask,
                    priv_key,
                    unlock_height,
                    blk.header.height
                )?;

                //cache the key image for fast spend detection
                let key_image = calculate_key_image(&priv_key, &output.dest.to_point());
                self.db.put_key_image(
                    &encode_point(&key_image),
                    &encode_point(&output.dest.to_point())
                )?;

                tx_received += 1;
            }

            if tx_received > 0 {
                self.db.put_tx_record(tx, Direction::In, self.key_pair.private_view())?;
            }
            received_count += tx_received;
        }

        return Ok(received_count)
    }

    ///Sum the detected amounts addressed to us in not-yet-confirmed
    ///transactions.
    pub fn unconfirmed_balance(&self, txs: &[Transaction]) -> u64 {
        let priv_view = self.key_pair.private_view();
        let mut balance: u64 = 0;

        for tx in txs {
            let standard = tx.standard();
            for output in &standard.outputs {
                if self.key_pair.did_receive_tx(&standard.big_r, &output.dest, output.index).is_none() {
                    continue
                }

                let amount = match tx.should_encrypt_values() {
                    true => decrypt_amount(&output.encrypted_amount, &standard.big_r, output.index, priv_view),
                    false => output.encrypted_amount
                };
                balance += scalar_to_u64(&amount);
            }
        }

        return balance
    }

    ///Fetch inputs covering the outputs plus the fee,
    ///and route the surplus back to us as change.
    fn add_inputs(&self, tx: &mut Transaction) -> Result<(), WalletError> {
        let standard = tx.standard_mut();
        let total_amount = standard.fee as i64 + standard.total_sent() as i64;

        let (inputs, change_amount) = self.db.fetch_inputs(
            &self.key_pair.private_spend().to_bytes(), total_amount)?;

        for input in inputs {
            standard.add_input(input).map_err(WalletError::Tx)?;
        }

        let change_addr = self.public_address();
        standard.add_output(&change_addr, change_amount as u64).map_err(WalletError::Tx)?;

        return Ok(())
    }

    ///Fund, prove, and sign a transaction.
    ///Assumes the caller has already added all of the real outputs.
    pub fn sign<F>(&self, tx: &mut Transaction, fetch_decoys: F) -> Result<(), WalletError>
        where F: FnMut(usize) -> Decoys
    {
        self.add_inputs(tx)?;
        tx.prove(fetch_decoys)?;

        //drop the consumed UTXOs right away, so transactions sent in
        //quick succession cannot accidentally double-spend
        for input in &tx.standard().inputs {
            let key_image = encode_point(&input.key_image);
            let pub_key = match self.db.get_pub_key(&key_image) {
                Ok(pub_key) => pub_key,
                Err(StoreError::NotFound) => continue,
                Err(e) => return Err(e.into())
            };
            self.db.remove_input(&pub_key, &key_image)?;
        }

        return Ok(())
    }

    ///The unlocked and locked balances of this wallet.
    pub fn balance(&self) -> Result<(u64, u64), WalletError> {
        return Ok(self.db.fetch_balance(&self.key_pair.private_spend().to_bytes())?)
    }

    ///Everything this wallet has sent and received.
    pub fn tx_history(&self) -> Result<Vec<TxRecord>, WalletError> {
        return Ok(self.db.fetch_tx_records()?)
    }

    pub fn saved_height(&self) -> Result<u64, WalletError> {
        return Ok(self.db.get_wallet_height()?)
    }

    pub fn update_wallet_height(&self, new_height: u64) -> Result<(), WalletError> {
        return Ok(self.db.update_wallet_height(new_height)?)
    }

    pub fn public_key(&self) -> PublicKey {
        return self.key_pair.public_key()
    }

    pub fn public_address(&self) -> PublicAddress {
        return self.key_pair.public_key().public_address(self.net_prefix)
    }

    pub fn consensus_keys(&self) -> &ConsensusKeys {
        return &self.consensus_keys
    }

    pub fn private_spend(&self) -> Vec<u8> {
        return self.key_pair.private_spend().to_bytes().to_vec()
    }

    ///Remove all information from the wallet's store.
    pub fn clear_database(&self) -> Result<(), WalletError> {
        return Ok(self.db.clear()?)
    }

    ///deterministic bid bytes: `H_s(priv_spend || bid_index)`
    fn bid_m(&self, index: u32) -> Vec<u8> {
        let bytes = [
            &self.key_pair.private_spend().to_bytes()[..],
            &index.to_be_bytes()
        ].concat();
        return derive_scalar(&bytes).to_bytes().to_vec()
    }
}
