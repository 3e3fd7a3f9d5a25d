/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//!The wallet's private store: one key-value namespace per wallet.
//!
//!Bucket layout (first key byte):
//!  0x00  encrypted UTXO records, keyed `P || nonce`
//!  0x01  wallet height
//!  0x02  transaction history, keyed by the record itself
//!  0x03  key-image cache, `K_I -> P`

mod record;
use record::InputRecord;

use rocksdb::{Direction, IteratorMode, WriteBatch, WriteOptions};
use tracing::debug;

use crate::internal_common::*;
use crate::transactions::{Input, Transaction};
use crate::txrecords::{Direction as TxDirection, TxRecord};

const INPUT_PREFIX: &[u8] = &[0x00];
const WALLET_HEIGHT_PREFIX: &[u8] = &[0x01];
const TX_RECORD_PREFIX: &[u8] = &[0x02];
const KEY_IMAGE_PREFIX: &[u8] = &[0x03];

///The wallet database.
pub struct DB {
    storage: rocksdb::DB

} impl DB {
    pub fn new(path: &std::path::Path) -> Result<Self, StoreError> {
        let storage = rocksdb::DB::open_default(path)
            .map_err(|e| StoreError::Storage(
                format!("wallet cannot be used without database: {}", e)))?;
        return Ok(Self{ storage })
    }

    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        return self.storage.put(key, value)
            .map_err(|e| StoreError::Storage(e.to_string()))
    }

    ///Get a value; `NotFound` is distinguished from other failures.
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>, StoreError> {
        return match self.storage.get(key) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(StoreError::NotFound),
            Err(e) => Err(StoreError::Storage(e.to_string()))
        }
    }

    pub fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        return self.storage.delete(key)
            .map_err(|e| StoreError::Storage(e.to_string()))
    }

    ///Store a received output, encrypted under the spend-key-derived key.
    ///`nonce` disambiguates the record key; the tracker passes the
    ///receiving block height so that re-scanning a block overwrites
    ///instead of duplicating.
    pub fn put_input(
        &self,
        encryption_key: &[u8],
        pub_key: &RistrettoPoint,
        amount: Scalar,
        mask: Scalar,
        priv_key: Scalar,
        unlock_height: u64,
        nonce: u64
    ) -> Result<(), StoreError> {
        let record = InputRecord{ amount, mask, priv_key, unlock_height };
        let sealed = record.seal(encryption_key)?;

        let mut key = INPUT_PREFIX.to_vec();
        key.extend_from_slice(&encode_point(pub_key));
        key.extend_from_slice(&nonce.to_le_bytes());

        return self.put(&key, &sealed)
    }

    ///Delete a spent UTXO and its key-image cache entry together.
    ///Both deletes land in one synchronous batch: a crash can never
    ///leave the cache pointing at a missing record.
    pub fn remove_input(&self, pub_key: &[u8], key_image: &[u8]) -> Result<(), StoreError> {
        let mut batch = WriteBatch::default();

        //the stored key carries a trailing nonce, so scan for it
        let mut prefix = INPUT_PREFIX.to_vec();
        prefix.extend_from_slice(pub_key);
        for entry in self.storage.iterator(IteratorMode::From(&prefix, Direction::Forward)) {
            let (key, _) = entry.map_err(|e| StoreError::Storage(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break
            }
            batch.delete(key);
        }

        let mut key_image_key = KEY_IMAGE_PREFIX.to_vec();
        key_image_key.extend_from_slice(key_image);
        batch.delete(key_image_key);

        let mut options = WriteOptions::default();
        options.set_sync(true);
        return self.storage.write_opt(batch, &options)
            .map_err(|e| StoreError::Storage(e.to_string()))
    }

    ///Collect unlocked inputs until their sum covers `amount`.
    ///
    ///Selection is greedy in the store's key order, so it is deterministic
    ///for a given store state, not value-optimal. The surplus comes back
    ///as change.
    pub fn fetch_inputs(&self, decryption_key: &[u8], amount: i64) -> Result<(Vec<Input>, i64), StoreError> {
        let mut inputs: Vec<InputRecord> = Vec::new();
        let mut total_amount = amount;

        for entry in self.storage.iterator(IteratorMode::From(INPUT_PREFIX, Direction::Forward)) {
            let (key, value) = entry.map_err(|e| StoreError::Storage(e.to_string()))?;
            if !key.starts_with(INPUT_PREFIX) {
                break
            }

            let record = InputRecord::open(&value, decryption_key)?;

            //only unlocked inputs are spendable
            if record.unlock_height == 0 {
                total_amount -= scalar_to_u64(&record.amount) as i64;
                inputs.push(record);

                if total_amount <= 0 {
                    break
                }
            }
        }

        if total_amount > 0 {
            return Err(StoreError::InsufficientFunds)
        }

        let change_amount = -total_amount;
        debug!(inputs = inputs.len(), change = change_amount, "selected inputs");

        let inputs = inputs.into_iter()
            .map(|record| Input::new(
                scalar_to_u64(&record.amount), record.mask, record.priv_key))
            .collect();

        return Ok((inputs, change_amount))
    }

    ///Sum the unlocked and locked amounts over the whole input bucket.
    pub fn fetch_balance(&self, decryption_key: &[u8]) -> Result<(u64, u64), StoreError> {
        let mut unlocked_balance: u64 = 0;
        let mut locked_balance: u64 = 0;

        for entry in self.storage.iterator(IteratorMode::From(INPUT_PREFIX, Direction::Forward)) {
            let (key, value) = entry.map_err(|e| StoreError::Storage(e.to_string()))?;
            if !key.starts_with(INPUT_PREFIX) {
                break
            }

            let record = InputRecord::open(&value, decryption_key)?;
            match record.unlock_height == 0 {
                true => unlocked_balance += scalar_to_u64(&record.amount),
                false => locked_balance += scalar_to_u64(&record.amount)
            }
        }

        return Ok((unlocked_balance, locked_balance))
    }

    ///Unlock every input whose lock has expired:
    ///`0 < unlock_height <= height` is rewritten with `unlock_height = 0`.
    pub fn update_locked_inputs(&self, decryption_key: &[u8], height: u64) -> Result<(), StoreError> {
        for entry in self.storage.iterator(IteratorMode::From(INPUT_PREFIX, Direction::Forward)) {
            let (key, value) = entry.map_err(|e| StoreError::Storage(e.to_string()))?;
            if !key.starts_with(INPUT_PREFIX) {
                break
            }

            let mut record = InputRecord::open(&value, decryption_key)?;
            if record.unlock_height != 0 && record.unlock_height <= height {
                debug!(unlock_height = record.unlock_height, height, "unlocking input");

                record.unlock_height = 0;
                let sealed = record.seal(decryption_key)?;
                self.put(&key, &sealed)?;
            }
        }

        return Ok(())
    }

    pub fn get_wallet_height(&self) -> Result<u64, StoreError> {
        let bytes = self.get(WALLET_HEIGHT_PREFIX)?;
        if bytes.len() != 8 {
            return Err(StoreError::DecodeFailed)
        }

        return Ok(u64::from_le_bytes(bytes.as_slice().try_into()
            .map_err(|_| StoreError::DecodeFailed)?))
    }

    pub fn update_wallet_height(&self, new_height: u64) -> Result<(), StoreError> {
        return self.put(WALLET_HEIGHT_PREFIX, &new_height.to_le_bytes())
    }

    ///Record a classified transaction in the history bucket.
    ///The record itself is the key, so re-recording is idempotent.
    pub fn put_tx_record(
        &self, tx: &Transaction, direction: TxDirection, priv_view: &Scalar
    ) -> Result<(), StoreError> {
        let height = self.get_wallet_height()?;
        let record = TxRecord::new(tx, height, direction, priv_view);

        let mut buf: Vec<u8> = Vec::new();
        record.encode(&mut buf)
            .map_err(|_| StoreError::Storage("failed to encode tx record".to_string()))?;

        let mut key = TX_RECORD_PREFIX.to_vec();
        key.extend_from_slice(&buf);

        return self.put(&key, &[0x00])
    }

    pub fn fetch_tx_records(&self) -> Result<Vec<TxRecord>, StoreError> {
        let mut records: Vec<TxRecord> = Vec::new();

        for entry in self.storage.iterator(IteratorMode::From(TX_RECORD_PREFIX, Direction::Forward)) {
            let (key, _) = entry.map_err(|e| StoreError::Storage(e.to_string()))?;
            if !key.starts_with(TX_RECORD_PREFIX) {
                break
            }

            //the record is the key without the prefix
            let record = TxRecord::decode(&mut &key[1..])
                .map_err(|_| StoreError::DecodeFailed)?;
            records.push(record);
        }

        return Ok(records)
    }

    ///Cache a key image so spends of our outputs are a single lookup.
    pub fn put_key_image(&self, key_image: &[u8], output_key: &[u8]) -> Result<(), StoreError> {
        let mut key = KEY_IMAGE_PREFIX.to_vec();
        key.extend_from_slice(key_image);
        return self.put(&key, output_key)
    }

    ///Look up the destination key a cached key image points at.
    pub fn get_pub_key(&self, key_image: &[u8]) -> Result<Vec<u8>, StoreError> {
        let mut key = KEY_IMAGE_PREFIX.to_vec();
        key.extend_from_slice(key_image);
        return self.get(&key)
    }

    ///Close the store, flushing it to disk.
    pub fn close(self) {
        //rocksdb flushes and releases its lock on drop
    }

    ///Remove all information from the database.
    pub fn clear(&self) -> Result<(), StoreError> {
        for entry in self.storage.iterator(IteratorMode::Start) {
            let (key, _) = entry.map_err(|e| StoreError::Storage(e.to_string()))?;
            self.delete(&key)?;
        }
        return Ok(())
    }
}
