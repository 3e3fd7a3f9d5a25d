/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::transactions::Transaction;

///The header fields the wallet cares about.
#[derive(Debug, Clone, Default)]
pub struct BlockHeader {
    pub height: u64,
    pub timestamp: i64
}

///A confirmed block as handed to the chain tracker.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub header: BlockHeader,
    pub txs: Vec<Transaction>

} impl Block {
    pub fn new(height: u64) -> Self {
        return Self{
            header: BlockHeader{ height, timestamp: 0 },
            txs: Vec::new()
        }
    }

    pub fn add_tx(&mut self, tx: Transaction) {
        self.txs.push(tx);
    }
}
