/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::io::{Read, Write};

use crate::internal_common::*;
use crate::keys::PublicAddress;
use super::standard::Standard;

///A block reward transaction: no inputs, no rangeproof, and rewards
///committed with a zero blinding factor so anyone can check them.
#[derive(Debug, Clone)]
pub struct Coinbase {
    pub standard: Standard

} impl Coinbase {
    pub fn new(net_prefix: u8) -> Self {
        return Self{
            //a zero fee can't fail
            standard: Standard::new(net_prefix, 0)
                .expect("coinbase fee is never negative")
        }
    }

    ///Add a reward output of `amount` to `pub_addr`.
    ///Rewards need no proving pipeline; their values are fixed here.
    pub fn add_reward(&mut self, pub_addr: &PublicAddress, amount: u64) -> Result<(), TxError> {
        self.standard.add_output(pub_addr, amount)?;

        let output = self.standard.outputs.last_mut()
            .expect("output was just added");
        output.set_plain_value();
        return Ok(())
    }

    ///Reward outputs of this coinbase.
    pub fn rewards(&self) -> &[super::Output] {
        return &self.standard.outputs
    }

    pub fn encode<W: Write>(&self, w: &mut W) -> Result<(), SerializationError> {
        return self.standard.encode(w)
    }

    pub fn decode<R: Read>(r: &mut R) -> Result<Self, SerializationError> {
        return Ok(Self{ standard: Standard::decode(r)? })
    }
}
