/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::io::{Read, Write};

use crate::internal_common::*;
use super::timelock::Timelock;

///A locked transaction registering a consensus key.
///Stake amounts are public, so its value fields stay unencrypted.
#[derive(Debug, Clone)]
pub struct Stake {
    pub timelock: Timelock,
    ///Compressed BLS public key of the staker
    pub bls_public: Vec<u8>

} impl Stake {
    pub fn new(net_prefix: u8, fee: i64, lock: u64, bls_public: Vec<u8>) -> Result<Self, TxError> {
        return Ok(Self{
            timelock: Timelock::new(net_prefix, fee, lock)?,
            bls_public
        })
    }

    pub fn encode<W: Write>(&self, w: &mut W) -> Result<(), SerializationError> {
        self.timelock.encode(w)?;
        return write_var_bytes(w, &self.bls_public)
    }

    pub fn decode<R: Read>(r: &mut R) -> Result<Self, SerializationError> {
        let timelock = Timelock::decode(r)?;
        let bls_public = read_var_bytes(r)?;
        return Ok(Self{ timelock, bls_public })
    }
}
