/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::io::{Read, Write};

use crate::internal_common::*;
use super::standard::Standard;

///A standard transaction whose first output stays locked until `lock`
///blocks have passed.
#[derive(Debug, Clone)]
pub struct Timelock {
    pub standard: Standard,
    pub lock: u64

} impl Timelock {
    pub fn new(net_prefix: u8, fee: i64, lock: u64) -> Result<Self, TxError> {
        return Ok(Self{
            standard: Standard::new(net_prefix, fee)?,
            lock
        })
    }

    pub fn encode<W: Write>(&self, w: &mut W) -> Result<(), SerializationError> {
        self.standard.encode(w)?;
        return write_u64_le(w, self.lock)
    }

    pub fn decode<R: Read>(r: &mut R) -> Result<Self, SerializationError> {
        let standard = Standard::decode(r)?;
        let lock = read_u64_le(r)?;
        return Ok(Self{ standard, lock })
    }
}
