/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//!The transaction data model and proving pipeline.
//!
//!Every transaction type shares the `Standard` payload and differs only in
//!its trailer: a lock height, bid bytes, a consensus key, or reward
//!outputs. The type tag also decides whether output values travel
//!encrypted.

mod standard;
mod timelock;
mod bid;
mod stake;
mod coinbase;
mod input;
mod output;
mod decoys;

pub use standard::Standard;
pub use timelock::Timelock;
pub use bid::Bid;
pub use stake::Stake;
pub use coinbase::Coinbase;
pub use input::Input;
pub use output::{
    Output,
    encrypt_amount,
    decrypt_amount,
    encrypt_mask,
    decrypt_mask
};
pub use decoys::{Decoy, Decoys};

use std::io::{Read, Write};

use sha3::{Digest, Sha3_256};

use crate::internal_common::*;

pub const MAX_INPUTS: usize = 2000;
pub const MAX_OUTPUTS: usize = 32;

///Number of decoys per input ring. ringsize = mixins + 1
pub const NUM_MIXINS: usize = 7;

///Transaction type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TxType {
    Standard = 0,
    Timelock = 1,
    Bid = 2,
    Stake = 3,
    Coinbase = 4,

} impl TxType {
    pub fn from_byte(byte: u8) -> Result<Self, SerializationError> {
        return match byte {
            0 => Ok(Self::Standard),
            1 => Ok(Self::Timelock),
            2 => Ok(Self::Bid),
            3 => Ok(Self::Stake),
            4 => Ok(Self::Coinbase),
            _ => Err(SerializationError::DecodingError)
        }
    }
}

///A transaction of any type.
#[derive(Debug, Clone)]
pub enum Transaction {
    Standard(Standard),
    Timelock(Timelock),
    Bid(Bid),
    Stake(Stake),
    Coinbase(Coinbase),

} impl Transaction {
    pub fn tx_type(&self) -> TxType {
        return match self {
            Self::Standard(_) => TxType::Standard,
            Self::Timelock(_) => TxType::Timelock,
            Self::Bid(_) => TxType::Bid,
            Self::Stake(_) => TxType::Stake,
            Self::Coinbase(_) => TxType::Coinbase,
        }
    }

    ///The shared payload of this transaction.
    pub fn standard(&self) -> &Standard {
        return match self {
            Self::Standard(tx) => tx,
            Self::Timelock(tx) => &tx.standard,
            Self::Bid(tx) => &tx.timelock.standard,
            Self::Stake(tx) => &tx.timelock.standard,
            Self::Coinbase(tx) => &tx.standard,
        }
    }

    pub fn standard_mut(&mut self) -> &mut Standard {
        return match self {
            Self::Standard(tx) => tx,
            Self::Timelock(tx) => &mut tx.standard,
            Self::Bid(tx) => &mut tx.timelock.standard,
            Self::Stake(tx) => &mut tx.timelock.standard,
            Self::Coinbase(tx) => &mut tx.standard,
        }
    }

    ///Whether output values of this type travel encrypted.
    ///Bid, stake, and coinbase amounts are consensus-visible.
    pub fn should_encrypt_values(&self) -> bool {
        return match self.tx_type() {
            TxType::Standard => true,
            TxType::Timelock => true,
            TxType::Bid => false,
            TxType::Stake => false,
            TxType::Coinbase => false,
        }
    }

    ///Blocks the first received output of this transaction stays locked for.
    pub fn lock_time(&self) -> u64 {
        return match self {
            Self::Standard(_) => 0,
            Self::Timelock(tx) => tx.lock,
            Self::Bid(tx) => tx.timelock.lock,
            Self::Stake(tx) => tx.timelock.lock,
            Self::Coinbase(_) => 0,
        }
    }

    ///The transaction hash: SHA3-256 over `fee || R || inputs (without
    ///signatures) || outputs || trailer`. This is the message every input
    ///ring signature signs.
    pub fn hash(&self) -> Result<[u8; 32], TxError> {
        let mut buf: Vec<u8> = Vec::new();
        self.standard().encode_hashable(&mut buf)?;

        match self {
            Self::Standard(_) | Self::Coinbase(_) => (),
            Self::Timelock(tx) => write_u64_le(&mut buf, tx.lock)?,
            Self::Bid(tx) => {
                write_u64_le(&mut buf, tx.timelock.lock)?;
                write_var_bytes(&mut buf, &tx.m)?;
            },
            Self::Stake(tx) => {
                write_u64_le(&mut buf, tx.timelock.lock)?;
                write_var_bytes(&mut buf, &tx.bls_public)?;
            },
        }

        let digest = Sha3_256::digest(&buf);
        return Ok(digest.as_slice().try_into()
            .expect("Wrong digest length"))
    }

    ///Run the full proving pipeline:
    ///rangeproof over the outputs, value encryption per the type policy,
    ///decoy rings, balancing pseudo-commitments, and one dual-key MLSAG
    ///per input over the transaction hash.
    pub fn prove<F>(&mut self, mut fetch_decoys: F) -> Result<(), TxError>
        where F: FnMut(usize) -> Decoys
    {
        if let Self::Coinbase(_) = self {
            //rewards carry no proofs
            return Ok(())
        }

        let encrypt_values = self.should_encrypt_values();
        self.standard_mut().prepare_proofs(&mut fetch_decoys, encrypt_values)?;

        let msg = self.hash()?;
        return self.standard_mut().sign_inputs(&msg)
    }

    ///Verify every input's ring signature against the transaction hash.
    pub fn verify(&self) -> Result<(), TxError> {
        let msg = self.hash()?;
        for input in &self.standard().inputs {
            input.verify(&msg)?;
        }
        return Ok(())
    }

    pub fn encode<W: Write>(&self, w: &mut W) -> Result<(), SerializationError> {
        w.write_all(&[self.tx_type() as u8])
            .map_err(|_| SerializationError::EncodingError)?;

        return match self {
            Self::Standard(tx) => tx.encode(w),
            Self::Timelock(tx) => tx.encode(w),
            Self::Bid(tx) => tx.encode(w),
            Self::Stake(tx) => tx.encode(w),
            Self::Coinbase(tx) => tx.encode(w),
        }
    }

    pub fn decode<R: Read>(r: &mut R) -> Result<Self, SerializationError> {
        let mut tag = [0u8; 1];
        r.read_exact(&mut tag).map_err(|_| SerializationError::DecodingError)?;

        return match TxType::from_byte(tag[0])? {
            TxType::Standard => Ok(Self::Standard(Standard::decode(r)?)),
            TxType::Timelock => Ok(Self::Timelock(Timelock::decode(r)?)),
            TxType::Bid => Ok(Self::Bid(Bid::decode(r)?)),
            TxType::Stake => Ok(Self::Stake(Stake::decode(r)?)),
            TxType::Coinbase => Ok(Self::Coinbase(Coinbase::decode(r)?)),
        }
    }
}
