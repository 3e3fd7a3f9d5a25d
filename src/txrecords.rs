/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Human-visible transaction history records.

use std::io::{Read, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::internal_common::*;
use crate::transactions::{decrypt_amount, Transaction, TxType};

///Whether a record describes funds coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    In = 0,
    Out = 1,

} impl Direction {
    fn from_byte(byte: u8) -> Result<Self, SerializationError> {
        return match byte {
            0 => Ok(Self::In),
            1 => Ok(Self::Out),
            _ => Err(SerializationError::DecodingError)
        }
    }
}

///One classified block transaction, as shown in the wallet's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRecord {
    pub direction: Direction,
    pub timestamp: i64,
    pub height: u64,
    pub tx_type: TxType,
    pub amount: u64,
    pub unlock_height: u64,
    ///Lowercase hex of the first output's destination key
    pub recipient: String

} impl TxRecord {
    ///Classify `tx` at `height`. The recorded amount is the first
    ///output's, decrypted when the type encrypts values.
    pub fn new(tx: &Transaction, height: u64, direction: Direction, priv_view: &Scalar) -> Self {
        let standard = tx.standard();
        let output = &standard.outputs[0];

        let amount = match tx.should_encrypt_values() {
            true => decrypt_amount(&output.encrypted_amount, &standard.big_r, 0, priv_view),
            false => output.encrypted_amount
        };

        return Self{
            direction,
            timestamp: unix_timestamp(),
            height,
            tx_type: tx.tx_type(),
            amount: scalar_to_u64(&amount),
            unlock_height: height + tx.lock_time(),
            recipient: hex::encode(output.dest.to_point().compress().to_bytes())
        }
    }

    pub fn encode<W: Write>(&self, w: &mut W) -> Result<(), SerializationError> {
        w.write_all(&[self.direction as u8])
            .map_err(|_| SerializationError::EncodingError)?;
        write_u64_le(w, self.timestamp as u64)?;
        write_u64_le(w, self.height)?;
        w.write_all(&[self.tx_type as u8])
            .map_err(|_| SerializationError::EncodingError)?;
        write_u64_le(w, self.amount)?;
        write_u64_le(w, self.unlock_height)?;
        return w.write_all(self.recipient.as_bytes())
            .map_err(|_| SerializationError::EncodingError)
    }

    pub fn decode<R: Read>(r: &mut R) -> Result<Self, SerializationError> {
        let mut byte = [0u8; 1];
        r.read_exact(&mut byte).map_err(|_| SerializationError::DecodingError)?;
        let direction = Direction::from_byte(byte[0])?;

        let timestamp = read_u64_le(r)? as i64;
        let height = read_u64_le(r)?;

        r.read_exact(&mut byte).map_err(|_| SerializationError::DecodingError)?;
        let tx_type = TxType::from_byte(byte[0])?;

        let amount = read_u64_le(r)?;
        let unlock_height = read_u64_le(r)?;

        let mut recipient_bytes: Vec<u8> = Vec::new();
        r.read_to_end(&mut recipient_bytes)
            .map_err(|_| SerializationError::DecodingError)?;
        let recipient = String::from_utf8(recipient_bytes)
            .map_err(|_| SerializationError::DecodingError)?;

        return Ok(Self{
            direction,
            timestamp,
            height,
            tx_type,
            amount,
            unlock_height,
            recipient
        })
    }
}

fn unix_timestamp() -> i64 {
    return match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs() as i64,
        Err(_) => 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_roundtrip() {
        let record = TxRecord{
            direction: Direction::Out,
            timestamp: 1_700_000_000,
            height: 42,
            tx_type: TxType::Timelock,
            amount: 90,
            unlock_height: 1042,
            recipient: "ab".repeat(32)
        };

        let mut buf: Vec<u8> = Vec::new();
        record.encode(&mut buf).unwrap();

        let decoded = TxRecord::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, record);
    }
}
