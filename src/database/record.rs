/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    AeadCore,
    Aes256Gcm,
    Nonce
};
use sha3::{Digest, Sha3_256};
use zeroize::Zeroize;

use crate::internal_common::*;

const NONCE_LEN: usize = 12;

///The private half of a stored UTXO:
///everything needed to spend the output once it unlocks.
pub(crate) struct InputRecord {
    pub amount: Scalar,
    pub mask: Scalar,
    pub priv_key: Scalar,
    ///Absolute height at which the output unlocks; 0 means spendable now
    pub unlock_height: u64

} impl InputRecord {
    ///`amount(32) || mask(32) || priv(32) || unlock_height(u64 big-endian)`
    fn encode(&self) -> [u8; 104] {
        let mut buf = [0u8; 104];
        buf[0..32].copy_from_slice(&self.amount.to_bytes());
        buf[32..64].copy_from_slice(&self.mask.to_bytes());
        buf[64..96].copy_from_slice(&self.priv_key.to_bytes());
        buf[96..104].copy_from_slice(&self.unlock_height.to_be_bytes());
        return buf
    }

    fn decode(bytes: &[u8]) -> Result<Self, StoreError> {
        if bytes.len() != 104 {
            return Err(StoreError::DecodeFailed)
        }

        let amount = Scalar::from_bytes(&bytes[0..32])
            .map_err(|_| StoreError::DecodeFailed)?;
        let mask = Scalar::from_bytes(&bytes[32..64])
            .map_err(|_| StoreError::DecodeFailed)?;
        let priv_key = Scalar::from_bytes(&bytes[64..96])
            .map_err(|_| StoreError::DecodeFailed)?;
        let unlock_height = u64::from_be_bytes(bytes[96..104].try_into()
            .map_err(|_| StoreError::DecodeFailed)?);

        return Ok(Self{ amount, mask, priv_key, unlock_height })
    }

    ///Encrypt for storage: AES-256-GCM under a key derived from the
    ///wallet's spend key, random 12-byte nonce prefixed.
    pub fn seal(&self, encryption_key: &[u8]) -> Result<Vec<u8>, StoreError> {
        let mut plaintext = self.encode();

        let cipher = record_cipher(encryption_key)?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = cipher.encrypt(&nonce, plaintext.as_ref())
            .map_err(|_| StoreError::EncryptFailed)?;
        plaintext.zeroize();

        return Ok([nonce.as_slice(), &ciphertext].concat())
    }

    pub fn open(bytes: &[u8], decryption_key: &[u8]) -> Result<Self, StoreError> {
        if bytes.len() < NONCE_LEN {
            return Err(StoreError::DecryptFailed)
        }

        let cipher = record_cipher(decryption_key)?;
        let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);

        let mut plaintext = cipher.decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| StoreError::DecryptFailed)?;

        let record = Self::decode(&plaintext);
        plaintext.zeroize();
        return record
    }
}

fn record_cipher(key: &[u8]) -> Result<Aes256Gcm, StoreError> {
    let digest = Sha3_256::digest(key);
    return Aes256Gcm::new_from_slice(&digest)
        .map_err(|_| StoreError::EncryptFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_open_roundtrip() {
        let record = InputRecord{
            amount: Scalar::from(120u64),
            mask: random_scalar(),
            priv_key: random_scalar(),
            unlock_height: 55
        };

        let sealed = record.seal(b"spend key bytes").unwrap();
        let opened = InputRecord::open(&sealed, b"spend key bytes").unwrap();

        assert_eq!(opened.amount, record.amount);
        assert_eq!(opened.mask, record.mask);
        assert_eq!(opened.priv_key, record.priv_key);
        assert_eq!(opened.unlock_height, record.unlock_height);

        //wrong key
        assert!(InputRecord::open(&sealed, b"not the spend key").is_err());
    }
}
