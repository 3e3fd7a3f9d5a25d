/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fs;
use std::path::Path;

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    AeadCore,
    Aes256Gcm,
    Nonce
};
use sha3::{Digest, Sha3_256};

use crate::errors::WalletError;

const NONCE_LEN: usize = 12;

///Write the seed to `file`, AES-256-GCM encrypted under
///`SHA3-256(password)` with the random nonce prefixed.
///
///Refuses to overwrite: replacing an existing seed file may cause
///loss of funds.
pub(crate) fn save_seed(seed: &[u8], password: &str, file: &Path) -> Result<(), WalletError> {
    if file.exists() {
        return Err(WalletError::SeedFileExists)
    }

    let cipher = seed_cipher(password)?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher.encrypt(&nonce, seed)
        .map_err(|_| WalletError::Io("failed to encrypt seed".to_string()))?;

    fs::write(file, [nonce.as_slice(), &ciphertext].concat())?;
    return Ok(())
}

///Read and decrypt the seed from `file`.
pub(crate) fn fetch_seed(password: &str, file: &Path) -> Result<Vec<u8>, WalletError> {
    let ciphertext = fs::read(file)?;
    if ciphertext.len() < NONCE_LEN {
        return Err(WalletError::Io("seed file is truncated".to_string()))
    }

    let cipher = seed_cipher(password)?;
    let (nonce, ciphertext) = ciphertext.split_at(NONCE_LEN);

    return cipher.decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| WalletError::Io("failed to decrypt seed file".to_string()))
}

fn seed_cipher(password: &str) -> Result<Aes256Gcm, WalletError> {
    let digest = Sha3_256::digest(password.as_bytes());
    return Aes256Gcm::new_from_slice(&digest)
        .map_err(|_| WalletError::Io("failed to derive seed cipher".to_string()))
}
